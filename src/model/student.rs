use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::fields::{Address, Role};
use super::guardian::Guardian;
use super::person::Profile;
use super::person_list::PersonList;
use crate::error::{TutorError, TutorResult};
use crate::validation;

/// A tutee. Everything except the zoom link is fixed after construction;
/// edits go through [`Student::edit_details`], which returns a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StudentRecord")]
pub struct Student {
    #[serde(flatten)]
    profile: Profile,
    guardians: PersonList<Profile>,
    zoom_link: String,
    subjects: BTreeSet<String>,
    grade_level: String,
    fees: f64,
    exam_details: String,
}

impl Student {
    pub fn create(profile: Profile) -> Self {
        Self {
            profile,
            guardians: PersonList::new(),
            zoom_link: String::new(),
            subjects: BTreeSet::new(),
            grade_level: String::new(),
            fees: 0.0,
            exam_details: String::new(),
        }
    }

    pub fn with_details<I, S>(
        profile: Profile,
        zoom_link: &str,
        subjects: I,
        grade_level: &str,
        fees: f64,
        exam_details: &str,
    ) -> TutorResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            profile,
            guardians: PersonList::new(),
            zoom_link: zoom_link.trim().to_string(),
            subjects: subject_set(subjects)?,
            grade_level: grade_level.trim().to_string(),
            fees: validation::non_negative(fees, "fees")?,
            exam_details: exam_details.trim().to_string(),
        })
    }

    pub fn role(&self) -> Role {
        Role::Student
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn related(&self) -> &[Profile] {
        self.guardians.view()
    }

    pub fn guardians(&self) -> &PersonList<Profile> {
        &self.guardians
    }

    /// Records `guardian` on this student only. Returns false if already
    /// recorded. The guardian's own student set is not touched.
    pub fn add_guardian(&mut self, guardian: &Guardian) -> bool {
        self.guardians.add(guardian.profile().clone())
    }

    pub fn remove_guardian(&mut self, guardian: &Profile) -> bool {
        self.guardians.remove(guardian)
    }

    pub(crate) fn guardians_mut(&mut self) -> &mut PersonList<Profile> {
        &mut self.guardians
    }

    pub fn zoom_link(&self) -> &str {
        &self.zoom_link
    }

    pub fn set_zoom_link(&mut self, zoom_link: &str) {
        self.zoom_link = zoom_link.trim().to_string();
    }

    pub fn subjects(&self) -> &BTreeSet<String> {
        &self.subjects
    }

    pub fn grade_level(&self) -> &str {
        &self.grade_level
    }

    pub fn fees(&self) -> f64 {
        self.fees
    }

    pub fn exam_details(&self) -> &str {
        &self.exam_details
    }

    /// Returns a copy with address, fees, exam details and subjects replaced.
    /// Identity fields, zoom link, grade level and guardians carry over; `self`
    /// is left as it was.
    pub fn edit_details<I, S>(
        &self,
        address: Address,
        fees: f64,
        exam_details: &str,
        subjects: I,
    ) -> TutorResult<Student>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fees = validation::non_negative(fees, "fees")?;
        let subjects = subject_set(subjects)?;

        Ok(Student {
            profile: Profile {
                address,
                ..self.profile.clone()
            },
            guardians: self.guardians.clone(),
            zoom_link: self.zoom_link.clone(),
            subjects,
            grade_level: self.grade_level.clone(),
            fees,
            exam_details: exam_details.trim().to_string(),
        })
    }
}

/// Serialized form of a student. Reading goes through
/// [`Student::with_details`] so stored values get the same checks as new ones.
#[derive(Deserialize)]
struct StudentRecord {
    #[serde(flatten)]
    profile: Profile,
    #[serde(default)]
    guardians: PersonList<Profile>,
    #[serde(default)]
    zoom_link: String,
    #[serde(default)]
    subjects: Vec<String>,
    #[serde(default)]
    grade_level: String,
    #[serde(default)]
    fees: f64,
    #[serde(default)]
    exam_details: String,
}

impl TryFrom<StudentRecord> for Student {
    type Error = TutorError;

    fn try_from(record: StudentRecord) -> TutorResult<Self> {
        let mut student = Student::with_details(
            record.profile,
            &record.zoom_link,
            &record.subjects,
            &record.grade_level,
            record.fees,
            &record.exam_details,
        )?;
        student.guardians = record.guardians;
        Ok(student)
    }
}

fn subject_set<I, S>(subjects: I) -> TutorResult<BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    subjects
        .into_iter()
        .map(|s| validation::non_blank(s.as_ref(), "subject"))
        .collect()
}

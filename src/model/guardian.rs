use serde::{Deserialize, Serialize};

use super::fields::Role;
use super::person::Profile;
use super::person_list::PersonList;
use super::student::Student;

/// A parent or other adult overseeing one or more students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guardian {
    #[serde(flatten)]
    profile: Profile,
    students: PersonList<Profile>,
}

impl Guardian {
    pub fn create(profile: Profile) -> Self {
        Self {
            profile,
            students: PersonList::new(),
        }
    }

    pub fn role(&self) -> Role {
        Role::Guardian
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn related(&self) -> &[Profile] {
        self.students.view()
    }

    pub fn students(&self) -> &PersonList<Profile> {
        &self.students
    }

    /// Records `student` on this guardian only. Returns false if already
    /// recorded.
    pub fn add_student(&mut self, student: &Student) -> bool {
        self.students.add(student.profile().clone())
    }

    pub fn remove_student(&mut self, student: &Profile) -> bool {
        self.students.remove(student)
    }

    pub(crate) fn students_mut(&mut self) -> &mut PersonList<Profile> {
        &mut self.students
    }
}

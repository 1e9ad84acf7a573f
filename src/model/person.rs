use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{TutorError, TutorResult};

use super::fields::{Address, Email, Name, Phone, Role, Tag};
use super::guardian::Guardian;
use super::person_list::{Named, PersonList};
use super::student::Student;

/// The identity fields every person has. Relation sets store the profile of
/// the linked person rather than the person itself, so a guardian inside a
/// student's set never drags its own student set along.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Profile {
    pub name: Name,
    pub phone: Phone,
    pub email: Email,
    pub address: Address,
    pub tags: BTreeSet<Tag>,
}

impl Profile {
    pub fn new(name: Name, phone: Phone, email: Email, address: Address, tags: BTreeSet<Tag>) -> Self {
        Self {
            name,
            phone,
            email,
            address,
            tags,
        }
    }
}

impl Named for Profile {
    fn name(&self) -> &Name {
        &self.name
    }
}

/// A contact in the book. The role is the variant; it cannot be stored or
/// set independently of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum Person {
    Student(Student),
    Guardian(Guardian),
}

impl Person {
    pub fn role(&self) -> Role {
        match self {
            Person::Student(_) => Role::Student,
            Person::Guardian(_) => Role::Guardian,
        }
    }

    pub fn profile(&self) -> &Profile {
        match self {
            Person::Student(s) => s.profile(),
            Person::Guardian(g) => g.profile(),
        }
    }

    /// The linked persons of the opposite role.
    pub fn related(&self) -> &[Profile] {
        match self {
            Person::Student(s) => s.related(),
            Person::Guardian(g) => g.related(),
        }
    }

    pub fn as_student(&self) -> Option<&Student> {
        match self {
            Person::Student(s) => Some(s),
            Person::Guardian(_) => None,
        }
    }

    pub fn as_guardian(&self) -> Option<&Guardian> {
        match self {
            Person::Guardian(g) => Some(g),
            Person::Student(_) => None,
        }
    }

    /// Records `other` in this person's relation set, on this side only.
    /// `other` must hold the opposite role.
    pub fn add_related(&mut self, other: &Person) -> TutorResult<bool> {
        self.check_counterpart(other)?;
        Ok(self.relations_mut().add(other.profile().clone()))
    }

    /// Drops `other` from this person's relation set, on this side only.
    pub fn remove_related(&mut self, other: &Person) -> TutorResult<bool> {
        self.check_counterpart(other)?;
        Ok(self.relations_mut().remove(other.profile()))
    }

    fn check_counterpart(&self, other: &Person) -> TutorResult<()> {
        let expected = self.role().counterpart();
        if other.role() == expected {
            Ok(())
        } else {
            Err(TutorError::invalid(
                "relation",
                format!(
                    "{} can only be linked to a {}, not a {}",
                    self.role(),
                    expected,
                    other.role()
                ),
            ))
        }
    }

    pub(crate) fn relations_mut(&mut self) -> &mut PersonList<Profile> {
        match self {
            Person::Student(s) => s.guardians_mut(),
            Person::Guardian(g) => g.students_mut(),
        }
    }
}

/// Persons are equal when role and every identity field match. Relations
/// and student-only details do not take part.
impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.role() == other.role() && self.profile() == other.profile()
    }
}

impl Eq for Person {}

impl Named for Person {
    fn name(&self) -> &Name {
        &self.profile().name
    }
}

impl From<Student> for Person {
    fn from(student: Student) -> Self {
        Person::Student(student)
    }
}

impl From<Guardian> for Person {
    fn from(guardian: Guardian) -> Self {
        Person::Guardian(guardian)
    }
}

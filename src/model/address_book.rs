use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::fields::{Address, Name, Role};
use super::index::Index;
use super::person::{Person, Profile};
use super::person_list::PersonList;
use super::student::Student;
use crate::error::{TutorError, TutorResult};

/// The master registry. Positions in [`AddressBook::persons`] are the
/// positions the user sees, so every index-based operation resolves
/// against it.
#[derive(Debug, Clone, Default)]
pub struct AddressBook {
    persons: PersonList<Person>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn persons(&self) -> &[Person] {
        self.persons.view()
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn get(&self, index: Index) -> TutorResult<&Person> {
        self.persons
            .view()
            .get(index.zero_based())
            .ok_or(TutorError::OutOfRange {
                index: index.one_based(),
                size: self.persons.len(),
            })
    }

    /// Name lookup; weaker than equality, returns the first match.
    pub fn find_by_name(&self, name: &Name) -> Option<&Person> {
        self.persons.find_by_name(name)
    }

    pub fn add_person(&mut self, person: Person) -> TutorResult<()> {
        if self.persons.contains(&person) {
            return Err(TutorError::AlreadyExists {
                entity_type: person.role().to_string(),
                identifier: person.profile().name.to_string(),
            });
        }
        debug!(name = %person.profile().name, role = %person.role(), "adding person");
        self.persons.add(person);
        Ok(())
    }

    /// Deletes every listed position. All indices are checked before anything
    /// is removed; repeats are ignored and removal runs from the highest
    /// position down so earlier removals never shift later ones. Every
    /// relation set that referenced a deleted person is pruned.
    ///
    /// Returns the deleted persons in list order.
    pub fn delete_many(&mut self, indices: &[Index]) -> TutorResult<Vec<Person>> {
        for index in indices {
            self.get(*index)?;
        }

        let positions: BTreeSet<usize> = indices.iter().map(Index::zero_based).collect();
        let mut removed = Vec::with_capacity(positions.len());
        for pos in positions.into_iter().rev() {
            if let Some(person) = self.persons.remove_at(pos) {
                removed.push(person);
            }
        }
        removed.reverse();

        for person in &removed {
            debug!(name = %person.profile().name, "deleted person");
            self.prune_relations(person.profile(), person.role());
        }
        Ok(removed)
    }

    /// Removes `profile` from the relation set of every person of the
    /// opposite role.
    fn prune_relations(&mut self, profile: &Profile, role: Role) {
        for person in self.persons.iter_mut() {
            if person.role() == role {
                continue;
            }
            if person.relations_mut().remove(profile) {
                warn!(
                    from = %person.profile().name,
                    dropped = %profile.name,
                    "pruned relation to deleted person"
                );
            }
        }
    }

    /// Links a student and a guardian on both sides at once. Fails without
    /// touching either side if the roles are wrong or the link already
    /// exists in both directions.
    pub fn link(&mut self, student: Index, guardian: Index) -> TutorResult<()> {
        let (s, g) = self.student_guardian_pair(student, guardian)?;

        let added_on_student = self.person_mut(student)?.add_related(&g)?;
        let added_on_guardian = self.person_mut(guardian)?.add_related(&s)?;
        if !added_on_student && !added_on_guardian {
            return Err(TutorError::AlreadyExists {
                entity_type: "Relation".into(),
                identifier: format!("{} - {}", s.profile().name, g.profile().name),
            });
        }

        debug!(student = %s.profile().name, guardian = %g.profile().name, "linked");
        Ok(())
    }

    /// Removes the link between a student and a guardian from both sides.
    pub fn unlink(&mut self, student: Index, guardian: Index) -> TutorResult<()> {
        let (s, g) = self.student_guardian_pair(student, guardian)?;

        let removed_from_student = self.person_mut(student)?.remove_related(&g)?;
        let removed_from_guardian = self.person_mut(guardian)?.remove_related(&s)?;
        if !removed_from_student && !removed_from_guardian {
            return Err(TutorError::NotFound {
                entity_type: "Relation".into(),
                id: format!("{} - {}", s.profile().name, g.profile().name),
            });
        }

        debug!(student = %s.profile().name, guardian = %g.profile().name, "unlinked");
        Ok(())
    }

    /// Checks both positions and their roles, returning owned copies so the
    /// caller can mutate the registry afterwards.
    fn student_guardian_pair(&self, student: Index, guardian: Index) -> TutorResult<(Person, Person)> {
        let s = self.get(student)?;
        let g = self.get(guardian)?;
        if s.role() != Role::Student {
            return Err(TutorError::invalid(
                "student",
                format!("person {} is a {}", student, s.role()),
            ));
        }
        if g.role() != Role::Guardian {
            return Err(TutorError::invalid(
                "guardian",
                format!("person {} is a {}", guardian, g.role()),
            ));
        }
        Ok((s.clone(), g.clone()))
    }

    fn person_mut(&mut self, index: Index) -> TutorResult<&mut Person> {
        let size = self.persons.len();
        self.persons
            .get_mut(index.zero_based())
            .ok_or(TutorError::OutOfRange {
                index: index.one_based(),
                size,
            })
    }

    /// Replaces the student at `index` with an edited copy. Guardians that
    /// recorded the old profile are updated to the new one.
    pub fn edit_student<I, S>(
        &mut self,
        index: Index,
        address: Address,
        fees: f64,
        exam_details: &str,
        subjects: I,
    ) -> TutorResult<&Student>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let current = self.student_at(index)?;
        let old_profile = current.profile().clone();
        let edited = Person::Student(current.edit_details(address, fees, exam_details, subjects)?);

        let clash = self
            .persons
            .iter()
            .enumerate()
            .any(|(pos, p)| pos != index.zero_based() && *p == edited);
        if clash {
            return Err(TutorError::AlreadyExists {
                entity_type: Role::Student.to_string(),
                identifier: edited.profile().name.to_string(),
            });
        }

        let new_profile = edited.profile().clone();
        self.persons.set(index.zero_based(), edited);
        if new_profile != old_profile {
            for person in self.persons.iter_mut() {
                if person.role() != Role::Guardian || !person.related().contains(&old_profile) {
                    continue;
                }
                let relations = person.relations_mut();
                if !relations.replace(&old_profile, new_profile.clone()) {
                    // The guardian already lists the new profile; keep that entry.
                    relations.remove(&old_profile);
                    warn!(
                        guardian = %person.profile().name,
                        student = %new_profile.name,
                        "dropped stale relation entry for edited student"
                    );
                }
            }
        }
        debug!(name = %new_profile.name, "edited student details");

        self.student_at(index)
    }

    pub fn set_zoom_link(&mut self, index: Index, zoom_link: &str) -> TutorResult<()> {
        self.student_at(index)?;
        if let Person::Student(student) = self.person_mut(index)? {
            student.set_zoom_link(zoom_link);
        }
        Ok(())
    }

    fn student_at(&self, index: Index) -> TutorResult<&Student> {
        let person = self.get(index)?;
        person.as_student().ok_or_else(|| {
            TutorError::invalid("student", format!("person {} is a {}", index, person.role()))
        })
    }
}

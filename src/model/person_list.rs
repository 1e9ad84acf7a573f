use serde::{Deserialize, Serialize};

use super::fields::Name;

/// Anything that can be looked up by name in a [`PersonList`].
pub trait Named {
    fn name(&self) -> &Name;
}

/// An insertion-ordered list of persons in which no two elements are equal.
///
/// Equality is whatever `T: PartialEq` says; for persons that is the full set
/// of identity fields. Name lookup is a weaker secondary index: two distinct
/// elements may share a name, in which case `find_by_name` returns the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + PartialEq"))]
#[serde(from = "Vec<T>", into = "Vec<T>")]
pub struct PersonList<T: Clone> {
    persons: Vec<T>,
}

impl<T: Clone> Default for PersonList<T> {
    fn default() -> Self {
        Self { persons: Vec::new() }
    }
}

impl<T: Clone + PartialEq> PersonList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a person. Returns false and leaves the list untouched if an
    /// equal person is already present.
    pub fn add(&mut self, person: T) -> bool {
        if self.contains(&person) {
            return false;
        }
        self.persons.push(person);
        true
    }

    /// Removes the equal person, if any. Returns whether one was removed.
    pub fn remove(&mut self, person: &T) -> bool {
        match self.position(person) {
            Some(pos) => {
                self.persons.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, person: &T) -> bool {
        self.persons.iter().any(|p| p == person)
    }

    pub fn position(&self, person: &T) -> Option<usize> {
        self.persons.iter().position(|p| p == person)
    }

    /// Replaces the element equal to `old` with `new` in place, keeping its
    /// position. Returns false if `old` is absent or `new` would duplicate a
    /// different element.
    pub fn replace(&mut self, old: &T, new: T) -> bool {
        let Some(pos) = self.position(old) else {
            return false;
        };
        if self.persons.iter().enumerate().any(|(i, p)| i != pos && *p == new) {
            return false;
        }
        self.persons[pos] = new;
        true
    }

    /// Removes and returns the element at `pos` (0-based).
    pub fn remove_at(&mut self, pos: usize) -> Option<T> {
        if pos < self.persons.len() {
            Some(self.persons.remove(pos))
        } else {
            None
        }
    }

    /// Mutable access to every element, for edits that keep identities
    /// distinct (relation bookkeeping only touches relation sets).
    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.persons.iter_mut()
    }

    pub(crate) fn get_mut(&mut self, pos: usize) -> Option<&mut T> {
        self.persons.get_mut(pos)
    }

    pub(crate) fn set(&mut self, pos: usize, person: T) {
        self.persons[pos] = person;
    }
}

impl<T: Clone + PartialEq + Named> PersonList<T> {
    /// First element with exactly this name.
    pub fn find_by_name(&self, name: &Name) -> Option<&T> {
        self.persons.iter().find(|p| p.name() == name)
    }
}

impl<T: Clone> PersonList<T> {
    /// Read-only view of the elements in insertion order.
    ///
    /// The view is a shared borrow, so the list cannot be changed through it:
    ///
    /// ```compile_fail
    /// use tutorease::model::{Name, PersonList};
    ///
    /// let mut list: PersonList<Name> = PersonList::new();
    /// list.add(Name::parse("Alice").unwrap());
    /// let view = list.view();
    /// view.push(Name::parse("Bob").unwrap());
    /// ```
    pub fn view(&self) -> &[T] {
        &self.persons
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.persons.iter()
    }
}

impl<T: Clone + PartialEq> From<Vec<T>> for PersonList<T> {
    /// Seeds a list from a sequence, dropping later duplicates.
    fn from(persons: Vec<T>) -> Self {
        let mut list = Self::new();
        for person in persons {
            list.add(person);
        }
        list
    }
}

impl<T: Clone> From<PersonList<T>> for Vec<T> {
    fn from(list: PersonList<T>) -> Vec<T> {
        list.persons
    }
}

impl<'a, T: Clone> IntoIterator for &'a PersonList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.persons.iter()
    }
}

impl Named for Name {
    fn name(&self) -> &Name {
        self
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TutorError, TutorResult};
use crate::validation;

/// Declares a validated string wrapper. `parse` is the only way in, so a
/// value of the type is always valid; deserialization goes through it too.
macro_rules! string_field {
    ($(#[$meta:meta])* $ty:ident, $field:literal, $check:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $ty(String);

        impl $ty {
            pub fn parse(value: &str) -> TutorResult<Self> {
                $check(value, $field).map($ty)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $ty {
            type Error = TutorError;

            fn try_from(value: String) -> TutorResult<Self> {
                Self::parse(&value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> String {
                value.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_field!(
    /// A person's full name: letters, digits and spaces.
    Name, "name", validation::alphanumeric_words
);
string_field!(Phone, "phone", validation::phone_number);
string_field!(Email, "email", validation::email_address);
string_field!(
    /// Free-form postal address; anything non-blank.
    Address, "address", validation::non_blank
);
string_field!(
    /// A single-word label such as `friends` or `owesMoney`.
    Tag, "tag", tag_word
);

fn tag_word(value: &str, field: &str) -> TutorResult<String> {
    let trimmed = validation::non_blank(value, field)?;
    if trimmed.chars().all(char::is_alphanumeric) {
        Ok(trimmed)
    } else {
        Err(TutorError::invalid(field, "should be alphanumeric"))
    }
}

/// Which side of the oversight relationship a person is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Student,
    Guardian,
}

impl Role {
    pub const ALL: &'static [Role] = &[Role::Student, Role::Guardian];

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Guardian => "Guardian",
        }
    }

    /// The role a linked person must have.
    pub fn counterpart(&self) -> Role {
        match self {
            Role::Student => Role::Guardian,
            Role::Guardian => Role::Student,
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Student" => Some(Role::Student),
            "Guardian" => Some(Role::Guardian),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Guardian => "Guardian",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_trims_and_validates() {
        assert_eq!(Name::parse("  Alice Pauline ").unwrap().as_str(), "Alice Pauline");
        assert!(Name::parse("").is_err());
        assert!(Name::parse("R@chel").is_err());
    }

    #[test]
    fn tag_rejects_spaces() {
        assert!(Tag::parse("owesMoney").is_ok());
        assert!(Tag::parse("owes money").is_err());
    }

    #[test]
    fn deserializing_runs_validation() {
        let ok: Name = serde_json::from_str("\"Bob\"").unwrap();
        assert_eq!(ok.as_str(), "Bob");
        assert!(serde_json::from_str::<Phone>("\"12ab\"").is_err());
    }

    #[test]
    fn role_db_strings_roundtrip() {
        for role in Role::ALL {
            assert_eq!(Role::from_db_str(role.to_db_str()), Some(*role));
        }
        assert_eq!(Role::from_db_str("Teacher"), None);
    }

    #[test]
    fn role_counterpart_flips() {
        assert_eq!(Role::Student.counterpart(), Role::Guardian);
        assert_eq!(Role::Guardian.counterpart(), Role::Student);
    }
}

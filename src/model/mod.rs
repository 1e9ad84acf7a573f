pub mod fields;
pub mod index;
pub mod person_list;
pub mod person;
pub mod student;
pub mod guardian;
pub mod address_book;

// Re-exports for convenience
pub use fields::{Address, Email, Name, Phone, Role, Tag};
pub use index::Index;
pub use person_list::{Named, PersonList};
pub use person::{Person, Profile};
pub use student::Student;
pub use guardian::Guardian;
pub use address_book::AddressBook;

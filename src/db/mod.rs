pub mod schema;
pub mod person_repo;

pub mod error;
pub mod validation;
pub mod model;
pub mod logic;
pub mod db;
pub mod cli;

pub mod command;
pub mod parser;

pub use command::{execute, Command, Outcome};
pub use parser::{parse_command, parse_index, parse_indices};

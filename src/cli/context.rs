use rusqlite::Connection;
use std::io::{self, Write};
use tracing::error;

use crate::db::person_repo;
use crate::error::{TutorError, TutorResult};
use crate::logic::{self, Command, Outcome};
use crate::model::AddressBook;

pub struct CLIContext {
    pub conn: Connection,
    pub book: AddressBook,
}

impl CLIContext {
    pub fn new(conn: Connection, book: AddressBook) -> Self {
        Self { conn, book }
    }

    /// Prompt and read a line from stdin. Returns None on EOF.
    pub fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok();
        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end_matches('\n').trim_end_matches('\r').to_string()),
            Err(_) => None,
        }
    }

    /// Runs one command. Mutating commands run against a scratch copy that
    /// only replaces the book once it has been saved, so a failed save
    /// leaves memory and disk in agreement.
    pub fn run_command(&mut self, command: Command) -> TutorResult<Outcome> {
        if !command.mutates() {
            return logic::execute(&mut self.book, command);
        }

        let mut scratch = self.book.clone();
        let outcome = logic::execute(&mut scratch, command)?;
        if let Err(e) = person_repo::save_book(&self.conn, &scratch) {
            error!("failed to save: {}", e);
            return Err(e);
        }
        self.book = scratch;
        Ok(outcome)
    }

    /// Print an error.
    pub fn print_error(&self, e: &TutorError) {
        println!("Error: {}", e);
    }
}

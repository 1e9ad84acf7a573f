pub mod context;

use std::path::Path;
use rusqlite::Connection;
use tracing::{error, info};

use crate::db::{person_repo, schema};
use crate::error::TutorResult;
use crate::logic;
use context::CLIContext;

/// Run the interactive REPL.
pub fn run(db_path: &Path) {
    println!("TutorEase contact book");
    println!("Type 'help' for commands, 'exit' to quit.");
    println!();

    let conn = match Connection::open(db_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error opening database: {}", e);
            return;
        }
    };

    let mut ctx = match open_session(conn) {
        Ok(ctx) => {
            info!(path = %db_path.display(), count = ctx.book.len(), "loaded contacts");
            println!("Loaded {} contact(s).", ctx.book.len());
            ctx
        }
        Err(e) => {
            error!("could not load {}: {}", db_path.display(), e);
            eprintln!("Error loading data: {}", e);
            eprintln!("The file was left untouched. Fix or move it, then start again.");
            return;
        }
    };

    repl_loop(&mut ctx);
}

/// Prepares the schema and loads the stored book. A book that fails to load
/// is an error; the session never starts empty over stored data.
pub fn open_session(conn: Connection) -> TutorResult<CLIContext> {
    schema::initialize(&conn)?;
    let book = person_repo::load_book(&conn)?;
    Ok(CLIContext::new(conn, book))
}

fn repl_loop(ctx: &mut CLIContext) {
    loop {
        let input = match ctx.read_line("> ") {
            Some(s) => s,
            None => break,
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let command = match logic::parse_command(input) {
            Ok(c) => c,
            Err(e) => {
                ctx.print_error(&e);
                continue;
            }
        };

        match ctx.run_command(command) {
            Ok(outcome) => {
                println!("{}", outcome.message);
                if outcome.exit {
                    break;
                }
            }
            Err(e) => ctx.print_error(&e),
        }
    }
}

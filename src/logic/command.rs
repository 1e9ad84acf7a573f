use std::path::PathBuf;

use tracing::info;

use crate::error::TutorResult;
use crate::model::*;

/// A fully parsed command. Index arguments are syntactically valid but not
/// yet checked against the list.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Exit,
    List,
    AddPerson(Person),
    Delete(Vec<Index>),
    Link { student: Index, guardian: Index },
    Unlink { student: Index, guardian: Index },
    EditStudent {
        index: Index,
        address: Address,
        fees: f64,
        exam_details: String,
        subjects: Vec<String>,
    },
    Zoom { index: Index, link: String },
    Find(Name),
    Show(Index),
    Export(PathBuf),
}

impl Command {
    /// Whether running the command can change the book.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Command::AddPerson(_)
                | Command::Delete(_)
                | Command::Link { .. }
                | Command::Unlink { .. }
                | Command::EditStudent { .. }
                | Command::Zoom { .. }
        )
    }
}

/// What the front-end should print, and whether to stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub message: String,
    pub exit: bool,
}

impl Outcome {
    fn say(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit: false,
        }
    }
}

pub fn execute(book: &mut AddressBook, command: Command) -> TutorResult<Outcome> {
    match command {
        Command::Help => Ok(Outcome::say(HELP)),
        Command::Exit => Ok(Outcome {
            message: "Bye!".into(),
            exit: true,
        }),
        Command::List => Ok(Outcome::say(list(book))),
        Command::AddPerson(person) => {
            let message = format!("New {} added: {}", person.role(), summary(&person));
            book.add_person(person)?;
            Ok(Outcome::say(message))
        }
        Command::Delete(indices) => {
            let removed = book.delete_many(&indices)?;
            let names: Vec<String> = removed.iter().map(|p| p.profile().name.to_string()).collect();
            Ok(Outcome::say(format!(
                "Deleted {} person(s): {}",
                removed.len(),
                names.join(", ")
            )))
        }
        Command::Link { student, guardian } => {
            book.link(student, guardian)?;
            Ok(Outcome::say(format!(
                "Linked {} with guardian {}",
                book.get(student)?.profile().name,
                book.get(guardian)?.profile().name
            )))
        }
        Command::Unlink { student, guardian } => {
            book.unlink(student, guardian)?;
            Ok(Outcome::say(format!(
                "Unlinked {} from guardian {}",
                book.get(student)?.profile().name,
                book.get(guardian)?.profile().name
            )))
        }
        Command::EditStudent {
            index,
            address,
            fees,
            exam_details,
            subjects,
        } => {
            let edited = book.edit_student(index, address, fees, &exam_details, &subjects)?;
            Ok(Outcome::say(format!(
                "Edited student: {}",
                describe(&Person::Student(edited.clone()))
            )))
        }
        Command::Zoom { index, link } => {
            book.set_zoom_link(index, &link)?;
            Ok(Outcome::say(format!(
                "Zoom link for {} set to {}",
                book.get(index)?.profile().name,
                link.trim()
            )))
        }
        Command::Find(name) => Ok(Outcome::say(match book.find_by_name(&name) {
            Some(person) => describe(person),
            None => format!("No person named '{}'", name),
        })),
        Command::Show(index) => Ok(Outcome::say(describe(book.get(index)?))),
        Command::Export(path) => {
            let json = serde_json::to_string_pretty(book.persons())?;
            std::fs::write(&path, json)?;
            info!(path = %path.display(), count = book.len(), "exported contacts");
            Ok(Outcome::say(format!(
                "Exported {} person(s) to {}",
                book.len(),
                path.display()
            )))
        }
    }
}

fn list(book: &AddressBook) -> String {
    if book.is_empty() {
        return "No contacts yet. Use 'add-student' or 'add-guardian' to add someone.".into();
    }
    let mut lines = vec![format!("Contacts ({}):", book.len())];
    for (i, person) in book.persons().iter().enumerate() {
        lines.push(format!("  {}. {}", i + 1, summary(person)));
    }
    lines.join("\n")
}

fn summary(person: &Person) -> String {
    let profile = person.profile();
    let tags = if profile.tags.is_empty() {
        String::new()
    } else {
        let names: Vec<&str> = profile.tags.iter().map(Tag::as_str).collect();
        format!(" [{}]", names.join(", "))
    };
    format!("{} ({}){}", profile.name, person.role(), tags)
}

fn describe(person: &Person) -> String {
    let profile = person.profile();
    let mut lines = vec![
        format!("Name: {}", profile.name),
        format!("Role: {}", person.role()),
        format!("Phone: {}", profile.phone),
        format!("Email: {}", profile.email),
        format!("Address: {}", profile.address),
    ];
    if !profile.tags.is_empty() {
        let names: Vec<&str> = profile.tags.iter().map(Tag::as_str).collect();
        lines.push(format!("Tags: {}", names.join(", ")));
    }
    if let Some(student) = person.as_student() {
        let or_none = |s: &str| if s.is_empty() { "(none)".to_string() } else { s.to_string() };
        let subjects: Vec<&str> = student.subjects().iter().map(String::as_str).collect();
        lines.push(format!("Zoom: {}", or_none(student.zoom_link())));
        lines.push(format!("Subjects: {}", or_none(subjects.join(", ").as_str())));
        lines.push(format!("Grade: {}", or_none(student.grade_level())));
        lines.push(format!("Fees: {:.2}", student.fees()));
        lines.push(format!("Exam: {}", or_none(student.exam_details())));
    }
    let related: Vec<String> = person.related().iter().map(|p| p.name.to_string()).collect();
    let heading = match person.role() {
        Role::Student => "Guardians",
        Role::Guardian => "Students",
    };
    if related.is_empty() {
        lines.push(format!("{}: (none)", heading));
    } else {
        lines.push(format!("{}: {}", heading, related.join(", ")));
    }
    lines.join("\n")
}

const HELP: &str = r#"
COMMANDS:

  Contacts:
    list                               List everyone with their index
    show <index>                       Show one person in full
    find <name>                        Show the first person with this exact name
    add-student n/ p/ e/ a/ [t/]... [z/] [s/]... [g/] [f/] [x/]
    add-guardian n/ p/ e/ a/ [t/]...
    delete <index>[,<index>]...        Delete one or more people
    edit-student <index> a/ f/ x/ [s/]...
    zoom <index> <link>                Set a student's zoom link

  Relations:
    link <student> <guardian>          Link a student and a guardian
    unlink <student> <guardian>        Remove that link

  Other:
    export <path>                      Write all contacts as JSON
    help                               Show this help
    exit / quit / q                    Exit"#;

use std::collections::{BTreeSet, HashMap};

use crate::error::{TutorError, TutorResult};
use crate::model::*;

use super::command::Command;

pub const ADD_STUDENT_USAGE: &str = "add-student: Adds a student.\n\
    Parameters: n/NAME p/PHONE e/EMAIL a/ADDRESS [t/TAG]... [z/ZOOM_LINK] [s/SUBJECT]... \
    [g/GRADE_LEVEL] [f/FEES] [x/EXAM_DETAILS]\n\
    Example: add-student n/Alice Pauline p/94351253 e/alice@example.com a/123, Jurong West s/Math f/120";
pub const ADD_GUARDIAN_USAGE: &str = "add-guardian: Adds a guardian.\n\
    Parameters: n/NAME p/PHONE e/EMAIL a/ADDRESS [t/TAG]...\n\
    Example: add-guardian n/Benson Meier p/98765432 e/benson@example.com a/311, Clementi Ave 2";
pub const DELETE_USAGE: &str = "delete: Deletes the persons identified by the index numbers used in the displayed list.\n\
    Parameters: INDEX[,INDEX]... (each must be a positive integer)\n\
    Example: delete 1 or delete 2,5,7";
pub const LINK_USAGE: &str = "link: Links a student to a guardian.\n\
    Parameters: STUDENT_INDEX GUARDIAN_INDEX\n\
    Example: link 1 3";
pub const UNLINK_USAGE: &str = "unlink: Removes the link between a student and a guardian.\n\
    Parameters: STUDENT_INDEX GUARDIAN_INDEX\n\
    Example: unlink 1 3";
pub const EDIT_STUDENT_USAGE: &str = "edit-student: Replaces a student's address, fees, exam details and subjects.\n\
    Parameters: INDEX a/ADDRESS f/FEES x/EXAM_DETAILS [s/SUBJECT]...\n\
    Example: edit-student 1 a/Blk 30 Geylang f/150 x/Final exam Dec 1 s/Math";
pub const ZOOM_USAGE: &str = "zoom: Sets a student's zoom link.\n\
    Parameters: INDEX LINK\n\
    Example: zoom 1 https://zoom.us/j/123";
pub const FIND_USAGE: &str = "find: Shows the first person with exactly this name.\n\
    Parameters: NAME\n\
    Example: find Alice Pauline";
pub const SHOW_USAGE: &str = "show: Shows one person in full.\n\
    Parameters: INDEX\n\
    Example: show 2";
pub const EXPORT_USAGE: &str = "export: Writes the list as JSON.\n\
    Parameters: PATH\n\
    Example: export contacts.json";

/// Parses a 1-based position. Only plain digits are accepted, and not 0.
pub fn parse_index(token: &str) -> TutorResult<Index> {
    let trimmed = token.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(TutorError::InvalidIndex(trimmed.to_string()));
    }
    trimmed
        .parse::<usize>()
        .ok()
        .and_then(Index::from_one_based)
        .ok_or_else(|| TutorError::InvalidIndex(trimmed.to_string()))
}

/// Parses `"2,5,7"` into positions in the order given. Repeats are kept and
/// nothing is checked against the list; that happens on execution. One bad
/// token fails the whole input.
pub fn parse_indices(args: &str, usage: &str) -> TutorResult<Vec<Index>> {
    args.split(',')
        .map(parse_index)
        .collect::<TutorResult<Vec<_>>>()
        .map_err(|e| TutorError::command_format(usage, e))
}

/// Parse input into command word and args.
fn split_command(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.find(char::is_whitespace) {
        Some(pos) => (&input[..pos], input[pos..].trim()),
        None => (input, ""),
    }
}

pub fn parse_command(input: &str) -> TutorResult<Command> {
    let (command, args) = split_command(input);

    match command {
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Exit),
        "list" | "ls" => Ok(Command::List),
        "add-student" => parse_add_student(args),
        "add-guardian" => parse_add_guardian(args),
        "delete" | "rm" => parse_indices(args, DELETE_USAGE).map(Command::Delete),
        "link" => {
            let (student, guardian) = parse_index_pair(args, LINK_USAGE)?;
            Ok(Command::Link { student, guardian })
        }
        "unlink" => {
            let (student, guardian) = parse_index_pair(args, UNLINK_USAGE)?;
            Ok(Command::Unlink { student, guardian })
        }
        "edit-student" => parse_edit_student(args),
        "zoom" => {
            let (index, link) = split_command(args);
            if link.is_empty() {
                return Err(TutorError::usage(ZOOM_USAGE));
            }
            let index = parse_index(index).map_err(|e| TutorError::command_format(ZOOM_USAGE, e))?;
            Ok(Command::Zoom {
                index,
                link: link.to_string(),
            })
        }
        "find" => {
            if args.is_empty() {
                return Err(TutorError::usage(FIND_USAGE));
            }
            Name::parse(args).map(Command::Find)
        }
        "show" | "view" => parse_index(args)
            .map(Command::Show)
            .map_err(|e| TutorError::command_format(SHOW_USAGE, e)),
        "export" => {
            if args.is_empty() {
                return Err(TutorError::usage(EXPORT_USAGE));
            }
            Ok(Command::Export(args.into()))
        }
        other => Err(TutorError::UnknownCommand(other.to_string())),
    }
}

fn parse_index_pair(args: &str, usage: &str) -> TutorResult<(Index, Index)> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    match parts.as_slice() {
        [first, second] => {
            let first = parse_index(first).map_err(|e| TutorError::command_format(usage, e))?;
            let second = parse_index(second).map_err(|e| TutorError::command_format(usage, e))?;
            Ok((first, second))
        }
        _ => Err(TutorError::usage(usage)),
    }
}

fn parse_profile(map: &ArgumentMap, usage: &str) -> TutorResult<Profile> {
    let name = Name::parse(map.require("n/", usage)?)?;
    let phone = Phone::parse(map.require("p/", usage)?)?;
    let email = Email::parse(map.require("e/", usage)?)?;
    let address = Address::parse(map.require("a/", usage)?)?;
    let tags: BTreeSet<Tag> = map
        .all("t/")
        .iter()
        .map(|t| Tag::parse(t))
        .collect::<TutorResult<_>>()?;
    Ok(Profile::new(name, phone, email, address, tags))
}

fn parse_fees(value: Option<&str>) -> TutorResult<f64> {
    match value {
        None => Ok(0.0),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| TutorError::invalid("fees", "should be a number")),
    }
}

fn parse_add_student(args: &str) -> TutorResult<Command> {
    let map = ArgumentMap::tokenize(args, &["n/", "p/", "e/", "a/", "t/", "z/", "s/", "g/", "f/", "x/"]);
    if !map.preamble().is_empty() {
        return Err(TutorError::usage(ADD_STUDENT_USAGE));
    }
    let profile = parse_profile(&map, ADD_STUDENT_USAGE)?;
    let student = Student::with_details(
        profile,
        map.value("z/").unwrap_or_default(),
        map.all("s/"),
        map.value("g/").unwrap_or_default(),
        parse_fees(map.value("f/"))?,
        map.value("x/").unwrap_or_default(),
    )?;
    Ok(Command::AddPerson(student.into()))
}

fn parse_add_guardian(args: &str) -> TutorResult<Command> {
    let map = ArgumentMap::tokenize(args, &["n/", "p/", "e/", "a/", "t/"]);
    if !map.preamble().is_empty() {
        return Err(TutorError::usage(ADD_GUARDIAN_USAGE));
    }
    let profile = parse_profile(&map, ADD_GUARDIAN_USAGE)?;
    Ok(Command::AddPerson(Guardian::create(profile).into()))
}

fn parse_edit_student(args: &str) -> TutorResult<Command> {
    let map = ArgumentMap::tokenize(args, &["a/", "f/", "x/", "s/"]);
    let index = parse_index(map.preamble()).map_err(|e| TutorError::command_format(EDIT_STUDENT_USAGE, e))?;
    let address = Address::parse(map.require("a/", EDIT_STUDENT_USAGE)?)?;
    let fees = parse_fees(Some(map.require("f/", EDIT_STUDENT_USAGE)?))?;
    let exam_details = map.require("x/", EDIT_STUDENT_USAGE)?.to_string();
    Ok(Command::EditStudent {
        index,
        address,
        fees,
        exam_details,
        subjects: map.all("s/").to_vec(),
    })
}

/// Splits `n/Alice Pauline p/123 t/a t/b` into values keyed by prefix. A word
/// that starts with a known prefix opens a new value, which runs up to the
/// next such word. Values are sliced from the input, so inner spacing is
/// kept and only the ends are trimmed. Text before the first prefix forms
/// the preamble.
struct ArgumentMap {
    preamble: String,
    values: HashMap<&'static str, Vec<String>>,
}

impl ArgumentMap {
    fn tokenize(args: &str, prefixes: &[&'static str]) -> Self {
        let mut marks: Vec<(usize, &'static str)> = Vec::new();
        let mut after_blank = true;
        for (offset, c) in args.char_indices() {
            if after_blank && !c.is_whitespace() {
                if let Some(prefix) = prefixes.iter().find(|p| args[offset..].starts_with(**p)) {
                    marks.push((offset, *prefix));
                }
            }
            after_blank = c.is_whitespace();
        }

        let mut values: HashMap<&'static str, Vec<String>> = HashMap::new();
        for (i, (start, prefix)) in marks.iter().enumerate() {
            let end = marks.get(i + 1).map_or(args.len(), |(next, _)| *next);
            let value = args[start + prefix.len()..end].trim().to_string();
            values.entry(*prefix).or_default().push(value);
        }

        let preamble_end = marks.first().map_or(args.len(), |(start, _)| *start);
        Self {
            preamble: args[..preamble_end].trim().to_string(),
            values,
        }
    }

    fn preamble(&self) -> &str {
        &self.preamble
    }

    /// The last value given for `prefix`.
    fn value(&self, prefix: &str) -> Option<&str> {
        self.values
            .get(prefix)
            .and_then(|v| v.last())
            .map(String::as_str)
    }

    fn all(&self, prefix: &str) -> &[String] {
        self.values.get(prefix).map(Vec::as_slice).unwrap_or_default()
    }

    fn require(&self, prefix: &str, usage: &str) -> TutorResult<&str> {
        self.value(prefix).ok_or_else(|| TutorError::usage(usage))
    }
}

use std::collections::BTreeSet;

use rusqlite::Connection;
use tutorease::cli::{self, context::CLIContext};
use tutorease::db::*;
use tutorease::logic::{execute, parse_command};
use tutorease::model::*;

fn book_from(commands: &[&str]) -> AddressBook {
    let mut book = AddressBook::new();
    for input in commands {
        execute(&mut book, parse_command(input).unwrap()).unwrap();
    }
    book
}

fn sample_book() -> AddressBook {
    book_from(&[
        "add-student n/Alice Pauline p/94351253 e/alice@example.com a/Jurong West t/friends \
         z/https://zoom.us/j/1 s/Math s/Physics g/Sec 3 f/120.5 x/Midterm Oct 3",
        "add-guardian n/Benson Meier p/98765432 e/benson@example.com a/Clementi Ave 2 t/owesMoney t/friends",
        "add-student n/Carl Kurz p/95352563 e/carl@example.com a/wall street",
        "link 1 2",
        "link 3 2",
    ])
}

// ==========================================================================
// SAVE / LOAD TESTS
// ==========================================================================

#[test]
fn empty_database_loads_empty_book() {
    let conn = schema::test_connection();
    let book = person_repo::load_book(&conn).unwrap();
    assert!(book.is_empty());
}

#[test]
fn save_and_load_keeps_order_and_fields() {
    let conn = schema::test_connection();
    let book = sample_book();
    person_repo::save_book(&conn, &book).unwrap();

    let loaded = person_repo::load_book(&conn).unwrap();
    assert_eq!(loaded.persons(), book.persons());

    let alice = loaded.persons()[0].as_student().unwrap();
    assert_eq!(alice.zoom_link(), "https://zoom.us/j/1");
    assert_eq!(alice.grade_level(), "Sec 3");
    assert_eq!(alice.fees(), 120.5);
    assert_eq!(alice.exam_details(), "Midterm Oct 3");
    assert_eq!(
        alice.subjects(),
        &BTreeSet::from(["Math".to_string(), "Physics".to_string()])
    );

    let benson = &loaded.persons()[1];
    assert_eq!(benson.profile().tags.len(), 2);
}

#[test]
fn save_and_load_keeps_relations() {
    let conn = schema::test_connection();
    let book = sample_book();
    person_repo::save_book(&conn, &book).unwrap();

    let loaded = person_repo::load_book(&conn).unwrap();
    for (before, after) in book.persons().iter().zip(loaded.persons()) {
        assert_eq!(before.related(), after.related());
    }
    let guardian_students: Vec<&str> = loaded.persons()[1]
        .related()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(guardian_students, vec!["Alice Pauline", "Carl Kurz"]);
}

#[test]
fn one_sided_relation_survives_reload() {
    let conn = schema::test_connection();
    let guardian = Guardian::create(Profile::new(
        Name::parse("Dora").unwrap(),
        Phone::parse("123").unwrap(),
        Email::parse("dora@example.com").unwrap(),
        Address::parse("Somewhere 1").unwrap(),
        BTreeSet::new(),
    ));
    let mut student = Student::create(Profile::new(
        Name::parse("Eve").unwrap(),
        Phone::parse("456").unwrap(),
        Email::parse("eve@example.com").unwrap(),
        Address::parse("Somewhere 2").unwrap(),
        BTreeSet::new(),
    ));
    student.add_guardian(&guardian);

    let mut book = AddressBook::new();
    book.add_person(student.into()).unwrap();
    book.add_person(guardian.into()).unwrap();
    person_repo::save_book(&conn, &book).unwrap();

    let loaded = person_repo::load_book(&conn).unwrap();
    assert_eq!(loaded.persons()[0].related().len(), 1);
    assert!(loaded.persons()[1].related().is_empty());
}

#[test]
fn save_replaces_previous_contents() {
    let conn = schema::test_connection();
    let mut book = sample_book();
    person_repo::save_book(&conn, &book).unwrap();

    execute(&mut book, parse_command("delete 2").unwrap()).unwrap();
    person_repo::save_book(&conn, &book).unwrap();

    let loaded = person_repo::load_book(&conn).unwrap();
    assert_eq!(loaded.len(), 2);
    assert!(loaded.persons().iter().all(|p| p.related().is_empty()));
}

#[test]
fn load_rejects_unknown_role() {
    let conn = schema::test_connection();
    conn.execute(
        "INSERT INTO persons (position, role, name, phone, email, address) VALUES (0, 'Teacher', 'Zed', '123', 'z@example.com', 'Here')",
        [],
    )
    .unwrap();
    assert!(person_repo::load_book(&conn).is_err());
}

#[test]
fn initialize_is_idempotent() {
    let conn = schema::test_connection();
    schema::initialize(&conn).unwrap();
    person_repo::save_book(&conn, &sample_book()).unwrap();
    schema::initialize(&conn).unwrap();
    assert_eq!(person_repo::load_book(&conn).unwrap().len(), 3);
}

// ==========================================================================
// SESSION TESTS
// ==========================================================================

#[test]
fn session_refuses_unreadable_book_and_keeps_rows() {
    let path = std::env::temp_dir().join(format!("tutorease-session-{}.db", std::process::id()));
    std::fs::remove_file(&path).ok();
    {
        let conn = Connection::open(&path).unwrap();
        schema::initialize(&conn).unwrap();
        person_repo::save_book(&conn, &sample_book()).unwrap();
        conn.execute("UPDATE persons SET role = 'Teacher' WHERE position = 2", [])
            .unwrap();
    }

    assert!(cli::open_session(Connection::open(&path).unwrap()).is_err());

    let conn = Connection::open(&path).unwrap();
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM persons", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 3);
    conn.execute("UPDATE persons SET role = 'Student' WHERE position = 2", [])
        .unwrap();
    let ctx = cli::open_session(conn).unwrap();
    assert_eq!(ctx.book.len(), 3);
    drop(ctx);
    std::fs::remove_file(&path).ok();
}

#[test]
fn failed_command_leaves_session_book_unchanged() {
    let mut ctx = CLIContext::new(schema::test_connection(), sample_book());
    let before = ctx.book.clone();

    let result = ctx.run_command(parse_command("delete 1,9").unwrap());
    assert!(result.is_err());
    assert_eq!(ctx.book.persons(), before.persons());
}

#[test]
fn failed_save_leaves_session_book_unchanged() {
    let mut ctx = CLIContext::new(schema::test_connection(), sample_book());
    let before = ctx.book.clone();
    ctx.conn.execute_batch("DROP TABLE relations").unwrap();

    let result = ctx.run_command(parse_command("delete 1").unwrap());
    assert!(result.is_err());
    assert_eq!(ctx.book.persons(), before.persons());
    for (kept, original) in ctx.book.persons().iter().zip(before.persons()) {
        assert_eq!(kept.related(), original.related());
    }
}

#[test]
fn successful_command_updates_book_and_storage() {
    let mut ctx = CLIContext::new(schema::test_connection(), sample_book());
    ctx.run_command(parse_command("delete 1").unwrap()).unwrap();

    assert_eq!(ctx.book.len(), 2);
    let stored = person_repo::load_book(&ctx.conn).unwrap();
    assert_eq!(stored.persons(), ctx.book.persons());
}

// ==========================================================================
// EXPORT TESTS
// ==========================================================================

#[test]
fn export_writes_json_array() {
    let mut book = sample_book();
    let path = std::env::temp_dir().join(format!("tutorease-export-{}.json", std::process::id()));
    let input = format!("export {}", path.display());
    execute(&mut book, parse_command(&input).unwrap()).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(json.as_array().unwrap().len(), 3);
    assert_eq!(json[0]["role"], "Student");
    assert_eq!(json[0]["guardians"][0]["name"], "Benson Meier");
    assert_eq!(json[1]["students"].as_array().unwrap().len(), 2);
}

use std::collections::BTreeSet;

use rusqlite::{params, Connection, Row};
use tracing::{debug, warn};

use crate::error::{TutorError, TutorResult};
use crate::model::*;

/// Replaces everything stored with the current contents of `book`.
/// Runs in one transaction; on error the previous contents stay.
pub fn save_book(conn: &Connection, book: &AddressBook) -> TutorResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM relations", [])?;
    tx.execute("DELETE FROM student_subjects", [])?;
    tx.execute("DELETE FROM person_tags", [])?;
    tx.execute("DELETE FROM persons", [])?;

    for (position, person) in book.persons().iter().enumerate() {
        insert(&tx, position as i64, person)?;
    }

    for (owner, person) in book.persons().iter().enumerate() {
        for (sequence, related) in person.related().iter().enumerate() {
            let target = book
                .persons()
                .iter()
                .position(|p| p.role() == person.role().counterpart() && p.profile() == related);
            match target {
                Some(target) => {
                    tx.execute(
                        "INSERT INTO relations (owner_position, related_position, sequence) VALUES (?1, ?2, ?3)",
                        params![owner as i64, target as i64, sequence as i64],
                    )?;
                }
                None => warn!(
                    owner = %person.profile().name,
                    related = %related.name,
                    "skipping relation to a person not in the book"
                ),
            }
        }
    }

    tx.commit()?;
    debug!(count = book.len(), "saved address book");
    Ok(())
}

fn insert(conn: &Connection, position: i64, person: &Person) -> TutorResult<()> {
    let profile = person.profile();
    let student = person.as_student();
    conn.execute(
        "INSERT INTO persons (position, role, name, phone, email, address, zoom_link, grade_level, fees, exam_details)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            position,
            person.role().to_db_str(),
            profile.name.as_str(),
            profile.phone.as_str(),
            profile.email.as_str(),
            profile.address.as_str(),
            student.map(|s| s.zoom_link()),
            student.map(|s| s.grade_level()),
            student.map(|s| s.fees()),
            student.map(|s| s.exam_details()),
        ],
    )?;

    for tag in &profile.tags {
        conn.execute(
            "INSERT INTO person_tags (person_position, tag) VALUES (?1, ?2)",
            params![position, tag.as_str()],
        )?;
    }

    if let Some(student) = student {
        for subject in student.subjects() {
            conn.execute(
                "INSERT INTO student_subjects (person_position, subject) VALUES (?1, ?2)",
                params![position, subject],
            )?;
        }
    }
    Ok(())
}

/// Rebuilds the book in stored order, then replays every stored relation
/// onto its owner.
pub fn load_book(conn: &Connection) -> TutorResult<AddressBook> {
    let mut stmt = conn.prepare(
        "SELECT position, role, name, phone, email, address, zoom_link, grade_level, fees, exam_details
         FROM persons ORDER BY position",
    )?;

    let rows = stmt
        .query_map([], |row| Ok(row_to_stored(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    let mut positions = Vec::with_capacity(rows.len());
    let mut persons = Vec::with_capacity(rows.len());
    for row in rows {
        positions.push(row.position);
        persons.push(row.into_person(conn)?);
    }

    let mut stmt = conn.prepare(
        "SELECT owner_position, related_position FROM relations ORDER BY owner_position, sequence",
    )?;
    let relations = stmt
        .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    for (owner, related) in relations {
        let owner = positions.iter().position(|p| *p == owner);
        let related = positions.iter().position(|p| *p == related);
        let (Some(owner), Some(related)) = (owner, related) else {
            warn!("skipping stored relation with unknown position");
            continue;
        };
        let other = persons[related].clone();
        persons[owner].add_related(&other)?;
    }

    let mut book = AddressBook::new();
    for person in persons {
        book.add_person(person)?;
    }
    debug!(count = book.len(), "loaded address book");
    Ok(book)
}

struct StoredPerson {
    position: i64,
    role: String,
    name: String,
    phone: String,
    email: String,
    address: String,
    zoom_link: Option<String>,
    grade_level: Option<String>,
    fees: Option<f64>,
    exam_details: Option<String>,
}

fn row_to_stored(row: &Row) -> TutorResult<StoredPerson> {
    Ok(StoredPerson {
        position: row.get(0)?,
        role: row.get(1)?,
        name: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        address: row.get(5)?,
        zoom_link: row.get(6)?,
        grade_level: row.get(7)?,
        fees: row.get(8)?,
        exam_details: row.get(9)?,
    })
}

impl StoredPerson {
    fn into_person(self, conn: &Connection) -> TutorResult<Person> {
        let role = Role::from_db_str(&self.role)
            .ok_or_else(|| TutorError::invalid("role", format!("unknown role '{}'", self.role)))?;

        let tags = strings_for(conn, "SELECT tag FROM person_tags WHERE person_position = ?1 ORDER BY tag", self.position)?
            .iter()
            .map(|t| Tag::parse(t))
            .collect::<TutorResult<BTreeSet<_>>>()?;

        let profile = Profile::new(
            Name::parse(&self.name)?,
            Phone::parse(&self.phone)?,
            Email::parse(&self.email)?,
            Address::parse(&self.address)?,
            tags,
        );

        match role {
            Role::Guardian => Ok(Guardian::create(profile).into()),
            Role::Student => {
                let subjects = strings_for(
                    conn,
                    "SELECT subject FROM student_subjects WHERE person_position = ?1 ORDER BY subject",
                    self.position,
                )?;
                let student = Student::with_details(
                    profile,
                    self.zoom_link.as_deref().unwrap_or_default(),
                    subjects,
                    self.grade_level.as_deref().unwrap_or_default(),
                    self.fees.unwrap_or_default(),
                    self.exam_details.as_deref().unwrap_or_default(),
                )?;
                Ok(student.into())
            }
        }
    }
}

fn strings_for(conn: &Connection, sql: &str, position: i64) -> TutorResult<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let values = stmt
        .query_map(params![position], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(values)
}

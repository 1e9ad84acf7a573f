use std::collections::BTreeSet;

use tutorease::error::TutorError;
use tutorease::model::*;

fn profile(name: &str, phone: &str) -> Profile {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    Profile::new(
        Name::parse(name).unwrap(),
        Phone::parse(phone).unwrap(),
        Email::parse(&email).unwrap(),
        Address::parse("123, Jurong West Ave 6").unwrap(),
        BTreeSet::new(),
    )
}

fn alice() -> Student {
    Student::with_details(
        profile("Alice Pauline", "94351253"),
        "https://zoom.us/j/111",
        ["Physics"],
        "Sec 3",
        100.0,
        "Midterm Oct 3",
    )
    .unwrap()
}

fn benson() -> Guardian {
    Guardian::create(profile("Benson Meier", "98765432"))
}

// ==========================================================================
// PERSON LIST TESTS
// ==========================================================================

#[test]
fn add_person_not_present_returns_true() {
    let mut list = PersonList::new();
    assert!(list.add(Person::from(alice())));
    assert!(list.add(Person::from(benson())));
    assert_eq!(list.len(), 2);
}

#[test]
fn add_person_already_present_returns_false() {
    let mut list = PersonList::new();
    assert!(list.add(Person::from(alice())));
    assert!(!list.add(Person::from(alice())));
    assert_eq!(list.len(), 1);
}

#[test]
fn remove_person_present_returns_true() {
    let mut list = PersonList::new();
    list.add(Person::from(alice()));
    assert!(list.remove(&Person::from(alice())));
    assert!(list.is_empty());
}

#[test]
fn remove_person_absent_returns_false() {
    let mut list: PersonList<Person> = PersonList::new();
    list.add(Person::from(benson()));
    assert!(!list.remove(&Person::from(alice())));
    assert_eq!(list.len(), 1);
}

#[test]
fn view_reflects_later_mutation() {
    let mut list = PersonList::new();
    list.add(Person::from(alice()));
    assert_eq!(list.view().len(), 1);

    list.add(Person::from(benson()));
    let view = list.view();
    assert_eq!(view.len(), 2);
    assert_eq!(view[1].role(), Role::Guardian);
}

#[test]
fn find_by_name_returns_first_match() {
    let mut list = PersonList::new();
    list.add(profile("Amy Tan", "111"));
    list.add(profile("Amy Tan", "222"));
    assert_eq!(list.len(), 2);

    let found = list.find_by_name(&Name::parse("Amy Tan").unwrap()).unwrap();
    assert_eq!(found.phone.as_str(), "111");
    assert!(list.find_by_name(&Name::parse("Nobody").unwrap()).is_none());
}

// ==========================================================================
// EQUALITY TESTS
// ==========================================================================

#[test]
fn persons_with_same_fields_are_equal() {
    let mut with_zoom = alice();
    with_zoom.set_zoom_link("https://zoom.us/j/999");
    assert_eq!(Person::from(alice()), Person::from(with_zoom));
}

#[test]
fn same_profile_different_role_is_not_equal() {
    let as_student = Person::from(Student::create(profile("Chris Lee", "333")));
    let as_guardian = Person::from(Guardian::create(profile("Chris Lee", "333")));
    assert_ne!(as_student, as_guardian);

    let mut list = PersonList::new();
    assert!(list.add(as_student));
    assert!(list.add(as_guardian));
}

#[test]
fn tags_take_part_in_equality() {
    let plain = profile("Dana Ho", "444");
    let mut tagged = plain.clone();
    tagged.tags.insert(Tag::parse("friends").unwrap());
    assert_ne!(plain, tagged);
}

// ==========================================================================
// ROLE TESTS
// ==========================================================================

#[test]
fn role_follows_variant() {
    assert_eq!(alice().role(), Role::Student);
    assert_eq!(benson().role(), Role::Guardian);
    assert_eq!(Person::from(alice()).role(), Role::Student);
    assert_eq!(Person::from(benson()).role(), Role::Guardian);
}

// ==========================================================================
// RELATION TESTS
// ==========================================================================

#[test]
fn add_guardian_is_one_sided() {
    let mut student = alice();
    let guardian = benson();

    assert!(student.add_guardian(&guardian));
    assert!(!student.add_guardian(&guardian));
    assert_eq!(student.related(), &[guardian.profile().clone()]);
    assert!(guardian.related().is_empty());
}

#[test]
fn add_student_is_one_sided() {
    let student = alice();
    let mut guardian = benson();

    assert!(guardian.add_student(&student));
    assert!(!guardian.add_student(&student));
    assert_eq!(guardian.students().len(), 1);
    assert!(student.related().is_empty());
}

#[test]
fn remove_guardian_drops_profile() {
    let mut student = alice();
    let guardian = benson();
    student.add_guardian(&guardian);

    assert!(student.remove_guardian(guardian.profile()));
    assert!(!student.remove_guardian(guardian.profile()));
    assert!(student.related().is_empty());
}

#[test]
fn add_related_rejects_same_role() {
    let mut student = Person::from(alice());
    let other = Person::from(Student::create(profile("Elle Goh", "555")));

    let result = student.add_related(&other);
    assert!(matches!(result, Err(TutorError::InvalidArgument { .. })));
    assert!(student.related().is_empty());
}

#[test]
fn add_related_rejects_guardian_for_guardian() {
    let mut guardian = Person::from(benson());
    let other = Person::from(Guardian::create(profile("Fiona Kunz", "666")));

    assert!(guardian.remove_related(&other).is_err());
    assert!(guardian.add_related(&other).is_err());
    assert!(guardian.related().is_empty());
}

#[test]
fn add_related_accepts_counterpart() {
    let mut guardian = Person::from(benson());
    let student = Person::from(alice());
    assert!(guardian.add_related(&student).unwrap());
    assert!(!guardian.add_related(&student).unwrap());
    assert_eq!(guardian.related().len(), 1);
}

// ==========================================================================
// STUDENT EDIT TESTS
// ==========================================================================

#[test]
fn edit_details_returns_new_student() {
    let original = alice();
    let new_address = Address::parse("Blk 30 Geylang Street 29").unwrap();

    let edited = original
        .edit_details(new_address.clone(), 150.0, "Final exam Dec 1", ["Math"])
        .unwrap();

    assert_eq!(edited.profile().name.as_str(), "Alice Pauline");
    assert_eq!(edited.profile().address, new_address);
    assert_eq!(edited.fees(), 150.0);
    assert_eq!(edited.exam_details(), "Final exam Dec 1");
    assert_eq!(edited.subjects(), &BTreeSet::from(["Math".to_string()]));
    assert_eq!(edited.zoom_link(), "https://zoom.us/j/111");
    assert_eq!(edited.grade_level(), "Sec 3");

    assert_eq!(original, alice());
    assert_eq!(original.fees(), 100.0);
    assert_eq!(original.exam_details(), "Midterm Oct 3");
}

#[test]
fn edit_details_keeps_guardians() {
    let mut original = alice();
    original.add_guardian(&benson());

    let edited = original
        .edit_details(Address::parse("Elsewhere 1").unwrap(), 0.0, "", Vec::<String>::new())
        .unwrap();
    assert_eq!(edited.related(), original.related());
    assert!(edited.subjects().is_empty());
}

#[test]
fn edit_details_rejects_negative_fees() {
    let original = alice();
    let result = original.edit_details(Address::parse("Elsewhere 1").unwrap(), -1.0, "x", ["Math"]);
    assert!(matches!(result, Err(TutorError::InvalidArgument { .. })));
}

#[test]
fn edit_details_rejects_blank_subject() {
    let result = alice().edit_details(Address::parse("Elsewhere 1").unwrap(), 10.0, "x", ["Math", "  "]);
    assert!(result.is_err());
}

#[test]
fn with_details_rejects_negative_fees() {
    let result = Student::with_details(profile("Gina", "777"), "", ["Math"], "", -5.0, "");
    assert!(result.is_err());
}

#[test]
fn create_starts_blank() {
    let student = Student::create(profile("Hana", "888"));
    assert_eq!(student.fees(), 0.0);
    assert!(student.subjects().is_empty());
    assert!(student.zoom_link().is_empty());
    assert!(student.related().is_empty());
}

// ==========================================================================
// SERIALIZATION TESTS
// ==========================================================================

#[test]
fn person_serializes_with_role_tag() {
    let json = serde_json::to_value(Person::from(benson())).unwrap();
    assert_eq!(json["role"], "Guardian");
    assert_eq!(json["name"], "Benson Meier");
    assert!(json["students"].as_array().unwrap().is_empty());
}

#[test]
fn exported_student_reads_back_equal() {
    let mut student = alice();
    student.add_guardian(&benson());
    let json = serde_json::to_string(&Person::from(student.clone())).unwrap();

    let read: Person = serde_json::from_str(&json).unwrap();
    assert_eq!(read.as_student().unwrap(), &student);
}

fn student_json(subjects: &str, fees: f64) -> String {
    format!(
        r#"{{"role":"Student","name":"Amy","phone":"123","email":"amy@example.com","address":"Somewhere 1","tags":[],"guardians":[],"zoom_link":"","subjects":{subjects},"grade_level":"","fees":{fees},"exam_details":""}}"#
    )
}

#[test]
fn reading_student_checks_fees_and_subjects() {
    assert!(serde_json::from_str::<Person>(&student_json(r#"["Math"]"#, 50.0)).is_ok());
    assert!(serde_json::from_str::<Person>(&student_json(r#"["Math"]"#, -50.0)).is_err());
    assert!(serde_json::from_str::<Person>(&student_json(r#"["   "]"#, 50.0)).is_err());
}

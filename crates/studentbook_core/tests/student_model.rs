use studentbook_core::{Student, StudentDraft};

#[test]
fn student_serialization_uses_expected_wire_fields() {
    let student = Student::from_draft("1712345678901", StudentDraft::new("Budi", "X", "TKJ"));

    let json = serde_json::to_value(&student).unwrap();
    assert_eq!(json["id"], "1712345678901");
    assert_eq!(json["name"], "Budi");
    assert_eq!(json["class"], "X");
    assert_eq!(json["major"], "TKJ");
    assert_eq!(json.as_object().map(|fields| fields.len()), Some(4));

    let decoded: Student = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, student);
}

#[test]
fn unknown_wire_fields_are_ignored() {
    let json = serde_json::json!({
        "id": "a1",
        "name": "Ada",
        "class": "XI",
        "major": "PPLG",
        "avatarColor": "#0054A3"
    });

    let decoded: Student = serde_json::from_value(json).unwrap();
    assert_eq!(decoded.to_draft(), StudentDraft::new("Ada", "XI", "PPLG"));
}

#[test]
fn non_string_fields_are_rejected() {
    let json = serde_json::json!({"id": 17, "name": "Ada", "class": "XI", "major": "PPLG"});
    assert!(serde_json::from_value::<Student>(json).is_err());
}

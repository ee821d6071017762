use super::*;
use crate::fixtures;
use shared::protocol::{FULL_NAME_KEY, PLAY_TYPE_KEY};

#[test]
fn decodes_genesis_set_result() {
    let value = CadenceValue::from_json(&fixtures::genesis_result()).expect("parse");
    let result = decode_set_result(&value).expect("decode");

    assert_eq!(result.set.id, SetId(42));
    assert_eq!(result.set.set_name, "Genesis");
    assert!(!result.set.locked);
    assert_eq!(
        result.set.editions,
        vec![
            Edition {
                play_id: PlayId(7),
                retired: false,
                moment_count: 100,
                play_order: 1,
            },
            Edition {
                play_id: PlayId(9),
                retired: true,
                moment_count: 50,
                play_order: 2,
            },
        ]
    );

    assert_eq!(result.plays.len(), 2);
    assert_eq!(result.plays[0].play_id, PlayId(7));
    assert_eq!(result.plays[0].metadata_value(FULL_NAME_KEY), Some("A. Player"));
    assert_eq!(result.plays[1].metadata_value(PLAY_TYPE_KEY), Some("Block"));
}

#[test]
fn optional_wrapped_fields_are_read_through() {
    let raw = fixtures::structure(
        "s.test.TopshotSet",
        &[
            (
                "set",
                json!({
                    "type": "Optional",
                    "value": fixtures::structure(
                        "s.test.SetSummary",
                        &[
                            ("id", fixtures::uint32(3)),
                            ("setName", fixtures::string("Empty")),
                            ("editions", json!({ "type": "Array", "value": [] })),
                            ("locked", fixtures::boolean(true)),
                        ],
                    ),
                }),
            ),
            ("plays", json!({ "type": "Array", "value": [] })),
        ],
    );

    let result = decode_set_result(&CadenceValue::from_json(&raw).expect("parse")).expect("decode");
    assert_eq!(result.set.id, SetId(3));
    assert!(result.set.locked);
    assert!(result.set.editions.is_empty());
    assert!(result.plays.is_empty());
}

#[test]
fn missing_field_reports_its_path() {
    let raw = fixtures::structure(
        "s.test.TopshotSet",
        &[("plays", json!({ "type": "Array", "value": [] }))],
    );

    let err = decode_set_result(&CadenceValue::from_json(&raw).expect("parse"))
        .expect_err("set field is missing");
    assert_eq!(err.path, "$.set");
    assert_eq!(err.reason, "field is missing");
}

#[test]
fn wrong_kind_is_a_decode_error() {
    let raw = fixtures::structure(
        "s.test.TopshotSet",
        &[
            ("set", fixtures::string("not a struct")),
            ("plays", json!({ "type": "Array", "value": [] })),
        ],
    );

    let err = decode_set_result(&CadenceValue::from_json(&raw).expect("parse"))
        .expect_err("set must be a composite");
    assert_eq!(err.path, "$.set");
    assert!(err.reason.contains("expected a composite"), "{err}");
}

#[test]
fn integer_out_of_range_is_rejected() {
    let raw = fixtures::edition(7, false, 0, 1);
    let mut value = CadenceValue::from_json(&raw).expect("parse");
    if let CadenceValue::Composite { fields, .. } = &mut value {
        fields[2].1 = CadenceValue::Integer {
            kind: "UInt64".to_string(),
            digits: "4294967296".to_string(),
        };
    }

    let err = decode_edition(&Cursor::root(&value)).expect_err("overflow");
    assert_eq!(err.path, "$.momentCount");
    assert!(err.reason.contains("does not fit u32"), "{err}");
}

#[test]
fn malformed_json_cadence_is_rejected() {
    let err = CadenceValue::from_json(&json!({ "value": "1" })).expect_err("no type");
    assert!(err.reason.contains("'type'"));

    let err = CadenceValue::from_json(&json!({ "type": "UInt32", "value": 1 }))
        .expect_err("integers travel as strings");
    assert!(err.reason.contains("not a string"));

    let err = CadenceValue::from_json(&json!({
        "type": "Dictionary",
        "value": [{ "key": fixtures::string("k") }]
    }))
    .expect_err("entry without value");
    assert_eq!(err.path, "${0}");
}

#[test]
fn unknown_kinds_are_kept_opaque() {
    let raw = json!({ "type": "Path", "value": { "domain": "public", "identifier": "x" } });
    let value = CadenceValue::from_json(&raw).expect("parse");
    assert!(matches!(value, CadenceValue::Opaque { ref kind, .. } if kind == "Path"));
    assert_eq!(value.to_json(), raw);
}

#[test]
fn argument_wire_form_matches_access_api() {
    assert_eq!(
        CadenceValue::uint32(42).to_json(),
        json!({ "type": "UInt32", "value": "42" })
    );
    assert_eq!(
        CadenceValue::Optional(None).to_json(),
        json!({ "type": "Optional", "value": null })
    );
}

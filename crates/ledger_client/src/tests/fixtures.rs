use serde_json::{json, Value};

pub fn uint32(value: u32) -> Value {
    json!({ "type": "UInt32", "value": value.to_string() })
}

pub fn string(value: &str) -> Value {
    json!({ "type": "String", "value": value })
}

pub fn boolean(value: bool) -> Value {
    json!({ "type": "Bool", "value": value })
}

pub fn structure(id: &str, fields: &[(&str, Value)]) -> Value {
    json!({
        "type": "Struct",
        "value": {
            "id": id,
            "fields": fields
                .iter()
                .map(|(name, value)| json!({ "name": name, "value": value }))
                .collect::<Vec<_>>(),
        }
    })
}

pub fn edition(play_id: u32, retired: bool, moment_count: u32, play_order: u32) -> Value {
    structure(
        "s.0a1b2c.Edition",
        &[
            ("playID", uint32(play_id)),
            ("retired", boolean(retired)),
            ("momentCount", uint32(moment_count)),
            ("playOrder", uint32(play_order)),
        ],
    )
}

pub fn play(play_id: u32, full_name: &str, play_type: &str) -> Value {
    structure(
        "A.0b2a3299cc857e29.TopShot.Play",
        &[
            ("playID", uint32(play_id)),
            (
                "metadata",
                json!({
                    "type": "Dictionary",
                    "value": [
                        { "key": string("FullName"), "value": string(full_name) },
                        { "key": string("PlayType"), "value": string(play_type) },
                    ]
                }),
            ),
        ],
    )
}

/// Script result for set 42 "Genesis" with plays 7 and 9.
pub fn genesis_result() -> Value {
    let set = structure(
        "s.0a1b2c.SetSummary",
        &[
            ("id", uint32(42)),
            ("setName", string("Genesis")),
            (
                "playIDs",
                json!({ "type": "Array", "value": [uint32(7), uint32(9)] }),
            ),
            (
                "editions",
                json!({
                    "type": "Array",
                    "value": [edition(7, false, 100, 1), edition(9, true, 50, 2)],
                }),
            ),
            ("locked", boolean(false)),
        ],
    );

    structure(
        "s.0a1b2c.TopshotSet",
        &[
            ("set", set),
            (
                "plays",
                json!({
                    "type": "Array",
                    "value": [play(7, "A. Player", "Dunk"), play(9, "B. Player", "Block")],
                }),
            ),
        ],
    )
}

//! JSON-Cadence values as returned by the Flow Access API, and the typed
//! decoding of the set query result.
//!
//! Every value on the wire is an object `{"type": <kind>, "value": <payload>}`.
//! Integers and fixed-point numbers travel as decimal strings.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use shared::{
    domain::{PlayId, SetId},
    protocol::{Edition, Play, SetRecord, TopshotSetResult},
};

use crate::error::DecodeError;

const INTEGER_KINDS: &[&str] = &[
    "Int", "Int8", "Int16", "Int32", "Int64", "Int128", "Int256", "UInt", "UInt8", "UInt16",
    "UInt32", "UInt64", "UInt128", "UInt256", "Word8", "Word16", "Word32", "Word64", "Word128",
    "Word256",
];
const FIXED_POINT_KINDS: &[&str] = &["Fix64", "UFix64"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    Struct,
    Resource,
    Event,
    Contract,
    Enum,
}

impl CompositeKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Struct" => Some(Self::Struct),
            "Resource" => Some(Self::Resource),
            "Event" => Some(Self::Event),
            "Contract" => Some(Self::Contract),
            "Enum" => Some(Self::Enum),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CadenceValue {
    Void,
    Optional(Option<Box<CadenceValue>>),
    Bool(bool),
    String(String),
    Character(String),
    Address(String),
    Integer {
        kind: String,
        digits: String,
    },
    FixedPoint {
        kind: String,
        digits: String,
    },
    Array(Vec<CadenceValue>),
    Dictionary(Vec<(CadenceValue, CadenceValue)>),
    Composite {
        kind: CompositeKind,
        id: String,
        fields: Vec<(String, CadenceValue)>,
    },
    /// Paths, capabilities, types and anything else this client never reads.
    Opaque {
        kind: String,
        value: Value,
    },
}

impl CadenceValue {
    pub fn from_json(raw: &Value) -> Result<Self, DecodeError> {
        Self::parse(raw, "$")
    }

    fn parse(raw: &Value, path: &str) -> Result<Self, DecodeError> {
        let object = raw
            .as_object()
            .ok_or_else(|| DecodeError::new(path, "expected a JSON-Cadence object"))?;
        let kind = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| DecodeError::new(path, "missing string field 'type'"))?;
        let payload = object.get("value").unwrap_or(&Value::Null);

        match kind {
            "Void" => Ok(Self::Void),
            "Optional" => {
                if payload.is_null() {
                    Ok(Self::Optional(None))
                } else {
                    let inner = Self::parse(payload, &format!("{path}?"))?;
                    Ok(Self::Optional(Some(Box::new(inner))))
                }
            }
            "Bool" => payload
                .as_bool()
                .map(Self::Bool)
                .ok_or_else(|| DecodeError::new(path, "Bool payload is not a boolean")),
            "String" => string_payload(payload, path, kind).map(Self::String),
            "Character" => string_payload(payload, path, kind).map(Self::Character),
            "Address" => string_payload(payload, path, kind).map(Self::Address),
            k if INTEGER_KINDS.contains(&k) => Ok(Self::Integer {
                kind: k.to_string(),
                digits: string_payload(payload, path, k)?,
            }),
            k if FIXED_POINT_KINDS.contains(&k) => Ok(Self::FixedPoint {
                kind: k.to_string(),
                digits: string_payload(payload, path, k)?,
            }),
            "Array" => {
                let items = payload
                    .as_array()
                    .ok_or_else(|| DecodeError::new(path, "Array payload is not a list"))?;
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| Self::parse(item, &format!("{path}[{index}]")))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Self::Array)
            }
            "Dictionary" => {
                let entries = payload
                    .as_array()
                    .ok_or_else(|| DecodeError::new(path, "Dictionary payload is not a list"))?;
                let mut pairs = Vec::with_capacity(entries.len());
                for (index, entry) in entries.iter().enumerate() {
                    let entry_path = format!("{path}{{{index}}}");
                    let key = entry
                        .get("key")
                        .ok_or_else(|| DecodeError::new(&entry_path, "entry has no 'key'"))?;
                    let value = entry
                        .get("value")
                        .ok_or_else(|| DecodeError::new(&entry_path, "entry has no 'value'"))?;
                    pairs.push((
                        Self::parse(key, &entry_path)?,
                        Self::parse(value, &entry_path)?,
                    ));
                }
                Ok(Self::Dictionary(pairs))
            }
            k => match CompositeKind::from_tag(k) {
                Some(composite) => parse_composite(composite, payload, path),
                None => Ok(Self::Opaque {
                    kind: k.to_string(),
                    value: payload.clone(),
                }),
            },
        }
    }

    /// Wire form, used for script arguments.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Void => json!({ "type": "Void" }),
            Self::Optional(inner) => json!({
                "type": "Optional",
                "value": inner.as_ref().map(|v| v.to_json()),
            }),
            Self::Bool(b) => json!({ "type": "Bool", "value": b }),
            Self::String(s) => json!({ "type": "String", "value": s }),
            Self::Character(s) => json!({ "type": "Character", "value": s }),
            Self::Address(s) => json!({ "type": "Address", "value": s }),
            Self::Integer { kind, digits } | Self::FixedPoint { kind, digits } => {
                json!({ "type": kind, "value": digits })
            }
            Self::Array(items) => json!({
                "type": "Array",
                "value": items.iter().map(Self::to_json).collect::<Vec<_>>(),
            }),
            Self::Dictionary(pairs) => json!({
                "type": "Dictionary",
                "value": pairs
                    .iter()
                    .map(|(k, v)| json!({ "key": k.to_json(), "value": v.to_json() }))
                    .collect::<Vec<_>>(),
            }),
            Self::Composite { kind, id, fields } => json!({
                "type": format!("{kind:?}"),
                "value": {
                    "id": id,
                    "fields": fields
                        .iter()
                        .map(|(name, value)| json!({ "name": name, "value": value.to_json() }))
                        .collect::<Vec<_>>(),
                },
            }),
            Self::Opaque { kind, value } => json!({ "type": kind, "value": value }),
        }
    }

    pub fn uint32(value: u32) -> Self {
        Self::Integer {
            kind: "UInt32".to_string(),
            digits: value.to_string(),
        }
    }

    fn kind_name(&self) -> &str {
        match self {
            Self::Void => "Void",
            Self::Optional(_) => "Optional",
            Self::Bool(_) => "Bool",
            Self::String(_) => "String",
            Self::Character(_) => "Character",
            Self::Address(_) => "Address",
            Self::Integer { kind, .. } | Self::FixedPoint { kind, .. } => kind,
            Self::Array(_) => "Array",
            Self::Dictionary(_) => "Dictionary",
            Self::Composite { .. } => "Composite",
            Self::Opaque { kind, .. } => kind,
        }
    }

    /// Optionals holding a value are read through; `nil` stays as is.
    fn unwrapped(&self) -> &Self {
        match self {
            Self::Optional(Some(inner)) => inner.unwrapped(),
            other => other,
        }
    }
}

fn string_payload(payload: &Value, path: &str, kind: &str) -> Result<String, DecodeError> {
    payload
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DecodeError::new(path, format!("{kind} payload is not a string")))
}

fn parse_composite(
    kind: CompositeKind,
    payload: &Value,
    path: &str,
) -> Result<CadenceValue, DecodeError> {
    let id = payload
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| DecodeError::new(path, "composite has no string 'id'"))?
        .to_string();
    let raw_fields = payload
        .get("fields")
        .and_then(Value::as_array)
        .ok_or_else(|| DecodeError::new(path, "composite has no 'fields' list"))?;

    let mut fields = Vec::with_capacity(raw_fields.len());
    for raw in raw_fields {
        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| DecodeError::new(path, "composite field has no 'name'"))?;
        let field_path = format!("{path}.{name}");
        let value = raw
            .get("value")
            .ok_or_else(|| DecodeError::new(&field_path, "composite field has no 'value'"))?;
        fields.push((name.to_string(), CadenceValue::parse(value, &field_path)?));
    }

    Ok(CadenceValue::Composite { kind, id, fields })
}

/// Read-side view over a decoded value that remembers where it is, so
/// shape errors point at the offending field.
struct Cursor<'a> {
    value: &'a CadenceValue,
    path: String,
}

impl<'a> Cursor<'a> {
    fn root(value: &'a CadenceValue) -> Self {
        Self {
            value: value.unwrapped(),
            path: "$".to_string(),
        }
    }

    fn mismatch(&self, expected: &str) -> DecodeError {
        DecodeError::new(
            &self.path,
            format!("expected {expected}, found {}", self.value.kind_name()),
        )
    }

    fn field(&self, name: &str) -> Result<Cursor<'a>, DecodeError> {
        let CadenceValue::Composite { fields, .. } = self.value else {
            return Err(self.mismatch("a composite"));
        };
        let path = format!("{}.{name}", self.path);
        fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| Cursor {
                value: value.unwrapped(),
                path: path.clone(),
            })
            .ok_or_else(|| DecodeError::new(&path, "field is missing"))
    }

    fn items(&self) -> Result<Vec<Cursor<'a>>, DecodeError> {
        let CadenceValue::Array(items) = self.value else {
            return Err(self.mismatch("an Array"));
        };
        Ok(items
            .iter()
            .enumerate()
            .map(|(index, value)| Cursor {
                value: value.unwrapped(),
                path: format!("{}[{index}]", self.path),
            })
            .collect())
    }

    fn u32(&self) -> Result<u32, DecodeError> {
        let CadenceValue::Integer { digits, .. } = self.value else {
            return Err(self.mismatch("an integer"));
        };
        digits.parse::<u32>().map_err(|e| {
            DecodeError::new(&self.path, format!("integer '{digits}' does not fit u32: {e}"))
        })
    }

    fn bool(&self) -> Result<bool, DecodeError> {
        match self.value {
            CadenceValue::Bool(b) => Ok(*b),
            _ => Err(self.mismatch("a Bool")),
        }
    }

    fn string(&self) -> Result<String, DecodeError> {
        match self.value {
            CadenceValue::String(s) => Ok(s.clone()),
            _ => Err(self.mismatch("a String")),
        }
    }

    fn string_map(&self) -> Result<BTreeMap<String, String>, DecodeError> {
        let CadenceValue::Dictionary(pairs) = self.value else {
            return Err(self.mismatch("a Dictionary"));
        };
        let mut map = BTreeMap::new();
        for (key, value) in pairs {
            let (CadenceValue::String(key), CadenceValue::String(value)) =
                (key.unwrapped(), value.unwrapped())
            else {
                return Err(DecodeError::new(
                    &self.path,
                    "dictionary entries must be String to String",
                ));
            };
            map.insert(key.clone(), value.clone());
        }
        Ok(map)
    }
}

/// Decodes the `TopshotSet` struct returned by the set query script.
pub fn decode_set_result(value: &CadenceValue) -> Result<TopshotSetResult, DecodeError> {
    let root = Cursor::root(value);
    let set = decode_set_record(&root.field("set")?)?;
    let plays = root
        .field("plays")?
        .items()?
        .iter()
        .map(decode_play)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TopshotSetResult { set, plays })
}

fn decode_set_record(cursor: &Cursor<'_>) -> Result<SetRecord, DecodeError> {
    let editions = cursor
        .field("editions")?
        .items()?
        .iter()
        .map(decode_edition)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SetRecord {
        id: SetId(cursor.field("id")?.u32()?),
        set_name: cursor.field("setName")?.string()?,
        editions,
        locked: cursor.field("locked")?.bool()?,
    })
}

fn decode_edition(cursor: &Cursor<'_>) -> Result<Edition, DecodeError> {
    Ok(Edition {
        play_id: PlayId(cursor.field("playID")?.u32()?),
        retired: cursor.field("retired")?.bool()?,
        moment_count: cursor.field("momentCount")?.u32()?,
        play_order: cursor.field("playOrder")?.u32()?,
    })
}

fn decode_play(cursor: &Cursor<'_>) -> Result<Play, DecodeError> {
    Ok(Play {
        play_id: PlayId(cursor.field("playID")?.u32()?),
        metadata: cursor.field("metadata")?.string_map()?,
    })
}

#[cfg(test)]
#[path = "tests/cadence_tests.rs"]
mod tests;

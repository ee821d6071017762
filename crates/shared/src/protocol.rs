use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{PlayId, SetId};

pub const FULL_NAME_KEY: &str = "FullName";
pub const PLAY_TYPE_KEY: &str = "PlayType";

/// Body of `POST /v1/scripts`. Both fields are base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRequest {
    pub script: String,
    #[serde(default)]
    pub arguments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edition {
    #[serde(rename = "playID")]
    pub play_id: PlayId,
    pub retired: bool,
    #[serde(rename = "momentCount")]
    pub moment_count: u32,
    #[serde(rename = "playOrder")]
    pub play_order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    #[serde(rename = "playID")]
    pub play_id: PlayId,
    pub metadata: BTreeMap<String, String>,
}

impl Play {
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRecord {
    pub id: SetId,
    #[serde(rename = "setName")]
    pub set_name: String,
    pub editions: Vec<Edition>,
    pub locked: bool,
}

/// Decoded result of the set query: one set and the whole play catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopshotSetResult {
    pub set: SetRecord,
    pub plays: Vec<Play>,
}

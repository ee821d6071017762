//! Joins a set's editions with the play catalog into table rows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shared::{
    domain::{PlayId, SetId},
    protocol::{Play, SetRecord, TopshotSetResult, FULL_NAME_KEY, PLAY_TYPE_KEY},
};

use crate::error::ViewError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditionStatus {
    Open,
    Retired,
}

impl EditionStatus {
    pub fn from_retired(retired: bool) -> Self {
        if retired {
            Self::Retired
        } else {
            Self::Open
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Retired => "retired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowViewModel {
    pub play_id: PlayId,
    pub status: EditionStatus,
    pub full_name: String,
    pub play_type: String,
    pub total_minted: u32,
    pub play_order: u32,
}

impl RowViewModel {
    pub fn status_label(&self) -> &'static str {
        self.status.label()
    }
}

/// Rows plus the header fields of one set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetView {
    pub set_id: SetId,
    pub set_name: String,
    pub locked: bool,
    pub rows: Vec<RowViewModel>,
}

impl SetView {
    pub fn lock_label(&self) -> &'static str {
        if self.locked {
            "locked set"
        } else {
            "open set"
        }
    }
}

/// One row per edition, in edition order. Fails without partial output when
/// an edition's play is absent from `plays`.
pub fn build_rows(set: &SetRecord, plays: &[Play]) -> Result<Vec<RowViewModel>, ViewError> {
    let mut catalog: HashMap<PlayId, &Play> = HashMap::with_capacity(plays.len());
    for play in plays {
        // first match wins
        catalog.entry(play.play_id).or_insert(play);
    }

    set.editions
        .iter()
        .map(|edition| {
            let play = catalog
                .get(&edition.play_id)
                .ok_or(ViewError::MissingPlayReference {
                    play_id: edition.play_id,
                })?;

            Ok(RowViewModel {
                play_id: edition.play_id,
                status: EditionStatus::from_retired(edition.retired),
                full_name: required_metadata(play, FULL_NAME_KEY)?,
                play_type: required_metadata(play, PLAY_TYPE_KEY)?,
                total_minted: edition.moment_count,
                play_order: edition.play_order,
            })
        })
        .collect()
}

pub fn build_view(result: &TopshotSetResult) -> Result<SetView, ViewError> {
    Ok(SetView {
        set_id: result.set.id,
        set_name: result.set.set_name.clone(),
        locked: result.set.locked,
        rows: build_rows(&result.set, &result.plays)?,
    })
}

fn required_metadata(play: &Play, key: &'static str) -> Result<String, ViewError> {
    play.metadata_value(key)
        .map(str::to_string)
        .ok_or(ViewError::MissingPlayMetadata {
            play_id: play.play_id,
            key,
        })
}

#[cfg(test)]
#[path = "tests/builder_tests.rs"]
mod tests;

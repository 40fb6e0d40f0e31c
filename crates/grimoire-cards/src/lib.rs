//! Card record model and per-set reconciliation.
//!
//! The upstream query tool reports three card shapes ambiguously:
//!
//! - split/flip cards: both halves share one id, reported twice,
//! - double-faced cards: two ids sharing a collector number that differs
//!   only by a trailing `a`/`b`,
//! - basic lands: non-unique identifiers, excluded from reconciliation.
//!
//! [`reconcile_set`] resolves all three in a single forward pass over one
//! set's records and shunts anything it cannot classify onto a malformed
//! list instead of aborting the set.

pub mod reconcile;

pub use reconcile::{reconcile_set, ReconciledSet};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rarity sentinel excluding a record from reconciliation entirely.
pub const BASIC_LAND_RARITY: &str = "Basic Land";

/// How a record relates to the other records of its set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    /// Ordinary single-faced card.
    #[default]
    Normal,
    /// Second report of an id already seen in this set; the record stands
    /// for the whole combined card after the rename.
    SplitOrFlip,
    /// One face of a two-sided card; see `companion_id` for the other.
    DoubleFace,
}

impl Classification {
    pub fn is_normal(&self) -> bool {
        matches!(self, Classification::Normal)
    }
}

/// A localized card name as reported under `alternate_names`.
///
/// Upstream attaches more per-language data than we model; it rides along
/// in `extra` so records survive a round trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedName {
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One card printing as reported by the source, plus the fields the
/// reconciler assigns (`classification`, `companion_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: String,
    pub name: String,
    pub rarity: String,
    /// Printed collector number; absent for some older sets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// Language code → localized name. Only the `de` entry is consulted
    /// (split/flip combined names are systematically present there).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alternate_names: BTreeMap<String, LocalizedName>,
    #[serde(default, skip_serializing_if = "Classification::is_normal")]
    pub classification: Classification,
    /// Set only on `double-face` records; the other face's id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub companion_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Everything else upstream reports, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CardRecord {
    pub fn is_basic_land(&self) -> bool {
        self.rarity == BASIC_LAND_RARITY
    }
}

/// Why a record could not be classified.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("record does not match the expected card shape: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("split/flip rename needs a `de` localized name, none present")]
    MissingGermanName,
}

/// A record routed to the error list, with whatever partial data could be
/// salvaged from the raw value for the operator-facing listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MalformedRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub reason: String,
}

impl MalformedRecord {
    pub fn from_raw(raw: &serde_json::Value, error: &RecordError) -> Self {
        let field = |key: &str| {
            raw.get(key)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };
        Self {
            id: field("id"),
            name: field("name"),
            reason: error.to_string(),
        }
    }

    pub fn from_card(card: &CardRecord, error: &RecordError) -> Self {
        Self {
            id: Some(card.id.clone()),
            name: Some(card.name.clone()),
            reason: error.to_string(),
        }
    }
}

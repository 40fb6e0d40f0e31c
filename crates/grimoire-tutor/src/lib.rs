//! Record source for Grimoire: the external `tutor` query tool.
//!
//! Every query shells out as `tutor --format json <args…>` and parses the
//! JSON the tool prints. This is a pull-once boundary: a spawn failure, a
//! non-zero exit, or unparseable output fails the whole call, and the
//! caller gets no partial data. There is no retry logic here; upstream
//! failures are treated as fatal for the current set.

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One entry of a per-set listing (`tutor set <name>`).
///
/// The listing only guarantees an id; the full record comes from a
/// follow-up `card` query.
#[derive(Debug, Clone, Deserialize)]
pub struct SetEntry {
    pub id: String,
}

/// Handle on a `tutor` executable.
#[derive(Debug, Clone)]
pub struct TutorClient {
    binary: PathBuf,
}

impl TutorClient {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// All set names known upstream.
    pub fn sets(&self) -> Result<Vec<String>> {
        self.query(&["sets"])
    }

    /// The per-set listing: one entry per printing, in upstream order.
    pub fn set_list(&self, set_name: &str) -> Result<Vec<SetEntry>> {
        self.query(&["set", set_name])
    }

    /// One full raw card record.
    ///
    /// Kept as a raw JSON value: classification happens downstream, and a
    /// structurally bad record must reach the reconciler rather than fail
    /// the whole set here.
    pub fn card(&self, card_id: &str) -> Result<serde_json::Value> {
        self.query(&["card", card_id])
    }

    /// Fetch every full record of a set, preserving listing order.
    ///
    /// Order matters downstream: split/flip and double-face detection are
    /// defined in terms of records already seen while scanning.
    pub fn cards_in_set(&self, set_name: &str) -> Result<Vec<serde_json::Value>> {
        let entries = self.set_list(set_name)?;
        entries
            .iter()
            .map(|entry| {
                self.card(&entry.id)
                    .with_context(|| format!("in set `{set_name}`"))
            })
            .collect()
    }

    fn query<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T> {
        let out = Command::new(&self.binary)
            .arg("--format")
            .arg("json")
            .args(args)
            .output()
            .with_context(|| {
                format!(
                    "failed to run `{} --format json {}`",
                    self.binary.display(),
                    args.join(" ")
                )
            })?;

        if !out.status.success() {
            return Err(anyhow!(
                "tutor {} failed:\n{}",
                args.join(" "),
                String::from_utf8_lossy(&out.stderr)
            ));
        }

        let stdout = String::from_utf8_lossy(&out.stdout);
        serde_json::from_str(stdout.trim())
            .with_context(|| format!("tutor {} printed unparseable JSON", args.join(" ")))
    }
}

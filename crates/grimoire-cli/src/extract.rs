//! `grimoire extract`: scrape sets, reconcile, write the collection.
//!
//! Per-set fetch failures are fatal (no partial set output); individual
//! malformed records are not — they accumulate across sets and are listed
//! once at the end of the run, sorted by id.

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use grimoire_cards::{reconcile_set, CardRecord, MalformedRecord};
use grimoire_tutor::TutorClient;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

pub fn cmd_extract(set_names: &[String], out: &Path, tutor_bin: &Path) -> Result<()> {
    let client = TutorClient::new(tutor_bin);
    let all_sets = client
        .sets()
        .context("failed to list sets upstream")?;

    for name in set_names {
        if !all_sets.iter().any(|s| s == name) {
            return Err(anyhow!(
                "unknown set `{name}` (doublecheck your arguments)"
            ));
        }
    }
    let targets: Vec<String> = if set_names.is_empty() {
        all_sets
    } else {
        set_names.to_vec()
    };

    println!(
        "{} sets={} out={}",
        "Extract".green().bold(),
        targets.len(),
        out.display()
    );

    let run_started = Instant::now();
    let mut cards: BTreeMap<String, CardRecord> = BTreeMap::new();
    let mut malformed: Vec<MalformedRecord> = Vec::new();

    for set_name in &targets {
        let started = Instant::now();
        let records = client
            .cards_in_set(set_name)
            .with_context(|| format!("failed to query set `{set_name}`"))?;
        let fetched = records.len();

        let set = reconcile_set(records);
        println!(
            "  {} {set_name}: records={fetched} cards={} malformed={} elapsed={:.2?}",
            "→".yellow(),
            set.cards.len(),
            set.malformed.len(),
            started.elapsed()
        );

        // Plain union: id uniqueness across sets is upstream's contract.
        cards.extend(set.cards);
        malformed.extend(set.malformed);
    }

    // BTreeMap keys keep the document sorted by id.
    fs::write(out, serde_json::to_string_pretty(&cards)?)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!("  {} {}", "→".cyan(), out.display());

    sort_malformed(&mut malformed);
    if !malformed.is_empty() {
        println!("{}", "Records that could not be classified:".red().bold());
        for record in &malformed {
            println!(
                "  {} id={} name={} ({})",
                "✗".red(),
                record.id.as_deref().unwrap_or("<missing>"),
                record.name.as_deref().unwrap_or("<missing>"),
                record.reason
            );
        }
    }

    println!(
        "{} cards={} malformed={} total_elapsed={:.2?}",
        "Done".green().bold(),
        cards.len(),
        malformed.len(),
        run_started.elapsed()
    );

    Ok(())
}

/// Order the final listing by id; entries with no salvageable id sort
/// first (they have no stable key to sort under).
fn sort_malformed(malformed: &mut [MalformedRecord]) {
    malformed.sort_by(|a, b| a.id.cmp(&b.id));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: Option<&str>) -> MalformedRecord {
        MalformedRecord {
            id: id.map(|s| s.to_string()),
            name: None,
            reason: "test".to_string(),
        }
    }

    #[test]
    fn malformed_listing_sorts_by_id_with_missing_first() {
        let mut listing = vec![entry(Some("b")), entry(None), entry(Some("a"))];
        sort_malformed(&mut listing);
        let ids: Vec<Option<&str>> = listing.iter().map(|m| m.id.as_deref()).collect();
        assert_eq!(ids, vec![None, Some("a"), Some("b")]);
    }
}

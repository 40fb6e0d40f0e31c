//! `grimoire images`: download card images for a written collection.

use anyhow::{Context, Result};
use colored::Colorize;
use grimoire_cards::CardRecord;
use grimoire_images::{card_image_path, FetchOutcome, ImageFetcher};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

pub fn cmd_images(
    input: &Path,
    out_dir: &Path,
    timeout_secs: u64,
    user_agent: &str,
) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read collection: {}", input.display()))?;
    let cards: BTreeMap<String, CardRecord> = serde_json::from_str(&text)
        .with_context(|| format!("not a cards collection: {}", input.display()))?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let fetcher = ImageFetcher::new(user_agent, timeout_secs)?;

    println!(
        "{} cards={} out={}",
        "Images".green().bold(),
        cards.len(),
        out_dir.display()
    );
    let started = Instant::now();
    let mut stored = 0usize;
    let mut skipped = 0usize;

    // BTreeMap iteration gives the id-ordered download pass.
    for card in cards.values() {
        let Some(url) = card.image_url.as_deref() else {
            skipped += 1;
            continue;
        };
        let dest = card_image_path(out_dir, card);
        match fetcher.fetch(url, &dest)? {
            FetchOutcome::Stored => {
                println!("Wrote {}.", dest.display());
                stored += 1;
            }
            FetchOutcome::Skipped(_) => skipped += 1,
        }
    }

    println!(
        "{} stored={stored} skipped={skipped} elapsed={:.2?}",
        "Done".green().bold(),
        started.elapsed()
    );

    Ok(())
}

//! Grimoire CLI
//!
//! Unified command-line interface for:
//! - Scraping card sets through the external `tutor` query tool and
//!   reconciling them into one `cards.json` collection (`extract`)
//! - Downloading card images for a previously written collection (`images`)

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod extract;
mod images;

#[derive(Parser)]
#[command(name = "grimoire")]
#[command(
    author,
    version,
    about = "Grimoire: card database scraper and image downloader"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape sets via `tutor`, reconcile them, and write `cards.json`.
    ///
    /// With no set names, every set reported upstream is scraped. Unknown
    /// set names fail up front, before any scraping starts.
    Extract {
        /// Set names to scrape (empty = all sets).
        sets: Vec<String>,

        /// Output collection path.
        #[arg(short, long, default_value = "cards.json")]
        out: PathBuf,

        /// Path to the `tutor` executable.
        #[arg(long, default_value = "bin/tutor")]
        tutor_bin: PathBuf,
    },

    /// Download card images for a written collection.
    ///
    /// Images land at `<out_dir>/<id>_<name>.jpg`, one fetch per card,
    /// in id order. Non-2xx responses are skipped.
    Images {
        /// Path of the cards collection JSON.
        input: PathBuf,

        /// Output directory for image files.
        out_dir: PathBuf,

        /// Per-request timeout in seconds.
        #[arg(long, default_value_t = grimoire_images::DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,

        /// HTTP User-Agent.
        #[arg(long, default_value = grimoire_images::DEFAULT_USER_AGENT)]
        user_agent: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            sets,
            out,
            tutor_bin,
        } => extract::cmd_extract(&sets, &out, &tutor_bin),
        Commands::Images {
            input,
            out_dir,
            timeout_secs,
            user_agent,
        } => images::cmd_images(&input, &out_dir, timeout_secs, &user_agent),
    }
}

use crate::output::print_json;
use anyhow::Context;
use cadence_core::config::Config;
use cadence_core::rollover;
use chrono::{DateTime, Utc};
use std::path::Path;

pub fn run(root: &Path, user: Option<&str>, now: DateTime<Utc>, json: bool) -> anyhow::Result<()> {
    // Re-derive the reference timezone on every run; never cache across runs.
    let tz = Config::load(root).context("failed to load config")?.timezone();

    match user {
        Some(user) => {
            let outcome = rollover::run_user(root, user, now, tz)
                .with_context(|| format!("rollover failed for '{user}'"))?;
            if json {
                print_json(&outcome)?;
            } else {
                println!("{user}: {outcome:?}");
            }
        }
        None => {
            let summary = rollover::run_all(root, now, tz).context("rollover batch failed")?;
            if json {
                print_json(&summary)?;
            } else {
                println!(
                    "Rollover complete: {} processed, {} skipped, {} errors",
                    summary.processed, summary.skipped, summary.errors
                );
            }
            if summary.errors > 0 {
                anyhow::bail!("{} user(s) failed to roll over", summary.errors);
            }
        }
    }
    Ok(())
}

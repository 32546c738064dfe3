use crate::output::{print_json, print_table};
use anyhow::Context;
use cadence_core::config::Config;
use cadence_core::roster;
use cadence_core::week::WeekId;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::str::FromStr;

pub fn run(
    root: &Path,
    cohort: &str,
    week: Option<&str>,
    now: DateTime<Utc>,
    json: bool,
) -> anyhow::Result<()> {
    let tz = Config::load(root).context("failed to load config")?.timezone();
    let week = match week {
        Some(w) => WeekId::from_str(w)?,
        None => WeekId::of(now, tz),
    };

    let entries = roster::roster(root, cohort, week, now, tz)
        .with_context(|| format!("failed to build roster for '{cohort}'"))?;

    if json {
        print_json(&entries)?;
        return Ok(());
    }
    if entries.is_empty() {
        println!("No users in cohort '{cohort}'.");
        return Ok(());
    }
    println!("Cohort {cohort} — week {week}");
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                e.user.clone(),
                if e.requirement_met { "met" } else { "unmet" }.to_string(),
                e.completed.to_string(),
                e.active.to_string(),
                e.missed.to_string(),
                e.consecutive_missed_weeks.to_string(),
                e.nudge.level.to_string(),
            ]
        })
        .collect();
    print_table(
        &["USER", "REQ", "DONE", "ACTIVE", "MISSED", "RUN", "NUDGE"],
        rows,
    );
    Ok(())
}

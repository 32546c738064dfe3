use crate::output::{print_json, print_table};
use anyhow::Context;
use cadence_core::config::Config;
use cadence_core::week::WeekId;
use cadence_core::{rep, stats};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::str::FromStr;

pub fn run(
    root: &Path,
    user: &str,
    week: Option<&str>,
    cohort: Option<&str>,
    now: DateTime<Utc>,
    json: bool,
) -> anyhow::Result<()> {
    let tz = Config::load(root).context("failed to load config")?.timezone();
    let week = match week {
        Some(w) => WeekId::from_str(w)?,
        None => WeekId::of(now, tz),
    };

    // Expired deadlines must show as missed.
    rep::sweep_overdue(root, user, cohort, now, tz)?;
    let status = stats::status_for(root, user, week, cohort, tz)?;

    if json {
        print_json(&status)?;
        return Ok(());
    }

    println!("Week {} ({} .. {})", status.week, status.start, status.end);
    println!(
        "Requirement met: {}",
        if status.requirement_met { "yes" } else { "no" }
    );
    println!(
        "Committed {}  Completed {}  Active {}  Missed {}  Canceled {}",
        status.total_committed,
        status.total_completed,
        status.total_active,
        status.total_missed,
        status.total_canceled
    );
    if !status.reps.is_empty() {
        let rows: Vec<Vec<String>> = status
            .reps
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.status.to_string(),
                    r.kind.to_string(),
                    r.person.clone(),
                ]
            })
            .collect();
        print_table(&["ID", "STATUS", "KIND", "PERSON"], rows);
    }
    Ok(())
}

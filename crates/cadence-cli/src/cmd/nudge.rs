use crate::output::print_json;
use anyhow::Context;
use cadence_core::config::Config;
use cadence_core::week::WeekId;
use cadence_core::{nudge, rep, stats};
use chrono::{DateTime, Utc};
use std::path::Path;

pub fn run(
    root: &Path,
    user: &str,
    cohort: Option<&str>,
    now: DateTime<Utc>,
    json: bool,
) -> anyhow::Result<()> {
    let tz = Config::load(root).context("failed to load config")?.timezone();
    let week = WeekId::of(now, tz);

    rep::sweep_overdue(root, user, cohort, now, tz)?;
    let status = stats::status_for(root, user, week, cohort, tz)?;
    let missed_run = stats::consecutive_missed_weeks(root, user, cohort)?;
    let nudge = nudge::decide(now, tz, &status, missed_run);

    if json {
        print_json(&nudge)?;
    } else {
        println!("[{}] {}", nudge.level, nudge.message);
    }
    Ok(())
}

use crate::output::{print_json, print_table};
use anyhow::Context;
use cadence_core::config::Config;
use cadence_core::rep::{self, NewRep, Rep, RepPatch};
use cadence_core::types::RepKind;
use cadence_core::week::WeekId;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum RepSubcommand {
    /// Commit a new rep for the current week
    Commit {
        user: String,
        /// Who the action is directed at
        #[arg(long)]
        person: String,
        /// Rep kind (feedback, recognition, hard_conversation, delegation,
        /// coaching_question, boundary)
        #[arg(long)]
        kind: String,
        #[arg(long)]
        cohort: String,
        /// Override the default Saturday deadline (RFC 3339)
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List a user's reps
    List {
        user: String,
        /// Restrict to a week id (e.g. 2026-W35)
        #[arg(long)]
        week: Option<String>,
        #[arg(long)]
        cohort: Option<String>,
    },
    /// Show a single rep
    Show { user: String, id: String },
    /// Edit a non-terminal rep
    Update {
        user: String,
        id: String,
        #[arg(long)]
        person: Option<String>,
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Mark a rep completed
    Complete { user: String, id: String },
    /// Cancel a rep (reason required)
    Cancel {
        user: String,
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// Create a new rep in the current week from a missed one
    RollForward {
        user: String,
        id: String,
        #[arg(long)]
        cohort: String,
    },
    /// Mark overdue active reps as missed
    Sweep {
        user: String,
        #[arg(long)]
        cohort: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: RepSubcommand, now: DateTime<Utc>, json: bool) -> anyhow::Result<()> {
    let tz = Config::load(root).context("failed to load config")?.timezone();

    match subcmd {
        RepSubcommand::Commit {
            user,
            person,
            kind,
            cohort,
            deadline,
            notes,
        } => {
            let new = NewRep {
                person,
                kind: RepKind::from_str(&kind)?,
                cohort,
                deadline: deadline.as_deref().map(parse_deadline).transpose()?,
                notes,
                rolled_forward_from: None,
            };
            let rep = rep::commit(root, &user, new, now, tz)
                .with_context(|| format!("failed to commit rep for '{user}'"))?;
            if json {
                print_json(&rep)?;
            } else {
                println!("Committed rep {} ({} → {})", rep.id, rep.kind, rep.person);
                println!("Due {} (week {})", rep.deadline, rep.week);
            }
        }
        RepSubcommand::List { user, week, cohort } => {
            let reps = match week {
                Some(w) => {
                    let week = WeekId::from_str(&w)?;
                    Rep::list_week(root, &user, week, cohort.as_deref())?
                }
                None => {
                    let mut all = Rep::list(root, &user)?;
                    if let Some(c) = cohort.as_deref() {
                        all.retain(|r| r.cohort == c);
                    }
                    all
                }
            };
            list(&reps, json)?;
        }
        RepSubcommand::Show { user, id } => {
            let rep = Rep::load(root, &user, &id)?;
            if json {
                print_json(&rep)?;
            } else {
                println!("Rep {} — {} → {}", rep.id, rep.kind, rep.person);
                println!("Status: {}", rep.status);
                println!("Week: {}  Due: {}", rep.week, rep.deadline);
                if let Some(notes) = &rep.notes {
                    println!("Notes: {notes}");
                }
                if let Some(reason) = &rep.cancel_reason {
                    println!("Cancel reason: {reason}");
                }
                if let Some(from) = &rep.rolled_forward_from {
                    println!("Rolled forward from: {from}");
                }
            }
        }
        RepSubcommand::Update {
            user,
            id,
            person,
            kind,
            deadline,
            notes,
        } => {
            let patch = RepPatch {
                person,
                kind: kind.as_deref().map(RepKind::from_str).transpose()?,
                deadline: deadline.as_deref().map(parse_deadline).transpose()?,
                notes,
            };
            let rep = rep::update(root, &user, &id, patch, now)?;
            if json {
                print_json(&rep)?;
            } else {
                println!("Updated rep {}", rep.id);
            }
        }
        RepSubcommand::Complete { user, id } => {
            let rep = rep::complete(root, &user, &id, now, tz)?;
            if json {
                print_json(&rep)?;
            } else {
                println!("Completed rep {} ({} → {})", rep.id, rep.kind, rep.person);
            }
        }
        RepSubcommand::Cancel { user, id, reason } => {
            let rep = rep::cancel(root, &user, &id, &reason, now, tz)?;
            if json {
                print_json(&rep)?;
            } else {
                println!("Canceled rep {}", rep.id);
            }
        }
        RepSubcommand::RollForward { user, id, cohort } => {
            let rep = rep::roll_forward(root, &user, &id, &cohort, now, tz)?;
            if json {
                print_json(&rep)?;
            } else {
                println!("Rolled forward into {} (week {})", rep.id, rep.week);
            }
        }
        RepSubcommand::Sweep { user, cohort } => {
            let swept = rep::sweep_overdue(root, &user, cohort.as_deref(), now, tz)?;
            if json {
                print_json(&swept)?;
            } else if swept.is_empty() {
                println!("Nothing overdue.");
            } else {
                println!("Marked {} rep(s) missed:", swept.len());
                for id in swept {
                    println!("  {id}");
                }
            }
        }
    }
    Ok(())
}

fn parse_deadline(s: &str) -> anyhow::Result<DateTime<Utc>> {
    let dt = DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("invalid deadline '{s}': expected RFC 3339"))?;
    Ok(dt.with_timezone(&Utc))
}

fn list(reps: &[Rep], json: bool) -> anyhow::Result<()> {
    if json {
        print_json(&reps)?;
        return Ok(());
    }
    if reps.is_empty() {
        println!("No reps.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = reps
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.week.to_string(),
                r.status.to_string(),
                r.kind.to_string(),
                r.person.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "WEEK", "STATUS", "KIND", "PERSON"], rows);
    Ok(())
}

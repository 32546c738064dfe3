use crate::output::print_json;
use anyhow::Context;
use cadence_core::config::Config;
use cadence_core::practice::{self, PracticeState};
use cadence_core::week;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum DaySubcommand {
    /// Show today's practice document, or an archived day
    Show {
        /// Archived date to show (YYYY-MM-DD) instead of today
        #[arg(long)]
        date: Option<String>,
    },
    /// Set the morning priority
    Plan { priority: String },
    /// Add a secondary task (max 5)
    WinAdd { text: String },
    /// Mark a secondary task done
    WinDone { id: String },
    /// Add a daily leadership commitment
    RepAdd { text: String },
    /// Mark a daily commitment as committed (terminal)
    RepCommit { id: String },
    /// Record the evening reflection
    Reflect {
        #[arg(long, default_value = "")]
        well: String,
        #[arg(long, default_value = "")]
        hard: String,
        #[arg(long, default_value = "")]
        tomorrow: String,
    },
    /// Log the grounding rep for today
    Ground,
    /// Record a scorecard tally for a category
    Score {
        category: String,
        done: u32,
        total: u32,
    },
}

pub fn run(
    root: &Path,
    user: &str,
    subcmd: DaySubcommand,
    now: DateTime<Utc>,
    json: bool,
) -> anyhow::Result<()> {
    let tz = Config::load(root).context("failed to load config")?.timezone();
    let today = week::local_date(now, tz);
    let mut state = PracticeState::load_or_new(root, user, today)?;

    match subcmd {
        DaySubcommand::Show { date } => {
            let shown = match date {
                Some(d) => {
                    let d = week::parse_date(&d)?;
                    practice::archive_load(root, user, d)?
                        .with_context(|| format!("no archived day for '{user}' on {d}"))?
                }
                None => state,
            };
            if json {
                print_json(&shown)?;
            } else {
                println!("Day {} — streak {}", shown.date, shown.streak);
                if !shown.morning.priority.is_empty() {
                    let done = if shown.morning.priority_done { "x" } else { " " };
                    println!("Priority [{done}] {}", shown.morning.priority);
                }
                for win in &shown.morning.wins {
                    let done = if win.done { "x" } else { " " };
                    println!("  [{done}] {}  ({})", win.text, win.id);
                }
                for rep in &shown.day_reps {
                    println!("  rep [{}] {}  ({})", rep.status, rep.text, rep.id);
                }
            }
            return Ok(());
        }
        DaySubcommand::Plan { priority } => {
            state.set_priority(priority);
        }
        DaySubcommand::WinAdd { text } => {
            let win = state
                .add_win(text)
                .context("the morning plan already has 5 secondary tasks")?;
            if json {
                print_json(win)?;
            } else {
                println!("Added win {}", win.id);
            }
        }
        DaySubcommand::WinDone { id } => {
            if !state.complete_win(&id) {
                anyhow::bail!("no win with id '{id}' today");
            }
        }
        DaySubcommand::RepAdd { text } => {
            let rep = state.add_day_rep(text);
            if json {
                print_json(rep)?;
            } else {
                println!("Added rep {}", rep.id);
            }
        }
        DaySubcommand::RepCommit { id } => {
            if !state.commit_day_rep(&id) {
                anyhow::bail!("no daily rep with id '{id}' today");
            }
        }
        DaySubcommand::Reflect {
            well,
            hard,
            tomorrow,
        } => {
            state.set_reflection(&well, &hard, &tomorrow);
        }
        DaySubcommand::Ground => {
            state.grounding_done = true;
        }
        DaySubcommand::Score {
            category,
            done,
            total,
        } => {
            state.record_score(&category, done, total);
        }
    }

    state.save(root, user)?;
    Ok(())
}

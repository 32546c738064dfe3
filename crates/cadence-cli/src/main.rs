mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{day::DaySubcommand, rep::RepSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cadence",
    about = "Coaching accountability engine: weekly reps, daily bookends, streaks, and nudges",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data root (default: ~/.cadence)
    #[arg(long, global = true, env = "CADENCE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data root with a default config
    Init,

    /// Manage weekly reps
    Rep {
        #[command(subcommand)]
        subcommand: RepSubcommand,
    },

    /// Show a user's weekly status (sweeps overdue reps first)
    Week {
        user: String,
        /// Week id (e.g. 2026-W35); defaults to the current week
        #[arg(long)]
        week: Option<String>,
        /// Restrict to a cohort
        #[arg(long)]
        cohort: Option<String>,
    },

    /// Compute the current nudge for a user
    Nudge {
        user: String,
        /// Restrict to a cohort
        #[arg(long)]
        cohort: Option<String>,
    },

    /// Coach view: weekly status and nudges across a cohort
    Roster {
        cohort: String,
        /// Week id; defaults to the current week
        #[arg(long)]
        week: Option<String>,
    },

    /// Run the daily rollover batch (scheduler entry point)
    Rollover {
        /// Roll a single user instead of everyone
        #[arg(long)]
        user: Option<String>,
    },

    /// Edit today's practice document (bookends)
    Day {
        user: String,
        #[command(subcommand)]
        subcommand: DaySubcommand,
    },

    /// Show a user's streak and its recent history
    Streak { user: String },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Rollover { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let now = chrono::Utc::now();

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Rep { subcommand } => cmd::rep::run(&root, subcommand, now, cli.json),
        Commands::Week { user, week, cohort } => {
            cmd::week::run(&root, &user, week.as_deref(), cohort.as_deref(), now, cli.json)
        }
        Commands::Nudge { user, cohort } => {
            cmd::nudge::run(&root, &user, cohort.as_deref(), now, cli.json)
        }
        Commands::Roster { cohort, week } => {
            cmd::roster::run(&root, &cohort, week.as_deref(), now, cli.json)
        }
        Commands::Rollover { user } => cmd::rollover::run(&root, user.as_deref(), now, cli.json),
        Commands::Day { user, subcommand } => cmd::day::run(&root, &user, subcommand, now, cli.json),
        Commands::Streak { user } => cmd::streak::run(&root, &user, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

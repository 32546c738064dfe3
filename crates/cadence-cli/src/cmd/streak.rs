use crate::output::{print_json, print_table};
use cadence_core::practice::PracticeState;
use std::path::Path;

pub fn run(root: &Path, user: &str, json: bool) -> anyhow::Result<()> {
    let Some(state) = PracticeState::load(root, user)? else {
        println!("No practice data for '{user}'.");
        return Ok(());
    };

    if json {
        let view = serde_json::json!({
            "streak": state.streak,
            "last_streak_date": state.last_streak_date,
            "history": state.streak_history,
        });
        print_json(&view)?;
        return Ok(());
    }

    println!("Current streak: {}", state.streak);
    if let Some(date) = state.last_streak_date {
        println!("Last qualifying day: {date}");
    }
    if !state.streak_history.is_empty() {
        let rows: Vec<Vec<String>> = state
            .streak_history
            .iter()
            .rev()
            .map(|e| {
                vec![
                    e.date.to_string(),
                    e.streak.to_string(),
                    if e.did_activity { "yes" } else { "no" }.to_string(),
                    if e.weekend { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect();
        print_table(&["DATE", "STREAK", "ACTIVITY", "WEEKEND"], rows);
    }
    Ok(())
}

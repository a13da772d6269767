//! The `classroom leaderboard` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use classroom_core::ScoreBoard;

use crate::config::load_config_from;

pub fn execute(format: String, limit: Option<usize>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let limit = limit.unwrap_or(config.leaderboard_limit);
    anyhow::ensure!(limit >= 1, "limit must be at least 1");

    let board = ScoreBoard::open(&config.scores_path());

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&board.top(limit))?);
        }
        "markdown" | "md" => {
            print!("{}", board.to_markdown(Some(limit)));
        }
        _ => print_table(&board, limit),
    }

    Ok(())
}

/// Print the top `limit` entries as a table, or a note when nothing is recorded.
pub(crate) fn print_table(board: &ScoreBoard, limit: usize) {
    if board.is_empty() {
        println!("No scores recorded yet.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Rank",
        "Player",
        "Score",
        "Questions",
        "Accuracy %",
        "Date",
    ]);
    for entry in board.top(limit) {
        let r = entry.result;
        table.add_row(vec![
            Cell::new(entry.rank),
            Cell::new(&r.player),
            Cell::new(r.score),
            Cell::new(r.total_questions),
            Cell::new(format!("{:.1}%", r.accuracy)),
            Cell::new(r.display_date()),
        ]);
    }
    println!("LEADERBOARD\n{table}");
}

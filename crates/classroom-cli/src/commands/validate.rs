//! The `classroom validate-questions` command.

use std::path::PathBuf;

use anyhow::Result;

use classroom_core::questions::{load_question_bank, validate_question_bank};

pub fn execute(file: PathBuf) -> Result<()> {
    let questions = load_question_bank(&file)?;
    println!(
        "Question bank: {} ({} questions)",
        file.display(),
        questions.len()
    );

    let warnings = validate_question_bank(&questions);
    for w in &warnings {
        let prefix = w
            .question
            .map(|n| format!("  [#{n}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Question bank is valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}

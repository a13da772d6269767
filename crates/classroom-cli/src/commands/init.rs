//! The `classroom init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("classroom.toml").exists() {
        println!("classroom.toml already exists, skipping.");
    } else {
        std::fs::write("classroom.toml", SAMPLE_CONFIG)?;
        println!("Created classroom.toml");
    }

    let bank_path = std::path::Path::new("questions.toml");
    if bank_path.exists() {
        println!("questions.toml already exists, skipping.");
    } else {
        std::fs::write(bank_path, SAMPLE_QUESTIONS)?;
        println!("Created questions.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: classroom validate-questions --file questions.toml");
    println!("  2. Set questions_file = \"questions.toml\" in classroom.toml to use it");
    println!("  3. Run: classroom quiz --name <your name>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# classroom configuration

# Where quiz scores and student records are stored.
data_dir = "."
scores_file = "quiz_scores.json"
students_file = "students.json"

# Custom question bank (built-in questions are used when unset).
# questions_file = "questions.toml"

# Write the GPA-sorted order back to students.json.
persist_sort = false

leaderboard_limit = 10
"#;

const SAMPLE_QUESTIONS: &str = r#"[[questions]]
prompt = "Which keyword declares a constant?"
options = ["let", "const", "static", "mut"]
answer = 1
time_limit_secs = 12

[[questions]]
prompt = "Which macro formats a String without printing it?"
options = ["println!", "write!", "format!", "print!"]
answer = 2
time_limit_secs = 15

[[questions]]
prompt = "What does Option::None represent?"
options = ["An error", "The absence of a value", "A null pointer", "Zero"]
answer = 1
time_limit_secs = 10
"#;

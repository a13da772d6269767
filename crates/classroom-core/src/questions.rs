//! Question banks: the built-in set and TOML bank files.
//!
//! A bank file looks like:
//!
//! ```toml
//! [[questions]]
//! prompt = "Which keyword declares an immutable binding?"
//! options = ["let", "mut", "const fn", "static mut"]
//! answer = 0
//! time_limit_secs = 12
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::Question;

/// Default countdown when a bank entry omits `time_limit_secs`.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 15;

#[derive(Debug, Deserialize)]
struct TomlBankFile {
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    prompt: String,
    options: Vec<String>,
    answer: usize,
    #[serde(default = "default_time_limit")]
    time_limit_secs: u32,
}

fn default_time_limit() -> u32 {
    DEFAULT_TIME_LIMIT_SECS
}

/// The fixed set of questions used when no bank file is configured.
pub fn builtin_questions() -> Vec<Question> {
    const BANK: &[(&str, [&str; 4], usize, u32)] = &[
        (
            "What is the size of an i32 in Rust?",
            ["16 bits", "32 bits", "64 bits", "8 bits"],
            1,
            15,
        ),
        (
            "Which keyword makes a binding mutable?",
            ["var", "mut", "let", "ref"],
            1,
            15,
        ),
        (
            "What does bool::default() return?",
            ["true", "false", "None", "0"],
            1,
            12,
        ),
        (
            "Which std collection rejects duplicate elements?",
            ["Vec", "VecDeque", "HashSet", "HashMap"],
            2,
            15,
        ),
        (
            "Which trait does every type that can be formatted with {:?} implement?",
            ["Display", "Debug", "Clone", "Default"],
            1,
            12,
        ),
        (
            "Which operator compares two values for equality?",
            ["=", "==", "eq!", "=>"],
            1,
            10,
        ),
        (
            "What does the ? operator do with an Err value?",
            [
                "Returns it early from the function",
                "Panics",
                "Ignores it",
                "Converts it to None",
            ],
            0,
            15,
        ),
        (
            "Which loop form has no condition and runs until a break?",
            ["for", "while", "loop", "while let"],
            2,
            12,
        ),
        (
            "What is the value of 5 / 2 with i32 operands?",
            ["2.5", "2", "3", "2.0"],
            1,
            15,
        ),
        (
            "Which visibility is the default for a struct field?",
            ["pub", "pub(crate)", "private", "pub(super)"],
            2,
            12,
        ),
    ];

    BANK.iter()
        .filter_map(|(prompt, options, answer, limit)| {
            let options = options.iter().map(|o| o.to_string()).collect();
            Question::new(*prompt, options, *answer, *limit).ok()
        })
        .collect()
}

/// Parse a TOML question bank from a file.
pub fn load_question_bank(path: &Path) -> Result<Vec<Question>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_question_bank_str(&content, path)
}

/// Parse a TOML question bank from a string.
pub fn parse_question_bank_str(content: &str, source_path: &Path) -> Result<Vec<Question>> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| {
            Question::new(q.prompt, q.options, q.answer, q.time_limit_secs)
                .with_context(|| format!("question {} in {}", i + 1, source_path.display()))
        })
        .collect()
}

/// A non-fatal issue found in a question bank.
#[derive(Debug, Clone)]
pub struct BankWarning {
    /// 1-based position of the question, if the warning is about one.
    pub question: Option<usize>,
    pub message: String,
}

/// Check a bank for issues that don't prevent a quiz from running.
pub fn validate_question_bank(questions: &[Question]) -> Vec<BankWarning> {
    let mut warnings = Vec::new();

    if questions.is_empty() {
        warnings.push(BankWarning {
            question: None,
            message: "bank contains no questions".into(),
        });
    }

    let mut seen = std::collections::HashSet::new();
    for (i, q) in questions.iter().enumerate() {
        if !seen.insert(q.prompt().trim().to_lowercase()) {
            warnings.push(BankWarning {
                question: Some(i + 1),
                message: format!("duplicate prompt: {}", q.prompt()),
            });
        }
    }

    for (i, q) in questions.iter().enumerate() {
        let mut options: Vec<&str> = q.options().iter().map(|o| o.trim()).collect();
        options.sort_unstable();
        options.dedup();
        if options.len() < q.options().len() {
            warnings.push(BankWarning {
                question: Some(i + 1),
                message: "options are not all distinct".into(),
            });
        }
    }

    warnings
}

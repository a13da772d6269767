//! The `classroom quiz` command.

use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use classroom_core::questions::{builtin_questions, load_question_bank};
use classroom_core::session::{Advance, AnswerFeedback, TickOutcome};
use classroom_core::{QuizResult, QuizSession, ScoreBoard, SessionError};

use crate::config::load_config_from;

/// Seconds left at which the countdown starts being printed.
const COUNTDOWN_WARNING_SECS: u32 = 5;

pub async fn execute(name: String, seed: Option<u64>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let questions = match &config.questions_file {
        Some(path) => load_question_bank(path)?,
        None => builtin_questions(),
    };
    let mut session = QuizSession::new(&name, questions)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    print_rules();
    session.start(&mut rng)?;
    show_question(&session);

    let mut input = spawn_line_reader();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    // Ticks and answers are handled on this one task, so they never interleave.
    let result = loop {
        tokio::select! {
            _ = ticker.tick() => {
                match session.tick()? {
                    TickOutcome::Running { time_remaining } => {
                        if time_remaining <= COUNTDOWN_WARNING_SECS {
                            println!("  {time_remaining}s left");
                        }
                    }
                    TickOutcome::TimedOut { index, score, next, .. } => {
                        let question = &session.questions()[index];
                        println!(
                            "Time's up! -1 point. The answer was: {} (score: {score})",
                            question.correct_option()
                        );
                        match next {
                            Advance::NextQuestion { .. } => {
                                show_question(&session);
                                ticker.reset();
                            }
                            Advance::Finished(result) => break result,
                        }
                    }
                }
            }
            line = input.recv() => {
                let Some(line) = line.transpose()? else {
                    println!("\nInput closed; quiz abandoned. No score was recorded.");
                    return Ok(());
                };
                let Some(option) = parse_option(&line) else {
                    println!("Please select an answer: 1-4 or a-d.");
                    continue;
                };
                let feedback = match session.submit(option) {
                    Ok(feedback) => feedback,
                    Err(SessionError::InvalidOption(_)) => {
                        println!("Please select an answer: 1-4 or a-d.");
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };
                show_feedback(&session, &feedback);

                match session.advance()? {
                    Advance::NextQuestion { .. } => {
                        show_question(&session);
                        ticker.reset();
                    }
                    Advance::Finished(result) => break result,
                }
            }
        }
    };

    show_summary(&result);

    let mut board = ScoreBoard::open(&config.scores_path());
    let recorded = board.record(result);
    super::report_save(&recorded.save);
    println!(
        "Leaderboard rank: {} of {}",
        recorded.rank,
        board.len()
    );
    println!();
    super::leaderboard::print_table(&board, config.leaderboard_limit);

    Ok(())
}

/// Read stdin lines on a plain thread and forward them to the quiz loop.
///
/// A pending read on this thread does not keep the runtime alive, so the
/// process exits as soon as the quiz ends even if stdin is still open.
fn spawn_line_reader() -> mpsc::Receiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Accept `1`-`4` or `a`-`d` and return a 0-based option index.
///
/// Numbers outside 1-4 are passed through so the session rejects them.
fn parse_option(line: &str) -> Option<usize> {
    let line = line.trim();
    if let Ok(n) = line.parse::<usize>() {
        return n.checked_sub(1).or(Some(usize::MAX));
    }
    let mut chars = line.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ 'a'..='d'), None) => Some(c as usize - 'a' as usize),
        (Some(c @ 'A'..='D'), None) => Some(c as usize - 'A' as usize),
        _ => None,
    }
}

fn print_rules() {
    println!("=== QUIZ ===");
    println!("Each question has a time limit.");
    println!("Correct answer: +4 points. Wrong answer or timeout: -1 point.");
    println!("Questions are randomized. Good luck!");
}

fn show_question(session: &QuizSession) {
    let (Some(index), Some(question)) = (session.current_index(), session.current_question())
    else {
        return;
    };
    println!(
        "\nQuestion {} of {}  |  Score: {}  |  Time: {}s",
        index + 1,
        session.total_questions(),
        session.score(),
        question.time_limit_secs()
    );
    println!("{}", question.prompt());
    for (i, option) in question.options().iter().enumerate() {
        println!("  {}) {option}", i + 1);
    }
}

fn show_feedback(session: &QuizSession, feedback: &AnswerFeedback) {
    if feedback.correct {
        println!("Correct! +4 points (score: {})", feedback.score);
    } else {
        let answer = session
            .current_question()
            .map(|q| q.correct_option().to_string())
            .unwrap_or_default();
        println!(
            "Wrong! -1 point. Correct answer: {} (score: {})",
            answer, feedback.score
        );
    }
}

fn show_summary(result: &QuizResult) {
    println!("\nQuiz complete!");
    println!("Player: {}", result.player);
    println!("Total score: {}", result.score);
    println!("Correct answers: {}", result.correct);
    println!("Wrong answers: {}", result.wrong);
    println!("Accuracy: {:.1}%", result.accuracy);
}

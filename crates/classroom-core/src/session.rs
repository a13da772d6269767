//! Timed quiz session state machine.
//!
//! A session walks one player through a shuffled question set:
//!
//! ```text
//! NotStarted --start--> AwaitingAnswer(0)
//! AwaitingAnswer(i) --submit--> AnswerRevealed(i) --advance--> AwaitingAnswer(i+1) | Finished
//! AwaitingAnswer(i) --tick reaching 0--> AnswerRevealed(i) --advance--> ...
//! ```
//!
//! The session never performs I/O or reads the clock for the countdown; the
//! driver calls [`QuizSession::tick`] once per elapsed second and serializes
//! ticks with submits and advances.

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::SessionError;
use crate::model::{accuracy_percent, Question, QuizResult, OPTION_COUNT};

/// Points awarded for a correct answer.
pub const CORRECT_POINTS: i32 = 4;
/// Points deducted for a wrong answer or a timeout.
pub const WRONG_PENALTY: i32 = 1;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Built but `start` not yet called.
    NotStarted,
    /// Question `index` is shown and its countdown is running.
    AwaitingAnswer { index: usize, time_remaining: u32 },
    /// Question `index` has been answered or timed out; waiting for `advance`.
    AnswerRevealed { index: usize },
    /// Every question has been played.
    Finished,
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::NotStarted => "not started",
            Phase::AwaitingAnswer { .. } => "awaiting an answer",
            Phase::AnswerRevealed { .. } => "the answer is revealed",
            Phase::Finished => "finished",
        }
    }
}

/// Feedback for a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    /// Index of the correct option, for highlighting.
    pub correct_option: usize,
    /// Score change applied by this answer.
    pub points: i32,
    /// Cumulative score after this answer.
    pub score: i32,
}

/// Result of moving past a revealed answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// The next question is now awaiting an answer.
    NextQuestion { index: usize, time_limit_secs: u32 },
    /// The session is over.
    Finished(QuizResult),
}

/// Result of one countdown tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Time is still left on the current question.
    Running { time_remaining: u32 },
    /// The countdown hit zero. The timeout penalty has been applied and the
    /// session has already advanced.
    TimedOut {
        index: usize,
        correct_option: usize,
        score: i32,
        next: Advance,
    },
}

/// One player's run through the question set.
#[derive(Debug, Clone)]
pub struct QuizSession {
    player: String,
    questions: Vec<Question>,
    phase: Phase,
    score: i32,
    correct: u32,
    wrong: u32,
    result: Option<QuizResult>,
}

impl QuizSession {
    /// Create a session for `player` over `questions`.
    pub fn new(player: &str, questions: Vec<Question>) -> Result<Self, SessionError> {
        let player = player.trim();
        if player.is_empty() {
            return Err(SessionError::EmptyPlayerName);
        }
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        Ok(Self {
            player: player.to_string(),
            questions,
            phase: Phase::NotStarted,
            score: 0,
            correct: 0,
            wrong: 0,
            result: None,
        })
    }

    /// Shuffle the questions and show the first one.
    ///
    /// Only valid once, on a fresh session. Playing again means building a
    /// new `QuizSession`.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&Question, SessionError> {
        if self.phase != Phase::NotStarted {
            return Err(self.invalid("start"));
        }
        self.questions.shuffle(rng);
        self.phase = Phase::AwaitingAnswer {
            index: 0,
            time_remaining: self.questions[0].time_limit_secs(),
        };
        tracing::debug!(
            "session started for {} with {} questions",
            self.player,
            self.questions.len()
        );
        Ok(&self.questions[0])
    }

    /// Count down one second on the current question.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        let Phase::AwaitingAnswer {
            index,
            time_remaining,
        } = self.phase
        else {
            return Err(self.invalid("tick"));
        };

        let time_remaining = time_remaining.saturating_sub(1);
        if time_remaining > 0 {
            self.phase = Phase::AwaitingAnswer {
                index,
                time_remaining,
            };
            return Ok(TickOutcome::Running { time_remaining });
        }

        self.wrong += 1;
        self.score -= WRONG_PENALTY;
        self.phase = Phase::AnswerRevealed { index };
        let score = self.score;
        let next = self.advance()?;
        Ok(TickOutcome::TimedOut {
            index,
            correct_option: self.questions[index].correct(),
            score,
            next,
        })
    }

    /// Answer the current question with option `option` (0-3).
    ///
    /// An out-of-range option is rejected and leaves the session untouched.
    pub fn submit(&mut self, option: usize) -> Result<AnswerFeedback, SessionError> {
        let Phase::AwaitingAnswer { index, .. } = self.phase else {
            return Err(self.invalid("submit"));
        };
        if option >= OPTION_COUNT {
            return Err(SessionError::InvalidOption(option));
        }

        let correct_option = self.questions[index].correct();
        let correct = option == correct_option;
        let points = if correct {
            self.correct += 1;
            CORRECT_POINTS
        } else {
            self.wrong += 1;
            -WRONG_PENALTY
        };
        self.score += points;
        self.phase = Phase::AnswerRevealed { index };

        Ok(AnswerFeedback {
            correct,
            correct_option,
            points,
            score: self.score,
        })
    }

    /// Move past a revealed answer to the next question or the final result.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        let Phase::AnswerRevealed { index } = self.phase else {
            return Err(self.invalid("advance"));
        };

        let next = index + 1;
        if next < self.questions.len() {
            let time_limit_secs = self.questions[next].time_limit_secs();
            self.phase = Phase::AwaitingAnswer {
                index: next,
                time_remaining: time_limit_secs,
            };
            return Ok(Advance::NextQuestion {
                index: next,
                time_limit_secs,
            });
        }

        let total = self.total_questions();
        let result = QuizResult {
            player: self.player.clone(),
            score: self.score,
            total_questions: total,
            correct: self.correct,
            wrong: self.wrong,
            accuracy: accuracy_percent(self.correct, total),
            completed_at: Utc::now(),
        };
        self.phase = Phase::Finished;
        self.result = Some(result.clone());
        tracing::info!(
            "{} finished with score {} ({}% accuracy)",
            result.player,
            result.score,
            result.accuracy
        );
        Ok(Advance::Finished(result))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn correct_count(&self) -> u32 {
        self.correct
    }

    pub fn wrong_count(&self) -> u32 {
        self.wrong
    }

    pub fn total_questions(&self) -> u32 {
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX)
    }

    /// Questions in session order (shuffled once `start` has run).
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Index of the question on screen, if any.
    pub fn current_index(&self) -> Option<usize> {
        match self.phase {
            Phase::AwaitingAnswer { index, .. } | Phase::AnswerRevealed { index } => Some(index),
            Phase::NotStarted | Phase::Finished => None,
        }
    }

    /// The question on screen, if any.
    pub fn current_question(&self) -> Option<&Question> {
        self.current_index().map(|i| &self.questions[i])
    }

    /// Seconds left on the current question while awaiting an answer.
    pub fn time_remaining(&self) -> Option<u32> {
        match self.phase {
            Phase::AwaitingAnswer { time_remaining, .. } => Some(time_remaining),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// The final result once the session is finished.
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            operation,
            state: self.phase.name(),
        }
    }
}

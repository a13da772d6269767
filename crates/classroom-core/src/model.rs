//! Core data model types for classroom.
//!
//! Questions are immutable once built, quiz results are immutable values
//! produced by a finished session, and students are mutable records owned by
//! the registry.

use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{QuestionError, RegistryError};

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

/// A multiple-choice question with a per-question countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: [String; OPTION_COUNT],
    correct: usize,
    time_limit_secs: u32,
}

impl Question {
    /// Build a question, rejecting malformed definitions.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: usize,
        time_limit_secs: u32,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        let count = options.len();
        let options: [String; OPTION_COUNT] = options
            .try_into()
            .map_err(|_| QuestionError::OptionCount(count))?;
        if correct >= OPTION_COUNT {
            return Err(QuestionError::AnswerOutOfRange(correct));
        }
        if time_limit_secs == 0 {
            return Err(QuestionError::ZeroTimeLimit);
        }
        Ok(Self {
            prompt,
            options,
            correct,
            time_limit_secs,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    /// Index (0-3) of the correct option.
    pub fn correct(&self) -> usize {
        self.correct
    }

    /// Text of the correct option.
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct]
    }

    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }
}

/// The outcome of one completed quiz session, as kept on the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    /// Player display name.
    pub player: String,
    /// Final score; may be negative.
    pub score: i32,
    /// Number of questions in the session.
    pub total_questions: u32,
    /// Questions answered correctly.
    pub correct: u32,
    /// Questions answered wrongly or timed out.
    pub wrong: u32,
    /// Percentage of correct answers, rounded to one decimal.
    pub accuracy: f64,
    /// When the session finished.
    pub completed_at: DateTime<Utc>,
}

impl QuizResult {
    /// Completion time in local time, formatted `dd-mm-YYYY HH:MM`.
    pub fn display_date(&self) -> String {
        self.completed_at
            .with_timezone(&Local)
            .format("%d-%m-%Y %H:%M")
            .to_string()
    }
}

/// Accuracy percentage rounded to one decimal place.
pub fn accuracy_percent(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = f64::from(correct) * 100.0 / f64::from(total);
    (raw * 10.0).round() / 10.0
}

/// Caller-supplied student identifier. Uniqueness is not enforced.
pub type StudentId = i64;

/// A student record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub age: u32,
    pub course: String,
    pub gpa: f64,
}

impl Student {
    /// Build a student record, validating the text fields and GPA.
    pub fn new(
        id: StudentId,
        name: impl Into<String>,
        age: u32,
        course: impl Into<String>,
        gpa: f64,
    ) -> Result<Self, RegistryError> {
        let name = validate_text("name", name.into())?;
        let course = validate_text("course", course.into())?;
        let gpa = validate_gpa(gpa)?;
        Ok(Self {
            id,
            name,
            age,
            course,
            gpa,
        })
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | Name: {} | Age: {} | Course: {} | GPA: {:.2}",
            self.id, self.name, self.age, self.course, self.gpa
        )
    }
}

/// Field changes for an existing student. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub course: Option<String>,
    pub gpa: Option<f64>,
}

impl StudentPatch {
    /// Validate every present field without touching any record.
    pub(crate) fn validated(self) -> Result<Self, RegistryError> {
        Ok(Self {
            name: self.name.map(|n| validate_text("name", n)).transpose()?,
            age: self.age,
            course: self.course.map(|c| validate_text("course", c)).transpose()?,
            gpa: self.gpa.map(validate_gpa).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.course.is_none() && self.gpa.is_none()
    }

    pub(crate) fn apply(self, student: &mut Student) {
        if let Some(name) = self.name {
            student.name = name;
        }
        if let Some(age) = self.age {
            student.age = age;
        }
        if let Some(course) = self.course {
            student.course = course;
        }
        if let Some(gpa) = self.gpa {
            student.gpa = gpa;
        }
    }
}

fn validate_text(field: &str, value: String) -> Result<String, RegistryError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn validate_gpa(gpa: f64) -> Result<f64, RegistryError> {
    if !gpa.is_finite() {
        return Err(RegistryError::InvalidInput(format!(
            "GPA must be a finite number, got {gpa}"
        )));
    }
    Ok(gpa)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into(), "d".into()]
    }

    #[test]
    fn question_rejects_malformed_definitions() {
        assert_eq!(
            Question::new("  ", options(), 0, 10),
            Err(QuestionError::EmptyPrompt)
        );
        assert_eq!(
            Question::new("Q", vec!["a".into(), "b".into()], 0, 10),
            Err(QuestionError::OptionCount(2))
        );
        assert_eq!(
            Question::new("Q", options(), 4, 10),
            Err(QuestionError::AnswerOutOfRange(4))
        );
        assert_eq!(
            Question::new("Q", options(), 1, 0),
            Err(QuestionError::ZeroTimeLimit)
        );
    }

    #[test]
    fn question_accessors() {
        let q = Question::new("Pick c", options(), 2, 12).unwrap();
        assert_eq!(q.prompt(), "Pick c");
        assert_eq!(q.correct(), 2);
        assert_eq!(q.correct_option(), "c");
        assert_eq!(q.time_limit_secs(), 12);
    }

    #[test]
    fn accuracy_rounds_to_one_decimal() {
        assert_eq!(accuracy_percent(1, 3), 33.3);
        assert_eq!(accuracy_percent(2, 3), 66.7);
        assert_eq!(accuracy_percent(10, 10), 100.0);
        assert_eq!(accuracy_percent(0, 10), 0.0);
        assert_eq!(accuracy_percent(0, 0), 0.0);
    }

    #[test]
    fn student_validation() {
        assert!(Student::new(1, "Ada", 20, "CS", 3.9).is_ok());
        assert!(matches!(
            Student::new(1, "   ", 20, "CS", 3.9),
            Err(RegistryError::InvalidInput(_))
        ));
        assert!(matches!(
            Student::new(1, "Ada", 20, "", 3.9),
            Err(RegistryError::InvalidInput(_))
        ));
        assert!(matches!(
            Student::new(1, "Ada", 20, "CS", f64::NAN),
            Err(RegistryError::InvalidInput(_))
        ));
    }

    #[test]
    fn student_display() {
        let s = Student::new(7, "Ada", 20, "CS", 3.5).unwrap();
        assert_eq!(
            s.to_string(),
            "ID: 7 | Name: Ada | Age: 20 | Course: CS | GPA: 3.50"
        );
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut s = Student::new(1, "Ada", 20, "CS", 3.0).unwrap();
        let patch = StudentPatch {
            gpa: Some(3.7),
            ..Default::default()
        }
        .validated()
        .unwrap();
        patch.apply(&mut s);
        assert_eq!(s.name, "Ada");
        assert_eq!(s.gpa, 3.7);
    }

    #[test]
    fn quiz_result_serde_roundtrip() {
        let result = QuizResult {
            player: "Ada".into(),
            score: -2,
            total_questions: 3,
            correct: 0,
            wrong: 3,
            accuracy: 0.0,
            completed_at: Utc::now(),
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: QuizResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}

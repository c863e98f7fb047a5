use crate::domain::model::{Exam, Question, QuestionType};
use crate::utils::error::{ExamError, Result};
use crate::utils::validation::Validate;

pub const MIN_OPTIONS: usize = 2;
pub const MAX_PASSING_SCORE: u32 = 100;

/// Checks one question; `number` is 1-based and only used in messages.
pub fn validate_question(exam: &str, number: usize, question: &Question) -> Result<()> {
    if question.options.len() < MIN_OPTIONS {
        return Err(ExamError::invalid_exam(
            exam,
            format!(
                "question {}: at least {} options are required, found {}",
                number,
                MIN_OPTIONS,
                question.options.len()
            ),
        ));
    }

    if question.correct_answers.is_empty() {
        return Err(ExamError::invalid_exam(
            exam,
            format!("question {}: at least one correct answer is required", number),
        ));
    }

    if let Some(idx) = question
        .correct_answers
        .iter()
        .find(|&&idx| idx >= question.options.len())
    {
        return Err(ExamError::invalid_exam(
            exam,
            format!(
                "question {}: index {} is out of range for {} options",
                number,
                idx,
                question.options.len()
            ),
        ));
    }

    if question.kind == QuestionType::Single && question.correct_answers.len() != 1 {
        return Err(ExamError::invalid_exam(
            exam,
            format!(
                "question {}: a single-choice question needs exactly one correct answer, found {}",
                number,
                question.correct_answers.len()
            ),
        ));
    }

    Ok(())
}

impl Validate for Exam {
    fn validate(&self) -> Result<()> {
        if self.questions.is_empty() {
            return Err(ExamError::invalid_exam(
                &self.name,
                "at least one question is required",
            ));
        }

        if self.passing_score > MAX_PASSING_SCORE {
            return Err(ExamError::invalid_exam(
                &self.name,
                format!(
                    "passing_score must be between 0 and {}, found {}",
                    MAX_PASSING_SCORE, self.passing_score
                ),
            ));
        }

        if self.time_limit == Some(0) {
            return Err(ExamError::invalid_exam(
                &self.name,
                "time_limit must be at least 1 minute",
            ));
        }

        for (i, question) in self.questions.iter().enumerate() {
            validate_question(&self.name, i + 1, question)?;
        }

        Ok(())
    }
}

use serde::{Deserialize, Serialize};

pub const DEFAULT_PASSING_SCORE: u32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Single,
    Multiple,
}

impl QuestionType {
    pub fn hint(&self) -> &'static str {
        match self {
            QuestionType::Single => "Choose ONE correct answer",
            QuestionType::Multiple => "Choose ALL correct answers",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub options: Vec<String>,
    /// Zero-based indices into `options`.
    pub correct_answers: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    pub fn option_texts(&self, indices: &[usize]) -> Vec<&str> {
        indices
            .iter()
            .filter_map(|&idx| self.options.get(idx).map(String::as_str))
            .collect()
    }
}

fn default_passing_score() -> u32 {
    DEFAULT_PASSING_SCORE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub name: String,
    pub description: String,
    pub questions: Vec<Question>,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    #[serde(default = "default_passing_score")]
    pub passing_score: u32,
}

impl Exam {
    pub fn questions_with_explanation(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| q.explanation.is_some())
            .count()
    }

    pub fn summary(&self) -> ExamSummary {
        ExamSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            question_count: self.questions.len(),
            passing_score: self.passing_score,
            questions_with_explanation: self.questions_with_explanation(),
            time_limit: self.time_limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamSummary {
    pub name: String,
    pub description: String,
    pub question_count: usize,
    pub passing_score: u32,
    pub questions_with_explanation: usize,
    pub time_limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerDetail {
    pub question_text: String,
    pub question_type: QuestionType,
    pub user_answer: Vec<usize>,
    pub correct_answer: Vec<usize>,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    pub exam_name: String,
    pub score: usize,
    pub max_score: usize,
    pub percentage: f64,
    pub passed: bool,
    /// One entry per question, in the exam's own order.
    pub answers: Vec<AnswerDetail>,
    pub timestamp: String,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<u64>,
}

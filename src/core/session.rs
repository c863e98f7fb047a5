//! State of one attempt at an exam.
//!
//! Questions are presented in `order` (a permutation of question indices) while
//! answers are always stored under the question's index in the exam, so scoring
//! does not care whether the attempt was shuffled.

use crate::core::scoring::calculate_results;
use crate::domain::model::{Exam, ExamResult, Question, QuestionType};
use crate::utils::error::{ExamError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Moved { position: usize },
    /// The current question has no answer yet.
    NeedsAnswer,
    AtStart,
    AtEnd,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FinishOutcome {
    Completed(ExamResult),
    /// 1-based positions in presentation order.
    Unanswered(Vec<usize>),
}

#[derive(Debug, Clone, Copy)]
pub struct CurrentQuestion<'a> {
    pub position: usize,
    pub total: usize,
    pub index: usize,
    pub question: &'a Question,
    pub answer: &'a [usize],
}

impl CurrentQuestion<'_> {
    pub fn number(&self) -> usize {
        self.position + 1
    }

    pub fn is_first(&self) -> bool {
        self.position == 0
    }

    pub fn is_last(&self) -> bool {
        self.position + 1 == self.total
    }
}

pub fn presentation_order(len: usize, shuffle: bool, seed: Option<u64>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    if shuffle {
        match seed {
            Some(seed) => order.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => order.shuffle(&mut rand::thread_rng()),
        }
    }
    order
}

#[derive(Debug, Clone)]
pub struct ExamSession<'a> {
    exam: &'a Exam,
    order: Vec<usize>,
    position: usize,
    answers: HashMap<usize, Vec<usize>>,
    started_at: Instant,
}

impl<'a> ExamSession<'a> {
    pub fn new(exam: &'a Exam, order: Vec<usize>) -> Result<Self> {
        if exam.questions.is_empty() {
            return Err(ExamError::invalid_exam(&exam.name, "the exam has no questions"));
        }

        let mut seen = vec![false; exam.questions.len()];
        let is_permutation = order.len() == exam.questions.len()
            && order
                .iter()
                .all(|&idx| idx < seen.len() && !std::mem::replace(&mut seen[idx], true));
        if !is_permutation {
            return Err(ExamError::ValidationError {
                message: format!(
                    "question order {:?} is not a permutation of {} questions",
                    order,
                    exam.questions.len()
                ),
            });
        }

        Ok(Self {
            exam,
            order,
            position: 0,
            answers: HashMap::new(),
            started_at: Instant::now(),
        })
    }

    pub fn ordered(exam: &'a Exam) -> Result<Self> {
        Self::new(exam, presentation_order(exam.questions.len(), false, None))
    }

    pub fn shuffled<R: Rng + ?Sized>(exam: &'a Exam, rng: &mut R) -> Result<Self> {
        let mut order: Vec<usize> = (0..exam.questions.len()).collect();
        order.shuffle(rng);
        Self::new(exam, order)
    }

    pub fn exam(&self) -> &'a Exam {
        self.exam
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn current(&self) -> CurrentQuestion<'_> {
        let index = self.order[self.position];
        CurrentQuestion {
            position: self.position,
            total: self.order.len(),
            index,
            question: &self.exam.questions[index],
            answer: self.answers.get(&index).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.answers.get(&index).is_some_and(|a| !a.is_empty())
    }

    /// Replaces the answer to the current question. Choices are zero-based.
    pub fn select(&mut self, choices: &[usize]) -> Result<()> {
        let index = self.order[self.position];
        let question = &self.exam.questions[index];

        if let Some(bad) = choices.iter().find(|&&c| c >= question.options.len()) {
            return Err(ExamError::selection(format!(
                "option {} does not exist, choose 1 to {}",
                bad + 1,
                question.options.len()
            )));
        }

        let mut selection = choices.to_vec();
        selection.sort_unstable();
        selection.dedup();

        if question.kind == QuestionType::Single && selection.len() > 1 {
            return Err(ExamError::selection("this question takes exactly one answer"));
        }

        if selection.is_empty() {
            self.answers.remove(&index);
        } else {
            self.answers.insert(index, selection);
        }
        Ok(())
    }

    pub fn next(&mut self) -> Navigation {
        if self.position + 1 >= self.order.len() {
            return Navigation::AtEnd;
        }
        if !self.is_answered(self.order[self.position]) {
            return Navigation::NeedsAnswer;
        }
        self.position += 1;
        Navigation::Moved {
            position: self.position,
        }
    }

    pub fn skip(&mut self) -> Navigation {
        if self.position + 1 >= self.order.len() {
            return Navigation::AtEnd;
        }
        self.position += 1;
        Navigation::Moved {
            position: self.position,
        }
    }

    pub fn back(&mut self) -> Navigation {
        if self.position == 0 {
            return Navigation::AtStart;
        }
        self.position -= 1;
        Navigation::Moved {
            position: self.position,
        }
    }

    pub fn unanswered(&self) -> Vec<usize> {
        self.order
            .iter()
            .enumerate()
            .filter(|(_, &index)| !self.is_answered(index))
            .map(|(position, _)| position + 1)
            .collect()
    }

    /// Fraction of questions before the current one.
    pub fn progress(&self) -> f64 {
        self.position as f64 / self.order.len() as f64
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.exam
            .time_limit
            .map(|minutes| Duration::from_secs(u64::from(minutes) * 60))
    }

    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        let elapsed = now.saturating_duration_since(self.started_at);
        self.time_limit()
            .map(|limit| limit.saturating_sub(elapsed))
    }

    pub fn is_time_up(&self, now: Instant) -> bool {
        self.time_remaining(now).is_some_and(|left| left.is_zero())
    }

    pub fn finish(&self) -> FinishOutcome {
        self.finish_at(Instant::now())
    }

    /// Like `finish`, with the elapsed time measured up to `now`.
    pub fn finish_at(&self, now: Instant) -> FinishOutcome {
        let unanswered = self.unanswered();
        if unanswered.is_empty() {
            FinishOutcome::Completed(self.score_at(now))
        } else {
            FinishOutcome::Unanswered(unanswered)
        }
    }

    /// Scores the attempt as it stands; unanswered questions count as wrong.
    pub fn finish_now(&self) -> ExamResult {
        self.score_at(Instant::now())
    }

    pub fn score_at(&self, now: Instant) -> ExamResult {
        let mut result = calculate_results(self.exam, &self.answers);
        result.elapsed_seconds = Some(now.saturating_duration_since(self.started_at).as_secs());
        result
    }
}

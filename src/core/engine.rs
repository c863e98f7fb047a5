use crate::core::catalog::{check_exam_files, load_all_exams, Catalog, FileCheck};
use crate::core::session::{presentation_order, ExamSession};
use crate::domain::model::{Exam, ExamResult};
use crate::domain::ports::{ResultSink, Storage};
use crate::utils::error::{ExamError, Result};

/// How the questions of a new attempt are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttemptPlan {
    pub shuffle: bool,
    pub seed: Option<u64>,
}

impl AttemptPlan {
    pub fn order_for(&self, exam: &Exam) -> Vec<usize> {
        presentation_order(exam.questions.len(), self.shuffle, self.seed)
    }

    pub fn start<'a>(&self, exam: &'a Exam) -> Result<ExamSession<'a>> {
        ExamSession::new(exam, self.order_for(exam))
    }
}

pub struct ExamEngine<S: Storage, R: ResultSink> {
    storage: S,
    sink: R,
    seed_example: bool,
    catalog: Catalog,
}

impl<S: Storage, R: ResultSink> ExamEngine<S, R> {
    pub fn new(storage: S, sink: R, seed_example: bool) -> Self {
        Self {
            storage,
            sink,
            seed_example,
            catalog: Catalog::default(),
        }
    }

    pub async fn load(&mut self) -> Result<&Catalog> {
        tracing::debug!("Loading exams from {}", self.storage.describe());
        self.catalog = load_all_exams(&self.storage, self.seed_example).await?;
        Ok(&self.catalog)
    }

    pub async fn check(&self) -> Result<Vec<FileCheck>> {
        check_exam_files(&self.storage).await
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn exam(&self, name: &str) -> Result<&Exam> {
        self.catalog.get(name).ok_or_else(|| ExamError::ExamNotFound {
            name: name.to_string(),
        })
    }

    pub fn start(&self, name: &str, plan: AttemptPlan) -> Result<ExamSession<'_>> {
        let exam = self.exam(name)?;
        tracing::info!(
            "▶️ Starting '{}' ({} questions, shuffle: {})",
            exam.name,
            exam.questions.len(),
            plan.shuffle
        );
        plan.start(exam)
    }

    pub async fn record(&self, result: &ExamResult) -> Result<()> {
        tracing::info!(
            "📊 '{}' finished: {}/{} ({:.1}%), {}",
            result.exam_name,
            result.score,
            result.max_score,
            result.percentage,
            if result.passed { "passed" } else { "failed" }
        );

        if !self.sink.is_enabled() {
            return Ok(());
        }

        match self.sink.record(result).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!("❌ Could not save the result: {}", e);
                Err(e)
            }
        }
    }
}

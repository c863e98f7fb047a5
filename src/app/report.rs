use crate::core::catalog::Catalog;
use crate::core::history::HistoryEntry;
use crate::domain::model::{Exam, ExamResult};
use std::fmt;

pub const TITLE_PREVIEW_CHARS: usize = 100;

fn preview(text: &str) -> String {
    let truncated: String = text.chars().take(TITLE_PREVIEW_CHARS).collect();
    format!("{}...", truncated)
}

fn join_options(exam: &Exam, question: usize, indices: &[usize]) -> Option<String> {
    let question = exam.questions.get(question)?;
    let texts = question.option_texts(indices);
    if texts.is_empty() {
        None
    } else {
        Some(texts.join(", "))
    }
}

/// Listing of every exam in a catalog.
pub struct CatalogReport<'a>(pub &'a Catalog);

impl fmt::Display for CatalogReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No exams available. Check the exam folder.");
        }

        writeln!(f, "📂 Available exams")?;
        for summary in self.0.summaries() {
            writeln!(f)?;
            writeln!(f, "📘 {}", summary.name)?;
            writeln!(f, "   Description: {}", summary.description)?;
            writeln!(f, "   Questions: {}", summary.question_count)?;
            writeln!(f, "   Passing score: {}%", summary.passing_score)?;
            if summary.questions_with_explanation > 0 {
                writeln!(
                    f,
                    "   Questions with explanations: {}",
                    summary.questions_with_explanation
                )?;
            }
            if let Some(minutes) = summary.time_limit {
                writeln!(f, "   Time limit: {} min", minutes)?;
            }
        }
        Ok(())
    }
}

pub struct ExamDetails<'a>(pub &'a Exam);

impl fmt::Display for ExamDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0.summary();
        writeln!(f, "Exam: {}", summary.name)?;
        writeln!(f, "{}", summary.description)?;
        writeln!(f)?;
        writeln!(f, "Questions:            {}", summary.question_count)?;
        writeln!(f, "Passing score:        {}%", summary.passing_score)?;
        writeln!(f, "With explanations:    {}", summary.questions_with_explanation)?;
        match summary.time_limit {
            Some(minutes) => writeln!(f, "Time limit:           {} min", minutes),
            None => writeln!(f, "Time limit:           none"),
        }
    }
}

/// Headline and per-question breakdown of a scored attempt.
pub struct ResultReport<'a> {
    pub result: &'a ExamResult,
    pub exam: &'a Exam,
}

impl fmt::Display for ResultReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        writeln!(f, "📊 Exam results")?;
        writeln!(f)?;
        writeln!(f, "Correct answers: {}/{}", result.score, result.max_score)?;
        writeln!(f, "Score: {:.1}%", result.percentage)?;
        if result.passed {
            writeln!(f, "✅ Exam passed!")?;
        } else {
            writeln!(f, "❌ Exam not passed")?;
        }
        if result.timed_out {
            writeln!(f, "⏰ Time ran out before the exam was finished")?;
        }

        writeln!(f)?;
        writeln!(f, "Answer details")?;
        for (i, detail) in result.answers.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "Question {}: {}", i + 1, preview(&detail.question_text))?;

            let given = join_options(self.exam, i, &detail.user_answer)
                .unwrap_or_else(|| "❌ No answer".to_string());
            let expected = join_options(self.exam, i, &detail.correct_answer).unwrap_or_default();
            writeln!(f, "  Your answer:    {}", given)?;
            writeln!(f, "  Correct answer: {}", expected)?;

            if detail.is_correct {
                writeln!(f, "  ✅ Correct")?;
            } else {
                writeln!(f, "  ❌ Incorrect")?;
            }
            if let Some(explanation) = &detail.explanation {
                writeln!(f, "  💡 Explanation: {}", explanation)?;
            }
        }
        Ok(())
    }
}

pub struct HistoryReport<'a>(pub &'a [HistoryEntry]);

impl fmt::Display for HistoryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No results recorded yet.");
        }

        for entry in self.0 {
            writeln!(
                f,
                "{}  {:<30} {:>3}/{:<3} {:>5.1}%  {}{}",
                entry.timestamp,
                entry.exam_name,
                entry.score,
                entry.max_score,
                entry.percentage,
                if entry.passed { "passed" } else { "failed" },
                if entry.timed_out { " (timed out)" } else { "" }
            )?;
        }
        Ok(())
    }
}

pub fn render_catalog(catalog: &Catalog) -> String {
    CatalogReport(catalog).to_string()
}

pub fn render_exam(exam: &Exam) -> String {
    ExamDetails(exam).to_string()
}

pub fn render_result(result: &ExamResult, exam: &Exam) -> String {
    ResultReport { result, exam }.to_string()
}

pub fn render_history(entries: &[HistoryEntry]) -> String {
    HistoryReport(entries).to_string()
}

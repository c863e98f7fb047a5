use crate::domain::model::{Exam, ExamSummary, Question, QuestionType};
use crate::domain::ports::Storage;
use crate::utils::error::{ExamError, Result};
use crate::utils::validation::Validate;
use std::collections::BTreeMap;

pub const EXAM_EXTENSION: &str = "json";
pub const EXAMPLE_FILE: &str = "example.json";

/// Exams keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    exams: BTreeMap<String, Exam>,
}

impl Catalog {
    pub fn from_exams(exams: impl IntoIterator<Item = Exam>) -> Self {
        Self {
            exams: exams.into_iter().map(|e| (e.name.clone(), e)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Exam> {
        self.exams.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exam> {
        self.exams.values()
    }

    pub fn names(&self) -> Vec<&str> {
        self.exams.keys().map(String::as_str).collect()
    }

    pub fn summaries(&self) -> Vec<ExamSummary> {
        self.iter().map(Exam::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.exams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }

    /// Returns the exam that was replaced, if any.
    fn insert(&mut self, exam: Exam) -> Option<Exam> {
        self.exams.insert(exam.name.clone(), exam)
    }
}

#[derive(Debug)]
pub struct FileCheck {
    pub file: String,
    pub outcome: Result<String>,
}

impl FileCheck {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

pub fn parse_exam(file: &str, data: &[u8]) -> Result<Exam> {
    let exam: Exam = serde_json::from_slice(data).map_err(|e| ExamError::ExamFormatError {
        file: file.to_string(),
        reason: e.to_string(),
    })?;
    exam.validate()?;
    Ok(exam)
}

pub async fn load_exam_file<S: Storage>(storage: &S, file: &str) -> Result<Exam> {
    let data = storage.read_file(file).await?;
    parse_exam(file, &data)
}

fn options(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn example_exam() -> Exam {
    Exam {
        name: "Example exam".to_string(),
        description: "A short demo exam showing both question types".to_string(),
        questions: vec![
            Question {
                text: "Which operator raises a number to a power in Python?".to_string(),
                kind: QuestionType::Single,
                options: options(&["^", "**", "pow", "^^"]),
                correct_answers: vec![1],
                explanation: Some("The ** operator raises to a power in Python".to_string()),
            },
            Question {
                text: "Which of these types are built into Python?".to_string(),
                kind: QuestionType::Multiple,
                options: options(&["list", "array", "dict", "tuple", "vector"]),
                correct_answers: vec![0, 2, 3],
                explanation: Some(
                    "list, dict and tuple are built in; array and vector need imports".to_string(),
                ),
            },
        ],
        time_limit: None,
        passing_score: 70,
    }
}

async fn seed_folder<S: Storage>(storage: &S, seed_example: bool) -> Result<()> {
    storage.create_root().await?;
    if seed_example {
        let data = serde_json::to_vec_pretty(&example_exam())?;
        storage.write_file(EXAMPLE_FILE, &data).await?;
        tracing::info!(
            "📁 Created exam folder {} with an example exam",
            storage.describe()
        );
    } else {
        tracing::info!("📁 Created empty exam folder {}", storage.describe());
    }
    Ok(())
}

/// Loads every exam file, skipping the ones that fail to parse or validate.
pub async fn load_all_exams<S: Storage>(storage: &S, seed_example: bool) -> Result<Catalog> {
    if !storage.root_exists().await {
        seed_folder(storage, seed_example).await?;
    }

    let files = storage.list_files(EXAM_EXTENSION).await?;
    tracing::debug!("Found {} exam files in {}", files.len(), storage.describe());

    let mut catalog = Catalog::default();
    for file in files {
        match load_exam_file(storage, &file).await {
            Ok(exam) => {
                let name = exam.name.clone();
                if catalog.insert(exam).is_some() {
                    tracing::warn!(
                        "⚠️ Exam '{}' from {} replaces an earlier exam with the same name",
                        name,
                        file
                    );
                }
            }
            Err(e) => {
                tracing::warn!("⚠️ Could not load exam from {}: {}", file, e);
            }
        }
    }

    tracing::info!("📚 Loaded {} exams", catalog.len());
    Ok(catalog)
}

/// Checks every exam file without stopping at the first failure.
pub async fn check_exam_files<S: Storage>(storage: &S) -> Result<Vec<FileCheck>> {
    if !storage.root_exists().await {
        return Err(ExamError::ConfigError {
            message: format!("exam folder {} does not exist", storage.describe()),
        });
    }

    let mut checks = Vec::new();
    for file in storage.list_files(EXAM_EXTENSION).await? {
        let outcome = load_exam_file(storage, &file).await.map(|exam| exam.name);
        checks.push(FileCheck { file, outcome });
    }
    Ok(checks)
}

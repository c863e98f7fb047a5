pub mod catalog;
pub mod engine;
pub mod history;
pub mod scoring;
pub mod session;

pub use crate::domain::model::{AnswerDetail, Exam, ExamResult, ExamSummary, Question, QuestionType};
pub use crate::domain::ports::{ResultSink, Storage};
pub use crate::utils::error::Result;

#[cfg(test)]
pub(crate) mod testing {
    use crate::domain::model::{Exam, Question, QuestionType};
    use crate::domain::ports::Storage;
    use crate::utils::error::{ExamError, Result};
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    pub struct MockStorage {
        files: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
        root: Arc<Mutex<bool>>,
    }

    impl MockStorage {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn with_files(files: &[(&str, &str)]) -> Self {
            let storage = Self::new();
            for (name, content) in files {
                storage.write_file(name, content.as_bytes()).await.unwrap();
            }
            storage
        }

        pub async fn get_file(&self, path: &str) -> Option<String> {
            let files = self.files.lock().await;
            files
                .get(path)
                .map(|data| String::from_utf8_lossy(data).into_owned())
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                ExamError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            *self.root.lock().await = true;
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn append_file(&self, path: &str, data: &[u8]) -> Result<()> {
            *self.root.lock().await = true;
            let mut files = self.files.lock().await;
            files.entry(path.to_string()).or_default().extend_from_slice(data);
            Ok(())
        }

        async fn list_files(&self, extension: &str) -> Result<Vec<String>> {
            let suffix = format!(".{}", extension);
            let files = self.files.lock().await;
            Ok(files
                .keys()
                .filter(|name| name.ends_with(&suffix))
                .cloned()
                .collect())
        }

        async fn root_exists(&self) -> bool {
            *self.root.lock().await
        }

        async fn create_root(&self) -> Result<()> {
            *self.root.lock().await = true;
            Ok(())
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    pub fn single(text: &str, options: &[&str], correct: usize) -> Question {
        Question {
            text: text.to_string(),
            kind: QuestionType::Single,
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answers: vec![correct],
            explanation: None,
        }
    }

    pub fn multiple(text: &str, options: &[&str], correct: &[usize]) -> Question {
        Question {
            text: text.to_string(),
            kind: QuestionType::Multiple,
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answers: correct.to_vec(),
            explanation: None,
        }
    }

    /// Three questions: single (answer 1), multiple (answers 0 and 2), single (answer 0).
    pub fn sample_exam() -> Exam {
        let mut first = single("Power operator?", &["^", "**", "pow"], 1);
        first.explanation = Some("** raises to a power".to_string());
        Exam {
            name: "Sample".to_string(),
            description: "Sample exam".to_string(),
            questions: vec![
                first,
                multiple("Built-in types?", &["list", "array", "dict"], &[0, 2]),
                single("Is None falsy?", &["yes", "no"], 0),
            ],
            time_limit: None,
            passing_score: 60,
        }
    }
}

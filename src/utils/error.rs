use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExamError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Malformed exam file {file}: {reason}")]
    ExamFormatError { file: String, reason: String },

    #[error("Invalid exam '{exam}': {message}")]
    ExamValidationError { exam: String, message: String },

    #[error("Exam not found: {name}")]
    ExamNotFound { name: String },

    #[error("Invalid selection: {message}")]
    SelectionError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Data,
    Session,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ExamError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExamError::IoError(_) => ErrorCategory::Io,
            ExamError::ConfigError { .. }
            | ExamError::ConfigValidationError { .. }
            | ExamError::InvalidConfigValueError { .. }
            | ExamError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ExamError::SerializationError(_)
            | ExamError::CsvError(_)
            | ExamError::ExamFormatError { .. }
            | ExamError::ExamValidationError { .. }
            | ExamError::ValidationError { .. } => ErrorCategory::Data,
            ExamError::ExamNotFound { .. } | ExamError::SelectionError { .. } => {
                ErrorCategory::Session
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ExamError::SelectionError { .. } => ErrorSeverity::Low,
            ExamError::ExamNotFound { .. } => ErrorSeverity::Medium,
            ExamError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the exam and history folders exist and are writable",
            ErrorCategory::Configuration => {
                "Review exam-prep.toml and the command line flags, then try again"
            }
            ErrorCategory::Data => {
                "Fix the exam JSON file; run `exam-prep check` to see every problem at once"
            }
            ErrorCategory::Session => "Run `exam-prep list` to see the available exams",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ExamError::IoError(e) => format!("Could not access a file: {}", e),
            ExamError::ExamNotFound { name } => format!("There is no exam named '{}'", name),
            ExamError::ExamFormatError { file, .. } => {
                format!("The exam file {} could not be read", file)
            }
            ExamError::ExamValidationError { exam, message } => {
                format!("The exam '{}' is not valid: {}", exam, message)
            }
            other => other.to_string(),
        }
    }

    pub(crate) fn invalid_exam(exam: &str, message: impl Into<String>) -> Self {
        ExamError::ExamValidationError {
            exam: exam.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn selection(message: impl Into<String>) -> Self {
        ExamError::SelectionError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExamError>;

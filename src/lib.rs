pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, Settings};

pub use app::terminal::{take_exam, RunOutcome, TerminalRunner};
pub use crate::core::{
    catalog::Catalog,
    engine::{AttemptPlan, ExamEngine},
    history::{HistorySink, NoHistory},
    session::ExamSession,
};
pub use domain::model::{Exam, ExamResult, Question, QuestionType};
pub use utils::error::{ExamError, Result};

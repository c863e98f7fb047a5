pub mod cli;
pub mod toml_config;

use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::Validate;
use std::path::PathBuf;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "exam-prep")]
#[command(about = "Practice exams from JSON files in the terminal")]
pub struct CliConfig {
    /// Path to a TOML configuration file (default: ./exam-prep.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Folder holding the exam JSON files
    #[arg(long, global = true)]
    pub exam_dir: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the available exams
    List,
    /// Show the details of one exam
    Show { name: String },
    /// Validate every exam file and report all problems
    Check,
    /// Take an exam interactively
    Take {
        name: String,
        /// Present the questions in random order
        #[arg(long)]
        shuffle: bool,
        /// Seed for the random order (implies --shuffle)
        #[arg(long)]
        seed: Option<u64>,
        /// Do not append the result to the history file
        #[arg(long)]
        no_history: bool,
    },
    /// Show recorded results
    History {
        /// Only results of this exam
        #[arg(long)]
        exam: Option<String>,
        /// Write the results to a CSV file instead of printing them
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

/// Effective settings after layering defaults, the TOML file and command line flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub exam_folder: PathBuf,
    pub seed_example: bool,
    pub shuffle: bool,
    pub history_enabled: bool,
    pub history_folder: PathBuf,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Result<Self> {
        config.validate()?;
        let history_folder = if config.history.enabled {
            PathBuf::from(config.history_folder()?)
        } else {
            config
                .history
                .folder
                .as_deref()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(toml_config::DEFAULT_HISTORY_FOLDER))
        };

        Ok(Self {
            exam_folder: PathBuf::from(&config.exams.folder),
            seed_example: config.exams.seed_example,
            shuffle: config.session.shuffle,
            history_enabled: config.history.enabled,
            history_folder,
            log_level: config.logging.level.to_ascii_lowercase(),
            log_format: config.log_format(),
        })
    }

    #[cfg(feature = "cli")]
    pub fn resolve(cli: &CliConfig) -> Result<Self> {
        let file = TomlConfig::load(cli.config.as_deref())?;
        let mut settings = Self::from_toml(&file)?;
        if let Some(dir) = &cli.exam_dir {
            settings.exam_folder = dir.clone();
        }
        Ok(settings)
    }
}

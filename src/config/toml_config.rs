use crate::utils::error::{ExamError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_required_field, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "exam-prep.toml";
pub const DEFAULT_EXAM_FOLDER: &str = "exam";
pub const DEFAULT_HISTORY_FOLDER: &str = "results";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["compact", "json"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub exams: ExamsConfig,
    pub session: SessionConfig,
    pub history: HistoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExamsConfig {
    pub folder: String,
    pub seed_example: bool,
}

impl Default for ExamsConfig {
    fn default() -> Self {
        Self {
            folder: DEFAULT_EXAM_FOLDER.to_string(),
            seed_example: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub shuffle: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub enabled: bool,
    pub folder: Option<String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            folder: Some(DEFAULT_HISTORY_FOLDER.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ExamError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// The default file is optional; an explicitly named one is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ExamError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ExamError::ConfigError {
            message: format!("environment substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.logging.format).unwrap_or_default()
    }

    pub fn history_folder(&self) -> Result<&str> {
        validate_required_field("history.folder", &self.history.folder).map(String::as_str)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_path("exams.folder", &self.exams.folder)?;

        if self.history.enabled {
            validate_path("history.folder", self.history_folder()?)?;
        }

        validate_non_empty_string("logging.level", &self.logging.level)?;
        validate_one_of(
            "logging.level",
            &self.logging.level.to_ascii_lowercase(),
            &LOG_LEVELS,
        )?;
        validate_one_of(
            "logging.format",
            &self.logging.format.to_ascii_lowercase(),
            &LOG_FORMATS,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.exams.folder, "exam");
        assert!(config.exams.seed_example);
        assert!(config.history.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[exams]
folder = "./my-exams"
seed_example = false

[session]
shuffle = true

[history]
enabled = false

[logging]
level = "debug"
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.exams.folder, "./my-exams");
        assert!(!config.exams.seed_example);
        assert!(config.session.shuffle);
        assert!(!config.history.enabled);
        assert_eq!(config.log_format(), LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("EXAM_PREP_TEST_FOLDER", "/tmp/exams-from-env");

        let toml_content = r#"
[exams]
folder = "${EXAM_PREP_TEST_FOLDER}"

[history]
folder = "${EXAM_PREP_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.exams.folder, "/tmp/exams-from-env");
        assert_eq!(
            config.history.folder.as_deref(),
            Some("${EXAM_PREP_UNSET_VARIABLE}")
        );

        std::env::remove_var("EXAM_PREP_TEST_FOLDER");
    }

    #[test]
    fn test_config_validation() {
        let bad_level = TomlConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(matches!(
            bad_level.validate(),
            Err(ExamError::InvalidConfigValueError { .. })
        ));

        let empty_folder = TomlConfig::from_toml_str("[exams]\nfolder = \"\"\n").unwrap();
        assert!(empty_folder.validate().is_err());

        let mut no_history_folder = TomlConfig::default();
        no_history_folder.history.folder = None;
        assert!(matches!(
            no_history_folder.validate(),
            Err(ExamError::MissingConfigError { .. })
        ));
        no_history_folder.history.enabled = false;
        assert!(no_history_folder.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            TomlConfig::from_toml_str("[exams\nfolder = 1"),
            Err(ExamError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[session]\nshuffle = true\n")
            .unwrap();

        let config = TomlConfig::load(Some(temp_file.path())).unwrap();
        assert!(config.session.shuffle);

        assert!(TomlConfig::load(Some(Path::new("/definitely/missing.toml"))).is_err());
    }
}

use crate::utils::error::{PassError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::Path;

/// Default configuration file looked up by the CLI when `--config` is absent.
pub const DEFAULT_CONFIG_PATH: &str = "buspass.toml";

const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";
const DEFAULT_TIME_FORMAT: &str = "%-I:%M:%S %P";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub display: DisplayConfig,
    pub scanner: ScannerConfig,
    pub admin: AdminConfig,
}

/// How dates and times are rendered on passes and scan results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Offset from UTC in minutes (IST = 330).
    pub utc_offset_minutes: i32,
    pub date_format: String,
    pub time_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 330,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl DisplayConfig {
    /// Configured offset, or UTC when it is out of range.
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn format_date(&self, at: DateTime<Utc>) -> String {
        self.render(at, &self.date_format, DEFAULT_DATE_FORMAT)
    }

    pub fn format_time(&self, at: DateTime<Utc>) -> String {
        self.render(at, &self.time_format, DEFAULT_TIME_FORMAT)
    }

    // An invalid strftime item makes `Display` fail; render with the default
    // format instead.
    fn render(&self, at: DateTime<Utc>, format: &str, fallback: &str) -> String {
        let local = at.with_timezone(&self.offset());
        let mut out = String::new();
        if write!(out, "{}", local.format(format)).is_ok() {
            return out;
        }
        tracing::warn!("Invalid display format '{}', using '{}'", format, fallback);
        local.format(fallback).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Number of recent scans kept, newest first.
    pub history_limit: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self { history_limit: 10 }
    }
}

/// Mock admin credentials. Use `${VAR}` in the file to keep them out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads and parses a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PassError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when it exists, otherwise returns the defaults.
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "No config file at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PassError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        result.to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_range(
            "display.utc_offset_minutes",
            self.display.utc_offset_minutes,
            -12 * 60,
            14 * 60,
        )?;
        validate_format("display.date_format", &self.display.date_format)?;
        validate_format("display.time_format", &self.display.time_format)?;

        validate_range("scanner.history_limit", self.scanner.history_limit, 1, 100)?;

        validate_non_empty_string("admin.username", &self.admin.username)?;
        validate_non_empty_string("admin.password", &self.admin.password)?;

        Ok(())
    }
}

fn validate_format(field_name: &str, format: &str) -> Result<()> {
    validate_non_empty_string(field_name, format)?;
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(PassError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format.to_string(),
            reason: "Invalid strftime format".to_string(),
        });
    }
    Ok(())
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

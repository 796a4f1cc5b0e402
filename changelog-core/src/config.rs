use std::path::Path;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::{ChangelogError, Result};
use crate::model::HashWidth;
use crate::render::ReportTemplates;

/// Digits of the commit hash shown when the config does not say
pub const DEFAULT_HASH_DIGITS: i64 = 8;

/// Project settings for a changelog run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Project name shown in the preamble
    pub project_name: String,

    /// Link target for the project name
    #[serde(alias = "projectRepoURL")]
    pub project_repo_url: String,

    /// Comparison link, with `StartCommitID` and `EndCommitID` placeholders
    #[serde(alias = "diffURLTemplate")]
    pub diff_url_template: String,

    /// Commit permalink, with a `CommitID` placeholder
    #[serde(alias = "commitURLTemplate")]
    pub commit_url_template: String,

    /// Positive values truncate hashes to that many digits; zero or less
    /// keeps the full hash
    #[serde(default = "default_hash_digits")]
    pub commit_hash_digits: i64,

    /// Zones the generation time is printed in
    #[serde(default = "default_time_zones")]
    pub time_zones: Vec<TimeZoneConfig>,

    /// Report layout
    #[serde(default)]
    pub templates: ReportTemplates,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeZoneConfig {
    /// Label printed after the time, e.g. "IST"
    pub label: String,

    /// Offset east of UTC
    pub utc_offset_minutes: i32,
}

impl TimeZoneConfig {
    pub fn new(label: &str, utc_offset_minutes: i32) -> Self {
        Self {
            label: label.to_string(),
            utc_offset_minutes,
        }
    }

    pub fn offset(&self) -> Result<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ChangelogError::Config(format!(
                    "time zone {}: offset of {} minutes is out of range",
                    self.label, self.utc_offset_minutes
                ))
            })
    }
}

fn default_hash_digits() -> i64 {
    DEFAULT_HASH_DIGITS
}

fn default_time_zones() -> Vec<TimeZoneConfig> {
    vec![TimeZoneConfig::new("IST", 5 * 60 + 30), TimeZoneConfig::new("WIB", 7 * 60)]
}

impl Config {
    /// Load and validate configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChangelogError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
            .map_err(|e| ChangelogError::Config(format!("{}: {}", path.display(), strip_prefix(e))))
    }

    /// Parse and validate configuration from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| ChangelogError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that required fields carry values
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("projectName", &self.project_name),
            ("projectRepoUrl", &self.project_repo_url),
            ("diffUrlTemplate", &self.diff_url_template),
            ("commitUrlTemplate", &self.commit_url_template),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ChangelogError::Config(format!("{} must not be empty", field)));
            }
        }

        for zone in &self.time_zones {
            if zone.label.trim().is_empty() {
                return Err(ChangelogError::Config("time zone label must not be empty".to_string()));
            }
            zone.offset()?;
        }

        Ok(())
    }

    pub fn hash_width(&self) -> HashWidth {
        HashWidth::from_digits(self.commit_hash_digits)
    }
}

fn strip_prefix(err: ChangelogError) -> String {
    match err {
        ChangelogError::Config(msg) => msg,
        other => other.to_string(),
    }
}

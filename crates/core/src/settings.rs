use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::category::{default_categories, Category};
use super::rule::LearnedRule;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Optional user overrides for the column-name search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnHints {
    pub date: Option<String>,
    pub amount: Option<String>,
    pub note: Option<String>,
    pub category: Option<String>,
}

/// Everything the surrounding application hands to a statement import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub currency: String,
    /// Offset of the statement's wall clock from UTC, in minutes.
    pub utc_offset_minutes: i32,
    pub hints: ColumnHints,
    pub rules: Vec<LearnedRule>,
    pub categories: Vec<Category>,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            currency: "RUB".to_string(),
            utc_offset_minutes: 0,
            hints: ColumnHints::default(),
            rules: Vec::new(),
            categories: default_categories(),
        }
    }
}

impl ImportSettings {
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

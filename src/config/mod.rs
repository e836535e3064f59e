mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use crate::triage::ReviewerResolver;
use defaults::*;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

static HEX_COLOR: OnceLock<Option<Regex>> = OnceLock::new();

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            github: GithubConfig::default(),
            labels: default_labels(),
            always_reviewers: default_always_reviewers(),
            ownership: default_ownership(),
        }
    }
}

impl Config {
    /// Load config from a YAML file, returning it with its compiled
    /// ownership rules
    pub fn load(path: &Path) -> Result<(Self, ReviewerResolver), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut config: Config = serde_yaml::from_str(&content)?;
        config.normalize();
        let resolver = config.validate()?;
        Ok((config, resolver))
    }

    /// Load the file if present, otherwise fall back to built-in defaults
    pub fn load_or_default(path: &Path) -> Result<(Self, ReviewerResolver), ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            info!("No config at {:?}, using built-in defaults", path);
            let config = Self::default();
            let resolver = config.validate()?;
            Ok((config, resolver))
        }
    }

    fn normalize(&mut self) {
        for label in &mut self.labels {
            if let Some(color) = label.color.as_mut() {
                *color = color.trim_start_matches('#').to_string();
            }
        }
    }

    /// Validate the config and compile its ownership rules
    pub fn validate(&self) -> Result<ReviewerResolver, ConfigError> {
        for label in &self.labels {
            if let Some(color) = &label.color {
                if !is_hex_color(color) {
                    return Err(ConfigError::InvalidColor {
                        label: label.name.clone(),
                        color: color.clone(),
                    });
                }
            }
        }

        if self.always_reviewers.is_empty()
            || self.always_reviewers.iter().any(|r| r.trim().is_empty())
        {
            return Err(ConfigError::MissingAlwaysReviewer);
        }

        let mut seen = HashSet::new();
        for rule in &self.ownership {
            if rule.name.trim().is_empty() {
                return Err(ConfigError::EmptyRuleName);
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(ConfigError::DuplicateRule(rule.name.clone()));
            }
        }

        ReviewerResolver::from_config(self)
    }
}

fn is_hex_color(color: &str) -> bool {
    HEX_COLOR
        .get_or_init(|| Regex::new("^[0-9a-fA-F]{6}$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(color))
}

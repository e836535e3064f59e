//! Ownership-rule reviewer resolution.
//!
//! Patterns are compiled once per rule into a `GlobSet` with literal
//! separators, so `*` stays within one path segment and a `**` component
//! spans any number of them. A pattern without `/` matches the file name at
//! any depth; a pattern with `/` is anchored at the repository root.

use crate::config::{Config, OwnershipRule};
use crate::error::{ConfigError, GitHubError};
use crate::github::RepositoryApi;
use crate::triage::PrNumber;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::Serialize;
use tracing::info;

#[derive(Debug)]
struct CompiledRule {
    name: String,
    matcher: GlobSet,
    reviewers: Vec<String>,
}

#[derive(Debug)]
pub struct ReviewerResolver {
    rules: Vec<CompiledRule>,
    always: Vec<String>,
}

/// Reviewers to request and the teams whose rules triggered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewerAssignment {
    pub reviewers: Vec<String>,
    pub teams: Vec<String>,
}

impl ReviewerAssignment {
    /// True when only always-include reviewers were selected
    pub fn no_team_matched(&self) -> bool {
        self.teams.is_empty()
    }
}

impl ReviewerResolver {
    pub fn new(rules: &[OwnershipRule], always: &[String]) -> Result<Self, ConfigError> {
        let rules = rules
            .iter()
            .map(compile_rule)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rules,
            always: always.to_vec(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::new(&config.ownership, &config.always_reviewers)
    }

    /// Union of always-include reviewers and the reviewers of every rule
    /// matching at least one path. Order follows configuration; no duplicates.
    pub fn resolve<S: AsRef<str>>(&self, paths: &[S]) -> ReviewerAssignment {
        let mut assignment = ReviewerAssignment::default();
        for reviewer in &self.always {
            push_unique(&mut assignment.reviewers, reviewer);
        }

        for rule in &self.rules {
            let triggered = paths
                .iter()
                .any(|p| rule.matcher.is_match(normalize_path(p.as_ref())));
            if !triggered {
                continue;
            }
            push_unique(&mut assignment.teams, &rule.name);
            for reviewer in &rule.reviewers {
                push_unique(&mut assignment.reviewers, reviewer);
            }
        }

        assignment
    }
}

/// Request reviews for a resolved assignment. Nothing is sent when the
/// assignment has no reviewers.
pub async fn request_reviewers(
    api: &dyn RepositoryApi,
    pr: PrNumber,
    assignment: &ReviewerAssignment,
) -> Result<(), GitHubError> {
    if assignment.no_team_matched() {
        info!("No specialized reviewers needed for PR {}", pr);
    } else {
        info!(
            "Requesting reviews from teams: {}",
            assignment.teams.join(", ")
        );
    }
    if assignment.reviewers.is_empty() {
        return Ok(());
    }

    api.request_reviewers(pr.get(), &assignment.reviewers).await?;
    info!("Requested reviews from: {}", assignment.reviewers.join(", "));
    Ok(())
}

fn compile_rule(rule: &OwnershipRule) -> Result<CompiledRule, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in &rule.patterns {
        let glob = GlobBuilder::new(&expand_pattern(pattern))
            .literal_separator(true)
            .build()
            .map_err(|e| ConfigError::GlobPattern {
                rule: rule.name.clone(),
                pattern: pattern.clone(),
                source: e,
            })?;
        builder.add(glob);
    }
    let matcher = builder.build().map_err(|e| ConfigError::GlobPattern {
        rule: rule.name.clone(),
        pattern: "pattern set".to_string(),
        source: e,
    })?;

    Ok(CompiledRule {
        name: rule.name.clone(),
        matcher,
        reviewers: rule.reviewers.clone(),
    })
}

fn expand_pattern(pattern: &str) -> String {
    let pattern = pattern.trim();
    if let Some(anchored) = pattern.strip_prefix("./").or_else(|| pattern.strip_prefix('/')) {
        anchored.to_string()
    } else if pattern.contains('/') {
        pattern.to_string()
    } else {
        format!("**/{}", pattern)
    }
}

fn normalize_path(path: &str) -> &str {
    path.trim_start_matches("./").trim_start_matches('/')
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

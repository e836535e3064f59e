use super::types::{LabelSpec, OwnershipRule};

pub fn default_version() -> u32 {
    1
}

pub fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

pub fn default_timeout_sec() -> u64 {
    30
}

pub fn default_user_agent() -> String {
    format!("prtriage/{}", env!("CARGO_PKG_VERSION"))
}

pub fn default_always_reviewers() -> Vec<String> {
    vec!["mfpiccolo".to_string()]
}

pub fn default_labels() -> Vec<LabelSpec> {
    vec![
        LabelSpec::new("bug", Some("d73a4a")),
        LabelSpec::new("feature", Some("a2eeef")),
        LabelSpec::new("needs-review", Some("00ff00")),
        LabelSpec::new("code-changes", Some("0000ff")),
    ]
}

pub fn default_ownership() -> Vec<OwnershipRule> {
    vec![
        rule(
            "frontend",
            &["src/frontend/**", "*.tsx", "*.jsx", "*.css", "*.scss"],
            &["frontend-team-member1", "frontend-team-member2"],
        ),
        rule(
            "backend",
            &["src/backend/**", "*.py", "*.go", "*.java"],
            &["backend-team-member1", "backend-team-member2"],
        ),
        rule(
            "infrastructure",
            &[
                "Dockerfile",
                "docker-compose.yml",
                "*.yaml",
                "*.yml",
                "terraform/**",
            ],
            &["devops-team-member1", "devops-team-member2"],
        ),
    ]
}

fn rule(name: &str, patterns: &[&str], reviewers: &[&str]) -> OwnershipRule {
    OwnershipRule {
        name: name.to_string(),
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
        reviewers: reviewers.iter().map(|r| r.to_string()).collect(),
    }
}

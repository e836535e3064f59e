/// Emitted for every triaged PR, after the content label.
pub const CODE_CHANGES_LABEL: &str = "code-changes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Bug,
    Feature,
    NeedsReview,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Bug => "bug",
            Category::Feature => "feature",
            Category::NeedsReview => "needs-review",
        }
    }
}

/// Keyword heuristic over title and body, checked in priority order
pub fn categorize(title: &str, body: Option<&str>) -> Category {
    let title = title.to_lowercase();
    let body = body.unwrap_or_default().to_lowercase();
    let mentions = |word: &str| title.contains(word) || body.contains(word);

    if mentions("fix") {
        Category::Bug
    } else if mentions("feature") {
        Category::Feature
    } else {
        Category::NeedsReview
    }
}

/// Labels for a PR: the content label first, then `code-changes`.
pub fn classify(title: &str, body: Option<&str>) -> Vec<String> {
    vec![
        categorize(title, body).label().to_string(),
        CODE_CHANGES_LABEL.to_string(),
    ]
}

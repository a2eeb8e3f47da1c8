use std::fmt;

use crate::Intent;

pub const MAX_TITLE_LENGTH: usize = 120;

/// Collapses every whitespace run into a single space and trims the ends.
pub fn sanitize_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A title is valid when its trimmed form has between 1 and 120 characters.
pub fn is_title_valid(title: &str) -> bool {
    let trimmed = title.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= MAX_TITLE_LENGTH
}

/// One keyword per line; surrounding whitespace and blank lines are dropped.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Drops the primary intent and repeated entries, keeping first-seen order.
pub fn normalize_secondary_intents(primary: Intent, secondary: &[Intent]) -> Vec<Intent> {
    let mut out: Vec<Intent> = Vec::with_capacity(secondary.len());
    for intent in secondary {
        if *intent != primary && !out.contains(intent) {
            out.push(*intent);
        }
    }
    out
}

/// Local validation failures; these never reach the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyKeywords,
    InvalidTitle,
    MissingAuthor,
    MissingVoice,
    MissingPrimaryIntent,
    EmptyAuthorName,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyKeywords => {
                write!(f, "enter at least one keyword before generating titles")
            }
            ValidationError::InvalidTitle => write!(
                f,
                "title must not be empty and at most {MAX_TITLE_LENGTH} characters"
            ),
            ValidationError::MissingAuthor => write!(f, "select an author"),
            ValidationError::MissingVoice => write!(f, "select a voice"),
            ValidationError::MissingPrimaryIntent => write!(f, "select a primary intent"),
            ValidationError::EmptyAuthorName => write!(f, "author name must not be empty"),
        }
    }
}

use thiserror::Error;

/// Errors surfaced by [`crate::RecipeScraper::fetch_recipe`].
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The URL does not contain the substring its site registration requires.
    /// Raised before any network access.
    #[error("url '{url}' must include '{expected}'")]
    UrlMismatch { url: String, expected: String },

    /// Network retrieval failed or returned a non-success status
    #[error("Failed to fetch page: {0}")]
    Transport(#[from] FetchError),

    /// No Recipe-typed structured data normalized into a valid recipe
    #[error("No recipe found on page")]
    NoStructuredDataFound,

    /// A candidate node could not be mapped. Only surfaced by direct calls
    /// to the normalizer; the pipeline moves on to the next candidate.
    #[error("Failed to normalize recipe candidate: {0}")]
    Normalization(#[from] NormalizeError),

    /// The final recipe failed schema checks
    #[error("Recipe failed validation: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Coarse classification of a [`ScrapeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UrlMismatch,
    Transport,
    NoStructuredDataFound,
    Normalization,
    Validation,
    Config,
}

impl ScrapeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScrapeError::UrlMismatch { .. } => ErrorKind::UrlMismatch,
            ScrapeError::Transport(_) => ErrorKind::Transport,
            ScrapeError::NoStructuredDataFound => ErrorKind::NoStructuredDataFound,
            ScrapeError::Normalization(_) => ErrorKind::Normalization,
            ScrapeError::Validation(_) => ErrorKind::Validation,
            ScrapeError::Config(_) => ErrorKind::Config,
        }
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server responded with status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Headless fetch failed: {0}")]
    Headless(String),
}

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("candidate is not a JSON object")]
    NotAnObject,

    #[error("candidate has an unexpected shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("instruction section {index} has no itemListElement sequence")]
    MalformedSection { index: usize },
}

/// All schema violations found in a single recipe.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", violations.join("; "))]
pub struct ValidationError {
    pub violations: Vec<String>,
}

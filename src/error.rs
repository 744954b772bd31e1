use thiserror::Error;

/// Failures that abort an analysis.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Failed to read log source {name}: {source}")]
    SourceRead {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single address could not be geolocated. Always recovered into a
/// placeholder record by the enricher.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Invalid lookup URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Service answered with HTTP {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Service rejected lookup: {}", .0.as_deref().unwrap_or("no reason given"))]
    Rejected(Option<String>),

    #[error("Response did not echo the queried address")]
    MissingAddress,
}

pub type Result<T> = std::result::Result<T, AnalyzeError>;

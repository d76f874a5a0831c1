use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("No article at position {0} on this page")]
    NoSuchArticle(usize),

    #[error("{}", .0.user_message())]
    Fetch(#[from] FetchError),

    #[error("Narration error: {0}")]
    Narration(#[from] NarrationError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub const NETWORK_FAILURE_MESSAGE: &str =
    "Network error: Unable to connect to the server. Please check your internet connection.";
pub const INVALID_RESPONSE_MESSAGE: &str =
    "Invalid API response: The server returned unexpected data.";
pub const UNKNOWN_FAILURE_MESSAGE: &str = "An error occurred while fetching articles.";

/// Why an article fetch failed.
///
/// All three kinds end up in front of the user as a single message plus a
/// retry action; only the message text differs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server could not be reached (connect error, DNS, timeout).
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The body was JSON but not the `{ "results": [...] }` we expect.
    #[error("invalid response shape: {0}")]
    InvalidResponseShape(String),

    #[error("unknown failure: {0}")]
    Unknown(String),
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::NetworkFailure(_) => NETWORK_FAILURE_MESSAGE,
            FetchError::InvalidResponseShape(_) => INVALID_RESPONSE_MESSAGE,
            FetchError::Unknown(_) => UNKNOWN_FAILURE_MESSAGE,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            FetchError::NetworkFailure(err.to_string())
        } else {
            FetchError::Unknown(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match err.classify() {
            // Parsed fine, wrong shape.
            Category::Data => FetchError::InvalidResponseShape(err.to_string()),
            Category::Syntax | Category::Eof | Category::Io => FetchError::Unknown(err.to_string()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NarrationError {
    #[error("speech synthesis is not available: {0}")]
    CapabilityUnavailable(String),

    #[error("speech playback failed: {0}")]
    Playback(String),
}

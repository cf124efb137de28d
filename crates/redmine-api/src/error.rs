use thiserror::Error;

#[derive(Error, Debug)]
pub enum RedmineError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Date parse error: {0}")]
    DateParse(String),

    #[error("Missing {0} id")]
    MissingId(&'static str),
}

impl RedmineError {
    /// True for failures that came from the HTTP exchange itself rather than
    /// from mapping the response body.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            RedmineError::Http(_)
                | RedmineError::Unauthorized
                | RedmineError::NotFound(_)
                | RedmineError::Api { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RedmineError>;

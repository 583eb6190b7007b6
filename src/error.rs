use thiserror::Error;

/// Define a convenient Result type
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Vela API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("{path} still had results after {pages} pages")]
    TooManyPages { path: String, pages: usize },

    #[error("{0}")]
    Config(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Config(format!("{err:#}"))
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForkScoutError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("github error: {0}")]
    GitHub(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ForkScoutError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KiokuError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("Remote store error: {0}")]
    RemoteStore(String),

    #[error("KiokuError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for KiokuError {
    fn from(error: std::io::Error) -> Self {
        KiokuError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for KiokuError {
    fn from(error: reqwest::Error) -> Self {
        KiokuError::Reqwest(Box::new(error))
    }
}

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("script {0} not found")]
    ScriptNotFound(Uuid),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("import failed: {0}")]
    Import(String),
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error("ad provider error: {0}")]
    Ads(String),
    #[error("prompter session is closed")]
    SessionClosed,
}

pub type Result<T> = std::result::Result<T, Error>;

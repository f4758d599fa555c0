use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("invalid listing selector {0:?}")]
    Selector(String),
    #[error("invalid id pattern")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("offer store I/O failed at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize offers")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("invalid mailbox {0:?}")]
    Address(String),
    #[error("failed to build message")]
    Message(#[from] lettre::error::Error),
    #[error("smtp transport error")]
    Transport(#[from] lettre::transport::smtp::Error),
}

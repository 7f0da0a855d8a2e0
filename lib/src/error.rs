use std::backtrace::Backtrace;
use std::fmt::{Display, Formatter};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub backtrace: Backtrace,
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    /// Client-caused errors carry no side effects and are reported back as
    /// such.
    pub fn is_client_error(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidRequest(_))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if self.backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            write!(f, ", {}", self.backtrace)?;
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ErrorKind {
    /// Missing or malformed input. The message is returned to the caller
    /// as-is.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("failed fetching upstream image: {0}")]
    UpstreamFetch(reqwest::Error),

    #[error("failed writing to storage: {0}")]
    StorageWrite(std::io::Error),
    #[error("failed reading from storage: {0}")]
    StorageRead(std::io::Error),

    #[error("unexpected error")]
    StdIoError(#[from] std::io::Error),

    #[error("config error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("other error: {0}")]
    Other(String),
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Self::new(ErrorKind::ConfigError(e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::new(ErrorKind::JsonError(e))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::StdIoError(e))
    }
}

impl From<ErrorKind> for Error {
    fn from(k: ErrorKind) -> Self {
        Self::new(k)
    }
}

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParamError {
    #[error("missing required arguments: {0}")]
    Missing(String),
    #[error("failed to read args file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse args file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Both variants surface to the caller as the same message; only a
/// delivery failure knows the status code.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to send message")]
    Delivery { status: u16 },
    #[error("failed to send message")]
    Transport(#[source] reqwest::Error),
}

// reqwest errors carry the request url, which embeds the webhook token
impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        NotifyError::Transport(e.without_url())
    }
}

impl NotifyError {
    /// Every error in the source chain, outermost first.
    pub fn causes(&self) -> Vec<String> {
        let mut causes = Vec::new();
        let mut source = std::error::Error::source(self);
        while let Some(e) = source {
            causes.push(e.to_string());
            source = e.source();
        }
        causes
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            NotifyError::Delivery { status } => Some(*status),
            NotifyError::Transport(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReturnError {
    /// No wallet provider or account at submit time. Carries the message
    /// shown to the user.
    #[error("{0}")]
    WalletNotConnected(String),
    #[error(transparent)]
    Operation(#[from] anyhow::Error),
}

impl ReturnError {
    /// Text for the error notice, or `None` when the failure carried no
    /// message of its own.
    pub fn user_message(&self) -> Option<String> {
        let message = self.to_string();
        let message = message.trim();
        if message.is_empty() {
            None
        } else {
            Some(message.to_owned())
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a whole number of milliseconds, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("balance poll interval must be greater than zero")]
    ZeroPollInterval,
    #[error("balance poll interval cannot exceed {max} ms, got {value}")]
    PollIntervalTooLong { max: u64, value: u64 },
    #[error("{field} cannot be empty")]
    BlankMessage { field: &'static str },
    #[error("destination prefix cannot be empty")]
    EmptyDestinationPrefix,
}

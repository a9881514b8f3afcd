use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Connectivity error: {0}")]
    Connectivity(String),

    #[error("Network not found: {0}")]
    NotFound(String),

    #[error("Keystore error: {0}")]
    Keystore(String),

    #[error("Mnemonic error: {0}")]
    Mnemonic(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, WalletError>;

impl WalletError {
    /// Message shown next to a form field. Drops the variant prefix the
    /// `Display` impl adds so the UI gets only the backend's text.
    pub fn user_message(&self) -> String {
        match self {
            WalletError::Validation(msg)
            | WalletError::Transport(msg)
            | WalletError::Connectivity(msg)
            | WalletError::Keystore(msg)
            | WalletError::Mnemonic(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

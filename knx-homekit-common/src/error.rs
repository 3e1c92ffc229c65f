use thiserror::Error;

/// Common error type for the KNX/HomeKit bridge.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid group address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("Unknown datapoint type: {0}")]
    Dpt(String),
}

impl Error {
    /// Create a group address error.
    pub fn address(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Address {
            address: address.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias using the bridge's common Error.
pub type Result<T> = std::result::Result<T, Error>;

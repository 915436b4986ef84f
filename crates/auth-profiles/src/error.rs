use {clawmux_common::FromMessage, clawmux_vault::VaultError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A secret reference could not be resolved. Nothing was written.
    #[error("agent '{agent_id}': {source}")]
    Secret {
        agent_id: String,
        #[source]
        source: VaultError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{message}")]
    Message { message: String },
}

impl Error {
    /// Whether this is a secret-resolution failure, which leaves disk untouched.
    pub fn is_secret_failure(&self) -> bool {
        matches!(self, Self::Secret { .. })
    }
}

impl FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

clawmux_common::impl_context!();

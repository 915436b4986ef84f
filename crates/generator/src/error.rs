use clawmux_common::FromMessage;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Only reachable when generation is handed an unvalidated config.
    #[error("user '{user_id}': {source}")]
    Identifier {
        user_id: String,
        #[source]
        source: clawmux_identifiers::Error,
    },
    #[error(transparent)]
    Fs(#[from] clawmux_common::Error),
    #[error("{message}")]
    Message { message: String },
}

impl FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

clawmux_common::impl_context!();

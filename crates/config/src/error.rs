use clawmux_common::FromMessage;

/// Errors raised while loading or validating a users config.
///
/// Every variant is fatal for the whole config: nothing is generated from a
/// document that fails any check.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structurally invalid document.
    #[error("malformed users config: {message}")]
    MalformedInput { message: String },

    /// A user's identifier does not parse.
    #[error("user '{user_id}': {source}")]
    IdentifierFormat {
        user_id: String,
        #[source]
        source: clawmux_identifiers::Error,
    },

    /// Two users share an id.
    #[error("duplicate user id '{id}' (users[{first_index}] and users[{second_index}])")]
    DuplicateUser {
        id: String,
        first_index: usize,
        second_index: usize,
    },

    /// Two users claim the same `channel:peerId`.
    #[error("identity '{key}' is claimed by both '{first_owner}' and '{second_owner}'")]
    IdentityCollision {
        key: String,
        first_owner: String,
        second_owner: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Json5(#[from] json5::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    /// Duplicate user ids and duplicate identity ownership are both collisions.
    pub fn is_collision(&self) -> bool {
        matches!(
            self,
            Self::DuplicateUser { .. } | Self::IdentityCollision { .. }
        )
    }
}

impl FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

clawmux_common::impl_context!();

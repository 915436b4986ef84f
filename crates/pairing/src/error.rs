#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown user '{user_id}'")]
    UnknownUser { user_id: String },
    /// The updated users config no longer validates (e.g. the identity is
    /// already claimed by another user).
    #[error(transparent)]
    Config(#[from] clawmux_config::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

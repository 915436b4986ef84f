use clawmux_vault::VaultError;

/// Errors that abort a provisioning run before any per-user work.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] clawmux_config::Error),
    #[error(transparent)]
    Generate(#[from] clawmux_generator::Error),
    /// A `shared.env` reference could not be resolved.
    #[error("shared env: {0}")]
    SharedSecret(#[source] VaultError),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Secret reference resolution.
//!
//! User configs may hold `op://vault/item/field` references instead of
//! plaintext credentials. They are resolved only when credentials are written
//! to disk, through an injectable [`SecretResolver`]. The production backend
//! is the 1Password CLI ([`OnePasswordResolver`]).

pub mod error;
pub mod memo;
pub mod onepassword;
pub mod resolve;
pub mod traits;

pub use {
    error::VaultError,
    memo::MemoizingResolver,
    onepassword::OnePasswordResolver,
    resolve::{
        SECRET_REFERENCE_SCHEME, has_secret_references, is_secret_reference, resolve_env_map,
        resolve_secret_reference, resolve_user_secrets,
    },
    traits::SecretResolver,
};

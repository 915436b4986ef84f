//! Users config: schema, loading, `${ENV_VAR}` substitution and validation.
//!
//! Config files: `users.json`, `users.json5`, `users.yaml`/`users.yml`, or
//! `users.toml`.
//! A config is always validated in full before anything is generated from it.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{
        ConfigFormat, config_dir, find_users_config, find_users_config_in, load_users_config,
        parse_users_config,
    },
    schema::{AuthEntry, DefaultsConfig, SharedConfig, UserProfile, UsersConfig},
    validate::validate_users_config,
};

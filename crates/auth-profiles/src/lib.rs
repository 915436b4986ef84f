//! Per-agent credential files.
//!
//! Builds each user's `auth-profiles.json` from their env vars and explicit
//! auth entries, resolves secret references, and merges the result into the
//! file already on disk without dropping entries managed elsewhere.

pub mod build;
pub mod error;
pub mod providers;
pub mod store;
pub mod write;

pub use {
    build::build_auth_profiles,
    error::{Error, Result},
    providers::{infer_provider_slug, provider_for_env_var},
    store::{
        AUTH_PROFILES_FILE, AuthProfileStore, StoredAuthProfiles, auth_profiles_path,
        load_auth_profiles, merge_stores,
    },
    write::{WriteAuthProfilesResult, WriteOptions, write_auth_profiles},
};

use std::path::{Path, PathBuf};

use {
    clawmux_common::fs,
    clawmux_config::UserProfile,
    clawmux_vault::{SecretResolver, has_secret_references, resolve_user_secrets},
    tracing::{debug, info},
};

use crate::{
    build::build_auth_profiles,
    error::{Context, Error, Result},
    store::{auth_profiles_path, load_auth_profiles, merge_stores},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Compute and report, but leave the filesystem untouched.
    pub dry_run: bool,
}

impl WriteOptions {
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }
}

/// Outcome of [`write_auth_profiles`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteAuthProfilesResult {
    pub path: PathBuf,
    /// Profiles generated for this user.
    pub profile_count: usize,
    /// Profiles in the resulting file, including preserved existing ones.
    pub total_count: usize,
    /// Whether an existing store was merged into.
    pub merged: bool,
    /// Whether anything was written.
    pub written: bool,
}

/// Generate `profile`'s credentials and merge them into its agent's
/// `auth-profiles.json` under `state_dir`.
///
/// Secret references are resolved first; a resolution failure returns before
/// any disk access. A user with no credentials returns early without touching
/// disk. Concurrent calls for the same agent are not serialized.
pub async fn write_auth_profiles(
    state_dir: &Path,
    profile: &UserProfile,
    resolver: &dyn SecretResolver,
    options: WriteOptions,
) -> Result<WriteAuthProfilesResult> {
    let path = auth_profiles_path(state_dir, &profile.id);

    let store = if has_secret_references(profile) {
        let resolved = resolve_user_secrets(resolver, profile)
            .await
            .map_err(|source| Error::Secret {
                agent_id: profile.id.clone(),
                source,
            })?;
        build_auth_profiles(&resolved)
    } else {
        build_auth_profiles(profile)
    };

    if store.is_empty() {
        debug!(agent = %profile.id, "no credentials to write");
        return Ok(WriteAuthProfilesResult {
            path,
            profile_count: 0,
            total_count: 0,
            merged: false,
            written: false,
        });
    }

    let existing = load_auth_profiles(&path)?;
    let merged = existing.is_some();
    let combined = merge_stores(existing, &store)?;
    let total_count = combined.profiles.len();

    if options.dry_run {
        info!(
            agent = %profile.id,
            path = %path.display(),
            profiles = store.len(),
            merged,
            "dry run, not writing auth profiles"
        );
    } else {
        fs::write_json_atomic(&path, &combined, true)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(
            agent = %profile.id,
            path = %path.display(),
            profiles = store.len(),
            total = total_count,
            merged,
            "wrote auth profiles"
        );
    }

    Ok(WriteAuthProfilesResult {
        path,
        profile_count: store.len(),
        total_count,
        merged,
        written: !options.dry_run,
    })
}

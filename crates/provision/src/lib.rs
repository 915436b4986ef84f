//! Provisioning pipeline.
//!
//! One run generates the gateway config for every user, writes it, then
//! writes each user's `auth-profiles.json`. A credential failure for one user
//! is recorded in the [`ProvisionReport`] and the run moves on.

pub mod error;
pub mod report;

use std::path::{Path, PathBuf};

use {
    clawmux_auth_profiles::{WriteOptions, write_auth_profiles},
    clawmux_config::{UsersConfig, load_users_config},
    clawmux_generator::{generate_config, write_generated_config},
    clawmux_vault::{MemoizingResolver, SecretResolver, is_secret_reference, resolve_env_map},
    tracing::{info, warn},
};

pub use {
    error::{Error, Result},
    report::{ProvisionReport, UserReport, UserStatus},
};

#[derive(Debug, Clone, Default)]
pub struct ProvisionOptions {
    /// Where the generated gateway config is written.
    pub output_path: PathBuf,
    /// Gateway state directory holding `agents/<id>/agent/`.
    pub state_dir: PathBuf,
    pub dry_run: bool,
    /// Resolve `shared.env` references in the written config instead of
    /// leaving them for the gateway.
    pub resolve_shared_env: bool,
}

impl ProvisionOptions {
    pub fn new(output_path: impl Into<PathBuf>, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            state_dir: state_dir.into(),
            ..Default::default()
        }
    }
}

/// Provision every user in `config`.
///
/// Generation and shared env resolution happen before anything is written, so
/// an error there leaves disk untouched. Secrets are memoized for this run only.
pub async fn provision(
    config: &UsersConfig,
    options: &ProvisionOptions,
    resolver: &dyn SecretResolver,
) -> Result<ProvisionReport> {
    let mut generated = generate_config(config)?;
    let resolver = MemoizingResolver::new(resolver);

    if options.resolve_shared_env
        && let Some(env) = &generated.env
        && env.values().any(|v| is_secret_reference(v))
    {
        let resolved = resolve_env_map(&resolver, env)
            .await
            .map_err(Error::SharedSecret)?;
        generated.env = Some(resolved);
    }

    write_generated_config(&options.output_path, &generated, options.dry_run)?;

    let mut report = ProvisionReport {
        config_path: options.output_path.clone(),
        dry_run: options.dry_run,
        agent_count: generated.agents.list.len(),
        binding_count: generated.binding_count(),
        channel_count: generated.channels.len(),
        users: Vec::with_capacity(config.users.len()),
    };

    let write_options = WriteOptions {
        dry_run: options.dry_run,
    };
    for user in &config.users {
        match write_auth_profiles(&options.state_dir, user, &resolver, write_options).await {
            Ok(result) => {
                let status = match (result.profile_count, result.written) {
                    (0, _) => UserStatus::NoCredentials,
                    (_, true) => UserStatus::Written,
                    (_, false) => UserStatus::Planned,
                };
                report.add_user(UserReport {
                    user_id: user.id.clone(),
                    status,
                    auth_path: (result.profile_count > 0).then_some(result.path),
                    profile_count: result.profile_count,
                    merged: result.merged,
                    error: None,
                });
            },
            Err(e) => {
                warn!(user = %user.id, error = %e, "failed to write auth profiles");
                report.add_user(UserReport::failed(&user.id, e));
            },
        }
    }

    info!(
        agents = report.agent_count,
        bindings = report.binding_count,
        failed = report.failed_users().count(),
        dry_run = options.dry_run,
        "provisioning finished"
    );
    Ok(report)
}

/// Load and validate a users config file, then [`provision`] it.
pub async fn provision_from_path(
    users_path: &Path,
    options: &ProvisionOptions,
    resolver: &dyn SecretResolver,
) -> Result<ProvisionReport> {
    let config = load_users_config(users_path)?;
    provision(&config, options, resolver).await
}

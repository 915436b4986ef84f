//! Copy-on-write resolution of secret references inside user profiles.

use std::collections::BTreeMap;

use {clawmux_config::UserProfile, secrecy::ExposeSecret, tracing::debug};

use crate::{error::Result, traits::SecretResolver};

/// URI scheme that marks a value as an indirect secret reference.
pub const SECRET_REFERENCE_SCHEME: &str = "op://";

/// Whether `value` is a secret reference rather than a plaintext value.
pub fn is_secret_reference(value: &str) -> bool {
    value.trim_start().starts_with(SECRET_REFERENCE_SCHEME)
}

/// Cheap pre-check: does any env value or auth credential need resolving?
pub fn has_secret_references(profile: &UserProfile) -> bool {
    profile.env_iter().any(|(_, v)| is_secret_reference(v))
        || profile
            .auth_iter()
            .any(|(_, entry)| entry.credentials().into_iter().any(is_secret_reference))
}

/// Resolve `value` if it is a reference; return it unchanged otherwise.
pub async fn resolve_secret_reference(resolver: &dyn SecretResolver, value: &str) -> Result<String> {
    if !is_secret_reference(value) {
        return Ok(value.to_string());
    }
    let secret = resolver.resolve(value.trim()).await?;
    Ok(secret.expose_secret().clone())
}

/// Resolve every reference in an env map, returning a new map.
pub async fn resolve_env_map(
    resolver: &dyn SecretResolver,
    env: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>> {
    let mut resolved = BTreeMap::new();
    for (name, value) in env {
        resolved.insert(name.clone(), resolve_secret_reference(resolver, value).await?);
    }
    Ok(resolved)
}

/// Return a copy of `profile` with every env value and every credential field
/// of every auth entry resolved. `profile` itself is never modified.
pub async fn resolve_user_secrets(
    resolver: &dyn SecretResolver,
    profile: &UserProfile,
) -> Result<UserProfile> {
    let mut resolved = profile.clone();

    if let Some(env) = &profile.env {
        resolved.env = Some(resolve_env_map(resolver, env).await?);
    }

    if let Some(auth) = resolved.auth.as_mut() {
        for entry in auth.values_mut() {
            for field in entry.credentials_mut() {
                if is_secret_reference(field) {
                    *field = resolve_secret_reference(resolver, field.as_str()).await?;
                }
            }
        }
    }

    debug!(user = %profile.id, "resolved user secrets");
    Ok(resolved)
}

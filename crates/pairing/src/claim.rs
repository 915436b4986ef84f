use {
    clawmux_config::{UsersConfig, validate_users_config},
    clawmux_identifiers::ParsedIdentifier,
    tracing::info,
};

use crate::error::{Error, Result};

/// Return a copy of `config` with `identity` added to `user_id`'s identifiers.
///
/// The result is re-validated, so a claim on an identity another user already
/// owns is rejected. Claiming an identity the user already has is a no-op.
pub fn apply_claim(
    config: &UsersConfig,
    user_id: &str,
    identity: &ParsedIdentifier,
) -> Result<UsersConfig> {
    let mut updated = config.clone();
    let user = updated
        .users
        .iter_mut()
        .find(|u| u.id == user_id)
        .ok_or_else(|| Error::UnknownUser {
            user_id: user_id.to_string(),
        })?;

    let raw = identity.key();
    if !user.identifiers.contains(&raw) {
        user.identifiers.push(raw);
    }

    let validated = validate_users_config(&serde_json::to_value(&updated)?)?;
    info!(user = user_id, identity = %identity, "identity claim applied");
    Ok(validated)
}

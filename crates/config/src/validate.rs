//! Users config validation.
//!
//! Checks run in order and stop at the first failure:
//! 1. document shape (`users` array of objects),
//! 2. per-user id and identifier presence, id uniqueness,
//! 3. typed deserialization of the whole document,
//! 4. identifier grammar and cross-user identity ownership.

use std::collections::HashMap;

use {clawmux_identifiers::parse_all_identifiers, serde_json::Value, tracing::debug};

use crate::{
    error::{Error, Result},
    schema::UsersConfig,
};

/// Validate a raw JSON document and return the typed config.
///
/// Never returns partially validated data: any failure aborts the whole
/// document.
pub fn validate_users_config(raw: &Value) -> Result<UsersConfig> {
    let root = raw
        .as_object()
        .ok_or_else(|| Error::malformed("expected a JSON object at the top level"))?;
    let users = root
        .get("users")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::malformed("expected a \"users\" array"))?;

    let mut id_index: HashMap<&str, usize> = HashMap::new();
    for (index, user) in users.iter().enumerate() {
        let user = user
            .as_object()
            .ok_or_else(|| Error::malformed(format!("users[{index}] is not an object")))?;

        let id = user
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                Error::malformed(format!("users[{index}] is missing a non-empty string \"id\""))
            })?;
        if !is_url_safe(id) {
            return Err(Error::malformed(format!(
                "user id '{id}' must contain only letters, digits, '-', '_', '.' or '~'"
            )));
        }
        if let Some(&first_index) = id_index.get(id) {
            return Err(Error::DuplicateUser {
                id: id.to_string(),
                first_index,
                second_index: index,
            });
        }
        id_index.insert(id, index);

        let identifiers = user
            .get("identifiers")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                Error::malformed(format!("user '{id}' is missing an \"identifiers\" array"))
            })?;
        if identifiers.is_empty() {
            return Err(Error::malformed(format!("user '{id}' has no identifiers")));
        }
        if let Some(pos) = identifiers.iter().position(|v| !v.is_string()) {
            return Err(Error::malformed(format!(
                "user '{id}' identifiers[{pos}] is not a string"
            )));
        }
    }

    let config: UsersConfig = serde_json::from_value(raw.clone())
        .map_err(|e| Error::malformed(format!("invalid field: {e}")))?;

    check_identity_ownership(&config)?;

    debug!(users = config.users.len(), "users config validated");
    Ok(config)
}

/// Every `channel:peerId` must belong to at most one user.
fn check_identity_ownership(config: &UsersConfig) -> Result<()> {
    let mut owners: HashMap<String, &str> = HashMap::new();
    for user in &config.users {
        let parsed =
            parse_all_identifiers(&user.identifiers).map_err(|source| Error::IdentifierFormat {
                user_id: user.id.clone(),
                source,
            })?;
        for ident in parsed {
            let key = ident.key();
            match owners.get(key.as_str()) {
                Some(&owner) if owner != user.id => {
                    return Err(Error::IdentityCollision {
                        key,
                        first_owner: owner.to_string(),
                        second_owner: user.id.clone(),
                    });
                },
                Some(_) => {},
                None => {
                    owners.insert(key, &user.id);
                },
            }
        }
    }
    Ok(())
}

/// RFC 3986 unreserved characters. `.` and `..` are refused because ids
/// become path components.
fn is_url_safe(id: &str) -> bool {
    id != "."
        && id != ".."
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~'))
}

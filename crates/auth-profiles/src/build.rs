use {clawmux_config::{AuthEntry, UserProfile}, tracing::debug};

use crate::{providers::provider_for_env_var, store::AuthProfileStore};

/// Label used for profiles derived from env vars.
pub const DEFAULT_PROFILE_LABEL: &str = "default";

/// Build the credential store for one user.
///
/// Every env var becomes `<provider>:default` as an `api_key` entry. Explicit
/// `auth` entries are copied as-is and replace env-derived entries with the
/// same id. Values are taken verbatim, so resolve secret references first.
pub fn build_auth_profiles(profile: &UserProfile) -> AuthProfileStore {
    let mut store = AuthProfileStore::default();

    for (var, value) in profile.env_iter() {
        let provider = provider_for_env_var(var);
        let id = format!("{provider}:{DEFAULT_PROFILE_LABEL}");
        if store
            .profiles
            .insert(id.clone(), AuthEntry::api_key(provider, value.as_str()))
            .is_some()
        {
            debug!(
                user = %profile.id,
                profile_id = %id,
                env_var = %var,
                "env var replaces an earlier key for the same provider"
            );
        }
    }

    for (id, entry) in profile.auth_iter() {
        if store.profiles.insert(id.clone(), entry.clone()).is_some() {
            debug!(user = %profile.id, profile_id = %id, "explicit auth entry overrides env-derived key");
        }
    }

    store
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::BTreeMap;

    use {super::*, serde_json::json};

    fn user(env: &[(&str, &str)]) -> UserProfile {
        let mut profile = UserProfile::new("alice", ["+1234567890"]);
        profile.env = Some(
            env.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        profile
    }

    #[test]
    fn env_vars_become_default_api_keys() {
        let store = build_auth_profiles(&user(&[
            ("ANTHROPIC_API_KEY", "sk-ant"),
            ("GEMINI_API_KEY", "gm"),
            ("BRAVE_API_KEY", "brave"),
        ]));

        assert_eq!(store.len(), 3);
        assert_eq!(
            store.get("anthropic:default"),
            Some(&AuthEntry::api_key("anthropic", "sk-ant"))
        );
        assert_eq!(store.get("google:default").unwrap().provider(), "google");
        assert_eq!(store.get("brave:default").unwrap().provider(), "brave");
    }

    #[test]
    fn vars_sharing_a_provider_keep_the_last_in_name_order() {
        let store = build_auth_profiles(&user(&[
            ("GOOGLE_API_KEY", "from-google"),
            ("GEMINI_API_KEY", "from-gemini"),
        ]));

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("google:default"),
            Some(&AuthEntry::api_key("google", "from-google"))
        );
    }

    #[test]
    fn explicit_auth_wins_over_env() {
        let mut profile = user(&[("ANTHROPIC_API_KEY", "from-env")]);
        profile.auth = Some(BTreeMap::from([
            (
                "anthropic:default".to_string(),
                AuthEntry::api_key("anthropic", "from-auth"),
            ),
            (
                "anthropic:work".to_string(),
                AuthEntry::api_key("anthropic", "work"),
            ),
        ]));

        let store = build_auth_profiles(&profile);
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.get("anthropic:default"),
            Some(&AuthEntry::api_key("anthropic", "from-auth"))
        );
    }

    #[test]
    fn explicit_entries_serialize_without_absent_optionals() {
        let mut profile = UserProfile::new("alice", ["telegram:1"]);
        profile.auth = Some(BTreeMap::from([(
            "openai-codex:default".to_string(),
            AuthEntry::Oauth {
                provider: "openai-codex".into(),
                access: "at".into(),
                refresh: None,
                expires: Some(1_700_000_000_000),
                email: None,
                client_id: None,
                extra: Default::default(),
            },
        )]));

        let store = build_auth_profiles(&profile);
        assert_eq!(
            serde_json::to_value(&store).unwrap(),
            json!({
                "version": 1,
                "profiles": {
                    "openai-codex:default": {
                        "type": "oauth",
                        "provider": "openai-codex",
                        "access": "at",
                        "expires": 1_700_000_000_000_i64
                    }
                }
            })
        );
    }

    #[test]
    fn no_env_and_no_auth_is_empty() {
        assert!(build_auth_profiles(&UserProfile::new("bob", ["telegram:2"])).is_empty());
    }
}

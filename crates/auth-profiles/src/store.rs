//! `auth-profiles.json` store types, loading and merging.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use {
    clawmux_config::AuthEntry,
    serde::{Deserialize, Serialize},
    serde_json::{Map, Value},
    tracing::{debug, warn},
};

use crate::error::Result;

/// Store format version written for new files.
pub const AUTH_STORE_VERSION: u32 = 1;

/// File name inside an agent's `agent/` directory.
pub const AUTH_PROFILES_FILE: &str = "auth-profiles.json";

fn default_version() -> u32 {
    AUTH_STORE_VERSION
}

/// Credentials generated for one agent, keyed by profile id
/// (`<provider>:<label>`, e.g. `anthropic:default`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthProfileStore {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub profiles: BTreeMap<String, AuthEntry>,
}

impl Default for AuthProfileStore {
    fn default() -> Self {
        Self {
            version: AUTH_STORE_VERSION,
            profiles: BTreeMap::new(),
        }
    }
}

impl AuthProfileStore {
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn get(&self, profile_id: &str) -> Option<&AuthEntry> {
        self.profiles.get(profile_id)
    }
}

/// The on-disk store as read back, kept loose so entries and top-level keys
/// written by other tools (usage stats, ordering, unknown credential types)
/// survive a merge untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAuthProfiles {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub profiles: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for StoredAuthProfiles {
    fn default() -> Self {
        Self {
            version: AUTH_STORE_VERSION,
            profiles: Map::new(),
            extra: Map::new(),
        }
    }
}

impl StoredAuthProfiles {
    /// Typed view of one entry, if it is a credential type this crate knows.
    pub fn entry(&self, profile_id: &str) -> Option<AuthEntry> {
        let value = self.profiles.get(profile_id)?;
        serde_json::from_value(value.clone()).ok()
    }
}

/// `<state_dir>/agents/<agent_id>/agent/auth-profiles.json`.
pub fn auth_profiles_path(state_dir: &Path, agent_id: &str) -> PathBuf {
    state_dir
        .join("agents")
        .join(agent_id)
        .join("agent")
        .join(AUTH_PROFILES_FILE)
}

/// Read an existing store.
///
/// Returns `Ok(None)` when the file is missing or does not parse as a store;
/// a corrupt file is logged and treated as absent. Other I/O errors propagate.
pub fn load_auth_profiles(path: &Path) -> Result<Option<StoredAuthProfiles>> {
    let content = match std::fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_slice::<StoredAuthProfiles>(&content) {
        Ok(store) => {
            debug!(path = %path.display(), profiles = store.profiles.len(), "loaded existing auth profiles");
            Ok(Some(store))
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "existing auth profiles are unreadable, overwriting");
            Ok(None)
        },
    }
}

/// Overlay `incoming` onto `existing`: incoming entries replace same-id
/// entries, every other existing entry and top-level key is kept.
pub fn merge_stores(
    existing: Option<StoredAuthProfiles>,
    incoming: &AuthProfileStore,
) -> Result<StoredAuthProfiles> {
    let mut merged = existing.unwrap_or_default();
    merged.version = merged.version.max(incoming.version);
    for (id, entry) in &incoming.profiles {
        merged.profiles.insert(id.clone(), serde_json::to_value(entry)?);
    }
    Ok(merged)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, serde_json::json};

    fn incoming(pairs: &[(&str, AuthEntry)]) -> AuthProfileStore {
        AuthProfileStore {
            profiles: pairs
                .iter()
                .map(|(id, e)| (id.to_string(), e.clone()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn path_layout() {
        assert_eq!(
            auth_profiles_path(Path::new("/state"), "alice"),
            PathBuf::from("/state/agents/alice/agent/auth-profiles.json")
        );
    }

    #[test]
    fn missing_file_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(load_auth_profiles(&tmp.path().join("nope.json")).unwrap().is_none());
    }

    #[test]
    fn corrupt_file_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(AUTH_PROFILES_FILE);
        std::fs::write(&path, "{ definitely not json").unwrap();
        assert!(load_auth_profiles(&path).unwrap().is_none());

        std::fs::write(&path, r#"{"profiles": []}"#).unwrap();
        assert!(load_auth_profiles(&path).unwrap().is_none());
    }

    #[test]
    fn non_utf8_file_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(AUTH_PROFILES_FILE);
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x7b]).unwrap();
        assert!(load_auth_profiles(&path).unwrap().is_none());
    }

    #[test]
    fn merge_overwrites_same_id_and_keeps_the_rest() {
        let existing: StoredAuthProfiles = serde_json::from_value(json!({
            "version": 1,
            "profiles": {
                "anthropic:default": {"type": "api_key", "provider": "anthropic", "key": "old"},
                "github-copilot:work": {"type": "token", "provider": "github-copilot", "token": "ghu", "lastUsed": 5},
                "custom:x": {"type": "webauthn", "provider": "custom"}
            },
            "usageStats": {"anthropic:default": {"count": 3}}
        }))
        .unwrap();

        let merged = merge_stores(
            Some(existing),
            &incoming(&[("anthropic:default", AuthEntry::api_key("anthropic", "new"))]),
        )
        .unwrap();
        let value = serde_json::to_value(&merged).unwrap();

        assert_eq!(value["profiles"]["anthropic:default"]["key"], "new");
        assert_eq!(value["profiles"]["github-copilot:work"]["lastUsed"], 5);
        assert_eq!(value["profiles"]["custom:x"]["type"], "webauthn");
        assert_eq!(value["usageStats"]["anthropic:default"]["count"], 3);
        assert_eq!(
            merged.entry("anthropic:default"),
            Some(AuthEntry::api_key("anthropic", "new"))
        );
        assert!(merged.entry("custom:x").is_none());
    }

    #[test]
    fn merge_without_existing_is_incoming() {
        let merged = merge_stores(
            None,
            &incoming(&[("openai:default", AuthEntry::api_key("openai", "sk"))]),
        )
        .unwrap();
        assert_eq!(merged.version, AUTH_STORE_VERSION);
        assert_eq!(merged.profiles.len(), 1);
        assert!(merged.extra.is_empty());
    }
}

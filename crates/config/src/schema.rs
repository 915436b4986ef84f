//! Users config schema: the input document describing every end user.
//!
//! Unknown fields at any level are kept in a flattened `extra` map so that a
//! load/save cycle never drops data this crate does not understand.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root of `users.json` (or `.yaml` / `.toml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersConfig {
    pub users: Vec<UserProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared: Option<SharedConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UsersConfig {
    /// Look up a user by id.
    pub fn user(&self, id: &str) -> Option<&UserProfile> {
        self.users.iter().find(|u| u.id == id)
    }

    /// `shared.env`, or an empty map.
    pub fn shared_env(&self) -> BTreeMap<String, String> {
        self.shared
            .as_ref()
            .map(|s| s.env.clone())
            .unwrap_or_default()
    }
}

/// `shared` section: values applied to every agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedConfig {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `defaults` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultsConfig {
    /// Session isolation policy, e.g. `"per-peer"` or `"main"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dm_scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One end user, provisioned as one gateway agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique, URL-safe id. Doubles as the agent id.
    pub id: String,
    /// Raw identifiers: `+15551234567`, `telegram:123`, ...
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    /// Credential variable name → plaintext value or secret reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
    /// Vault prefix recorded for this user's secret references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault: Option<String>,
    /// Explicit auth profiles, keyed by profile id (e.g. `anthropic:work`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<BTreeMap<String, AuthEntry>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    pub fn new(
        id: impl Into<String>,
        identifiers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            identifiers: identifiers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn env_iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.env.iter().flatten()
    }

    pub fn auth_iter(&self) -> impl Iterator<Item = (&String, &AuthEntry)> {
        self.auth.iter().flatten()
    }
}

/// A stored credential, tagged by `type` exactly as the gateway's
/// `auth-profiles.json` expects. Fields not modelled here land in `extra`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthEntry {
    ApiKey {
        provider: String,
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(flatten)]
        extra: serde_json::Map<String, serde_json::Value>,
    },
    Oauth {
        provider: String,
        access: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        refresh: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expires: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(default, rename = "clientId", skip_serializing_if = "Option::is_none")]
        client_id: Option<String>,
        #[serde(flatten)]
        extra: serde_json::Map<String, serde_json::Value>,
    },
    Token {
        provider: String,
        token: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expires: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(flatten)]
        extra: serde_json::Map<String, serde_json::Value>,
    },
}

impl AuthEntry {
    /// API-key credential with no email.
    pub fn api_key(provider: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ApiKey {
            provider: provider.into(),
            key: key.into(),
            email: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn provider(&self) -> &str {
        match self {
            Self::ApiKey { provider, .. }
            | Self::Oauth { provider, .. }
            | Self::Token { provider, .. } => provider,
        }
    }

    /// The `type` tag value.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ApiKey { .. } => "api_key",
            Self::Oauth { .. } => "oauth",
            Self::Token { .. } => "token",
        }
    }

    /// Every secret-bearing field that is present.
    pub fn credentials(&self) -> Vec<&str> {
        match self {
            Self::ApiKey { key, .. } => vec![key.as_str()],
            Self::Oauth {
                access, refresh, ..
            } => std::iter::once(access.as_str())
                .chain(refresh.as_deref())
                .collect(),
            Self::Token { token, .. } => vec![token.as_str()],
        }
    }

    /// Mutable access to every secret-bearing field that is present.
    pub fn credentials_mut(&mut self) -> Vec<&mut String> {
        match self {
            Self::ApiKey { key, .. } => vec![key],
            Self::Oauth {
                access, refresh, ..
            } => std::iter::once(access).chain(refresh.as_mut()).collect(),
            Self::Token { token, .. } => vec![token],
        }
    }
}

impl std::fmt::Debug for AuthEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthEntry")
            .field("type", &self.kind())
            .field("provider", &self.provider())
            .field("credentials", &"[REDACTED]")
            .finish()
    }
}

//! Shape of the generated gateway config include.
//!
//! Field names follow the gateway's `openclaw.json` schema (camelCase). All
//! maps are ordered so the serialized document is byte-stable.

use std::collections::BTreeMap;

use {
    clawmux_identifiers::Channel,
    serde::{Deserialize, Serialize},
};

/// Root of the generated include.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
    pub agents: AgentsSection,
    pub bindings: Vec<Binding>,
    pub channels: BTreeMap<String, ChannelAccess>,
    pub session: SessionSection,
}

impl GeneratedConfig {
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// The DM allow-list generated for `channel`, if the channel is present.
    pub fn allow_list(&self, channel: Channel) -> Option<&[String]> {
        self.channels
            .get(channel.as_str())
            .map(ChannelAccess::allow_from)
    }

    /// Bindings routed to `agent_id`, in emission order.
    pub fn bindings_for<'a>(&'a self, agent_id: &'a str) -> impl Iterator<Item = &'a Binding> {
        self.bindings.iter().filter(move |b| b.agent_id == agent_id)
    }
}

/// `agents` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentsSection {
    pub list: Vec<AgentEntry>,
}

/// One entry of `agents.list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
}

/// Routes DMs from one peer on one channel to one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub agent_id: String,
    #[serde(rename = "match")]
    pub matcher: BindingMatch,
}

impl Binding {
    pub fn dm(agent_id: impl Into<String>, channel: Channel, peer_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            matcher: BindingMatch {
                channel,
                peer: PeerMatch {
                    kind: PeerKind::Dm,
                    id: peer_id.into(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingMatch {
    pub channel: Channel,
    pub peer: PeerMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerMatch {
    pub kind: PeerKind,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerKind {
    Dm,
}

/// DM access policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DmPolicy {
    /// Anyone can DM the agent.
    Open,
    /// Only peers on the allow-list.
    #[default]
    Allowlist,
    /// DMs disabled.
    Disabled,
}

/// Per-channel access block. Discord, Slack and Google Chat keep DM settings
/// under a nested `dm` object; every other channel keeps them top-level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelAccess {
    Nested {
        dm: DmSection,
    },
    #[serde(rename_all = "camelCase")]
    Flat {
        dm_policy: DmPolicy,
        allow_from: Vec<String>,
    },
}

impl ChannelAccess {
    pub fn for_channel(channel: Channel, policy: DmPolicy, allow_from: Vec<String>) -> Self {
        if channel.uses_nested_dm_section() {
            Self::Nested {
                dm: DmSection { policy, allow_from },
            }
        } else {
            Self::Flat {
                dm_policy: policy,
                allow_from,
            }
        }
    }

    pub fn allow_from(&self) -> &[String] {
        match self {
            Self::Nested { dm } => &dm.allow_from,
            Self::Flat { allow_from, .. } => allow_from,
        }
    }

    pub fn policy(&self) -> DmPolicy {
        match self {
            Self::Nested { dm } => dm.policy,
            Self::Flat { dm_policy, .. } => *dm_policy,
        }
    }
}

/// Nested `dm` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmSection {
    pub policy: DmPolicy,
    pub allow_from: Vec<String>,
}

/// `session` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSection {
    pub dm_scope: String,
}

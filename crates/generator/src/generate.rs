//! Users config → gateway config.

use std::collections::{BTreeMap, BTreeSet};

use {
    clawmux_config::UsersConfig,
    clawmux_identifiers::{Channel, parse_all_identifiers},
    tracing::debug,
};

use crate::{
    error::{Error, Result},
    types::{AgentEntry, AgentsSection, Binding, ChannelAccess, DmPolicy, GeneratedConfig, SessionSection},
};

/// Model used when neither the user nor `defaults` names one.
pub const DEFAULT_MODEL: &str = "anthropic/claude-opus-4-6";

/// Session scope used when `defaults.dmScope` is absent.
pub const DEFAULT_DM_SCOPE: &str = "per-peer";

/// Build the gateway config for a validated users config.
///
/// Agents follow input order and bindings follow each user's identifier parse
/// order. Allow-lists are the sorted union of peer ids seen per channel. The
/// same input always yields the same output.
pub fn generate_config(config: &UsersConfig) -> Result<GeneratedConfig> {
    let defaults = config.defaults.as_ref();
    let default_model = defaults
        .and_then(|d| d.model.as_deref())
        .unwrap_or(DEFAULT_MODEL);
    let dm_scope = defaults
        .and_then(|d| d.dm_scope.as_deref())
        .unwrap_or(DEFAULT_DM_SCOPE);

    let mut agents = Vec::with_capacity(config.users.len());
    let mut bindings = Vec::new();
    let mut peers: BTreeMap<Channel, BTreeSet<String>> = BTreeMap::new();

    for user in &config.users {
        agents.push(AgentEntry {
            id: user.id.clone(),
            name: user.name.clone(),
            model: user.model.as_deref().unwrap_or(default_model).to_string(),
            skills: user.skills.clone(),
        });

        let parsed =
            parse_all_identifiers(&user.identifiers).map_err(|source| Error::Identifier {
                user_id: user.id.clone(),
                source,
            })?;
        for ident in parsed {
            peers
                .entry(ident.channel)
                .or_default()
                .insert(ident.peer_id.clone());
            bindings.push(Binding::dm(&user.id, ident.channel, ident.peer_id));
        }
    }

    let channels = peers
        .into_iter()
        .map(|(channel, ids)| {
            let access =
                ChannelAccess::for_channel(channel, DmPolicy::Allowlist, ids.into_iter().collect());
            (channel.as_str().to_string(), access)
        })
        .collect::<BTreeMap<_, _>>();

    let env = config
        .shared
        .as_ref()
        .filter(|s| !s.env.is_empty())
        .map(|s| s.env.clone());

    debug!(
        agents = agents.len(),
        bindings = bindings.len(),
        channels = channels.len(),
        "generated gateway config"
    );

    Ok(GeneratedConfig {
        env,
        agents: AgentsSection { list: agents },
        bindings,
        channels,
        session: SessionSection {
            dm_scope: dm_scope.to_string(),
        },
    })
}

//! Gateway config generation.
//!
//! Turns a validated [`clawmux_config::UsersConfig`] into the agent list,
//! DM bindings and per-channel allow-lists the gateway consumes.

pub mod error;
pub mod generate;
pub mod types;
pub mod write;

pub use {
    error::{Error, Result},
    generate::{DEFAULT_DM_SCOPE, DEFAULT_MODEL, generate_config},
    types::{
        AgentEntry, AgentsSection, Binding, BindingMatch, ChannelAccess, DmPolicy, DmSection,
        GeneratedConfig, PeerKind, PeerMatch, SessionSection,
    },
    write::write_generated_config,
};

//! The closed set of messaging channels the gateway can route.

use serde::{Deserialize, Serialize};

/// A messaging platform namespace. Peer ids are only unique within one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Telegram,
    Discord,
    Slack,
    Signal,
    Web,
    Matrix,
    Whatsapp,
    Imessage,
    Msteams,
    Zalo,
    Zalouser,
    Googlechat,
    Bluebubbles,
    Line,
    Mattermost,
    Irc,
    Nostr,
}

impl Channel {
    /// Every known channel, in declaration order.
    pub const ALL: &'static [Channel] = &[
        Self::Telegram,
        Self::Discord,
        Self::Slack,
        Self::Signal,
        Self::Web,
        Self::Matrix,
        Self::Whatsapp,
        Self::Imessage,
        Self::Msteams,
        Self::Zalo,
        Self::Zalouser,
        Self::Googlechat,
        Self::Bluebubbles,
        Self::Line,
        Self::Mattermost,
        Self::Irc,
        Self::Nostr,
    ];

    /// Channels a bare E.164 phone number is reachable on, in binding order.
    pub const PHONE: &'static [Channel] = &[Self::Whatsapp, Self::Signal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Telegram => "telegram",
            Self::Discord => "discord",
            Self::Slack => "slack",
            Self::Signal => "signal",
            Self::Web => "web",
            Self::Matrix => "matrix",
            Self::Whatsapp => "whatsapp",
            Self::Imessage => "imessage",
            Self::Msteams => "msteams",
            Self::Zalo => "zalo",
            Self::Zalouser => "zalouser",
            Self::Googlechat => "googlechat",
            Self::Bluebubbles => "bluebubbles",
            Self::Line => "line",
            Self::Mattermost => "mattermost",
            Self::Irc => "irc",
            Self::Nostr => "nostr",
        }
    }

    /// Whether the gateway expects this channel's DM allow-list under a
    /// nested `dm` object rather than top-level `dmPolicy`/`allowFrom`.
    pub fn uses_nested_dm_section(&self) -> bool {
        matches!(self, Self::Discord | Self::Slack | Self::Googlechat)
    }

    /// Comma-separated list of every channel name, for error messages.
    pub fn known_names() -> String {
        Self::ALL
            .iter()
            .map(Channel::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == lower)
            .ok_or(UnknownChannel(lower))
    }
}

/// A channel name outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown channel '{0}'")]
pub struct UnknownChannel(pub String);

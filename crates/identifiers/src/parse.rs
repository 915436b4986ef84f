//! Parsing raw identifier strings into `(channel, peer)` pairs.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    channel::Channel,
    error::{Error, Result},
};

const E164_MIN_DIGITS: usize = 7;
const E164_MAX_DIGITS: usize = 15;

/// A normalized identity within one channel's namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedIdentifier {
    pub channel: Channel,
    pub peer_id: String,
}

impl ParsedIdentifier {
    pub fn new(channel: Channel, peer_id: impl Into<String>) -> Self {
        Self {
            channel,
            peer_id: peer_id.into(),
        }
    }

    /// Composite `channel:peerId` key used for dedup and ownership checks.
    pub fn key(&self) -> String {
        format!("{}:{}", self.channel, self.peer_id)
    }
}

impl std::fmt::Display for ParsedIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.channel, self.peer_id)
    }
}

/// Parse one raw identifier.
///
/// An E.164 phone number yields one entry per phone channel (whatsapp, then
/// signal) sharing the same peer id; a `channel:peer` handle yields exactly
/// one entry.
pub fn parse_identifier(raw: &str) -> Result<Vec<ParsedIdentifier>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::Empty);
    }

    if trimmed.starts_with('+') {
        if !is_e164(trimmed) {
            return Err(Error::InvalidPhone {
                raw: trimmed.to_string(),
            });
        }
        return Ok(Channel::PHONE
            .iter()
            .map(|channel| ParsedIdentifier::new(*channel, trimmed))
            .collect());
    }

    match trimmed.split_once(':') {
        Some((prefix, value)) if !prefix.is_empty() => {
            let channel: Channel = prefix.parse().map_err(|_| Error::UnknownChannel {
                prefix: prefix.to_string(),
                raw: trimmed.to_string(),
                known: Channel::known_names(),
            })?;
            let peer_id = value.trim();
            if peer_id.is_empty() {
                return Err(Error::EmptyPeer {
                    prefix: prefix.to_string(),
                    raw: trimmed.to_string(),
                });
            }
            Ok(vec![ParsedIdentifier::new(channel, peer_id)])
        },
        _ => Err(Error::Unrecognized {
            raw: trimmed.to_string(),
        }),
    }
}

/// Parse every identifier in `raws`, dropping repeats of the same
/// `channel:peerId` while keeping first-seen order.
///
/// `["+1234567890", "whatsapp:+1234567890"]` therefore produces the two phone
/// entries only. The first unparseable entry aborts the whole list.
pub fn parse_all_identifiers<S: AsRef<str>>(raws: &[S]) -> Result<Vec<ParsedIdentifier>> {
    let mut seen = HashSet::new();
    let mut parsed = Vec::new();
    for raw in raws {
        for ident in parse_identifier(raw.as_ref())? {
            if seen.insert(ident.key()) {
                parsed.push(ident);
            }
        }
    }
    Ok(parsed)
}

/// `^\+\d{7,15}$`
fn is_e164(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('+') else {
        return false;
    };
    (E164_MIN_DIGITS..=E164_MAX_DIGITS).contains(&digits.len())
        && digits.bytes().all(|b| b.is_ascii_digit())
}

//! Pending verification codes for identity claims.
//!
//! A user claims a `(channel, peer)` identity from an existing session; a
//! 6-digit code is issued and must be echoed back from that peer before the
//! identity is added to the user's config.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use {
    clawmux_identifiers::{Channel, ParsedIdentifier},
    rand::Rng,
    serde::{Deserialize, Serialize},
    tracing::{debug, warn},
};

/// Store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    /// How long an issued code stays valid.
    pub code_ttl_secs: u64,
    /// Wrong attempts allowed before the claim is locked out.
    pub max_attempts: u32,
    /// Lockout duration after too many wrong attempts.
    pub cooldown_secs: u64,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            code_ttl_secs: 300,
            max_attempts: 3,
            cooldown_secs: 300,
        }
    }
}

struct PendingCode {
    code: String,
    user_id: String,
    expires_at: Instant,
    attempts: u32,
}

/// Result of [`VerificationCodeStore::issue`].
#[derive(Debug, PartialEq, Eq)]
pub enum IssueResult {
    /// Code created; deliver it to the claimed peer.
    Issued(String),
    /// An unexpired code already exists for this identity.
    AlreadyPending,
    LockedOut,
}

/// Result of [`VerificationCodeStore::verify`].
#[derive(Debug, PartialEq, Eq)]
pub enum VerifyResult {
    /// Code matched; the identity belongs to `user_id`.
    Approved { user_id: String },
    WrongCode { attempts_left: u32 },
    LockedOut,
    NoPending,
    Expired,
}

/// Snapshot of a pending claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingClaim {
    pub channel: Channel,
    pub peer_id: String,
    pub user_id: String,
    pub expires_in_secs: u64,
}

/// Pending codes and lockouts, keyed by `channel:peer`.
///
/// Owned by whoever runs the pairing flow; there is no global instance.
pub struct VerificationCodeStore {
    pending: HashMap<ParsedIdentifier, PendingCode>,
    lockouts: HashMap<ParsedIdentifier, Instant>,
    ttl: Duration,
    cooldown: Duration,
    max_attempts: u32,
}

impl VerificationCodeStore {
    pub fn new(config: &PairingConfig) -> Self {
        Self {
            pending: HashMap::new(),
            lockouts: HashMap::new(),
            ttl: Duration::from_secs(config.code_ttl_secs),
            cooldown: Duration::from_secs(config.cooldown_secs),
            max_attempts: config.max_attempts.max(1),
        }
    }

    /// Issue a code for `user_id` claiming `peer_id` on `channel`.
    pub fn issue(&mut self, channel: Channel, peer_id: &str, user_id: &str) -> IssueResult {
        let key = ParsedIdentifier::new(channel, peer_id);
        let now = Instant::now();

        if self.check_lockout(&key, now) {
            return IssueResult::LockedOut;
        }

        if let Some(existing) = self.pending.get(&key) {
            if now < existing.expires_at {
                return IssueResult::AlreadyPending;
            }
            self.pending.remove(&key);
        }

        let code = generate_code();
        debug!(identity = %key, user = user_id, "issued verification code");
        self.pending.insert(key, PendingCode {
            code: code.clone(),
            user_id: user_id.to_string(),
            expires_at: now + self.ttl,
            attempts: 0,
        });
        IssueResult::Issued(code)
    }

    /// Check a code echoed back from `peer_id` on `channel`.
    pub fn verify(&mut self, channel: Channel, peer_id: &str, code: &str) -> VerifyResult {
        let key = ParsedIdentifier::new(channel, peer_id);
        let now = Instant::now();

        if self.check_lockout(&key, now) {
            return VerifyResult::LockedOut;
        }

        let Some(pending) = self.pending.get_mut(&key) else {
            return VerifyResult::NoPending;
        };

        if now >= pending.expires_at {
            self.pending.remove(&key);
            return VerifyResult::Expired;
        }

        if pending.code == code.trim() {
            let user_id = pending.user_id.clone();
            self.pending.remove(&key);
            debug!(identity = %key, user = %user_id, "verification code accepted");
            return VerifyResult::Approved { user_id };
        }

        pending.attempts += 1;
        if pending.attempts >= self.max_attempts {
            self.pending.remove(&key);
            warn!(identity = %key, "too many wrong verification codes, locking out");
            self.lockouts.insert(key, now + self.cooldown);
            return VerifyResult::LockedOut;
        }

        VerifyResult::WrongCode {
            attempts_left: self.max_attempts - pending.attempts,
        }
    }

    pub fn has_pending(&self, channel: Channel, peer_id: &str) -> bool {
        self.pending
            .get(&ParsedIdentifier::new(channel, peer_id))
            .is_some_and(|p| Instant::now() < p.expires_at)
    }

    pub fn is_locked_out(&self, channel: Channel, peer_id: &str) -> bool {
        self.lockouts
            .get(&ParsedIdentifier::new(channel, peer_id))
            .is_some_and(|until| Instant::now() < *until)
    }

    /// Unexpired claims, sorted by identity.
    pub fn list_pending(&self) -> Vec<PendingClaim> {
        let now = Instant::now();
        let mut claims: Vec<_> = self
            .pending
            .iter()
            .filter(|(_, p)| now < p.expires_at)
            .map(|(key, p)| PendingClaim {
                channel: key.channel,
                peer_id: key.peer_id.clone(),
                user_id: p.user_id.clone(),
                expires_in_secs: p.expires_at.saturating_duration_since(now).as_secs(),
            })
            .collect();
        claims.sort_by(|a, b| (a.channel, &a.peer_id).cmp(&(b.channel, &b.peer_id)));
        claims
    }

    /// Drop expired codes and elapsed lockouts.
    pub fn evict_expired(&mut self) {
        let now = Instant::now();
        self.pending.retain(|_, p| now < p.expires_at);
        self.lockouts.retain(|_, until| now < *until);
    }

    /// Whether `key` is locked out at `now`; clears an elapsed lockout.
    fn check_lockout(&mut self, key: &ParsedIdentifier, now: Instant) -> bool {
        match self.lockouts.get(key) {
            Some(until) if now < *until => true,
            Some(_) => {
                self.lockouts.remove(key);
                false
            },
            None => false,
        }
    }
}

impl Default for VerificationCodeStore {
    fn default() -> Self {
        Self::new(&PairingConfig::default())
    }
}

fn generate_code() -> String {
    let code: u32 = rand::rng().random_range(100_000..1_000_000);
    code.to_string()
}

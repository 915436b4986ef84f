//! Self-service identity pairing.
//!
//! A user claims another channel identity, a verification code is sent to
//! that peer, and once echoed back the identity is added to the user's
//! config entry.

pub mod claim;
pub mod codes;
pub mod error;

pub use {
    claim::apply_claim,
    codes::{IssueResult, PairingConfig, PendingClaim, VerificationCodeStore, VerifyResult},
    error::{Error, Result},
};

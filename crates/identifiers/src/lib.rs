//! Identifier grammar shared by validation and config generation.
//!
//! A raw identifier is either an E.164 phone number (`+15551234567`), which
//! fans out to every phone-addressed channel, or a `channel:peer` handle such
//! as `telegram:123456789` or `discord:alice#0001`.

pub mod channel;
pub mod error;
pub mod parse;

pub use {
    channel::Channel,
    error::{Error, Result},
    parse::{ParsedIdentifier, parse_all_identifiers, parse_identifier},
};

/// Crate-wide result type for identifier parsing.
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a raw identifier string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("identifier is empty")]
    Empty,

    #[error("invalid phone number '{raw}': expected E.164 format (+ followed by 7-15 digits)")]
    InvalidPhone { raw: String },

    #[error("unknown channel '{prefix}' in identifier '{raw}' (known channels: {known})")]
    UnknownChannel {
        prefix: String,
        raw: String,
        known: String,
    },

    #[error("identifier '{raw}' has no peer id after '{prefix}:'")]
    EmptyPeer { prefix: String, raw: String },

    #[error("unrecognized identifier '{raw}': expected +<phone> or <channel>:<peer>")]
    Unrecognized { raw: String },
}

impl Error {
    /// The raw input that failed to parse, when there was one.
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::InvalidPhone { raw }
            | Self::UnknownChannel { raw, .. }
            | Self::EmptyPeer { raw, .. }
            | Self::Unrecognized { raw } => Some(raw),
        }
    }
}

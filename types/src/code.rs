//! Response codes returned across the consensus boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome code of an admission check, commit or query.
///
/// The numeric values are part of the wire contract and are ordered so that
/// anything greater than [`ResponseCode::Ok`] is a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum ResponseCode {
    Ok = 0,
    /// Malformed envelope, signature blob or public-key bytes.
    EncodingError = 1,
    /// Authorization or business-rule failure.
    Unauthorized = 3,
    /// Internal inconsistency not attributable to the submitter.
    ServerError = 4,
}

impl ResponseCode {
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Ok),
            1 => Some(Self::EncodingError),
            3 => Some(Self::Unauthorized),
            4 => Some(Self::ServerError),
            _ => None,
        }
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::EncodingError => "encoding_error",
            Self::Unauthorized => "unauthorized",
            Self::ServerError => "server_error",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Rejection outcome shared by admission checks, commits and queries.

use crate::ResponseCode;
use std::fmt;

/// A transaction or query that was refused, with a human-readable reason.
///
/// Rejections are ordinary values: both the admission and the commit path
/// return them to the caller instead of unwinding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    pub code: ResponseCode,
    pub reason: String,
}

impl Rejection {
    pub fn new(code: ResponseCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    pub fn encoding(reason: impl Into<String>) -> Self {
        Self::new(ResponseCode::EncodingError, reason)
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::new(ResponseCode::Unauthorized, reason)
    }

    pub fn server(reason: impl Into<String>) -> Self {
        Self::new(ResponseCode::ServerError, reason)
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.reason)
    }
}

impl std::error::Error for Rejection {}

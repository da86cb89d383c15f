// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the Light Alarm bridge.

use thiserror::Error;

/// Top-level error type for all bridge operations.
#[derive(Debug, Error)]
pub enum AlarmBridgeError {
    // -- Notification errors --
    #[error("permission to post notifications was denied")]
    PermissionDenied,

    // -- Channel / argument errors --
    #[error("invalid argument `{field}`: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("method not implemented: {0}")]
    NotImplemented(String),

    // -- Serialization --
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

impl AlarmBridgeError {
    /// Shorthand for building an `InvalidArgument` error.
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Stable error code reported to the UI layer over the method channel.
    pub fn code(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::NotImplemented(_) => "NOT_IMPLEMENTED",
            Self::Serialization(_) => "BAD_MESSAGE",
            Self::Bridge(_) => "BRIDGE_ERROR",
            Self::PlatformUnavailable => "PLATFORM_UNAVAILABLE",
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AlarmBridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_names_field() {
        let err = AlarmBridgeError::invalid_argument("title", "expected string");
        assert_eq!(err.code(), "INVALID_ARGUMENT");
        assert_eq!(err.to_string(), "invalid argument `title`: expected string");
    }

    #[test]
    fn permission_denied_has_distinct_code() {
        assert_eq!(AlarmBridgeError::PermissionDenied.code(), "PERMISSION_DENIED");
        assert_ne!(
            AlarmBridgeError::PermissionDenied.code(),
            AlarmBridgeError::Bridge("x".into()).code()
        );
    }
}

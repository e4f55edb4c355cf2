//! Result and error types for Comprar.

use thiserror::Error;

/// Result type for Comprar operations
pub type ComprarResult<T> = Result<T, ComprarError>;

/// Errors that can occur in Comprar
#[derive(Debug, Error)]
pub enum ComprarError {
    /// Required configuration is missing or invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// A wait predicate never became true within its deadline
    #[error("Timed out after {ms}ms waiting for {condition}")]
    Timeout {
        /// What was being waited for (locator + predicate)
        condition: String,
        /// Deadline in milliseconds
        ms: u64,
    },

    /// An element never became clickable within the deadline
    #[error("Element {locator} not interactable after {ms}ms")]
    NotInteractable {
        /// Locator of the element
        locator: String,
        /// Deadline in milliseconds
        ms: u64,
    },

    /// An indexed lookup was out of range
    #[error("No element at index {index} for {locator} ({count} matched)")]
    IndexOutOfBounds {
        /// Locator that was queried
        locator: String,
        /// Requested index
        index: usize,
        /// Number of elements that matched
        count: usize,
    },

    /// A required field was absent from a response or element
    #[error("Required field absent: {field}")]
    FieldAbsent {
        /// Name of the missing field
        field: String,
    },

    /// A domain assertion found a mismatch
    #[error("{entity}: expected {field} {expected}, got {actual}")]
    Mismatch {
        /// The offending entity (e.g. product name)
        entity: String,
        /// The mismatching field
        field: String,
        /// Expected value
        expected: String,
        /// Actual value
        actual: String,
    },

    /// Browser backend / protocol failure
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body failed to decode as JSON
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// I/O error (screenshot files, artifacts)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ComprarError {
    /// Create a driver error from any displayable cause
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True for conditions a best-effort flow may ignore (consent popup)
    #[must_use]
    pub const fn is_wait_failure(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::NotInteractable { .. }
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_carries_condition_and_deadline() {
        let err = ComprarError::Timeout {
            condition: "visibility of css `.modal-content`".to_string(),
            ms: 4000,
        };
        let msg = err.to_string();
        assert!(msg.contains("4000ms"));
        assert!(msg.contains(".modal-content"));
    }

    #[test]
    fn test_index_out_of_bounds_message() {
        let err = ComprarError::IndexOutOfBounds {
            locator: "css `.productinfo p`".to_string(),
            index: 7,
            count: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("index 7"));
        assert!(msg.contains("3 matched"));
    }

    #[test]
    fn test_mismatch_message_carries_expected_and_actual() {
        let err = ComprarError::Mismatch {
            entity: "Blue Top".to_string(),
            field: "quantity".to_string(),
            expected: "4".to_string(),
            actual: "1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Blue Top"));
        assert!(msg.contains("expected quantity 4"));
        assert!(msg.contains("got 1"));
    }

    #[test]
    fn test_wait_failures_are_ignorable() {
        assert!(ComprarError::Timeout {
            condition: "x".to_string(),
            ms: 1
        }
        .is_wait_failure());
        assert!(ComprarError::NotInteractable {
            locator: "x".to_string(),
            ms: 1
        }
        .is_wait_failure());
        assert!(!ComprarError::config("no ADDRESS").is_wait_failure());
    }
}

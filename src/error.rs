// ABOUTME: Error types for the authorization pipeline.
// ABOUTME: Invalid patterns fail at construction time; Aborted is the run-cancellation signal.

use thiserror::Error;

/// Errors surfaced by the pipeline's public API.
///
/// A denied request is not an error; it comes back as a normal
/// [`Decision`](crate::types::Decision). `Aborted` is the only failure an
/// evaluation itself can produce; `InvalidPattern` is only reachable from
/// construction and whitelist-insertion APIs.
#[derive(Debug, Error)]
pub enum GateError {
    /// A pattern supplied to a pattern set or the whitelist failed to compile.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The operator aborted the run from an interactive prompt.
    #[error("aborted by user")]
    Aborted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pattern_names_the_pattern() {
        let source = regex::Regex::new("[unclosed").unwrap_err();
        let err = GateError::InvalidPattern {
            pattern: "[unclosed".to_string(),
            source,
        };
        let message = err.to_string();
        assert!(message.contains("[unclosed"), "got: {message}");
    }

    #[test]
    fn aborted_message() {
        assert_eq!(GateError::Aborted.to_string(), "aborted by user");
    }
}

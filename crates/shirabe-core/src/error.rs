use thiserror::Error;

/// Errors that can occur during shirabe core operations.
///
/// Classification itself never fails: an unrecognized field is left unset on
/// the [`Episode`](crate::types::Episode). Errors only come from building the
/// recognizers and from helpers that need a field the title did not carry.
#[derive(Debug, Error)]
pub enum ShirabeError {
    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    /// A field required by the caller was not recognized in the title.
    #[error("field not recognized in title: {0}")]
    MissingField(&'static str),
}

/// Result type alias for shirabe operations.
pub type Result<T> = std::result::Result<T, ShirabeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = ShirabeError::MissingField("episode");
        assert_eq!(err.to_string(), "field not recognized in title: episode");

        let err: ShirabeError = regex::Regex::new("(").unwrap_err().into();
        assert!(err.to_string().starts_with("regex compilation error"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ShirabeError>();
    }
}

use thiserror::Error;

/// Why a lookup produced no report. The display text is shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The request failed before a payload could be read.
    #[error("{0}")]
    Transport(String),

    /// The provider answered with a non-"ok" status.
    #[error("{0}")]
    Upstream(String),

    #[error("An error occurred, please try again.")]
    UnrecognizedPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_passed_through() {
        assert_eq!(LookupError::Upstream("Invalid key".into()).to_string(), "Invalid key");
        assert_eq!(
            LookupError::Transport("connection refused".into()).to_string(),
            "connection refused"
        );
        assert!(LookupError::UnrecognizedPayload.to_string().contains("try again"));
    }
}

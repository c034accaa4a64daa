//! Error taxonomy for the sudo handshake.

use std::io;

use thiserror::Error;
use transport::{BoxError, TransportError};

/// Result type for handshake operations.
pub type ElevateResult<T> = Result<T, ElevateError>;

/// Errors that can abort a sudo handshake.
///
/// The variants are deliberately distinguishable: transport faults,
/// protocol-expectation misses, phase-tagged I/O failures, and
/// password-source failures each indicate a different broken party.
#[derive(Debug, Error)]
pub enum ElevateError {
    /// The non-interactive sudo check itself could not run, so whether a
    /// password is required is unknown.
    #[error("could not check whether sudo requires a password: {0}")]
    PolicyCheck(#[source] TransportError),

    /// Opening the session, acquiring its streams, starting the command, or
    /// awaiting it failed; the inner variant names the step.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The randomized sudo prompt never appeared on the diagnostic stream.
    ///
    /// The remote elevation mechanism deviated from the expected protocol,
    /// for example because sudo is missing or printed an unexpected banner.
    #[error("no sudo password prompt found when expected")]
    NoPasswordPrompt,

    /// The readiness marker never appeared on the output stream.
    ///
    /// Elevation did not complete; the remote process may have exited
    /// early or rejected the password.
    #[error("no readiness marker found when expected")]
    NoReadyMarker,

    /// I/O failure while scanning the diagnostic stream for the prompt.
    #[error("error while expecting the sudo password prompt: {0}")]
    PromptRead(#[source] io::Error),

    /// I/O failure while scanning the output stream for the readiness
    /// marker.
    #[error("error while expecting the readiness marker: {0}")]
    ReadyRead(#[source] io::Error),

    /// Writing the password to the remote input stream failed.
    #[error("failed to write the sudo password: {0}")]
    PasswordWrite(#[source] io::Error),

    /// The password source returned an error.
    ///
    /// This usually means the caller's credential source is broken, not the
    /// remote side; it is therefore matchable independently of every other
    /// kind.
    #[error("password callback returned an error: {0}")]
    PasswordSource(#[source] BoxError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn policy_check_is_distinct_from_transport() {
        let policy = ElevateError::PolicyCheck(TransportError::OpenSession(Box::new(
            io::Error::other("refused"),
        )));
        assert!(matches!(policy, ElevateError::PolicyCheck(_)));
        assert!(policy.to_string().contains("requires a password"));

        let transport: ElevateError =
            TransportError::Start(Box::new(io::Error::other("gone"))).into();
        assert!(matches!(transport, ElevateError::Transport(_)));
    }

    #[test]
    fn expectation_misses_are_sentinels() {
        assert!(
            ElevateError::NoPasswordPrompt
                .to_string()
                .contains("no sudo password prompt")
        );
        assert!(
            ElevateError::NoReadyMarker
                .to_string()
                .contains("no readiness marker")
        );
    }

    #[test]
    fn password_source_failure_preserves_cause() {
        let error = ElevateError::PasswordSource(Box::new(io::Error::other("vault sealed")));
        let source = error.source().expect("source preserved");
        assert!(source.to_string().contains("vault sealed"));
    }
}

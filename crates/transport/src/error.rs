//! Error types for the remote-shell session boundary.

use thiserror::Error;

/// Boxed error type used to carry backend-specific failures across the
/// trait boundary without naming the backend's error types.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures of the transport itself, tagged with the step that failed.
///
/// Each variant preserves the backend's underlying error as a source so
/// callers can inspect the original cause.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Opening a new session on the connection failed.
    #[error("could not open a remote session: {0}")]
    OpenSession(#[source] BoxError),
    /// Acquiring the session's byte streams failed.
    #[error("could not acquire the session byte streams: {0}")]
    Pipes(#[source] BoxError),
    /// Starting a remote command failed before anything ran.
    #[error("failed to start the remote command: {0}")]
    Start(#[source] BoxError),
    /// Running a remote command to completion failed for a reason other
    /// than a non-zero exit.
    #[error("failed to run the remote command: {0}")]
    Run(#[source] BoxError),
    /// Signalling end-of-input to the remote process failed.
    #[error("failed to close the remote input stream: {0}")]
    CloseStdin(#[source] BoxError),
    /// Waiting for the remote command to exit failed.
    #[error("failed waiting for the remote command to exit: {0}")]
    Wait(#[source] BoxError),
}

/// Outcome of running a remote command to completion.
///
/// A non-zero exit is reported separately from transport failures: the
/// command ran, the remote side simply said no.
#[derive(Debug, Error)]
pub enum RunError {
    /// The remote command ran and exited with a non-zero status.
    #[error("remote command exited with status {0}")]
    ExitStatus(i32),
    /// The transport failed before an exit status could be observed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    fn boxed(message: &str) -> BoxError {
        Box::new(io::Error::other(message.to_owned()))
    }

    #[test]
    fn transport_error_names_the_failing_step() {
        let error = TransportError::OpenSession(boxed("refused"));
        assert!(error.to_string().contains("open a remote session"));

        let error = TransportError::Start(boxed("channel gone"));
        assert!(error.to_string().contains("start the remote command"));
    }

    #[test]
    fn transport_error_preserves_the_source() {
        let error = TransportError::Run(boxed("reset by peer"));
        let source = error.source().expect("source preserved");
        assert!(source.to_string().contains("reset by peer"));
    }

    #[test]
    fn exit_status_is_distinguishable_from_transport_failures() {
        let exit = RunError::ExitStatus(1);
        assert!(matches!(exit, RunError::ExitStatus(1)));
        assert!(exit.to_string().contains("status 1"));

        let failure = RunError::from(TransportError::Wait(boxed("gone")));
        assert!(matches!(failure, RunError::Transport(_)));
    }
}

//! Remote sudo policy probe.

use transport::{Connection, RunError, Session};

use crate::error::ElevateError;

/// Asks sudo to validate cached credentials without prompting. A non-zero
/// exit means validation needs a password.
const SUDO_NON_INTERACTIVE_CHECK: &str = "sudo -n -v";

/// Reports whether sudo on the remote host will demand a password.
///
/// Runs the non-interactive credential check on its own short-lived
/// session. The outcome is never cached — sudo credential timeouts mean the
/// answer can change between calls, so every handshake re-probes.
///
/// Returns [`ElevateError::PolicyCheck`] when the check could not run at
/// all, which is a different situation from either answer.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub fn password_required<C: Connection>(connection: &C) -> Result<bool, ElevateError> {
    let mut session = connection
        .open_session()
        .map_err(ElevateError::PolicyCheck)?;
    let outcome = session.run(SUDO_NON_INTERACTIVE_CHECK);
    session.close();

    match outcome {
        Ok(()) => Ok(false),
        Err(RunError::ExitStatus(_)) => Ok(true),
        Err(RunError::Transport(error)) => Err(ElevateError::PolicyCheck(error)),
    }
}

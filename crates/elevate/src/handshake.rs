//! The sudo handshake orchestrator.

use std::io::Write;

use expect::expect_only;
use transport::{Connection, RunError, Session};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::command::{READY_MARKER, SudoOption, sudo_command_line};
use crate::error::ElevateError;
use crate::password::PasswordSource;
use crate::policy::password_required;

/// A live elevated remote command: the three byte streams plus the session
/// handle, handed over only after the readiness marker was observed.
///
/// From this point the caller owns the stream lifecycle: write to and close
/// stdin, read the two output streams (concurrently, if desired — they are
/// independent byte sources), and await the exit status. [`Elevated::wait`]
/// does the common teardown in one call; [`Elevated::into_parts`] splits
/// everything for callers that route the streams to separate readers.
#[derive(Debug)]
pub struct Elevated<S: Session> {
    stdin: S::Stdin,
    stdout: S::Stdout,
    stderr: S::Stderr,
    session: S,
}

impl<S: Session> Elevated<S> {
    /// Splits the handshake result into its four owned parts:
    /// `(stdin, stdout, stderr, session)`.
    pub fn into_parts(self) -> (S::Stdin, S::Stdout, S::Stderr, S) {
        (self.stdin, self.stdout, self.stderr, self.session)
    }

    /// Mutable access to the remote input stream.
    pub fn stdin_mut(&mut self) -> &mut S::Stdin {
        &mut self.stdin
    }

    /// Mutable access to the remote output stream.
    pub fn stdout_mut(&mut self) -> &mut S::Stdout {
        &mut self.stdout
    }

    /// Mutable access to the remote diagnostic stream.
    pub fn stderr_mut(&mut self) -> &mut S::Stderr {
        &mut self.stderr
    }

    /// Closes the input stream and blocks until the remote command exits.
    ///
    /// A non-zero exit surfaces as [`RunError::ExitStatus`]; this is how
    /// callers detect that the elevated command itself failed.
    pub fn wait(mut self) -> Result<(), RunError> {
        self.session.close_stdin()?;
        self.session.wait()
    }
}

/// Runs `command` with sudo on the remote host behind `connection`.
///
/// Probes the sudo policy, starts the quoted command line on a fresh
/// session, performs the password exchange when one is demanded (asking
/// `password` exactly once), waits for the readiness marker, and hands the
/// live streams back. On any failure the session is torn down and an
/// [`ElevateError`] describes which step broke; no streams are ever
/// returned from a failed handshake.
///
/// `command` is an argument vector, not a shell string: each element
/// arrives at the remote command exactly as given. It must not be empty.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub fn run<C, P, S>(
    connection: &C,
    password: P,
    command: &[S],
) -> Result<Elevated<C::Session>, ElevateError>
where
    C: Connection,
    P: PasswordSource,
    S: AsRef<str>,
{
    let needs_password = password_required(connection)?;
    #[cfg(feature = "tracing")]
    tracing::debug!(needs_password, "starting sudo handshake");

    let mut session = connection.open_session()?;
    match drive(&mut session, password, command, needs_password) {
        Ok((stdin, stdout, stderr)) => Ok(Elevated {
            stdin,
            stdout,
            stderr,
            session,
        }),
        Err(error) => {
            session.close();
            Err(error)
        }
    }
}

/// Opens an elevated interactive-style shell reading from the remote stdin.
///
/// Equivalent to [`run`] with the fixed command `sh -`.
pub fn shell<C, P>(connection: &C, password: P) -> Result<Elevated<C::Session>, ElevateError>
where
    C: Connection,
    P: PasswordSource,
{
    run(connection, password, &["sh", "-"])
}

/// The handshake proper, from pipe acquisition to the readiness marker.
///
/// Runs against a session owned by the caller so that every error path can
/// tear the session down in one place.
fn drive<S, P>(
    session: &mut S,
    mut password: P,
    command: &[impl AsRef<str>],
    needs_password: bool,
) -> Result<(S::Stdin, S::Stdout, S::Stderr), ElevateError>
where
    S: Session,
    P: PasswordSource,
{
    let (mut stdin, mut stdout, mut stderr) = session.pipes()?;

    let option = if needs_password {
        SudoOption::Prompt(Uuid::new_v4().to_string())
    } else {
        SudoOption::NonInteractive
    };
    let command_line = sudo_command_line(&option, command);
    session.start(&command_line)?;

    if let SudoOption::Prompt(nonce) = &option {
        match expect_only(&mut stderr, nonce.as_bytes()) {
            Ok(true) => {}
            Ok(false) => return Err(ElevateError::NoPasswordPrompt),
            Err(error) => return Err(ElevateError::PromptRead(error)),
        }
        #[cfg(feature = "tracing")]
        tracing::trace!("sudo prompt observed, supplying password");

        let secret = Zeroizing::new(password.password().map_err(ElevateError::PasswordSource)?);
        let mut line = Zeroizing::new(Vec::with_capacity(secret.len() + 1));
        line.extend_from_slice(secret.as_bytes());
        line.push(b'\n');
        stdin.write_all(&line).map_err(ElevateError::PasswordWrite)?;
        stdin.flush().map_err(ElevateError::PasswordWrite)?;
    }

    let marker = format!("{READY_MARKER}\n");
    match expect_only(&mut stdout, marker.as_bytes()) {
        Ok(true) => {}
        Ok(false) => return Err(ElevateError::NoReadyMarker),
        Err(error) => return Err(ElevateError::ReadyRead(error)),
    }
    #[cfg(feature = "tracing")]
    tracing::trace!("readiness marker observed, handing streams to the caller");

    Ok((stdin, stdout, stderr))
}

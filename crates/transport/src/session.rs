//! Connection and session traits describing the remote-shell boundary.

use std::io::{Read, Write};

use crate::error::{RunError, TransportError};

/// An established connection to a remote host on which sessions can be
/// opened.
///
/// Opening a session is cheap relative to establishing the connection, and
/// every remote command execution uses its own session; implementations must
/// therefore support multiple sequential `open_session` calls.
pub trait Connection {
    /// Session type produced by this connection.
    type Session: Session;

    /// Opens a fresh session for executing one remote command.
    fn open_session(&self) -> Result<Self::Session, TransportError>;
}

/// One remote command execution: three byte streams plus an exit handle.
///
/// The intended call order is [`pipes`](Session::pipes), then
/// [`start`](Session::start), then reads and writes on the acquired streams,
/// then [`close_stdin`](Session::close_stdin) and [`wait`](Session::wait).
/// Alternatively [`run`](Session::run) executes a command and blocks until
/// it exits, for short commands whose output is not interesting.
pub trait Session {
    /// Writable input stream of the remote process.
    type Stdin: Write;
    /// Readable primary output stream of the remote process.
    type Stdout: Read;
    /// Readable diagnostic output stream of the remote process.
    type Stderr: Read;

    /// Acquires owned handles to the session's three byte streams.
    ///
    /// Called at most once per session, before [`start`](Session::start).
    fn pipes(&mut self) -> Result<(Self::Stdin, Self::Stdout, Self::Stderr), TransportError>;

    /// Begins executing `command` on the remote side without waiting for it.
    fn start(&mut self, command: &str) -> Result<(), TransportError>;

    /// Executes `command` and blocks until it exits, draining its output.
    ///
    /// A non-zero exit is reported as [`RunError::ExitStatus`], distinct
    /// from transport failures.
    fn run(&mut self, command: &str) -> Result<(), RunError>;

    /// Flushes and closes the input stream, signalling EOF to the remote
    /// process.
    fn close_stdin(&mut self) -> Result<(), TransportError>;

    /// Blocks until a previously started command exits.
    ///
    /// A non-zero exit is reported as [`RunError::ExitStatus`].
    fn wait(&mut self) -> Result<(), RunError>;

    /// Tears the session down, releasing remote resources.
    ///
    /// Best effort: teardown runs on error paths where there is nothing
    /// useful to do with a secondary failure.
    fn close(&mut self);
}

//! libssh2-backed implementation of the session traits.
//!
//! Maps the boundary onto blocking [`ssh2`] exec channels: stream 0 carries
//! stdin and stdout, the extended-data stream carries stderr, and the
//! channel itself is the exit handle. Authentication and connection setup
//! remain the caller's responsibility; this module starts from an already
//! authenticated [`ssh2::Session`].

use std::io;

use crate::error::{RunError, TransportError};
use crate::session::{Connection, Session};

/// An authenticated SSH connection on which exec sessions can be opened.
pub struct Ssh2Connection {
    session: ssh2::Session,
}

impl Ssh2Connection {
    /// Wraps an already authenticated [`ssh2::Session`].
    pub fn new(session: ssh2::Session) -> Self {
        Self { session }
    }

    /// Returns the underlying libssh2 session.
    pub fn session(&self) -> &ssh2::Session {
        &self.session
    }

    /// Unwraps the connection, returning the underlying libssh2 session.
    pub fn into_session(self) -> ssh2::Session {
        self.session
    }
}

impl Connection for Ssh2Connection {
    type Session = Ssh2Session;

    fn open_session(&self) -> Result<Self::Session, TransportError> {
        let channel = self
            .session
            .channel_session()
            .map_err(|error| TransportError::OpenSession(error.into()))?;
        Ok(Ssh2Session { channel })
    }
}

/// One exec channel on an SSH connection.
pub struct Ssh2Session {
    channel: ssh2::Channel,
}

impl Session for Ssh2Session {
    type Stdin = ssh2::Stream;
    type Stdout = ssh2::Stream;
    type Stderr = ssh2::Stream;

    fn pipes(&mut self) -> Result<(Self::Stdin, Self::Stdout, Self::Stderr), TransportError> {
        // Stream handles are independent views onto the channel; stream 0 is
        // bidirectional (stdin + stdout), stream 1 is stderr.
        Ok((
            self.channel.stream(0),
            self.channel.stream(0),
            self.channel.stderr(),
        ))
    }

    fn start(&mut self, command: &str) -> Result<(), TransportError> {
        self.channel
            .exec(command)
            .map_err(|error| TransportError::Start(error.into()))
    }

    fn run(&mut self, command: &str) -> Result<(), RunError> {
        self.channel
            .exec(command)
            .map_err(|error| TransportError::Run(error.into()))?;

        // Drain both output streams so the remote side is never blocked on a
        // full window while we wait for the close.
        io::copy(&mut self.channel.stream(0), &mut io::sink())
            .map_err(|error| TransportError::Run(error.into()))?;
        io::copy(&mut self.channel.stderr(), &mut io::sink())
            .map_err(|error| TransportError::Run(error.into()))?;

        self.channel
            .wait_close()
            .map_err(|error| TransportError::Run(error.into()))?;
        exit_ok(&mut self.channel, TransportError::Run)
    }

    fn close_stdin(&mut self) -> Result<(), TransportError> {
        self.channel
            .send_eof()
            .map_err(|error| TransportError::CloseStdin(error.into()))
    }

    fn wait(&mut self) -> Result<(), RunError> {
        self.channel
            .wait_close()
            .map_err(|error| TransportError::Wait(error.into()))?;
        exit_ok(&mut self.channel, TransportError::Wait)
    }

    fn close(&mut self) {
        let _ = self.channel.close();
        let _ = self.channel.wait_close();
    }
}

fn exit_ok(
    channel: &mut ssh2::Channel,
    wrap: fn(crate::error::BoxError) -> TransportError,
) -> Result<(), RunError> {
    let status = channel
        .exit_status()
        .map_err(|error| wrap(error.into()))?;
    if status == 0 {
        Ok(())
    } else {
        Err(RunError::ExitStatus(status))
    }
}

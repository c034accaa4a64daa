#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! Scripted in-memory implementations of the transport traits.
//!
//! A [`ScriptedConnection`] behaves like a remote host with a configurable
//! sudo policy: it answers the non-interactive sudo check with a scripted
//! exit status, emits the randomized prompt it finds in a started command
//! line back on the diagnostic stream, and emits the readiness marker plus a
//! scripted body on the output stream. Everything observable — probe
//! commands, started command lines, bytes written to stdin, session
//! bookkeeping — is recorded in a shared [`Log`] for assertions.
//!
//! The fakes are strictly sequential, matching the handshake they exist to
//! test: stream contents are placed when a command starts, and an exhausted
//! stream reports end-of-file rather than blocking.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};

use transport::{Connection, RunError, Session, TransportError};

/// How the scripted host answers `sudo -n -v`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeBehavior {
    /// The check exits zero: no password required.
    Passwordless,
    /// The check exits non-zero: a password will be demanded.
    PasswordRequired,
    /// The check cannot run at all: a transport failure.
    Broken,
}

/// Everything the scripted transport observed, for test assertions.
#[derive(Clone, Debug, Default)]
pub struct Log {
    /// Commands executed via `run` (the policy probes).
    pub ran: Vec<String>,
    /// Command lines executed via `start`.
    pub started: Vec<String>,
    /// Bytes written to the remote stdin.
    pub stdin: Vec<u8>,
    /// Whether EOF was signalled on stdin.
    pub stdin_closed: bool,
    /// Sessions opened so far.
    pub opened_sessions: usize,
    /// Sessions closed so far.
    pub closed_sessions: usize,
}

#[derive(Clone, Debug)]
struct Script {
    probe: ProbeBehavior,
    emit_prompt: bool,
    emit_ready: bool,
    cr_noise: bool,
    stdout_body: Vec<u8>,
    stderr_body: Vec<u8>,
    exit_status: i32,
}

/// A scripted remote host implementing [`Connection`].
#[derive(Debug)]
pub struct ScriptedConnection {
    script: Script,
    log: Arc<Mutex<Log>>,
}

impl ScriptedConnection {
    fn new(probe: ProbeBehavior) -> Self {
        Self {
            script: Script {
                probe,
                emit_prompt: true,
                emit_ready: true,
                cr_noise: false,
                stdout_body: Vec::new(),
                stderr_body: Vec::new(),
                exit_status: 0,
            },
            log: Arc::new(Mutex::new(Log::default())),
        }
    }

    /// A host whose sudo accepts non-interactive validation.
    pub fn passwordless() -> Self {
        Self::new(ProbeBehavior::Passwordless)
    }

    /// A host whose sudo demands a password.
    pub fn password_required() -> Self {
        Self::new(ProbeBehavior::PasswordRequired)
    }

    /// A host on which the sudo check cannot run at all.
    pub fn broken_probe() -> Self {
        Self::new(ProbeBehavior::Broken)
    }

    /// Bytes the remote command emits on stdout after the readiness marker.
    pub fn stdout_body(mut self, body: &[u8]) -> Self {
        self.script.stdout_body = body.to_vec();
        self
    }

    /// Bytes the remote side emits on stderr after the prompt (if any).
    pub fn stderr_body(mut self, body: &[u8]) -> Self {
        self.script.stderr_body = body.to_vec();
        self
    }

    /// Suppresses the readiness marker, as if the remote process exited
    /// before elevation completed.
    pub fn without_ready_marker(mut self) -> Self {
        self.script.emit_ready = false;
        self
    }

    /// Suppresses the password prompt, as if sudo never asked.
    pub fn without_prompt(mut self) -> Self {
        self.script.emit_prompt = false;
        self
    }

    /// Sprinkles carriage returns into the prompt and marker, as a remote
    /// shell normalizing line endings would.
    pub fn with_cr_noise(mut self) -> Self {
        self.script.cr_noise = true;
        self
    }

    /// Exit status reported when the started command is awaited.
    pub fn exit_status(mut self, status: i32) -> Self {
        self.script.exit_status = status;
        self
    }

    /// Snapshot of everything observed so far.
    pub fn log(&self) -> Log {
        self.log.lock().expect("log lock").clone()
    }
}

impl Connection for ScriptedConnection {
    type Session = ScriptedSession;

    fn open_session(&self) -> Result<Self::Session, TransportError> {
        self.log.lock().expect("log lock").opened_sessions += 1;
        Ok(ScriptedSession {
            script: self.script.clone(),
            log: Arc::clone(&self.log),
            stdout: SharedReader::empty(),
            stderr: SharedReader::empty(),
        })
    }
}

/// A scripted session handed out by [`ScriptedConnection`].
#[derive(Debug)]
pub struct ScriptedSession {
    script: Script,
    log: Arc<Mutex<Log>>,
    stdout: SharedReader,
    stderr: SharedReader,
}

impl Session for ScriptedSession {
    type Stdin = LogWriter;
    type Stdout = SharedReader;
    type Stderr = SharedReader;

    fn pipes(&mut self) -> Result<(Self::Stdin, Self::Stdout, Self::Stderr), TransportError> {
        Ok((
            LogWriter {
                log: Arc::clone(&self.log),
            },
            self.stdout.clone(),
            self.stderr.clone(),
        ))
    }

    fn start(&mut self, command: &str) -> Result<(), TransportError> {
        self.log
            .lock()
            .expect("log lock")
            .started
            .push(command.to_owned());

        if let Some(nonce) = prompt_nonce(command) {
            if self.script.emit_prompt {
                self.stderr.push(&noisy(nonce.as_bytes(), self.script.cr_noise));
            }
        }
        self.stderr.push(&self.script.stderr_body);

        if self.script.emit_ready {
            let marker: &[u8] = if self.script.cr_noise {
                b"READY\r\n"
            } else {
                b"READY\n"
            };
            self.stdout.push(marker);
        }
        self.stdout.push(&self.script.stdout_body);

        Ok(())
    }

    fn run(&mut self, command: &str) -> Result<(), RunError> {
        self.log
            .lock()
            .expect("log lock")
            .ran
            .push(command.to_owned());

        match self.script.probe {
            ProbeBehavior::Passwordless => Ok(()),
            ProbeBehavior::PasswordRequired => Err(RunError::ExitStatus(1)),
            ProbeBehavior::Broken => Err(RunError::Transport(TransportError::Run(Box::new(
                io::Error::other("scripted transport failure"),
            )))),
        }
    }

    fn close_stdin(&mut self) -> Result<(), TransportError> {
        self.log.lock().expect("log lock").stdin_closed = true;
        Ok(())
    }

    fn wait(&mut self) -> Result<(), RunError> {
        if self.script.exit_status == 0 {
            Ok(())
        } else {
            Err(RunError::ExitStatus(self.script.exit_status))
        }
    }

    fn close(&mut self) {
        self.log.lock().expect("log lock").closed_sessions += 1;
    }
}

/// Extracts the custom prompt token from a started sudo command line.
fn prompt_nonce(command: &str) -> Option<String> {
    let mut tokens = command.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "-p" {
            return tokens
                .next()
                .map(|raw| raw.trim_matches('\'').to_owned());
        }
        if token == "/bin/sh" {
            break;
        }
    }
    None
}

/// Interleaves carriage returns into `bytes` when `noise` is set.
fn noisy(bytes: &[u8], noise: bool) -> Vec<u8> {
    if !noise {
        return bytes.to_vec();
    }
    let mut out = vec![b'\r'];
    for (index, byte) in bytes.iter().enumerate() {
        out.push(*byte);
        if index == bytes.len() / 2 {
            out.push(b'\r');
        }
    }
    out
}

/// Readable stream over a shared byte queue; empty means end-of-file.
#[derive(Clone, Debug)]
pub struct SharedReader {
    bytes: Arc<Mutex<VecDeque<u8>>>,
}

impl SharedReader {
    fn empty() -> Self {
        Self {
            bytes: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    fn push(&self, bytes: &[u8]) {
        self.bytes.lock().expect("stream lock").extend(bytes);
    }
}

impl Read for SharedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut bytes = self.bytes.lock().expect("stream lock");
        let mut filled = 0;
        while filled < buf.len() {
            match bytes.pop_front() {
                Some(byte) => {
                    buf[filled] = byte;
                    filled += 1;
                }
                None => break,
            }
        }
        Ok(filled)
    }
}

/// Writer that records everything written to the remote stdin.
#[derive(Debug)]
pub struct LogWriter {
    log: Arc<Mutex<Log>>,
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.log
            .lock()
            .expect("log lock")
            .stdin
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Overview
//!
//! `transport` defines the remote-shell session boundary the sudo handshake
//! is written against: open a session on an established connection, acquire
//! the session's three byte streams, start or run a command, and tear the
//! session down. The handshake layer consumes these traits; it never talks
//! to an SSH library directly.
//!
//! # Design
//!
//! The traits mirror the shape of a blocking SSH exec channel: one writable
//! input stream, one readable output stream, one readable diagnostic stream,
//! and an exit handle. Splitting the streams into owned handles lets callers
//! hand them to independent readers once a handshake succeeds, while the
//! session value itself remains the place to close stdin and await exit.
//!
//! The concrete [`Ssh2Connection`] adapter (behind the `ssh2` feature) maps
//! the traits onto libssh2 channels. Tests substitute scripted in-memory
//! sessions instead.
//!
//! # Errors
//!
//! Every fallible operation is tagged with the step that failed via
//! [`TransportError`]. A remote command that ran but exited non-zero is a
//! distinct condition, [`RunError::ExitStatus`], so policy code can tell
//! "the check ran and said no" apart from "the check could not run".

mod error;
mod session;
#[cfg(feature = "ssh2")]
mod ssh;

pub use error::{BoxError, RunError, TransportError};
pub use session::{Connection, Session};
#[cfg(feature = "ssh2")]
#[cfg_attr(docsrs, doc(cfg(feature = "ssh2")))]
pub use ssh::{Ssh2Connection, Ssh2Session};

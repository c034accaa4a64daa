#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Overview
//!
//! `elevate` runs a command with sudo on a remote host reached over an
//! already established remote-shell connection, transparently supplying the
//! sudo password if and only if the remote policy demands one. It exists for
//! automation that needs privileged remote execution without a human at a
//! prompt.
//!
//! # Design
//!
//! The crate is a small, strictly sequential handshake over the transport
//! boundary defined by the `transport` crate:
//!
//! 1. [`password_required`] probes the remote sudo policy with a
//!    non-interactive credential check on a throwaway session.
//! 2. [`run`] opens a fresh session, builds a fully quoted command line in
//!    which the remote shell first echoes a readiness marker and then
//!    executes the caller's command, and starts it under `sudo -S`.
//! 3. When a password is needed, sudo is given a random single-use token as
//!    its prompt; the handshake waits for that token on the diagnostic
//!    stream, obtains the password from a [`PasswordSource`], and writes it
//!    to the input stream.
//! 4. Only after the readiness marker is observed on the output stream does
//!    the handshake hand the three live streams and the session to the
//!    caller, as an [`Elevated`] value.
//!
//! Every argument — the caller's and the handshake's own — passes through
//! POSIX shell quoting, so command content can never be re-interpreted by
//! the remote shell.
//!
//! # Invariants
//!
//! - The caller never receives live streams unless the readiness marker was
//!   positively observed; any earlier failure tears the session down.
//! - The password source is invoked at most once per handshake, and never
//!   when the policy probe reports that no password is needed.
//! - The sudo policy is re-probed on every invocation; nothing is cached.
//!
//! # Errors
//!
//! All failures abort the handshake and surface as [`ElevateError`], whose
//! variants keep transport faults, protocol-expectation misses (no prompt,
//! no readiness marker), phase-tagged I/O errors, and password-source
//! failures distinguishable. Nothing is retried internally.

mod command;
mod error;
mod handshake;
mod password;
mod policy;

pub use error::{ElevateError, ElevateResult};
pub use handshake::{Elevated, run, shell};
pub use password::{PasswordSource, StaticPassword};
pub use policy::password_required;

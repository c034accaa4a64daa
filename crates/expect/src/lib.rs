#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `expect` implements the byte-synchronous scanner used to synchronize with
//! a remote process over unbuffered pipes. The scanner consumes a stream one
//! byte at a time and reports whether a specific byte sequence appears next,
//! without reading past the first byte that settles the question.
//!
//! # Design
//!
//! The scanner is deliberately a single free function over [`std::io::Read`].
//! It performs blocking single-byte reads because the streams it watches are
//! mixed-channel pipes from a remote shell: reading ahead of the expected
//! sequence would steal bytes that belong to the caller, and any buffering
//! would desynchronize the password exchange it exists to support.
//!
//! # Invariants
//!
//! - Carriage-return bytes are transparent: they neither advance nor break a
//!   match. Remote shells routinely rewrite line endings, and a stray `\r`
//!   must not derail the scan. The expected sequence itself must therefore
//!   not contain `\r`.
//! - On a mismatch the first diverging byte is consumed but the remainder of
//!   the stream is left untouched.
//! - An empty expected sequence matches without reading anything.
//!
//! # Errors
//!
//! Read failures surface as [`std::io::Error`]. End of stream is not an
//! error: once the stream has proven it cannot produce the sequence the
//! scanner reports "not matched" and leaves classification to the caller.

use std::io::{self, Read};

/// Scans `reader` for `expected`, consuming bytes until the outcome is known.
///
/// Returns `Ok(true)` once every byte of `expected` has been matched in
/// order, and `Ok(false)` as soon as a byte diverges from the sequence or
/// the stream ends before completing it. Carriage returns read from the
/// stream are skipped entirely.
///
/// Each read may block until the peer produces data; there is no timeout at
/// this layer.
pub fn expect_only<R: Read>(reader: &mut R, expected: &[u8]) -> io::Result<bool> {
    let mut remaining = expected;
    let mut byte = [0u8; 1];

    while !remaining.is_empty() {
        if reader.read(&mut byte)? == 0 {
            return Ok(false);
        }
        if byte[0] == b'\r' {
            continue;
        }
        if byte[0] != remaining[0] {
            return Ok(false);
        }
        remaining = &remaining[1..];
    }

    Ok(true)
}

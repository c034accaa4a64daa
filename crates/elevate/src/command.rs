//! Remote command line construction.
//!
//! The remote shell receives, literally:
//!
//! ```text
//! sudo -S <opt> /bin/sh -c 'echo READY;'<quoted-joined-caller-command>
//! ```
//!
//! `<opt>` selects the elevation mode: `-n` fails fast when credentials are
//! insufficient, `-p <token>` installs the per-invocation nonce as the
//! prompt. The caller's arguments are each quoted, joined with single
//! spaces, and the joined string is quoted once more — the inner `sh -c`
//! must receive one string to evaluate, not a pre-split argument vector.
//! The second quoted fragment sits directly against `'echo READY;'`; the
//! remote shell concatenates adjacent quoted words into the single `-c`
//! operand.

/// Sentinel the remote shell echoes once elevation has succeeded, before
/// the caller's command produces any output.
pub(crate) const READY_MARKER: &str = "READY";

/// Elevation mode for one handshake invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SudoOption {
    /// Never prompt; fail immediately if credentials are insufficient.
    NonInteractive,
    /// Prompt with the given single-use token.
    Prompt(String),
}

impl SudoOption {
    fn render(&self) -> String {
        match self {
            Self::NonInteractive => "-n".to_owned(),
            Self::Prompt(nonce) => format!("-p {}", shell_words::quote(nonce)),
        }
    }
}

/// Builds the full remote command line for `command` under `option`.
pub(crate) fn sudo_command_line<S: AsRef<str>>(option: &SudoOption, command: &[S]) -> String {
    let joined = shell_words::join(command.iter().map(AsRef::as_ref));
    format!(
        "sudo -S {} /bin/sh -c 'echo {READY_MARKER};'{}",
        option.render(),
        shell_words::quote(&joined),
    )
}

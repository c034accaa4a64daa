//! Password supply abstraction.

use std::fmt;

use transport::BoxError;
use zeroize::Zeroizing;

/// Produces a sudo password, or fails.
///
/// The handshake calls this at most once per invocation, and never when the
/// policy probe reports that no password is required. Closures returning
/// `Result<String, BoxError>` implement the trait directly, so dynamic
/// sources (interactive prompts, secret-manager lookups) need no wrapper
/// type.
pub trait PasswordSource {
    /// Returns the password to supply to sudo.
    fn password(&mut self) -> Result<String, BoxError>;
}

impl<F> PasswordSource for F
where
    F: FnMut() -> Result<String, BoxError>,
{
    fn password(&mut self) -> Result<String, BoxError> {
        self()
    }
}

/// A [`PasswordSource`] that always supplies the same fixed password.
///
/// The stored password is zeroized when the source is dropped.
pub struct StaticPassword {
    password: Zeroizing<String>,
}

impl StaticPassword {
    /// Creates a source around a fixed password.
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: Zeroizing::new(password.into()),
        }
    }
}

impl PasswordSource for StaticPassword {
    fn password(&mut self) -> Result<String, BoxError> {
        Ok(self.password.as_str().to_owned())
    }
}

// Manual impl so the password never ends up in debug output.
impl fmt::Debug for StaticPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticPassword").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_source_returns_the_fixed_password() {
        let mut source = StaticPassword::new("pass word");
        assert_eq!(source.password().unwrap(), "pass word");
        // Repeated calls keep working even though the handshake only asks once.
        assert_eq!(source.password().unwrap(), "pass word");
    }

    #[test]
    fn closures_are_sources() {
        let mut calls = 0;
        let mut source = || {
            calls += 1;
            Ok::<_, BoxError>("secret".to_owned())
        };
        assert_eq!(source.password().unwrap(), "secret");
        drop(source);
        assert_eq!(calls, 1);
    }

    #[test]
    fn debug_output_redacts_the_password() {
        let source = StaticPassword::new("hunter2");
        let debug = format!("{source:?}");
        assert!(!debug.contains("hunter2"));
    }
}

//! Context helpers for attaching messages to errors.

use super::{MkbenchError, Result};

/// Attach a context message to the error side of a `Result`.
pub trait ResultExt<T> {
    /// Wrap the error with a static or formatted context message.
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped in [`MkbenchError::WithContext`].
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|source| MkbenchError::WithContext {
            context: f().into(),
            source: Box::new(source),
        })
    }
}

/// Turn a missing value into a configuration error.
pub trait OptionExt<T> {
    /// Convert `None` into [`MkbenchError::Config`] with the given message.
    ///
    /// # Errors
    ///
    /// Returns [`MkbenchError::Config`] when the option is `None`.
    fn ok_or_config<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_config<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| MkbenchError::Config(f().into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_wraps_message() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::other("boom"));
        let err = res.with_context(|| "reading data").unwrap_err();
        assert_eq!(err.to_string(), "reading data: boom");
    }

    #[test]
    fn test_ok_or_config() {
        let missing: Option<u8> = None;
        let err = missing.ok_or_config(|| "no value").unwrap_err();
        assert!(matches!(err, MkbenchError::Config(msg) if msg == "no value"));
        assert_eq!(Some(3).ok_or_config(|| "unused").unwrap(), 3);
    }
}

//! Redacting wrapper for bearer tokens and passwords
//!
//! Anything wrapped in `Secret` prints as `[REDACTED]` through `Debug` and
//! `Display`, so it can sit inside structs that get logged with `?field`.
//! The inner value is zeroized when the wrapper is dropped.

use std::fmt;
use zeroize::Zeroize;

/// Sensitive value, redacted in Debug/Display/logs
pub struct Secret<T: Zeroize>(T);

impl<T: Zeroize> Secret<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the inner value. Keep the borrow short and never log it.
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl<T: Zeroize + PartialEq> Secret<T> {
    /// Compare against a plain value without exposing the secret to the caller.
    pub fn matches(&self, other: &T) -> bool {
        self.0 == *other
    }
}

impl From<String> for Secret<String> {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret<String> {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl<T: Zeroize> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T: Zeroize> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T: Zeroize> Drop for Secret<T> {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl<T: Zeroize + Clone> Clone for Secret<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_and_display_are_redacted() {
        let token = Secret::from("eyJhbGciOiJIUzI1NiJ9.access");
        assert_eq!(format!("{token:?}"), "[REDACTED]");
        assert_eq!(token.to_string(), "[REDACTED]");
    }

    #[test]
    fn redacted_inside_containing_struct() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Pair {
            access: Secret<String>,
        }
        let pair = Pair {
            access: Secret::from("at_live"),
        };
        let debug = format!("{pair:?}");
        assert!(!debug.contains("at_live"), "got: {debug}");
    }

    #[test]
    fn expose_and_matches() {
        let secret = Secret::new(String::from("rt_123"));
        assert_eq!(secret.expose(), "rt_123");
        assert!(secret.matches(&"rt_123".to_string()));
        assert!(!secret.matches(&"rt_456".to_string()));
    }

    #[test]
    fn clone_keeps_value() {
        let secret = Secret::from("at_1");
        let copy = secret.clone();
        drop(secret);
        assert_eq!(copy.expose(), "at_1");
    }
}

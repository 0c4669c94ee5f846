//! Unified error interface for stockroom crates.
//!
//! Every error enum in the workspace implements [`ErrorCode`] so that the
//! CLI and logs can report a stable, machine-readable code alongside the
//! human message.
//!
//! # Example
//!
//! ```
//! use stockroom_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum FetchError {
//!     NotFound(i64),
//!     Timeout,
//! }
//!
//! impl ErrorCode for FetchError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::NotFound(_) => "FETCH_NOT_FOUND",
//!             Self::Timeout => "FETCH_TIMEOUT",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Timeout)
//!     }
//! }
//!
//! assert_eq!(FetchError::Timeout.code(), "FETCH_TIMEOUT");
//! assert!(!FetchError::NotFound(7).is_recoverable());
//! ```

/// Machine-readable error code plus recoverability.
///
/// # Code Format
///
/// - UPPER_SNAKE_CASE, prefixed by domain (`AUTH_`, `CLIENT_`, `CONFIG_`)
/// - Stable once published
///
/// # Recoverability
///
/// Recoverable means a retry or a user action (logging in again, fixing a
/// flag) may succeed. Denials and configuration defects are not
/// recoverable by retrying.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether the error is recoverable.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error code is non-empty, prefixed and UPPER_SNAKE_CASE.
///
/// # Panics
///
/// Panics with a descriptive message if any check fails.
///
/// ```
/// use stockroom_types::{assert_error_code, ErrorCode};
///
/// struct Boom;
/// impl ErrorCode for Boom {
///     fn code(&self) -> &'static str { "TEST_BOOM" }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_code(&Boom, "TEST_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates every error in `errors` with [`assert_error_code`].
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

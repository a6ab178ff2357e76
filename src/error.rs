//! Stable error codes shared by the provider layer and the HTTP surface.

/// An error that exposes a stable machine-readable code.
///
/// The code travels to front ends in the `kind` field of a failure body so
/// they can render `"<kind>: <description>"` without parsing messages.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

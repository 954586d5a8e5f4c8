use std::os::raw::c_int;

/// Status code returned by every suite function.
///
/// Zero is success. Any other value is a provider-defined failure code that
/// the host treats as opaque beyond being non-zero.
pub type ErrorCode = c_int;

/// Success.
pub const K_OK: ErrorCode = 0;

/// Failure with no more specific code available.
pub const K_UNKNOWN: ErrorCode = 128;

/// Whether `code` reports success.
pub fn is_ok(code: ErrorCode) -> bool {
    code == K_OK
}

use assetbridge_abi::{ErrorCode, is_ok};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// A suite function reported a non-OK status.
    #[error("{code}: {message}")]
    Status { code: ErrorCode, message: String },

    #[error("{operation}: suite returned a result that is not valid UTF-8")]
    InvalidUtf8 { operation: &'static str },

    #[error("{operation}: manager interface has already been released")]
    Released { operation: &'static str },

    #[error("{operation}: not supported by the manager suite")]
    Unsupported { operation: &'static str },

    #[error("configured manager '{expected}' does not match interface '{actual}'")]
    IdentifierMismatch { expected: String, actual: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl BridgeError {
    /// The suite status code carried by this error, if it came from one.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            BridgeError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Translate a suite status code and its error message into a `Result`.
///
/// `K_OK` succeeds without looking at `message`. Any other code fails with
/// [`BridgeError::Status`], whose description is `"<code>: <message>"`.
/// The message is diagnostic text only, so invalid UTF-8 is replaced rather
/// than rejected.
pub fn check_status(code: ErrorCode, message: &[u8]) -> Result<(), BridgeError> {
    if is_ok(code) {
        return Ok(());
    }
    Err(BridgeError::Status {
        code,
        message: String::from_utf8_lossy(message).into_owned(),
    })
}

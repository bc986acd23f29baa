/// Errors that abort hash calculation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SafeHashError {
    /// The Safe version is empty, malformed or older than the oldest supported one.
    #[error("Unsupported Safe version \"{version}\": {reason}")]
    UnsupportedVersion {
        /// The version string as received
        version: String,
        /// Why the version was rejected
        reason: String,
    },
}

impl SafeHashError {
    pub(crate) fn unsupported(version: &str, reason: impl Into<String>) -> Self {
        Self::UnsupportedVersion { version: version.to_string(), reason: reason.into() }
    }
}

/// Reasons a calldata blob could not be unwound as a `MultiSend` batch.
///
/// None of these are fatal: callers fall back to treating the data as an opaque call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MultiSendError {
    /// The calldata is not a `multiSend(bytes)` call or its ABI wrapper is malformed.
    #[error("Calldata is not a multiSend(bytes) call")]
    NotMultiSend,

    /// A record extends past the end of the packed buffer.
    #[error("Packed record at offset {offset} needs {needed} bytes, only {available} available")]
    MalformedBinary {
        /// Offset of the field being read
        offset: usize,
        /// Bytes required by the field
        needed: usize,
        /// Bytes left in the buffer
        available: usize,
    },

    /// A record carries an operation code other than `CALL` (0) or `DELEGATECALL` (1).
    #[error("Invalid operation code {code} at offset {offset}")]
    InvalidOperation {
        /// Offset of the record
        offset: usize,
        /// The offending code
        code: u8,
    },
}

/// Result type for hash calculation.
pub type Result<T> = std::result::Result<T, SafeHashError>;

use bitcoin::script::PushBytesError;
use thiserror::Error;

/// Errors that can occur while encoding a carrier envelope.
#[derive(Debug, Error)]
pub enum CarrierEncodeError {
    /// The payload is empty.
    #[error("payload is empty")]
    PayloadEmpty,

    /// The payload exceeds the configured carrier ceiling.
    #[error("payload of {len} bytes exceeds the {max} byte carrier ceiling")]
    PayloadTooLarge {
        /// Actual payload length.
        len: usize,
        /// Configured ceiling.
        max: usize,
    },

    /// The content type is empty or contains non-printable characters.
    #[error("content type must be non-empty printable ASCII")]
    InvalidContentType,

    /// A chunk operation exceeds the per-push consensus limit.
    #[error("chunk of {len} bytes exceeds the per-push limit")]
    OversizedChunk {
        /// Size of the offending chunk.
        len: usize,
    },

    /// Failed to convert data into a `PushBytesBuf`.
    #[error("pushbytes: {0}")]
    PushBytes(#[from] PushBytesError),
}

/// Errors that can occur while parsing a carrier envelope.
#[derive(Debug, Error)]
pub enum CarrierParseError {
    /// The script does not begin with the envelope marker pair or its
    /// header pushes do not match the carrier format.
    #[error("script is not a carrier envelope")]
    NotACarrierScript,

    /// The script ends before the envelope is complete.
    #[error("carrier envelope ends before the closing marker")]
    TruncatedCarrierScript,

    /// The envelope carries a format version this parser does not understand.
    #[error("unsupported carrier version {0}")]
    UnsupportedVersion(u8),
}

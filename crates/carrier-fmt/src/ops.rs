use bitcoin::{
    ScriptBuf,
    blockdata::script,
    opcodes::{
        OP_FALSE,
        all::{OP_ENDIF, OP_IF},
    },
    script::PushBytesBuf,
};

use crate::{MAX_CHUNK_SIZE, PROTOCOL_TAG_LEN, errors::CarrierEncodeError};

/// A single typed operation in a carrier envelope script.
///
/// A well-formed envelope is the sequence: [`Marker`](Self::Marker),
/// [`ProtocolTag`](Self::ProtocolTag), [`Version`](Self::Version),
/// [`ContentType`](Self::ContentType), [`Separator`](Self::Separator), one or
/// more [`Chunk`](Self::Chunk)s, [`EndMarker`](Self::EndMarker). The sequence
/// is turned into script bytes by a single [`compile`] step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarrierOp {
    /// The `OP_FALSE OP_IF` pair opening the envelope.
    Marker,

    /// The 3-byte protocol tag push.
    ProtocolTag([u8; PROTOCOL_TAG_LEN]),

    /// The 1-byte format version push.
    Version(u8),

    /// The content-type push.
    ContentType(Vec<u8>),

    /// The 1-byte separator push between header and data.
    Separator(u8),

    /// A payload data chunk push, at most [`MAX_CHUNK_SIZE`] bytes.
    Chunk(Vec<u8>),

    /// The `OP_ENDIF` closing the envelope.
    EndMarker,
}

impl CarrierOp {
    /// Returns the exact number of script bytes this operation compiles to.
    ///
    /// Kept in lock-step with [`compile`] so size estimation never drifts
    /// from what the builder actually emits.
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Marker => 2,
            Self::ProtocolTag(_) => 1 + PROTOCOL_TAG_LEN,
            Self::Version(_) => 2,
            Self::ContentType(ct) => push_encoded_len(ct.len()),
            Self::Separator(_) => 2,
            Self::Chunk(chunk) => push_encoded_len(chunk.len()),
            Self::EndMarker => 1,
        }
    }
}

/// Returns the number of script bytes a data push of `len` bytes occupies,
/// including its length-prefix opcode.
pub(crate) fn push_encoded_len(len: usize) -> usize {
    if len <= 75 {
        // direct push: single length byte
        1 + len
    } else if len <= 0xff {
        // OP_PUSHDATA1
        2 + len
    } else {
        // OP_PUSHDATA2; lengths beyond u16 never occur within chunk limits
        3 + len
    }
}

/// Compiles a carrier operation sequence into a script.
///
/// # Errors
///
/// Returns [`CarrierEncodeError::OversizedChunk`] if a chunk exceeds
/// [`MAX_CHUNK_SIZE`], or a conversion error if a push cannot be represented.
pub fn compile(ops: &[CarrierOp]) -> Result<ScriptBuf, CarrierEncodeError> {
    let mut builder = script::Builder::new();

    for op in ops {
        builder = match op {
            CarrierOp::Marker => builder.push_opcode(OP_FALSE).push_opcode(OP_IF),
            CarrierOp::ProtocolTag(tag) => builder.push_slice(*tag),
            CarrierOp::Version(version) => builder.push_slice([*version]),
            CarrierOp::ContentType(ct) => {
                builder.push_slice(PushBytesBuf::try_from(ct.clone())?)
            }
            CarrierOp::Separator(sep) => builder.push_slice([*sep]),
            CarrierOp::Chunk(chunk) => {
                if chunk.len() > MAX_CHUNK_SIZE {
                    return Err(CarrierEncodeError::OversizedChunk { len: chunk.len() });
                }
                builder.push_slice(PushBytesBuf::try_from(chunk.clone())?)
            }
            CarrierOp::EndMarker => builder.push_opcode(OP_ENDIF),
        };
    }

    Ok(builder.into_script())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CARRIER_VERSION, PROTOCOL_TAG, SEPARATOR_BYTE};

    fn canonical_ops(payload: &[u8], content_type: &str) -> Vec<CarrierOp> {
        let mut ops = vec![
            CarrierOp::Marker,
            CarrierOp::ProtocolTag(PROTOCOL_TAG),
            CarrierOp::Version(CARRIER_VERSION),
            CarrierOp::ContentType(content_type.as_bytes().to_vec()),
            CarrierOp::Separator(SEPARATOR_BYTE),
        ];
        for chunk in payload.chunks(MAX_CHUNK_SIZE) {
            ops.push(CarrierOp::Chunk(chunk.to_vec()));
        }
        ops.push(CarrierOp::EndMarker);
        ops
    }

    #[test]
    fn test_encoded_len_matches_compile() {
        // Cover direct push, OP_PUSHDATA1, and OP_PUSHDATA2 boundaries.
        for size in [1usize, 75, 76, 255, 256, 519, 520] {
            let payload = vec![0xab; size];
            let ops = canonical_ops(&payload, "application/octet-stream");

            let expected: usize = ops.iter().map(CarrierOp::encoded_len).sum();
            let script = compile(&ops).unwrap();

            assert_eq!(
                script.len(),
                expected,
                "encoded_len drifted from compile at payload size {size}"
            );
        }
    }

    #[test]
    fn test_oversized_chunk_rejected() {
        let ops = vec![
            CarrierOp::Marker,
            CarrierOp::Chunk(vec![0; MAX_CHUNK_SIZE + 1]),
            CarrierOp::EndMarker,
        ];

        match compile(&ops) {
            Err(CarrierEncodeError::OversizedChunk { len }) => {
                assert_eq!(len, MAX_CHUNK_SIZE + 1);
            }
            other => panic!("expected OversizedChunk, got {other:?}"),
        }
    }
}

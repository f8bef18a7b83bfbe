use bitcoin::ScriptBuf;

use crate::{
    CARRIER_VERSION, MAX_CHUNK_SIZE, MAX_PAYLOAD_SIZE, PROTOCOL_TAG, PROTOCOL_TAG_LEN,
    SEPARATOR_BYTE,
    errors::CarrierEncodeError,
    ops::{self, CarrierOp},
};

/// Builds the canonical carrier operation sequence for a payload.
///
/// Validates the payload and content type, then lays out the envelope:
/// marker pair, protocol tag, version, content type, separator, payload
/// chunks of up to [`MAX_CHUNK_SIZE`] bytes each, closing marker.
///
/// # Errors
///
/// Returns [`CarrierEncodeError::PayloadEmpty`] on an empty payload,
/// [`CarrierEncodeError::PayloadTooLarge`] when the payload exceeds
/// [`MAX_PAYLOAD_SIZE`], and [`CarrierEncodeError::InvalidContentType`] on an
/// empty or non-printable content type.
pub fn carrier_ops(
    payload: &[u8],
    content_type: &str,
) -> Result<Vec<CarrierOp>, CarrierEncodeError> {
    if payload.is_empty() {
        return Err(CarrierEncodeError::PayloadEmpty);
    }
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(CarrierEncodeError::PayloadTooLarge {
            len: payload.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }
    validate_content_type(content_type)?;

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
    Ok(ops)
}

/// Builds a carrier envelope script embedding the given payload.
///
/// # Errors
///
/// Returns [`CarrierEncodeError`] if the payload or content type fails
/// validation; see [`carrier_ops`].
pub fn build_carrier_script(
    payload: &[u8],
    content_type: &str,
) -> Result<ScriptBuf, CarrierEncodeError> {
    let ops = carrier_ops(payload, content_type)?;
    ops::compile(&ops)
}

/// Returns the exact byte length of the script [`build_carrier_script`] would
/// produce, without constructing it.
///
/// Used by fee estimation; stays in lock-step with the builder because both
/// derive their layout from the same per-op sizes.
pub fn encoded_script_size(payload_len: usize, content_type_len: usize) -> usize {
    // marker pair + tag + version + content type + separator + end marker
    let mut size = 2
        + (1 + PROTOCOL_TAG_LEN)
        + 2
        + ops::push_encoded_len(content_type_len)
        + 2
        + 1;

    let full_chunks = payload_len / MAX_CHUNK_SIZE;
    let remainder = payload_len % MAX_CHUNK_SIZE;

    size += full_chunks * ops::push_encoded_len(MAX_CHUNK_SIZE);
    if remainder > 0 {
        size += ops::push_encoded_len(remainder);
    }

    size
}

fn validate_content_type(content_type: &str) -> Result<(), CarrierEncodeError> {
    if content_type.is_empty() || content_type.len() > MAX_CHUNK_SIZE {
        return Err(CarrierEncodeError::InvalidContentType);
    }
    let printable = content_type
        .bytes()
        .all(|b| b.is_ascii() && !b.is_ascii_control());
    if !printable {
        return Err(CarrierEncodeError::InvalidContentType);
    }
    Ok(())
}

use std::str;

use bitcoin::{
    Script,
    opcodes::all::{OP_ENDIF, OP_IF},
    script::{Instruction, Instructions},
};

use crate::{CARRIER_VERSION, PROTOCOL_TAG, errors::CarrierParseError};

/// Content recovered from a carrier envelope script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierData {
    content_type: String,
    payload: Vec<u8>,
}

impl CarrierData {
    /// Gets the content type string.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Gets the payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consumes this value, returning the content type and payload.
    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.content_type, self.payload)
    }
}

/// Parses a carrier envelope script, recovering the content type and payload.
///
/// The script must begin with the `OP_FALSE OP_IF` marker pair and carry the
/// header pushes described in the crate docs. All data-chunk pushes between
/// the separator and `OP_ENDIF` are concatenated in order to rebuild the
/// payload.
///
/// # Errors
///
/// Returns [`CarrierParseError::NotACarrierScript`] if the marker pair,
/// protocol tag, or header layout does not match,
/// [`CarrierParseError::UnsupportedVersion`] on an unknown version byte, and
/// [`CarrierParseError::TruncatedCarrierScript`] if the script ends before
/// the closing marker or carries no data chunks.
pub fn parse_carrier_script(script: &Script) -> Result<CarrierData, CarrierParseError> {
    let mut instructions = script.instructions();

    enter_envelope(&mut instructions)?;

    let tag = next_push(&mut instructions)?;
    if *tag != PROTOCOL_TAG {
        return Err(CarrierParseError::NotACarrierScript);
    }

    let version = next_push(&mut instructions)?;
    match version {
        [v] if *v == CARRIER_VERSION => {}
        [v] => return Err(CarrierParseError::UnsupportedVersion(*v)),
        _ => return Err(CarrierParseError::NotACarrierScript),
    }

    let content_type = next_push(&mut instructions)?;
    let content_type = str::from_utf8(content_type)
        .map_err(|_| CarrierParseError::NotACarrierScript)?
        .to_owned();

    let separator = next_push(&mut instructions)?;
    if *separator != [crate::SEPARATOR_BYTE] {
        return Err(CarrierParseError::NotACarrierScript);
    }

    let payload = extract_until_end_marker(&mut instructions)?;

    Ok(CarrierData {
        content_type,
        payload,
    })
}

/// Checks for the consecutive `OP_FALSE` and `OP_IF` opening the envelope.
///
/// Unlike formats that bury envelopes mid-script, a carrier envelope must be
/// the entire script, so the marker pair is required at position zero.
fn enter_envelope(instructions: &mut Instructions<'_>) -> Result<(), CarrierParseError> {
    // OP_FALSE is an empty PushBytes when iterating instructions.
    match instructions.next() {
        Some(Ok(Instruction::PushBytes(bytes))) if bytes.as_bytes().is_empty() => {}
        _ => return Err(CarrierParseError::NotACarrierScript),
    }

    match instructions.next() {
        Some(Ok(Instruction::Op(op))) if op == OP_IF => Ok(()),
        _ => Err(CarrierParseError::NotACarrierScript),
    }
}

/// Extracts the next instruction, requiring it to be a data push.
fn next_push<'a>(instructions: &mut Instructions<'a>) -> Result<&'a [u8], CarrierParseError> {
    match instructions.next() {
        Some(Ok(Instruction::PushBytes(bytes))) => Ok(bytes.as_bytes()),
        Some(_) => Err(CarrierParseError::NotACarrierScript),
        None => Err(CarrierParseError::TruncatedCarrierScript),
    }
}

/// Concatenates chunk pushes until `OP_ENDIF` is reached.
fn extract_until_end_marker(
    instructions: &mut Instructions<'_>,
) -> Result<Vec<u8>, CarrierParseError> {
    let mut payload = Vec::new();
    let mut chunks = 0usize;

    loop {
        match instructions.next() {
            Some(Ok(Instruction::Op(op))) if op == OP_ENDIF => break,
            Some(Ok(Instruction::PushBytes(bytes))) => {
                payload.extend_from_slice(bytes.as_bytes());
                chunks += 1;
            }
            Some(_) => return Err(CarrierParseError::NotACarrierScript),
            None => return Err(CarrierParseError::TruncatedCarrierScript),
        }
    }

    if chunks == 0 {
        return Err(CarrierParseError::TruncatedCarrierScript);
    }

    Ok(payload)
}

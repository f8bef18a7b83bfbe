//! Bitcoin script carrier envelope format for timevault payloads.
//!
//! This crate provides functionality for embedding an opaque, already-encrypted
//! byte payload into a Bitcoin script envelope, and for recovering the payload
//! from such a script. The envelope rides in a transaction output whose value
//! is zero; it never authorizes a spend.
//!
//! # Envelope structure
//!
//! ```text
//! OP_FALSE OP_IF
//!   <"tvl">           3-byte protocol tag
//!   <0x01>            1-byte format version
//!   <content-type>    printable ASCII, e.g. "text/plain"
//!   <0x00>            1-byte separator
//!   <chunk_0>
//!   ...
//!   <chunk_n>
//! OP_ENDIF
//! ```
//!
//! Payloads larger than 520 bytes are automatically chunked so every push
//! stays within Bitcoin's per-element consensus limit. Concatenating the
//! chunk pushes in order reconstructs the payload exactly.
//!
//! The opcode sequence is modelled as a typed [`ops::CarrierOp`] list with a
//! single compile step, which keeps encoding, decoding, and size estimation
//! in lock-step.
//!
//! # Examples
//!
//! ```
//! use timevault_carrier_fmt::builder::build_carrier_script;
//! use timevault_carrier_fmt::parser::parse_carrier_script;
//!
//! let script = build_carrier_script(b"hello", "text/plain").unwrap();
//! let data = parse_carrier_script(&script).unwrap();
//! assert_eq!(data.payload(), b"hello");
//! assert_eq!(data.content_type(), "text/plain");
//! ```

use bitcoin::constants::MAX_SCRIPT_ELEMENT_SIZE;

/// Carrier script builder utilities.
pub mod builder;

/// Error types for carrier envelope operations.
pub mod errors;

/// Typed script operation sequence and its compile step.
pub mod ops;

/// Carrier script parser utilities.
pub mod parser;

/// The 3-byte protocol tag identifying a timevault carrier envelope.
pub const PROTOCOL_TAG: [u8; 3] = *b"tvl";

/// Length of the protocol tag in bytes.
pub const PROTOCOL_TAG_LEN: usize = 3;

/// Current carrier envelope format version.
pub const CARRIER_VERSION: u8 = 1;

/// Separator byte between the content type and the payload chunks.
pub const SEPARATOR_BYTE: u8 = 0;

/// Maximum size of a single payload chunk push, per consensus rules.
pub const MAX_CHUNK_SIZE: usize = MAX_SCRIPT_ELEMENT_SIZE;

/// Maximum accepted payload size in bytes.
///
/// This is a deliberate policy ceiling to keep carrier transactions
/// standard-relay-friendly, well below what consensus alone would permit.
pub const MAX_PAYLOAD_SIZE: usize = 10 * 1024;

//! BACnet tag/length/value encoding and decoding in pure Rust.
//!
//! `bacwire-core` turns typed application values into BACnet TLV bytes and
//! back, and frames them into the fixed APDU headers. Everything is a
//! synchronous transform over caller memory: encoders append to an
//! [`EncodeBuffer`](encoding::buffer::EncodeBuffer), decoders take
//! `(bytes, offset, bound)` and report how many bytes they consumed.
//!
//! Context-tagged values are typed through a
//! [`DecodeContext`](value::DecodeContext) naming the property being decoded
//! and, optionally, a vendor [`ContextTagResolver`](value::ContextTagResolver).
//!
//! # Feature flags
//!
//! - **`serde`** — derives `Serialize`/`Deserialize` on core types.

/// APDU headers for the eight PDU kinds.
pub mod apdu;
/// Byte sink, reader, tag system and primitive codecs.
pub mod encoding;
/// Error types for encoding and decoding operations.
pub mod error;
/// Core BACnet data types: identifiers, dates, bit strings and structured records.
pub mod types;
/// Application values and their context-aware codec.
pub mod value;

pub use error::{DecodeError, EncodeError};

/// Growable and fixed encode sinks with an overflow flag and skip window.
pub mod buffer;
/// Character-set aware character string payloads.
pub mod charstring;
/// Encode/decode functions for BACnet primitive and application data types.
pub mod primitives;
/// Bounded byte reader and the `Decoded` result shape.
pub mod reader;
/// BACnet tag system (application, context, opening/closing).
pub mod tag;

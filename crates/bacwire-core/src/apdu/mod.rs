/// Confirmed-service request/response headers and error types.
pub mod confirmed;
/// APDU type discriminant and the `Apdu` sum of all headers.
pub mod pdu;
/// Unconfirmed-service request header.
pub mod unconfirmed;

pub use confirmed::{
    AbortPdu, ComplexAckHeader, ConfirmedRequestHeader, ErrorPdu, RejectPdu, Segment, SegmentAck,
    SimpleAck,
};
pub use pdu::{Apdu, ApduType};
pub use unconfirmed::UnconfirmedRequestHeader;

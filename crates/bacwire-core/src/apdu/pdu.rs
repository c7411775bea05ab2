use crate::apdu::{
    AbortPdu, ComplexAckHeader, ConfirmedRequestHeader, ErrorPdu, RejectPdu, SegmentAck,
    SimpleAck, UnconfirmedRequestHeader,
};
use crate::encoding::{
    buffer::EncodeBuffer,
    reader::{decode_with, DecodeResult, Reader},
};
use crate::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ApduType {
    ConfirmedRequest = 0,
    UnconfirmedRequest = 1,
    SimpleAck = 2,
    ComplexAck = 3,
    SegmentAck = 4,
    Error = 5,
    Reject = 6,
    Abort = 7,
}

impl ApduType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::ConfirmedRequest),
            1 => Some(Self::UnconfirmedRequest),
            2 => Some(Self::SimpleAck),
            3 => Some(Self::ComplexAck),
            4 => Some(Self::SegmentAck),
            5 => Some(Self::Error),
            6 => Some(Self::Reject),
            7 => Some(Self::Abort),
            _ => None,
        }
    }

    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Any APDU header. Service parameters, when present, follow the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Apdu {
    ConfirmedRequest(ConfirmedRequestHeader),
    UnconfirmedRequest(UnconfirmedRequestHeader),
    SimpleAck(SimpleAck),
    ComplexAck(ComplexAckHeader),
    SegmentAck(SegmentAck),
    Error(ErrorPdu),
    Reject(RejectPdu),
    Abort(AbortPdu),
}

impl Apdu {
    pub const fn apdu_type(&self) -> ApduType {
        match self {
            Self::ConfirmedRequest(_) => ApduType::ConfirmedRequest,
            Self::UnconfirmedRequest(_) => ApduType::UnconfirmedRequest,
            Self::SimpleAck(_) => ApduType::SimpleAck,
            Self::ComplexAck(_) => ApduType::ComplexAck,
            Self::SegmentAck(_) => ApduType::SegmentAck,
            Self::Error(_) => ApduType::Error,
            Self::Reject(_) => ApduType::Reject,
            Self::Abort(_) => ApduType::Abort,
        }
    }

    pub const fn invoke_id(&self) -> Option<u8> {
        match self {
            Self::ConfirmedRequest(h) => Some(h.invoke_id),
            Self::UnconfirmedRequest(_) => None,
            Self::SimpleAck(h) => Some(h.invoke_id),
            Self::ComplexAck(h) => Some(h.invoke_id),
            Self::SegmentAck(h) => Some(h.invoke_id),
            Self::Error(h) => Some(h.invoke_id),
            Self::Reject(h) => Some(h.invoke_id),
            Self::Abort(h) => Some(h.invoke_id),
        }
    }

    pub fn encode(&self, w: &mut EncodeBuffer) {
        match self {
            Self::ConfirmedRequest(h) => h.encode(w),
            Self::UnconfirmedRequest(h) => h.encode(w),
            Self::SimpleAck(h) => h.encode(w),
            Self::ComplexAck(h) => h.encode(w),
            Self::SegmentAck(h) => h.encode(w),
            Self::Error(h) => h.encode(w),
            Self::Reject(h) => h.encode(w),
            Self::Abort(h) => h.encode(w),
        }
    }

    /// Decodes the header at `buf[offset..offset + bound]`. `consumed` stops
    /// at the end of the header; for Error PDUs it includes the class and
    /// code, which make up the whole body.
    pub fn decode(buf: &[u8], offset: usize, bound: usize) -> DecodeResult<Self> {
        decode_with(buf, offset, bound, Self::decode_from)
    }

    pub fn decode_from(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let kind = ApduType::from_u8(r.peek_u8()? >> 4).ok_or(DecodeError::InvalidValue)?;
        Ok(match kind {
            ApduType::ConfirmedRequest => {
                Self::ConfirmedRequest(ConfirmedRequestHeader::decode(r)?)
            }
            ApduType::UnconfirmedRequest => {
                Self::UnconfirmedRequest(UnconfirmedRequestHeader::decode(r)?)
            }
            ApduType::SimpleAck => Self::SimpleAck(SimpleAck::decode(r)?),
            ApduType::ComplexAck => Self::ComplexAck(ComplexAckHeader::decode(r)?),
            ApduType::SegmentAck => Self::SegmentAck(SegmentAck::decode(r)?),
            ApduType::Error => Self::Error(ErrorPdu::decode(r)?),
            ApduType::Reject => Self::Reject(RejectPdu::decode(r)?),
            ApduType::Abort => Self::Abort(AbortPdu::decode(r)?),
        })
    }
}

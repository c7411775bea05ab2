use crate::apdu::ApduType;
use crate::encoding::{
    buffer::EncodeBuffer,
    primitives::{decode_unsigned, encode_app_enumerated},
    reader::Reader,
    tag::{AppTag, Tag},
};
use crate::types::{AbortReason, ErrorValue, MaxApdu, MaxSegments, RejectReason};
use crate::DecodeError;

const SEGMENTED: u8 = 0b0000_1000;
const MORE_FOLLOWS: u8 = 0b0000_0100;
const SEGMENTED_RESPONSE_ACCEPTED: u8 = 0b0000_0010;
const NEGATIVE_ACK: u8 = 0b0000_0010;
const SERVER: u8 = 0b0000_0001;

fn expect_type(r: &mut Reader<'_>, expected: ApduType) -> Result<u8, DecodeError> {
    let b0 = r.read_u8()?;
    if (b0 >> 4) != expected as u8 {
        return Err(DecodeError::InvalidValue);
    }
    Ok(b0)
}

fn flag(b0: u8, mask: u8) -> bool {
    (b0 & mask) != 0
}

/// Sequence number and proposed window of a segmented message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub sequence_number: u8,
    pub proposed_window_size: u8,
}

fn decode_segment(r: &mut Reader<'_>, segmented: bool) -> Result<Option<Segment>, DecodeError> {
    if !segmented {
        return Ok(None);
    }
    Ok(Some(Segment {
        sequence_number: r.read_u8()?,
        proposed_window_size: r.read_u8()?,
    }))
}

fn encode_segment(w: &mut EncodeBuffer, segment: Option<Segment>) {
    if let Some(s) = segment {
        w.write_u8(s.sequence_number);
        w.write_u8(s.proposed_window_size);
    }
}

/// Header of a Confirmed-Request. The segmented flag is implied by
/// `segment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfirmedRequestHeader {
    pub more_follows: bool,
    pub segmented_response_accepted: bool,
    pub max_segments: MaxSegments,
    pub max_apdu: MaxApdu,
    pub invoke_id: u8,
    pub segment: Option<Segment>,
    pub service_choice: u8,
}

impl ConfirmedRequestHeader {
    /// Unsegmented request accepting no segmented reply.
    pub const fn new(invoke_id: u8, service_choice: u8, max_apdu: MaxApdu) -> Self {
        Self {
            more_follows: false,
            segmented_response_accepted: false,
            max_segments: MaxSegments::Unspecified,
            max_apdu,
            invoke_id,
            segment: None,
            service_choice,
        }
    }

    pub fn encode(&self, w: &mut EncodeBuffer) {
        let mut b0 = (ApduType::ConfirmedRequest as u8) << 4;
        if self.segment.is_some() {
            b0 |= SEGMENTED;
        }
        if self.more_follows {
            b0 |= MORE_FOLLOWS;
        }
        if self.segmented_response_accepted {
            b0 |= SEGMENTED_RESPONSE_ACCEPTED;
        }

        w.write_u8(b0);
        w.write_u8((self.max_segments.to_u8() << 4) | self.max_apdu.to_u8());
        w.write_u8(self.invoke_id);
        encode_segment(w, self.segment);
        w.write_u8(self.service_choice);
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = expect_type(r, ApduType::ConfirmedRequest)?;
        let seg_apdu = r.read_u8()?;
        let max_segments =
            MaxSegments::from_u8((seg_apdu >> 4) & 0x07).ok_or(DecodeError::InvalidValue)?;
        let max_apdu = MaxApdu::from_u8(seg_apdu & 0x0F).ok_or(DecodeError::InvalidValue)?;
        let invoke_id = r.read_u8()?;
        let segment = decode_segment(r, flag(b0, SEGMENTED))?;
        let service_choice = r.read_u8()?;
        Ok(Self {
            more_follows: flag(b0, MORE_FOLLOWS),
            segmented_response_accepted: flag(b0, SEGMENTED_RESPONSE_ACCEPTED),
            max_segments,
            max_apdu,
            invoke_id,
            segment,
            service_choice,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComplexAckHeader {
    pub more_follows: bool,
    pub invoke_id: u8,
    pub segment: Option<Segment>,
    pub service_choice: u8,
}

impl ComplexAckHeader {
    pub const fn new(invoke_id: u8, service_choice: u8) -> Self {
        Self {
            more_follows: false,
            invoke_id,
            segment: None,
            service_choice,
        }
    }

    pub fn encode(&self, w: &mut EncodeBuffer) {
        let mut b0 = (ApduType::ComplexAck as u8) << 4;
        if self.segment.is_some() {
            b0 |= SEGMENTED;
        }
        if self.more_follows {
            b0 |= MORE_FOLLOWS;
        }
        w.write_u8(b0);
        w.write_u8(self.invoke_id);
        encode_segment(w, self.segment);
        w.write_u8(self.service_choice);
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = expect_type(r, ApduType::ComplexAck)?;
        let invoke_id = r.read_u8()?;
        let segment = decode_segment(r, flag(b0, SEGMENTED))?;
        let service_choice = r.read_u8()?;

        Ok(Self {
            more_follows: flag(b0, MORE_FOLLOWS),
            invoke_id,
            segment,
            service_choice,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleAck {
    pub invoke_id: u8,
    pub service_choice: u8,
}

impl SimpleAck {
    pub fn encode(&self, w: &mut EncodeBuffer) {
        w.write_u8((ApduType::SimpleAck as u8) << 4);
        w.write_u8(self.invoke_id);
        w.write_u8(self.service_choice);
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        expect_type(r, ApduType::SimpleAck)?;
        Ok(Self {
            invoke_id: r.read_u8()?,
            service_choice: r.read_u8()?,
        })
    }
}

/// Error PDU. The class/code pair is optional on decode because some
/// devices omit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorPdu {
    pub invoke_id: u8,
    pub service_choice: u8,
    pub error: Option<ErrorValue>,
}

impl ErrorPdu {
    /// Writes the class and code as application enumerations.
    pub fn encode(&self, w: &mut EncodeBuffer) {
        w.write_u8((ApduType::Error as u8) << 4);
        w.write_u8(self.invoke_id);
        w.write_u8(self.service_choice);
        if let Some(err) = self.error {
            encode_app_enumerated(w, err.error_class);
            encode_app_enumerated(w, err.error_code);
        }
    }

    /// Accepts the class and code as application enumerations, as context
    /// tags `[0]`/`[1]`, or wrapped in an opening/closing `[0]` pair.
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        expect_type(r, ApduType::Error)?;
        let invoke_id = r.read_u8()?;
        let service_choice = r.read_u8()?;
        let error = if r.is_empty() {
            None
        } else {
            Some(match Tag::decode(r)? {
                Tag::Opening { tag_num: 0 } => {
                    let class_tag = Tag::decode(r)?;
                    let err = decode_class_and_code(r, class_tag)?;
                    match Tag::decode(r)? {
                        Tag::Closing { tag_num: 0 } => err,
                        _ => return Err(DecodeError::InvalidTag),
                    }
                }
                first => decode_class_and_code(r, first)?,
            })
        };
        Ok(Self {
            invoke_id,
            service_choice,
            error,
        })
    }
}

fn decode_class_and_code(r: &mut Reader<'_>, class_tag: Tag) -> Result<ErrorValue, DecodeError> {
    let error_class = decode_error_field(r, class_tag, 0)?;
    let code_tag = Tag::decode(r)?;
    let error_code = decode_error_field(r, code_tag, 1)?;
    Ok(ErrorValue {
        error_class,
        error_code,
    })
}

fn decode_error_field(
    r: &mut Reader<'_>,
    tag: Tag,
    expected_ctx_tag: u8,
) -> Result<u32, DecodeError> {
    match tag {
        Tag::Context { tag_num, len } if tag_num == expected_ctx_tag => {
            decode_unsigned(r, len as usize)
        }
        Tag::Application {
            tag: AppTag::Enumerated,
            len,
        } => decode_unsigned(r, len as usize),
        _ => Err(DecodeError::InvalidTag),
    }
}

/// Reject PDU. The reason stays raw since codes 64 and up are vendor
/// defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RejectPdu {
    pub invoke_id: u8,
    pub reason: u8,
}

impl RejectPdu {
    pub const fn new(invoke_id: u8, reason: RejectReason) -> Self {
        Self {
            invoke_id,
            reason: reason.to_u8(),
        }
    }

    pub const fn reason(&self) -> Option<RejectReason> {
        RejectReason::from_u8(self.reason)
    }

    pub fn encode(&self, w: &mut EncodeBuffer) {
        w.write_u8((ApduType::Reject as u8) << 4);
        w.write_u8(self.invoke_id);
        w.write_u8(self.reason);
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        expect_type(r, ApduType::Reject)?;
        Ok(Self {
            invoke_id: r.read_u8()?,
            reason: r.read_u8()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbortPdu {
    pub server: bool,
    pub invoke_id: u8,
    pub reason: u8,
}

impl AbortPdu {
    pub const fn new(server: bool, invoke_id: u8, reason: AbortReason) -> Self {
        Self {
            server,
            invoke_id,
            reason: reason.to_u8(),
        }
    }

    pub const fn reason(&self) -> Option<AbortReason> {
        AbortReason::from_u8(self.reason)
    }

    pub fn encode(&self, w: &mut EncodeBuffer) {
        let mut b0 = (ApduType::Abort as u8) << 4;
        if self.server {
            b0 |= SERVER;
        }
        w.write_u8(b0);
        w.write_u8(self.invoke_id);
        w.write_u8(self.reason);
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = expect_type(r, ApduType::Abort)?;
        Ok(Self {
            server: flag(b0, SERVER),
            invoke_id: r.read_u8()?,
            reason: r.read_u8()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentAck {
    pub negative_ack: bool,
    pub sent_by_server: bool,
    pub invoke_id: u8,
    pub sequence_number: u8,
    pub actual_window_size: u8,
}

impl SegmentAck {
    pub fn encode(&self, w: &mut EncodeBuffer) {
        let mut b0 = (ApduType::SegmentAck as u8) << 4;
        if self.negative_ack {
            b0 |= NEGATIVE_ACK;
        }
        if self.sent_by_server {
            b0 |= SERVER;
        }
        w.write_u8(b0);
        w.write_u8(self.invoke_id);
        w.write_u8(self.sequence_number);
        w.write_u8(self.actual_window_size);
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = expect_type(r, ApduType::SegmentAck)?;
        Ok(Self {
            negative_ack: flag(b0, NEGATIVE_ACK),
            sent_by_server: flag(b0, SERVER),
            invoke_id: r.read_u8()?,
            sequence_number: r.read_u8()?,
            actual_window_size: r.read_u8()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AbortPdu, ComplexAckHeader, ConfirmedRequestHeader, ErrorPdu, RejectPdu, Segment,
        SegmentAck,
    };
    use crate::encoding::{buffer::EncodeBuffer, reader::Reader};
    use crate::types::{
        AbortReason, ErrorClass, ErrorCode, ErrorValue, MaxApdu, MaxSegments, RejectReason,
    };
    use crate::DecodeError;

    fn property_unknown() -> Option<ErrorValue> {
        Some(ErrorValue::new(ErrorClass::Property, ErrorCode::UnknownProperty))
    }

    #[test]
    fn confirmed_request_plain() {
        let header = ConfirmedRequestHeader::new(1, 12, MaxApdu::UpTo50);
        let mut w = EncodeBuffer::new();
        header.encode(&mut w);
        assert_eq!(w.as_written(), &[0x00, 0x00, 0x01, 0x0C]);
        let mut r = Reader::new(w.as_written());
        assert_eq!(ConfirmedRequestHeader::decode(&mut r).unwrap(), header);
    }

    #[test]
    fn confirmed_request_segmented() {
        let header = ConfirmedRequestHeader {
            more_follows: true,
            segmented_response_accepted: true,
            max_segments: MaxSegments::Sixteen,
            max_apdu: MaxApdu::UpTo1476,
            invoke_id: 42,
            segment: Some(Segment {
                sequence_number: 3,
                proposed_window_size: 4,
            }),
            service_choice: 15,
        };
        let mut w = EncodeBuffer::new();
        header.encode(&mut w);
        assert_eq!(w.as_written(), &[0x0E, 0x45, 42, 3, 4, 15]);
        let mut r = Reader::new(w.as_written());
        assert_eq!(ConfirmedRequestHeader::decode(&mut r).unwrap(), header);
    }

    #[test]
    fn confirmed_request_rejects_reserved_max_apdu() {
        let mut r = Reader::new(&[0x00, 0x09, 0x01, 0x0C]);
        assert_eq!(
            ConfirmedRequestHeader::decode(&mut r).unwrap_err(),
            DecodeError::InvalidValue
        );
    }

    #[test]
    fn complex_ack_segmented() {
        let header = ComplexAckHeader {
            more_follows: false,
            invoke_id: 7,
            segment: Some(Segment {
                sequence_number: 0,
                proposed_window_size: 2,
            }),
            service_choice: 14,
        };
        let mut w = EncodeBuffer::new();
        header.encode(&mut w);
        assert_eq!(w.as_written(), &[0x38, 7, 0, 2, 14]);
        let mut r = Reader::new(w.as_written());
        assert_eq!(ComplexAckHeader::decode(&mut r).unwrap(), header);
    }

    #[test]
    fn wrong_type_nibble() {
        let mut r = Reader::new(&[0x20, 1, 15]);
        assert_eq!(
            ComplexAckHeader::decode(&mut r).unwrap_err(),
            DecodeError::InvalidValue
        );
    }

    #[test]
    fn error_pdu_without_details() {
        let mut r = Reader::new(&[0x50, 1, 15]);
        let e = ErrorPdu::decode(&mut r).unwrap();
        assert_eq!(e.invoke_id, 1);
        assert_eq!(e.service_choice, 15);
        assert_eq!(e.error, None);
    }

    #[test]
    fn error_pdu_context_details() {
        let mut r = Reader::new(&[0x50, 1, 15, 0x09, 0x02, 0x19, 0x20]);
        let e = ErrorPdu::decode(&mut r).unwrap();
        assert_eq!(e.error, property_unknown());
    }

    #[test]
    fn error_pdu_application_details() {
        let e = ErrorPdu {
            invoke_id: 1,
            service_choice: 15,
            error: property_unknown(),
        };
        let mut w = EncodeBuffer::new();
        e.encode(&mut w);
        assert_eq!(w.as_written(), &[0x50, 1, 15, 0x91, 0x02, 0x91, 0x20]);
        let mut r = Reader::new(w.as_written());
        assert_eq!(ErrorPdu::decode(&mut r).unwrap(), e);
    }

    #[test]
    fn error_pdu_wrapped_details() {
        let mut r = Reader::new(&[0x50, 1, 15, 0x0E, 0x91, 0x02, 0x91, 0x20, 0x0F]);
        let e = ErrorPdu::decode(&mut r).unwrap();
        assert_eq!(e.error, property_unknown());
        assert!(r.is_empty());
    }

    #[test]
    fn error_pdu_unclosed_wrapper() {
        let mut r = Reader::new(&[0x50, 1, 15, 0x0E, 0x91, 0x02, 0x91, 0x20, 0x1F]);
        assert_eq!(ErrorPdu::decode(&mut r).unwrap_err(), DecodeError::InvalidTag);
    }

    #[test]
    fn reject_and_abort() {
        let reject = RejectPdu::new(9, RejectReason::UnrecognizedService);
        let abort = AbortPdu::new(true, 9, AbortReason::SegmentationNotSupported);
        let mut w = EncodeBuffer::new();
        reject.encode(&mut w);
        abort.encode(&mut w);
        assert_eq!(w.as_written(), &[0x60, 9, 9, 0x71, 9, 4]);

        let mut r = Reader::new(w.as_written());
        let reject = RejectPdu::decode(&mut r).unwrap();
        let abort = AbortPdu::decode(&mut r).unwrap();
        assert_eq!(reject.reason(), Some(RejectReason::UnrecognizedService));
        assert!(abort.server);
        assert_eq!(abort.reason(), Some(AbortReason::SegmentationNotSupported));

        let vendor = RejectPdu {
            invoke_id: 1,
            reason: 200,
        };
        assert_eq!(vendor.reason(), None);
    }

    #[test]
    fn segment_ack_flags() {
        let ack = SegmentAck {
            negative_ack: true,
            sent_by_server: false,
            invoke_id: 3,
            sequence_number: 10,
            actual_window_size: 4,
        };
        let mut w = EncodeBuffer::new();
        ack.encode(&mut w);
        assert_eq!(w.as_written(), &[0x42, 3, 10, 4]);
        let mut r = Reader::new(w.as_written());
        assert_eq!(SegmentAck::decode(&mut r).unwrap(), ack);
    }
}

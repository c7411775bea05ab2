use crate::apdu::ApduType;
use crate::encoding::{buffer::EncodeBuffer, reader::Reader};
use crate::DecodeError;

/// Unconfirmed-Request header: the type octet and the service choice.
/// Any service parameters follow it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnconfirmedRequestHeader {
    pub service_choice: u8,
}

impl UnconfirmedRequestHeader {
    pub const I_AM: u8 = 0;
    pub const I_HAVE: u8 = 1;
    pub const COV_NOTIFICATION: u8 = 2;
    pub const EVENT_NOTIFICATION: u8 = 3;
    pub const TIME_SYNCHRONIZATION: u8 = 6;
    pub const WHO_HAS: u8 = 7;
    pub const WHO_IS: u8 = 8;
    pub const UTC_TIME_SYNCHRONIZATION: u8 = 9;

    pub const fn new(service_choice: u8) -> Self {
        Self { service_choice }
    }

    pub fn encode(&self, w: &mut EncodeBuffer) {
        w.write_u8(ApduType::UnconfirmedRequest.to_u8() << 4);
        w.write_u8(self.service_choice);
    }

    /// The low nibble of the type octet is reserved and ignored.
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if r.read_u8()? >> 4 != ApduType::UnconfirmedRequest.to_u8() {
            return Err(DecodeError::InvalidValue);
        }
        Ok(Self::new(r.read_u8()?))
    }
}

use crate::encoding::tag::AppTag;
use crate::types::{
    BitString, CovSubscription, Date, DateTime, Destination, DeviceObjectPropertyReference,
    ErrorValue, ObjectId, ReadAccessResult, ReadAccessSpecification, Time, TimeStamp,
};

/// Kind of an [`ApplicationValue`].
///
/// The thirteen primitive kinds carry their wire tag number; the rest only
/// exist as sequences of primitives and have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApplicationTag {
    Null,
    Boolean,
    UnsignedInt,
    SignedInt,
    Real,
    Double,
    OctetString,
    CharacterString,
    BitString,
    Enumerated,
    Date,
    Time,
    ObjectId,
    DateTime,
    TimeStamp,
    Error,
    DeviceObjectPropertyReference,
    Destination,
    CovSubscription,
    ReadAccessSpecification,
    ReadAccessResult,
    ContextSpecificDecoded,
    ContextSpecificEncoded,
}

impl ApplicationTag {
    pub fn from_wire(value: u8) -> Option<Self> {
        AppTag::from_u8(value).ok().map(Self::from)
    }

    pub const fn wire_number(self) -> Option<u8> {
        match self.app_tag() {
            Some(tag) => Some(tag.to_u8()),
            None => None,
        }
    }

    /// The primitive tag for this kind, if it has one.
    pub const fn app_tag(self) -> Option<AppTag> {
        Some(match self {
            Self::Null => AppTag::Null,
            Self::Boolean => AppTag::Boolean,
            Self::UnsignedInt => AppTag::UnsignedInt,
            Self::SignedInt => AppTag::SignedInt,
            Self::Real => AppTag::Real,
            Self::Double => AppTag::Double,
            Self::OctetString => AppTag::OctetString,
            Self::CharacterString => AppTag::CharacterString,
            Self::BitString => AppTag::BitString,
            Self::Enumerated => AppTag::Enumerated,
            Self::Date => AppTag::Date,
            Self::Time => AppTag::Time,
            Self::ObjectId => AppTag::ObjectId,
            Self::DateTime
            | Self::TimeStamp
            | Self::Error
            | Self::DeviceObjectPropertyReference
            | Self::Destination
            | Self::CovSubscription
            | Self::ReadAccessSpecification
            | Self::ReadAccessResult
            | Self::ContextSpecificDecoded
            | Self::ContextSpecificEncoded => return None,
        })
    }
}

impl From<AppTag> for ApplicationTag {
    fn from(tag: AppTag) -> Self {
        match tag {
            AppTag::Null => Self::Null,
            AppTag::Boolean => Self::Boolean,
            AppTag::UnsignedInt => Self::UnsignedInt,
            AppTag::SignedInt => Self::SignedInt,
            AppTag::Real => Self::Real,
            AppTag::Double => Self::Double,
            AppTag::OctetString => Self::OctetString,
            AppTag::CharacterString => Self::CharacterString,
            AppTag::BitString => Self::BitString,
            AppTag::Enumerated => Self::Enumerated,
            AppTag::Date => Self::Date,
            AppTag::Time => Self::Time,
            AppTag::ObjectId => Self::ObjectId,
        }
    }
}

/// A decoded or to-be-encoded BACnet value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApplicationValue {
    Null,
    Boolean(bool),
    Unsigned(u32),
    Signed(i64),
    Real(f32),
    Double(f64),
    OctetString(Vec<u8>),
    /// Text after character-set conversion. The source character set is
    /// not kept: `encode_application_data` always writes UTF-8. Use
    /// [`encode_app_character_string`](crate::encoding::charstring::encode_app_character_string)
    /// to write another set.
    CharacterString(String),
    BitString(BitString),
    Enumerated(u32),
    Date(Date),
    Time(Time),
    ObjectId(ObjectId),
    DateTime(DateTime),
    TimeStamp(TimeStamp),
    Error(ErrorValue),
    DeviceObjectPropertyReference(DeviceObjectPropertyReference),
    Destination(Destination),
    CovSubscription(CovSubscription),
    ReadAccessSpecification(ReadAccessSpecification),
    ReadAccessResult(ReadAccessResult),
    /// Values found between an opening and closing context tag.
    ContextDecoded {
        tag_num: u8,
        values: Vec<ApplicationValue>,
    },
    /// Payload of a context tag whose type could not be resolved.
    ContextEncoded { tag_num: u8, bytes: Vec<u8> },
}

impl ApplicationValue {
    pub const fn tag(&self) -> ApplicationTag {
        match self {
            Self::Null => ApplicationTag::Null,
            Self::Boolean(_) => ApplicationTag::Boolean,
            Self::Unsigned(_) => ApplicationTag::UnsignedInt,
            Self::Signed(_) => ApplicationTag::SignedInt,
            Self::Real(_) => ApplicationTag::Real,
            Self::Double(_) => ApplicationTag::Double,
            Self::OctetString(_) => ApplicationTag::OctetString,
            Self::CharacterString(_) => ApplicationTag::CharacterString,
            Self::BitString(_) => ApplicationTag::BitString,
            Self::Enumerated(_) => ApplicationTag::Enumerated,
            Self::Date(_) => ApplicationTag::Date,
            Self::Time(_) => ApplicationTag::Time,
            Self::ObjectId(_) => ApplicationTag::ObjectId,
            Self::DateTime(_) => ApplicationTag::DateTime,
            Self::TimeStamp(_) => ApplicationTag::TimeStamp,
            Self::Error(_) => ApplicationTag::Error,
            Self::DeviceObjectPropertyReference(_) => {
                ApplicationTag::DeviceObjectPropertyReference
            }
            Self::Destination(_) => ApplicationTag::Destination,
            Self::CovSubscription(_) => ApplicationTag::CovSubscription,
            Self::ReadAccessSpecification(_) => ApplicationTag::ReadAccessSpecification,
            Self::ReadAccessResult(_) => ApplicationTag::ReadAccessResult,
            Self::ContextDecoded { .. } => ApplicationTag::ContextSpecificDecoded,
            Self::ContextEncoded { .. } => ApplicationTag::ContextSpecificEncoded,
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_unsigned(&self) -> Option<u32> {
        match self {
            Self::Unsigned(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_signed(&self) -> Option<i64> {
        match self {
            Self::Signed(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_real(&self) -> Option<f32> {
        match self {
            Self::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_enumerated(&self) -> Option<u32> {
        match self {
            Self::Enumerated(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::CharacterString(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_octets(&self) -> Option<&[u8]> {
        match self {
            Self::OctetString(v) => Some(v),
            _ => None,
        }
    }

    pub const fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            Self::ObjectId(v) => Some(*v),
            _ => None,
        }
    }

    /// Children of an opening/closing context pair.
    pub fn as_list(&self) -> Option<&[ApplicationValue]> {
        match self {
            Self::ContextDecoded { values, .. } => Some(values),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApplicationTag, ApplicationValue};
    use crate::encoding::tag::AppTag;

    #[test]
    fn wire_numbers_only_for_primitives() {
        for n in 0..=12u8 {
            let tag = ApplicationTag::from_wire(n).unwrap();
            assert_eq!(tag.wire_number(), Some(n));
        }
        assert_eq!(ApplicationTag::from_wire(13), None);
        assert_eq!(ApplicationTag::DateTime.wire_number(), None);
        assert_eq!(ApplicationTag::ContextSpecificEncoded.app_tag(), None);
        assert_eq!(ApplicationTag::from(AppTag::Real), ApplicationTag::Real);
    }

    #[test]
    fn accessors_match_only_their_variant() {
        let v = ApplicationValue::Real(1.5);
        assert_eq!(v.tag(), ApplicationTag::Real);
        assert_eq!(v.as_real(), Some(1.5));
        assert_eq!(v.as_unsigned(), None);
        assert_eq!(ApplicationValue::Enumerated(3).as_unsigned(), None);
        assert_eq!(ApplicationValue::Unsigned(3).as_enumerated(), None);
        assert!(ApplicationValue::Null.is_null());

        let list = ApplicationValue::ContextDecoded {
            tag_num: 3,
            values: vec![ApplicationValue::Boolean(true)],
        };
        assert_eq!(list.tag(), ApplicationTag::ContextSpecificDecoded);
        assert_eq!(list.as_list().map(<[_]>::len), Some(1));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn values_serialize_to_json() {
        let value = ApplicationValue::ContextDecoded {
            tag_num: 3,
            values: vec![
                ApplicationValue::Unsigned(7),
                ApplicationValue::CharacterString("Lobby".into()),
            ],
        };
        let json = serde_json::to_string(&value).unwrap();
        let back: ApplicationValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}

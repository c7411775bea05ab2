/// BACnet property identifiers.
///
/// Properties the codec needs to recognise are named variants; vendor-specific
/// or unrecognised identifiers use [`Proprietary`](Self::Proprietary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyId {
    Action,
    DateList,
    Description,
    EffectivePeriod,
    ExceptionSchedule,
    ListOfGroupMembers,
    ListOfObjectPropertyReferences,
    MaxApduLengthAccepted,
    ObjectIdentifier,
    ObjectList,
    ObjectName,
    ObjectPropertyReference,
    ObjectType,
    PresentValue,
    PriorityArray,
    ProtocolVersion,
    RecipientList,
    SegmentationSupported,
    StatusFlags,
    Units,
    VendorIdentifier,
    VendorName,
    WeeklySchedule,
    EventTimeStamps,
    LogBuffer,
    LogDeviceObjectProperty,
    ActiveCovSubscriptions,
    LastRestoreTime,
    TimeOfDeviceRestart,
    SubordinateList,
    ActualShedLevel,
    ExpectedShedLevel,
    RequestedShedLevel,
    Proprietary(u32),
}

impl PropertyId {
    pub const fn to_u32(self) -> u32 {
        match self {
            Self::Action => 2,
            Self::DateList => 23,
            Self::Description => 28,
            Self::EffectivePeriod => 32,
            Self::ExceptionSchedule => 38,
            Self::ListOfGroupMembers => 53,
            Self::ListOfObjectPropertyReferences => 54,
            Self::MaxApduLengthAccepted => 62,
            Self::ObjectIdentifier => 75,
            Self::ObjectList => 76,
            Self::ObjectName => 77,
            Self::ObjectPropertyReference => 78,
            Self::ObjectType => 79,
            Self::PresentValue => 85,
            Self::PriorityArray => 87,
            Self::ProtocolVersion => 98,
            Self::RecipientList => 102,
            Self::SegmentationSupported => 107,
            Self::StatusFlags => 111,
            Self::Units => 117,
            Self::VendorIdentifier => 120,
            Self::VendorName => 121,
            Self::WeeklySchedule => 123,
            Self::EventTimeStamps => 130,
            Self::LogBuffer => 131,
            Self::LogDeviceObjectProperty => 132,
            Self::ActiveCovSubscriptions => 152,
            Self::LastRestoreTime => 157,
            Self::TimeOfDeviceRestart => 203,
            Self::SubordinateList => 211,
            Self::ActualShedLevel => 212,
            Self::ExpectedShedLevel => 214,
            Self::RequestedShedLevel => 218,
            Self::Proprietary(v) => v,
        }
    }

    pub const fn from_u32(value: u32) -> Self {
        match value {
            2 => Self::Action,
            23 => Self::DateList,
            28 => Self::Description,
            32 => Self::EffectivePeriod,
            38 => Self::ExceptionSchedule,
            53 => Self::ListOfGroupMembers,
            54 => Self::ListOfObjectPropertyReferences,
            62 => Self::MaxApduLengthAccepted,
            75 => Self::ObjectIdentifier,
            76 => Self::ObjectList,
            77 => Self::ObjectName,
            78 => Self::ObjectPropertyReference,
            79 => Self::ObjectType,
            85 => Self::PresentValue,
            87 => Self::PriorityArray,
            98 => Self::ProtocolVersion,
            102 => Self::RecipientList,
            107 => Self::SegmentationSupported,
            111 => Self::StatusFlags,
            117 => Self::Units,
            120 => Self::VendorIdentifier,
            121 => Self::VendorName,
            123 => Self::WeeklySchedule,
            130 => Self::EventTimeStamps,
            131 => Self::LogBuffer,
            132 => Self::LogDeviceObjectProperty,
            152 => Self::ActiveCovSubscriptions,
            157 => Self::LastRestoreTime,
            203 => Self::TimeOfDeviceRestart,
            211 => Self::SubordinateList,
            212 => Self::ActualShedLevel,
            214 => Self::ExpectedShedLevel,
            218 => Self::RequestedShedLevel,
            v => Self::Proprietary(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PropertyId;

    #[test]
    fn known_ids_roundtrip() {
        for raw in 0..=512u32 {
            assert_eq!(PropertyId::from_u32(raw).to_u32(), raw);
        }
        assert_eq!(PropertyId::from_u32(85), PropertyId::PresentValue);
        assert_eq!(PropertyId::from_u32(512), PropertyId::Proprietary(512));
    }
}

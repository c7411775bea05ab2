macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident: $repr:ident as $code:ty, $to:ident, $from:ident {
            $($variant:ident = $value:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr($repr)]
        pub enum $name {
            $($variant = $value,)*
        }

        impl $name {
            pub const fn $to(self) -> $code {
                self as $code
            }

            pub const fn $from(value: $code) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

coded_enum! {
    /// Segmentation capability advertised in I-Am.
    Segmentation: u8 as u32, to_u32, from_u32 {
        SegmentedBoth = 0,
        SegmentedTransmit = 1,
        SegmentedReceive = 2,
        NoSegmentation = 3,
    }
}

coded_enum! {
    /// 4-bit max-APDU-accepted code of a confirmed request.
    MaxApdu: u8 as u8, to_u8, from_u8 {
        UpTo50 = 0,
        UpTo128 = 1,
        UpTo206 = 2,
        UpTo480 = 3,
        UpTo1024 = 4,
        UpTo1476 = 5,
    }
}

coded_enum! {
    /// 3-bit max-segments-accepted code of a confirmed request.
    MaxSegments: u8 as u8, to_u8, from_u8 {
        Unspecified = 0,
        Two = 1,
        Four = 2,
        Eight = 3,
        Sixteen = 4,
        ThirtyTwo = 5,
        SixtyFour = 6,
        MoreThanSixtyFour = 7,
    }
}

coded_enum! {
    ErrorClass: u8 as u32, to_u32, from_u32 {
        Device = 0,
        Object = 1,
        Property = 2,
        Resources = 3,
        Security = 4,
        Services = 5,
        Vt = 6,
        Communication = 7,
    }
}

coded_enum! {
    /// The error codes this codec names; others stay numeric in
    /// [`ErrorValue`](crate::types::ErrorValue).
    ErrorCode: u16 as u32, to_u32, from_u32 {
        Other = 0,
        ConfigurationInProgress = 2,
        DeviceBusy = 3,
        InconsistentParameters = 7,
        InvalidDataType = 9,
        MissingRequiredParameter = 16,
        ReadAccessDenied = 27,
        ServiceRequestDenied = 29,
        Timeout = 30,
        UnknownObject = 31,
        UnknownProperty = 32,
        UnsupportedObjectType = 36,
        ValueOutOfRange = 37,
        WriteAccessDenied = 40,
        CharacterSetNotSupported = 41,
        InvalidArrayIndex = 42,
        CovSubscriptionFailed = 43,
        NotCovProperty = 44,
        OptionalFunctionalityNotSupported = 45,
        DatatypeNotSupported = 47,
        PropertyIsNotAnArray = 50,
    }
}

coded_enum! {
    RejectReason: u8 as u8, to_u8, from_u8 {
        Other = 0,
        BufferOverflow = 1,
        InconsistentParameters = 2,
        InvalidParameterDataType = 3,
        InvalidTag = 4,
        MissingRequiredParameter = 5,
        ParameterOutOfRange = 6,
        TooManyArguments = 7,
        UndefinedEnumeration = 8,
        UnrecognizedService = 9,
    }
}

coded_enum! {
    AbortReason: u8 as u8, to_u8, from_u8 {
        Other = 0,
        BufferOverflow = 1,
        InvalidApduInThisState = 2,
        PreemptedByHigherPriorityTask = 3,
        SegmentationNotSupported = 4,
        SecurityError = 5,
        InsufficientSecurity = 6,
        WindowSizeOutOfRange = 7,
        ApplicationExceededReplyTime = 8,
        OutOfResources = 9,
        TsmTimeout = 10,
        ApduTooLong = 11,
    }
}

impl MaxApdu {
    pub const fn octets(self) -> u16 {
        match self {
            Self::UpTo50 => 50,
            Self::UpTo128 => 128,
            Self::UpTo206 => 206,
            Self::UpTo480 => 480,
            Self::UpTo1024 => 1024,
            Self::UpTo1476 => 1476,
        }
    }

    /// Smallest code covering `len` octets; lengths past 1476 saturate.
    pub const fn for_octets(len: u16) -> Self {
        if len <= 50 {
            Self::UpTo50
        } else if len <= 128 {
            Self::UpTo128
        } else if len <= 206 {
            Self::UpTo206
        } else if len <= 480 {
            Self::UpTo480
        } else if len <= 1024 {
            Self::UpTo1024
        } else {
            Self::UpTo1476
        }
    }
}

impl MaxSegments {
    /// Code for a segment count: below 2 is unspecified, otherwise the
    /// largest power of two not above `count`.
    pub const fn for_count(count: u32) -> Self {
        if count < 2 {
            Self::Unspecified
        } else if count < 4 {
            Self::Two
        } else if count < 8 {
            Self::Four
        } else if count < 16 {
            Self::Eight
        } else if count < 32 {
            Self::Sixteen
        } else if count < 64 {
            Self::ThirtyTwo
        } else if count == 64 {
            Self::SixtyFour
        } else {
            Self::MoreThanSixtyFour
        }
    }

    /// Segment count for the code; `None` when unspecified or unbounded.
    pub const fn count(self) -> Option<u8> {
        match self {
            Self::Unspecified | Self::MoreThanSixtyFour => None,
            Self::Two => Some(2),
            Self::Four => Some(4),
            Self::Eight => Some(8),
            Self::Sixteen => Some(16),
            Self::ThirtyTwo => Some(32),
            Self::SixtyFour => Some(64),
        }
    }
}

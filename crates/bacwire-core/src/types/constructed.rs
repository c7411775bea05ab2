//! Records carried by the structural application values.

use crate::types::{
    BacnetAddress, BitString, DateTime, ErrorClass, ErrorCode, ObjectId, PropertyId, Time,
};
use crate::value::ApplicationValue;

/// `BACnetTimeStamp` CHOICE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeStamp {
    Time(Time),
    SequenceNumber(u32),
    DateTime(DateTime),
}

/// Error class and code as raw enumerations, so vendor codes survive a
/// round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorValue {
    pub error_class: u32,
    pub error_code: u32,
}

impl ErrorValue {
    pub const fn new(class: ErrorClass, code: ErrorCode) -> Self {
        Self {
            error_class: class.to_u32(),
            error_code: code.to_u32(),
        }
    }

    pub const fn class(&self) -> Option<ErrorClass> {
        ErrorClass::from_u32(self.error_class)
    }

    pub const fn code(&self) -> Option<ErrorCode> {
        ErrorCode::from_u32(self.error_code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceObjectPropertyReference {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub device_id: Option<ObjectId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectPropertyReference {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
}

/// `BACnetRecipient`: a device or a network address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Recipient {
    Device(ObjectId),
    Address(BacnetAddress),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecipientProcess {
    pub recipient: Recipient,
    pub process_id: u32,
}

/// One entry of a notification class recipient list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Destination {
    pub valid_days: BitString,
    pub from_time: Time,
    pub to_time: Time,
    pub recipient: Recipient,
    pub process_id: u32,
    pub issue_confirmed_notifications: bool,
    pub transitions: BitString,
}

/// One entry of a device's active COV subscriptions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CovSubscription {
    pub recipient: RecipientProcess,
    pub monitored_property: ObjectPropertyReference,
    pub issue_confirmed_notifications: bool,
    pub time_remaining: u32,
    pub cov_increment: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyReference {
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadAccessSpecification {
    pub object_id: ObjectId,
    pub properties: Vec<PropertyReference>,
}

/// Either the values read or the error the device returned for them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyResult {
    Values(Vec<ApplicationValue>),
    Error(ErrorValue),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadResultElement {
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub result: PropertyResult,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadAccessResult {
    pub object_id: ObjectId,
    pub results: Vec<ReadResultElement>,
}

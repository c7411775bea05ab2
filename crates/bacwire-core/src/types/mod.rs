pub mod address;
pub mod bit_string;
pub mod constructed;
pub mod date_time;
pub mod enums;
pub mod object_id;
pub mod object_type;
pub mod property_id;

pub use address::{BacnetAddress, MAX_MAC_LEN};
pub use bit_string::BitString;
pub use constructed::{
    CovSubscription, Destination, DeviceObjectPropertyReference, ErrorValue,
    ObjectPropertyReference, PropertyReference, PropertyResult, ReadAccessResult,
    ReadAccessSpecification, ReadResultElement, Recipient, RecipientProcess, TimeStamp,
};
pub use date_time::{Date, DateTime, Time};
pub use enums::{
    AbortReason, ErrorClass, ErrorCode, MaxApdu, MaxSegments, RejectReason, Segmentation,
};
pub use object_id::ObjectId;
pub use object_type::ObjectType;
pub use property_id::PropertyId;

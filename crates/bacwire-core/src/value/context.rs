//! Type information for context-tagged values.
//!
//! A context tag only carries a number; what the payload means depends on the
//! property being decoded. [`DecodeContext`] carries that property, plus an
//! optional [`ContextTagResolver`] for vendor extensions the built-in table
//! does not know about.

use std::collections::HashMap;
use std::fmt;

use crate::encoding::tag::AppTag;
use crate::types::{BacnetAddress, ObjectType, PropertyId};
use crate::value::ApplicationTag;
use crate::DecodeError;

/// Deepest opening-tag nesting a decode will follow.
pub const MAX_NESTING_DEPTH: u8 = 32;

/// Looks up the primitive type of a context tag the built-in table leaves
/// unresolved.
pub trait ContextTagResolver: Send + Sync {
    fn resolve(&self, peer: Option<&BacnetAddress>, property: PropertyId, tag_num: u8)
        -> Option<AppTag>;
}

impl<F> ContextTagResolver for F
where
    F: Fn(Option<&BacnetAddress>, PropertyId, u8) -> Option<AppTag> + Send + Sync,
{
    fn resolve(
        &self,
        peer: Option<&BacnetAddress>,
        property: PropertyId,
        tag_num: u8,
    ) -> Option<AppTag> {
        self(peer, property, tag_num)
    }
}

/// What the decoder knows about the value it is looking at.
#[derive(Clone, Copy)]
pub struct DecodeContext<'r> {
    pub object_type: ObjectType,
    pub property: PropertyId,
    pub peer: Option<BacnetAddress>,
    resolver: Option<&'r dyn ContextTagResolver>,
    depth: u8,
}

impl<'r> DecodeContext<'r> {
    pub const fn new(object_type: ObjectType, property: PropertyId) -> Self {
        Self {
            object_type,
            property,
            peer: None,
            resolver: None,
            depth: 0,
        }
    }

    pub const fn with_peer(mut self, peer: BacnetAddress) -> Self {
        self.peer = Some(peer);
        self
    }

    pub fn with_resolver(mut self, resolver: &'r dyn ContextTagResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Same peer, resolver and nesting depth, different property.
    pub const fn for_property(&self, object_type: ObjectType, property: PropertyId) -> Self {
        Self {
            object_type,
            property,
            peer: self.peer,
            resolver: self.resolver,
            depth: self.depth,
        }
    }

    /// Number of opening tags enclosing the value being decoded.
    pub const fn depth(&self) -> u8 {
        self.depth
    }

    /// Context for the contents of one more opening tag.
    pub fn nested(&self) -> Result<Self, DecodeError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(DecodeError::InvalidValue);
        }
        Ok(Self {
            depth: self.depth + 1,
            ..*self
        })
    }

    pub fn has_resolver(&self) -> bool {
        self.resolver.is_some()
    }

    /// Built-in table first, then the resolver.
    pub fn resolve(&self, tag_num: u8) -> Option<AppTag> {
        context_tag_type(self.property, tag_num).or_else(|| {
            self.resolver
                .and_then(|r| r.resolve(self.peer.as_ref(), self.property, tag_num))
        })
    }
}

impl fmt::Debug for DecodeContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeContext")
            .field("object_type", &self.object_type)
            .field("property", &self.property)
            .field("peer", &self.peer)
            .field("resolver", &self.resolver.is_some())
            .field("depth", &self.depth)
            .finish()
    }
}

/// Primitive type of context tag `tag_num` within a value of `property`.
pub fn context_tag_type(property: PropertyId, tag_num: u8) -> Option<AppTag> {
    use AppTag::*;
    use PropertyId as P;

    match (property, tag_num) {
        (P::ActualShedLevel | P::ExpectedShedLevel | P::RequestedShedLevel, 0 | 1) => {
            Some(UnsignedInt)
        }
        (P::ActualShedLevel | P::ExpectedShedLevel | P::RequestedShedLevel, 2) => Some(Real),
        (P::Action, 0 | 1) => Some(ObjectId),
        (P::Action, 2) => Some(Enumerated),
        (P::Action, 3 | 5 | 6) => Some(UnsignedInt),
        (P::Action, 7 | 8) => Some(Boolean),
        (P::ListOfGroupMembers, 0) => Some(ObjectId),
        (P::ExceptionSchedule, 1) => Some(ObjectId),
        (P::ExceptionSchedule, 3) => Some(UnsignedInt),
        (P::LogDeviceObjectProperty, 0 | 3) => Some(ObjectId),
        (P::LogDeviceObjectProperty, 1) => Some(Enumerated),
        (P::LogDeviceObjectProperty, 2) => Some(UnsignedInt),
        (P::SubordinateList, 0 | 1) => Some(ObjectId),
        (P::RecipientList, 0) => Some(ObjectId),
        (P::ActiveCovSubscriptions, 2) => Some(Boolean),
        (P::ActiveCovSubscriptions, 3) => Some(UnsignedInt),
        (P::ActiveCovSubscriptions, 4) => Some(Real),
        (P::EventTimeStamps | P::LastRestoreTime | P::TimeOfDeviceRestart, 0) => Some(Time),
        (P::EventTimeStamps | P::LastRestoreTime | P::TimeOfDeviceRestart, 1) => {
            Some(UnsignedInt)
        }
        _ => None,
    }
}

/// Structure every element of `property` is known to have.
pub fn structured_kind(object_type: ObjectType, property: PropertyId) -> Option<ApplicationTag> {
    use PropertyId as P;

    match property {
        P::ListOfGroupMembers => Some(ApplicationTag::ReadAccessSpecification),
        P::ActiveCovSubscriptions => Some(ApplicationTag::CovSubscription),
        P::PresentValue if object_type == ObjectType::Group => {
            Some(ApplicationTag::ReadAccessResult)
        }
        P::ListOfObjectPropertyReferences
        | P::LogDeviceObjectProperty
        | P::ObjectPropertyReference => Some(ApplicationTag::DeviceObjectPropertyReference),
        P::EventTimeStamps | P::LastRestoreTime | P::TimeOfDeviceRestart => {
            Some(ApplicationTag::TimeStamp)
        }
        P::RecipientList => Some(ApplicationTag::Destination),
        _ => None,
    }
}

/// One vendor mapping. A rule without a peer applies to every device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VendorTagRule {
    #[cfg_attr(feature = "serde", serde(default))]
    pub peer: Option<BacnetAddress>,
    pub property: PropertyId,
    pub tag_num: u8,
    pub tag: AppTag,
}

/// Map-backed [`ContextTagResolver`]; peer-specific rules win over
/// peer-agnostic ones.
#[derive(Debug, Clone, Default)]
pub struct VendorTagTable {
    entries: HashMap<(Option<BacnetAddress>, PropertyId, u8), AppTag>,
}

impl VendorTagTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule, returning the type it replaced.
    pub fn insert(&mut self, rule: VendorTagRule) -> Option<AppTag> {
        self.entries
            .insert((rule.peer, rule.property, rule.tag_num), rule.tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<VendorTagRule> for VendorTagTable {
    fn from_iter<I: IntoIterator<Item = VendorTagRule>>(iter: I) -> Self {
        let mut table = Self::new();
        for rule in iter {
            table.insert(rule);
        }
        table
    }
}

impl ContextTagResolver for VendorTagTable {
    fn resolve(
        &self,
        peer: Option<&BacnetAddress>,
        property: PropertyId,
        tag_num: u8,
    ) -> Option<AppTag> {
        peer.and_then(|p| self.entries.get(&(Some(*p), property, tag_num)))
            .or_else(|| self.entries.get(&(None, property, tag_num)))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        context_tag_type, structured_kind, ContextTagResolver, DecodeContext, VendorTagRule,
        VendorTagTable, MAX_NESTING_DEPTH,
    };
    use crate::encoding::tag::AppTag;
    use crate::types::{BacnetAddress, ObjectType, PropertyId};
    use crate::value::ApplicationTag;
    use crate::DecodeError;

    #[test]
    fn schema_table_entries() {
        assert_eq!(context_tag_type(PropertyId::Action, 2), Some(AppTag::Enumerated));
        assert_eq!(context_tag_type(PropertyId::Action, 4), None);
        assert_eq!(
            context_tag_type(PropertyId::RequestedShedLevel, 2),
            Some(AppTag::Real)
        );
        assert_eq!(
            context_tag_type(PropertyId::ActiveCovSubscriptions, 4),
            Some(AppTag::Real)
        );
        assert_eq!(context_tag_type(PropertyId::PresentValue, 0), None);
    }

    #[test]
    fn group_present_value_is_structured() {
        assert_eq!(
            structured_kind(ObjectType::Group, PropertyId::PresentValue),
            Some(ApplicationTag::ReadAccessResult)
        );
        assert_eq!(
            structured_kind(ObjectType::AnalogValue, PropertyId::PresentValue),
            None
        );
    }

    #[test]
    fn peer_rule_beats_wildcard() {
        let peer = BacnetAddress::local(&[10, 0, 0, 7, 0xBA, 0xC0]).unwrap();
        let other = BacnetAddress::local(&[10, 0, 0, 8, 0xBA, 0xC0]).unwrap();
        let property = PropertyId::Proprietary(5000);
        let table: VendorTagTable = [
            VendorTagRule {
                peer: None,
                property,
                tag_num: 1,
                tag: AppTag::UnsignedInt,
            },
            VendorTagRule {
                peer: Some(peer),
                property,
                tag_num: 1,
                tag: AppTag::Real,
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(Some(&peer), property, 1), Some(AppTag::Real));
        assert_eq!(
            table.resolve(Some(&other), property, 1),
            Some(AppTag::UnsignedInt)
        );
        assert_eq!(table.resolve(None, property, 1), Some(AppTag::UnsignedInt));
        assert_eq!(table.resolve(None, property, 2), None);
    }

    #[test]
    fn table_wins_over_resolver() {
        fn always_real(_: Option<&BacnetAddress>, _: PropertyId, _: u8) -> Option<AppTag> {
            Some(AppTag::Real)
        }
        let ctx = DecodeContext::new(ObjectType::Device, PropertyId::Action)
            .with_resolver(&always_real);
        assert_eq!(ctx.resolve(0), Some(AppTag::ObjectId));
        assert_eq!(ctx.resolve(9), Some(AppTag::Real));
        assert!(ctx.has_resolver());
    }

    #[test]
    fn nesting_stops_at_limit() {
        let mut ctx = DecodeContext::new(ObjectType::Group, PropertyId::PresentValue);
        for _ in 0..MAX_NESTING_DEPTH {
            ctx = ctx.nested().unwrap();
        }
        assert_eq!(ctx.depth(), MAX_NESTING_DEPTH);
        assert_eq!(ctx.nested().unwrap_err(), DecodeError::InvalidValue);

        let inner = ctx.for_property(ObjectType::AnalogInput, PropertyId::PresentValue);
        assert_eq!(inner.depth(), MAX_NESTING_DEPTH);
    }
}

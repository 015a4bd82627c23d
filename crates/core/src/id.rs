//! Strongly-typed identifiers and their generation.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of an aggregate root or of an entity inside one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateId(Uuid);

impl AggregateId {
    /// Create a new time-ordered identifier (UUIDv7).
    ///
    /// Domain code should go through an [`IdGenerator`] instead so tests can
    /// pin identifiers.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// The nil identifier. Never produced by a generator; used to model
    /// "missing" references that validation rejects.
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AggregateId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for AggregateId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for AggregateId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<AggregateId> for Uuid {
    fn from(value: AggregateId) -> Self {
        value.0
    }
}

impl FromStr for AggregateId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid =
            Uuid::from_str(s).map_err(|e| DomainError::invalid_id(format!("AggregateId: {e}")))?;
        Ok(Self(uuid))
    }
}

/// Source of fresh identifiers for aggregates and their entities.
///
/// Owned by the aggregate that mints child identities, so construction stays
/// deterministic when a fixed generator is injected.
pub trait IdGenerator {
    /// Produce the next identifier. Must never return the nil identifier.
    fn next_id(&mut self) -> AggregateId;
}

/// Production generator: random, time-ordered UUIDv7 values.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn next_id(&mut self) -> AggregateId {
        AggregateId::new()
    }
}

/// Deterministic generator yielding `00000000-0000-0000-0000-000000000001`,
/// `...0002`, and so on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialIdGenerator {
    next: u128,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Start the sequence at `first` (zero is bumped to one to skip nil).
    pub fn starting_at(first: u128) -> Self {
        Self {
            next: first.max(1),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> AggregateId {
        let id = AggregateId::from_uuid(Uuid::from_u128(self.next));
        // wraps back to 1, never to nil
        self.next = self.next.checked_add(1).unwrap_or(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_generator_is_deterministic() {
        let mut a = SequentialIdGenerator::new();
        let mut b = SequentialIdGenerator::new();

        let first = a.next_id();
        assert_eq!(first, b.next_id());
        assert_eq!(first.as_uuid().as_u128(), 1);
        assert_eq!(a.next_id().as_uuid().as_u128(), 2);
    }

    #[test]
    fn sequential_generator_skips_nil() {
        let mut ids = SequentialIdGenerator::starting_at(0);
        assert!(!ids.next_id().is_nil());

        let mut ids = SequentialIdGenerator::starting_at(u128::MAX);
        assert_eq!(ids.next_id().as_uuid().as_u128(), u128::MAX);
        assert!(!ids.next_id().is_nil());
    }

    #[test]
    fn uuid_generator_yields_distinct_ids() {
        let mut ids = UuidV7Generator;
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert!(!a.is_nil());
    }

    #[test]
    fn parse_round_trips_display() {
        let id = AggregateId::new();
        let parsed: AggregateId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "not-a-uuid".parse::<AggregateId>().unwrap_err();
        match err {
            DomainError::InvalidId(msg) if msg.starts_with("AggregateId") => {}
            other => panic!("Expected InvalidId, got {other:?}"),
        }
    }

    #[test]
    fn nil_is_nil() {
        assert!(AggregateId::nil().is_nil());
        assert!(!AggregateId::new().is_nil());
    }
}

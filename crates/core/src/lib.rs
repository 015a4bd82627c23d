//! `commerce-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! aggregate/entity/value-object traits, the domain error model, identifiers
//! and fixed-point money.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AggregateId, IdGenerator, SequentialIdGenerator, UuidV7Generator};
pub use money::Money;
pub use value_object::ValueObject;

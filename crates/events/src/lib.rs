//! Domain events.

pub mod event;

pub use event::Event;

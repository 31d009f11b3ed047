//! Domain events emitted from ordering operations.

pub mod event;

pub use event::Event;

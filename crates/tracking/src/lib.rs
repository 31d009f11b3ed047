//! Order tracking domain module: the post-checkout lifecycle state machine.
//!
//! This crate contains the one-directional order lifecycle, implemented
//! purely as deterministic domain logic (no IO, no timers — the session
//! layer owns the clock).

pub mod lifecycle;

pub use lifecycle::{
    BeginReview, CountdownTicked, LifecycleCommand, LifecycleEvent, OrderId, OrderLifecycle,
    OrderPhase, OrderReady, OrderSubmitted, PREPARATION_SECONDS, PreparationStarted, ReviewStarted,
    SubmitOrder, Tick,
};

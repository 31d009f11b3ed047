//! Ordering session orchestration.
//!
//! Wires the catalog, tray, and order lifecycle together behind a single
//! session object, and owns the countdown worker that drives preparation
//! ticks. This is the only layer with a clock; everything underneath is
//! pure domain logic.

pub mod countdown;
pub mod session;

pub use countdown::CountdownWorker;
pub use session::OrderSession;

//! Ordering domain module: item customization, pricing, and the tray.
//!
//! This crate contains business rules for building an order, implemented
//! purely as deterministic domain logic (no IO, no UI, no storage).

pub mod cart;
pub mod customization;
pub mod pricing;

pub use cart::{AddLine, Cart, CartCommand, CartEvent, CartId, CartLine, CartLineId, LineAdded};
pub use customization::{Customization, DEFAULT_SAUCE_INTENSITY};
pub use pricing::{SAUCE_UNIT_COST, SauceTier, compute_price, sauce_label, surcharge};

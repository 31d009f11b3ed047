//! Menu Catalog domain module.
//!
//! This crate contains the read-only catalog of orderable items. Catalog
//! data is fixed configuration: defined once at process start, never
//! mutated during a session.

pub mod catalog;
pub mod entry;

pub use catalog::Catalog;
pub use entry::{MenuEntry, MenuEntryId};

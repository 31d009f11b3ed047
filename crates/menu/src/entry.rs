use serde::{Deserialize, Serialize};

use traykit_core::Entity;

/// Catalog entry identifier (stable integer assigned by catalog configuration).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuEntryId(pub u32);

impl core::fmt::Display for MenuEntryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// An orderable item as defined by the catalog.
///
/// Immutable once the catalog is built. Consumers snapshot `name` and
/// `base_price` when committing a tray line, so later catalog changes never
/// reprice already-committed lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub id: MenuEntryId,
    pub name: String,
    /// Price in whole currency units.
    pub base_price: u64,
    /// Opaque display-asset reference; never interpreted by the core.
    pub image_ref: String,
}

impl Entity for MenuEntry {
    type Id = MenuEntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

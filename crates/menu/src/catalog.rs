use std::collections::HashSet;

use traykit_core::{DomainError, DomainResult};

use crate::entry::{MenuEntry, MenuEntryId};

/// Read-only menu catalog, fixed for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<MenuEntry>,
}

impl Catalog {
    /// Build a catalog from configuration entries.
    ///
    /// Entry identifiers must be unique; display order follows the input
    /// order.
    pub fn new(entries: Vec<MenuEntry>) -> DomainResult<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id) {
                return Err(DomainError::validation(format!(
                    "duplicate menu entry id: {}",
                    entry.id
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Build a catalog from a JSON array of entries.
    pub fn from_json(json: &str) -> DomainResult<Self> {
        let entries: Vec<MenuEntry> = serde_json::from_str(json)
            .map_err(|e| DomainError::validation(format!("malformed catalog: {e}")))?;
        Self::new(entries)
    }

    /// The built-in standard menu.
    pub fn standard() -> Self {
        let entries = vec![
            MenuEntry {
                id: MenuEntryId(1),
                name: "Spicy Chicken Fillet".to_string(),
                base_price: 950,
                image_ref: "assets/spicy-chicken-fillet.webp".to_string(),
            },
            MenuEntry {
                id: MenuEntryId(2),
                name: "Double Big Baik".to_string(),
                base_price: 950,
                image_ref: "assets/double-big-baik.webp".to_string(),
            },
            MenuEntry {
                id: MenuEntryId(3),
                name: "Chicken Nuggets (10pc)".to_string(),
                base_price: 1050,
                image_ref: "assets/chicken-nuggets.webp".to_string(),
            },
            MenuEntry {
                id: MenuEntryId(4),
                name: "Jumbo Shrimp Meal".to_string(),
                base_price: 1450,
                image_ref: "assets/jumbo-shrimp-meal.webp".to_string(),
            },
            MenuEntry {
                id: MenuEntryId(5),
                name: "French Fries (Large)".to_string(),
                base_price: 450,
                image_ref: "assets/french-fries-large.webp".to_string(),
            },
            MenuEntry {
                id: MenuEntryId(6),
                name: "Spicy Meat Tacos (4pc)".to_string(),
                base_price: 600,
                image_ref: "assets/spicy-meat-tacos.webp".to_string(),
            },
        ];

        // Ids above are distinct by construction.
        Self { entries }
    }

    /// Look up an entry by identifier.
    pub fn get(&self, id: MenuEntryId) -> Option<&MenuEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Entries in display order.
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

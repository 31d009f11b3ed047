use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use traykit_core::{Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult};
use traykit_events::Event;
use traykit_menu::{MenuEntry, MenuEntryId};

use crate::customization::Customization;
use crate::pricing::compute_price;

/// Tray identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(pub AggregateId);

impl CartId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CartId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Line identifier, unique within a cart.
///
/// Allocated from a monotonic counter so rapid successive adds never
/// collide (a timestamp-derived scheme would).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartLineId(pub u64);

impl core::fmt::Display for CartLineId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// One committed, priced, customized instance of a menu entry.
///
/// Immutable once created. `name` and `base_price` are snapshots taken at
/// commit time; catalog changes after commit never alter a committed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub line_id: CartLineId,
    pub entry_id: MenuEntryId,
    pub name: String,
    /// Catalog price at commit time, in whole currency units.
    pub base_price: u64,
    pub is_spicy: bool,
    pub sauce_intensity: u32,
    /// Price computed at commit time, stored immutably.
    pub final_price: u64,
}

/// Aggregate root: the tray of committed lines.
///
/// Append-only: no remove, update, or clear operation exists. The total is
/// recomputed on demand so it always equals the true sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    id: CartId,
    lines: Vec<CartLine>,
    next_line_id: u64,
    version: u64,
}

impl Cart {
    /// Create an empty tray for a new session.
    pub fn new(id: CartId) -> Self {
        Self {
            id,
            lines: Vec::new(),
            next_line_id: 1,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> CartId {
        self.id
    }

    /// Committed lines, in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of `final_price` over all lines; 0 for an empty tray.
    pub fn total(&self) -> u64 {
        self.lines.iter().map(|line| line.final_price).sum()
    }

    /// Commit a customized entry to the tray and return the created line.
    ///
    /// Snapshots the entry's name and base price, clamps the customization,
    /// and prices the line at commit time. Never mutates existing lines.
    pub fn add_line(
        &mut self,
        entry: &MenuEntry,
        customization: Customization,
        at: DateTime<Utc>,
    ) -> DomainResult<CartLine> {
        let cmd = AddLine {
            cart_id: self.id,
            entry: entry.clone(),
            customization,
            occurred_at: at,
        };
        let events = self.handle(&CartCommand::AddLine(cmd))?;
        for event in &events {
            self.apply(event);
        }
        match events.into_iter().next() {
            Some(CartEvent::LineAdded(e)) => Ok(e.line),
            None => Err(DomainError::invariant("add_line emitted no event")),
        }
    }
}

impl AggregateRoot for Cart {
    type Id = CartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddLine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLine {
    pub cart_id: CartId,
    pub entry: MenuEntry,
    pub customization: Customization,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    AddLine(AddLine),
}

/// Event: LineAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAdded {
    pub cart_id: CartId,
    pub line: CartLine,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    LineAdded(LineAdded),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::LineAdded(_) => "tray.line_added",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::LineAdded(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::LineAdded(e) => {
                self.next_line_id = e.line.line_id.0 + 1;
                self.lines.push(e.line.clone());
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::AddLine(cmd) => self.handle_add_line(cmd),
        }
    }
}

impl Cart {
    fn ensure_cart_id(&self, cart_id: CartId) -> Result<(), DomainError> {
        if self.id != cart_id {
            return Err(DomainError::invariant("cart_id mismatch"));
        }
        Ok(())
    }

    fn handle_add_line(&self, cmd: &AddLine) -> Result<Vec<CartEvent>, DomainError> {
        self.ensure_cart_id(cmd.cart_id)?;

        // Malformed customizations are corrected, not rejected.
        let customization = cmd.customization.clamped();

        let line = CartLine {
            line_id: CartLineId(self.next_line_id),
            entry_id: cmd.entry.id,
            name: cmd.entry.name.clone(),
            base_price: cmd.entry.base_price,
            is_spicy: customization.is_spicy,
            sauce_intensity: customization.sauce_intensity,
            final_price: compute_price(cmd.entry.base_price, customization.sauce_intensity),
        };

        Ok(vec![CartEvent::LineAdded(LineAdded {
            cart_id: cmd.cart_id,
            line,
            occurred_at: cmd.occurred_at,
        })])
    }
}

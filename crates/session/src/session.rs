use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use traykit_core::{AggregateId, DomainError, DomainResult, SessionId};
use traykit_menu::{Catalog, MenuEntry, MenuEntryId};
use traykit_ordering::{Cart, CartId, CartLine, Customization, compute_price};
use traykit_tracking::{OrderId, OrderLifecycle, OrderPhase};

/// One customer's ordering session.
///
/// Owns the tray, the order lifecycle, and a draft customization per menu
/// entry. All state is session-scoped and ephemeral; a new order requires a
/// new session. The rendering surface holds this behind a mutex and applies
/// one operation at a time, so every mutation here is serialized.
#[derive(Debug)]
pub struct OrderSession {
    id: SessionId,
    catalog: Arc<Catalog>,
    drafts: HashMap<MenuEntryId, Customization>,
    cart: Cart,
    lifecycle: OrderLifecycle,
}

impl OrderSession {
    /// Start a fresh session over a shared catalog: empty tray, Browsing
    /// phase, no drafts.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            id: SessionId::new(),
            catalog,
            drafts: HashMap::new(),
            cart: Cart::new(CartId::new(AggregateId::new())),
            lifecycle: OrderLifecycle::new(OrderId::new(AggregateId::new())),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The in-progress customization for an entry (defaults if untouched).
    pub fn draft(&self, entry_id: MenuEntryId) -> Customization {
        self.drafts.get(&entry_id).copied().unwrap_or_default()
    }

    /// Live price preview for an entry's current draft.
    pub fn draft_price(&self, entry_id: MenuEntryId) -> DomainResult<u64> {
        let entry = self.entry(entry_id)?;
        let draft = self.draft(entry_id);
        Ok(compute_price(entry.base_price, draft.sauce_intensity))
    }

    /// Flip the spicy flag on an entry's draft; returns the new flag.
    pub fn toggle_spicy(&mut self, entry_id: MenuEntryId) -> DomainResult<bool> {
        self.entry(entry_id)?;
        Ok(self.drafts.entry(entry_id).or_default().toggle_spicy())
    }

    /// Add one sauce unit to an entry's draft; returns the new intensity.
    pub fn add_sauce(&mut self, entry_id: MenuEntryId) -> DomainResult<u32> {
        self.entry(entry_id)?;
        Ok(self.drafts.entry(entry_id).or_default().add_sauce())
    }

    /// Remove one sauce unit from an entry's draft, clamped at 1.
    pub fn remove_sauce(&mut self, entry_id: MenuEntryId) -> DomainResult<u32> {
        self.entry(entry_id)?;
        Ok(self.drafts.entry(entry_id).or_default().remove_sauce())
    }

    /// Commit an entry's draft to the tray and reset the draft to defaults.
    ///
    /// Rejected once the order has been submitted: the tray is frozen so
    /// late adds cannot silently join an order already in preparation.
    pub fn add_to_tray(&mut self, entry_id: MenuEntryId) -> DomainResult<CartLine> {
        if !matches!(
            self.lifecycle.phase(),
            OrderPhase::Browsing | OrderPhase::Reviewing
        ) {
            return Err(DomainError::conflict(
                "tray is frozen once the order is submitted",
            ));
        }

        let entry = self.entry(entry_id)?.clone();
        let customization = self.draft(entry_id);
        let line = self.cart.add_line(&entry, customization, Utc::now())?;

        // Each add-to-tray starts the next customization from a clean slate.
        self.drafts.insert(entry_id, Customization::default());

        tracing::info!(
            line_id = %line.line_id,
            entry_id = %entry.id,
            final_price = line.final_price,
            "line added to tray"
        );
        Ok(line)
    }

    /// Navigate to the review surface.
    pub fn begin_review(&mut self) -> DomainResult<()> {
        self.lifecycle.begin_review(Utc::now())
    }

    /// Submit the order under review.
    ///
    /// Guard: an empty tray cannot be submitted; the phase is left
    /// untouched. The lifecycle machine itself never inspects the tray, so
    /// the precondition lives here.
    pub fn submit(&mut self) -> DomainResult<()> {
        if self.cart.is_empty() {
            return Err(DomainError::validation("cannot submit an empty tray"));
        }
        self.lifecycle.submit(Utc::now())?;

        tracing::info!(
            order_id = %self.lifecycle.id_typed(),
            total = self.cart.total(),
            lines = self.cart.line_count(),
            "order submitted, preparation started"
        );
        Ok(())
    }

    /// One elapsed second of preparation; returns the resulting phase.
    pub fn tick(&mut self) -> DomainResult<OrderPhase> {
        let phase = self.lifecycle.tick(Utc::now())?;
        if phase == OrderPhase::Ready {
            tracing::info!(order_id = %self.lifecycle.id_typed(), "order ready for pickup");
        }
        Ok(phase)
    }

    pub fn phase(&self) -> OrderPhase {
        self.lifecycle.phase()
    }

    /// Seconds until ready; `Some` only while Preparing.
    pub fn seconds_remaining(&self) -> Option<u32> {
        self.lifecycle.seconds_remaining()
    }

    /// Committed tray lines, in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// Number of committed lines (the tray badge).
    pub fn line_count(&self) -> usize {
        self.cart.line_count()
    }

    pub fn is_tray_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Tray total in whole currency units.
    pub fn total(&self) -> u64 {
        self.cart.total()
    }

    fn entry(&self, entry_id: MenuEntryId) -> DomainResult<&MenuEntry> {
        self.catalog.get(entry_id).ok_or(DomainError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session() -> OrderSession {
        OrderSession::new(Arc::new(Catalog::standard()))
    }

    const FILLET: MenuEntryId = MenuEntryId(1);

    #[test]
    fn fresh_session_browses_an_empty_tray() {
        let session = test_session();
        assert_eq!(session.phase(), OrderPhase::Browsing);
        assert!(session.is_tray_empty());
        assert_eq!(session.total(), 0);
        assert_eq!(session.draft(FILLET), Customization::default());
    }

    #[test]
    fn draft_price_tracks_sauce_intensity() {
        let mut session = test_session();
        assert_eq!(session.draft_price(FILLET).unwrap(), 950);

        session.add_sauce(FILLET).unwrap();
        session.add_sauce(FILLET).unwrap();
        assert_eq!(session.draft_price(FILLET).unwrap(), 1050);

        session.remove_sauce(FILLET).unwrap();
        assert_eq!(session.draft_price(FILLET).unwrap(), 1000);
    }

    #[test]
    fn remove_sauce_clamps_at_one() {
        let mut session = test_session();
        assert_eq!(session.remove_sauce(FILLET).unwrap(), 1);
        assert_eq!(session.remove_sauce(FILLET).unwrap(), 1);
    }

    #[test]
    fn draft_resets_after_each_add_to_tray() {
        let mut session = test_session();
        session.toggle_spicy(FILLET).unwrap();
        session.add_sauce(FILLET).unwrap();

        let line = session.add_to_tray(FILLET).unwrap();
        assert!(line.is_spicy);
        assert_eq!(line.sauce_intensity, 2);

        // Committed values stay; the draft starts over.
        assert_eq!(session.draft(FILLET), Customization::default());
        assert_eq!(session.draft_price(FILLET).unwrap(), 950);
    }

    #[test]
    fn unknown_entry_is_not_found() {
        let mut session = test_session();
        let missing = MenuEntryId(999);
        assert_eq!(session.add_to_tray(missing).unwrap_err(), DomainError::NotFound);
        assert_eq!(session.toggle_spicy(missing).unwrap_err(), DomainError::NotFound);
        assert_eq!(session.draft_price(missing).unwrap_err(), DomainError::NotFound);
    }

    #[test]
    fn empty_tray_cannot_be_submitted() {
        let mut session = test_session();
        session.begin_review().unwrap();

        let err = session.submit().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(session.phase(), OrderPhase::Reviewing);
    }

    #[test]
    fn tray_is_frozen_after_submission() {
        let mut session = test_session();
        session.add_to_tray(FILLET).unwrap();
        session.begin_review().unwrap();
        session.submit().unwrap();
        assert_eq!(session.phase(), OrderPhase::Preparing);

        let err = session.add_to_tray(FILLET).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(session.line_count(), 1);
    }

    #[test]
    fn reviewing_still_allows_adds() {
        let mut session = test_session();
        session.begin_review().unwrap();
        session.add_to_tray(FILLET).unwrap();
        assert_eq!(session.line_count(), 1);
    }

    #[test]
    fn example_scenario_end_to_end() {
        let mut session = test_session();

        // Spicy fillet with triple sauce.
        session.toggle_spicy(FILLET).unwrap();
        session.add_sauce(FILLET).unwrap();
        session.add_sauce(FILLET).unwrap();
        let first = session.add_to_tray(FILLET).unwrap();
        assert_eq!(first.final_price, 1050);
        assert!(first.is_spicy);

        // Second fillet, untouched draft.
        let second = session.add_to_tray(FILLET).unwrap();
        assert_eq!(second.final_price, 950);
        assert_ne!(first.line_id, second.line_id);

        assert_eq!(session.total(), 2000);

        session.begin_review().unwrap();
        session.submit().unwrap();
        assert_eq!(session.phase(), OrderPhase::Preparing);
        assert_eq!(session.seconds_remaining(), Some(15));

        for _ in 0..15 {
            session.tick().unwrap();
        }
        assert_eq!(session.phase(), OrderPhase::Ready);
        assert_eq!(session.seconds_remaining(), None);
        assert!(session.tick().is_err());
    }
}

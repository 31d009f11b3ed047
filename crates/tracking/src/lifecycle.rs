use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use traykit_core::{Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult};
use traykit_events::Event;

/// Seconds of preparation once an order is submitted.
pub const PREPARATION_SECONDS: u32 = 15;

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub AggregateId);

impl OrderId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Order lifecycle phase.
///
/// Strictly forward: Browsing → Reviewing → Submitted → Preparing → Ready.
/// `Ord` follows that sequence, so forward-only progress is expressible as
/// "the phase never decreases". There is no cancel, pause, reset, or
/// backward edge; a new order needs a new lifecycle instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderPhase {
    Browsing,
    Reviewing,
    Submitted,
    Preparing,
    Ready,
}

impl OrderPhase {
    /// Ready is terminal: no transition leaves it.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderPhase::Ready)
    }
}

/// Aggregate root: the post-checkout order lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLifecycle {
    id: OrderId,
    phase: OrderPhase,
    countdown_seconds: u32,
    version: u64,
}

impl OrderLifecycle {
    /// Create a fresh lifecycle at session start, in Browsing.
    pub fn new(id: OrderId) -> Self {
        Self {
            id,
            phase: OrderPhase::Browsing,
            countdown_seconds: 0,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn phase(&self) -> OrderPhase {
        self.phase
    }

    /// Seconds until the order is ready; meaningful only while Preparing.
    pub fn seconds_remaining(&self) -> Option<u32> {
        match self.phase {
            OrderPhase::Preparing => Some(self.countdown_seconds),
            _ => None,
        }
    }

    /// Move from Browsing to Reviewing. No precondition: an empty tray may
    /// be reviewed.
    pub fn begin_review(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        let cmd = LifecycleCommand::BeginReview(BeginReview {
            order_id: self.id,
            occurred_at: at,
        });
        self.execute(&cmd)?;
        Ok(())
    }

    /// Submit the order under review.
    ///
    /// Submitted is entered and immediately advanced to Preparing with the
    /// countdown initialized. The non-empty-tray precondition belongs to the
    /// calling surface; this machine only checks the phase.
    pub fn submit(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        let cmd = LifecycleCommand::SubmitOrder(SubmitOrder {
            order_id: self.id,
            occurred_at: at,
        });
        self.execute(&cmd)?;
        Ok(())
    }

    /// One elapsed second of preparation. The tick that reaches zero also
    /// moves the order to Ready; any tick after that is rejected.
    pub fn tick(&mut self, at: DateTime<Utc>) -> DomainResult<OrderPhase> {
        let cmd = LifecycleCommand::Tick(Tick {
            order_id: self.id,
            occurred_at: at,
        });
        self.execute(&cmd)?;
        Ok(self.phase)
    }

    fn execute(&mut self, cmd: &LifecycleCommand) -> DomainResult<()> {
        let events = self.handle(cmd)?;
        for event in &events {
            self.apply(event);
        }
        Ok(())
    }
}

impl AggregateRoot for OrderLifecycle {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: BeginReview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeginReview {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SubmitOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOrder {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Tick (one elapsed second while Preparing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleCommand {
    BeginReview(BeginReview),
    SubmitOrder(SubmitOrder),
    Tick(Tick),
}

/// Event: ReviewStarted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStarted {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderSubmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSubmitted {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PreparationStarted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparationStarted {
    pub order_id: OrderId,
    pub countdown_seconds: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CountdownTicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownTicked {
    pub order_id: OrderId,
    pub seconds_remaining: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderReady.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReady {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    ReviewStarted(ReviewStarted),
    OrderSubmitted(OrderSubmitted),
    PreparationStarted(PreparationStarted),
    CountdownTicked(CountdownTicked),
    OrderReady(OrderReady),
}

impl Event for LifecycleEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LifecycleEvent::ReviewStarted(_) => "order.review_started",
            LifecycleEvent::OrderSubmitted(_) => "order.submitted",
            LifecycleEvent::PreparationStarted(_) => "order.preparation_started",
            LifecycleEvent::CountdownTicked(_) => "order.countdown_ticked",
            LifecycleEvent::OrderReady(_) => "order.ready",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LifecycleEvent::ReviewStarted(e) => e.occurred_at,
            LifecycleEvent::OrderSubmitted(e) => e.occurred_at,
            LifecycleEvent::PreparationStarted(e) => e.occurred_at,
            LifecycleEvent::CountdownTicked(e) => e.occurred_at,
            LifecycleEvent::OrderReady(e) => e.occurred_at,
        }
    }
}

impl Aggregate for OrderLifecycle {
    type Command = LifecycleCommand;
    type Event = LifecycleEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LifecycleEvent::ReviewStarted(_) => {
                self.phase = OrderPhase::Reviewing;
            }
            LifecycleEvent::OrderSubmitted(_) => {
                self.phase = OrderPhase::Submitted;
            }
            LifecycleEvent::PreparationStarted(e) => {
                self.phase = OrderPhase::Preparing;
                self.countdown_seconds = e.countdown_seconds;
            }
            LifecycleEvent::CountdownTicked(e) => {
                self.countdown_seconds = e.seconds_remaining;
            }
            LifecycleEvent::OrderReady(_) => {
                self.phase = OrderPhase::Ready;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LifecycleCommand::BeginReview(cmd) => self.handle_begin_review(cmd),
            LifecycleCommand::SubmitOrder(cmd) => self.handle_submit(cmd),
            LifecycleCommand::Tick(cmd) => self.handle_tick(cmd),
        }
    }
}

impl OrderLifecycle {
    fn ensure_order_id(&self, order_id: OrderId) -> Result<(), DomainError> {
        if self.id != order_id {
            return Err(DomainError::invariant("order_id mismatch"));
        }
        Ok(())
    }

    fn handle_begin_review(&self, cmd: &BeginReview) -> Result<Vec<LifecycleEvent>, DomainError> {
        self.ensure_order_id(cmd.order_id)?;

        if self.phase != OrderPhase::Browsing {
            return Err(DomainError::invariant(
                "review can only begin while browsing",
            ));
        }

        Ok(vec![LifecycleEvent::ReviewStarted(ReviewStarted {
            order_id: cmd.order_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_submit(&self, cmd: &SubmitOrder) -> Result<Vec<LifecycleEvent>, DomainError> {
        self.ensure_order_id(cmd.order_id)?;

        if self.phase != OrderPhase::Reviewing {
            return Err(DomainError::invariant(
                "only an order under review can be submitted",
            ));
        }

        // Submitted advances to Preparing in the same decision: entering
        // Submitted has no observable dwell time.
        Ok(vec![
            LifecycleEvent::OrderSubmitted(OrderSubmitted {
                order_id: cmd.order_id,
                occurred_at: cmd.occurred_at,
            }),
            LifecycleEvent::PreparationStarted(PreparationStarted {
                order_id: cmd.order_id,
                countdown_seconds: PREPARATION_SECONDS,
                occurred_at: cmd.occurred_at,
            }),
        ])
    }

    fn handle_tick(&self, cmd: &Tick) -> Result<Vec<LifecycleEvent>, DomainError> {
        self.ensure_order_id(cmd.order_id)?;

        if self.phase != OrderPhase::Preparing {
            return Err(DomainError::invariant(
                "countdown only runs while preparing",
            ));
        }

        let seconds_remaining = self.countdown_seconds.saturating_sub(1);
        let mut events = vec![LifecycleEvent::CountdownTicked(CountdownTicked {
            order_id: cmd.order_id,
            seconds_remaining,
            occurred_at: cmd.occurred_at,
        })];

        if seconds_remaining == 0 {
            events.push(LifecycleEvent::OrderReady(OrderReady {
                order_id: cmd.order_id,
                occurred_at: cmd.occurred_at,
            }));
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_order_id() -> OrderId {
        OrderId::new(AggregateId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn preparing_lifecycle() -> OrderLifecycle {
        let mut lifecycle = OrderLifecycle::new(test_order_id());
        lifecycle.begin_review(test_time()).unwrap();
        lifecycle.submit(test_time()).unwrap();
        lifecycle
    }

    #[test]
    fn starts_browsing_with_no_countdown() {
        let lifecycle = OrderLifecycle::new(test_order_id());
        assert_eq!(lifecycle.phase(), OrderPhase::Browsing);
        assert_eq!(lifecycle.seconds_remaining(), None);
        assert_eq!(lifecycle.version(), 0);
    }

    #[test]
    fn submit_enters_preparing_with_full_countdown() {
        let lifecycle = preparing_lifecycle();
        assert_eq!(lifecycle.phase(), OrderPhase::Preparing);
        assert_eq!(lifecycle.seconds_remaining(), Some(PREPARATION_SECONDS));
        // ReviewStarted + OrderSubmitted + PreparationStarted.
        assert_eq!(lifecycle.version(), 3);
    }

    #[test]
    fn submit_emits_submitted_then_preparation_started() {
        let mut lifecycle = OrderLifecycle::new(test_order_id());
        lifecycle.begin_review(test_time()).unwrap();

        let events = lifecycle
            .handle(&LifecycleCommand::SubmitOrder(SubmitOrder {
                order_id: lifecycle.id_typed(),
                occurred_at: test_time(),
            }))
            .unwrap();

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], LifecycleEvent::OrderSubmitted(_)));
        match &events[1] {
            LifecycleEvent::PreparationStarted(e) => {
                assert_eq!(e.countdown_seconds, PREPARATION_SECONDS);
            }
            other => panic!("expected PreparationStarted, got {other:?}"),
        }
    }

    #[test]
    fn countdown_terminates_after_exactly_fifteen_ticks() {
        let mut lifecycle = preparing_lifecycle();

        for expected in (0..PREPARATION_SECONDS).rev() {
            let phase = lifecycle.tick(test_time()).unwrap();
            if expected == 0 {
                assert_eq!(phase, OrderPhase::Ready);
                assert_eq!(lifecycle.seconds_remaining(), None);
            } else {
                assert_eq!(phase, OrderPhase::Preparing);
                assert_eq!(lifecycle.seconds_remaining(), Some(expected));
            }
        }

        // A sixteenth tick has no edge to follow.
        let err = lifecycle.tick(test_time()).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(lifecycle.phase(), OrderPhase::Ready);
    }

    #[test]
    fn phase_never_moves_backward() {
        let mut lifecycle = OrderLifecycle::new(test_order_id());
        let mut last = lifecycle.phase();

        lifecycle.begin_review(test_time()).unwrap();
        assert!(lifecycle.phase() >= last);
        last = lifecycle.phase();

        lifecycle.submit(test_time()).unwrap();
        assert!(lifecycle.phase() >= last);
        last = lifecycle.phase();

        while lifecycle.phase() == OrderPhase::Preparing {
            lifecycle.tick(test_time()).unwrap();
            assert!(lifecycle.phase() >= last);
            last = lifecycle.phase();
        }

        assert_eq!(last, OrderPhase::Ready);
        assert!(last.is_terminal());
    }

    #[test]
    fn rejects_transitions_with_no_edge_from_current_phase() {
        let mut lifecycle = OrderLifecycle::new(test_order_id());

        // Submit while still browsing.
        assert!(lifecycle.submit(test_time()).is_err());
        assert_eq!(lifecycle.phase(), OrderPhase::Browsing);

        // Tick before preparation starts.
        assert!(lifecycle.tick(test_time()).is_err());

        lifecycle.begin_review(test_time()).unwrap();

        // Reviewing twice.
        assert!(lifecycle.begin_review(test_time()).is_err());
        assert_eq!(lifecycle.phase(), OrderPhase::Reviewing);

        lifecycle.submit(test_time()).unwrap();

        // Submitting twice.
        assert!(lifecycle.submit(test_time()).is_err());
        assert_eq!(lifecycle.phase(), OrderPhase::Preparing);
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let lifecycle = preparing_lifecycle();
        let cmd = LifecycleCommand::Tick(Tick {
            order_id: lifecycle.id_typed(),
            occurred_at: test_time(),
        });

        let events1 = lifecycle.handle(&cmd).unwrap();
        let events2 = lifecycle.handle(&cmd).unwrap();

        assert_eq!(lifecycle.seconds_remaining(), Some(PREPARATION_SECONDS));
        assert_eq!(events1, events2);
    }

    #[test]
    fn rejects_command_for_another_order() {
        let lifecycle = OrderLifecycle::new(test_order_id());
        let err = lifecycle
            .handle(&LifecycleCommand::BeginReview(BeginReview {
                order_id: test_order_id(),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }
}

//! Order lifecycle state machine.
//!
//! Replaces an inherited broker-callback lifecycle with explicit states and
//! an event queue. A submitted order suppresses further submissions until the
//! broker reports a fill or rejection; trade-close notifications carry PnL
//! and do not change state.

use std::collections::VecDeque;

use chrono::NaiveDate;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TradeState {
    #[default]
    Idle,
    OrderPending { side: OrderSide },
    PositionOpen,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderEvent {
    OrderFilled { price: f64, date: NaiveDate },
    OrderRejected,
    TradeClosed { gross_pnl: f64, net_pnl: f64 },
}

/// Outcome of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    /// An order is already in flight.
    Pending,
    /// The submission does not fit the current state (buy while open,
    /// sell while flat).
    WrongState,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenPosition {
    pub entry_price: f64,
    pub entry_date: NaiveDate,
}

/// Tracks one instrument's order/position lifecycle.
#[derive(Debug, Default)]
pub struct TradeLifecycle {
    state: TradeState,
    events: VecDeque<OrderEvent>,
    position: Option<OpenPosition>,
}

impl TradeLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TradeState {
        self.state
    }

    pub fn position(&self) -> Option<OpenPosition> {
        self.position
    }

    pub fn has_pending_order(&self) -> bool {
        matches!(self.state, TradeState::OrderPending { .. })
    }

    /// Submit an entry order. Legal only from `Idle`.
    pub fn submit_buy(&mut self) -> SubmitOutcome {
        match self.state {
            TradeState::Idle => {
                self.state = TradeState::OrderPending {
                    side: OrderSide::Buy,
                };
                SubmitOutcome::Accepted
            }
            TradeState::OrderPending { .. } => SubmitOutcome::Pending,
            TradeState::PositionOpen => SubmitOutcome::WrongState,
        }
    }

    /// Submit an exit order. Legal only from `PositionOpen`.
    pub fn submit_sell(&mut self) -> SubmitOutcome {
        match self.state {
            TradeState::PositionOpen => {
                self.state = TradeState::OrderPending {
                    side: OrderSide::Sell,
                };
                SubmitOutcome::Accepted
            }
            TradeState::OrderPending { .. } => SubmitOutcome::Pending,
            TradeState::Idle => SubmitOutcome::WrongState,
        }
    }

    /// Queue a broker event for the next [`process_events`](Self::process_events).
    pub fn push_event(&mut self, event: OrderEvent) {
        self.events.push_back(event);
    }

    /// Drain the queue in FIFO order, applying each event.
    /// Returns the number of events applied.
    pub fn process_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.events.pop_front() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, event: OrderEvent) {
        match event {
            OrderEvent::OrderFilled { price, date } => match self.state {
                TradeState::OrderPending {
                    side: OrderSide::Buy,
                } => {
                    info!(price, date = %date, "buy order filled");
                    self.position = Some(OpenPosition {
                        entry_price: price,
                        entry_date: date,
                    });
                    self.state = TradeState::PositionOpen;
                }
                TradeState::OrderPending {
                    side: OrderSide::Sell,
                } => {
                    info!(price, date = %date, "sell order filled");
                    self.position = None;
                    self.state = TradeState::Idle;
                }
                _ => {
                    warn!("fill event with no pending order, ignored");
                }
            },
            OrderEvent::OrderRejected => match self.state {
                TradeState::OrderPending {
                    side: OrderSide::Buy,
                } => {
                    info!("buy order rejected");
                    self.state = TradeState::Idle;
                }
                TradeState::OrderPending {
                    side: OrderSide::Sell,
                } => {
                    info!("sell order rejected");
                    self.state = TradeState::PositionOpen;
                }
                _ => {
                    warn!("rejection event with no pending order, ignored");
                }
            },
            OrderEvent::TradeClosed { gross_pnl, net_pnl } => {
                info!(gross_pnl, net_pnl, "trade closed");
            }
        }
    }
}

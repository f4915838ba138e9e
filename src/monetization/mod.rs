//! Mocked monetization: in-app purchases, rewarded ads and the energy shop.
//!
//! Providers only ever hand out [`Reward`]s after a simulated latency; the
//! single place a reward touches the game is [`commit`]. There is no real
//! payment or ad backend behind any of this.

pub mod ads;
pub mod catalog;
pub mod energy;
pub mod purchase;

use serde::{Deserialize, Serialize};

use crate::career::state::{add_stat, GameState};
use crate::error::MonetizationError;
use crate::time::{Clock, Timer};

pub use ads::{AdProvider, FakeAdStore};
pub use energy::EnergyStore;
pub use purchase::{FakePurchaseStore, PurchaseProvider};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatKind {
    Reputation,
    Creativity,
    Marketing,
    Networking,
    FanLoyalty,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Reward {
    Wealth(f64),
    /// Refill energy, capped at max energy.
    Energy(u32),
    MaxEnergy(u32),
    Stat { stat: StatKind, amount: f64 },
    /// Energy paid for with in-game wealth.
    EnergyRefill { energy: u32, cost: f64 },
}

impl Reward {
    pub fn describe(&self) -> String {
        match self {
            Reward::Wealth(amount) => format!("+{}", crate::format::format_money(*amount)),
            Reward::Energy(e) => format!("+{} energy", e),
            Reward::MaxEnergy(e) => format!("+{} max energy", e),
            Reward::Stat { stat, amount } => format!("+{} {:?}", amount, stat),
            Reward::EnergyRefill { energy, cost } => format!(
                "+{} energy for {}",
                energy,
                crate::format::format_money(*cost)
            ),
        }
    }
}

/// Apply a reward to the game. On error nothing changes.
pub fn commit(reward: &Reward, state: &mut GameState) -> Result<(), MonetizationError> {
    let stats = &mut state.stats;
    match reward {
        Reward::Wealth(amount) => {
            if !amount.is_finite() || *amount < 0.0 {
                return Err(MonetizationError::Declined);
            }
            stats.wealth += amount;
        }
        Reward::Energy(e) => {
            stats.energy = stats.energy.saturating_add(*e).min(stats.max_energy);
        }
        Reward::MaxEnergy(e) => {
            stats.max_energy = stats.max_energy.saturating_add(*e);
            stats.energy = stats.energy.saturating_add(*e);
        }
        Reward::Stat { stat, amount } => {
            if !amount.is_finite() || *amount < 0.0 {
                return Err(MonetizationError::Declined);
            }
            let target = match stat {
                StatKind::Reputation => &mut stats.reputation,
                StatKind::Creativity => &mut stats.creativity,
                StatKind::Marketing => &mut stats.marketing,
                StatKind::Networking => &mut stats.networking,
                StatKind::FanLoyalty => &mut stats.fan_loyalty,
            };
            add_stat(target, *amount);
        }
        Reward::EnergyRefill { energy, cost } => {
            if !cost.is_finite() || *cost < 0.0 {
                return Err(MonetizationError::Declined);
            }
            if stats.wealth < *cost {
                return Err(MonetizationError::InsufficientWealth {
                    need: *cost,
                    have: stats.wealth,
                });
            }
            stats.wealth -= cost;
            stats.energy = stats.energy.saturating_add(*energy).min(stats.max_energy);
        }
    }
    tracing::info!(reward = ?reward, "reward committed");
    state.add_news(&format!("Store: {}", reward.describe()));
    Ok(())
}

/// Handle for an in-flight request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub u32);

#[derive(Clone, Debug, PartialEq)]
pub enum RequestStatus {
    Pending,
    Ready(Reward),
    Failed(MonetizationError),
}

struct Request {
    ticket: Ticket,
    timer: Timer,
    result: Result<Reward, MonetizationError>,
}

/// In-flight requests that resolve once their latency has elapsed.
#[derive(Default)]
pub(crate) struct PendingRequests {
    clock: Clock,
    requests: Vec<Request>,
    next_ticket: u32,
}

impl PendingRequests {
    pub(crate) fn start(
        &mut self,
        latency_ms: f64,
        result: Result<Reward, MonetizationError>,
    ) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.requests.push(Request {
            ticket,
            timer: Timer::new(latency_ms),
            result,
        });
        ticket
    }

    /// Returns the elapsed delta so callers can drive their own timers.
    pub(crate) fn update(&mut self, now_ms: f64) -> f64 {
        let delta = self.clock.update(now_ms);
        for r in &mut self.requests {
            r.timer.advance(delta);
        }
        delta
    }

    /// Finished requests are handed out once and then forgotten.
    pub(crate) fn poll(&mut self, ticket: Ticket) -> Result<RequestStatus, MonetizationError> {
        let idx = self
            .requests
            .iter()
            .position(|r| r.ticket == ticket)
            .ok_or(MonetizationError::UnknownTicket(ticket.0))?;
        if !self.requests[idx].timer.is_done() {
            return Ok(RequestStatus::Pending);
        }
        let request = self.requests.remove(idx);
        Ok(match request.result {
            Ok(reward) => RequestStatus::Ready(reward),
            Err(e) => RequestStatus::Failed(e),
        })
    }

    /// Drop a request whose result nobody will collect. Returns whether
    /// the ticket was still in flight.
    pub(crate) fn cancel(&mut self, ticket: Ticket) -> bool {
        let before = self.requests.len();
        self.requests.retain(|r| r.ticket != ticket);
        self.requests.len() < before
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.requests.len()
    }
}

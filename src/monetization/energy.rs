//! Energy shop: refills bought with in-game wealth.

use super::catalog::{find_energy_offer, EnergyOffer, ENERGY_OFFERS};
use super::{PendingRequests, RequestStatus, Reward, Ticket};
use crate::career::state::GameState;
use crate::error::MonetizationError;

const DEFAULT_LATENCY_MS: f64 = 300.0;

/// Wealth is checked when the request is made and again on commit, since
/// the player may spend it in between.
pub struct EnergyStore {
    initialized: bool,
    latency_ms: f64,
    requests: PendingRequests,
}

impl Default for EnergyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EnergyStore {
    pub fn new() -> Self {
        Self {
            initialized: false,
            latency_ms: DEFAULT_LATENCY_MS,
            requests: PendingRequests::default(),
        }
    }

    pub fn with_latency(mut self, latency_ms: f64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn initialize(&mut self) -> Result<(), MonetizationError> {
        if !self.initialized {
            self.initialized = true;
            tracing::info!(offers = ENERGY_OFFERS.len(), "energy store ready");
        }
        Ok(())
    }

    pub fn offers(&self) -> &[EnergyOffer] {
        &ENERGY_OFFERS
    }

    pub fn request_refill(
        &mut self,
        state: &GameState,
        offer_id: &str,
    ) -> Result<Ticket, MonetizationError> {
        if !self.initialized {
            return Err(MonetizationError::NotInitialized);
        }
        let offer = find_energy_offer(offer_id)
            .ok_or_else(|| MonetizationError::UnknownProduct(offer_id.to_string()))?;
        if state.stats.wealth < offer.cost {
            return Err(MonetizationError::InsufficientWealth {
                need: offer.cost,
                have: state.stats.wealth,
            });
        }
        let reward = Reward::EnergyRefill {
            energy: offer.energy,
            cost: offer.cost,
        };
        let ticket = self.requests.start(self.latency_ms, Ok(reward));
        tracing::debug!(offer = offer_id, ticket = ticket.0, "energy refill requested");
        Ok(ticket)
    }

    pub fn update(&mut self, now_ms: f64) {
        self.requests.update(now_ms);
    }

    pub fn poll(&mut self, ticket: Ticket) -> Result<RequestStatus, MonetizationError> {
        self.requests.poll(ticket)
    }

    pub fn cancel(&mut self, ticket: Ticket) -> bool {
        self.requests.cancel(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monetization::commit;

    fn ready_store(latency_ms: f64) -> EnergyStore {
        let mut store = EnergyStore::new().with_latency(latency_ms);
        store.initialize().unwrap();
        store
    }

    #[test]
    fn requires_initialize() {
        let mut store = EnergyStore::new();
        let game = GameState::new("Early");
        assert_eq!(
            store.request_refill(&game, "coffee"),
            Err(MonetizationError::NotInitialized)
        );
    }

    #[test]
    fn cancelled_refill_is_forgotten() {
        let mut store = ready_store(100.0);
        let game = GameState::new("Undecided");
        let ticket = store.request_refill(&game, "coffee").unwrap();
        assert!(store.cancel(ticket));
        assert_eq!(store.poll(ticket), Err(MonetizationError::UnknownTicket(ticket.0)));
    }

    #[test]
    fn refill_flow() {
        let mut store = ready_store(100.0);
        let mut game = GameState::new("Tired");
        game.stats.energy = 0;
        store.update(0.0);

        let ticket = store.request_refill(&game, "studio_nap").unwrap();
        assert_eq!(store.poll(ticket), Ok(RequestStatus::Pending));
        store.update(120.0);
        let reward = match store.poll(ticket).unwrap() {
            RequestStatus::Ready(r) => r,
            other => panic!("unexpected status {:?}", other),
        };
        commit(&reward, &mut game).unwrap();
        assert_eq!(game.stats.energy, 50);
        assert_eq!(game.stats.wealth, 550.0);
    }

    #[test]
    fn too_poor_to_request() {
        let mut store = ready_store(0.0);
        let mut game = GameState::new("Broke");
        game.stats.wealth = 10.0;
        assert_eq!(
            store.request_refill(&game, "coffee"),
            Err(MonetizationError::InsufficientWealth { need: 200.0, have: 10.0 })
        );
    }

    #[test]
    fn wealth_spent_before_commit() {
        let mut store = ready_store(0.0);
        let mut game = GameState::new("Spender");
        let ticket = store.request_refill(&game, "vacation").unwrap();
        game.stats.wealth = 100.0;
        let reward = match store.poll(ticket).unwrap() {
            RequestStatus::Ready(r) => r,
            other => panic!("unexpected status {:?}", other),
        };
        let before = game.clone();
        assert!(commit(&reward, &mut game).is_err());
        assert_eq!(game, before);
    }

    #[test]
    fn unknown_offer() {
        let mut store = ready_store(0.0);
        let game = GameState::new("X");
        assert_eq!(
            store.request_refill(&game, "nap"),
            Err(MonetizationError::UnknownProduct("nap".into()))
        );
    }
}

//! In-app purchases.

use rand_core::RngCore;

use super::catalog::{find_product, Product, PRODUCTS};
use super::{PendingRequests, RequestStatus, Ticket};
use crate::error::MonetizationError;
use crate::rng;

const DEFAULT_LATENCY_MS: f64 = 800.0;

/// A purchase backend. Completed requests yield a reward for
/// [`super::commit`]; the provider never touches the game state itself.
pub trait PurchaseProvider {
    fn initialize(&mut self) -> Result<(), MonetizationError>;

    fn products(&self) -> &[Product];

    fn request_purchase(&mut self, product_id: &str) -> Result<Ticket, MonetizationError>;

    /// Per-frame tick with the host timestamp.
    fn update(&mut self, now_ms: f64);

    fn poll(&mut self, ticket: Ticket) -> Result<RequestStatus, MonetizationError>;

    /// Abandon a request, e.g. when the purchase dialog is closed.
    fn cancel(&mut self, ticket: Ticket) -> bool;
}

/// Store that approves purchases after a delay, or declines a configurable
/// share of them.
pub struct FakePurchaseStore<R> {
    rng: R,
    initialized: bool,
    latency_ms: f64,
    failure_chance: f64,
    requests: PendingRequests,
}

impl<R: RngCore> FakePurchaseStore<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            initialized: false,
            latency_ms: DEFAULT_LATENCY_MS,
            failure_chance: 0.0,
            requests: PendingRequests::default(),
        }
    }

    pub fn with_latency(mut self, latency_ms: f64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// 0.0 never fails, 1.0 always fails.
    pub fn with_failure_chance(mut self, chance: f64) -> Self {
        self.failure_chance = chance;
        self
    }

    pub fn in_flight(&self) -> usize {
        self.requests.in_flight()
    }
}

impl<R: RngCore> PurchaseProvider for FakePurchaseStore<R> {
    fn initialize(&mut self) -> Result<(), MonetizationError> {
        if !self.initialized {
            self.initialized = true;
            tracing::info!(products = PRODUCTS.len(), "purchase store ready");
        }
        Ok(())
    }

    fn products(&self) -> &[Product] {
        &PRODUCTS
    }

    fn request_purchase(&mut self, product_id: &str) -> Result<Ticket, MonetizationError> {
        if !self.initialized {
            return Err(MonetizationError::NotInitialized);
        }
        let product = find_product(product_id)
            .ok_or_else(|| MonetizationError::UnknownProduct(product_id.to_string()))?;

        let result = if rng::chance(&mut self.rng, self.failure_chance) {
            Err(MonetizationError::Declined)
        } else {
            Ok(product.reward.clone())
        };
        let ticket = self.requests.start(self.latency_ms, result);
        tracing::debug!(product = product_id, ticket = ticket.0, "purchase requested");
        Ok(ticket)
    }

    fn update(&mut self, now_ms: f64) {
        self.requests.update(now_ms);
    }

    fn poll(&mut self, ticket: Ticket) -> Result<RequestStatus, MonetizationError> {
        let status = self.requests.poll(ticket)?;
        if let RequestStatus::Failed(e) = &status {
            tracing::warn!(ticket = ticket.0, error = %e, "purchase failed");
        }
        Ok(status)
    }

    fn cancel(&mut self, ticket: Ticket) -> bool {
        self.requests.cancel(ticket)
    }
}

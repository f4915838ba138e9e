//! Rewarded ads.

use rand_core::RngCore;

use super::catalog::AD_REWARDS;
use super::{PendingRequests, RequestStatus, Ticket};
use crate::error::MonetizationError;
use crate::rng;
use crate::time::Timer;

const DEFAULT_LOAD_MS: f64 = 500.0;
const DEFAULT_WATCH_MS: f64 = 1_500.0;

pub trait AdProvider {
    fn initialize(&mut self) -> Result<(), MonetizationError>;

    /// Start fetching an ad. [`AdProvider::is_loaded`] turns true once ready.
    fn load_ad(&mut self) -> Result<(), MonetizationError>;

    fn is_loaded(&self) -> bool;

    /// Play the loaded ad. The ticket resolves when the viewer is done.
    fn show_ad(&mut self) -> Result<Ticket, MonetizationError>;

    /// Per-frame tick with the host timestamp.
    fn update(&mut self, now_ms: f64);

    fn poll(&mut self, ticket: Ticket) -> Result<RequestStatus, MonetizationError>;

    /// Abandon an ad view; no reward will be handed out for it.
    fn cancel(&mut self, ticket: Ticket) -> bool;
}

/// Ad network stand-in: loads after a delay and grants a random reward,
/// unless the viewer skips.
pub struct FakeAdStore<R> {
    rng: R,
    initialized: bool,
    load_ms: f64,
    watch_ms: f64,
    skip_chance: f64,
    loading: Option<Timer>,
    loaded: bool,
    requests: PendingRequests,
}

impl<R: RngCore> FakeAdStore<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            initialized: false,
            load_ms: DEFAULT_LOAD_MS,
            watch_ms: DEFAULT_WATCH_MS,
            skip_chance: 0.0,
            loading: None,
            loaded: false,
            requests: PendingRequests::default(),
        }
    }

    pub fn with_timings(mut self, load_ms: f64, watch_ms: f64) -> Self {
        self.load_ms = load_ms;
        self.watch_ms = watch_ms;
        self
    }

    pub fn with_skip_chance(mut self, chance: f64) -> Self {
        self.skip_chance = chance;
        self
    }
}

impl<R: RngCore> AdProvider for FakeAdStore<R> {
    fn initialize(&mut self) -> Result<(), MonetizationError> {
        self.initialized = true;
        Ok(())
    }

    fn load_ad(&mut self) -> Result<(), MonetizationError> {
        if !self.initialized {
            return Err(MonetizationError::NotInitialized);
        }
        if !self.loaded && self.loading.is_none() {
            self.loading = Some(Timer::new(self.load_ms));
        }
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn show_ad(&mut self) -> Result<Ticket, MonetizationError> {
        if !self.initialized {
            return Err(MonetizationError::NotInitialized);
        }
        if !self.loaded {
            return Err(MonetizationError::NoAdLoaded);
        }
        self.loaded = false;

        let result = if rng::chance(&mut self.rng, self.skip_chance) {
            Err(MonetizationError::Declined)
        } else {
            rng::pick(&mut self.rng, &AD_REWARDS)
                .cloned()
                .ok_or(MonetizationError::NoAdLoaded)
        };
        let ticket = self.requests.start(self.watch_ms, result);
        tracing::debug!(ticket = ticket.0, "ad shown");
        Ok(ticket)
    }

    fn update(&mut self, now_ms: f64) {
        let delta = self.requests.update(now_ms);
        if let Some(timer) = self.loading.as_mut() {
            if timer.advance(delta) {
                self.loading = None;
                self.loaded = true;
            }
        }
    }

    fn poll(&mut self, ticket: Ticket) -> Result<RequestStatus, MonetizationError> {
        let status = self.requests.poll(ticket)?;
        if let RequestStatus::Failed(e) = &status {
            tracing::warn!(ticket = ticket.0, error = %e, "ad not rewarded");
        }
        Ok(status)
    }

    fn cancel(&mut self, ticket: Ticket) -> bool {
        self.requests.cancel(ticket)
    }
}

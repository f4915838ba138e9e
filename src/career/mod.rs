//! Rapper career: record, release, promote, and watch the weekly numbers.

pub mod actions;
pub mod logic;
pub mod metrics;
pub mod save;
pub mod state;
pub mod trends;

use actions::{Action, Outcome};
use logic::WeekSummary;
use state::GameState;

use crate::config::BalanceConfig;
use crate::error::{GameError, MonetizationError};
use crate::monetization::{self, Reward};
use crate::rng::SimpleRng;
use crate::time::{Clock, Timer, SUMMARY_DELAY_MS};

/// The store the presentation layer holds: state plus the RNG and balance
/// it is advanced with. All mutation goes through [`Session::dispatch`]
/// or [`Session::commit_reward`].
pub struct Session {
    state: GameState,
    balance: BalanceConfig,
    rng: SimpleRng,
    clock: Clock,
    pending_summary: Option<(Timer, WeekSummary)>,
}

impl Session {
    /// New career seeded from the host clock. On wasm32 a stored save is
    /// resumed if one exists.
    pub fn new(artist_name: &str) -> Self {
        let state = GameState::new(artist_name);

        #[cfg(target_arch = "wasm32")]
        let state = match save::load_game() {
            Some(mut s) => {
                s.add_news("Save loaded");
                s
            }
            None => state,
        };

        Self::with_rng(state, SimpleRng::from_clock(), BalanceConfig::default())
    }

    /// Deterministic session for tests and replays.
    pub fn with_seed(state: GameState, seed: u64, balance: BalanceConfig) -> Self {
        Self::with_rng(state, SimpleRng::new(seed), balance)
    }

    fn with_rng(state: GameState, rng: SimpleRng, balance: BalanceConfig) -> Self {
        Self {
            state,
            balance,
            rng,
            clock: Clock::new(),
            pending_summary: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn balance(&self) -> &BalanceConfig {
        &self.balance
    }

    /// Apply one action. Rejected actions leave the state untouched.
    pub fn dispatch(&mut self, action: Action) -> Result<Outcome, GameError> {
        let outcome = logic::apply(&mut self.state, &action, &mut self.rng, &self.balance)
            .map_err(|e| {
                tracing::debug!(error = %e, "action rejected");
                e
            })?;

        if let Outcome::WeekAdvanced(summary) = &outcome {
            self.pending_summary = Some((Timer::new(SUMMARY_DELAY_MS), summary.clone()));
        }
        self.persist();
        Ok(outcome)
    }

    /// Advance from the current week.
    pub fn advance_week(&mut self) -> Result<Outcome, GameError> {
        let from_week = self.state.current_week;
        self.dispatch(Action::AdvanceWeek { from_week })
    }

    /// Apply a reward produced by one of the mocked stores.
    pub fn commit_reward(&mut self, reward: &Reward) -> Result<(), MonetizationError> {
        monetization::commit(reward, &mut self.state)?;
        self.persist();
        Ok(())
    }

    /// Per-frame tick with the host timestamp. Returns the week summary
    /// once its short display delay has passed.
    pub fn update(&mut self, now_ms: f64) -> Option<WeekSummary> {
        let delta = self.clock.update(now_ms);
        let (timer, _) = self.pending_summary.as_mut()?;
        if timer.advance(delta) {
            return self.pending_summary.take().map(|(_, summary)| summary);
        }
        None
    }

    pub fn summary_pending(&self) -> bool {
        self.pending_summary.is_some()
    }

    pub fn next_goal(&self) -> &'static str {
        logic::next_goal(&self.state, &self.balance)
    }

    /// Throw the career away and start over.
    pub fn reset(&mut self, artist_name: &str) {
        Self::forget_save();
        self.state = GameState::new(artist_name);
        self.pending_summary = None;
        tracing::info!(artist = artist_name, "career reset");
    }

    #[cfg(target_arch = "wasm32")]
    fn persist(&self) {
        if let Err(e) = save::save_game(&self.state) {
            tracing::warn!(error = %e, "saving career failed");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn persist(&self) {}

    #[cfg(target_arch = "wasm32")]
    fn forget_save() {
        if let Err(e) = save::delete_save() {
            tracing::warn!(error = %e, "could not delete save");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn forget_save() {}
}

//! Rapper career simulator: the game-state store and weekly economy engine.
//!
//! The presentation layer owns a [`career::Session`] (or drives the pure
//! functions in [`career::logic`] directly), dispatches [`career::actions::Action`]s
//! and renders whatever [`career::metrics`] derives from the state.

pub mod career;
pub mod config;
pub mod error;
pub mod format;
pub mod monetization;
pub mod rng;
pub mod time;

pub use career::Session;
pub use config::BalanceConfig;
pub use error::GameError;

//! Error types for engine actions, saves, config and the mocked stores.

use thiserror::Error;

use crate::career::state::{Platform, SongId};

/// Why a dispatched action was rejected. State is left untouched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GameError {
    #[error("not enough energy (need {need}, have {have})")]
    NotEnoughEnergy { need: u32, have: u32 },

    #[error("unknown song #{0}")]
    UnknownSong(SongId),

    #[error("song #{0} is already released")]
    AlreadyReleased(SongId),

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("artist name must not be empty")]
    EmptyName,

    #[error("post must not be empty")]
    EmptyPost,

    #[error("album needs at least one song")]
    EmptyAlbum,

    #[error("{platform:?} is not a {expected} platform")]
    WrongPlatformKind {
        platform: Platform,
        expected: &'static str,
    },

    #[error("song #{0} is on the track list twice")]
    DuplicateTrack(SongId),

    #[error("the calendar ends at week {0}")]
    CalendarEnded(u32),

    #[error("{0:?} is not set up for this artist")]
    UnknownPlatform(Platform),

    #[error("week already advanced (requested from week {requested}, current week {current})")]
    StaleWeek { requested: u32, current: u32 },
}

/// Save/load failures.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("save version {saved} is older than the minimum compatible version {min}")]
    Incompatible { saved: u32, min: u32 },

    #[error("save storage unavailable: {0}")]
    Storage(String),
}

/// Balance config parsing failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid balance config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("band `{name}` has low {low} above high {high}")]
    InvertedBand { name: &'static str, low: f64, high: f64 },
}

/// Simulated monetization failures. The UI shows a toast; nothing is committed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MonetizationError {
    #[error("store not initialized")]
    NotInitialized,

    #[error("unknown product `{0}`")]
    UnknownProduct(String),

    #[error("unknown request ticket #{0}")]
    UnknownTicket(u32),

    #[error("no ad loaded")]
    NoAdLoaded,

    #[error("simulated transaction failure")]
    Declined,

    #[error("not enough wealth (need {need}, have {have})")]
    InsufficientWealth { need: f64, have: f64 },
}

//! Save / load for the career state.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current save format. Bump when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest format that still loads. Adding
//!   fields does not change it (`#[serde(default)]` fills them in); only
//!   breaking changes such as renamed or repurposed fields raise it.
//!
//! The envelope is `{"version": N, "game": GameState}`. On wasm32 it is
//! kept in localStorage; native builds only get the JSON helpers.

use serde::{Deserialize, Serialize};

use super::state::{GameState, NEWS_CAP, STAT_CAP};
use crate::error::SaveError;

pub const SAVE_VERSION: u32 = 1;

pub const MIN_COMPATIBLE_VERSION: u32 = 1;

#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "rap_career_save";

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameState,
}

pub fn to_json(state: &GameState) -> Result<String, SaveError> {
    let data = SaveData {
        version: SAVE_VERSION,
        game: state.clone(),
    };
    Ok(serde_json::to_string(&data)?)
}

/// Parse a save envelope. Missing fields take their defaults; saves older
/// than [`MIN_COMPATIBLE_VERSION`] are rejected.
pub fn from_json(json: &str) -> Result<GameState, SaveError> {
    let data: SaveData = serde_json::from_str(json)?;

    if data.version < MIN_COMPATIBLE_VERSION {
        return Err(SaveError::Incompatible {
            saved: data.version,
            min: MIN_COMPATIBLE_VERSION,
        });
    }
    if data.version < SAVE_VERSION {
        tracing::info!(
            saved = data.version,
            current = SAVE_VERSION,
            "migrating old save"
        );
    } else if data.version > SAVE_VERSION {
        tracing::warn!(
            saved = data.version,
            current = SAVE_VERSION,
            "save is newer than this build, unknown fields are dropped"
        );
    }

    let mut state = data.game;
    normalize(&mut state);
    Ok(state)
}

/// Repair values a hand-edited or truncated save may carry.
fn normalize(state: &mut GameState) {
    let stats = &mut state.stats;
    for stat in [
        &mut stats.reputation,
        &mut stats.creativity,
        &mut stats.marketing,
        &mut stats.networking,
        &mut stats.fan_loyalty,
    ] {
        *stat = if stat.is_finite() {
            stat.clamp(0.0, STAT_CAP)
        } else {
            0.0
        };
    }
    if !stats.wealth.is_finite() {
        stats.wealth = 0.0;
    }
    stats.energy = stats.energy.min(stats.max_energy);

    // Ids are shared across songs, albums, posts, videos and trends.
    let max_id = state
        .songs
        .iter()
        .map(|s| s.id.0)
        .chain(state.albums.iter().map(|a| a.id.0))
        .chain(state.trends.iter().map(|t| t.id))
        .chain(state.past_trends.iter().map(|t| t.id))
        .chain(state.social.iter().flat_map(|p| p.posts.iter().map(|x| x.id)))
        .chain(state.video.iter().flat_map(|p| p.videos.iter().map(|v| v.id)))
        .max()
        .unwrap_or(0);
    if state.next_id <= max_id {
        state.next_id = max_id.saturating_add(1);
    }

    if state.news.len() > NEWS_CAP {
        let overflow = state.news.len() - NEWS_CAP;
        state.news.drain(..overflow);
    }
}

#[cfg(target_arch = "wasm32")]
fn get_storage() -> Result<web_sys::Storage, SaveError> {
    web_sys::window()
        .ok_or_else(|| SaveError::Storage("no window".into()))?
        .local_storage()
        .map_err(|e| SaveError::Storage(format!("{:?}", e)))?
        .ok_or_else(|| SaveError::Storage("localStorage disabled".into()))
}

#[cfg(target_arch = "wasm32")]
pub fn save_game(state: &GameState) -> Result<(), SaveError> {
    let json = to_json(state)?;
    get_storage()?
        .set_item(STORAGE_KEY, &json)
        .map_err(|e| SaveError::Storage(format!("{:?}", e)))?;
    tracing::debug!(bytes = json.len(), "career saved");
    Ok(())
}

/// Load the stored save. Unreadable or incompatible saves are discarded.
#[cfg(target_arch = "wasm32")]
pub fn load_game() -> Option<GameState> {
    let storage = get_storage().ok()?;
    let json = storage.get_item(STORAGE_KEY).ok()??;

    match from_json(&json) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable save");
            if let Err(e) = storage.remove_item(STORAGE_KEY) {
                tracing::warn!(error = ?e, "could not remove unreadable save");
            }
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn delete_save() -> Result<(), SaveError> {
    get_storage()?
        .remove_item(STORAGE_KEY)
        .map_err(|e| SaveError::Storage(format!("{:?}", e)))
}

//! Market trends: time-boxed modifiers on specific platforms.
//!
//! Lifecycle: a trend is generated one week ahead (`Pending`), affects
//! its platforms for `duration` weeks (`Active`), then is moved to the
//! past list (`Expired`). There is no cancellation and no renewal.

use rand_core::RngCore;
use serde::{Deserialize, Serialize};

use super::state::{GameState, Platform, ALL_PLATFORMS};
use crate::config::BalanceConfig;
use crate::rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendKind {
    Rising,
    Falling,
    Hot,
    Stable,
}

pub const ALL_TREND_KINDS: [TrendKind; 4] = [
    TrendKind::Rising,
    TrendKind::Falling,
    TrendKind::Hot,
    TrendKind::Stable,
];

impl TrendKind {
    /// Weight applied to a trend's impact factor.
    pub fn multiplier(self) -> f64 {
        match self {
            TrendKind::Rising => 1.0,
            TrendKind::Falling => -1.0,
            TrendKind::Hot => 2.0,
            TrendKind::Stable => 0.5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TrendKind::Rising => "Rising",
            TrendKind::Falling => "Falling",
            TrendKind::Hot => "Hot",
            TrendKind::Stable => "Stable",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrendPhase {
    Pending,
    Active,
    Expired,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketTrend {
    pub id: u32,
    pub kind: TrendKind,
    pub platforms: Vec<Platform>,
    pub impact: f64,
    pub start_week: u32,
    pub duration: u32,
}

impl MarketTrend {
    /// First week the trend no longer applies.
    pub fn end_week(&self) -> u32 {
        self.start_week.saturating_add(self.duration)
    }

    pub fn phase_at(&self, week: u32) -> TrendPhase {
        if week < self.start_week {
            TrendPhase::Pending
        } else if week < self.end_week() {
            TrendPhase::Active
        } else {
            TrendPhase::Expired
        }
    }

    pub fn is_active(&self, week: u32) -> bool {
        self.phase_at(week) == TrendPhase::Active
    }

    pub fn affects(&self, platform: Platform) -> bool {
        self.platforms.contains(&platform)
    }

    pub fn describe(&self) -> String {
        let names: Vec<&str> = self.platforms.iter().map(|p| p.name()).collect();
        format!(
            "{} trend on {} (x{:.2}, {} weeks)",
            self.kind.name(),
            names.join(", "),
            self.impact,
            self.duration
        )
    }
}

/// Move every trend that has expired by `week` into the past list.
/// Returns the trends that moved, in their original order.
pub fn expire_trends(state: &mut GameState, week: u32) -> Vec<MarketTrend> {
    let (expired, live): (Vec<_>, Vec<_>) = std::mem::take(&mut state.trends)
        .into_iter()
        .partition(|t| t.phase_at(week) == TrendPhase::Expired);
    state.trends = live;
    for t in &expired {
        tracing::info!(trend = t.id, week, "market trend expired");
        state.add_news(&format!("Trend over: {}", t.describe()));
    }
    state.past_trends.extend(expired.iter().cloned());
    expired
}

/// Roll for a new trend announced at `week`, starting the following week.
pub fn maybe_generate_trend<R: RngCore + ?Sized>(
    state: &mut GameState,
    week: u32,
    rng: &mut R,
    balance: &BalanceConfig,
) -> Option<MarketTrend> {
    if !rng::chance(rng, balance.trend_spawn_chance) {
        return None;
    }

    let kind = *rng::pick(rng, &ALL_TREND_KINDS)?;
    let count = rng::range_inclusive(rng, 1, 3) as usize;
    let mut platforms = Vec::with_capacity(count);
    while platforms.len() < count {
        let p = *rng::pick(rng, &ALL_PLATFORMS)?;
        if !platforms.contains(&p) {
            platforms.push(p);
        }
    }
    platforms.sort();

    let trend = MarketTrend {
        id: state.alloc_id(),
        kind,
        platforms,
        impact: balance.trend_impact.sample(rng),
        start_week: week.saturating_add(1),
        duration: rng::range_inclusive(rng, balance.trend_min_duration, balance.trend_max_duration)
            .max(1),
    };
    tracing::info!(trend = trend.id, start = trend.start_week, kind = ?trend.kind, "market trend generated");
    state.add_news(&format!("New trend next week: {}", trend.describe()));
    state.trends.push(trend.clone());
    Some(trend)
}

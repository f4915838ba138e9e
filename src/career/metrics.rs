//! Derived values the views display. Pure reads: nothing here mutates
//! state, and missing or malformed inputs count as zero.

use std::collections::BTreeMap;

use rand_core::RngCore;

use super::state::{Album, GameState, Platform, ALL_PLATFORMS, CAREER_LEVELS, STAT_CAP};
use super::trends::MarketTrend;
use crate::config::BalanceConfig;

// ── Totals ────────────────────────────────────────────────────────────

pub fn song_streams_total(state: &GameState) -> u64 {
    state
        .songs
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.streams))
}

pub fn platform_streams_total(state: &GameState) -> u64 {
    state
        .streaming
        .iter()
        .fold(0u64, |acc, p| acc.saturating_add(p.total_streams))
}

/// Song-summed and platform-summed totals drift apart (trend boosts only
/// land on platforms); the larger one wins. The two are never reconciled.
pub fn total_streams(state: &GameState) -> u64 {
    song_streams_total(state).max(platform_streams_total(state))
}

/// Social followers plus video subscribers.
pub fn total_followers(state: &GameState) -> u64 {
    let social = state
        .social
        .iter()
        .fold(0u64, |acc, p| acc.saturating_add(p.followers));
    state
        .video
        .iter()
        .fold(social, |acc, p| acc.saturating_add(p.subscribers))
}

pub fn total_monthly_listeners(state: &GameState) -> u64 {
    state
        .streaming
        .iter()
        .fold(0u64, |acc, p| acc.saturating_add(p.monthly_listeners))
}

/// Lifetime revenue across streaming and video platforms.
pub fn total_revenue(state: &GameState) -> f64 {
    let streaming: f64 = state.streaming.iter().map(|p| finite_or_zero(p.revenue)).sum();
    let video: f64 = state.video.iter().map(|p| finite_or_zero(p.revenue)).sum();
    streaming + video
}

/// Each song counts once, even if a loaded save lists it twice.
pub fn album_streams(state: &GameState, album: &Album) -> u64 {
    album
        .song_ids
        .iter()
        .enumerate()
        .filter(|(i, id)| !album.song_ids[..*i].contains(id))
        .filter_map(|(_, id)| state.song(*id))
        .fold(0u64, |acc, s| acc.saturating_add(s.streams))
}

/// Mean critic score, 0 for an unrated album.
pub fn album_rating(album: &Album) -> f64 {
    if album.ratings.is_empty() {
        return 0.0;
    }
    let sum: u32 = album.ratings.iter().map(|&r| r as u32).sum();
    sum as f64 / album.ratings.len() as f64
}

// ── Career level ──────────────────────────────────────────────────────

/// Highest level whose threshold `streams` has reached.
pub fn level_for_streams(streams: u64) -> u32 {
    CAREER_LEVELS
        .iter()
        .rposition(|l| streams >= l.threshold)
        .unwrap_or(0) as u32
}

/// `(current threshold, next threshold)`; `next` is None at the top level.
pub fn level_thresholds(level: u32) -> (u64, Option<u64>) {
    let idx = (level as usize).min(CAREER_LEVELS.len() - 1);
    let next = CAREER_LEVELS.get(idx + 1).map(|l| l.threshold);
    (CAREER_LEVELS[idx].threshold, next)
}

/// Percent of the way from `current` to `next`, clamped to [0, 100].
/// Degenerate or non-finite thresholds give 0.
pub fn level_progress_between(total: f64, current: f64, next: f64) -> f64 {
    let span = next - current;
    if !span.is_finite() || span <= 0.0 || !total.is_finite() {
        return 0.0;
    }
    let pct = (total - current) / span * 100.0;
    if pct.is_nan() {
        return 0.0;
    }
    pct.clamp(0.0, 100.0)
}

/// Progress towards the next career level; 100 once the top level is reached.
pub fn level_progress(state: &GameState) -> f64 {
    let total = total_streams(state);
    let (current, next) = level_thresholds(level_for_streams(total));
    match next {
        Some(next) => level_progress_between(total as f64, current as f64, next as f64),
        None => 100.0,
    }
}

// ── Post engagement ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PostEngagement {
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub views: u64,
}

/// Randomized engagement for a post reaching `followers`, boosted by
/// reputation (0–100 → ×1 to ×2).
pub fn post_engagement<R: RngCore + ?Sized>(
    followers: u64,
    reputation: f64,
    rng: &mut R,
    balance: &BalanceConfig,
) -> PostEngagement {
    let rep_factor = 1.0 + finite_or_zero(reputation).clamp(0.0, STAT_CAP) / 100.0;
    let followers = followers as f64;

    let likes = followers * balance.likes_band.sample(rng) * rep_factor;
    let comments = likes * balance.comments_band.sample(rng);
    let shares = likes * balance.shares_band.sample(rng);
    let views = (followers * balance.views_band.sample(rng) * rep_factor).max(likes);

    PostEngagement {
        likes: to_count(likes),
        comments: to_count(comments),
        shares: to_count(shares),
        views: to_count(views),
    }
}

// ── Market trends ─────────────────────────────────────────────────────

/// Summed `multiplier × impact` of the trends active at `week`, for every
/// platform (0 where nothing applies).
pub fn market_trend_impact(trends: &[MarketTrend], week: u32) -> BTreeMap<Platform, f64> {
    let mut impact: BTreeMap<Platform, f64> = ALL_PLATFORMS.iter().map(|&p| (p, 0.0)).collect();
    for t in trends.iter().filter(|t| t.is_active(week)) {
        let delta = t.kind.multiplier() * finite_or_zero(t.impact);
        for p in &t.platforms {
            *impact.entry(*p).or_insert(0.0) += delta;
        }
    }
    impact
}

/// Impact on one platform from a map built by [`market_trend_impact`].
pub fn impact_on(impact: &BTreeMap<Platform, f64>, platform: Platform) -> f64 {
    impact.get(&platform).copied().unwrap_or(0.0)
}

// ── History ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeeklyGrowth {
    pub streams: i64,
    pub followers: i64,
    pub wealth: f64,
}

/// Change between the two most recent history snapshots.
pub fn weekly_growth(state: &GameState) -> Option<WeeklyGrowth> {
    let n = state.history.len();
    if n < 2 {
        return None;
    }
    let (prev, last) = (&state.history[n - 2], &state.history[n - 1]);
    Some(WeeklyGrowth {
        streams: last.total_streams as i64 - prev.total_streams as i64,
        followers: last.total_followers as i64 - prev.total_followers as i64,
        wealth: finite_or_zero(last.wealth) - finite_or_zero(prev.wealth),
    })
}

// ── Helpers ───────────────────────────────────────────────────────────

pub(crate) fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Floor to a non-negative count; NaN and negatives become 0.
pub(crate) fn to_count(v: f64) -> u64 {
    if v.is_finite() && v > 0.0 {
        v.floor() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::career::state::{PerformanceType, Song, SongId, WeeklyStats};
    use crate::career::trends::TrendKind;
    use crate::rng::SimpleRng;

    fn song(id: u32, streams: u64) -> Song {
        Song {
            id: SongId(id),
            title: format!("Track {}", id),
            streams,
            released: true,
            release_week: Some(1),
            performance: PerformanceType::Normal,
            performance_week: None,
            featuring: Vec::new(),
            cover_art: None,
            quality: 50,
            last_week_streams: 0,
        }
    }

    fn trend(kind: TrendKind, platforms: Vec<Platform>, impact: f64) -> MarketTrend {
        MarketTrend {
            id: 1,
            kind,
            platforms,
            impact,
            start_week: 5,
            duration: 3,
        }
    }

    #[test]
    fn total_streams_takes_song_sum_when_larger() {
        let mut s = GameState::new("X");
        s.songs = vec![song(1, 1_000), song(2, 500)];
        s.streaming[0].total_streams = 200;
        assert_eq!(total_streams(&s), 1_500);
    }

    #[test]
    fn total_streams_takes_platform_sum_when_larger() {
        let mut s = GameState::new("X");
        s.songs = vec![song(1, 100)];
        s.streaming[0].total_streams = 700;
        s.streaming[1].total_streams = 300;
        assert_eq!(total_streams(&s), 1_000);
    }

    #[test]
    fn empty_state_totals_are_zero() {
        let mut s = GameState::new("X");
        s.social.clear();
        s.video.clear();
        assert_eq!(total_streams(&s), 0);
        assert_eq!(total_followers(&s), 0);
        assert_eq!(total_monthly_listeners(&s), 0);
        assert_eq!(total_revenue(&s), 0.0);
    }

    #[test]
    fn followers_include_subscribers() {
        let s = GameState::new("X");
        // 100 + 150 + 50 social, 20 subscribers
        assert_eq!(total_followers(&s), 320);
    }

    #[test]
    fn revenue_ignores_nan() {
        let mut s = GameState::new("X");
        s.streaming[0].revenue = f64::NAN;
        s.streaming[1].revenue = 10.0;
        s.video[0].revenue = 2.5;
        assert_eq!(total_revenue(&s), 12.5);
    }

    #[test]
    fn album_streams_skip_missing_songs() {
        let mut s = GameState::new("X");
        s.songs = vec![song(1, 100), song(2, 50)];
        let album = Album {
            id: crate::career::state::AlbumId(9),
            title: "LP".into(),
            song_ids: vec![SongId(1), SongId(42), SongId(2)],
            streams: 0,
            release_week: 1,
            ratings: vec![7, 8, 9],
        };
        assert_eq!(album_streams(&s, &album), 150);
        assert_eq!(album_rating(&album), 8.0);
    }

    #[test]
    fn album_streams_count_each_song_once() {
        let mut s = GameState::new("X");
        s.songs = vec![song(1, 1_000)];
        let album = Album {
            id: crate::career::state::AlbumId(9),
            title: "Repeat".into(),
            song_ids: vec![SongId(1), SongId(1), SongId(1)],
            streams: 0,
            release_week: 1,
            ratings: Vec::new(),
        };
        assert_eq!(album_streams(&s, &album), 1_000);
    }

    #[test]
    fn levels_from_streams() {
        assert_eq!(level_for_streams(0), 0);
        assert_eq!(level_for_streams(9_999), 0);
        assert_eq!(level_for_streams(10_000), 1);
        assert_eq!(level_for_streams(u64::MAX), (CAREER_LEVELS.len() - 1) as u32);
    }

    #[test]
    fn progress_midway() {
        assert_eq!(level_progress_between(15.0, 10.0, 20.0), 50.0);
    }

    #[test]
    fn progress_degenerate_is_zero() {
        assert_eq!(level_progress_between(10.0, 10.0, 10.0), 0.0);
        assert_eq!(level_progress_between(10.0, 20.0, 10.0), 0.0);
        assert_eq!(level_progress_between(f64::NAN, 0.0, 10.0), 0.0);
        assert_eq!(level_progress_between(5.0, 0.0, f64::INFINITY), 0.0);
    }

    #[test]
    fn progress_clamped() {
        assert_eq!(level_progress_between(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(level_progress_between(50.0, 0.0, 10.0), 100.0);
    }

    #[test]
    fn progress_for_state() {
        let mut s = GameState::new("X");
        s.songs = vec![song(1, 5_000)];
        assert_eq!(level_progress(&s), 50.0);
        s.songs = vec![song(1, u64::MAX)];
        assert_eq!(level_progress(&s), 100.0);
    }

    #[test]
    fn engagement_zero_followers() {
        let mut rng = SimpleRng::new(1);
        let e = post_engagement(0, 50.0, &mut rng, &BalanceConfig::default());
        assert_eq!(e, PostEngagement::default());
    }

    #[test]
    fn engagement_within_bands() {
        let mut rng = SimpleRng::new(2);
        let balance = BalanceConfig::default();
        for _ in 0..200 {
            let e = post_engagement(10_000, 0.0, &mut rng, &balance);
            assert!(e.likes >= 1_000 && e.likes <= 3_000, "likes {}", e.likes);
            assert!(e.comments <= e.likes);
            assert!(e.shares <= e.likes);
            assert!(e.views >= e.likes);
        }
    }

    #[test]
    fn reputation_boosts_engagement() {
        let balance = BalanceConfig::default();
        let low = post_engagement(10_000, 0.0, &mut SimpleRng::new(3), &balance);
        let high = post_engagement(10_000, 100.0, &mut SimpleRng::new(3), &balance);
        assert!(high.likes > low.likes);
    }

    #[test]
    fn engagement_nan_reputation() {
        let mut rng = SimpleRng::new(4);
        let e = post_engagement(1_000, f64::NAN, &mut rng, &BalanceConfig::default());
        assert!(e.likes <= 300);
    }

    #[test]
    fn trend_impact_weights() {
        let trends = vec![
            trend(TrendKind::Hot, vec![Platform::Spotify], 0.1),
            trend(TrendKind::Falling, vec![Platform::Spotify, Platform::TikTok], 0.05),
            trend(TrendKind::Stable, vec![Platform::YouTube], 0.2),
        ];
        let impact = market_trend_impact(&trends, 6);
        assert!((impact_on(&impact, Platform::Spotify) - 0.15).abs() < 1e-12);
        assert!((impact_on(&impact, Platform::TikTok) + 0.05).abs() < 1e-12);
        assert!((impact_on(&impact, Platform::YouTube) - 0.1).abs() < 1e-12);
        assert_eq!(impact_on(&impact, Platform::Twitter), 0.0);
    }

    #[test]
    fn inactive_trends_have_no_impact() {
        let trends = vec![trend(TrendKind::Rising, vec![Platform::Spotify], 0.3)];
        assert_eq!(impact_on(&market_trend_impact(&trends, 4), Platform::Spotify), 0.0);
        assert_eq!(impact_on(&market_trend_impact(&trends, 8), Platform::Spotify), 0.0);
        assert_eq!(impact_on(&market_trend_impact(&trends, 7), Platform::Spotify), 0.3);
    }

    #[test]
    fn growth_needs_two_snapshots() {
        let mut s = GameState::new("X");
        assert!(weekly_growth(&s).is_none());
        s.history.push(WeeklyStats { week: 2, total_streams: 100, total_followers: 10, wealth: 50.0 });
        s.history.push(WeeklyStats { week: 3, total_streams: 250, total_followers: 8, wealth: 80.0 });
        let g = weekly_growth(&s).unwrap();
        assert_eq!(g.streams, 150);
        assert_eq!(g.followers, -2);
        assert_eq!(g.wealth, 30.0);
    }

    #[test]
    fn aggregators_are_idempotent() {
        let mut s = GameState::new("X");
        s.songs = vec![song(1, 12_345)];
        let before = s.clone();
        assert_eq!(total_streams(&s), total_streams(&s));
        assert_eq!(total_followers(&s), total_followers(&s));
        assert_eq!(level_progress(&s), level_progress(&s));
        assert_eq!(s, before);
    }
}

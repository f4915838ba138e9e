//! Career game logic: the weekly tick and the action reducer.
//! Pure game logic (no rendering / IO); all randomness comes from the
//! caller's RNG.

use std::collections::BTreeMap;

use rand_core::RngCore;

use super::actions::{Action, Outcome};
use super::metrics::{
    album_streams, impact_on, level_for_streams, market_trend_impact, post_engagement, to_count,
    total_followers, total_streams, PostEngagement,
};
use super::state::{
    add_stat, platform_info, Album, AlbumId, GameState, PerformanceType, Platform, PlatformKind,
    SocialPost, Song, SongId, Stats, Video, WeeklyStats, CAREER_LEVELS, SOCIAL_PLATFORMS,
};
use super::trends::{expire_trends, maybe_generate_trend};
use crate::config::BalanceConfig;
use crate::error::GameError;
use crate::format::{format_money, format_number};
use crate::rng;

/// Posts kept per social platform.
const POST_HISTORY_CAP: usize = 50;

/// Reputation gained per career level reached.
const LEVEL_UP_REPUTATION: f64 = 2.0;

/// Result of one weekly tick, shown in the summary dialog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeekSummary {
    pub week: u32,
    pub streams_gained: u64,
    pub followers_gained: i64,
    pub revenue: f64,
    pub transitions: Vec<SongTransition>,
    pub expired_trends: Vec<u32>,
    pub new_trend: Option<u32>,
    /// New career level, if one was reached this week.
    pub level_up: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SongTransition {
    pub song_id: SongId,
    pub from: PerformanceType,
    pub to: PerformanceType,
}

// ── Advance Week ──────────────────────────────────────────────────────

/// Advance the game by one week. This is the core turn action.
///
/// The week counter saturates at `u32::MAX`; [`apply`] refuses to advance
/// past it with [`GameError::CalendarEnded`].
pub fn advance_week<R: RngCore + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
    balance: &BalanceConfig,
) -> WeekSummary {
    let week = state.current_week.saturating_add(1);
    state.current_week = week;
    let followers_before = total_followers(state);
    let level_before = state.stats.career_level;

    // Trend lifecycle, then this week's per-platform modifiers
    let expired = expire_trends(state, week);
    let new_trend = maybe_generate_trend(state, week, rng, balance);
    let impact = market_trend_impact(&state.trends, week);

    // Songs: at most one performance transition each, then streams
    let audience = followers_before as f64;
    let stats = state.stats.clone();
    let mut transitions = Vec::new();
    let mut week_streams = 0u64;
    let mut viral_count = 0u64;
    for song in state.songs.iter_mut().filter(|s| s.released) {
        if let Some(t) = roll_transition(song, week, &stats, rng, balance) {
            song.performance = t.to;
            song.performance_week = Some(week);
            transitions.push(t);
        }
        let weekly = weekly_song_streams(song, week, audience, &stats, rng, balance);
        song.last_week_streams = weekly;
        song.streams = song.streams.saturating_add(weekly);
        week_streams = week_streams.saturating_add(weekly);
        if song.performance == PerformanceType::Viral {
            viral_count += 1;
        }
    }
    for t in &transitions {
        let title = state.song(t.song_id).map(|s| s.title.clone()).unwrap_or_default();
        state.add_news(&transition_news(&title, t.to));
    }

    refresh_album_streams(state);
    let streaming_revenue = distribute_streams(state, week_streams, &impact, balance);
    grow_social(state, week_streams, viral_count, &impact, balance);
    let video_revenue = accrue_video(state, week, &impact, balance);

    let revenue = streaming_revenue + video_revenue;
    if revenue.is_finite() {
        state.stats.wealth += revenue;
    }

    // Career level follows cumulative streams and never drops
    let total = total_streams(state);
    let level = level_for_streams(total).max(level_before);
    let level_up = if level > level_before {
        state.stats.career_level = level;
        add_stat(
            &mut state.stats.reputation,
            LEVEL_UP_REPUTATION * (level - level_before) as f64,
        );
        let name = CAREER_LEVELS[(level as usize).min(CAREER_LEVELS.len() - 1)].name;
        state.add_news(&format!("Level up! You are now a {}", name));
        tracing::info!(level, "career level up");
        Some(level)
    } else {
        None
    };

    state.stats.energy = state.stats.max_energy;

    let followers_after = total_followers(state);
    state.history.push(WeeklyStats {
        week,
        total_streams: total,
        total_followers: followers_after,
        wealth: state.stats.wealth,
    });
    state.add_news(&format!(
        "Week {}: {} streams, {} earned",
        week,
        format_number(week_streams as f64),
        format_money(revenue),
    ));

    tracing::info!(
        week,
        streams = week_streams,
        revenue,
        transitions = transitions.len(),
        "week advanced"
    );

    WeekSummary {
        week,
        streams_gained: week_streams,
        followers_gained: followers_after as i64 - followers_before as i64,
        revenue,
        transitions,
        expired_trends: expired.iter().map(|t| t.id).collect(),
        new_trend: new_trend.map(|t| t.id),
        level_up,
    }
}

/// Non-mutating form of [`advance_week`].
pub fn next_week<R: RngCore + ?Sized>(
    state: &GameState,
    rng: &mut R,
    balance: &BalanceConfig,
) -> (GameState, WeekSummary) {
    let mut next = state.clone();
    let summary = advance_week(&mut next, rng, balance);
    (next, summary)
}

// ── Song performance ──────────────────────────────────────────────────

fn roll_transition<R: RngCore + ?Sized>(
    song: &Song,
    week: u32,
    stats: &Stats,
    rng: &mut R,
    balance: &BalanceConfig,
) -> Option<SongTransition> {
    // Always three draws, whatever the outcome.
    let viral_roll = rng::unit(rng);
    let flop_roll = rng::unit(rng);
    let comeback_roll = rng::unit(rng);

    let age = song.age_at(week).unwrap_or(0);
    let from = song.performance;

    let tag_expired = from != PerformanceType::Normal
        && song
            .performance_week
            .map_or(true, |w| week.saturating_sub(w) >= balance.status_duration_weeks);

    let to = if tag_expired {
        PerformanceType::Normal
    } else if from != PerformanceType::Viral && viral_roll < viral_chance(song, stats, balance) {
        PerformanceType::Viral
    } else if from == PerformanceType::Normal
        && age <= balance.flop_window_weeks
        && flop_roll < flop_chance(song, balance)
    {
        PerformanceType::Flop
    } else if matches!(from, PerformanceType::Normal | PerformanceType::Flop)
        && age >= balance.comeback_min_age_weeks
        && comeback_roll < comeback_chance(stats, balance)
    {
        PerformanceType::Comeback
    } else {
        return None;
    };

    Some(SongTransition {
        song_id: song.id,
        from,
        to,
    })
}

pub fn viral_chance(song: &Song, stats: &Stats, balance: &BalanceConfig) -> f64 {
    let pull = (stat(stats.marketing) + stat(stats.reputation)) / 200.0;
    balance.viral_base_chance * (1.0 + pull) * song.tier().viral_factor()
}

pub fn flop_chance(song: &Song, balance: &BalanceConfig) -> f64 {
    balance.flop_base_chance * (1.0 - song.quality.min(100) as f64 / 100.0)
}

pub fn comeback_chance(stats: &Stats, balance: &BalanceConfig) -> f64 {
    balance.comeback_base_chance * (1.0 + stat(stats.fan_loyalty) / 100.0)
}

pub fn performance_multiplier(performance: PerformanceType, balance: &BalanceConfig) -> f64 {
    match performance {
        PerformanceType::Normal => 1.0,
        PerformanceType::Viral => balance.viral_multiplier,
        PerformanceType::Flop => balance.flop_multiplier,
        PerformanceType::Comeback => balance.comeback_multiplier,
    }
}

fn weekly_song_streams<R: RngCore + ?Sized>(
    song: &Song,
    week: u32,
    audience: f64,
    stats: &Stats,
    rng: &mut R,
    balance: &BalanceConfig,
) -> u64 {
    let age = song.age_at(week).unwrap_or(0);
    let base = song.tier().base_weekly_streams() + audience * balance.follower_stream_rate;
    let loyalty = 1.0 + stat(stats.fan_loyalty) / 100.0;
    let noise = balance.stream_noise.sample(rng);
    to_count(
        base * loyalty
            * age_decay(age, balance)
            * performance_multiplier(song.performance, balance)
            * noise,
    )
}

fn age_decay(age: u32, balance: &BalanceConfig) -> f64 {
    let exp = age.min(i32::MAX as u32) as i32;
    balance.weekly_decay.powi(exp).max(balance.decay_floor)
}

fn transition_news(title: &str, to: PerformanceType) -> String {
    match to {
        PerformanceType::Viral => format!("\"{}\" is going viral!", title),
        PerformanceType::Flop => format!("\"{}\" flopped", title),
        PerformanceType::Comeback => format!("\"{}\" is making a comeback", title),
        PerformanceType::Normal => format!("\"{}\" settled back down", title),
    }
}

// ── Platforms ─────────────────────────────────────────────────────────

fn refresh_album_streams(state: &mut GameState) {
    let totals: Vec<u64> = state.albums.iter().map(|a| album_streams(state, a)).collect();
    for (album, total) in state.albums.iter_mut().zip(totals) {
        album.streams = total;
    }
}

fn trend_boost(impact: &BTreeMap<Platform, f64>, platform: Platform) -> f64 {
    (1.0 + impact_on(impact, platform)).max(0.0)
}

/// Split the week's streams across streaming services. Returns revenue.
fn distribute_streams(
    state: &mut GameState,
    week_streams: u64,
    impact: &BTreeMap<Platform, f64>,
    balance: &BalanceConfig,
) -> f64 {
    let mut revenue = 0.0;
    for p in state.streaming.iter_mut() {
        let info = platform_info(p.platform);
        let streams = to_count(week_streams as f64 * info.stream_share * trend_boost(impact, p.platform));
        let earned = streams as f64 * info.pay_per_stream;
        p.total_streams = p.total_streams.saturating_add(streams);
        p.revenue += earned;
        p.monthly_listeners = to_count(streams as f64 * 4.0 / balance.streams_per_listener.max(1.0));
        revenue += earned;
    }
    revenue
}

fn grow_social(
    state: &mut GameState,
    week_streams: u64,
    viral_count: u64,
    impact: &BTreeMap<Platform, f64>,
    balance: &BalanceConfig,
) {
    let rep = 1.0 + stat(state.stats.reputation) / 100.0;
    let converted =
        week_streams as f64 * balance.stream_follower_conversion / SOCIAL_PLATFORMS.len() as f64;
    let viral = viral_count.saturating_mul(balance.viral_follower_bonus) as f64;
    for p in state.social.iter_mut() {
        let organic = p.followers as f64 * balance.follower_growth_rate * rep;
        let gained = to_count((organic + converted + viral) * trend_boost(impact, p.platform));
        p.followers = p.followers.saturating_add(gained);
    }
}

/// Weekly views on every uploaded video. Returns revenue.
fn accrue_video(
    state: &mut GameState,
    week: u32,
    impact: &BTreeMap<Platform, f64>,
    balance: &BalanceConfig,
) -> f64 {
    let mut revenue = 0.0;
    for p in state.video.iter_mut() {
        let boost = trend_boost(impact, p.platform);
        let reach = p.subscribers as f64 * balance.video_view_rate + balance.video_base_views;
        let mut week_views = 0u64;
        for v in p.videos.iter_mut() {
            let views = to_count(reach * age_decay(week.saturating_sub(v.week), balance) * boost);
            v.views = v.views.saturating_add(views);
            week_views = week_views.saturating_add(views);
        }
        let earned = week_views as f64 * balance.video_revenue_per_view;
        p.total_views = p.total_views.saturating_add(week_views);
        p.revenue += earned;
        p.subscribers = p
            .subscribers
            .saturating_add(to_count(week_views as f64 * balance.view_subscriber_conversion));
        revenue += earned;
    }
    revenue
}

// ── Reducer ───────────────────────────────────────────────────────────

/// Apply one action in place. On error the state is unchanged.
pub fn apply<R: RngCore + ?Sized>(
    state: &mut GameState,
    action: &Action,
    rng: &mut R,
    balance: &BalanceConfig,
) -> Result<Outcome, GameError> {
    match action {
        Action::AdvanceWeek { from_week } => {
            if *from_week != state.current_week {
                return Err(GameError::StaleWeek {
                    requested: *from_week,
                    current: state.current_week,
                });
            }
            if state.current_week == u32::MAX {
                return Err(GameError::CalendarEnded(u32::MAX));
            }
            Ok(Outcome::WeekAdvanced(advance_week(state, rng, balance)))
        }
        Action::RecordSong {
            title,
            featuring,
            cover_art,
        } => record_song(state, title, featuring, cover_art.clone(), rng, balance),
        Action::ReleaseSong { song_id } => release_song(state, *song_id),
        Action::ReleaseAlbum { title, song_ids } => release_album(state, title, song_ids, rng),
        Action::CreatePost { platform, content } => {
            create_post(state, *platform, content, rng, balance)
        }
        Action::UploadVideo {
            platform,
            title,
            song_id,
        } => upload_video(state, *platform, title, *song_id, rng, balance),
        Action::EditProfile {
            name,
            about,
            profile_image,
            cover_image,
        } => edit_profile(state, name, about, profile_image, cover_image),
    }
}

/// Non-mutating form of [`apply`].
pub fn reduce<R: RngCore + ?Sized>(
    state: &GameState,
    action: &Action,
    rng: &mut R,
    balance: &BalanceConfig,
) -> Result<(GameState, Outcome), GameError> {
    let mut next = state.clone();
    let outcome = apply(&mut next, action, rng, balance)?;
    Ok((next, outcome))
}

fn spend_energy(state: &mut GameState, cost: u32) -> Result<(), GameError> {
    if state.stats.energy < cost {
        return Err(GameError::NotEnoughEnergy {
            need: cost,
            have: state.stats.energy,
        });
    }
    state.stats.energy -= cost;
    Ok(())
}

fn record_song<R: RngCore + ?Sized>(
    state: &mut GameState,
    title: &str,
    featuring: &[String],
    cover_art: Option<String>,
    rng: &mut R,
    balance: &BalanceConfig,
) -> Result<Outcome, GameError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(GameError::EmptyTitle);
    }
    spend_energy(state, balance.record_energy)?;

    let quality = (stat(state.stats.creativity) * 0.6 + rng::uniform(rng, 0.0, 40.0))
        .clamp(1.0, 100.0) as u8;
    let song_id = SongId(state.alloc_id());
    state.songs.push(Song {
        id: song_id,
        title: title.to_string(),
        streams: 0,
        released: false,
        release_week: None,
        performance: PerformanceType::Normal,
        performance_week: None,
        featuring: featuring
            .iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect(),
        cover_art,
        quality,
        last_week_streams: 0,
    });
    add_stat(&mut state.stats.creativity, 1.0);
    state.add_news(&format!("Recorded \"{}\" (quality {})", title, quality));
    tracing::debug!(song = song_id.0, quality, "song recorded");
    Ok(Outcome::SongRecorded { song_id, quality })
}

fn release_song(state: &mut GameState, song_id: SongId) -> Result<Outcome, GameError> {
    let week = state.current_week;
    let song = state
        .song_mut(song_id)
        .ok_or(GameError::UnknownSong(song_id))?;
    if song.released {
        return Err(GameError::AlreadyReleased(song_id));
    }
    mark_released(song, week);
    let title = song.title.clone();
    add_stat(&mut state.stats.reputation, 0.5);
    state.add_news(&format!("Released \"{}\"", title));
    tracing::debug!(song = song_id.0, week, "song released");
    Ok(Outcome::SongReleased { song_id })
}

fn mark_released(song: &mut Song, week: u32) {
    song.released = true;
    song.release_week = Some(week);
    song.performance = PerformanceType::Normal;
    song.performance_week = None;
}

fn release_album<R: RngCore + ?Sized>(
    state: &mut GameState,
    title: &str,
    song_ids: &[SongId],
    rng: &mut R,
) -> Result<Outcome, GameError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(GameError::EmptyTitle);
    }
    if song_ids.is_empty() {
        return Err(GameError::EmptyAlbum);
    }
    for (i, id) in song_ids.iter().enumerate() {
        if song_ids[..i].contains(id) {
            return Err(GameError::DuplicateTrack(*id));
        }
    }

    let week = state.current_week;
    let mut quality_sum = 0u32;
    let mut found = 0u32;
    for id in song_ids {
        if let Some(song) = state.song_mut(*id) {
            if !song.released {
                mark_released(song, week);
            }
            quality_sum += song.quality as u32;
            found += 1;
        }
    }
    // Dangling ids stay on the track list; every reader skips them.
    let avg_quality = if found > 0 {
        quality_sum as f64 / found as f64
    } else {
        30.0
    };
    let ratings: Vec<u8> = (0..3)
        .map(|_| (avg_quality / 10.0 + rng::uniform(rng, -1.5, 1.5)).round().clamp(1.0, 10.0) as u8)
        .collect();

    let album_id = AlbumId(state.alloc_id());
    let mut album = Album {
        id: album_id,
        title: title.to_string(),
        song_ids: song_ids.to_vec(),
        streams: 0,
        release_week: week,
        ratings: ratings.clone(),
    };
    album.streams = album_streams(state, &album);
    state.albums.push(album);

    add_stat(&mut state.stats.fan_loyalty, 2.0);
    add_stat(&mut state.stats.reputation, 1.0);
    state.add_news(&format!("Album \"{}\" is out ({} tracks)", title, song_ids.len()));
    tracing::info!(album = album_id.0, tracks = song_ids.len(), "album released");
    Ok(Outcome::AlbumReleased { album_id, ratings })
}

fn create_post<R: RngCore + ?Sized>(
    state: &mut GameState,
    platform: Platform,
    content: &str,
    rng: &mut R,
    balance: &BalanceConfig,
) -> Result<Outcome, GameError> {
    if platform.kind() != PlatformKind::Social {
        return Err(GameError::WrongPlatformKind {
            platform,
            expected: PlatformKind::Social.name(),
        });
    }
    let content = content.trim();
    if content.is_empty() {
        return Err(GameError::EmptyPost);
    }
    let followers = state
        .social_platform(platform)
        .map(|p| p.followers)
        .ok_or(GameError::UnknownPlatform(platform))?;
    spend_energy(state, balance.post_energy)?;

    let engagement: PostEngagement =
        post_engagement(followers, state.stats.reputation, rng, balance);
    let post_id = state.alloc_id();
    let week = state.current_week;
    let new_followers = to_count(engagement.shares as f64 * balance.share_follow_rate);
    if let Some(p) = state.social_platform_mut(platform) {
        p.followers = p.followers.saturating_add(new_followers);
        p.posts.push(SocialPost {
            id: post_id,
            week,
            content: content.to_string(),
            likes: engagement.likes,
            comments: engagement.comments,
            shares: engagement.shares,
            views: engagement.views,
        });
        if p.posts.len() > POST_HISTORY_CAP {
            let overflow = p.posts.len() - POST_HISTORY_CAP;
            p.posts.drain(..overflow);
        }
    }
    add_stat(&mut state.stats.marketing, 0.5);
    tracing::debug!(post = post_id, platform = ?platform, likes = engagement.likes, "post created");
    Ok(Outcome::Posted {
        post_id,
        engagement,
    })
}

fn upload_video<R: RngCore + ?Sized>(
    state: &mut GameState,
    platform: Platform,
    title: &str,
    song_id: Option<SongId>,
    rng: &mut R,
    balance: &BalanceConfig,
) -> Result<Outcome, GameError> {
    if platform.kind() != PlatformKind::Video {
        return Err(GameError::WrongPlatformKind {
            platform,
            expected: PlatformKind::Video.name(),
        });
    }
    let title = title.trim();
    if title.is_empty() {
        return Err(GameError::EmptyTitle);
    }
    let song_viral = match song_id {
        Some(id) => state.song(id).ok_or(GameError::UnknownSong(id))?.performance
            == PerformanceType::Viral,
        None => false,
    };
    let subscribers = state
        .video
        .iter()
        .find(|p| p.platform == platform)
        .map(|p| p.subscribers)
        .ok_or(GameError::UnknownPlatform(platform))?;
    spend_energy(state, balance.video_energy)?;

    let mut premiere = subscribers as f64 * rng::uniform(rng, 0.2, 0.6) + balance.video_base_views;
    if song_viral {
        premiere *= 2.0;
    }
    let views = to_count(premiere);
    let video_id = state.alloc_id();
    let week = state.current_week;
    // Premiere views pay and convert like weekly views.
    let earned = views as f64 * balance.video_revenue_per_view;
    if let Some(p) = state.video_platform_mut(platform) {
        p.total_views = p.total_views.saturating_add(views);
        p.revenue += earned;
        p.subscribers = p
            .subscribers
            .saturating_add(to_count(views as f64 * balance.view_subscriber_conversion));
        p.videos.push(Video {
            id: video_id,
            title: title.to_string(),
            week,
            song_id,
            views,
        });
    }
    state.stats.wealth += earned;
    state.add_news(&format!("Uploaded \"{}\" ({} views)", title, format_number(views as f64)));
    tracing::debug!(video = video_id, views, "video uploaded");
    Ok(Outcome::VideoUploaded { video_id, views })
}

fn edit_profile(
    state: &mut GameState,
    name: &Option<String>,
    about: &Option<String>,
    profile_image: &Option<String>,
    cover_image: &Option<String>,
) -> Result<Outcome, GameError> {
    if let Some(name) = name {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::EmptyName);
        }
        state.character.name = name.to_string();
    }
    if let Some(about) = about {
        state.character.about = about.clone();
    }
    if let Some(img) = profile_image {
        state.character.profile_image = Some(img.clone());
    }
    if let Some(img) = cover_image {
        state.character.cover_image = Some(img.clone());
    }
    Ok(Outcome::ProfileUpdated)
}

// ── Queries ───────────────────────────────────────────────────────────

pub fn can_afford(state: &GameState, energy_cost: u32) -> bool {
    state.stats.energy >= energy_cost
}

/// Short hint about what the player should do next.
pub fn next_goal(state: &GameState, balance: &BalanceConfig) -> &'static str {
    if state.songs.is_empty() {
        if can_afford(state, balance.record_energy) {
            return "Record your first song";
        }
        return "Advance the week to refill energy";
    }
    if state.released_songs().next().is_none() {
        return "Release a song to start streaming";
    }
    let posted = state.social.iter().any(|p| !p.posts.is_empty());
    if !posted && can_afford(state, balance.post_energy) {
        return "Post on social media to grow your following";
    }
    if state.video.iter().all(|p| p.videos.is_empty()) && can_afford(state, balance.video_energy) {
        return "Upload a music video";
    }
    let unreleased = state.songs.iter().filter(|s| !s.released).count();
    if unreleased >= 3 {
        return "Bundle your unreleased songs into an album";
    }
    if !can_afford(state, balance.post_energy) {
        return "Out of energy: advance to the next week";
    }
    "Keep releasing music and promoting it"
}

fn stat(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

//! Career game state: the single in-memory source of truth.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::trends::MarketTrend;

// ── Ids ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlbumId(pub u32);

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for AlbumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Songs ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceType {
    #[default]
    Normal,
    Viral,
    Flop,
    Comeback,
}

pub const ALL_PERFORMANCE_TYPES: [PerformanceType; 4] = [
    PerformanceType::Normal,
    PerformanceType::Viral,
    PerformanceType::Flop,
    PerformanceType::Comeback,
];

impl PerformanceType {
    pub fn name(self) -> &'static str {
        match self {
            PerformanceType::Normal => "normal",
            PerformanceType::Viral => "viral",
            PerformanceType::Flop => "flop",
            PerformanceType::Comeback => "comeback",
        }
    }
}

/// Quality bracket of a song; sets its baseline weekly streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SongTier {
    Demo,
    Solid,
    Banger,
    Classic,
}

impl SongTier {
    pub fn from_quality(quality: u8) -> Self {
        match quality {
            0..=39 => SongTier::Demo,
            40..=64 => SongTier::Solid,
            65..=84 => SongTier::Banger,
            _ => SongTier::Classic,
        }
    }

    pub fn base_weekly_streams(self) -> f64 {
        match self {
            SongTier::Demo => 150.0,
            SongTier::Solid => 800.0,
            SongTier::Banger => 3_000.0,
            SongTier::Classic => 10_000.0,
        }
    }

    /// Scales the chance of going viral.
    pub fn viral_factor(self) -> f64 {
        match self {
            SongTier::Demo => 0.5,
            SongTier::Solid => 1.0,
            SongTier::Banger => 1.5,
            SongTier::Classic => 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    /// Cumulative, never decreases.
    pub streams: u64,
    pub released: bool,
    pub release_week: Option<u32>,
    pub performance: PerformanceType,
    /// Week the current performance tag was applied.
    pub performance_week: Option<u32>,
    #[serde(default)]
    pub featuring: Vec<String>,
    #[serde(default)]
    pub cover_art: Option<String>,
    pub quality: u8,
    #[serde(default)]
    pub last_week_streams: u64,
}

impl Song {
    pub fn tier(&self) -> SongTier {
        SongTier::from_quality(self.quality)
    }

    /// Whole weeks since release at `week`; None while unreleased.
    pub fn age_at(&self, week: u32) -> Option<u32> {
        if !self.released {
            return None;
        }
        self.release_week.map(|r| week.saturating_sub(r))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    /// Ordered track list. May reference songs that no longer exist.
    pub song_ids: Vec<SongId>,
    pub streams: u64,
    pub release_week: u32,
    /// Critic scores, 1–10.
    #[serde(default)]
    pub ratings: Vec<u8>,
}

// ── Platforms ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformKind {
    Streaming,
    Social,
    Video,
}

impl PlatformKind {
    pub fn name(self) -> &'static str {
        match self {
            PlatformKind::Streaming => "streaming",
            PlatformKind::Social => "social",
            PlatformKind::Video => "video",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    Spotify,
    AppleMusic,
    YouTubeMusic,
    Twitter,
    Instagram,
    TikTok,
    YouTube,
}

pub const ALL_PLATFORMS: [Platform; 7] = [
    Platform::Spotify,
    Platform::AppleMusic,
    Platform::YouTubeMusic,
    Platform::Twitter,
    Platform::Instagram,
    Platform::TikTok,
    Platform::YouTube,
];

pub const STREAMING_PLATFORMS: [Platform; 3] =
    [Platform::Spotify, Platform::AppleMusic, Platform::YouTubeMusic];

pub const SOCIAL_PLATFORMS: [Platform; 3] =
    [Platform::Twitter, Platform::Instagram, Platform::TikTok];

/// Static info about a platform.
pub struct PlatformInfo {
    pub name: &'static str,
    pub kind: PlatformKind,
    /// Fraction of a song's weekly streams played on this service.
    pub stream_share: f64,
    pub pay_per_stream: f64,
}

pub fn platform_info(platform: Platform) -> PlatformInfo {
    match platform {
        Platform::Spotify => PlatformInfo {
            name: "Spotify",
            kind: PlatformKind::Streaming,
            stream_share: 0.55,
            pay_per_stream: 0.004,
        },
        Platform::AppleMusic => PlatformInfo {
            name: "Apple Music",
            kind: PlatformKind::Streaming,
            stream_share: 0.25,
            pay_per_stream: 0.007,
        },
        Platform::YouTubeMusic => PlatformInfo {
            name: "YouTube Music",
            kind: PlatformKind::Streaming,
            stream_share: 0.20,
            pay_per_stream: 0.002,
        },
        Platform::Twitter => PlatformInfo {
            name: "Twitter",
            kind: PlatformKind::Social,
            stream_share: 0.0,
            pay_per_stream: 0.0,
        },
        Platform::Instagram => PlatformInfo {
            name: "Instagram",
            kind: PlatformKind::Social,
            stream_share: 0.0,
            pay_per_stream: 0.0,
        },
        Platform::TikTok => PlatformInfo {
            name: "TikTok",
            kind: PlatformKind::Social,
            stream_share: 0.0,
            pay_per_stream: 0.0,
        },
        Platform::YouTube => PlatformInfo {
            name: "YouTube",
            kind: PlatformKind::Video,
            stream_share: 0.0,
            pay_per_stream: 0.0,
        },
    }
}

impl Platform {
    pub fn name(self) -> &'static str {
        platform_info(self).name
    }

    pub fn kind(self) -> PlatformKind {
        platform_info(self).kind
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreamingPlatform {
    pub platform: Platform,
    pub monthly_listeners: u64,
    pub total_streams: u64,
    pub revenue: f64,
}

impl StreamingPlatform {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            monthly_listeners: 0,
            total_streams: 0,
            revenue: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SocialPost {
    pub id: u32,
    pub week: u32,
    pub content: String,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub views: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SocialPlatform {
    pub platform: Platform,
    pub followers: u64,
    #[serde(default)]
    pub posts: Vec<SocialPost>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: u32,
    pub title: String,
    pub week: u32,
    pub song_id: Option<SongId>,
    pub views: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoPlatform {
    pub platform: Platform,
    pub subscribers: u64,
    pub total_views: u64,
    pub revenue: f64,
    #[serde(default)]
    pub videos: Vec<Video>,
}

// ── Career levels ─────────────────────────────────────────────────────

pub struct CareerLevelInfo {
    pub name: &'static str,
    /// Cumulative streams needed to reach this level.
    pub threshold: u64,
}

pub const CAREER_LEVELS: [CareerLevelInfo; 10] = [
    CareerLevelInfo { name: "Bedroom Rapper", threshold: 0 },
    CareerLevelInfo { name: "Local Act", threshold: 10_000 },
    CareerLevelInfo { name: "Underground Buzz", threshold: 50_000 },
    CareerLevelInfo { name: "Rising Star", threshold: 250_000 },
    CareerLevelInfo { name: "Breakout Artist", threshold: 1_000_000 },
    CareerLevelInfo { name: "Chart Regular", threshold: 5_000_000 },
    CareerLevelInfo { name: "Headliner", threshold: 25_000_000 },
    CareerLevelInfo { name: "Superstar", threshold: 100_000_000 },
    CareerLevelInfo { name: "Icon", threshold: 500_000_000 },
    CareerLevelInfo { name: "Legend", threshold: 1_000_000_000 },
];

// ── Character & stats ─────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    pub name: String,
    pub profile_image: Option<String>,
    pub cover_image: Option<String>,
    pub about: String,
}

/// Upper bound of the 0–100 stat scale.
pub const STAT_CAP: f64 = 100.0;

pub const DEFAULT_MAX_ENERGY: u32 = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub wealth: f64,
    pub reputation: f64,
    pub creativity: f64,
    pub marketing: f64,
    pub networking: f64,
    pub fan_loyalty: f64,
    /// Index into [`CAREER_LEVELS`].
    pub career_level: u32,
    pub energy: u32,
    pub max_energy: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            wealth: 1_000.0,
            reputation: 10.0,
            creativity: 20.0,
            marketing: 10.0,
            networking: 10.0,
            fan_loyalty: 10.0,
            career_level: 0,
            energy: DEFAULT_MAX_ENERGY,
            max_energy: DEFAULT_MAX_ENERGY,
        }
    }
}

/// Add to a 0–100 stat, clamping both ends.
pub fn add_stat(stat: &mut f64, amount: f64) {
    if amount.is_finite() {
        *stat = (*stat + amount).clamp(0.0, STAT_CAP);
    }
}

/// One point of the chart time series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub week: u32,
    pub total_streams: u64,
    pub total_followers: u64,
    pub wealth: f64,
}

// ── GameState ─────────────────────────────────────────────────────────

pub const NEWS_CAP: usize = 50;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub character: Character,
    pub stats: Stats,
    pub songs: Vec<Song>,
    pub albums: Vec<Album>,
    pub streaming: Vec<StreamingPlatform>,
    pub social: Vec<SocialPlatform>,
    pub video: Vec<VideoPlatform>,
    /// Pending and active trends.
    pub trends: Vec<MarketTrend>,
    pub past_trends: Vec<MarketTrend>,
    pub current_week: u32,
    pub history: Vec<WeeklyStats>,
    pub news: Vec<String>,
    /// Next id handed out to songs, albums, posts, videos and trends.
    pub next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new("Unknown Artist")
    }
}

impl GameState {
    pub fn new(artist_name: &str) -> Self {
        Self {
            character: Character {
                name: artist_name.to_string(),
                ..Character::default()
            },
            stats: Stats::default(),
            songs: Vec::new(),
            albums: Vec::new(),
            streaming: STREAMING_PLATFORMS
                .iter()
                .map(|&p| StreamingPlatform::new(p))
                .collect(),
            social: vec![
                SocialPlatform { platform: Platform::Twitter, followers: 100, posts: Vec::new() },
                SocialPlatform { platform: Platform::Instagram, followers: 150, posts: Vec::new() },
                SocialPlatform { platform: Platform::TikTok, followers: 50, posts: Vec::new() },
            ],
            video: vec![VideoPlatform {
                platform: Platform::YouTube,
                subscribers: 20,
                total_views: 0,
                revenue: 0.0,
                videos: Vec::new(),
            }],
            trends: Vec::new(),
            past_trends: Vec::new(),
            current_week: 1,
            history: Vec::new(),
            news: vec![format!("{} starts their rap career", artist_name)],
            next_id: 1,
        }
    }

    pub fn add_news(&mut self, text: &str) {
        self.news.push(text.to_string());
        if self.news.len() > NEWS_CAP {
            let overflow = self.news.len() - NEWS_CAP;
            self.news.drain(..overflow);
        }
    }

    pub fn alloc_id(&mut self) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id.wrapping_add(1);
        id
    }

    pub fn song(&self, id: SongId) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == id)
    }

    pub fn song_mut(&mut self, id: SongId) -> Option<&mut Song> {
        self.songs.iter_mut().find(|s| s.id == id)
    }

    pub fn album(&self, id: AlbumId) -> Option<&Album> {
        self.albums.iter().find(|a| a.id == id)
    }

    pub fn released_songs(&self) -> impl Iterator<Item = &Song> {
        self.songs.iter().filter(|s| s.released)
    }

    pub fn streaming_platform(&self, platform: Platform) -> Option<&StreamingPlatform> {
        self.streaming.iter().find(|p| p.platform == platform)
    }

    pub fn social_platform(&self, platform: Platform) -> Option<&SocialPlatform> {
        self.social.iter().find(|p| p.platform == platform)
    }

    pub fn social_platform_mut(&mut self, platform: Platform) -> Option<&mut SocialPlatform> {
        self.social.iter_mut().find(|p| p.platform == platform)
    }

    pub fn video_platform_mut(&mut self, platform: Platform) -> Option<&mut VideoPlatform> {
        self.video.iter_mut().find(|p| p.platform == platform)
    }

    pub fn career_level_name(&self) -> &'static str {
        let idx = (self.stats.career_level as usize).min(CAREER_LEVELS.len() - 1);
        CAREER_LEVELS[idx].name
    }
}

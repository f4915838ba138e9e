//! Actions the presentation layer dispatches into the reducer.

use super::metrics::PostEngagement;
use super::state::{AlbumId, Platform, SongId};
use super::logic::WeekSummary;

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Advance from `from_week` to the next week. Rejected if the state is
    /// no longer at `from_week`, so a double click never double-advances.
    AdvanceWeek { from_week: u32 },

    /// Write and record a song (unreleased).
    RecordSong {
        title: String,
        featuring: Vec<String>,
        cover_art: Option<String>,
    },

    ReleaseSong { song_id: SongId },

    /// Bundle songs into an album. Unreleased songs on it are released too.
    ReleaseAlbum { title: String, song_ids: Vec<SongId> },

    CreatePost { platform: Platform, content: String },

    UploadVideo {
        platform: Platform,
        title: String,
        song_id: Option<SongId>,
    },

    EditProfile {
        name: Option<String>,
        about: Option<String>,
        profile_image: Option<String>,
        cover_image: Option<String>,
    },
}

/// What a successful dispatch did.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    WeekAdvanced(WeekSummary),
    SongRecorded { song_id: SongId, quality: u8 },
    SongReleased { song_id: SongId },
    AlbumReleased { album_id: AlbumId, ratings: Vec<u8> },
    Posted { post_id: u32, engagement: PostEngagement },
    VideoUploaded { video_id: u32, views: u64 },
    ProfileUpdated,
}

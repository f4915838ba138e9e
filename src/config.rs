//! Game-balance parameters.
//!
//! Every probability, rate band and multiplier the weekly tick uses lives
//! here so it can be tuned from a JSON document without touching the
//! engine. Missing fields fall back to the defaults below.

use rand_core::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rng;

/// Uniform sampling range `[low, high)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> f64 {
        rng::uniform(rng, self.low, self.high)
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.low && v <= self.high
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    // Performance transitions
    pub viral_base_chance: f64,
    pub flop_base_chance: f64,
    pub comeback_base_chance: f64,
    /// Weeks after release during which a song can still flop.
    pub flop_window_weeks: u32,
    /// Minimum age before a song can make a comeback.
    pub comeback_min_age_weeks: u32,
    /// How long a viral/flop/comeback tag lasts before reverting to normal.
    pub status_duration_weeks: u32,

    pub viral_multiplier: f64,
    pub flop_multiplier: f64,
    pub comeback_multiplier: f64,

    // Stream growth
    pub weekly_decay: f64,
    pub decay_floor: f64,
    pub stream_noise: Band,
    /// Weekly streams each follower contributes to a released song.
    pub follower_stream_rate: f64,

    // Audience
    pub follower_growth_rate: f64,
    pub stream_follower_conversion: f64,
    pub viral_follower_bonus: u64,
    pub video_view_rate: f64,
    /// Views every video gets per week before subscriber reach.
    pub video_base_views: f64,
    pub video_revenue_per_view: f64,
    pub view_subscriber_conversion: f64,
    pub streams_per_listener: f64,

    // Post engagement
    pub likes_band: Band,
    pub comments_band: Band,
    pub shares_band: Band,
    pub views_band: Band,
    pub share_follow_rate: f64,

    // Market trends
    pub trend_spawn_chance: f64,
    pub trend_impact: Band,
    pub trend_min_duration: u32,
    pub trend_max_duration: u32,

    // Energy costs
    pub record_energy: u32,
    pub post_energy: u32,
    pub video_energy: u32,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            viral_base_chance: 0.02,
            flop_base_chance: 0.08,
            comeback_base_chance: 0.01,
            flop_window_weeks: 3,
            comeback_min_age_weeks: 12,
            status_duration_weeks: 4,

            viral_multiplier: 3.0,
            flop_multiplier: 0.3,
            comeback_multiplier: 1.8,

            weekly_decay: 0.92,
            decay_floor: 0.05,
            stream_noise: Band::new(0.85, 1.15),
            follower_stream_rate: 0.02,

            follower_growth_rate: 0.005,
            stream_follower_conversion: 0.001,
            viral_follower_bonus: 500,
            video_view_rate: 0.05,
            video_base_views: 50.0,
            video_revenue_per_view: 0.002,
            view_subscriber_conversion: 0.01,
            streams_per_listener: 3.0,

            likes_band: Band::new(0.10, 0.30),
            comments_band: Band::new(0.05, 0.15),
            shares_band: Band::new(0.02, 0.08),
            views_band: Band::new(1.0, 3.0),
            share_follow_rate: 0.5,

            trend_spawn_chance: 0.15,
            trend_impact: Band::new(0.05, 0.30),
            trend_min_duration: 2,
            trend_max_duration: 6,

            record_energy: 20,
            post_energy: 5,
            video_energy: 15,
        }
    }
}

impl BalanceConfig {
    /// Parse a (possibly partial) JSON balance document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let bands = [
            ("stream_noise", self.stream_noise),
            ("likes_band", self.likes_band),
            ("comments_band", self.comments_band),
            ("shares_band", self.shares_band),
            ("views_band", self.views_band),
            ("trend_impact", self.trend_impact),
        ];
        for (name, band) in bands {
            if band.low > band.high {
                return Err(ConfigError::InvertedBand {
                    name,
                    low: band.low,
                    high: band.high,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(BalanceConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = BalanceConfig::from_json(r#"{ "viral_base_chance": 0.5 }"#).unwrap();
        assert_eq!(cfg.viral_base_chance, 0.5);
        assert_eq!(cfg.flop_base_chance, BalanceConfig::default().flop_base_chance);
        assert_eq!(cfg.likes_band, Band::new(0.10, 0.30));
    }

    #[test]
    fn empty_object_is_default() {
        let cfg = BalanceConfig::from_json("{}").unwrap();
        assert_eq!(cfg, BalanceConfig::default());
    }

    #[test]
    fn inverted_band_rejected() {
        let err = BalanceConfig::from_json(r#"{ "likes_band": { "low": 0.5, "high": 0.1 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvertedBand { name: "likes_band", .. }));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(
            BalanceConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn band_sample_stays_inside() {
        let mut rng = crate::rng::SimpleRng::new(5);
        let band = Band::new(0.10, 0.30);
        for _ in 0..500 {
            assert!(band.contains(band.sample(&mut rng)));
        }
    }
}

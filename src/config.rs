//! Tunable constants of the game.
//!
//! A [`GameConfig`] is built once and handed to [`crate::play::session::Session`] and
//! [`crate::play::game::Game`]. Its [`Default`] is the layout of a 1200×1200 window with two
//! five-lane playfields on the sides of a 400 px center panel.

use gametime::TimeSpan;
use strict_num_extended::PositiveF64;

use crate::{
    input::KeyLayout,
    play::player::{PerPlayer, PlayerId},
};

/// Every tunable of the game.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Screen geometry.
    pub layout: LayoutConfig,
    /// Timing and judgement.
    pub timing: TimingConfig,
    /// Points awarded.
    pub scoring: ScoringConfig,
    /// Particle effects.
    pub particles: ParticleConfig,
    /// Audio file lookup.
    pub audio: AudioConfig,
    /// Key layout of each player.
    pub keys: PerPlayer<KeyLayout>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            timing: TimingConfig::default(),
            scoring: ScoringConfig::default(),
            particles: ParticleConfig::default(),
            audio: AudioConfig::default(),
            keys: PerPlayer([KeyLayout::player_one(), KeyLayout::player_two()]),
        }
    }
}

/// Screen geometry in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutConfig {
    /// Window width.
    pub window_width: f64,
    /// Window height.
    pub window_height: f64,
    /// Width of the center panel between both fret areas.
    pub panel_width: f64,
    /// Lanes per player.
    pub lane_count: usize,
    /// Height of a note head.
    pub note_height: f64,
    /// Top edge of the hit zone.
    pub hit_zone_y: f64,
    /// Height of the hit zone.
    pub hit_zone_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            window_width: 1200.0,
            window_height: 1200.0,
            panel_width: 400.0,
            lane_count: 5,
            note_height: 45.0,
            hit_zone_y: 1100.0,
            hit_zone_height: 75.0,
        }
    }
}

impl LayoutConfig {
    /// Width of one player's fret area.
    #[must_use]
    pub fn fret_width(&self) -> f64 {
        (self.window_width - self.panel_width) / 2.0
    }

    /// Width of one lane.
    #[must_use]
    pub fn lane_width(&self) -> f64 {
        if self.lane_count == 0 {
            return 0.0;
        }
        self.fret_width() / self.lane_count as f64
    }

    /// Left edge of the fret area of `player`.
    #[must_use]
    pub fn player_offset(&self, player: PlayerId) -> f64 {
        match player {
            PlayerId::One => 0.0,
            PlayerId::Two => self.fret_width() + self.panel_width,
        }
    }

    /// Horizontal center of `lane` of `player`.
    #[must_use]
    pub fn lane_center_x(&self, player: PlayerId, lane: usize) -> f64 {
        self.player_offset(player) + (lane as f64 + 0.5) * self.lane_width()
    }

    /// Vertical center of the hit zone.
    #[must_use]
    pub fn hit_zone_center_y(&self) -> f64 {
        self.hit_zone_y + self.hit_zone_height / 2.0
    }
}

/// Timing and judgement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingConfig {
    /// Length of one fixed update step.
    #[cfg_attr(feature = "serde", serde(with = "span_secs"))]
    pub update_interval: TimeSpan,
    /// Largest distance between a press and a note's time that still hits.
    #[cfg_attr(feature = "serde", serde(with = "span_secs"))]
    pub tolerance: TimeSpan,
    /// Added to the audio position to get the song time.
    #[cfg_attr(feature = "serde", serde(with = "span_secs"))]
    pub audio_latency: TimeSpan,
    /// Pixels per second notes move down.
    pub fall_speed: PositiveF64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            update_interval: TimeSpan::MILLISECOND * (1000 / 165),
            tolerance: TimeSpan::MILLISECOND * 200,
            audio_latency: TimeSpan::ZERO,
            fall_speed: PositiveF64::new_const(800.0),
        }
    }
}

/// Points awarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoringConfig {
    /// Hitting a short note.
    pub short_hit: u64,
    /// Hitting the head of a sustain.
    pub sustain_hit: u64,
    /// Every step a sustain is held.
    pub sustain_tick: u64,
    /// Holding a sustain to its end.
    pub sustain_bonus: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            short_hit: 10,
            sustain_hit: 5,
            sustain_tick: 1,
            sustain_bonus: 20,
        }
    }
}

/// Particle effects.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticleConfig {
    /// Particles of a hit burst.
    pub hit_count: usize,
    /// Particles of one sustain trickle.
    pub sustain_count: usize,
    /// Shortest lifetime in seconds.
    pub lifetime_min: f64,
    /// Longest lifetime in seconds.
    pub lifetime_max: f64,
    /// Slowest speed in pixels per second.
    pub speed_min: f64,
    /// Fastest speed in pixels per second.
    pub speed_max: f64,
    /// Speed cap of sustain particles before they are scaled up.
    pub sustain_max_speed: f64,
    /// Edge length of a particle square.
    pub size: f64,
    /// Time between two sustain trickles.
    #[cfg_attr(feature = "serde", serde(with = "span_secs"))]
    pub sustain_interval: TimeSpan,
    /// Opacity of sustain particles.
    pub sustain_alpha: u8,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            hit_count: 8,
            sustain_count: 2,
            lifetime_min: 0.2,
            lifetime_max: 0.5,
            speed_min: 50.0,
            speed_max: 150.0,
            sustain_max_speed: 50.0,
            size: 16.0,
            sustain_interval: TimeSpan::MILLISECOND * 80,
            sustain_alpha: 150,
        }
    }
}

/// Audio file lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AudioConfig {
    /// File opened when the chart names none.
    pub default_file: String,
    /// Extensions tried in order when the named file cannot be opened.
    pub fallback_extensions: Vec<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            default_file: "song.ogg".to_string(),
            fallback_extensions: ["ogg", "wav", "flac", "mp3"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// `TimeSpan` as fractional seconds.
#[cfg(feature = "serde")]
mod span_secs {
    use std::time::Duration;

    use gametime::TimeSpan;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};

    pub fn serialize<S: Serializer>(span: &TimeSpan, serializer: S) -> Result<S::Ok, S::Error> {
        span.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeSpan, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs)
            .map(TimeSpan::from_duration)
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.fret_width(), 400.0);
        assert_eq!(layout.lane_width(), 80.0);
        assert_eq!(layout.player_offset(PlayerId::Two), 800.0);
        assert_eq!(layout.lane_center_x(PlayerId::One, 0), 40.0);
        assert_eq!(layout.lane_center_x(PlayerId::Two, 4), 1160.0);
        assert_eq!(layout.hit_zone_center_y(), 1137.5);
    }

    #[test]
    fn default_timing() {
        let timing = TimingConfig::default();
        assert_eq!(timing.update_interval, TimeSpan::MILLISECOND * 6);
        assert_eq!(timing.tolerance.as_secs_f64(), 0.2);
        assert_eq!(timing.fall_speed.as_f64(), 800.0);
    }
}

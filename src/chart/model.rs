//! Data model of a parsed chart.

use std::collections::BTreeMap;

/// Default ticks per beat when a chart does not declare `Resolution`.
pub const DEFAULT_RESOLUTION: u32 = 192;

/// Raw tempo value that stands for 120 BPM.
pub const DEFAULT_TEMPO_RAW: u64 = 120_000;

/// A tempo change: `tick = B value`.
///
/// The raw value is the BPM multiplied by 1000, so `120000` means 120 BPM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoEvent {
    /// The tick where this tempo starts.
    pub tick: u64,
    /// BPM × 1000.
    pub raw_value: u64,
}

impl TempoEvent {
    /// Creates a new tempo event.
    #[must_use]
    pub const fn new(tick: u64, raw_value: u64) -> Self {
        Self { tick, raw_value }
    }

    /// Beats per minute of this tempo.
    #[must_use]
    pub fn bpm(&self) -> f64 {
        self.raw_value as f64 / 1000.0
    }

    /// Microseconds per beat, or `0.0` when the BPM is not positive.
    #[must_use]
    pub fn micros_per_beat(&self) -> f64 {
        let bpm = self.bpm();
        if bpm <= 0.0 {
            return 0.0;
        }
        60_000_000.0 / bpm
    }
}

/// A time signature change: `tick = TS numerator [denominator]`.
///
/// Kept for completeness, gameplay never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignatureEvent {
    /// The tick where this signature starts.
    pub tick: u64,
    /// Beats per measure.
    pub numerator: u32,
    /// Beat unit. Never zero, `4` when the chart omits it or writes `0`.
    pub denominator: u32,
}

impl TimeSignatureEvent {
    /// Creates a new time signature, normalizing a zero or missing denominator to 4.
    #[must_use]
    pub fn new(tick: u64, numerator: u32, denominator: Option<u32>) -> Self {
        let denominator = match denominator {
            None | Some(0) => 4,
            Some(d) => d,
        };
        Self {
            tick,
            numerator,
            denominator,
        }
    }
}

/// A note line: `tick = N lane length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartNote {
    /// The tick of the note head.
    pub tick: u64,
    /// The lane (fret) index. Lanes beyond the playable count are dropped later.
    pub lane: u32,
    /// Sustain length in ticks, `0` for a short note.
    pub length_ticks: u64,
}

impl ChartNote {
    /// Whether this note must be held.
    #[must_use]
    pub const fn is_sustain(&self) -> bool {
        self.length_ticks > 0
    }

    /// The tick where the sustain tail ends, equal to `tick` for short notes.
    #[must_use]
    pub const fn end_tick(&self) -> u64 {
        self.tick.saturating_add(self.length_ticks)
    }
}

/// The note-track sections a chart may carry.
///
/// All of them are merged into one note stream, the difficulty is only remembered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Difficulty {
    /// `[ExpertSingle]`
    Expert,
    /// `[HardSingle]`
    Hard,
    /// `[MediumSingle]`
    Medium,
    /// `[EasySingle]`
    Easy,
}

impl Difficulty {
    /// Maps a section name to a difficulty.
    #[must_use]
    pub fn from_section_name(name: &str) -> Option<Self> {
        Some(match name {
            "ExpertSingle" => Self::Expert,
            "HardSingle" => Self::Hard,
            "MediumSingle" => Self::Medium,
            "EasySingle" => Self::Easy,
            _ => return None,
        })
    }
}

/// Metadata from the `[Song]` section.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SongInfo {
    /// `Name`
    pub title: String,
    /// `Artist`
    pub artist: String,
    /// `Charter`
    pub charter: String,
    /// `Album`
    pub album: String,
    /// `Year`
    pub year: String,
    /// `Genre`
    pub genre: String,
    /// `MediaType`
    pub media_type: String,
    /// `Player2`, the label of the second player's instrument.
    pub player2: String,
    /// `MusicStream`, the audio file name relative to the chart.
    pub music_stream: String,
    /// `Offset` in seconds, added to every computed time.
    pub offset: f64,
    /// `Resolution`, ticks per beat.
    pub resolution: u32,
    /// `Difficulty`, an informational rating.
    pub difficulty: i32,
    /// `PreviewStart` in seconds.
    pub preview_start: f64,
    /// `PreviewEnd` in seconds.
    pub preview_end: f64,
}

impl Default for SongInfo {
    fn default() -> Self {
        Self {
            title: String::new(),
            artist: String::new(),
            charter: String::new(),
            album: String::new(),
            year: String::new(),
            genre: String::new(),
            media_type: String::new(),
            player2: String::new(),
            music_stream: String::new(),
            offset: 0.0,
            resolution: DEFAULT_RESOLUTION,
            difficulty: 0,
            preview_start: 0.0,
            preview_end: 0.0,
        }
    }
}

/// A fully parsed chart.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartDocument {
    /// Song metadata.
    pub song: SongInfo,
    /// Tempo changes, indexed by tick. A later line at the same tick replaces the earlier one.
    pub tempos: BTreeMap<u64, TempoEvent>,
    /// Time signature changes, indexed by tick.
    pub time_signatures: BTreeMap<u64, TimeSignatureEvent>,
    /// Notes of every difficulty section, sorted by tick.
    pub notes: Vec<ChartNote>,
    /// Names of sections this crate has no use for, in the order they first appeared.
    pub unknown_sections: Vec<String>,
}

impl ChartDocument {
    /// Whether a tempo is declared at tick 0.
    #[must_use]
    pub fn has_tempo_at_zero(&self) -> bool {
        self.tempos.contains_key(&0)
    }

    /// Number of sustain notes.
    #[must_use]
    pub fn sustain_count(&self) -> usize {
        self.notes.iter().filter(|note| note.is_sustain()).count()
    }

    /// The last tick any note occupies, including sustain tails.
    #[must_use]
    pub fn last_tick(&self) -> Option<u64> {
        self.notes.iter().map(ChartNote::end_tick).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tempo_rates() {
        let tempo = TempoEvent::new(0, 150_000);
        assert_eq!(tempo.bpm(), 150.0);
        assert_eq!(tempo.micros_per_beat(), 400_000.0);
        assert_eq!(TempoEvent::new(0, 0).micros_per_beat(), 0.0);
    }

    #[test]
    fn signature_denominator_fallback() {
        assert_eq!(TimeSignatureEvent::new(0, 3, None).denominator, 4);
        assert_eq!(TimeSignatureEvent::new(0, 3, Some(0)).denominator, 4);
        assert_eq!(TimeSignatureEvent::new(0, 6, Some(8)).denominator, 8);
    }

    #[test]
    fn last_tick_counts_tails() {
        let chart = ChartDocument {
            notes: vec![
                ChartNote {
                    tick: 0,
                    lane: 0,
                    length_ticks: 480,
                },
                ChartNote {
                    tick: 192,
                    lane: 1,
                    length_ticks: 0,
                },
            ],
            ..Default::default()
        };
        assert_eq!(chart.last_tick(), Some(480));
        assert_eq!(chart.sustain_count(), 1);
    }
}

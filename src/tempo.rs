//! Conversion of tick positions into seconds.
//!
//! A chart's tempo is piecewise constant: every [`TempoEvent`] holds until the next one. The
//! time of a tick is the integral of the beat length over every segment before it, plus the
//! song offset.

use crate::chart::{
    ChartDocument,
    model::{DEFAULT_TEMPO_RAW, TempoEvent},
};

/// A tempo that holds from `start_tick` until `end_tick`, or forever if it is the last one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoSegment {
    /// First tick of the segment.
    pub start_tick: u64,
    /// First tick of the next segment.
    pub end_tick: Option<u64>,
    /// The tempo of this segment.
    pub tempo: TempoEvent,
    /// Seconds elapsed from tick 0 until `start_tick`, without the song offset.
    pub start_secs: f64,
}

/// Tick to time mapping of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct TempoMap {
    segments: Vec<TempoSegment>,
    resolution: u32,
    offset: f64,
}

impl TempoMap {
    /// Builds the map of `chart`.
    ///
    /// A 120 BPM tempo is assumed at tick 0 when the chart does not declare one there.
    #[must_use]
    pub fn new(chart: &ChartDocument) -> Self {
        Self::from_parts(
            chart.tempos.values().copied(),
            chart.song.resolution,
            chart.song.offset,
        )
    }

    /// Builds a map from loose tempo events, which need not be sorted.
    #[must_use]
    pub fn from_parts(
        tempos: impl IntoIterator<Item = TempoEvent>,
        resolution: u32,
        offset: f64,
    ) -> Self {
        let mut tempos: Vec<_> = tempos.into_iter().collect();
        tempos.sort_by_key(|tempo| tempo.tick);
        if tempos.first().is_none_or(|first| first.tick != 0) {
            tempos.insert(0, TempoEvent::new(0, DEFAULT_TEMPO_RAW));
        }
        if resolution == 0 {
            log::warn!("resolution is 0, every tick is mapped onto the song offset");
        }

        let mut segments = Vec::with_capacity(tempos.len());
        let mut start_secs = 0.0;
        for (index, tempo) in tempos.iter().enumerate() {
            let end_tick = tempos.get(index + 1).map(|next| next.tick);
            segments.push(TempoSegment {
                start_tick: tempo.tick,
                end_tick,
                tempo: *tempo,
                start_secs,
            });
            if let Some(end) = end_tick {
                start_secs += span_secs(end - tempo.tick, tempo, resolution);
            }
        }
        Self {
            segments,
            resolution,
            offset,
        }
    }

    /// Seconds from the start of the audio to `tick`.
    ///
    /// Non-decreasing in `tick`. With a zero resolution every tick maps onto the offset.
    #[must_use]
    pub fn ticks_to_seconds(&self, tick: u64) -> f64 {
        if self.is_degenerate() {
            return self.offset;
        }
        let mut secs = 0.0;
        for segment in &self.segments {
            if segment.start_tick >= tick {
                break;
            }
            let end = segment.end_tick.map_or(tick, |end| end.min(tick));
            secs += span_secs(end - segment.start_tick, &segment.tempo, self.resolution);
        }
        secs + self.offset
    }

    /// The BPM in effect at `tick`.
    #[must_use]
    pub fn bpm_at(&self, tick: u64) -> f64 {
        self.segments
            .iter()
            .rev()
            .find(|segment| segment.start_tick <= tick)
            .map_or(0.0, |segment| segment.tempo.bpm())
    }

    /// Every tempo segment in tick order. Never empty.
    #[must_use]
    pub fn segments(&self) -> &[TempoSegment] {
        &self.segments
    }

    /// Ticks per beat.
    #[must_use]
    pub const fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Seconds added to every computed time.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Whether the resolution is 0, so that ticks carry no timing.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.resolution == 0
    }
}

fn span_secs(ticks: u64, tempo: &TempoEvent, resolution: u32) -> f64 {
    if resolution == 0 {
        return 0.0;
    }
    ticks as f64 * tempo.micros_per_beat() / f64::from(resolution) / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesizes_leading_tempo() {
        let map = TempoMap::from_parts([TempoEvent::new(384, 150_000)], 192, 0.25);
        assert_eq!(map.segments().len(), 2);
        assert_eq!(map.segments()[0].tempo, TempoEvent::new(0, DEFAULT_TEMPO_RAW));
        assert_eq!(map.ticks_to_seconds(0), 0.25);
        assert_eq!(map.ticks_to_seconds(384), 1.25);
        assert!((map.ticks_to_seconds(576) - 1.65).abs() < 1e-9);
        assert_eq!(map.segments()[1].start_secs, 1.0);
    }

    #[test]
    fn bpm_lookup() {
        let map = TempoMap::from_parts(
            [TempoEvent::new(0, 100_000), TempoEvent::new(192, 200_000)],
            192,
            0.0,
        );
        assert_eq!(map.bpm_at(0), 100.0);
        assert_eq!(map.bpm_at(191), 100.0);
        assert_eq!(map.bpm_at(192), 200.0);
        assert_eq!(map.bpm_at(100_000), 200.0);
    }

    #[test]
    fn degenerate_resolution() {
        let map = TempoMap::from_parts([TempoEvent::new(0, 120_000)], 0, 1.5);
        assert!(map.is_degenerate());
        assert_eq!(map.ticks_to_seconds(0), 1.5);
        assert_eq!(map.ticks_to_seconds(9_999), 1.5);
    }

    #[test]
    fn zero_bpm_segment_stalls() {
        let map = TempoMap::from_parts(
            [TempoEvent::new(0, 0), TempoEvent::new(192, 120_000)],
            192,
            0.0,
        );
        assert_eq!(map.ticks_to_seconds(192), 0.0);
        assert_eq!(map.ticks_to_seconds(384), 0.5);
    }
}

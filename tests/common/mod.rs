//! Helpers shared by the integration tests.
//!
//! Time precision criterion: every time assertion must be within 1 microsecond, use
//! [`assert_time_close`].

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use riff_hero::{
    audio::{MusicStream, PlaybackStatus},
    chart::{ChartDocument, parse_chart},
    tempo::TempoMap,
    timeline::Timeline,
};

/// 1 microsecond in seconds.
pub const MICROSECOND_EPSILON: f64 = 1e-6;

/// Asserts that two times in seconds are within [`MICROSECOND_EPSILON`].
#[track_caller]
pub fn assert_time_close(expected: f64, actual: f64, msg: &str) {
    let diff = (expected - actual).abs();
    assert!(
        diff < MICROSECOND_EPSILON,
        "{msg}: expected {expected:.6}s, got {actual:.6}s, diff {diff:.9}s (allowed: {MICROSECOND_EPSILON}s)",
    );
}

/// The two-player demo chart.
pub const DUET_CHART: &str = include_str!("../files/duet.chart");

/// A chart source at 120 BPM and resolution 192 with the given `N` lines.
///
/// Each note is `(tick, lane, length)`. At this tempo 384 ticks are one second.
pub fn chart_source(notes: &[(u64, u32, u64)]) -> String {
    let mut source = String::from(
        "[Song]\n{\n  Name = \"Test\"\n  Resolution = 192\n}\n[SyncTrack]\n{\n  0 = B 120000\n}\n[ExpertSingle]\n{\n",
    );
    for (tick, lane, length) in notes {
        source.push_str(&format!("  {tick} = N {lane} {length}\n"));
    }
    source.push_str("}\n");
    source
}

/// Parses `source`, which must be valid.
pub fn chart(source: &str) -> ChartDocument {
    parse_chart(source).expect("source must be parsed").chart
}

/// Parses `source` and builds its five-lane timeline.
pub fn timeline(source: &str) -> Timeline {
    let chart = chart(source);
    Timeline::build(&chart, &TempoMap::new(&chart), 5)
}

/// A music stream driven by the test.
///
/// Opens only the paths in `accept`, records every call, and reports whatever position and
/// status the test sets.
#[derive(Debug)]
pub struct ScriptedStream {
    pub accept: Vec<PathBuf>,
    pub tried: Vec<PathBuf>,
    pub calls: Vec<String>,
    pub position: f64,
    pub status: PlaybackStatus,
}

impl ScriptedStream {
    pub fn accepting(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            accept: paths.into_iter().collect(),
            tried: Vec::new(),
            calls: Vec::new(),
            position: 0.0,
            status: PlaybackStatus::Stopped,
        }
    }
}

impl MusicStream for ScriptedStream {
    fn open(&mut self, path: &Path) -> bool {
        self.tried.push(path.to_path_buf());
        self.accept.iter().any(|accepted| accepted == path)
    }

    fn play(&mut self) {
        self.calls.push("play".to_string());
        self.status = PlaybackStatus::Playing;
    }

    fn stop(&mut self) {
        self.calls.push("stop".to_string());
        self.status = PlaybackStatus::Stopped;
    }

    fn set_position(&mut self, secs: f64) {
        self.calls.push(format!("seek {secs}"));
        self.position = secs;
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn status(&self) -> PlaybackStatus {
        self.status
    }
}

//! The game shell: loading, the start key, the fixed-step loop and the end of a session.

use std::path::{Path, PathBuf};

use gametime::TimeSpan;
use thiserror::Error;

use super::{
    clock::FixedStep,
    player::{PerPlayer, PlayerId},
    session::{Feedback, Session},
    snapshot::FrameSnapshot,
    status::StatusMessage,
};
use crate::{
    audio::{AudioError, MusicStream, PlaybackStatus, open_with_fallback},
    chart::{ChartDocument, ChartError, ChartOutput, ChartWarning, parse_chart, read_chart_source},
    config::GameConfig,
    input::InputKey,
    rng::ParticleRng,
    tempo::TempoMap,
    timeline::Timeline,
};

/// An error of loading a chart and its audio.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LoadError {
    /// The chart could not be read or parsed.
    #[error(transparent)]
    Chart(#[from] ChartError),
    /// The backing track could not be opened.
    #[error(transparent)]
    Audio(#[from] AudioError),
}

/// Drives one chart and its backing track for two players.
///
/// Call [`Self::key_down`] and [`Self::key_up`] for input, [`Self::advance`] once per frame, and
/// draw from [`Self::frame`].
pub struct Game<A, R> {
    config: GameConfig,
    audio: A,
    session: Session<R>,
    clock: FixedStep,
    chart: Option<ChartDocument>,
    warnings: Vec<ChartWarning>,
    timeline: Timeline,
    audio_path: Option<PathBuf>,
    status: StatusMessage,
    loaded: bool,
    game_over_published: bool,
}

impl<A: MusicStream, R: ParticleRng> Game<A, R> {
    /// Creates a game with nothing loaded.
    pub fn new(config: GameConfig, audio: A, rng: R) -> Self {
        let clock = FixedStep::new(config.timing.update_interval);
        let session = Session::new(config.clone(), rng);
        Self {
            config,
            audio,
            session,
            clock,
            chart: None,
            warnings: Vec::new(),
            timeline: Timeline::default(),
            audio_path: None,
            status: StatusMessage::info("No chart loaded"),
            loaded: false,
            game_over_published: false,
        }
    }

    /// Loads the chart file at `path` and the audio it names, relative to the chart's directory.
    ///
    /// On failure the status shows the error and the game stays unloaded.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Chart`] when the chart cannot be read or parsed, and
    /// [`LoadError::Audio`] when no audio candidate opens.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        self.unload();
        self.status = StatusMessage::info("Parsing chart file...");
        let source = read_chart_source(path).inspect_err(|err| self.fail(err))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        self.load_source(&source, base_dir)
    }

    /// Loads a chart from `source`, resolving its audio relative to `base_dir`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`], except that reading a file cannot fail.
    pub fn load_source(&mut self, source: &str, base_dir: &Path) -> Result<(), LoadError> {
        self.unload();
        self.status = StatusMessage::info("Parsing chart file...");
        let ChartOutput { chart, warnings } =
            parse_chart(source).inspect_err(|err| self.fail(err))?;
        for warning in &warnings {
            log::warn!("{warning}");
        }

        self.status = StatusMessage::info("Converting notes...");
        let tempo = TempoMap::new(&chart);
        let timeline = Timeline::build(&chart, &tempo, self.config.layout.lane_count);

        self.status = StatusMessage::info("Loading audio...");
        let file = if chart.song.music_stream.is_empty() {
            self.config.audio.default_file.as_str()
        } else {
            chart.song.music_stream.as_str()
        };
        let audio_path = open_with_fallback(
            &mut self.audio,
            &base_dir.join(file),
            &self.config.audio.fallback_extensions,
        )
        .inspect_err(|err| self.fail(err))?;

        log::info!(
            "loaded {} notes of \"{}\" by \"{}\"",
            timeline.chart_note_count(),
            chart.song.title,
            chart.song.artist,
        );
        self.chart = Some(chart);
        self.warnings = warnings;
        self.timeline = timeline;
        self.audio_path = Some(audio_path);
        self.loaded = true;
        self.status = StatusMessage::info("Press SPACE to start!");
        Ok(())
    }

    fn unload(&mut self) {
        self.session.end();
        self.audio.stop();
        self.loaded = false;
        self.chart = None;
        self.warnings.clear();
        self.timeline = Timeline::default();
        self.audio_path = None;
        self.game_over_published = false;
    }

    fn fail(&mut self, err: &dyn std::error::Error) {
        log::error!("failed to load: {err}");
        self.status = StatusMessage::error(format!("Error: {err}"));
        self.loaded = false;
    }

    /// Handles a key press.
    ///
    /// Space starts a new session when none is running. Lane keys go to the session.
    pub fn key_down(&mut self, key: InputKey) {
        if key == InputKey::Space {
            if self.session.is_running() {
                return;
            }
            if self.loaded {
                self.start();
            } else {
                self.status = StatusMessage::error("Error: chart not loaded or an error occurred");
            }
            return;
        }
        let now = self.song_time();
        self.session.press(key, now);
    }

    /// Handles a key release.
    pub fn key_up(&mut self, key: InputKey) {
        self.session.release(key);
    }

    /// Starts a session from the beginning of the song. Does nothing unless loaded.
    pub fn start(&mut self) {
        if !self.loaded {
            return;
        }
        self.session.start(&self.timeline);
        self.clock.reset();
        self.game_over_published = false;
        self.status = StatusMessage::info("Playing...");
        self.audio.stop();
        self.audio.set_position(0.0);
        self.audio.play();
        log::info!("session started");
    }

    /// Runs the fixed steps due after `elapsed` of wall time, then checks for the end of the
    /// session.
    pub fn advance(&mut self, elapsed: TimeSpan) {
        if !self.session.is_running() {
            return;
        }
        let steps = self.clock.accumulate(elapsed);
        let interval = self.clock.interval();
        for _ in 0..steps {
            let now = self.song_time();
            self.session.tick(now, interval);
            if self.is_finished() {
                self.finish();
                break;
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.audio.status() != PlaybackStatus::Playing && !self.session.has_unresolved_on_screen()
    }

    fn finish(&mut self) {
        self.session.end();
        if self.game_over_published {
            return;
        }
        self.game_over_published = true;
        let scores = self.scores();
        log::info!(
            "game over, {}: {} {}: {}",
            PlayerId::One.label(),
            scores[PlayerId::One],
            PlayerId::Two.label(),
            scores[PlayerId::Two],
        );
        self.status = StatusMessage::game_over(scores);
    }

    /// Song time in seconds: the audio position plus the configured latency.
    #[must_use]
    pub fn song_time(&self) -> f64 {
        self.audio.position() + self.config.timing.audio_latency.as_secs_f64()
    }

    /// Everything needed to draw the current frame.
    #[must_use]
    pub fn frame(&self) -> FrameSnapshot {
        let running = self.session.is_running();
        FrameSnapshot {
            players: PerPlayer::from_fn(|player| self.session.player_frame(player)),
            particles: self.session.particles().views().collect(),
            status: self.status.clone(),
            song: self.chart.as_ref().map(|chart| chart.song.clone()),
            song_time: running.then(|| self.song_time()),
            running,
            loaded: self.loaded,
        }
    }

    /// Takes the presentation cues queued since the last call.
    pub fn drain_feedback(&mut self) -> Vec<Feedback> {
        self.session.drain_feedback()
    }

    /// Scores of both players.
    #[must_use]
    pub fn scores(&self) -> PerPlayer<u64> {
        self.session.scores()
    }

    /// The current status message.
    #[must_use]
    pub const fn status(&self) -> &StatusMessage {
        &self.status
    }

    /// Whether a chart and its audio are loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether a session is in progress.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.session.is_running()
    }

    /// The loaded chart.
    #[must_use]
    pub const fn chart(&self) -> Option<&ChartDocument> {
        self.chart.as_ref()
    }

    /// Warnings of parsing the loaded chart.
    #[must_use]
    pub fn warnings(&self) -> &[ChartWarning] {
        &self.warnings
    }

    /// The timeline of the loaded chart.
    #[must_use]
    pub const fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// The audio file that was opened.
    #[must_use]
    pub fn audio_path(&self) -> Option<&Path> {
        self.audio_path.as_deref()
    }

    /// The running session.
    #[must_use]
    pub const fn session(&self) -> &Session<R> {
        &self.session
    }

    /// The audio stream.
    #[must_use]
    pub const fn audio(&self) -> &A {
        &self.audio
    }

    /// The audio stream, mutably.
    pub const fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    /// The configuration of this game.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }
}

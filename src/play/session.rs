//! The fixed-timestep gameplay engine.
//!
//! A [`Session`] owns the runtime notes and the state of both players for one playthrough.
//! [`Session::tick`] advances it by one fixed step at a given song time, while
//! [`Session::press`] and [`Session::release`] apply key events between steps.
//!
//! Each step runs, for each player in turn: note positions, visibility, miss detection, then
//! sustain scoring. Particles age last.

use gametime::TimeSpan;

use super::{
    note::RuntimeNote,
    particle::ParticleSystem,
    player::{PerPlayer, PlayerId, PlayerState},
    snapshot::PlayerFrame,
};
use crate::{
    config::{GameConfig, LayoutConfig},
    input::InputKey,
    rng::ParticleRng,
    timeline::Timeline,
};

/// A cue for presentation, such as a sound effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feedback {
    /// A note was struck.
    Hit {
        /// Who struck it.
        player: PlayerId,
        /// The lane of the note.
        lane: usize,
        /// Whether the note is a sustain.
        sustain: bool,
    },
    /// A note was missed.
    Miss {
        /// Whose note it was.
        player: PlayerId,
        /// The lane of the note.
        lane: usize,
    },
    /// A sustain was held to its end.
    SustainComplete {
        /// Who held it.
        player: PlayerId,
        /// The lane of the note.
        lane: usize,
    },
}

/// One playthrough of a chart by both players.
pub struct Session<R> {
    config: GameConfig,
    players: PerPlayer<PlayerState>,
    notes: PerPlayer<Vec<RuntimeNote>>,
    particles: ParticleSystem<R>,
    feedback: Vec<Feedback>,
    running: bool,
}

impl<R: ParticleRng> Session<R> {
    /// Creates an idle session without notes.
    pub fn new(config: GameConfig, rng: R) -> Self {
        let players = PerPlayer::from_fn(|id| {
            PlayerState::new(
                id,
                config.keys[id].clone(),
                config.layout.player_offset(id),
            )
        });
        let particles = ParticleSystem::new(rng, config.particles);
        Self {
            config,
            players,
            notes: PerPlayer::default(),
            particles,
            feedback: Vec::new(),
            running: false,
        }
    }

    /// Starts a new playthrough of `timeline` from scratch.
    pub fn start(&mut self, timeline: &Timeline) {
        for (_, player) in self.players.iter_mut() {
            player.reset();
        }
        self.notes = timeline.instantiate();
        self.particles.clear();
        self.feedback.clear();
        self.running = true;
    }

    /// Stops accepting steps and key events. Scores stay as they are.
    pub const fn end(&mut self) {
        self.running = false;
    }

    /// Whether the playthrough is in progress.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// The configuration this session plays with.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The state of `player`.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    /// Scores of both players.
    #[must_use]
    pub fn scores(&self) -> PerPlayer<u64> {
        PerPlayer::from_fn(|id| self.players[id].score())
    }

    /// Runtime notes of `player` in timestamp order.
    #[must_use]
    pub fn notes(&self, player: PlayerId) -> &[RuntimeNote] {
        &self.notes[player]
    }

    /// The particle system.
    #[must_use]
    pub const fn particles(&self) -> &ParticleSystem<R> {
        &self.particles
    }

    /// Whether any note of either player is visible and neither hit nor missed.
    #[must_use]
    pub fn has_unresolved_on_screen(&self) -> bool {
        self.notes
            .iter()
            .any(|(_, notes)| notes.iter().any(RuntimeNote::is_unresolved_on_screen))
    }

    /// Takes the cues queued since the last call.
    pub fn drain_feedback(&mut self) -> Vec<Feedback> {
        std::mem::take(&mut self.feedback)
    }

    /// The drawable state of `player`.
    #[must_use]
    pub fn player_frame(&self, player: PlayerId) -> PlayerFrame {
        PlayerFrame::new(
            &self.players[player],
            &self.notes[player],
            self.config.timing.fall_speed.as_f64(),
        )
    }

    /// Advances one fixed step of length `step` at song time `now` seconds.
    ///
    /// Does nothing unless the session is running.
    pub fn tick(&mut self, now: f64, step: TimeSpan) {
        if !self.running {
            return;
        }
        for player in PlayerId::ALL {
            self.update_notes(player, now);
        }
        for player in PlayerId::ALL {
            self.update_sustains(player, now, step);
        }
        self.particles.update(step);
    }

    fn update_notes(&mut self, player: PlayerId, now: f64) {
        let layout = &self.config.layout;
        let fall_speed = self.config.timing.fall_speed.as_f64();
        let tolerance = self.config.timing.tolerance.as_secs_f64();
        for note in &mut self.notes[player] {
            let timestamp = note.template().timestamp_secs;
            note.set_screen_y(layout.hit_zone_y - (timestamp - now) * fall_speed);

            let mut missed = update_visibility(note, layout, fall_speed);
            if note.is_unresolved_on_screen() && is_past_hit_window(note, layout, now, tolerance) {
                missed |= note.mark_missed();
            }
            if missed {
                self.feedback.push(Feedback::Miss {
                    player,
                    lane: note.lane(),
                });
            }
        }
    }

    fn update_sustains(&mut self, player: PlayerId, now: f64, step: TimeSpan) {
        let layout = &self.config.layout;
        let scoring = self.config.scoring;
        let interval = self.config.particles.sustain_interval;
        let state = &mut self.players[player];
        for note in &mut self.notes[player] {
            if !note.is_sustain()
                || note.is_sustain_complete()
                || note.is_missed()
                || !note.is_on_screen()
                || !note.is_hit()
            {
                continue;
            }
            let template = *note.template();

            if now > template.sustain_end_secs {
                if note.is_sustain_active() {
                    note.mark_sustain_complete();
                    state.award(scoring.sustain_bonus);
                    self.feedback.push(Feedback::SustainComplete {
                        player,
                        lane: template.lane,
                    });
                }
                note.set_sustain_active(false);
                continue;
            }

            let in_window = now >= template.timestamp_secs;
            if in_window && state.is_lane_held(template.lane) {
                note.set_sustain_active(true);
                state.award(scoring.sustain_tick);
                if note.sustain_particles_due(step, interval) {
                    self.particles.spawn_sustain(
                        layout.lane_center_x(player, template.lane),
                        layout.hit_zone_center_y(),
                        template.color,
                    );
                }
            } else {
                note.set_sustain_active(false);
            }
        }
    }

    /// Applies a key down at song time `now` seconds.
    ///
    /// Every player whose layout maps `key` records it as held. If the lane is armed, every
    /// matching note in the hit zone within the tolerance is hit, and a short-note hit disarms
    /// the lane until the key is released.
    pub fn press(&mut self, key: InputKey, now: f64) {
        if !self.running {
            return;
        }
        let layout = &self.config.layout;
        let scoring = self.config.scoring;
        let tolerance = self.config.timing.tolerance.as_secs_f64();
        let reach = layout.note_height;
        for player in PlayerId::ALL {
            let state = &mut self.players[player];
            let Some(lane) = state.press(key) else {
                continue;
            };
            if !state.is_armed(lane) {
                continue;
            }

            let mut short_hit = false;
            for note in &mut self.notes[player] {
                if note.lane() != lane
                    || !note.is_unresolved_on_screen()
                    || note.screen_y() < layout.hit_zone_y - reach
                    || note.screen_y() > layout.hit_zone_y + layout.hit_zone_height + reach
                    || (note.template().timestamp_secs - now).abs() > tolerance
                {
                    continue;
                }
                note.mark_hit();
                let sustain = note.is_sustain();
                state.award(if sustain {
                    scoring.sustain_hit
                } else {
                    scoring.short_hit
                });
                short_hit |= !sustain;
                self.feedback.push(Feedback::Hit {
                    player,
                    lane,
                    sustain,
                });
                self.particles.spawn_hit(
                    layout.lane_center_x(player, lane),
                    note.screen_y(),
                    note.template().color,
                );
            }
            if short_hit {
                state.disarm(lane);
            }
        }
    }

    /// Applies a key up. Re-arms the lane of every player whose layout maps `key`.
    pub fn release(&mut self, key: InputKey) {
        if !self.running {
            return;
        }
        for (_, state) in self.players.iter_mut() {
            state.release(key);
        }
    }
}

/// Updates `on_screen` of `note`. Returns whether the note became missed by leaving the screen.
fn update_visibility(note: &mut RuntimeNote, layout: &LayoutConfig, fall_speed: f64) -> bool {
    let y = note.screen_y();
    let radius = layout.note_height / 2.0;
    let height = layout.window_height;
    let tail = note.tail_pixels(fall_speed).max(0.0);

    let head_visible = y + radius > 0.0 && y - radius < height;
    let tail_visible = note.is_sustain() && y > 0.0 && y - tail < height;
    if head_visible || tail_visible {
        note.set_on_screen(true);
    }
    if !note.is_on_screen() {
        return false;
    }

    let highest = if note.is_sustain() {
        y - tail
    } else {
        y - radius
    };
    let mut missed = false;
    if y + radius < 0.0 || highest > height {
        note.set_on_screen(false);
        if !note.is_hit() || (note.is_sustain() && !note.is_sustain_complete()) {
            missed = note.mark_missed();
        }
    }
    missed
}

/// Whether an unhit note can no longer be hit.
fn is_past_hit_window(note: &RuntimeNote, layout: &LayoutConfig, now: f64, tolerance: f64) -> bool {
    if note.is_sustain() {
        now > note.template().sustain_end_secs + tolerance
    } else {
        note.screen_y() > layout.hit_zone_y + layout.hit_zone_height + layout.note_height / 2.0
    }
}

//! Notes as the gameplay engine sees them.
//!
//! A [`TemplateNote`] is the timed, immutable form built once per chart. Each session copies
//! the templates into [`RuntimeNote`]s, which carry the state of one playthrough.

use gametime::TimeSpan;

use super::player::PlayerId;

/// The color of a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LaneColor {
    /// Lane 0.
    Green,
    /// Lane 1.
    Red,
    /// Lane 2.
    Yellow,
    /// Lane 3.
    Blue,
    /// Lane 4.
    Orange,
    /// Any other lane.
    White,
}

impl LaneColor {
    /// The color of `lane`.
    #[must_use]
    pub const fn of_lane(lane: usize) -> Self {
        match lane {
            0 => Self::Green,
            1 => Self::Red,
            2 => Self::Yellow,
            3 => Self::Blue,
            4 => Self::Orange,
            _ => Self::White,
        }
    }

    /// Opaque RGBA components.
    #[must_use]
    pub const fn rgba(self) -> [u8; 4] {
        match self {
            Self::Green => [0, 255, 0, 255],
            Self::Red => [255, 0, 0, 255],
            Self::Yellow => [255, 255, 0, 255],
            Self::Blue => [0, 0, 255, 255],
            Self::Orange => [255, 165, 0, 255],
            Self::White => [255, 255, 255, 255],
        }
    }

    /// RGBA components with the given alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: u8) -> [u8; 4] {
        let [r, g, b, _] = self.rgba();
        [r, g, b, alpha]
    }
}

/// A note placed on the song timeline for one player.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateNote {
    /// When the head reaches the hit zone, in song seconds.
    pub timestamp_secs: f64,
    /// When the sustain ends. Equal to `timestamp_secs` for short notes.
    pub sustain_end_secs: f64,
    /// The tick this note came from.
    pub origin_tick: u64,
    /// The lane of the note.
    pub lane: usize,
    /// The color of the lane.
    pub color: LaneColor,
    /// Whether the note must be held.
    pub is_sustain: bool,
    /// The player who plays this note.
    pub owner: PlayerId,
}

impl TemplateNote {
    /// Length of the sustain in seconds, `0.0` for short notes.
    #[must_use]
    pub fn sustain_secs(&self) -> f64 {
        (self.sustain_end_secs - self.timestamp_secs).max(0.0)
    }
}

/// Where a note is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteState {
    /// Not yet scrolled into view.
    Upcoming,
    /// Visible and waiting for a press.
    OnScreen,
    /// Struck in time.
    Hit,
    /// Passed without a hit, or a sustain dropped before its end.
    Missed,
}

/// Where a struck sustain is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SustainState {
    /// The head has not been hit.
    Pending,
    /// Held and scoring.
    Active,
    /// Hit but not held right now. Holding again resumes scoring.
    Held,
    /// Held through its end.
    Complete,
    /// Scrolled away before it was completed.
    MissedIncomplete,
}

/// A note of one playthrough.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeNote {
    template: TemplateNote,
    screen_y: f64,
    on_screen: bool,
    hit: bool,
    missed: bool,
    sustain_active: bool,
    sustain_complete: bool,
    next_sustain_particles: TimeSpan,
}

impl From<TemplateNote> for RuntimeNote {
    fn from(template: TemplateNote) -> Self {
        Self::new(template)
    }
}

impl RuntimeNote {
    /// A fresh note, off screen and unresolved.
    #[must_use]
    pub const fn new(template: TemplateNote) -> Self {
        Self {
            template,
            screen_y: 0.0,
            on_screen: false,
            hit: false,
            missed: false,
            sustain_active: false,
            sustain_complete: false,
            next_sustain_particles: TimeSpan::ZERO,
        }
    }

    /// The timeline data of this note.
    #[must_use]
    pub const fn template(&self) -> &TemplateNote {
        &self.template
    }

    /// The lane of this note.
    #[must_use]
    pub const fn lane(&self) -> usize {
        self.template.lane
    }

    /// Whether this note must be held.
    #[must_use]
    pub const fn is_sustain(&self) -> bool {
        self.template.is_sustain
    }

    /// Vertical center of the head in pixels.
    #[must_use]
    pub const fn screen_y(&self) -> f64 {
        self.screen_y
    }

    /// Whether the note is currently drawn.
    #[must_use]
    pub const fn is_on_screen(&self) -> bool {
        self.on_screen
    }

    /// Whether the note was hit.
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        self.hit
    }

    /// Whether the note was missed.
    #[must_use]
    pub const fn is_missed(&self) -> bool {
        self.missed
    }

    /// Whether the sustain scored on the last step.
    #[must_use]
    pub const fn is_sustain_active(&self) -> bool {
        self.sustain_active
    }

    /// Whether the sustain was held through its end.
    #[must_use]
    pub const fn is_sustain_complete(&self) -> bool {
        self.sustain_complete
    }

    /// Visible, neither hit nor missed.
    #[must_use]
    pub const fn is_unresolved_on_screen(&self) -> bool {
        self.on_screen && !self.hit && !self.missed
    }

    /// Height of the sustain tail in pixels at `fall_speed`.
    #[must_use]
    pub fn tail_pixels(&self, fall_speed: f64) -> f64 {
        self.template.sustain_secs() * fall_speed
    }

    /// The life stage of this note.
    #[must_use]
    pub const fn state(&self) -> NoteState {
        if self.hit {
            NoteState::Hit
        } else if self.missed {
            NoteState::Missed
        } else if self.on_screen {
            NoteState::OnScreen
        } else {
            NoteState::Upcoming
        }
    }

    /// The sustain stage of this note, `None` for short notes.
    #[must_use]
    pub const fn sustain_state(&self) -> Option<SustainState> {
        if !self.template.is_sustain {
            return None;
        }
        Some(if self.sustain_complete {
            SustainState::Complete
        } else if !self.hit {
            SustainState::Pending
        } else if self.missed {
            SustainState::MissedIncomplete
        } else if self.sustain_active {
            SustainState::Active
        } else {
            SustainState::Held
        })
    }

    pub(crate) const fn set_screen_y(&mut self, y: f64) {
        self.screen_y = y;
    }

    pub(crate) const fn set_on_screen(&mut self, on_screen: bool) {
        self.on_screen = on_screen;
    }

    pub(crate) const fn mark_hit(&mut self) {
        self.hit = true;
    }

    /// Returns whether the note was not missed before.
    pub(crate) const fn mark_missed(&mut self) -> bool {
        let first = !self.missed;
        self.missed = true;
        first
    }

    pub(crate) const fn set_sustain_active(&mut self, active: bool) {
        self.sustain_active = active;
    }

    pub(crate) const fn mark_sustain_complete(&mut self) {
        self.sustain_complete = true;
        self.sustain_active = false;
    }

    /// Counts down the particle timer by `step`. Returns whether a trickle is due.
    pub(crate) fn sustain_particles_due(&mut self, step: TimeSpan, interval: TimeSpan) -> bool {
        self.next_sustain_particles -= step;
        if self.next_sustain_particles <= TimeSpan::ZERO {
            self.next_sustain_particles = interval;
            return true;
        }
        false
    }
}

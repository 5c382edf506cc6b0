//! Everything a renderer needs to draw one frame.

use super::{
    note::{LaneColor, RuntimeNote},
    particle::ParticleView,
    player::{PerPlayer, PlayerState},
    status::StatusMessage,
};
use crate::chart::SongInfo;

/// A visible note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteView {
    /// Lane index within the player's fret area.
    pub lane: usize,
    /// Vertical center of the head in pixels.
    pub screen_y: f64,
    /// Whether the sustain is being held right now.
    pub sustain_active: bool,
    /// Whether the note was hit.
    pub hit: bool,
    /// Whether the note was missed.
    pub missed: bool,
    /// Whether the sustain was held to its end.
    pub sustain_complete: bool,
    /// Color of the lane.
    pub color: LaneColor,
    /// Whether the note is a sustain.
    pub is_sustain: bool,
    /// Height of the sustain tail above the head, `0.0` for short notes.
    pub sustain_pixel_length: f64,
}

impl NoteView {
    pub(crate) fn new(note: &RuntimeNote, fall_speed: f64) -> Self {
        Self {
            lane: note.lane(),
            screen_y: note.screen_y(),
            sustain_active: note.is_sustain_active(),
            hit: note.is_hit(),
            missed: note.is_missed(),
            sustain_complete: note.is_sustain_complete(),
            color: note.template().color,
            is_sustain: note.is_sustain(),
            sustain_pixel_length: note.tail_pixels(fall_speed),
        }
    }
}

/// One player's part of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerFrame {
    /// Current score.
    pub score: u64,
    /// Left edge of the fret area in pixels.
    pub offset_x: f64,
    /// Lanes whose key is held, ascending.
    pub pressed_lanes: Vec<usize>,
    /// Notes on screen, in timestamp order.
    pub notes: Vec<NoteView>,
}

impl PlayerFrame {
    pub(crate) fn new(player: &PlayerState, notes: &[RuntimeNote], fall_speed: f64) -> Self {
        let mut pressed_lanes: Vec<_> = player.held_lanes().collect();
        pressed_lanes.sort_unstable();
        Self {
            score: player.score(),
            offset_x: player.offset_x(),
            pressed_lanes,
            notes: notes
                .iter()
                .filter(|note| note.is_on_screen())
                .map(|note| NoteView::new(note, fall_speed))
                .collect(),
        }
    }
}

/// A frame of the game.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    /// Both players.
    pub players: PerPlayer<PlayerFrame>,
    /// Live particles.
    pub particles: Vec<ParticleView>,
    /// The status line.
    pub status: StatusMessage,
    /// Metadata of the loaded song.
    pub song: Option<SongInfo>,
    /// Song time in seconds while a session is in progress.
    pub song_time: Option<f64>,
    /// Whether a session is in progress.
    pub running: bool,
    /// Whether a chart and its audio are loaded.
    pub loaded: bool,
}

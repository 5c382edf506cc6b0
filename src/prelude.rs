//! Prelude module for this crate.
//!
//! You can use `use riff_hero::prelude::*;` to import the commonly used types at once.

pub use crate::{
    audio::{AudioError, MusicStream, PlaybackStatus, open_with_fallback},
    chart::prelude::*,
    config::{AudioConfig, GameConfig, LayoutConfig, ParticleConfig, ScoringConfig, TimingConfig},
    input::{InputKey, KeyLayout},
    play::{
        clock::FixedStep,
        game::{Game, LoadError},
        note::{LaneColor, NoteState, RuntimeNote, SustainState, TemplateNote},
        particle::{Particle, ParticleSystem, ParticleView},
        player::{PerPlayer, PlayerId, PlayerState},
        session::{Feedback, Session},
        snapshot::{FrameSnapshot, NoteView, PlayerFrame},
        status::{StatusKind, StatusMessage},
    },
    rng::{ParticleRng, RngMock},
    tempo::{TempoMap, TempoSegment},
    timeline::Timeline,
};

#[cfg(feature = "rand")]
pub use crate::rng::RandRng;

//! Gameplay of two players on one chart.
//!
//! [`session::Session`] is the fixed-timestep engine: it moves notes, judges presses, scores
//! sustains and spawns particles. [`game::Game`] wraps it with chart loading, an audio clock, the
//! start key and the end of a session, and hands out [`snapshot::FrameSnapshot`]s to draw.

pub mod clock;
pub mod game;
pub mod note;
pub mod particle;
pub mod player;
pub mod session;
pub mod snapshot;
pub mod status;

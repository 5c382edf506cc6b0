//! Chart parsing, tempo mapping and gameplay core for a two-player falling-note rhythm game.
//!
//! The crate is organised leaf-first:
//!
//! - [`chart`] turns `.chart` text into a [`chart::ChartDocument`] of song metadata, tempo events,
//!   time signatures and notes.
//! - [`tempo`] converts tick positions into wall-clock seconds by integrating over the
//!   piecewise-constant BPM segments of a chart.
//! - [`timeline`] maps every chart note into timestamped template notes, one per player.
//! - [`play`] runs the fixed-timestep gameplay: note movement, visibility, hit detection,
//!   sustain scoring, particles and session end, plus a [`play::game::Game`] shell that wires
//!   the engine to an audio clock and key input.
//!
//! Rendering, audio decoding and windowing are left to the caller. The engine only consumes a
//! [`audio::MusicStream`] clock and [`input::InputKey`] events, and exposes everything a renderer
//! needs through [`play::snapshot::FrameSnapshot`].
//!
//! # Example
//!
//! ```
//! use riff_hero::{chart::parse_chart, tempo::TempoMap};
//!
//! let source = r#"
//! [Song]
//! {
//!   Name = "Example"
//!   Resolution = 192
//! }
//! [SyncTrack]
//! {
//!   0 = B 120000
//! }
//! [ExpertSingle]
//! {
//!   192 = N 0 0
//! }
//! "#;
//!
//! let output = parse_chart(source).expect("the chart must parse");
//! let tempo = TempoMap::new(&output.chart);
//! assert_eq!(tempo.ticks_to_seconds(192), 0.5);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod audio;
pub mod chart;
pub mod config;
pub mod diagnostics;
pub mod input;
pub mod play;
pub mod prelude;
pub mod rng;
pub mod tempo;
pub mod timeline;

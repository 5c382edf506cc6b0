//! Prelude module for the chart parser.
//!
//! You can use `use riff_hero::chart::prelude::*;` to import every chart type at once.

#[cfg(feature = "diagnostics")]
pub use crate::diagnostics::{SimpleSource, ToAriadne, emit_chart_diagnostics};

pub use super::{
    ChartError, ChartOutput, ChartWarning, FileNotFoundReason, load_chart,
    model::{
        ChartDocument, ChartNote, DEFAULT_RESOLUTION, DEFAULT_TEMPO_RAW, Difficulty, SongInfo,
        TempoEvent, TimeSignatureEvent,
    },
    parse_chart, read_chart_source,
};

//! The parser of `.chart` files.
//!
//! Parsing has two phases. [`lex`] classifies each line into a [`lex::Token`] with its byte
//! span, then [`parse`] interprets the tokens according to the active section and builds a
//! [`ChartDocument`].
//!
//! Our policies are:
//!
//! - Input is decoded as UTF-8, a leading BOM is skipped and invalid sequences are replaced.
//! - A number that cannot be read aborts the whole parse, because silently skipping it would
//!   shift timing.
//! - Everything else that is not understood is ignored, or reported as a [`ChartWarning`].

pub mod lex;
pub mod model;
pub mod parse;
pub mod prelude;

use std::{
    ops::Range,
    path::{Path, PathBuf},
};

use thiserror::Error;

pub use self::model::{
    ChartDocument, ChartNote, Difficulty, SongInfo, TempoEvent, TimeSignatureEvent,
};

/// Why a chart file could not be turned into text.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FileNotFoundReason {
    /// The file system refused to hand over the bytes.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// The file exists but has no content.
    #[error("the file is empty")]
    EmptyFile,
}

/// A fatal error of loading or parsing a chart.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ChartError {
    /// The chart file is missing, unreadable or empty.
    #[error("failed to read chart file `{}`: {reason}", .path.display())]
    FileNotFound {
        /// The path that was requested.
        path: PathBuf,
        /// What went wrong.
        reason: FileNotFoundReason,
    },
    /// A value that must be a number could not be read as one.
    #[error("malformed number for `{key}` at line {line}: {value:?}")]
    MalformedNumber {
        /// 1-based line number.
        line: usize,
        /// The key or command the number belongs to.
        key: String,
        /// The offending text.
        value: String,
        /// Byte range of the offending text in the source.
        span: Range<usize>,
    },
}

impl ChartError {
    /// The byte range in the source this error points at, if it has one.
    #[must_use]
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            Self::FileNotFound { .. } => None,
            Self::MalformedNumber { span, .. } => Some(span.clone()),
        }
    }
}

/// A non-fatal finding of the parser.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChartWarning {
    /// `[SyncTrack]` has no tempo at tick 0, so 120 BPM is assumed from the start.
    #[error("no tempo at tick 0, 120 BPM is assumed until the first tempo change")]
    MissingTempoAtZero,
    /// `Resolution = 0` makes tick positions meaningless.
    #[error("resolution is 0 at line {line}, ticks cannot be converted into seconds")]
    DegenerateResolution {
        /// 1-based line number of the `Resolution` entry.
        line: usize,
        /// Byte range of the `Resolution` entry.
        span: Range<usize>,
    },
    /// A section with a name this crate does not know.
    #[error("unknown section `[{name}]` at line {line}")]
    UnknownSection {
        /// 1-based line number of the header.
        line: usize,
        /// The section name between the brackets.
        name: String,
        /// Byte range of the header.
        span: Range<usize>,
    },
}

impl ChartWarning {
    /// The byte range in the source this warning points at, if it has one.
    #[must_use]
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            Self::MissingTempoAtZero => None,
            Self::DegenerateResolution { span, .. } | Self::UnknownSection { span, .. } => {
                Some(span.clone())
            }
        }
    }
}

/// Output of parsing a chart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartOutput {
    /// The parsed chart.
    pub chart: ChartDocument,
    /// Warnings that occurred during parsing.
    pub warnings: Vec<ChartWarning>,
}

/// Parses chart source text.
///
/// # Errors
///
/// Returns [`ChartError::MalformedNumber`] when a numeric field holds text that is not a number
/// or does not fit its type.
///
/// # Example
///
/// ```
/// use riff_hero::chart::{ChartOutput, parse_chart};
///
/// let ChartOutput { chart, warnings } =
///     parse_chart("[SyncTrack]\n{\n0 = B 150000\n}\n").expect("valid chart");
/// assert_eq!(chart.tempos[&0].bpm(), 150.0);
/// assert!(warnings.is_empty());
/// ```
pub fn parse_chart(source: &str) -> Result<ChartOutput, ChartError> {
    parse::parse_tokens(lex::lex(source))
}

/// Reads a chart file and parses it.
///
/// # Errors
///
/// Returns [`ChartError::FileNotFound`] when the file cannot be read or is empty, and any error
/// of [`parse_chart`].
pub fn load_chart(path: impl AsRef<Path>) -> Result<ChartOutput, ChartError> {
    let source = read_chart_source(path.as_ref())?;
    parse_chart(&source)
}

/// Reads a chart file into text, skipping a UTF-8 BOM.
///
/// # Errors
///
/// Returns [`ChartError::FileNotFound`] when the file cannot be read or is empty.
pub fn read_chart_source(path: &Path) -> Result<String, ChartError> {
    let not_found = |reason| ChartError::FileNotFound {
        path: path.to_path_buf(),
        reason,
    };
    let bytes = std::fs::read(path).map_err(|e| not_found(FileNotFoundReason::Io(e)))?;
    if bytes.is_empty() {
        return Err(not_found(FileNotFoundReason::EmptyFile));
    }
    let (text, malformed) = encoding_rs::UTF_8.decode_with_bom_removal(&bytes);
    if malformed {
        log::warn!(
            "chart file {} is not valid UTF-8, invalid bytes were replaced",
            path.display()
        );
    }
    Ok(text.into_owned())
}

//! Section-driven interpretation of lexed chart lines.

use std::{ops::Range, str::FromStr};

use itertools::Itertools;

use super::{
    ChartError, ChartOutput, ChartWarning,
    lex::{LexedLine, Token},
    model::{ChartDocument, ChartNote, Difficulty, SongInfo, TempoEvent, TimeSignatureEvent},
};

/// Type alias of `core::result::Result<T, ChartError>`
pub(crate) type Result<T> = core::result::Result<T, ChartError>;

/// The section whose lines are currently read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// Before the first header.
    Preamble,
    Song,
    SyncTrack,
    Notes(Difficulty),
    Unknown,
}

impl Section {
    fn from_name(name: &str) -> Self {
        match name {
            "Song" => Self::Song,
            "SyncTrack" => Self::SyncTrack,
            _ => Difficulty::from_section_name(name).map_or(Self::Unknown, Self::Notes),
        }
    }
}

/// An entry with the positions needed for error reporting.
struct Entry<'a> {
    line: usize,
    span: Range<usize>,
    key: &'a str,
    value: &'a str,
    value_span: Range<usize>,
}

impl Entry<'_> {
    fn malformed(&self, key: &str, value: &str, span: Range<usize>) -> ChartError {
        ChartError::MalformedNumber {
            line: self.line,
            key: key.to_string(),
            value: value.to_string(),
            span,
        }
    }

    /// Parses the whole value as a number of the `Song` section, quotes allowed.
    fn number<T: FromStr>(&self) -> Result<T> {
        let text = unquote(self.value);
        let quote = (self.value.len() - text.len()) / 2;
        text.parse().map_err(|_| {
            let span = self.value_span.start + quote..self.value_span.end - quote;
            self.malformed(self.key, text, span)
        })
    }

    /// Parses the key as a tick, or `None` if it is not made of digits.
    fn tick(&self) -> Result<Option<u64>> {
        digits(self.key, || {
            self.malformed("tick", self.key, self.span.start..self.span.start + self.key.len())
        })
    }
}

/// Parses an all-digit token. Other text yields `None`, digits that overflow `T` are an error.
fn digits<T: FromStr>(text: &str, on_overflow: impl FnOnce() -> ChartError) -> Result<Option<T>> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    text.parse().map(Some).map_err(|_| on_overflow())
}

/// Builds a [`ChartDocument`] out of lexed lines.
///
/// # Errors
///
/// Returns [`ChartError::MalformedNumber`] for the first number that cannot be read.
pub fn parse_tokens<'a>(lines: impl IntoIterator<Item = LexedLine<'a>>) -> Result<ChartOutput> {
    let mut chart = ChartDocument::default();
    let mut warnings = Vec::new();
    let mut section = Section::Preamble;
    let mut resolution_at = None;

    for LexedLine { line, span, token } in lines {
        match token {
            Token::Section(name) => {
                section = Section::from_name(name);
                if section == Section::Unknown {
                    if !chart.unknown_sections.iter().any(|known| known == name) {
                        chart.unknown_sections.push(name.to_string());
                    }
                    warnings.push(ChartWarning::UnknownSection {
                        line,
                        name: name.to_string(),
                        span,
                    });
                }
            }
            Token::Entry {
                key,
                value,
                value_span,
            } => {
                let entry = Entry {
                    line,
                    span,
                    key,
                    value,
                    value_span,
                };
                match section {
                    Section::Song => {
                        if parse_song_entry(&mut chart.song, &entry)? == SongKey::Resolution {
                            resolution_at = Some((entry.line, entry.span.clone()));
                        }
                    }
                    Section::SyncTrack => parse_sync_entry(&mut chart, &entry)?,
                    Section::Notes(_) => parse_note_entry(&mut chart, &entry)?,
                    Section::Preamble | Section::Unknown => {}
                }
            }
            Token::OpenBrace | Token::CloseBrace | Token::Other(_) => {}
        }
    }

    chart.notes.sort_by_key(|note| note.tick);

    if !chart.has_tempo_at_zero() {
        warnings.push(ChartWarning::MissingTempoAtZero);
    }
    if chart.song.resolution == 0 {
        let (line, span) = resolution_at.unwrap_or((0, 0..0));
        warnings.push(ChartWarning::DegenerateResolution { line, span });
    }

    log::debug!(
        "parsed chart: {} notes, {} tempo events, {} time signatures, unknown sections [{}]",
        chart.notes.len(),
        chart.tempos.len(),
        chart.time_signatures.len(),
        chart.unknown_sections.iter().join(", "),
    );
    Ok(ChartOutput { chart, warnings })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SongKey {
    Resolution,
    Other,
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_song_entry(song: &mut SongInfo, entry: &Entry<'_>) -> Result<SongKey> {
    let text = || unquote(entry.value).to_string();
    match entry.key {
        "Name" => song.title = text(),
        "Artist" => song.artist = text(),
        "Charter" => song.charter = text(),
        "Album" => song.album = text(),
        "Year" => song.year = text(),
        "Genre" => song.genre = text(),
        "MediaType" => song.media_type = text(),
        "Player2" => song.player2 = text(),
        "MusicStream" => song.music_stream = text(),
        "Offset" => song.offset = entry.number()?,
        "Resolution" => {
            song.resolution = entry.number()?;
            return Ok(SongKey::Resolution);
        }
        "Difficulty" => song.difficulty = entry.number()?,
        "PreviewStart" => song.preview_start = entry.number()?,
        "PreviewEnd" => song.preview_end = entry.number()?,
        _ => {}
    }
    Ok(SongKey::Other)
}

/// Splits `B 120000` into the command and its digit arguments with their spans.
///
/// Returns `None` when an argument is not made of digits.
fn command_args<'a>(entry: &Entry<'a>) -> Option<(&'a str, Vec<(&'a str, Range<usize>)>)> {
    let mut parts = words(entry.value);
    let (_, command) = parts.next()?;
    let args: Vec<_> = parts
        .map(|(offset, part)| {
            let start = entry.value_span.start + offset;
            (part, start..start + part.len())
        })
        .collect();
    args.iter()
        .all(|(part, _)| part.bytes().all(|b| b.is_ascii_digit()))
        .then_some((command, args))
}

/// Whitespace separated words with their byte offsets in `text`.
fn words(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut cursor = 0;
    std::iter::from_fn(move || {
        let rest = text.get(cursor..)?;
        let start = cursor + (rest.len() - rest.trim_start().len());
        let word = text.get(start..)?;
        let len = word.find(char::is_whitespace).unwrap_or(word.len());
        if len == 0 {
            return None;
        }
        cursor = start + len;
        Some((start, &word[..len]))
    })
}

fn arg<T: FromStr>(entry: &Entry<'_>, command: &str, token: &(&str, Range<usize>)) -> Result<T> {
    let (text, span) = token;
    digits(text, || entry.malformed(command, text, span.clone()))?
        .ok_or_else(|| entry.malformed(command, text, span.clone()))
}

fn parse_sync_entry(chart: &mut ChartDocument, entry: &Entry<'_>) -> Result<()> {
    let Some((command, args)) = command_args(entry) else {
        return Ok(());
    };
    if !matches!((command, args.len()), ("B", 1) | ("TS", 1 | 2)) {
        return Ok(());
    }
    let Some(tick) = entry.tick()? else {
        return Ok(());
    };
    match (command, args.as_slice()) {
        ("B", [value]) => {
            let raw_value = arg(entry, command, value)?;
            chart.tempos.insert(tick, TempoEvent::new(tick, raw_value));
        }
        ("TS", [numerator]) => {
            let numerator = arg(entry, command, numerator)?;
            chart
                .time_signatures
                .insert(tick, TimeSignatureEvent::new(tick, numerator, None));
        }
        ("TS", [numerator, denominator]) => {
            let numerator = arg(entry, command, numerator)?;
            let denominator = arg(entry, command, denominator)?;
            chart.time_signatures.insert(
                tick,
                TimeSignatureEvent::new(tick, numerator, Some(denominator)),
            );
        }
        _ => {}
    }
    Ok(())
}

fn parse_note_entry(chart: &mut ChartDocument, entry: &Entry<'_>) -> Result<()> {
    let Some((command, args)) = command_args(entry) else {
        return Ok(());
    };
    if let ("N", [lane, length]) = (command, args.as_slice()) {
        let Some(tick) = entry.tick()? else {
            return Ok(());
        };
        chart.notes.push(ChartNote {
            tick,
            lane: arg(entry, command, lane)?,
            length_ticks: arg(entry, command, length)?,
        });
    }
    Ok(())
}

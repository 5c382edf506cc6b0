//! Fancy diagnostics of chart errors and warnings using `ariadne`.
//!
//! [`ChartError`] and [`ChartWarning`] carry byte spans into the chart source, so ariadne can
//! work out rows and columns by itself.
//!
//! # Usage Example
//!
//! ```rust
//! # #[cfg(feature = "diagnostics")]
//! # {
//! use riff_hero::{chart::parse_chart, diagnostics::emit_chart_diagnostics};
//!
//! let source = "[Song]\n{\n  Name = \"Test\"\n}\n[Events]\n{\n}\n";
//! let output = parse_chart(source).expect("valid chart");
//! emit_chart_diagnostics("test.chart", source, &output.warnings);
//! # }
//! ```

#[cfg(feature = "diagnostics")]
use ariadne::{Color, Label, Report, ReportKind, Source};

#[cfg(feature = "diagnostics")]
use crate::chart::{ChartError, ChartWarning};

/// Simple source container that holds the filename and source text.
///
/// ```rust
/// use riff_hero::diagnostics::SimpleSource;
///
/// let source = SimpleSource::new("song.chart", "[Song]\n");
/// assert_eq!(source.text(), "[Song]\n");
/// assert_eq!(source.name(), "song.chart");
/// ```
pub struct SimpleSource<'a> {
    name: &'a str,
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Creates a new source container.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// The complete text of the source.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// The name of the source file.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }
}

/// Conversion of positioned findings into `ariadne::Report`.
#[cfg(feature = "diagnostics")]
pub trait ToAriadne {
    /// Builds the report against `src`, which supplies the file name.
    fn to_report<'a>(&self, src: &SimpleSource<'a>)
    -> Report<'a, (String, std::ops::Range<usize>)>;
}

/// Builds a styled `Report` with one label.
#[cfg(feature = "diagnostics")]
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: std::ops::Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> Report<'a, (String, std::ops::Range<usize>)> {
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message.to_string())
                .with_color(color),
        )
        .finish()
}

#[cfg(feature = "diagnostics")]
impl ToAriadne for ChartWarning {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        let label = match self {
            Self::MissingTempoAtZero => "add `0 = B <bpm × 1000>` to [SyncTrack]",
            Self::DegenerateResolution { .. } => "resolution must be positive",
            Self::UnknownSection { .. } => "this section is skipped",
        };
        build_report(
            src,
            ReportKind::Warning,
            self.span().unwrap_or(0..0),
            &format!("chart: {self}"),
            label,
            Color::Yellow,
        )
    }
}

#[cfg(feature = "diagnostics")]
impl ToAriadne for ChartError {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        let label = match self {
            Self::MalformedNumber { key, .. } => format!("`{key}` expects a number"),
            Self::FileNotFound { .. } => self.to_string(),
        };
        build_report(
            src,
            ReportKind::Error,
            self.span().unwrap_or(0..0),
            &format!("chart: {self}"),
            label,
            Color::Red,
        )
    }
}

/// Prints every warning of a chart to stderr.
#[cfg(feature = "diagnostics")]
pub fn emit_chart_diagnostics<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a ChartWarning>,
) {
    let simple = SimpleSource::new(name, source);
    let ariadne_source = Source::from(source);
    for w in warnings {
        let report = w.to_report(&simple);
        let _ = report.eprint((name.to_string(), ariadne_source.clone()));
    }
}

/// Prints a chart error to stderr.
#[cfg(feature = "diagnostics")]
pub fn emit_chart_error(name: &str, source: &str, error: &ChartError) {
    let simple = SimpleSource::new(name, source);
    let _ = error
        .to_report(&simple)
        .eprint((name.to_string(), Source::from(source)));
}

/// Collects the reports of chart warnings without printing them.
#[cfg(feature = "diagnostics")]
#[must_use]
pub fn collect_chart_reports<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a ChartWarning>,
) -> Vec<Report<'a, (String, std::ops::Range<usize>)>> {
    let simple = SimpleSource::new(name, source);
    warnings.into_iter().map(|w| w.to_report(&simple)).collect()
}

#[cfg(all(test, feature = "diagnostics"))]
mod tests {
    use super::*;
    use crate::chart::parse_chart;

    #[test]
    fn renders_warnings_and_errors() {
        let source = "[Events]\n{\n}\n[Song]\n{\n  Offset = soon\n}\n";
        let warnings = parse_chart("[Events]\n{\n}\n").unwrap().warnings;
        let reports = collect_chart_reports("a.chart", source, &warnings);
        assert_eq!(reports.len(), warnings.len());

        let error = parse_chart(source).unwrap_err();
        let mut rendered = Vec::new();
        error
            .to_report(&SimpleSource::new("a.chart", source))
            .write(("a.chart".to_string(), Source::from(source)), &mut rendered)
            .unwrap();
        let rendered = String::from_utf8_lossy(&rendered);
        assert!(rendered.contains("Offset"));
    }
}

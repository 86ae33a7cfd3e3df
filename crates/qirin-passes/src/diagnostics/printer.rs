//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Renderer, Snippet};
use qirin_hir::{Position, Range};

use super::code::Severity;
use super::Diagnostics;

/// Renders diagnostics, with source snippets when source text is supplied.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
    min_severity: Severity,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
            min_severity: Severity::Info,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    /// Drop diagnostics below `severity`. Defaults to `Info`, which hides
    /// only `Hidden` entries.
    pub fn min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let shown: Vec<_> = self
            .diagnostics
            .iter()
            .filter(|d| d.severity >= self.min_severity)
            .collect();

        let Some(source) = self.source else {
            for (i, diag) in shown.iter().enumerate() {
                if i > 0 {
                    w.write_char('\n')?;
                }
                write!(w, "{diag}")?;
            }
            return Ok(());
        };

        if shown.is_empty() {
            return Ok(());
        }

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in shown.iter().enumerate() {
            let message = diag.message();
            let span = byte_span(source, diag.range);

            let mut snippet = Snippet::source(source)
                .line_start(1)
                .annotation(AnnotationKind::Primary.span(span).label(&message));
            if let Some(p) = self.path {
                snippet = snippet.path(p);
            }

            let level = severity_to_level(diag.severity);
            let report: Vec<Group> = vec![level.primary_title(&message).element(snippet)];

            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }
}

fn severity_to_level(severity: Severity) -> annotate_snippets::Level<'static> {
    use annotate_snippets::Level;
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
        Severity::Info | Severity::Hidden => Level::INFO,
    }
}

/// Byte range of a line/column range inside `source`. Clamped to the source
/// so malformed ranges still render.
fn byte_span(source: &str, range: Range) -> std::ops::Range<usize> {
    let start = byte_offset(source, range.start);
    let end = byte_offset(source, range.end).max(start);
    if start == end {
        start..(end + 1).min(source.len().max(1))
    } else {
        start..end
    }
}

fn byte_offset(source: &str, position: Position) -> usize {
    let mut offset = 0;
    for (i, line) in source.split_inclusive('\n').enumerate() {
        if i as u32 == position.line {
            let column = (position.column as usize).min(line.trim_end_matches('\n').len());
            return offset + column;
        }
        offset += line.len();
    }
    offset.min(source.len())
}

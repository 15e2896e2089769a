//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use rowan::TextRange;

use super::Diagnostics;
use super::message::{DiagnosticMessage, Severity};
use crate::source_map::SourceMap;

/// Renders diagnostics against the sources they point into.
///
/// A diagnostic whose source is missing from the map falls back to its
/// one-line form.
pub struct DiagnosticsPrinter<'a> {
    diagnostics: &'a Diagnostics,
    sources: &'a SourceMap,
    colored: bool,
}

impl<'a> DiagnosticsPrinter<'a> {
    pub fn new(diagnostics: &'a Diagnostics, sources: &'a SourceMap) -> Self {
        Self {
            diagnostics,
            sources,
            colored: false,
        }
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            match self.sources.get(diag.source) {
                // Files that failed to load have nothing to annotate.
                Some(source) if source.content.is_empty() => {
                    write!(w, "{}: {}", source.kind.display_name(), diag)?
                }
                Some(source) => {
                    let path = source.kind.display_name();
                    self.format_snippet(diag, source.content, path, &renderer, w)?;
                }
                None => write!(w, "{}", diag)?,
            }
        }

        Ok(())
    }

    fn format_snippet(
        &self,
        diag: &DiagnosticMessage,
        source: &str,
        path: &str,
        renderer: &Renderer,
        w: &mut impl Write,
    ) -> std::fmt::Result {
        let range = adjust_range(diag.range, source.len());

        let mut snippet = Snippet::source(source)
            .line_start(1)
            .path(path)
            .annotation(AnnotationKind::Primary.span(range).label(&diag.message));

        for related in &diag.related {
            // Related info in another file cannot share this snippet.
            if related.span.source != diag.source {
                continue;
            }
            snippet = snippet.annotation(
                AnnotationKind::Context
                    .span(adjust_range(related.span.range, source.len()))
                    .label(&related.message),
            );
        }

        let level = severity_to_level(diag.severity());
        let mut title_group = level.primary_title(&diag.message).element(snippet);
        for hint in &diag.hints {
            title_group = title_group.element(Level::HELP.message(hint));
        }

        let report: Vec<Group> = vec![title_group];
        write!(w, "{}", renderer.render(&report))
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

fn adjust_range(range: TextRange, limit: usize) -> std::ops::Range<usize> {
    let start: usize = range.start().into();
    let end: usize = range.end().into();

    if start == end {
        return start..(start + 1).min(limit);
    }

    start..end
}

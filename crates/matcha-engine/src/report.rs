//! Builder-pattern printer for rendering a failure report against its input.

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use crate::failure::FailureReport;

/// Renders a [`FailureReport`] as an annotated snippet of the input.
pub struct ReportPrinter<'a> {
    report: &'a FailureReport,
    source: &'a str,
    path: Option<&'a str>,
    colored: bool,
}

impl<'a> ReportPrinter<'a> {
    pub fn new(report: &'a FailureReport, source: &'a str) -> Self {
        Self {
            report,
            source,
            path: None,
            colored: false,
        }
    }

    pub fn path(mut self, path: &'a str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let label = self.report.expected_summary();
        let range = annotation_range(self.source, self.report.pos());
        let mut snippet = Snippet::source(self.source)
            .line_start(1)
            .annotation(AnnotationKind::Primary.span(range).label(&label));
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }

        let title = self.report.message(self.source);
        let groups: Vec<Group> = vec![Level::ERROR.primary_title(&title).element(snippet)];
        format!("{}", renderer.render(&groups))
    }
}

/// Annotate the character at the failure position, or the empty range at end
/// of input. Always lands on a char boundary.
fn annotation_range(source: &str, pos: usize) -> std::ops::Range<usize> {
    let pos = pos.min(source.len());
    let end = source[pos..]
        .chars()
        .next()
        .map_or(pos, |c| pos + c.len_utf8());
    pos..end
}

// src/errors/report.rs
//! Rendering utilities for miette diagnostics.

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, ThemeCharacters, ThemeStyles};
use std::io::Write as IoWrite;

/// Create a handler for terminal output (unicode + colors).
pub fn terminal_handler() -> GraphicalReportHandler {
    let theme = GraphicalTheme {
        characters: ThemeCharacters::unicode(),
        styles: ThemeStyles::ansi(),
    };
    GraphicalReportHandler::new_themed(theme)
}

/// Create a handler for snapshot testing (ascii + no colors).
pub fn snapshot_handler() -> GraphicalReportHandler {
    let theme = GraphicalTheme {
        characters: ThemeCharacters::ascii(),
        styles: ThemeStyles::none(),
    };
    GraphicalReportHandler::new_themed(theme)
}

/// Render to stderr with unicode/colors.
pub fn render_to_stderr(report: &dyn Diagnostic) {
    let handler = terminal_handler();
    let mut output = String::new();
    if handler.render_report(&mut output, report).is_ok() {
        eprint!("{}", output);
    }
}

/// Render to a buffer without colors (for snapshots/testing).
pub fn render_to_string(report: &dyn Diagnostic) -> String {
    let mut output = String::new();
    let handler = snapshot_handler();
    let _ = handler.render_report(&mut output, report);
    output
}

/// Render to any Write impl.
pub fn render_to_writer<W: IoWrite>(report: &dyn Diagnostic, mut writer: W) -> std::io::Result<()> {
    let output = render_to_string(report);
    writer.write_all(output.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SemanticError;
    use miette::NamedSource;

    #[test]
    fn render_subsumed_pattern_to_string() {
        let err = SemanticError::SubsumedPattern {
            span: (29, 6).into(),
        };
        let report = miette::Report::new(err).with_source_code(NamedSource::new(
            "test.mar",
            "switch (n) { case int i: {} case 11: {} }".to_string(),
        ));

        let output = render_to_string(report.as_ref());
        assert!(output.contains("E2051"), "should contain error code");
        assert!(output.contains("unreachable"), "should contain message");
    }

    #[test]
    fn render_with_help() {
        let err = SemanticError::InvalidNullableBindingType {
            ty: "int?".to_string(),
            span: (0, 4).into(),
        };
        let report = miette::Report::new(err)
            .with_source_code(NamedSource::new("test.mar", "int? x".to_string()));

        let output = render_to_string(report.as_ref());
        assert!(output.contains("E2055"), "should contain error code");
        assert!(output.contains("help"), "should contain help text");
    }
}

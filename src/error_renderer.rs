//! Error rendering using ariadne
//!
//! This module provides utilities for rendering fuzzex errors with
//! source code snippets and annotations.

use crate::{Diagnostic, Error, Severity};
use ariadne::{ColorGenerator, IndexType, Label, Report, ReportKind, Source};
use std::io::Write;

/// Render an error with formatting to stderr
///
/// # Example
/// ```no_run
/// use fuzzex::{Engine, render_error};
///
/// let engine = Engine::default();
/// if let Err(e) = engine.interpret("1 + true") {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to_writer(error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
///
/// This is useful when you want to control where the error is written,
/// such as to a file, a buffer, or a custom output stream.
pub fn render_error_to(error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, writer, true)
}

/// Render an error to a String (useful for logs, web UIs, etc.)
pub fn render_error_to_string(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
///
/// This is the same as `render_error_to_string` but without ANSI color codes,
/// making the output easier to compare in tests.
pub fn render_error_to_string_no_color(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Every diagnostic span points into the single expression text.
const SOURCE_ID: &str = "<expr>";

fn render_error_to_writer(
    error: &Error,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    match error {
        Error::Compilation {
            diagnostics,
            source,
        } => render_diagnostics(source, diagnostics, writer, use_color),
        // Evaluation and binding happen after compilation and carry no span.
        Error::Runtime(msg) => writeln!(writer, "Runtime error: {}", msg),
        Error::Binding(msg) => writeln!(writer, "Binding error: {}", msg),
        Error::Api(msg) => writeln!(writer, "API error: {}", msg),
    }
}

fn report_kind(severity: Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
    }
}

fn render_diagnostics(
    source: &str,
    diagnostics: &[Diagnostic],
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    // Spans are byte offsets into the text the engine was given, literals
    // and delimiters included.
    let config = ariadne::Config::default()
        .with_color(use_color)
        .with_index_type(IndexType::Byte);

    for diag in diagnostics {
        let mut colors = ColorGenerator::new();
        colors.next();

        let mut report = Report::build(report_kind(diag.severity), (SOURCE_ID, diag.span.0.clone()))
            .with_message(&diag.message)
            .with_config(config);

        if let Some(code) = &diag.code {
            report = report.with_code(code);
        }

        report = report.with_label(
            Label::new((SOURCE_ID, diag.span.0.clone()))
                .with_message(&diag.message)
                .with_color(colors.next()),
        );

        // Earlier uses of the offending parameter.
        for related in &diag.related {
            report = report.with_label(
                Label::new((SOURCE_ID, related.span.0.clone()))
                    .with_message(&related.message)
                    .with_color(colors.next()),
            );
        }

        if let Some(help) = &diag.help {
            report = report.with_help(help);
        }

        report
            .finish()
            .write((SOURCE_ID, Source::from(source)), &mut *writer)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Engine;

    #[test]
    fn test_render_parse_error() {
        let engine = Engine::default();

        let source = "1 + + 2"; // Invalid syntax
        let result = engine.interpret(source);

        assert!(result.is_err());
        if let Err(e) = result {
            let output = render_error_to_string_no_color(&e);

            // Should contain error indicator
            assert!(output.contains("Error") || output.contains("error"));
            // Should show the source
            assert!(output.contains("1 + + 2"));
        }
    }

    #[test]
    fn test_render_type_error() {
        let engine = Engine::default();

        let source = "true + 5";
        let result = engine.interpret(source);

        assert!(result.is_err());
        if let Err(e) = result {
            let output = render_error_to_string_no_color(&e);

            assert!(output.contains("T001"));
            assert!(output.contains("cannot be applied to Boolean and Numeric"));
        }
    }

    #[test]
    fn test_render_related_info() {
        let engine = Engine::default();

        let result = engine.interpret("x & true | -x");
        let output = render_error_to_string_no_color(&result.unwrap_err());
        assert!(output.contains("parameter 'x' first used here"));
        // Should be multi-line (ariadne adds formatting)
        assert!(output.lines().count() > 1);
    }

    #[test]
    fn test_render_help() {
        let engine = Engine::default();

        let output = render_error_to_string_no_color(&engine.interpret("frobnicate(1)").unwrap_err());
        assert!(output.contains("T002"));
        assert!(output.contains("Only builtin functions take arguments"));

        // T001 carries no help text.
        let output = render_error_to_string_no_color(&engine.interpret("true + 5").unwrap_err());
        assert!(!output.to_lowercase().contains("help"));
    }

    #[test]
    fn test_render_literal_spans_in_original_text() {
        let engine = Engine::default();

        let output = render_error_to_string_no_color(&engine.interpret(r#""abc" + x & x"#).unwrap_err());
        assert!(output.contains(r#""abc" + x & x"#));
        assert!(!output.contains("__const"));
    }

    #[test]
    fn test_render_runtime_error() {
        let error = Error::Runtime("producer failed: offline".to_string());
        assert_eq!(
            render_error_to_string_no_color(&error),
            "Runtime error: producer failed: offline\n"
        );
    }
}

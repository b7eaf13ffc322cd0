use miette::{Diagnostic, NamedSource, SourceSpan};
use protosketch_dsl::SketchError;

/// A diagnostic wrapping a `SketchError` for rich miette rendering.
///
/// Provides source code highlighting, span labels, and actionable
/// suggestions when rendering translation errors.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct SketchDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("{label}")]
    span: SourceSpan,

    message: String,
    label: String,

    #[help]
    suggestion: Option<String>,
}

/// Converts a `SketchError` into a miette `SketchDiagnostic`.
///
/// Lexical errors carry a byte span and are labeled directly; structural
/// errors only know their line, so the whole offending line is labeled.
pub fn sketch_error_to_diagnostic(
    error: &SketchError,
    source: &str,
    filename: &str,
) -> SketchDiagnostic {
    let src = NamedSource::new(filename, source.to_string());

    let span: SourceSpan = match error.span() {
        Some(s) => (s.start, s.end.saturating_sub(s.start)).into(),
        None => match error.line() {
            Some(line) => line_span(source, line).into(),
            None => (source.len().saturating_sub(1), 1).into(),
        },
    };

    let (label, suggestion) = match error {
        SketchError::UnexpectedCharacter { expected, .. } => (
            format!("expected {expected}"),
            Some("Check for typos or unsupported characters.".to_string()),
        ),
        SketchError::UnterminatedString { .. } => (
            "string starts here".to_string(),
            Some("Add a closing '\"' before the end of the line.".to_string()),
        ),
        SketchError::UnterminatedOption { .. } => (
            "option starts here".to_string(),
            Some("Add a closing ']' before the end of the line.".to_string()),
        ),
        SketchError::MissingFieldTag { .. } => (
            "field has no tag number".to_string(),
            Some("Every field needs a decimal tag, e.g. 'name str 1'.".to_string()),
        ),
        SketchError::UnexpectedToken { expected, .. } => (format!("expected {expected}"), None),
        SketchError::UnexpectedEndOfInput { expected, .. } => (
            "input ended here".to_string(),
            Some(format!("Add {expected} to complete the line.")),
        ),
        SketchError::MissingOptionValue { .. } => (
            "option key without a value".to_string(),
            Some("Option declarations look like: option java_package \"com.example\".".to_string()),
        ),
        SketchError::InconsistentIndent { established, .. } => (
            "indented deeper than this block's first line".to_string(),
            Some(format!(
                "Indent all lines of a block by exactly {established} columns."
            )),
        ),
        SketchError::UnsupportedConstruct { construct, .. } => {
            (format!("'{construct}' not allowed here"), None)
        }
        _ => ("here".to_string(), None),
    };

    SketchDiagnostic {
        src,
        span,
        message: error.to_string(),
        label,
        suggestion,
    }
}

/// Returns the byte offset and length of a 1-based source line.
fn line_span(source: &str, line: usize) -> (usize, usize) {
    let mut start = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let len = text.trim_end_matches('\n').len().max(1);
            return (start, len);
        }
        start += text.len();
    }
    (source.len().saturating_sub(1), 1)
}

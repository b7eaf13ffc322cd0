use std::fmt;

/// A byte-offset span in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    /// Creates a new span from start (inclusive) to end (exclusive).
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Errors produced while scanning or translating sketch source.
///
/// The pipeline stops at the first error; there is no resynchronization.
/// Every variant carries the 1-based source line it was detected on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SketchError {
    /// The scanner met a character that does not fit its current state.
    UnexpectedCharacter {
        found: char,
        expected: &'static str,
        line: usize,
        span: Span,
    },

    /// A quoted option value was not closed before the end of the line.
    UnterminatedString { line: usize, span: Span },

    /// A bracketed field option was not closed before the end of the line.
    UnterminatedOption { line: usize, span: Span },

    /// A field line ended before its tag number.
    MissingFieldTag { line: usize },

    /// The translator met a token out of the order the grammar requires.
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
    },

    /// The token stream ended when more tokens were expected.
    UnexpectedEndOfInput { expected: String },

    /// An `option` key was not followed by its quoted value.
    MissingOptionValue { key: String, line: usize },

    /// A line inside a block is indented deeper than the level the block's
    /// first child established.
    InconsistentIndent {
        width: usize,
        established: usize,
        line: usize,
    },

    /// A construct that is valid elsewhere appeared where the grammar does
    /// not allow it.
    UnsupportedConstruct {
        construct: &'static str,
        context: &'static str,
        line: usize,
    },
}

impl SketchError {
    /// The 1-based source line the error was detected on, when known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::UnexpectedCharacter { line, .. }
            | Self::UnterminatedString { line, .. }
            | Self::UnterminatedOption { line, .. }
            | Self::MissingFieldTag { line }
            | Self::UnexpectedToken { line, .. }
            | Self::MissingOptionValue { line, .. }
            | Self::InconsistentIndent { line, .. }
            | Self::UnsupportedConstruct { line, .. } => Some(*line),
            Self::UnexpectedEndOfInput { .. } => None,
        }
    }

    /// The byte span of the offending text, for errors that track one.
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::UnexpectedCharacter { span, .. }
            | Self::UnterminatedString { span, .. }
            | Self::UnterminatedOption { span, .. } => Some(span),
            _ => None,
        }
    }
}

impl fmt::Display for SketchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedCharacter {
                found,
                expected,
                line,
                ..
            } => {
                write!(
                    f,
                    "line {line}: unexpected character {found:?}: expected {expected}"
                )
            }
            Self::UnterminatedString { line, .. } => {
                write!(f, "line {line}: unterminated string: missing closing '\"'")
            }
            Self::UnterminatedOption { line, .. } => {
                write!(f, "line {line}: unterminated field option: missing ']'")
            }
            Self::MissingFieldTag { line } => {
                write!(f, "line {line}: field line is missing its tag number")
            }
            Self::UnexpectedToken {
                expected,
                found,
                line,
            } => {
                write!(f, "line {line}: expected {expected}, found {found}")
            }
            Self::UnexpectedEndOfInput { expected } => {
                write!(f, "unexpected end of input: expected {expected}")
            }
            Self::MissingOptionValue { key, line } => {
                write!(
                    f,
                    "line {line}: option '{key}' is missing its quoted value"
                )
            }
            Self::InconsistentIndent {
                width,
                established,
                line,
            } => {
                write!(
                    f,
                    "line {line}: inconsistent indentation: width {width} exceeds the \
                     established level {established}"
                )
            }
            Self::UnsupportedConstruct {
                construct,
                context,
                line,
            } => {
                write!(f, "line {line}: '{construct}' is not allowed {context}")
            }
        }
    }
}

impl std::error::Error for SketchError {}

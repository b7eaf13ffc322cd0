/// Token kinds produced by the sketch scanner.
///
/// End of input is signaled by iterator exhaustion, not by a token kind,
/// so every variant here corresponds to actual source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A top-level `package <name>` declaration; text is the package name.
    Package,
    /// A `msg <Name>` header; text is the message name.
    MessageStart,
    /// An `enum <Name>` header; text is the enum name.
    EnumStart,
    /// A `oneof <name>` header; text is the group name.
    OneofStart,
    /// A field or enum-value name at the head of an indented line.
    Identifier,
    /// A raw field-type expression: `str`, `[]int`, `map[str]int`, ...
    FieldType,
    /// A decimal field tag number.
    FieldNum,
    /// The body of a bracketed field option, brackets not included.
    FieldOption,
    /// The key of an `option <key> "<value>"` declaration.
    OptionKey,
    /// The quoted value of an option declaration, quotes retained.
    OptionValue,
    /// A `#` comment through the end of the physical line, `#` retained.
    Comment,
    /// A run of leading spaces/tabs; the text length is the indent width.
    Whitespace,
    /// A line terminator.
    Newline,
}

impl TokenKind {
    /// Returns a human-readable description of this token kind.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Package => "'package' declaration",
            Self::MessageStart => "'msg' header",
            Self::EnumStart => "'enum' header",
            Self::OneofStart => "'oneof' header",
            Self::Identifier => "identifier",
            Self::FieldType => "field type",
            Self::FieldNum => "field tag",
            Self::FieldOption => "field option",
            Self::OptionKey => "option key",
            Self::OptionValue => "option value",
            Self::Comment => "comment",
            Self::Whitespace => "indentation",
            Self::Newline => "newline",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A token paired with its raw lexeme and 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// The indentation width this token encodes. Zero for anything other
    /// than a `Whitespace` token.
    pub fn indent_width(&self) -> usize {
        match self.kind {
            TokenKind::Whitespace => self.text.len(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_human_readable() {
        assert_eq!(TokenKind::Identifier.description(), "identifier");
        assert_eq!(TokenKind::FieldNum.description(), "field tag");
        assert_eq!(TokenKind::Whitespace.description(), "indentation");
    }

    #[test]
    fn display_matches_description() {
        assert_eq!(TokenKind::Comment.to_string(), "comment");
    }

    #[test]
    fn indent_width_counts_raw_characters() {
        let ws = Token::new(TokenKind::Whitespace, "  \t", 1);
        assert_eq!(ws.indent_width(), 3);
    }

    #[test]
    fn indent_width_is_zero_for_other_kinds() {
        let tok = Token::new(TokenKind::Identifier, "name", 1);
        assert_eq!(tok.indent_width(), 0);
    }
}

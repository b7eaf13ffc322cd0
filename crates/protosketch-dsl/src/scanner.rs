use crate::error::{SketchError, Span};
use crate::token::{Token, TokenKind};

/// Scanner states. One line of input walks `LineStart -> Indent -> LineHead`
/// and then through the field states before returning to `LineStart` via
/// `LineEnd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// At column 0 of a fresh line.
    LineStart,
    /// Measuring the line's leading whitespace.
    Indent,
    /// At the first non-whitespace character: keyword, field name, or `#`.
    LineHead,
    /// After an `option` key; a quoted value must follow.
    OptionValue,
    /// After a field name; either a type expression or an enum tag follows.
    FieldBody,
    /// After a field type; the decimal tag must follow.
    FieldTag,
    /// After the tag; an optional bracketed option may follow.
    FieldEnd,
    /// Skipping trailing whitespace toward `#`, newline, or end of input.
    LineEnd,
    /// Consuming the remainder of the physical line as a comment.
    Comment,
    /// Emitting the newline that terminates a comment line.
    CommentBreak,
}

/// Character-driven scanner for sketch source.
///
/// Implements `Iterator`, producing tokens lazily in strict document order.
/// The first error fuses the scanner: after yielding `Err` once it only
/// returns `None`.
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    state: State,
    done: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            state: State::LineStart,
            done: false,
        }
    }

    // -- Cursor helpers --

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    /// The character at the cursor, decoded for error reporting.
    fn current_char(&self) -> char {
        self.src[self.pos..].chars().next().unwrap_or('\0')
    }

    fn char_span(&self) -> Span {
        let len = self.current_char().len_utf8().max(1);
        Span::new(self.pos, self.pos + len)
    }

    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !pred(b) {
                break;
            }
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn skip_spaces(&mut self) {
        self.eat_while(|b| b == b' ' || b == b'\t');
    }

    fn read_ident(&mut self) -> &'a str {
        self.eat_while(|b| b.is_ascii_alphanumeric() || b == b'_')
    }

    fn token(&self, kind: TokenKind, text: impl Into<String>) -> Token {
        Token::new(kind, text, self.line)
    }

    fn unexpected(&self, expected: &'static str) -> SketchError {
        SketchError::UnexpectedCharacter {
            found: self.current_char(),
            expected,
            line: self.line,
            span: self.char_span(),
        }
    }

    // -- State machine --

    /// Advances the machine until a token is produced or input ends.
    fn scan(&mut self) -> Result<Option<Token>, SketchError> {
        loop {
            match self.state {
                State::LineStart => match self.peek() {
                    None => return Ok(None),
                    Some(b'\n') => {
                        self.bump();
                        let tok = self.token(TokenKind::Newline, "");
                        self.line += 1;
                        return Ok(Some(tok));
                    }
                    Some(b'#') => self.state = State::Comment,
                    Some(_) => self.state = State::Indent,
                },

                State::Indent => {
                    let ws = self.eat_while(|b| b == b' ' || b == b'\t');
                    self.state = State::LineHead;
                    if !ws.is_empty() {
                        return Ok(Some(self.token(TokenKind::Whitespace, ws)));
                    }
                }

                State::LineHead => {
                    if self.peek() == Some(b'#') {
                        self.state = State::Comment;
                        continue;
                    }
                    return self.line_head().map(Some);
                }

                State::OptionValue => {
                    self.skip_spaces();
                    return self.quoted_value().map(Some);
                }

                State::FieldBody => {
                    match self.peek() {
                        // An enum value line: the tag follows the name directly.
                        Some(b) if b.is_ascii_digit() => self.state = State::FieldTag,
                        _ => {
                            let ty = self.eat_while(|b| {
                                b.is_ascii_alphanumeric() || b == b'_' || b == b'[' || b == b']'
                            });
                            if ty.is_empty() {
                                return Err(self.unexpected("a field type"));
                            }
                            self.skip_spaces();
                            self.state = State::FieldTag;
                            return Ok(Some(self.token(TokenKind::FieldType, ty)));
                        }
                    }
                }

                State::FieldTag => {
                    let num = self.eat_while(|b| b.is_ascii_digit());
                    if num.is_empty() {
                        return Err(SketchError::MissingFieldTag { line: self.line });
                    }
                    self.skip_spaces();
                    self.state = State::FieldEnd;
                    return Ok(Some(self.token(TokenKind::FieldNum, num)));
                }

                State::FieldEnd => {
                    if self.peek() == Some(b'[') {
                        return self.bracketed_option().map(Some);
                    }
                    self.state = State::LineEnd;
                }

                State::LineEnd => {
                    self.skip_spaces();
                    match self.peek() {
                        Some(b'#') => self.state = State::Comment,
                        Some(b'\n') => {
                            self.bump();
                            let tok = self.token(TokenKind::Newline, "");
                            self.line += 1;
                            self.state = State::LineStart;
                            return Ok(Some(tok));
                        }
                        // A final line without '\n' still terminates.
                        None => {
                            self.state = State::LineStart;
                            return Ok(Some(self.token(TokenKind::Newline, "")));
                        }
                        Some(_) => return Err(self.unexpected("end of line")),
                    }
                }

                State::Comment => {
                    let text = self.eat_while(|b| b != b'\n');
                    self.state = State::CommentBreak;
                    return Ok(Some(self.token(TokenKind::Comment, text)));
                }

                State::CommentBreak => {
                    let tok = self.token(TokenKind::Newline, "");
                    if self.peek() == Some(b'\n') {
                        self.bump();
                        self.line += 1;
                    }
                    self.state = State::LineStart;
                    return Ok(Some(tok));
                }
            }
        }
    }

    /// Dispatches the first word of a line: a reserved keyword opens the
    /// matching declaration, anything else is a field name.
    fn line_head(&mut self) -> Result<Token, SketchError> {
        let word = self.read_ident();
        if word.is_empty() {
            return Err(self.unexpected("an identifier"));
        }
        self.skip_spaces();

        let header_kind = match word {
            "package" => TokenKind::Package,
            "msg" => TokenKind::MessageStart,
            "enum" => TokenKind::EnumStart,
            "oneof" => TokenKind::OneofStart,
            "option" => {
                let key = self.eat_while(|b| {
                    b.is_ascii_alphanumeric() || b == b'_' || b == b'(' || b == b')' || b == b'.'
                });
                if key.is_empty() {
                    return Err(self.unexpected("an option key"));
                }
                self.skip_spaces();
                self.state = State::OptionValue;
                return Ok(self.token(TokenKind::OptionKey, key));
            }
            _ => {
                self.state = State::FieldBody;
                return Ok(self.token(TokenKind::Identifier, word));
            }
        };

        let name = self.read_ident();
        if name.is_empty() {
            return Err(self.unexpected("a name"));
        }
        self.skip_spaces();
        self.state = State::LineEnd;
        Ok(self.token(header_kind, name))
    }

    /// Reads a double-quoted option value, quotes retained in the lexeme.
    fn quoted_value(&mut self) -> Result<Token, SketchError> {
        let start = self.pos;
        if self.peek() != Some(b'"') {
            return Err(self.unexpected("an opening '\"'"));
        }
        self.bump();
        self.eat_while(|b| b != b'"' && b != b'\n');
        if self.peek() != Some(b'"') {
            return Err(SketchError::UnterminatedString {
                line: self.line,
                span: Span::new(start, self.pos),
            });
        }
        self.bump();
        let text = &self.src[start..self.pos];
        self.skip_spaces();
        self.state = State::LineEnd;
        Ok(self.token(TokenKind::OptionValue, text))
    }

    /// Reads a `[...]` field option verbatim. No nested brackets.
    fn bracketed_option(&mut self) -> Result<Token, SketchError> {
        let start = self.pos;
        self.bump(); // [
        let body = self.eat_while(|b| b != b']' && b != b'\n');
        if self.peek() != Some(b']') {
            return Err(SketchError::UnterminatedOption {
                line: self.line,
                span: Span::new(start, self.pos),
            });
        }
        let tok = self.token(TokenKind::FieldOption, body);
        self.bump(); // ]
        self.skip_spaces();
        self.state = State::LineEnd;
        Ok(tok)
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, SketchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.scan() {
            Ok(Some(tok)) => Some(Ok(tok)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                tracing::debug!(line = ?e.line(), "scan error: {e}");
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str) -> Vec<Token> {
        Scanner::new(input)
            .collect::<Result<Vec<_>, _>>()
            .expect("scan should succeed")
    }

    fn scan_err(input: &str) -> SketchError {
        Scanner::new(input)
            .collect::<Result<Vec<_>, _>>()
            .expect_err("scan should fail")
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn package_line() {
        let tokens = scan("package example\n");
        assert_eq!(kinds(&tokens), vec![TokenKind::Package, TokenKind::Newline]);
        assert_eq!(tokens[0].text, "example");
    }

    #[test]
    fn blank_lines_emit_newlines() {
        let tokens = scan("\n\n");
        assert_eq!(kinds(&tokens), vec![TokenKind::Newline, TokenKind::Newline]);
    }

    #[test]
    fn message_header() {
        let tokens = scan("msg Person\n");
        assert_eq!(tokens[0].kind, TokenKind::MessageStart);
        assert_eq!(tokens[0].text, "Person");
    }

    #[test]
    fn enum_and_oneof_headers() {
        let tokens = scan("enum Color\noneof contact\n");
        assert_eq!(tokens[0].kind, TokenKind::EnumStart);
        assert_eq!(tokens[0].text, "Color");
        assert_eq!(tokens[2].kind, TokenKind::OneofStart);
        assert_eq!(tokens[2].text, "contact");
    }

    #[test]
    fn field_line() {
        let tokens = scan("  name str 1\n");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Whitespace,
                TokenKind::Identifier,
                TokenKind::FieldType,
                TokenKind::FieldNum,
                TokenKind::Newline,
            ]
        );
        assert_eq!(tokens[0].text, "  ");
        assert_eq!(tokens[1].text, "name");
        assert_eq!(tokens[2].text, "str");
        assert_eq!(tokens[3].text, "1");
    }

    #[test]
    fn array_and_map_types_are_single_lexemes() {
        let tokens = scan("  tags []str 2\n  ages map[str]int 3\n");
        assert_eq!(tokens[2].kind, TokenKind::FieldType);
        assert_eq!(tokens[2].text, "[]str");
        assert_eq!(tokens[7].kind, TokenKind::FieldType);
        assert_eq!(tokens[7].text, "map[str]int");
    }

    #[test]
    fn enum_value_line_skips_type() {
        let tokens = scan("  RED 1\n");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Whitespace,
                TokenKind::Identifier,
                TokenKind::FieldNum,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn field_option_bracket_read_verbatim() {
        let tokens = scan("  old int 2 [deprecated = true]\n");
        let opt = &tokens[4];
        assert_eq!(opt.kind, TokenKind::FieldOption);
        assert_eq!(opt.text, "deprecated = true");
    }

    #[test]
    fn option_declaration() {
        let tokens = scan("option (custom).java_pkg \"com.example\"\n");
        assert_eq!(tokens[0].kind, TokenKind::OptionKey);
        assert_eq!(tokens[0].text, "(custom).java_pkg");
        assert_eq!(tokens[1].kind, TokenKind::OptionValue);
        assert_eq!(tokens[1].text, "\"com.example\"");
    }

    #[test]
    fn full_line_comment_keeps_hash() {
        let tokens = scan("# a note\n");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Comment, TokenKind::Newline]
        );
        assert_eq!(tokens[0].text, "# a note");
    }

    #[test]
    fn indented_comment() {
        let tokens = scan("  # inside\n");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Whitespace, TokenKind::Comment, TokenKind::Newline]
        );
    }

    #[test]
    fn trailing_comment_after_field() {
        let tokens = scan("  name str 1 # the name\n");
        assert_eq!(tokens[4].kind, TokenKind::Comment);
        assert_eq!(tokens[4].text, "# the name");
        assert_eq!(tokens[5].kind, TokenKind::Newline);
    }

    #[test]
    fn missing_final_newline_is_tolerated() {
        let tokens = scan("package example");
        assert_eq!(kinds(&tokens), vec![TokenKind::Package, TokenKind::Newline]);
    }

    #[test]
    fn tabs_count_one_column_each() {
        let tokens = scan("\t\tname str 1\n");
        assert_eq!(tokens[0].kind, TokenKind::Whitespace);
        assert_eq!(tokens[0].indent_width(), 2);
    }

    #[test]
    fn lines_are_tracked() {
        let tokens = scan("package a\nmsg B\n  f str 1\n");
        assert_eq!(tokens[0].line, 1);
        let msg = tokens
            .iter()
            .find(|t| t.kind == TokenKind::MessageStart)
            .unwrap();
        assert_eq!(msg.line, 2);
        let field = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Identifier)
            .unwrap();
        assert_eq!(field.line, 3);
    }

    #[test]
    fn error_missing_field_tag() {
        let err = scan_err("  name str\n");
        assert!(matches!(err, SketchError::MissingFieldTag { line: 1 }));
    }

    #[test]
    fn error_unterminated_option_value() {
        let err = scan_err("option java_pkg \"oops\n");
        assert!(matches!(err, SketchError::UnterminatedString { line: 1, .. }));
    }

    #[test]
    fn error_unterminated_field_option() {
        let err = scan_err("  old int 2 [deprecated\n");
        assert!(matches!(err, SketchError::UnterminatedOption { line: 1, .. }));
    }

    #[test]
    fn error_junk_after_field() {
        let err = scan_err("  name str 1 !\n");
        assert!(matches!(
            err,
            SketchError::UnexpectedCharacter {
                found: '!',
                line: 1,
                ..
            }
        ));
    }

    #[test]
    fn error_whitespace_only_line() {
        // A line holding only spaces has no identifier to read.
        let err = scan_err("   \n");
        assert!(matches!(err, SketchError::UnexpectedCharacter { .. }));
    }

    #[test]
    fn scanner_is_fused_after_error() {
        let mut scanner = Scanner::new("  name str\n");
        let mut saw_err = false;
        for item in &mut scanner {
            if item.is_err() {
                saw_err = true;
            }
        }
        assert!(saw_err);
        assert!(scanner.next().is_none());
    }

    #[test]
    fn error_reports_line_number() {
        let err = scan_err("package a\n  name str\n");
        assert_eq!(err.line(), Some(2));
    }
}

use crate::convert::convert_type;
use crate::error::SketchError;
use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};

/// Output indentation unit, two spaces per nesting depth.
const INDENT: &str = "  ";

/// The three block kinds a header token can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Message,
    Enum,
    Oneof,
}

impl BlockKind {
    fn keyword(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Enum => "enum",
            Self::Oneof => "oneof",
        }
    }
}

/// Streaming translator from sketch tokens to schema text.
///
/// Pulls tokens on demand through a single-token lookahead slot and appends
/// output strictly in token order. No syntax tree is built; nesting is
/// reconstructed from indentation widths alone, one recursion frame per
/// open block.
struct Translator<I>
where
    I: Iterator<Item = Result<Token, SketchError>>,
{
    tokens: I,
    peeked: Option<Token>,
    out: String,
}

impl<I> Translator<I>
where
    I: Iterator<Item = Result<Token, SketchError>>,
{
    fn new(tokens: I) -> Self {
        Self {
            tokens,
            peeked: None,
            out: String::new(),
        }
    }

    // -- Lookahead --

    /// Fills the lookahead slot if empty. `Ok(None)` means the stream is
    /// exhausted; a scan error propagates as-is.
    fn peek(&mut self) -> Result<Option<&Token>, SketchError> {
        if self.peeked.is_none() {
            match self.tokens.next() {
                Some(Ok(tok)) => self.peeked = Some(tok),
                Some(Err(e)) => return Err(e),
                None => {}
            }
        }
        Ok(self.peeked.as_ref())
    }

    fn next_token(&mut self) -> Result<Option<Token>, SketchError> {
        if let Some(tok) = self.peeked.take() {
            return Ok(Some(tok));
        }
        match self.tokens.next() {
            Some(result) => result.map(Some),
            None => Ok(None),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, SketchError> {
        match self.next_token()? {
            Some(tok) if tok.kind == kind => Ok(tok),
            Some(tok) => Err(unexpected(expected, &tok)),
            None => Err(SketchError::UnexpectedEndOfInput {
                expected: expected.to_string(),
            }),
        }
    }

    // -- Top level --

    fn run(mut self) -> Result<String, SketchError> {
        loop {
            let Some(tok) = self.peek()? else { break };
            let tok = tok.clone();
            match tok.kind {
                TokenKind::Newline => {
                    self.next_token()?;
                    self.out.push('\n');
                }
                TokenKind::Package => {
                    self.next_token()?;
                    self.out.push_str(&format!("package {};", tok.text));
                }
                TokenKind::OptionKey => {
                    self.next_token()?;
                    let value = match self.next_token()? {
                        Some(t) if t.kind == TokenKind::OptionValue => t,
                        _ => {
                            return Err(SketchError::MissingOptionValue {
                                key: tok.text,
                                line: tok.line,
                            })
                        }
                    };
                    self.out
                        .push_str(&format!("option {} = {};", tok.text, value.text));
                }
                TokenKind::Comment => {
                    self.next_token()?;
                    self.out.push_str(&format!("// {}", strip_comment(&tok.text)));
                }
                TokenKind::MessageStart => {
                    self.next_token()?;
                    self.parse_block(BlockKind::Message, tok, 0, 0)?;
                }
                TokenKind::EnumStart => {
                    self.next_token()?;
                    self.parse_block(BlockKind::Enum, tok, 0, 0)?;
                }
                TokenKind::OneofStart => {
                    return Err(SketchError::UnsupportedConstruct {
                        construct: "oneof",
                        context: "at the top level",
                        line: tok.line,
                    });
                }
                TokenKind::Identifier => {
                    return Err(SketchError::UnexpectedToken {
                        expected: "a top-level declaration".to_string(),
                        found: format!("field line starting with '{}'", tok.text),
                        line: tok.line,
                    });
                }
                _ => {
                    return Err(SketchError::UnexpectedToken {
                        expected: "a top-level declaration".to_string(),
                        found: tok.kind.description().to_string(),
                        line: tok.line,
                    });
                }
            }
        }
        Ok(self.out)
    }

    // -- Blocks --

    /// Translates one block: header already consumed, children recognized
    /// by indentation. `header_level` is the indent width of the header's
    /// own line; the first child fixes the block's established level.
    fn parse_block(
        &mut self,
        kind: BlockKind,
        header: Token,
        header_level: usize,
        depth: usize,
    ) -> Result<(), SketchError> {
        tracing::trace!(kind = kind.keyword(), name = %header.text, depth, "open block");
        self.out.push_str(&format!(
            "{}{} {} {{\n",
            INDENT.repeat(depth),
            kind.keyword(),
            header.text
        ));

        let mut established: Option<usize> = None;
        loop {
            // Blank lines inside a block carry no structure and are dropped.
            while matches!(self.peek()?, Some(t) if t.kind == TokenKind::Newline) {
                self.next_token()?;
            }

            let Some(tok) = self.peek()? else { break };
            if tok.kind != TokenKind::Whitespace {
                break;
            }
            let width = tok.indent_width();
            let line = tok.line;
            match established {
                None => {
                    if width <= header_level {
                        break;
                    }
                    established = Some(width);
                }
                Some(level) => {
                    if width < level {
                        // The line belongs to an enclosing block; leave the
                        // token in the lookahead slot for the parent.
                        break;
                    }
                    if width > level {
                        return Err(SketchError::InconsistentIndent {
                            width,
                            established: level,
                            line,
                        });
                    }
                }
            }
            self.next_token()?; // the whitespace

            let Some(item) = self.next_token()? else {
                return Err(SketchError::UnexpectedEndOfInput {
                    expected: "a block item".to_string(),
                });
            };
            match item.kind {
                TokenKind::Comment => {
                    self.out.push_str(&format!(
                        "{}// {}\n",
                        INDENT.repeat(depth + 1),
                        strip_comment(&item.text)
                    ));
                    self.expect(TokenKind::Newline, "a newline after the comment")?;
                }
                TokenKind::Identifier => match kind {
                    BlockKind::Enum => self.enum_value(item, depth + 1)?,
                    BlockKind::Message | BlockKind::Oneof => self.field_line(item, depth + 1)?,
                },
                TokenKind::MessageStart => {
                    self.parse_block(BlockKind::Message, item, width, depth + 1)?;
                }
                TokenKind::EnumStart => {
                    self.parse_block(BlockKind::Enum, item, width, depth + 1)?;
                }
                TokenKind::OneofStart => {
                    self.parse_block(BlockKind::Oneof, item, width, depth + 1)?;
                }
                TokenKind::Package => {
                    return Err(SketchError::UnsupportedConstruct {
                        construct: "package",
                        context: "inside a block",
                        line: item.line,
                    });
                }
                TokenKind::OptionKey => {
                    return Err(SketchError::UnsupportedConstruct {
                        construct: "option",
                        context: "inside a block",
                        line: item.line,
                    });
                }
                _ => {
                    return Err(unexpected("a field, comment, or nested block", &item));
                }
            }
        }

        tracing::trace!(kind = kind.keyword(), name = %header.text, "close block");
        self.out
            .push_str(&format!("{}}}\n", INDENT.repeat(depth)));
        Ok(())
    }

    // -- Lines --

    /// One message or oneof field: `<name> <type> <tag> [option] [# comment]`.
    fn field_line(&mut self, name: Token, depth: usize) -> Result<(), SketchError> {
        let ty = self.expect(TokenKind::FieldType, "a field type")?;
        let num = self.expect(TokenKind::FieldNum, "a field tag")?;

        self.out.push_str(&format!(
            "{}{} {} = {}",
            INDENT.repeat(depth),
            convert_type(&ty.text),
            name.text,
            num.text
        ));

        if matches!(self.peek()?, Some(t) if t.kind == TokenKind::FieldOption) {
            let opt = self.next_token()?.expect("peeked");
            self.out.push_str(&format!(" [{}]", opt.text));
        }
        self.out.push(';');
        self.line_tail()
    }

    /// One enum value: `<name> <tag>`. No type, no bracketed options.
    fn enum_value(&mut self, name: Token, depth: usize) -> Result<(), SketchError> {
        let num = match self.next_token()? {
            Some(tok) if tok.kind == TokenKind::FieldNum => tok,
            Some(tok) if tok.kind == TokenKind::FieldType => {
                return Err(SketchError::UnexpectedToken {
                    expected: "an enum value tag".to_string(),
                    found: format!("field type ('{}')", tok.text),
                    line: tok.line,
                });
            }
            Some(tok) => return Err(unexpected("an enum value tag", &tok)),
            None => {
                return Err(SketchError::UnexpectedEndOfInput {
                    expected: "an enum value tag".to_string(),
                })
            }
        };

        self.out.push_str(&format!(
            "{}{} = {};",
            INDENT.repeat(depth),
            name.text,
            num.text
        ));

        if matches!(self.peek()?, Some(t) if t.kind == TokenKind::FieldOption) {
            let opt = self.next_token()?.expect("peeked");
            return Err(SketchError::UnexpectedToken {
                expected: "end of the enum value line".to_string(),
                found: format!("field option ('{}')", opt.text),
                line: opt.line,
            });
        }
        self.line_tail()
    }

    /// Finishes a field or enum-value line: optional trailing comment, then
    /// the terminating newline.
    fn line_tail(&mut self) -> Result<(), SketchError> {
        if matches!(self.peek()?, Some(t) if t.kind == TokenKind::Comment) {
            let comment = self.next_token()?.expect("peeked");
            self.out
                .push_str(&format!(" // {}", strip_comment(&comment.text)));
        }
        self.expect(TokenKind::Newline, "a newline to end the line")?;
        self.out.push('\n');
        Ok(())
    }
}

fn unexpected(expected: &str, found: &Token) -> SketchError {
    SketchError::UnexpectedToken {
        expected: expected.to_string(),
        found: format!("{} ('{}')", found.kind.description(), found.text),
        line: found.line,
    }
}

/// Strips the leading `#` and one following space from a comment lexeme.
fn strip_comment(text: &str) -> &str {
    let text = text.strip_prefix('#').unwrap_or(text);
    text.strip_prefix(' ').unwrap_or(text)
}

/// Translates sketch source text into schema text.
///
/// The scanner and translator run as a single-threaded pull pipeline: the
/// translator drives the scanner token by token, so neither side ever runs
/// ahead of the other. Translation stops at the first error and returns it
/// with the source line attached; no partial output is produced.
///
/// # Errors
///
/// Returns the first [`SketchError`] the scanner or translator encounters.
pub fn translate(source: &str) -> Result<String, SketchError> {
    tracing::debug!(bytes = source.len(), "translating sketch source");
    Translator::new(Scanner::new(source)).run()
}

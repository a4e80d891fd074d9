//! Tokenizer for C declaration headers.
//!
//! Whitespace, `//` and `/* */` comments and preprocessor lines are
//! discarded. String and character literals are kept whole so braces and
//! semicolons inside them never reach the parser. Everything else becomes a
//! [`Token`] carrying its source span.

use crate::error::ParseError;
use crate::types::Span;

/// Token kinds recognized by the declaration parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword.
    Ident(String),
    /// Numeric literal, kept verbatim.
    Number(String),
    /// String or character literal, quotes included.
    Literal(String),
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `;`
    Semi,
    /// Any other single character.
    Punct(char),
}

impl TokenKind {
    /// Returns the identifier text, if this is an identifier.
    #[must_use]
    pub fn ident(&self) -> Option<&str> {
        match self {
            Self::Ident(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this is the identifier `keyword`.
    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.ident() == Some(keyword)
    }

    /// Short description used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Ident(s) | Self::Number(s) => format!("'{s}'"),
            Self::Literal(s) => format!("literal {s}"),
            Self::LBrace => "'{'".to_string(),
            Self::RBrace => "'}'".to_string(),
            Self::Semi => "';'".to_string(),
            Self::Punct(c) => format!("'{c}'"),
        }
    }
}

/// A token and its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Position of the first character.
    pub span: Span,
}

/// Character cursor with line/column tracking.
struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    /// True while only whitespace has been seen on the current line.
    line_start: bool,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            line_start: true,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn span(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.line_start = true;
        } else {
            self.column += 1;
            if !c.is_whitespace() {
                self.line_start = false;
            }
        }
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            out.push(c);
            self.bump();
        }
        out
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let start = self.span();
        self.bump();
        self.bump();
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => {}
                None => return Err(ParseError::malformed(start, "unterminated block comment")),
            }
        }
    }

    /// Reads a quoted literal up to the matching unescaped `quote`.
    fn read_literal(&mut self, quote: char) -> Result<String, ParseError> {
        let start = self.span();
        let mut out = String::new();
        if let Some(open) = self.bump() {
            out.push(open);
        }
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    out.push(c);
                    self.bump();
                    return Ok(out);
                }
                Some('\\') => {
                    out.push('\\');
                    self.bump();
                    match self.bump() {
                        Some('\n') | None => break,
                        Some(escaped) => out.push(escaped),
                    }
                }
                Some('\n') | None => break,
                Some(c) => {
                    out.push(c);
                    self.bump();
                }
            }
        }
        Err(ParseError::malformed(start, "unterminated literal"))
    }

    /// Skips a preprocessor directive, honouring backslash line continuations.
    fn skip_directive(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\\' && self.peek_next() == Some('\n') {
                self.bump();
                self.bump();
                continue;
            }
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        loop {
            let Some(c) = self.peek() else {
                return Ok(None);
            };

            if c.is_whitespace() {
                self.bump();
                continue;
            }
            if c == '#' && self.line_start {
                self.skip_directive();
                continue;
            }
            if c == '/' && self.peek_next() == Some('/') {
                self.skip_line_comment();
                continue;
            }
            if c == '/' && self.peek_next() == Some('*') {
                self.skip_block_comment()?;
                continue;
            }

            let span = self.span();
            let kind = if c.is_ascii_alphabetic() || c == '_' {
                TokenKind::Ident(self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_'))
            } else if c.is_ascii_digit() {
                TokenKind::Number(self.eat_while(|c| c.is_ascii_alphanumeric() || c == '.'))
            } else if c == '"' || c == '\'' {
                TokenKind::Literal(self.read_literal(c)?)
            } else {
                self.bump();
                match c {
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    ';' => TokenKind::Semi,
                    other => TokenKind::Punct(other),
                }
            };
            return Ok(Some(Token { kind, span }));
        }
    }
}

/// Splits declaration source text into tokens.
///
/// # Errors
/// Returns `MalformedDeclaration` for an unterminated block comment or
/// literal.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

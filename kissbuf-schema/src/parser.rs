//! Declaration parser.
//!
//! Recursive-descent parser over the token stream produced by
//! [`crate::lexer::tokenize`]. The accepted grammar is
//!
//! ```text
//! file        := item* EOF
//! item        := struct_decl | ';' | other_stmt
//! struct_decl := 'typedef' 'struct' IDENT? '{' field_stmt* '}' IDENT ';'
//! field_stmt  := ';' | IDENT IDENT+ ';'
//! other_stmt  := tokens up to ';' at brace depth 0, or a balanced '{ }' block,
//!                ending early before any 'typedef' 'struct' pair
//! ```
//!
//! Statements other than `typedef struct` (includes, prototypes, enums,
//! plain typedefs) are skipped. A skipped statement never swallows a struct
//! declaration, so declarations inside `extern "C" { ... }` blocks or after
//! a bare macro such as `EXTERN_C_BEGIN` are still found.

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind, tokenize};
use crate::types::{AggregateType, Field, Schema, Span};

/// Parses aggregate declarations from C header text.
///
/// # Arguments
/// * `source` - Header content
///
/// # Returns
/// Parsed schema with aggregates in declaration order.
///
/// # Errors
/// Returns `MalformedDeclaration` if a `typedef struct` or one of its fields
/// cannot be parsed, and `DuplicateTypeName` if a name is declared twice.
pub fn parse_declarations(source: &str) -> Result<Schema, ParseError> {
    let tokens = tokenize(source)?;
    let schema = Parser::new(tokens).parse_file()?;

    for aggregate in schema.iter() {
        let fields: Vec<String> = aggregate
            .fields
            .iter()
            .map(|f| format!("{} {}", f.type_name, f.name))
            .collect();
        tracing::debug!(name = %aggregate.name, fields = ?fields, "parsed aggregate");
    }
    tracing::debug!(count = schema.len(), "parsed declarations");

    Ok(schema)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind_at(&self, ahead: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + ahead).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// True if the next two tokens are `typedef struct`.
    fn at_struct_typedef(&self) -> bool {
        self.peek_kind_at(0).is_some_and(|k| k.is_keyword("typedef"))
            && self.peek_kind_at(1).is_some_and(|k| k.is_keyword("struct"))
    }

    /// Span of the current token, or of the last token at end of input.
    fn current_span(&self) -> Span {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|t| t.span)
            .unwrap_or_default()
    }

    fn parse_file(&mut self) -> Result<Schema, ParseError> {
        let mut schema = Schema::new();

        while let Some(token) = self.peek() {
            if token.kind == TokenKind::Semi {
                self.advance();
                continue;
            }
            if self.at_struct_typedef() {
                if let Some(aggregate) = self.parse_struct_decl()? {
                    schema.add_aggregate(aggregate)?;
                }
            } else {
                self.skip_statement();
            }
        }

        Ok(schema)
    }

    /// Parses `typedef struct [Tag] { ... } Name;`.
    ///
    /// Returns `None` for a bodiless alias such as `typedef struct Tag Name;`,
    /// which declares no layout.
    fn parse_struct_decl(&mut self) -> Result<Option<AggregateType>, ParseError> {
        let start = self.current_span();
        self.advance(); // typedef
        self.advance(); // struct

        if self.peek_kind_at(0).and_then(TokenKind::ident).is_some() {
            self.advance(); // tag
        }

        match self.peek_kind_at(0) {
            Some(TokenKind::LBrace) => {
                self.advance();
            }
            Some(_) => {
                tracing::trace!(at = %start, "skipping bodiless struct typedef");
                self.skip_statement();
                return Ok(None);
            }
            None => {
                return Err(ParseError::malformed(
                    start,
                    "unexpected end of input after 'typedef struct'",
                ));
            }
        }

        let mut fields = Vec::new();
        loop {
            match self.peek_kind_at(0) {
                Some(TokenKind::RBrace) => {
                    self.advance();
                    break;
                }
                Some(TokenKind::Semi) => {
                    self.advance();
                }
                Some(_) => fields.push(self.parse_field()?),
                None => return Err(ParseError::malformed(start, "unterminated struct body")),
            }
        }

        let name = match self.advance() {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => name,
            Some(token) => {
                return Err(ParseError::malformed(
                    token.span,
                    format!(
                        "expected type name after struct body, found {}",
                        token.kind.describe()
                    ),
                ));
            }
            None => {
                return Err(ParseError::malformed(
                    self.current_span(),
                    "expected type name after struct body",
                ));
            }
        };

        match self.advance() {
            Some(Token {
                kind: TokenKind::Semi,
                ..
            }) => {}
            Some(token) => {
                return Err(ParseError::malformed(
                    token.span,
                    format!(
                        "expected ';' after type name '{name}', found {}",
                        token.kind.describe()
                    ),
                ));
            }
            None => {
                return Err(ParseError::malformed(
                    self.current_span(),
                    format!("expected ';' after type name '{name}'"),
                ));
            }
        }

        let mut aggregate = AggregateType::new(name, start);
        for field in fields {
            aggregate.add_field(field);
        }
        Ok(Some(aggregate))
    }

    /// Parses one `type tokens... name;` field statement.
    fn parse_field(&mut self) -> Result<Field, ParseError> {
        let start = self.current_span();
        let mut words: Vec<String> = Vec::new();

        loop {
            let Some(token) = self.advance() else {
                return Err(ParseError::malformed(start, "unterminated struct body"));
            };
            match token.kind {
                TokenKind::Ident(word) => words.push(word),
                TokenKind::Semi => break,
                TokenKind::RBrace => {
                    return Err(ParseError::malformed(
                        token.span,
                        "expected ';' before '}' in field declaration",
                    ));
                }
                other => {
                    return Err(ParseError::malformed(token.span, unsupported_reason(&other)));
                }
            }
        }

        let Some(name) = words.pop() else {
            return Err(ParseError::malformed(start, "empty field declaration"));
        };
        if words.is_empty() {
            return Err(ParseError::malformed(
                start,
                format!("field '{name}' cannot be split into type and name"),
            ));
        }

        Ok(Field::new(words.join(" "), name, start))
    }

    /// Skips a statement that does not declare an aggregate.
    fn skip_statement(&mut self) {
        let start = self.current_span();
        let mut depth = 0usize;
        let mut consumed = false;

        loop {
            if consumed && self.at_struct_typedef() {
                break;
            }
            let Some(token) = self.advance() else {
                break;
            };
            consumed = true;
            match token.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                TokenKind::Semi if depth == 0 => break,
                _ => {}
            }
        }

        tracing::trace!(at = %start, "skipped statement");
    }
}

fn unsupported_reason(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Punct('[') => "array fields are not supported".to_string(),
        TokenKind::Punct('*') => "pointer fields are not supported".to_string(),
        TokenKind::Punct(':') => "bit-fields are not supported".to_string(),
        TokenKind::LBrace => "nested aggregate bodies are not supported".to_string(),
        other => format!("unexpected {} in field declaration", other.describe()),
    }
}

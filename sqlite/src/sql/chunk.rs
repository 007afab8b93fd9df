use std::borrow::Cow;
use std::fmt::Write;

use super::tokens::Token;
use crate::values::SQLiteValue;

/// A SQL chunk represents a part of an SQL statement.
///
/// - `Token` - SQL keywords and operators (SELECT, FROM, =, etc.)
/// - `Ident` - Quoted identifiers ("table_name", "column_name")
/// - `Raw` - Unquoted raw SQL text (function calls, literals)
/// - `Param` - Positional parameter with its bound value
#[derive(Clone, Debug, PartialEq)]
pub enum SQLChunk<'a> {
    /// SQL keywords and operators: SELECT, FROM, WHERE, =, AND, etc.
    Token(Token),

    /// Quoted identifier for user-provided names
    /// Renders as: "name" (with quotes, embedded quotes doubled)
    Ident(Cow<'a, str>),

    /// Raw SQL text (unquoted)
    Raw(Cow<'a, str>),

    /// Renders as: ?
    Param(SQLiteValue<'a>),
}

impl<'a> SQLChunk<'a> {
    #[inline]
    pub const fn token(t: Token) -> Self {
        Self::Token(t)
    }

    #[inline]
    pub fn ident(name: impl Into<Cow<'a, str>>) -> Self {
        Self::Ident(name.into())
    }

    #[inline]
    pub fn raw(text: impl Into<Cow<'a, str>>) -> Self {
        Self::Raw(text.into())
    }

    #[inline]
    pub fn param(value: impl Into<SQLiteValue<'a>>) -> Self {
        Self::Param(value.into())
    }

    /// Write chunk content to buffer
    pub(crate) fn write(&self, buf: &mut impl Write) {
        match self {
            SQLChunk::Token(token) => {
                let _ = buf.write_str(token.as_str());
            }
            SQLChunk::Ident(name) => {
                let _ = buf.write_char('"');
                for part in name.split_inclusive('"') {
                    let _ = buf.write_str(part);
                    if part.ends_with('"') {
                        let _ = buf.write_char('"');
                    }
                }
                let _ = buf.write_char('"');
            }
            SQLChunk::Raw(text) => {
                let _ = buf.write_str(text);
            }
            SQLChunk::Param(_) => {
                let _ = buf.write_char('?');
            }
        }
    }

    /// Check if this chunk is "word-like" (needs space separation from other word-like chunks)
    #[inline]
    pub(crate) const fn is_word_like(&self) -> bool {
        match self {
            SQLChunk::Token(t) => !matches!(
                t,
                Token::LPAREN
                    | Token::RPAREN
                    | Token::COMMA
                    | Token::SEMI
                    | Token::DOT
                    | Token::EQ
                    | Token::NE
                    | Token::LT
                    | Token::GT
                    | Token::LE
                    | Token::GE
                    | Token::MINUS
            ),
            SQLChunk::Ident(_) | SQLChunk::Raw(_) | SQLChunk::Param(_) => true,
        }
    }
}

impl<'a> From<Token> for SQLChunk<'a> {
    #[inline]
    fn from(value: Token) -> Self {
        Self::Token(value)
    }
}

impl<'a> From<SQLiteValue<'a>> for SQLChunk<'a> {
    #[inline]
    fn from(value: SQLiteValue<'a>) -> Self {
        Self::Param(value)
    }
}

// SPDX-License-Identifier: Apache-2.0

use core::fmt;

use crate::JsonNumber;

/// A lexical unit of JSON text.
///
/// Structural tokens and literals carry no data; string and number tokens
/// carry the decoded string and the verbatim number lexeme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// No more characters in the input
    End,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Colon,
    Comma,
    /// A string literal with its escapes already decoded
    String(String),
    Number(JsonNumber),
    Null,
    True,
    False,
}

impl Token {
    pub const fn kind(&self) -> TokenKind {
        match self {
            Token::End => TokenKind::End,
            Token::OpenBrace => TokenKind::OpenBrace,
            Token::CloseBrace => TokenKind::CloseBrace,
            Token::OpenBracket => TokenKind::OpenBracket,
            Token::CloseBracket => TokenKind::CloseBracket,
            Token::Colon => TokenKind::Colon,
            Token::Comma => TokenKind::Comma,
            Token::String(_) => TokenKind::String,
            Token::Number(_) => TokenKind::Number,
            Token::Null => TokenKind::Null,
            Token::True => TokenKind::True,
            Token::False => TokenKind::False,
        }
    }
}

/// The kind of a [`Token`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    End,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Colon,
    Comma,
    String,
    Number,
    Null,
    True,
    False,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::End => "end of input",
            TokenKind::OpenBrace => "'{'",
            TokenKind::CloseBrace => "'}'",
            TokenKind::OpenBracket => "'['",
            TokenKind::CloseBracket => "']'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Null => "null",
            TokenKind::True => "true",
            TokenKind::False => "false",
        })
    }
}

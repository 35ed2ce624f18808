// SPDX-License-Identifier: Apache-2.0

use core::fmt;

use thiserror::Error;

use crate::tokenizer::{LexError, TokenKind};
use crate::Position;

/// Errors that can occur during JSON parsing
///
/// Malformed input (`Lex`, `UnexpectedToken`, `MaxDepthExceeded`) aborts the
/// parse for good. `Exhausted` and `Shutdown` report a caller asking for
/// events that can no longer exist, see [`ParseError::is_usage_error`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An error bubbled up from the underlying tokenizer.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// A well-formed token showed up where the grammar does not allow it.
    #[error("expected {expected}, found {found} at {position}")]
    UnexpectedToken {
        expected: Expected,
        found: TokenKind,
        position: Position,
    },
    /// Containers nested deeper than the configured limit
    #[error("nesting deeper than {max_depth} at {position}")]
    MaxDepthExceeded { max_depth: usize, position: Position },
    /// Another event was requested after the stream already ended.
    #[error("JSON event stream has already ended, there is nothing left")]
    Exhausted,
    /// Another event was requested after the reader was shut down.
    #[error("event reader has been shut down")]
    Shutdown,
    /// The background producer stopped without finishing the document.
    #[error("event producer stopped unexpectedly")]
    ProducerLost,
}

impl ParseError {
    /// True for caller contract violations, false for malformed input
    pub const fn is_usage_error(&self) -> bool {
        matches!(self, ParseError::Exhausted | ParseError::Shutdown)
    }

    /// Where in the input the error was found, if it relates to the input
    pub const fn position(&self) -> Option<Position> {
        match self {
            ParseError::Lex(err) => Some(err.position),
            ParseError::UnexpectedToken { position, .. }
            | ParseError::MaxDepthExceeded { position, .. } => Some(*position),
            ParseError::Exhausted | ParseError::Shutdown | ParseError::ProducerLost => None,
        }
    }
}

/// What the parser would have accepted where an unexpected token was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expected {
    /// Start of the document
    Root,
    /// Right after `[`
    ValueOrEndArray,
    /// After `:` or after `,` in an array
    Value,
    /// Right after `{`
    KeyOrEndObject,
    /// After `,` in an object
    Key,
    /// After an object key
    Colon,
    CommaOrEndArray,
    CommaOrEndObject,
    /// After the root value closed
    EndOfInput,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Expected::Root => "'{' or '['",
            Expected::ValueOrEndArray => "a value or ']'",
            Expected::Value => "a value",
            Expected::KeyOrEndObject => "a string key or '}'",
            Expected::Key => "a string key",
            Expected::Colon => "':'",
            Expected::CommaOrEndArray => "',' or ']'",
            Expected::CommaOrEndObject => "',' or '}'",
            Expected::EndOfInput => "end of input",
        })
    }
}

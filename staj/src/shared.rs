// SPDX-License-Identifier: Apache-2.0

/// Shared components for the tokenizer, parser and event reader
use core::fmt;

use crate::{JsonNumber, ParseError};

/// Location of a character in the input.
///
/// `offset` counts characters (not bytes) from the start of the input and is
/// 0-based; `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Position of the first character of an input
    pub const fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Position of the character following `ch`, which sits at `self`
    pub(crate) const fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            }
        } else {
            Self {
                offset: self.offset + 1,
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Events produced by the JSON parsers
///
/// A well-formed document read through an [`EventReader`](crate::EventReader)
/// produces `Start`, then the pre-order structural trace of the document, then
/// `End`. A bare [`Parser`](crate::Parser) produces the same sequence without
/// the leading `Start`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Event {
    /// The stream has been opened. Always the first event of an `EventReader`.
    Start,
    /// The stream is closed. No further events follow.
    End,
    /// The start of an object (e.g., `{`).
    StartObject,
    /// The end of an object (e.g., `}`).
    EndObject,
    /// The start of an array (e.g., `[`).
    StartArray,
    /// The end of an array (e.g., `]`).
    EndArray,
    /// An object key (e.g., `"key":`), unescaped.
    Key(String),
    /// A string value (e.g., `"value"`), unescaped.
    String(String),
    /// A number value, kept as the exact lexeme found in the input.
    Number(JsonNumber),
    /// `null`
    Null,
    /// `true`
    True,
    /// `false`
    False,
}

impl Event {
    /// Shorthand for `Event::Key(key.into())`
    pub fn key(key: impl Into<String>) -> Self {
        Event::Key(key.into())
    }

    /// Shorthand for `Event::String(value.into())`
    pub fn string(value: impl Into<String>) -> Self {
        Event::String(value.into())
    }

    /// Shorthand for `Event::Number(JsonNumber::new(lexeme))`
    pub fn number(lexeme: impl Into<String>) -> Self {
        Event::Number(JsonNumber::new(lexeme))
    }

    /// Short name of the event kind, as used by the `Display` impl
    pub const fn name(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::End => "end",
            Event::StartObject => "startObj",
            Event::EndObject => "endObj",
            Event::StartArray => "startArr",
            Event::EndArray => "endArr",
            Event::Key(_) => "key",
            Event::String(_) => "string",
            Event::Number(_) => "number",
            Event::Null => "null",
            Event::True => "true",
            Event::False => "false",
        }
    }

    /// True for the `StartObject` and `StartArray` events
    pub const fn is_container_start(&self) -> bool {
        matches!(self, Event::StartObject | Event::StartArray)
    }

    /// True for the `EndObject` and `EndArray` events
    pub const fn is_container_end(&self) -> bool {
        matches!(self, Event::EndObject | Event::EndArray)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Key(text) | Event::String(text) => write!(f, "{}:{text}", self.name()),
            Event::Number(number) => write!(f, "{}:{number}", self.name()),
            _ => f.write_str(self.name()),
        }
    }
}

/// Trait for parsers that can be used in a pull-based manner.
///
/// This trait is implemented by both [`Parser`](crate::Parser) and
/// [`EventReader`](crate::EventReader).
pub trait PullParser {
    /// Returns the next JSON event or an error if parsing fails.
    ///
    /// Parsing continues until `End` is returned or an error occurs. Asking
    /// for another event after that fails with [`ParseError::Exhausted`].
    fn next_event(&mut self) -> Result<Event, ParseError>;

    /// Iterator-like method that returns None when parsing is complete.
    /// This method returns None when End is reached, Some(Ok(event)) for successful events,
    /// and Some(Err(error)) for parsing errors.
    fn next(&mut self) -> Option<Result<Event, ParseError>> {
        match self.next_event() {
            Ok(Event::End) | Err(ParseError::Exhausted) => None,
            other => Some(other),
        }
    }
}

// SPDX-License-Identifier: Apache-2.0

//! The grammar engine: turns tokens into structural events, one per call.

use log::{debug, trace};

use crate::parse_error::Expected;
use crate::tokenizer::{Token, Tokenizer};
use crate::{CharSource, Event, ParseError, ParserOptions, Position, PullParser};

/// One entry of the parse state stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// Right after `[`: a value or `]`
    ArrayStart,
    /// Right after `{`: a key or `}`
    ObjectStart,
    /// After a key: `:` and then the member value
    AfterKey,
    /// After an array element: `,` or `]`
    ArrayAfterValue,
    /// After an object member: `,` or `}`
    ObjectAfterValue,
}

/// Where the parser stands relative to the root value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Before or inside the root value
    Document,
    /// The root value closed; only the end of input may follow
    Trailing,
    /// `End` was produced, or parsing failed
    Done,
}

/// A pull parser producing one [`Event`] per call.
///
/// The document root must be an object or an array. Nested containers are
/// not expanded eagerly: a `StartObject` or `StartArray` is returned on its
/// own and the caller asks again to descend into it.
///
/// # Example
/// ```
/// use staj::{Event, Parser, PullParser, StrSource};
///
/// let mut parser = Parser::new(StrSource::from(r#"{"a": [1.50]}"#));
/// assert_eq!(parser.next_event(), Ok(Event::StartObject));
/// assert_eq!(parser.next_event(), Ok(Event::key("a")));
/// assert_eq!(parser.next_event(), Ok(Event::StartArray));
/// assert_eq!(parser.next_event(), Ok(Event::number("1.50")));
/// assert_eq!(parser.next_event(), Ok(Event::EndArray));
/// assert_eq!(parser.next_event(), Ok(Event::EndObject));
/// assert_eq!(parser.next_event(), Ok(Event::End));
/// ```
pub struct Parser<S> {
    tokenizer: Tokenizer<S>,
    stack: Vec<Frame>,
    /// Containers currently open
    depth: usize,
    phase: Phase,
    options: ParserOptions,
}

impl<S: CharSource> Parser<S> {
    /// Creates a parser with default options
    pub fn new(source: S) -> Self {
        Self::with_options(source, ParserOptions::default())
    }

    pub fn with_options(source: S, options: ParserOptions) -> Self {
        Self {
            tokenizer: Tokenizer::new(source),
            stack: Vec::new(),
            depth: 0,
            phase: Phase::Document,
            options,
        }
    }

    /// Number of containers currently open
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Position of the next unread character
    pub fn position(&self) -> Position {
        self.tokenizer.position()
    }

    /// Runs one transition of the state machine
    fn step(&mut self) -> Result<Event, ParseError> {
        let token = self.tokenizer.next_token()?;

        let Some(frame) = self.stack.last().copied() else {
            return match (self.phase, token) {
                (_, Token::End) => Ok(Event::End),
                (Phase::Document, Token::OpenBrace) => {
                    self.open(Frame::ObjectStart, Event::StartObject)
                }
                (Phase::Document, Token::OpenBracket) => {
                    self.open(Frame::ArrayStart, Event::StartArray)
                }
                (Phase::Document, other) => Err(self.unexpected(Expected::Root, &other)),
                (_, other) => Err(self.unexpected(Expected::EndOfInput, &other)),
            };
        };

        match frame {
            Frame::ArrayStart => {
                self.stack.pop();
                if token == Token::CloseBracket {
                    return Ok(self.close(Event::EndArray));
                }
                self.stack.push(Frame::ArrayAfterValue);
                self.value(token, Expected::ValueOrEndArray)
            }
            Frame::ObjectStart => {
                self.stack.pop();
                if token == Token::CloseBrace {
                    return Ok(self.close(Event::EndObject));
                }
                self.stack.push(Frame::ObjectAfterValue);
                self.key(token, Expected::KeyOrEndObject)
            }
            Frame::AfterKey => match token {
                Token::Colon => {
                    self.stack.pop();
                    let next = self.tokenizer.next_token()?;
                    self.value(next, Expected::Value)
                }
                other => Err(self.unexpected(Expected::Colon, &other)),
            },
            Frame::ArrayAfterValue => match token {
                Token::Comma => {
                    let next = self.tokenizer.next_token()?;
                    self.value(next, Expected::Value)
                }
                Token::CloseBracket => {
                    self.stack.pop();
                    Ok(self.close(Event::EndArray))
                }
                other => Err(self.unexpected(Expected::CommaOrEndArray, &other)),
            },
            Frame::ObjectAfterValue => match token {
                Token::Comma => {
                    let next = self.tokenizer.next_token()?;
                    self.key(next, Expected::Key)
                }
                Token::CloseBrace => {
                    self.stack.pop();
                    Ok(self.close(Event::EndObject))
                }
                other => Err(self.unexpected(Expected::CommaOrEndObject, &other)),
            },
        }
    }

    /// Maps a value-starting token to its event, opening a container if needed
    fn value(&mut self, token: Token, expected: Expected) -> Result<Event, ParseError> {
        match token {
            Token::OpenBrace => self.open(Frame::ObjectStart, Event::StartObject),
            Token::OpenBracket => self.open(Frame::ArrayStart, Event::StartArray),
            Token::Null => Ok(Event::Null),
            Token::True => Ok(Event::True),
            Token::False => Ok(Event::False),
            Token::String(text) => Ok(Event::String(text)),
            Token::Number(number) => Ok(Event::Number(number)),
            other => Err(self.unexpected(expected, &other)),
        }
    }

    fn key(&mut self, token: Token, expected: Expected) -> Result<Event, ParseError> {
        match token {
            Token::String(key) => {
                self.stack.push(Frame::AfterKey);
                Ok(Event::Key(key))
            }
            other => Err(self.unexpected(expected, &other)),
        }
    }

    fn open(&mut self, frame: Frame, event: Event) -> Result<Event, ParseError> {
        if let Some(max_depth) = self.options.max_depth {
            if self.depth >= max_depth {
                return Err(ParseError::MaxDepthExceeded {
                    max_depth,
                    position: self.tokenizer.token_start(),
                });
            }
        }
        self.stack.push(frame);
        self.depth += 1;
        Ok(event)
    }

    /// Accounts for a container whose frame was just popped
    fn close(&mut self, event: Event) -> Event {
        self.depth -= 1;
        event
    }

    fn unexpected(&self, expected: Expected, found: &Token) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: found.kind(),
            position: self.tokenizer.token_start(),
        }
    }
}

impl<S: CharSource> PullParser for Parser<S> {
    fn next_event(&mut self) -> Result<Event, ParseError> {
        if self.phase == Phase::Done {
            return Err(ParseError::Exhausted);
        }

        match self.step() {
            Ok(event) => {
                if event == Event::End {
                    debug!("end of document at {}", self.tokenizer.token_start());
                    self.phase = Phase::Done;
                } else if self.stack.is_empty() {
                    self.phase = Phase::Trailing;
                }
                trace!("event {event}");
                Ok(event)
            }
            Err(err) => {
                self.phase = Phase::Done;
                Err(err)
            }
        }
    }
}

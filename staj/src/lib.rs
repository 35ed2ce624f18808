// SPDX-License-Identifier: Apache-2.0

//! A streaming, pull-based JSON parser.
//!
//! Text is read one character at a time from a [`CharSource`], split into
//! tokens by the [`Tokenizer`](tokenizer::Tokenizer) and turned into a flat
//! sequence of [`Event`]s by a [`Parser`]. The caller pulls events one at a
//! time; nothing is built up in memory beyond the current token and the
//! nesting stack.
//!
//! [`EventReader`] runs the parser on a background thread and hands events
//! over through a bounded buffer, so parsing overlaps with consumption.
//!
//! ```
//! use staj::{Event, EventReader, PullParser, StrSource};
//!
//! let mut reader = EventReader::new(StrSource::from(r#"{"a": 1}"#), 4).unwrap();
//! let mut names = Vec::new();
//! while let Some(event) = reader.next() {
//!     names.push(event.unwrap().to_string());
//! }
//! assert_eq!(names, ["start", "startObj", "key:a", "number:1", "endObj", "end"]);
//! ```

mod char_source;
pub use char_source::{CharSource, StrSource, Utf8Reader};

mod escape_processor;

mod event_reader;
pub use event_reader::EventReader;

mod json_number;
pub use json_number::JsonNumber;

mod options;
pub use options::{ParserOptions, ReaderOptions, DEFAULT_THREAD_NAME};

mod parse_error;
pub use parse_error::{Expected, ParseError};

mod parser;
pub use parser::Parser;

mod shared;
pub use shared::{Event, Position, PullParser};

pub mod tokenizer;

// SPDX-License-Identifier: Apache-2.0

//! Character sources feeding the tokenizer.
//!
//! The tokenizer works on decoded characters, not bytes. [`StrSource`] covers
//! documents already held in memory, [`Utf8Reader`] decodes any
//! [`std::io::Read`] as UTF-8. For other encodings, implement
//! [`CharSource`] on top of your own decoder.
//!
//! # Examples
//!
//! ```rust
//! use staj::{CharSource, StrSource};
//!
//! let mut source = StrSource::from("[1]");
//! assert_eq!(source.next_char().unwrap(), Some('['));
//! assert_eq!(source.next_char().unwrap(), Some('1'));
//! assert_eq!(source.next_char().unwrap(), Some(']'));
//! assert_eq!(source.next_char().unwrap(), None);
//! ```

use std::io::{self, BufReader, Read};

/// Trait for input sources that can provide characters to the tokenizer.
pub trait CharSource {
    /// Read the next character.
    ///
    /// # Contract
    /// - `Ok(None)` **MUST** indicate true end of input
    /// - Implementations **MUST NOT** return `Ok(None)` and then characters on later calls
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        (**self).next_char()
    }
}

impl<S: CharSource + ?Sized> CharSource for Box<S> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        (**self).next_char()
    }
}

/// A [`CharSource`] over an owned, in-memory string.
///
/// Owning the text makes the source `Send + 'static`, so it can be handed to
/// an [`EventReader`](crate::EventReader) producer thread.
#[derive(Debug, Clone, Default)]
pub struct StrSource {
    text: String,
    pos: usize,
}

impl StrSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pos: 0,
        }
    }

    /// The part of the input not consumed yet
    pub fn remaining(&self) -> &str {
        self.text.get(self.pos..).unwrap_or_default()
    }
}

impl From<&str> for StrSource {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for StrSource {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl CharSource for StrSource {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        let next = self.remaining().chars().next();
        if let Some(ch) = next {
            self.pos += ch.len_utf8();
        }
        Ok(next)
    }
}

/// A [`CharSource`] decoding a UTF-8 byte stream.
///
/// The inner reader is buffered. Invalid UTF-8 is reported as an
/// [`io::ErrorKind::InvalidData`] error, and so is a stream that ends in the
/// middle of a multi-byte sequence.
#[derive(Debug)]
pub struct Utf8Reader<R> {
    inner: BufReader<R>,
}

impl<R: Read> Utf8Reader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Length of the UTF-8 sequence introduced by `lead`, or None if `lead`
/// cannot start a sequence.
const fn utf8_sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

fn invalid_utf8(bytes: &[u8]) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("invalid UTF-8 sequence {bytes:02X?}"),
    )
}

impl<R: Read> CharSource for Utf8Reader<R> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        let Some(lead) = self.read_byte()? else {
            return Ok(None);
        };
        let len = utf8_sequence_len(lead).ok_or_else(|| invalid_utf8(&[lead]))?;

        let mut bytes = [lead, 0, 0, 0];
        for i in 1..len {
            match self.read_byte()? {
                Some(b) => bytes[i] = b,
                None => return Err(invalid_utf8(&bytes[..i])),
            }
        }

        let decoded =
            core::str::from_utf8(&bytes[..len]).map_err(|_| invalid_utf8(&bytes[..len]))?;
        Ok(decoded.chars().next())
    }
}

// SPDX-License-Identifier: Apache-2.0

use core::fmt;
use core::ops::Deref;
use core::str::FromStr;

/// A JSON number, kept as the exact lexeme found in the input.
///
/// The parser never converts numbers: `1.50`, `1.5` and `15e-1` are three
/// distinct values here. Callers pick the numeric representation they need,
/// which keeps arbitrary precision available when the lexeme does not fit a
/// machine type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsonNumber(String);

impl JsonNumber {
    /// Wraps a lexeme. The tokenizer only ever builds these from input that
    /// matched the JSON number grammar.
    pub fn new(lexeme: impl Into<String>) -> Self {
        Self(lexeme.into())
    }

    /// The lexeme exactly as it appeared in the input
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// True when the lexeme has neither a fraction nor an exponent
    pub fn is_integer(&self) -> bool {
        !self.0.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'))
    }

    /// Parses the lexeme as an `i64`; `None` for fractions, exponents and
    /// values out of range.
    pub fn as_i64(&self) -> Option<i64> {
        if self.is_integer() {
            self.0.parse().ok()
        } else {
            None
        }
    }

    /// Parses the lexeme as a `u64`; `None` for negative values, fractions,
    /// exponents and values out of range.
    pub fn as_u64(&self) -> Option<u64> {
        if self.is_integer() {
            self.0.parse().ok()
        } else {
            None
        }
    }

    /// Parses the lexeme as an `f64`, rounding to the nearest representable value.
    pub fn as_f64(&self) -> Option<f64> {
        self.0.parse().ok()
    }

    /// Parses the lexeme into any type implementing `FromStr`
    pub fn parse<T: FromStr>(&self) -> Result<T, T::Err> {
        self.0.parse()
    }
}

impl Deref for JsonNumber {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for JsonNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JsonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<JsonNumber> for String {
    fn from(number: JsonNumber) -> Self {
        number.0
    }
}

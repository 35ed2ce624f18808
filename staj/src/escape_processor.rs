// SPDX-License-Identifier: Apache-2.0

use crate::tokenizer::LexErrorKind;

/// Pure functions for decoding JSON string escape sequences.
///
/// The tokenizer feeds these the characters that follow a backslash; they
/// never touch the input themselves.
pub(crate) struct EscapeProcessor;

impl EscapeProcessor {
    /// Process a simple escape sequence character and return the unescaped character.
    ///
    /// # Arguments
    /// * `escape_char` - The character following the backslash
    ///
    /// # Returns
    /// The unescaped character, or `None` when `escape_char` is `u` (which
    /// needs hex digits) or not a valid escape at all.
    pub fn process_simple_escape(escape_char: char) -> Option<char> {
        match escape_char {
            '"' => Some('"'),
            '\\' => Some('\\'),
            '/' => Some('/'),
            'b' => Some('\u{08}'),
            'f' => Some('\u{0C}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            _ => None,
        }
    }

    /// Decode the four hex digits of a `\uXXXX` escape into a UTF-16 code unit.
    ///
    /// Digits are case-insensitive. Anything that is not exactly four hex
    /// digits yields `InvalidUnicodeEscape` carrying what was read.
    pub fn decode_hex4(digits: &str) -> Result<u32, LexErrorKind> {
        let invalid = || LexErrorKind::InvalidUnicodeEscape(digits.to_string());
        if digits.chars().count() != 4 {
            return Err(invalid());
        }
        digits.chars().try_fold(0u32, |acc, ch| {
            ch.to_digit(16)
                .map(|digit| (acc << 4) | digit)
                .ok_or_else(invalid)
        })
    }

    /// Check if a UTF-16 code unit is a high surrogate (0xD800-0xDBFF)
    pub fn is_high_surrogate(unit: u32) -> bool {
        (0xD800..=0xDBFF).contains(&unit)
    }

    /// Check if a UTF-16 code unit is a low surrogate (0xDC00-0xDFFF)
    pub fn is_low_surrogate(unit: u32) -> bool {
        (0xDC00..=0xDFFF).contains(&unit)
    }

    /// Combine a high and low surrogate pair into a single character
    pub fn combine_surrogate_pair(high: u32, low: u32) -> Result<char, LexErrorKind> {
        if !Self::is_high_surrogate(high) {
            return Err(LexErrorKind::UnpairedSurrogate(high));
        }
        if !Self::is_low_surrogate(low) {
            return Err(LexErrorKind::UnpairedSurrogate(high));
        }
        let codepoint = 0x10000 + ((high & 0x3FF) << 10) + (low & 0x3FF);
        char::from_u32(codepoint).ok_or(LexErrorKind::UnpairedSurrogate(high))
    }

    /// Convert a code unit that is not part of a surrogate pair to a character
    pub fn unit_to_char(unit: u32) -> Result<char, LexErrorKind> {
        char::from_u32(unit).ok_or(LexErrorKind::UnpairedSurrogate(unit))
    }
}

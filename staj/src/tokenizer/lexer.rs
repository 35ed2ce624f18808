// SPDX-License-Identifier: Apache-2.0

use std::io;

use log::trace;
use thiserror::Error;

use super::Token;
use crate::escape_processor::EscapeProcessor;
use crate::{CharSource, JsonNumber, Position};

/// A lexical error, with the position of the offending character.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {position}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: Position,
}

impl LexError {
    pub fn new(kind: LexErrorKind, position: Position) -> Self {
        Self { kind, position }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("invalid escape sequence \\{0}")]
    InvalidEscape(char),
    #[error("invalid unicode escape \\u{0}")]
    InvalidUnicodeEscape(String),
    #[error("unpaired surrogate \\u{0:04X}")]
    UnpairedSurrogate(u32),
    #[error("invalid number")]
    InvalidNumber,
    #[error("invalid literal, expected `{0}`")]
    InvalidKeyword(&'static str),
    #[error("failed to read input: {0}")]
    Read(ReadError),
}

/// An I/O failure of the [`CharSource`], kept comparable and cloneable so it
/// can travel through the event buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ReadError {
    pub kind: io::ErrorKind,
    pub message: String,
}

impl From<io::Error> for ReadError {
    fn from(err: io::Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Splits a character stream into JSON [`Token`]s, one per call.
///
/// Keeps a single character of lookahead: a number is only known to be
/// complete once the character after it has been read, and that character is
/// held back for the next call.
pub struct Tokenizer<S> {
    source: S,
    /// Character read past the end of a number
    pending: Option<char>,
    /// Position of the next character to read
    position: Position,
    /// Position of the most recently read character
    last_start: Position,
    /// Position of the first character of the most recent token
    token_start: Position,
}

impl<S: CharSource> Tokenizer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            pending: None,
            position: Position::start(),
            last_start: Position::start(),
            token_start: Position::start(),
        }
    }

    /// Position of the next character to be read
    pub fn position(&self) -> Position {
        self.position
    }

    /// Position where the most recently returned token started. For
    /// [`Token::End`] this is the end of the input.
    pub fn token_start(&self) -> Position {
        self.token_start
    }

    /// Reads the next token, skipping leading whitespace.
    ///
    /// Once the input is exhausted every call returns [`Token::End`].
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let next = loop {
            match self.bump()? {
                Some(' ' | '\t' | '\n' | '\r') => continue,
                other => break other,
            }
        };

        let Some(ch) = next else {
            self.token_start = self.position;
            return Ok(Token::End);
        };
        self.token_start = self.last_start;

        let token = match ch {
            '{' => Token::OpenBrace,
            '}' => Token::CloseBrace,
            '[' => Token::OpenBracket,
            ']' => Token::CloseBracket,
            ':' => Token::Colon,
            ',' => Token::Comma,
            '"' => Token::String(self.read_string()?),
            '-' | '0'..='9' => Token::Number(self.read_number(ch)?),
            'n' => self.read_keyword("null", Token::Null)?,
            't' => self.read_keyword("true", Token::True)?,
            'f' => self.read_keyword("false", Token::False)?,
            other => {
                return Err(LexError::new(
                    LexErrorKind::UnexpectedCharacter(other),
                    self.token_start,
                ))
            }
        };
        trace!("token {:?} at {}", token, self.token_start);
        Ok(token)
    }

    /// Take one character, from the lookahead slot first
    fn bump(&mut self) -> Result<Option<char>, LexError> {
        let next = match self.pending.take() {
            Some(ch) => Some(ch),
            None => self.source.next_char().map_err(|err| {
                LexError::new(LexErrorKind::Read(err.into()), self.position)
            })?,
        };
        if let Some(ch) = next {
            self.last_start = self.position;
            self.position = self.position.advance(ch);
        }
        Ok(next)
    }

    /// Push back the character just read by `bump`
    fn unread(&mut self, ch: char) {
        debug_assert!(self.pending.is_none());
        self.position = self.last_start;
        self.pending = Some(ch);
    }

    /// Error positioned at `ch` if one was read, or at the end of input
    fn error_at(&self, kind: LexErrorKind, ch: Option<char>) -> LexError {
        let position = if ch.is_some() {
            self.last_start
        } else {
            self.position
        };
        LexError::new(kind, position)
    }

    fn read_string(&mut self) -> Result<String, LexError> {
        let mut text = String::new();
        loop {
            match self.bump()? {
                None => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedString,
                        self.position,
                    ))
                }
                Some('"') => return Ok(text),
                Some('\\') => text.push(self.read_escape()?),
                Some(ch) => text.push(ch),
            }
        }
    }

    /// Decode the escape whose backslash was just read
    fn read_escape(&mut self) -> Result<char, LexError> {
        let escape_start = self.last_start;
        match self.bump()? {
            None => Err(LexError::new(
                LexErrorKind::UnterminatedString,
                self.position,
            )),
            Some('u') => self.read_unicode_escape(escape_start),
            Some(ch) => EscapeProcessor::process_simple_escape(ch)
                .ok_or_else(|| LexError::new(LexErrorKind::InvalidEscape(ch), escape_start)),
        }
    }

    fn read_hex4(&mut self, escape_start: Position) -> Result<u32, LexError> {
        let mut digits = String::with_capacity(4);
        for _ in 0..4 {
            match self.bump()? {
                Some(ch) => digits.push(ch),
                None => break,
            }
        }
        EscapeProcessor::decode_hex4(&digits).map_err(|kind| LexError::new(kind, escape_start))
    }

    /// `\uXXXX`, combining a high surrogate with the `\uXXXX` low surrogate
    /// that must follow it
    fn read_unicode_escape(&mut self, escape_start: Position) -> Result<char, LexError> {
        let unit = self.read_hex4(escape_start)?;
        if !EscapeProcessor::is_high_surrogate(unit) {
            return EscapeProcessor::unit_to_char(unit)
                .map_err(|kind| LexError::new(kind, escape_start));
        }

        let unpaired = LexError::new(LexErrorKind::UnpairedSurrogate(unit), escape_start);
        if self.bump()? != Some('\\') || self.bump()? != Some('u') {
            return Err(unpaired);
        }
        let low = self.read_hex4(escape_start)?;
        EscapeProcessor::combine_surrogate_pair(unit, low)
            .map_err(|kind| LexError::new(kind, escape_start))
    }

    /// `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
    ///
    /// Reading stops at the first character that cannot extend the number,
    /// which is pushed back. A leading `0` is never followed by more integer
    /// digits: `01` reads as `0`, leaving `1` for the next token.
    fn read_number(&mut self, first: char) -> Result<JsonNumber, LexError> {
        let mut lexeme = String::new();
        let mut ch = Some(first);

        if ch == Some('-') {
            lexeme.push('-');
            ch = self.bump()?;
        }

        match ch {
            Some('0') => {
                lexeme.push('0');
                ch = self.bump()?;
            }
            Some(digit @ '1'..='9') => {
                lexeme.push(digit);
                ch = self.read_digits(&mut lexeme)?;
            }
            other => return Err(self.error_at(LexErrorKind::InvalidNumber, other)),
        }

        if ch == Some('.') {
            lexeme.push('.');
            let next = self.bump()?;
            ch = self.read_required_digits(&mut lexeme, next)?;
        }

        if let Some(marker @ ('e' | 'E')) = ch {
            lexeme.push(marker);
            let mut next = self.bump()?;
            if let Some(sign @ ('+' | '-')) = next {
                lexeme.push(sign);
                next = self.bump()?;
            }
            ch = self.read_required_digits(&mut lexeme, next)?;
        }

        if let Some(lookahead) = ch {
            self.unread(lookahead);
        }
        Ok(JsonNumber::new(lexeme))
    }

    /// Appends digits until a non-digit, which is returned
    fn read_digits(&mut self, lexeme: &mut String) -> Result<Option<char>, LexError> {
        loop {
            match self.bump()? {
                Some(digit) if digit.is_ascii_digit() => lexeme.push(digit),
                other => return Ok(other),
            }
        }
    }

    /// Like `read_digits`, but `first` must itself be a digit
    fn read_required_digits(
        &mut self,
        lexeme: &mut String,
        first: Option<char>,
    ) -> Result<Option<char>, LexError> {
        match first {
            Some(digit) if digit.is_ascii_digit() => {
                lexeme.push(digit);
                self.read_digits(lexeme)
            }
            other => Err(self.error_at(LexErrorKind::InvalidNumber, other)),
        }
    }

    /// The first letter of `word` has been read; the rest must follow exactly
    fn read_keyword(&mut self, word: &'static str, token: Token) -> Result<Token, LexError> {
        for expected in word.chars().skip(1) {
            let ch = self.bump()?;
            if ch != Some(expected) {
                return Err(self.error_at(LexErrorKind::InvalidKeyword(word), ch));
            }
        }
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StrSource;
    use test_log::test;

    fn tokenizer(input: &str) -> Tokenizer<StrSource> {
        Tokenizer::new(StrSource::from(input))
    }

    fn collect_tokens(input: &str) -> Result<Vec<Token>, LexError> {
        let mut tokenizer = tokenizer(input);
        let mut tokens = Vec::new();
        loop {
            let token = tokenizer.next_token()?;
            if token == Token::End {
                return Ok(tokens);
            }
            tokens.push(token);
        }
    }

    fn string(s: &str) -> Token {
        Token::String(s.to_string())
    }

    fn number(s: &str) -> Token {
        Token::Number(JsonNumber::new(s))
    }

    fn single_error(input: &str) -> LexErrorKind {
        match collect_tokens(input) {
            Err(err) => err.kind,
            Ok(tokens) => panic!("expected an error for {input:?}, got {tokens:?}"),
        }
    }

    fn expected_document_tokens() -> Vec<Token> {
        vec![
            Token::OpenBrace,
            string("something"),
            Token::Colon,
            string("somethingElse"),
            Token::Comma,
            string("another"),
            Token::Colon,
            Token::OpenBracket,
            string("hi"),
            Token::Comma,
            Token::True,
            Token::Comma,
            Token::Null,
            Token::Comma,
            Token::OpenBrace,
            string("hi"),
            Token::Colon,
            number("123"),
            Token::CloseBrace,
            Token::CloseBracket,
            Token::Comma,
            string("pint"),
            Token::Colon,
            Token::False,
            Token::CloseBrace,
        ]
    }

    #[test]
    fn no_whitespace() {
        let input = r#"{"something":"somethingElse","another":["hi",true,null,{"hi":123}],"pint":false}"#;
        assert_eq!(collect_tokens(input), Ok(expected_document_tokens()));
    }

    #[test]
    fn whitespace_is_insignificant() {
        let input = "{\n\t\"something\" : \"somethingElse\",\r\n  \"another\": [ \"hi\" , true ,null,\n\
                     { \"hi\" :123 } ] ,\n \"pint\":\tfalse\n}\n";
        assert_eq!(collect_tokens(input), Ok(expected_document_tokens()));
    }

    #[test]
    fn end_is_idempotent() {
        let mut tokenizer = tokenizer("  [ ]  ");
        assert_eq!(tokenizer.next_token(), Ok(Token::OpenBracket));
        assert_eq!(tokenizer.next_token(), Ok(Token::CloseBracket));
        assert_eq!(tokenizer.next_token(), Ok(Token::End));
        assert_eq!(tokenizer.next_token(), Ok(Token::End));
        assert_eq!(tokenizer.next_token(), Ok(Token::End));
    }

    #[test]
    fn empty_input() {
        assert_eq!(collect_tokens(""), Ok(vec![]));
        assert_eq!(collect_tokens(" \n\t\r "), Ok(vec![]));
    }

    #[test]
    fn parse_string() {
        assert_eq!(collect_tokens(r#""Cat""#), Ok(vec![string("Cat")]));
        assert_eq!(collect_tokens(r#""""#), Ok(vec![string("")]));
    }

    #[test]
    fn simple_escapes() {
        let input = r#""q\" b\\ s\/ \b\f\n\r\t""#;
        assert_eq!(
            collect_tokens(input),
            Ok(vec![string("q\" b\\ s/ \u{08}\u{0C}\n\r\t")])
        );
    }

    #[test]
    fn unicode_escapes() {
        assert_eq!(
            collect_tokens(r#""caf\u00e9 \u00C9 \u0041""#),
            Ok(vec![string("café É A")])
        );
    }

    #[test]
    fn surrogate_pair_escape() {
        assert_eq!(
            collect_tokens(r#""\ud83d\uDE00!""#),
            Ok(vec![string("😀!")])
        );
    }

    #[test]
    fn unpaired_surrogates() {
        assert_eq!(
            single_error(r#""\ud83d""#),
            LexErrorKind::UnpairedSurrogate(0xD83D)
        );
        assert_eq!(
            single_error(r#""\ud83dA""#),
            LexErrorKind::UnpairedSurrogate(0xD83D)
        );
        assert_eq!(
            single_error(r#""\ude00""#),
            LexErrorKind::UnpairedSurrogate(0xDE00)
        );
    }

    #[test]
    fn invalid_escape() {
        assert_eq!(single_error(r#""bad \x""#), LexErrorKind::InvalidEscape('x'));
        assert_eq!(single_error(r#""bad \U0041""#), LexErrorKind::InvalidEscape('U'));
    }

    #[test]
    fn invalid_unicode_digits() {
        assert_eq!(
            single_error(r#""\uXYZ1""#),
            LexErrorKind::InvalidUnicodeEscape("XYZ1".to_string())
        );
        assert_eq!(
            single_error(r#""\u12"#),
            LexErrorKind::InvalidUnicodeEscape("12".to_string())
        );
    }

    #[test]
    fn unterminated_string() {
        assert_eq!(single_error(r#""Cat"#), LexErrorKind::UnterminatedString);
        assert_eq!(single_error(r#""Cat\"#), LexErrorKind::UnterminatedString);
    }

    #[test]
    fn numbers() {
        let cases = [
            "0", "-0", "7", "3.14", "-3.14", "10", "1e5", "1E5", "1e+5", "1e-5", "-0.5E-10",
            "12345678901234567890123456789",
        ];
        for case in cases {
            assert_eq!(collect_tokens(case), Ok(vec![number(case)]), "{case}");
        }
    }

    #[test]
    fn number_pushes_back_one_character() {
        let mut tokenizer = tokenizer("[12,3]");
        assert_eq!(tokenizer.next_token(), Ok(Token::OpenBracket));
        assert_eq!(tokenizer.next_token(), Ok(number("12")));
        assert_eq!(tokenizer.next_token(), Ok(Token::Comma));
        assert_eq!(tokenizer.next_token(), Ok(number("3")));
        assert_eq!(tokenizer.next_token(), Ok(Token::CloseBracket));
        assert_eq!(tokenizer.next_token(), Ok(Token::End));
    }

    #[test]
    fn extra_decimal_point_ends_number() {
        let mut tokenizer = tokenizer("3.3.4");
        assert_eq!(tokenizer.next_token(), Ok(number("3.3")));
        assert_eq!(
            tokenizer.next_token(),
            Err(LexError::new(
                LexErrorKind::UnexpectedCharacter('.'),
                Position {
                    offset: 3,
                    line: 1,
                    column: 4
                }
            ))
        );
    }

    #[test]
    fn leading_zero_stops_number() {
        let mut tokenizer = tokenizer("01");
        assert_eq!(tokenizer.next_token(), Ok(number("0")));
        assert_eq!(tokenizer.next_token(), Ok(number("1")));
        assert_eq!(tokenizer.next_token(), Ok(Token::End));
    }

    #[test]
    fn malformed_numbers() {
        for case in ["-", "-a", "1.", "1.e5", "1e", "1e+", "1E-x", "-.5"] {
            assert_eq!(single_error(case), LexErrorKind::InvalidNumber, "{case}");
        }
    }

    #[test]
    fn keywords() {
        assert_eq!(
            collect_tokens("null true false"),
            Ok(vec![Token::Null, Token::True, Token::False])
        );
    }

    #[test]
    fn misspelled_keywords() {
        assert_eq!(single_error("nul!"), LexErrorKind::InvalidKeyword("null"));
        assert_eq!(single_error("fa!se"), LexErrorKind::InvalidKeyword("false"));
        assert_eq!(single_error("ru3"), LexErrorKind::UnexpectedCharacter('r'));
        assert_eq!(single_error("tru3"), LexErrorKind::InvalidKeyword("true"));
        assert_eq!(single_error("tru"), LexErrorKind::InvalidKeyword("true"));
    }

    #[test]
    fn unexpected_characters() {
        for (input, ch) in [("x", 'x'), ("'a'", '\''), ("+1", '+'), (".5", '.'), ("\u{a0}", '\u{a0}')] {
            assert_eq!(single_error(input), LexErrorKind::UnexpectedCharacter(ch), "{input}");
        }
    }

    #[test]
    fn error_positions() {
        let err = collect_tokens("{\n  \"a\": tru }").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::InvalidKeyword("true"));
        assert_eq!(
            err.position,
            Position {
                offset: 12,
                line: 2,
                column: 11
            }
        );
        assert_eq!(
            err.to_string(),
            "invalid literal, expected `true` at line 2, column 11"
        );
    }

    #[test]
    fn token_start_positions() {
        let mut tokenizer = tokenizer("[\n  -12 ,\"x\"]");
        tokenizer.next_token().unwrap();
        assert_eq!(tokenizer.token_start().offset, 0);
        tokenizer.next_token().unwrap();
        assert_eq!(
            tokenizer.token_start(),
            Position {
                offset: 4,
                line: 2,
                column: 3
            }
        );
        assert_eq!(tokenizer.next_token(), Ok(Token::Comma));
        assert_eq!(tokenizer.token_start().offset, 8);
        tokenizer.next_token().unwrap();
        assert_eq!(tokenizer.token_start().offset, 9);
    }

    struct FailingSource;

    impl CharSource for FailingSource {
        fn next_char(&mut self) -> io::Result<Option<char>> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"))
        }
    }

    #[test]
    fn read_errors_are_lexical_failures() {
        let mut tokenizer = Tokenizer::new(FailingSource);
        let err = tokenizer.next_token().unwrap_err();
        assert_eq!(
            err.kind,
            LexErrorKind::Read(ReadError {
                kind: io::ErrorKind::ConnectionReset,
                message: "peer went away".to_string(),
            })
        );
    }
}

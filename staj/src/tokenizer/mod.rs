// SPDX-License-Identifier: Apache-2.0

mod token;
pub use token::{Token, TokenKind};

mod lexer;
pub use lexer::Tokenizer;
pub use lexer::{LexError, LexErrorKind, ReadError};

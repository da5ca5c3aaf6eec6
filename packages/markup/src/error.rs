use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected character at {pos}: expected {expected}, found {found:?}")]
    UnexpectedChar {
        pos: usize,
        expected: String,
        found: char,
    },

    #[error("Unexpected end of input at {pos}")]
    UnexpectedEof { pos: usize },

    #[error("Mismatched closing tag at {pos}: expected </{expected}>, found </{found}>")]
    MismatchedTag {
        pos: usize,
        expected: String,
        found: String,
    },

    #[error("Invalid markup at {pos}: {message}")]
    Invalid { pos: usize, message: String },
}

impl ParseError {
    pub fn unexpected_char(pos: usize, expected: impl Into<String>, found: char) -> Self {
        Self::UnexpectedChar {
            pos,
            expected: expected.into(),
            found,
        }
    }

    pub fn unexpected_eof(pos: usize) -> Self {
        Self::UnexpectedEof { pos }
    }

    pub fn mismatched_tag(pos: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::MismatchedTag {
            pos,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn invalid(pos: usize, message: impl Into<String>) -> Self {
        Self::Invalid {
            pos,
            message: message.into(),
        }
    }
}

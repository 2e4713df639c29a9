//! Whitespace-token reader for the upstream text encodings.
//!
//! The initial-state block and the successor-generator tree arrive as
//! whitespace-separated tokens. Fail-closed: a missing token, a wrong magic
//! word, or an unparseable number is a typed [`ParseError`], never a panic.
//! These are configuration errors (the upstream translator and this core
//! disagree); callers are expected to abort on them.

use std::str::FromStr;
use std::str::SplitWhitespace;

/// Typed failure while reading an upstream token stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The stream ended before the expected token.
    #[error("token stream truncated: expected {expected} after {consumed} tokens")]
    Truncated { expected: String, consumed: usize },
    /// A section marker did not match.
    #[error("bad magic: expected '{expected}', got '{found}'")]
    BadMagic { expected: String, found: String },
    /// A token could not be parsed as the expected type.
    #[error("invalid token '{found}': expected {expected}")]
    InvalidToken { expected: String, found: String },
    /// Successor-generator node tag other than `switch` / `check`.
    #[error("illegal successor generator statement: expected 'switch' or 'check', got '{found}'")]
    UnknownGeneratorTag { found: String },
    /// A variable index outside the declared variables.
    #[error("variable index {var} out of range ({count} variables)")]
    VariableOutOfRange { var: i64, count: usize },
    /// An operator index outside the operator table.
    #[error("operator index {op} out of range ({count} operators)")]
    OperatorOutOfRange { op: i64, count: usize },
    /// A state vector of the wrong length.
    #[error("state has {found} values, task declares {expected} variables")]
    LengthMismatch { expected: usize, found: usize },
    /// A discrete-only variable whose numeric slot is not the unused sentinel.
    #[error("variable {var} is discrete but carries numeric value {value}")]
    NumericSentinelMismatch { var: usize, value: String },
    /// A discrete value that is neither a domain index nor the numeric sentinel.
    #[error("variable {var}: value {value} is not in its domain of size {domain_size}")]
    ValueOutOfDomain {
        var: usize,
        value: i32,
        domain_size: usize,
    },
}

/// Sequential reader over whitespace-separated tokens.
#[derive(Debug, Clone)]
pub struct TokenReader<'a> {
    tokens: SplitWhitespace<'a>,
    consumed: usize,
}

impl<'a> TokenReader<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            tokens: text.split_whitespace(),
            consumed: 0,
        }
    }

    /// Number of tokens consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.consumed
    }

    /// Next raw token. `expected` names what the caller wanted, for the error.
    ///
    /// # Errors
    ///
    /// [`ParseError::Truncated`] when the stream is exhausted.
    pub fn next_token(&mut self, expected: &str) -> Result<&'a str, ParseError> {
        let token = self.tokens.next().ok_or_else(|| ParseError::Truncated {
            expected: expected.into(),
            consumed: self.consumed,
        })?;
        self.consumed += 1;
        Ok(token)
    }

    /// Next token parsed as `T`.
    ///
    /// # Errors
    ///
    /// [`ParseError::Truncated`] or [`ParseError::InvalidToken`].
    pub fn parse<T: FromStr>(&mut self, expected: &str) -> Result<T, ParseError> {
        let token = self.next_token(expected)?;
        token.parse().map_err(|_| ParseError::InvalidToken {
            expected: expected.into(),
            found: token.into(),
        })
    }

    /// Consume a section marker such as `begin_state`.
    ///
    /// # Errors
    ///
    /// [`ParseError::BadMagic`] if the next token differs.
    pub fn expect_magic(&mut self, magic: &str) -> Result<(), ParseError> {
        let token = self.next_token(magic)?;
        if token == magic {
            Ok(())
        } else {
            Err(ParseError::BadMagic {
                expected: magic.into(),
                found: token.into(),
            })
        }
    }

    /// Read a variable index and check it against `count`.
    ///
    /// # Errors
    ///
    /// [`ParseError::VariableOutOfRange`] for negative or too-large indices.
    pub fn parse_var(&mut self, count: usize) -> Result<usize, ParseError> {
        let raw: i64 = self.parse("variable index")?;
        usize::try_from(raw)
            .ok()
            .filter(|&var| var < count)
            .ok_or(ParseError::VariableOutOfRange { var: raw, count })
    }
}

// cellvm-core - Error codes for exceptional states
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Error codes carried by exceptional contexts.
//!
//! Program-level failures are never Rust errors. They put the context into an
//! exceptional state whose code is a keyword, so every node reports the same
//! failure in the same form. [`ErrorCode`] is the closed set of codes the
//! runtime itself raises; user code may raise any non-nil code.

use std::fmt;
use std::sync::OnceLock;

use cellvm_data::{Keyword, Value};

/// Error codes raised by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCode {
    /// Symbol is neither special nor bound
    Undeclared,
    /// Juice exhausted
    Juice,
    /// Transaction sequence number is not the expected next value
    Sequence,
    /// Index outside a sequence's bounds
    Bounds,
    /// Assertion failed, or user failure without a code
    Assert,
    /// Call depth limit exceeded
    Depth,
    /// Balance cannot cover a transfer
    Funds,
    /// Account does not exist
    Nobody,
    /// Argument has the right type but an invalid value
    Argument,
    /// Argument has the wrong type
    Cast,
    /// Wrong number of arguments
    Arity,
    /// Internal invariant violated
    Unexpected,
    Return,
    Rollback,
    Halt,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: [ErrorCode; 15] = [
        ErrorCode::Undeclared,
        ErrorCode::Juice,
        ErrorCode::Sequence,
        ErrorCode::Bounds,
        ErrorCode::Assert,
        ErrorCode::Depth,
        ErrorCode::Funds,
        ErrorCode::Nobody,
        ErrorCode::Argument,
        ErrorCode::Cast,
        ErrorCode::Arity,
        ErrorCode::Unexpected,
        ErrorCode::Return,
        ErrorCode::Rollback,
        ErrorCode::Halt,
    ];

    /// Name of the code's keyword, without the leading colon.
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::Undeclared => "UNDECLARED",
            ErrorCode::Juice => "JUICE",
            ErrorCode::Sequence => "SEQUENCE",
            ErrorCode::Bounds => "BOUNDS",
            ErrorCode::Assert => "ASSERT",
            ErrorCode::Depth => "DEPTH",
            ErrorCode::Funds => "FUNDS",
            ErrorCode::Nobody => "NOBODY",
            ErrorCode::Argument => "ARGUMENT",
            ErrorCode::Cast => "CAST",
            ErrorCode::Arity => "ARITY",
            ErrorCode::Unexpected => "UNEXPECTED",
            ErrorCode::Return => "RETURN",
            ErrorCode::Rollback => "ROLLBACK",
            ErrorCode::Halt => "HALT",
        }
    }

    /// The interned keyword for this code.
    ///
    /// Interned once per process, so raising an error never takes the
    /// interner lock.
    pub fn keyword(self) -> Keyword {
        static KEYWORDS: OnceLock<[Keyword; 15]> = OnceLock::new();
        let keywords =
            KEYWORDS.get_or_init(|| ErrorCode::ALL.map(|code| Keyword::new(code.name())));
        keywords[self as usize].clone()
    }

    /// The runtime code named by `keyword`, if any.
    pub fn from_keyword(keyword: &Keyword) -> Option<ErrorCode> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.name() == keyword.name())
    }

    /// The runtime code a value denotes, if it is one of the known keywords.
    pub fn from_value(value: &Value) -> Option<ErrorCode> {
        value.as_keyword().and_then(ErrorCode::from_keyword)
    }

    /// True for the non-local exits that are not failures.
    pub fn is_control(self) -> bool {
        matches!(
            self,
            ErrorCode::Return | ErrorCode::Rollback | ErrorCode::Halt
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.name())
    }
}

impl From<ErrorCode> for Value {
    fn from(code: ErrorCode) -> Self {
        Value::Keyword(code.keyword())
    }
}

impl From<ErrorCode> for Keyword {
    fn from(code: ErrorCode) -> Self {
        code.keyword()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        for code in ErrorCode::ALL {
            assert_eq!(ErrorCode::from_keyword(&code.keyword()), Some(code));
        }
        assert_eq!(ErrorCode::from_keyword(&Keyword::new("NOPE")), None);
    }

    #[test]
    fn test_cached_keywords_match_names() {
        for (i, code) in ErrorCode::ALL.into_iter().enumerate() {
            assert_eq!(code as usize, i);
            assert_eq!(code.keyword().name(), code.name());
            assert_eq!(code.keyword(), Keyword::new(code.name()));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::Juice.to_string(), ":JUICE");
        assert_eq!(Value::from(ErrorCode::Undeclared), Value::keyword("UNDECLARED"));
    }

    #[test]
    fn test_control_codes() {
        assert!(ErrorCode::Rollback.is_control());
        assert!(!ErrorCode::Assert.is_control());
    }
}

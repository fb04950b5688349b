// cellvm-core - Exceptional channel
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Non-local exits: errors and control signals.
//!
//! A context is either normal, holding a result [`Value`], or exceptional,
//! holding an [`Exceptional`]. Every evaluation step checks which and skips
//! its work once the context has gone exceptional, so a failure propagates
//! to the nearest boundary that inspects it (for transactions, the engine).

use cellvm_data::{DataError, Value};

use crate::error::ErrorCode;

/// Result type for evaluator helpers that can raise an exceptional state.
pub type Result<T> = std::result::Result<T, Exceptional>;

/// An error or control signal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Exceptional {
    /// Failure with a non-nil code and an optional (possibly nil) message
    #[error("{code} {message}")]
    Error { code: Value, message: Value },
    /// Early exit with a result; state changes are kept
    #[error("return {0}")]
    Return(Value),
    /// Early exit with a result; state changes are discarded
    #[error("rollback {0}")]
    Rollback(Value),
    /// Terminate the whole transaction with a result; state changes are kept
    #[error("halt {0}")]
    Halt(Value),
}

impl Exceptional {
    /// Build an error from an arbitrary code value.
    ///
    /// # Panics
    ///
    /// Panics if `code` is nil. A nil code cannot be reported or matched, so
    /// constructing one is a bug in the caller.
    pub fn error(code: impl Into<Value>, message: impl Into<Value>) -> Self {
        let code = code.into();
        assert!(!code.is_nil(), "exceptional error code must not be nil");
        Exceptional::Error {
            code,
            message: message.into(),
        }
    }

    /// Build an error with a runtime code and a string message.
    pub fn coded(code: ErrorCode, message: impl Into<String>) -> Self {
        Exceptional::Error {
            code: code.into(),
            message: Value::from(message.into()),
        }
    }

    /// The code of this exceptional. Control signals report their own
    /// keyword (`:RETURN`, `:ROLLBACK`, `:HALT`).
    pub fn code(&self) -> Value {
        match self {
            Exceptional::Error { code, .. } => code.clone(),
            Exceptional::Return(_) => ErrorCode::Return.into(),
            Exceptional::Rollback(_) => ErrorCode::Rollback.into(),
            Exceptional::Halt(_) => ErrorCode::Halt.into(),
        }
    }

    /// The runtime error code, if the code is one the runtime knows.
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_value(&self.code())
    }

    /// Error message, or control signal payload.
    pub fn message(&self) -> &Value {
        match self {
            Exceptional::Error { message, .. } => message,
            Exceptional::Return(v) | Exceptional::Rollback(v) | Exceptional::Halt(v) => v,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Exceptional::Error { .. })
    }

    pub fn is_control(&self) -> bool {
        !self.is_error()
    }
}

impl From<&DataError> for Exceptional {
    fn from(err: &DataError) -> Self {
        let code = match err {
            DataError::IndexOutOfBounds { .. } => ErrorCode::Bounds,
            DataError::NoSuchAccount(_) => ErrorCode::Nobody,
            DataError::InsufficientFunds { .. } => ErrorCode::Funds,
            DataError::InvalidAmount(_) => ErrorCode::Argument,
        };
        Exceptional::coded(code, err.to_string())
    }
}

impl From<DataError> for Exceptional {
    fn from(err: DataError) -> Self {
        Exceptional::from(&err)
    }
}

/// Either a normal result or an exceptional state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Value(Value),
    Exceptional(Exceptional),
}

impl Outcome {
    pub fn is_exceptional(&self) -> bool {
        matches!(self, Outcome::Exceptional(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Outcome::Value(v) => Some(v),
            Outcome::Exceptional(_) => None,
        }
    }

    pub fn exceptional(&self) -> Option<&Exceptional> {
        match self {
            Outcome::Value(_) => None,
            Outcome::Exceptional(e) => Some(e),
        }
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Outcome::Value(Value::Nil)
    }
}

impl From<Result<Value>> for Outcome {
    fn from(result: Result<Value>) -> Self {
        match result {
            Ok(v) => Outcome::Value(v),
            Err(e) => Outcome::Exceptional(e),
        }
    }
}

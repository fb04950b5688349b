// cellvm-host - Transaction and query responses
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Responses mapping a terminal context to a wire-level result.
//!
//! A response is keyed by the caller's request id and carries either the
//! result value or the error code and message. Values are rendered in their
//! EDN form so that every node produces the same bytes.
//!
//! ```json
//! {"id":1,"value":"2","juice_used":40}
//! {"id":2,"error":{"code":":SEQUENCE","message":"expected 2, got 1"},"juice_used":0}
//! ```

use cellvm_core::{Context, ErrorCode, Exceptional, Outcome};
use cellvm_data::Value;
use serde::{Serialize, Serializer};

use crate::error::Result;

/// The outcome of a request, keyed by request id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub id: u64,
    #[serde(flatten)]
    pub body: ResponseBody,
    pub juice_used: i64,
}

/// Result value or error report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseBody {
    Value(#[serde(serialize_with = "edn")] Value),
    Error {
        #[serde(serialize_with = "edn")]
        code: Value,
        #[serde(serialize_with = "text")]
        message: Value,
    },
}

fn edn<S: Serializer>(value: &Value, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Strings as their contents, anything else as EDN.
fn text<S: Serializer>(value: &Value, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    match value.as_str() {
        Some(s) => serializer.serialize_str(s),
        None => serializer.collect_str(value),
    }
}

impl Response {
    /// Build a response from a terminal context.
    ///
    /// Control signals are not errors: their payload is reported as the
    /// value.
    pub fn from_context(id: u64, ctx: &Context) -> Self {
        let body = match ctx.outcome() {
            Outcome::Value(v) => ResponseBody::Value(v.clone()),
            Outcome::Exceptional(Exceptional::Error { code, message }) => ResponseBody::Error {
                code: code.clone(),
                message: message.clone(),
            },
            Outcome::Exceptional(e) => ResponseBody::Value(e.message().clone()),
        };
        Response {
            id,
            body,
            juice_used: ctx.juice_used(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.body, ResponseBody::Error { .. })
    }

    pub fn value(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Value(v) => Some(v),
            ResponseBody::Error { .. } => None,
        }
    }

    /// The runtime error code, for error responses with a known code.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match &self.body {
            ResponseBody::Error { code, .. } => ErrorCode::from_value(code),
            ResponseBody::Value(_) => None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_json() {
        let r = Response {
            id: 1,
            body: ResponseBody::Value(Value::from(2)),
            juice_used: 40,
        };
        assert_eq!(r.to_json().unwrap(), r#"{"id":1,"value":"2","juice_used":40}"#);
    }

    #[test]
    fn test_error_json() {
        let r = Response {
            id: 7,
            body: ResponseBody::Error {
                code: ErrorCode::Sequence.into(),
                message: Value::from("expected 2, got 1"),
            },
            juice_used: 0,
        };
        assert_eq!(
            r.to_json().unwrap(),
            r#"{"id":7,"error":{"code":":SEQUENCE","message":"expected 2, got 1"},"juice_used":0}"#
        );
        assert_eq!(r.error_code(), Some(ErrorCode::Sequence));
        assert!(r.is_error());
    }
}

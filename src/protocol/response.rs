//! Wire responses
//!
//! Every command produces exactly one response line.

use std::fmt;

use serde::Serialize;

/// A response as written back to the client, without the trailing newline.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// `OK`
    Ok,
    /// `OK <json>`
    Json(String),
    /// `NULL` - key absent or expired
    Null,
    /// `NOT FOUND` - DEL of an absent key
    NotFound,
    /// `ERROR <message>`
    Error(String),
}

impl Response {
    /// Serializes `value` into an `OK <json>` response.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Response::Json(body),
            Err(e) => Response::Error(format!("serialization failed: {}", e)),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok => f.write_str("OK"),
            Response::Json(body) => write!(f, "OK {}", body),
            Response::Null => f.write_str("NULL"),
            Response::NotFound => f.write_str("NOT FOUND"),
            // Keep the reply on one line whatever the message holds
            Response::Error(msg) => write!(f, "ERROR {}", msg.replace(['\r', '\n'], " ")),
        }
    }
}

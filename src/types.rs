use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const TEXT_REQUIRED: &str = "Task text is required and must be a string.";
pub const COMPLETED_NOT_BOOLEAN: &str = "`completed` field must be a boolean.";

/// A single to-do entry as stored by the server and seen on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub &'static str);

/// Task text that has been trimmed and is known to be non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskText(String);

impl TaskText {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError(TEXT_REQUIRED));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TaskText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `POST /tasks` after validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTask {
    pub text: TaskText,
}

impl NewTask {
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let raw = body
            .get("text")
            .and_then(Value::as_str)
            .ok_or(ValidationError(TEXT_REQUIRED))?;
        Ok(Self {
            text: TaskText::parse(raw)?,
        })
    }
}

/// Body of `PUT /tasks/:id` after validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletionUpdate {
    pub completed: bool,
}

impl CompletionUpdate {
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let completed = body
            .get("completed")
            .and_then(Value::as_bool)
            .ok_or(ValidationError(COMPLETED_NOT_BOOLEAN))?;
        Ok(Self { completed })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateTaskBody<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateTaskBody {
    pub completed: bool,
}

/// `{ "error": "..." }` payload returned with every 4xx.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

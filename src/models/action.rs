// src/models/action.rs
// DOCUMENTATION: Server action payloads and results
// PURPOSE: Typed input and tagged output of the action dispatcher

use crate::errors::AppError;
use actix_web::ResponseError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Structured input of a server action
#[derive(Debug, Clone, PartialEq)]
pub enum ActionInput {
    /// Fields of a submitted form
    Form(HashMap<String, String>),
    /// Positional arguments of a programmatic call
    Args(Vec<Value>),
}

impl ActionInput {
    pub fn field(&self, name: &str) -> Option<&str> {
        match self {
            ActionInput::Form(fields) => fields.get(name).map(String::as_str),
            ActionInput::Args(_) => None,
        }
    }

    pub fn arg(&self, index: usize) -> Option<&Value> {
        match self {
            ActionInput::Args(args) => args.get(index),
            ActionInput::Form(_) => None,
        }
    }
}

/// JSON body of a programmatic action call: {"args": [...]}
#[derive(Debug, Deserialize)]
pub struct ActionArgs {
    #[serde(default)]
    pub args: Vec<Value>,
}

/// How urgently the caller needs the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Normal,
    /// Run in the background; the caller polls for the result
    Low,
}

impl Priority {
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "low" => Priority::Low,
            _ => Priority::Normal,
        }
    }
}

/// Final result of one action invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionResult {
    Ok {
        value: Value,
    },
    Error {
        code: String,
        message: String,
        #[serde(skip)]
        http_status: u16,
    },
}

impl ActionResult {
    pub fn from_outcome(outcome: Result<Value, AppError>) -> Self {
        match outcome {
            Ok(value) => ActionResult::Ok { value },
            Err(e) => ActionResult::Error {
                code: e.code().to_string(),
                message: e.to_string(),
                http_status: e.status_code().as_u16(),
            },
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            ActionResult::Ok { .. } => 200,
            ActionResult::Error { http_status, .. } => *http_status,
        }
    }
}

/// State of a submission as reported to a polling client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending { submission: String },
    Completed { submission: String, result: ActionResult },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_priority_from_header() {
        assert_eq!(Priority::from_header(Some(" LOW ")), Priority::Low);
        assert_eq!(Priority::from_header(Some("high")), Priority::Normal);
        assert_eq!(Priority::from_header(None), Priority::Normal);
    }

    #[test]
    fn test_action_result_tagging() {
        let ok = serde_json::to_value(ActionResult::Ok { value: json!(2) }).unwrap();
        assert_eq!(ok, json!({"status": "ok", "value": 2}));

        let err = ActionResult::from_outcome(Err(AppError::ValidationError("email".into())));
        assert_eq!(err.http_status(), 400);
        let err = serde_json::to_value(err).unwrap();
        assert_eq!(err["status"], "error");
        assert_eq!(err["code"], "VALIDATION_ERROR");
        assert!(err.get("http_status").is_none());
    }

    #[test]
    fn test_input_accessors() {
        let form = ActionInput::Form(HashMap::from([("name".to_string(), "Ada".to_string())]));
        assert_eq!(form.field("name"), Some("Ada"));
        assert!(form.arg(0).is_none());

        let args = ActionInput::Args(vec![json!(4)]);
        assert_eq!(args.arg(0), Some(&json!(4)));
        assert!(args.field("name").is_none());
    }
}

// src/models/api.rs
// DOCUMENTATION: Response envelopes for the demo JSON endpoints
// PURPOSE: One explicit variant per method instead of free-form JSON

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope returned by /api/hello, tagged by the HTTP method that produced it
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", rename_all = "UPPERCASE")]
pub enum HelloResponse {
    Get {
        message: String,
        timestamp: DateTime<Utc>,
    },
    Post {
        message: String,
        #[serde(rename = "receivedData")]
        received_data: Value,
        timestamp: DateTime<Utc>,
    },
    Put {
        message: String,
        #[serde(rename = "updatedData")]
        updated_data: Value,
        timestamp: DateTime<Utc>,
    },
    Delete {
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl HelloResponse {
    pub fn greeting(name: &str) -> Self {
        HelloResponse::Get {
            message: format!("Hello, {}!", name),
            timestamp: Utc::now(),
        }
    }

    pub fn received(data: Value) -> Self {
        HelloResponse::Post {
            message: "Data received successfully".to_string(),
            received_data: data,
            timestamp: Utc::now(),
        }
    }

    pub fn updated(data: Value) -> Self {
        HelloResponse::Put {
            message: "Data updated successfully".to_string(),
            updated_data: data,
            timestamp: Utc::now(),
        }
    }

    pub fn deleted() -> Self {
        HelloResponse::Delete {
            message: "Deleted successfully".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Query string of GET /api/hello
#[derive(Debug, Deserialize)]
pub struct HelloQuery {
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_greeting_shape() {
        let value = serde_json::to_value(HelloResponse::greeting("Next.js")).unwrap();
        assert_eq!(value["message"], "Hello, Next.js!");
        assert_eq!(value["method"], "GET");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_received_uses_camel_case_key() {
        let value = serde_json::to_value(HelloResponse::received(json!({"a": 1}))).unwrap();
        assert_eq!(value["method"], "POST");
        assert_eq!(value["receivedData"]["a"], 1);
    }
}

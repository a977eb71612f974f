// src/services/demo_actions.rs
// DOCUMENTATION: Actions behind the /server-actions demo page
// PURPOSE: Form mutation, counter and search with simulated latency

use super::actions::ActionRegistry;
use crate::errors::AppError;
use crate::models::ActionInput;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use uuid::Uuid;
use validator::Validate;

/// Number of items the search action looks through
pub const SEARCH_ITEMS: usize = 1000;

/// Input of create_user
#[derive(Debug, Serialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,
}

impl NewUser {
    /// Read from form fields or from positional args [name, email]
    pub fn from_input(input: &ActionInput) -> Self {
        let field = |name: &str, index: usize| {
            input
                .field(name)
                .or_else(|| input.arg(index).and_then(Value::as_str))
                .unwrap_or_default()
                .trim()
                .to_string()
        };
        Self {
            name: field("name", 0),
            email: field("email", 1),
        }
    }
}

pub fn demo_actions(latency: Duration) -> Result<ActionRegistry, AppError> {
    let mut registry = ActionRegistry::new();

    registry.register("create_user", move |input| async move {
        let user = NewUser::from_input(&input);
        user.validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        tokio::time::sleep(latency).await;

        let id = Uuid::new_v4().simple().to_string()[..7].to_string();
        log::info!("Created user {} <{}> as {}", user.name, user.email, id);
        Ok::<_, AppError>(json!({
            "success": true,
            "message": format!("User {} ({}) created successfully!", user.name, user.email),
            "id": id,
        }))
    })?;

    registry.register("increment_counter", move |input| async move {
        let current = input
            .arg(0)
            .and_then(Value::as_i64)
            .or_else(|| input.field("count").and_then(|c| c.trim().parse().ok()))
            .ok_or_else(|| AppError::InvalidInput("increment_counter expects a number".to_string()))?;

        tokio::time::sleep(latency / 2).await;

        current
            .checked_add(1)
            .map(|next| json!(next))
            .ok_or_else(|| AppError::InvalidInput("counter overflow".to_string()))
    })?;

    registry.register("search", |input| async move {
        let query = input
            .arg(0)
            .and_then(Value::as_str)
            .or_else(|| input.field("query"))
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        Ok(json!(search_items(&query)))
    })?;

    log::debug!("Registered demo actions: {:?}", registry.names());
    Ok(registry)
}

/// Items among "Item 1" ..= "Item 1000" containing `query`
pub fn search_items(query: &str) -> Vec<String> {
    if query.is_empty() {
        return Vec::new();
    }
    (1..=SEARCH_ITEMS)
        .map(|i| format!("Item {}", i))
        .filter(|item| item.to_lowercase().contains(query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio_test::assert_err;

    fn form(fields: &[(&str, &str)]) -> ActionInput {
        ActionInput::Form(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[tokio::test]
    async fn test_create_user() {
        let registry = demo_actions(Duration::ZERO).unwrap();
        let value = registry
            .invoke("create_user", form(&[("name", "Ada"), ("email", "ada@example.com")]))
            .await
            .unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "User Ada (ada@example.com) created successfully!");
        assert_eq!(value["id"].as_str().map(str::len), Some(7));
    }

    #[tokio::test]
    async fn test_create_user_validation() {
        let registry = demo_actions(Duration::ZERO).unwrap();
        let blank_name = registry
            .invoke("create_user", form(&[("name", "  "), ("email", "ada@example.com")]))
            .await;
        assert!(matches!(blank_name, Err(AppError::ValidationError(_))));

        let bad_email = registry
            .invoke("create_user", form(&[("name", "Ada"), ("email", "not-an-email")]))
            .await;
        assert_err!(bad_email);
    }

    #[tokio::test]
    async fn test_increment_counter() {
        let registry = demo_actions(Duration::ZERO).unwrap();
        let next = registry
            .invoke("increment_counter", ActionInput::Args(vec![json!(41)]))
            .await
            .unwrap();
        assert_eq!(next, json!(42));

        let missing = registry.invoke("increment_counter", ActionInput::Args(vec![])).await;
        assert!(matches!(missing, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_search_items() {
        assert!(search_items("").is_empty());
        assert_eq!(search_items("1000"), vec!["Item 1000"]);
        // 99, 199, ..., 999 and 990..=998
        assert_eq!(search_items("99").len(), 19);
        assert_eq!(search_items("item").len(), SEARCH_ITEMS);
    }
}

// src/services/actions.rs
// DOCUMENTATION: Server action registry and dispatcher
// PURPOSE: Run named actions, at most once per submission token

use super::submissions::{Begin, SubmissionLedger};
use crate::errors::AppError;
use crate::models::{ActionInput, ActionResult};
use crate::routing::view::BoxFuture;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

pub type ActionHandler = Arc<dyn Fn(ActionInput) -> BoxFuture<Result<Value, AppError>> + Send + Sync>;

/// Named server actions, fixed once the server starts
#[derive(Clone, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, ActionHandler>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F, Fut>(&mut self, name: &str, handler: F) -> Result<(), AppError>
    where
        F: Fn(ActionInput) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, AppError>> + Send + 'static,
    {
        if self.actions.contains_key(name) {
            return Err(AppError::DuplicateKey(format!("action {}", name)));
        }
        let handler: ActionHandler = Arc::new(move |input: ActionInput| -> BoxFuture<Result<Value, AppError>> {
            Box::pin(handler(input))
        });
        self.actions.insert(name.to_string(), handler);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub async fn invoke(&self, name: &str, input: ActionInput) -> Result<Value, AppError> {
        let handler = self
            .actions
            .get(name)
            .ok_or_else(|| AppError::ActionNotFound(name.to_string()))?;
        handler(input).await
    }
}

/// Reply to a low-priority dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// The token had already completed
    Done(ActionResult),
    /// Running in the background; poll the token
    Accepted { submission: String },
}

/// Runs actions against the submission ledger
#[derive(Clone)]
pub struct ActionDispatcher {
    registry: Arc<ActionRegistry>,
    ledger: Arc<SubmissionLedger>,
}

impl ActionDispatcher {
    pub fn new(registry: Arc<ActionRegistry>, ledger: Arc<SubmissionLedger>) -> Self {
        Self { registry, ledger }
    }

    pub fn ledger(&self) -> &Arc<SubmissionLedger> {
        &self.ledger
    }

    /// Run `name` and wait for its result.
    /// With a token, a repeat while the first call runs is rejected and a
    /// repeat after it finished gets the stored result.
    pub async fn dispatch(
        &self,
        name: &str,
        input: ActionInput,
        submission: Option<String>,
    ) -> Result<ActionResult, AppError> {
        if !self.registry.contains(name) {
            return Err(AppError::ActionNotFound(name.to_string()));
        }

        let Some(token) = submission else {
            return Ok(self.run(name, input).await);
        };

        match self.ledger.begin(name, &token).await {
            Begin::Fresh => self.spawn_recorded(name, input, token).await,
            Begin::Pending => {
                log::warn!("Rejected repeated submission {} for action {}", token, name);
                Err(AppError::DuplicateSubmission(token))
            }
            Begin::Completed(result) => {
                log::info!("Replaying submission {} for action {}", token, name);
                Ok(result)
            }
        }
    }

    /// Start `name` in the background and return its token right away
    pub async fn dispatch_background(
        &self,
        name: &str,
        input: ActionInput,
        submission: Option<String>,
    ) -> Result<Dispatch, AppError> {
        if !self.registry.contains(name) {
            return Err(AppError::ActionNotFound(name.to_string()));
        }

        let token = submission.unwrap_or_else(|| Uuid::new_v4().to_string());
        match self.ledger.begin(name, &token).await {
            Begin::Fresh => {
                let dispatcher = self.clone();
                let name = name.to_string();
                let submission = token.clone();
                tokio::spawn(async move {
                    // the outcome lands in the ledger; the caller polls for it
                    let _ = dispatcher.spawn_recorded(&name, input, submission).await;
                });
                log::debug!("Accepted low-priority submission {}", token);
                Ok(Dispatch::Accepted { submission: token })
            }
            Begin::Pending => Err(AppError::DuplicateSubmission(token)),
            Begin::Completed(result) => Ok(Dispatch::Done(result)),
        }
    }

    /// Run a claimed token on its own task so a dropped request cannot leave it pending
    async fn spawn_recorded(
        &self,
        name: &str,
        input: ActionInput,
        token: String,
    ) -> Result<ActionResult, AppError> {
        let dispatcher = self.clone();
        let action = name.to_string();
        let submission = token.clone();
        let task = tokio::spawn(async move {
            let result = dispatcher.run(&action, input).await;
            dispatcher.ledger.complete(&action, &submission, result.clone()).await;
            result
        });

        match task.await {
            Ok(result) => Ok(result),
            Err(e) => {
                self.ledger.abandon(name, &token).await;
                Err(AppError::InternalError(format!("Action task failed: {}", e)))
            }
        }
    }

    async fn run(&self, name: &str, input: ActionInput) -> ActionResult {
        let result = ActionResult::from_outcome(self.registry.invoke(name, input).await);
        match &result {
            ActionResult::Ok { .. } => log::debug!("Action {} succeeded", name),
            ActionResult::Error { code, message, .. } => {
                log::warn!("Action {} failed [{}]: {}", name, code, message)
            }
        }
        result
    }
}

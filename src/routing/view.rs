// src/routing/view.rs
// DOCUMENTATION: Renderable output tree
// PURPOSE: What layouts, pages and fallbacks produce, before it is streamed

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

use crate::errors::AppError;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Async content that may suspend before producing a view
pub type ViewFuture = BoxFuture<Result<View, ContentError>>;

/// Builds the replacement view for a caught error
pub type ErrorFallback = Arc<dyn Fn(&ErrorInfo) -> View + Send + Sync>;

/// Builds a replacement view that needs no input
pub type Fallback = Arc<dyn Fn() -> View + Send + Sync>;

/// Failure of a content-producing step
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Failed(String),
}

impl From<AppError> for ContentError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(what) => ContentError::NotFound(what),
            other => ContentError::Failed(other.to_string()),
        }
    }
}

/// What an error boundary fallback gets to work with
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    pub message: String,
    /// Short id that ties the rendered error to its log line
    pub digest: String,
    /// Path the retry action re-requests
    pub retry_path: String,
}

pub enum View {
    /// Trusted markup, emitted as is
    Html(String),
    List(Vec<View>),
    /// Where a layout places the segment below it
    Children,
    /// Where a layout places a named parallel slot
    Slot(String),
    /// Async content awaited in place; the enclosing output waits for it
    Await(ViewFuture),
    /// Fallback now, content streamed once it resolves
    Suspense {
        fallback: Box<View>,
        content: ViewFuture,
    },
    ErrorBoundary {
        fallback: ErrorFallback,
        content: Box<View>,
    },
    NotFoundBoundary {
        fallback: Fallback,
        content: Box<View>,
    },
}

impl View {
    pub fn html(markup: impl Into<String>) -> Self {
        View::Html(markup.into())
    }

    pub fn empty() -> Self {
        View::Html(String::new())
    }

    pub fn list(views: impl IntoIterator<Item = View>) -> Self {
        View::List(views.into_iter().collect())
    }

    pub fn deferred<F>(content: F) -> Self
    where
        F: Future<Output = Result<View, ContentError>> + Send + 'static,
    {
        View::Await(Box::pin(content))
    }

    pub fn suspense<F>(fallback: View, content: F) -> Self
    where
        F: Future<Output = Result<View, ContentError>> + Send + 'static,
    {
        View::Suspense {
            fallback: Box::new(fallback),
            content: Box::pin(content),
        }
    }

    /// Replace the Children and Slot placeholders of this view.
    /// Placeholders inside async content are not reached; whatever is left
    /// unused stays in `holes`.
    pub fn fill(self, holes: &mut Holes) -> View {
        match self {
            View::Children => holes.children.take().unwrap_or_else(View::empty),
            View::Slot(name) => holes.slots.remove(&name).unwrap_or_else(View::empty),
            View::List(views) => View::List(views.into_iter().map(|v| v.fill(holes)).collect()),
            View::ErrorBoundary { fallback, content } => View::ErrorBoundary {
                fallback,
                content: Box::new(content.fill(holes)),
            },
            View::NotFoundBoundary { fallback, content } => View::NotFoundBoundary {
                fallback,
                content: Box::new(content.fill(holes)),
            },
            View::Suspense { fallback, content } => View::Suspense {
                fallback: Box::new(fallback.fill(holes)),
                content,
            },
            other => other,
        }
    }
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            View::Html(s) => f.debug_tuple("Html").field(s).finish(),
            View::List(v) => f.debug_tuple("List").field(v).finish(),
            View::Children => f.write_str("Children"),
            View::Slot(name) => f.debug_tuple("Slot").field(name).finish(),
            View::Await(_) => f.write_str("Await(..)"),
            View::Suspense { fallback, .. } => f.debug_struct("Suspense").field("fallback", fallback).finish(),
            View::ErrorBoundary { content, .. } => f.debug_struct("ErrorBoundary").field("content", content).finish(),
            View::NotFoundBoundary { content, .. } => {
                f.debug_struct("NotFoundBoundary").field("content", content).finish()
            }
        }
    }
}

/// Views waiting to be placed into a layout
#[derive(Default)]
pub struct Holes {
    pub children: Option<View>,
    pub slots: HashMap<String, View>,
}

impl Holes {
    pub fn is_empty(&self) -> bool {
        self.children.is_none() && self.slots.is_empty()
    }

    /// Names of whatever was not placed, for diagnostics
    pub fn leftovers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.slots.keys().map(|k| format!("@{}", k)).collect();
        if self.children.is_some() {
            names.insert(0, "children".to_string());
        }
        names
    }
}

/// Escape text for HTML content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_fill_places_children_and_slots() {
        let layout = View::list([
            View::html("<main>"),
            View::Children,
            View::html("</main>"),
            View::Slot("modal".to_string()),
        ]);
        let mut holes = Holes {
            children: Some(View::html("page")),
            slots: HashMap::from([("modal".to_string(), View::html("overlay"))]),
        };

        match layout.fill(&mut holes) {
            View::List(parts) => match (&parts[1], &parts[3]) {
                (View::Html(child), View::Html(slot)) => {
                    assert_eq!(child, "page");
                    assert_eq!(slot, "overlay");
                }
                other => panic!("unexpected parts {:?}", other),
            },
            other => panic!("unexpected view {:?}", other),
        }
        assert!(holes.is_empty());
    }

    #[test]
    fn test_fill_reports_unused_holes() {
        let mut holes = Holes {
            children: Some(View::html("page")),
            slots: HashMap::from([("modal".to_string(), View::empty())]),
        };
        let _ = View::html("no placeholders").fill(&mut holes);
        assert_eq!(holes.leftovers(), vec!["children", "@modal"]);
    }

    #[test]
    fn test_content_error_from_app_error() {
        assert_eq!(
            ContentError::from(AppError::NotFound("photo 9".into())),
            ContentError::NotFound("photo 9".into())
        );
        assert!(matches!(
            ContentError::from(AppError::InvalidInput("x".into())),
            ContentError::Failed(_)
        ));
    }
}

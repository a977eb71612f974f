// src/routing/context.rs
// DOCUMENTATION: Per-request data handed to every component
// PURPOSE: Params, query, headers, navigation kind and injected data sources

use crate::db::Store;
use crate::services::ImagePolicy;
use std::collections::HashMap;
use std::sync::Arc;

/// Request header that marks a client-side (soft) navigation
pub const NAVIGATION_HEADER: &str = "x-navigation";

/// Request header naming the page a soft navigation starts from
pub const NAVIGATION_FROM_HEADER: &str = "x-navigation-from";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Full page load or refresh
    Hard,
    /// Client-side transition; `from` is the page underneath, when known
    Soft { from: Option<String> },
}

impl Navigation {
    pub fn from_headers(kind: Option<&str>, from: Option<&str>) -> Self {
        match kind.map(|k| k.trim().eq_ignore_ascii_case("soft")) {
            Some(true) => Navigation::Soft {
                from: from
                    .map(str::trim)
                    .filter(|f| f.starts_with('/'))
                    .map(str::to_string),
            },
            _ => Navigation::Hard,
        }
    }

    pub fn is_soft(&self) -> bool {
        matches!(self, Navigation::Soft { .. })
    }
}

/// Document metadata merged along the matched chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Metadata {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
        }
    }

    /// Fields set on `deeper` override ours
    pub fn merge(&mut self, deeper: Metadata) {
        if deeper.title.is_some() {
            self.title = deeper.title;
        }
        if deeper.description.is_some() {
            self.description = deeper.description;
        }
    }
}

/// The request as the router sees it
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    /// Lower-cased header names
    pub headers: HashMap<String, String>,
    pub navigation: Navigation,
}

impl PageRequest {
    pub fn get(path: &str) -> Self {
        Self {
            path: path.to_string(),
            query: HashMap::new(),
            headers: HashMap::new(),
            navigation: Navigation::Hard,
        }
    }
}

#[derive(Clone)]
pub struct RenderContext {
    pub path: String,
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub navigation: Navigation,
    pub metadata: Metadata,
    pub store: Arc<Store>,
    pub images: Arc<ImagePolicy>,
}

impl RenderContext {
    pub fn new(request: &PageRequest, store: Arc<Store>, images: Arc<ImagePolicy>) -> Self {
        Self {
            path: request.path.clone(),
            params: HashMap::new(),
            query: request.query.clone(),
            headers: request.headers.clone(),
            navigation: request.navigation.clone(),
            metadata: Metadata::default(),
            store,
            images,
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Same request, different captured parameters (used for slots)
    pub fn with_params(&self, params: HashMap<String, String>) -> Self {
        Self {
            params,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_from_headers() {
        assert_eq!(Navigation::from_headers(None, Some("/photos")), Navigation::Hard);
        assert_eq!(
            Navigation::from_headers(Some("Soft"), Some("/photos")),
            Navigation::Soft {
                from: Some("/photos".to_string())
            }
        );
        assert_eq!(
            Navigation::from_headers(Some("soft"), Some("photos")),
            Navigation::Soft { from: None }
        );
    }

    #[test]
    fn test_metadata_merge() {
        let mut metadata = Metadata {
            title: Some("Site".to_string()),
            description: Some("Root".to_string()),
        };
        metadata.merge(Metadata::titled("Product A"));
        assert_eq!(metadata.title.as_deref(), Some("Product A"));
        assert_eq!(metadata.description.as_deref(), Some("Root"));
    }
}

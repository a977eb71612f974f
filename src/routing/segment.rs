// src/routing/segment.rs
// DOCUMENTATION: Directory-style segment names
// PURPOSE: Parse "[id]", "(group)", "@slot" and "(.)name" into typed kinds

use thiserror::Error;

/// Failures while building a route table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Invalid segment '{0}'")]
    InvalidSegment(String),

    #[error("Route '{pattern}' already has a {component}")]
    DuplicateComponent {
        pattern: String,
        component: &'static str,
    },

    #[error("Route '{pattern}' mixes dynamic names '{existing}' and '{new}' at one level")]
    ConflictingDynamic {
        pattern: String,
        existing: String,
        new: String,
    },
}

/// How far up an intercepting segment reaches for its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptLevel {
    /// "(.)" - sibling of the slot owner
    Same,
    /// "(..)" - one level above the slot owner
    Parent,
    /// "(...)" - from the root
    Root,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    Root,
    /// Matches one equal path component
    Literal(String),
    /// Captures one path component under a parameter name
    Dynamic(String),
    /// Organizational only; consumes no path component
    Group(String),
    /// Parallel subtree composited by the owning layout
    Slot(String),
    /// Alternate view of a route, only used on soft navigation
    Intercept { level: InterceptLevel, name: String },
}

impl SegmentKind {
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let invalid = || RouteError::InvalidSegment(raw.to_string());

        for (marker, level) in [
            ("(...)", InterceptLevel::Root),
            ("(..)", InterceptLevel::Parent),
            ("(.)", InterceptLevel::Same),
        ] {
            if let Some(name) = raw.strip_prefix(marker) {
                return if is_plain(name) {
                    Ok(SegmentKind::Intercept {
                        level,
                        name: name.to_string(),
                    })
                } else {
                    Err(invalid())
                };
            }
        }

        if let Some(inner) = raw.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
            return if is_plain(inner) {
                Ok(SegmentKind::Group(inner.to_string()))
            } else {
                Err(invalid())
            };
        }

        if let Some(inner) = raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            // catch-all "[...slug]" is not supported
            return if is_plain(inner) && !inner.starts_with('.') {
                Ok(SegmentKind::Dynamic(inner.to_string()))
            } else {
                Err(invalid())
            };
        }

        if let Some(name) = raw.strip_prefix('@') {
            return if is_plain(name) {
                Ok(SegmentKind::Slot(name.to_string()))
            } else {
                Err(invalid())
            };
        }

        if is_plain(raw) {
            Ok(SegmentKind::Literal(raw.to_string()))
        } else {
            Err(invalid())
        }
    }

    /// Human-readable form, used in logs
    pub fn label(&self) -> String {
        match self {
            SegmentKind::Root => "/".to_string(),
            SegmentKind::Literal(s) => s.clone(),
            SegmentKind::Dynamic(s) => format!("[{}]", s),
            SegmentKind::Group(s) => format!("({})", s),
            SegmentKind::Slot(s) => format!("@{}", s),
            SegmentKind::Intercept { level, name } => {
                let marker = match level {
                    InterceptLevel::Same => "(.)",
                    InterceptLevel::Parent => "(..)",
                    InterceptLevel::Root => "(...)",
                };
                format!("{}{}", marker, name)
            }
        }
    }
}

fn is_plain(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| matches!(c, '/' | '[' | ']' | '(' | ')' | '@' | '?' | '#') || c.is_whitespace())
}

/// Split a request path into its non-empty components
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|c| !c.is_empty()).collect()
}

// src/middleware/matcher.rs
// DOCUMENTATION: Path patterns for middleware scoping and rules
// PURPOSE: Decide which request paths the pipeline runs for

use crate::errors::AppError;

/// Exact path ("/favicon.ico") or prefix wildcard ("/api/*")
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(String),
    /// Stored without the trailing "/*"; empty for "/*"
    Prefix(String),
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, AppError> {
        let pattern = pattern.trim();
        if !pattern.starts_with('/') {
            return Err(AppError::InvalidInput(format!(
                "Path pattern must start with '/': {}",
                pattern
            )));
        }

        match pattern.strip_suffix("/*") {
            Some(prefix) => Ok(PathPattern::Prefix(prefix.to_string())),
            None if pattern.contains('*') => Err(AppError::InvalidInput(format!(
                "Wildcard is only allowed as a trailing '/*': {}",
                pattern
            ))),
            None => Ok(PathPattern::Exact(pattern.to_string())),
        }
    }

    /// "/api/*" matches "/api" and everything below it
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(exact) => path == exact,
            PathPattern::Prefix(prefix) => {
                prefix.is_empty()
                    || path == prefix
                    || path
                        .strip_prefix(prefix.as_str())
                        .map_or(false, |rest| rest.starts_with('/'))
            }
        }
    }

    /// Part of `path` below the prefix, for prefix patterns that match
    pub fn remainder<'a>(&self, path: &'a str) -> Option<&'a str> {
        match self {
            PathPattern::Prefix(prefix) if self.matches(path) => path.strip_prefix(prefix.as_str()),
            _ => None,
        }
    }
}

/// Include / exclude lists; exclusion wins
#[derive(Debug, Clone)]
pub struct PathMatcher {
    include: Vec<PathPattern>,
    exclude: Vec<PathPattern>,
}

impl PathMatcher {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, AppError> {
        let parse = |patterns: &[String]| {
            patterns
                .iter()
                .map(|p| PathPattern::parse(p))
                .collect::<Result<Vec<_>, _>>()
        };
        Ok(Self {
            include: parse(include)?,
            exclude: parse(exclude)?,
        })
    }

    pub fn applies(&self, path: &str) -> bool {
        self.include.iter().any(|p| p.matches(path)) && !self.exclude.iter().any(|p| p.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env::default_middleware_exclude;
    use tokio_test::assert_err;

    #[test]
    fn test_parse() {
        assert_eq!(PathPattern::parse("/api/*").unwrap(), PathPattern::Prefix("/api".to_string()));
        assert_eq!(PathPattern::parse("/*").unwrap(), PathPattern::Prefix(String::new()));
        assert_eq!(
            PathPattern::parse("/favicon.ico").unwrap(),
            PathPattern::Exact("/favicon.ico".to_string())
        );
        assert_err!(PathPattern::parse("api/*"));
        assert_err!(PathPattern::parse("/a*b"));
    }

    #[test]
    fn test_prefix_matches_on_segment_boundary() {
        let api = PathPattern::parse("/api/*").unwrap();
        assert!(api.matches("/api"));
        assert!(api.matches("/api/hello"));
        assert!(!api.matches("/api-demo"));
        assert_eq!(api.remainder("/api/hello"), Some("/hello"));
        assert_eq!(api.remainder("/apix"), None);
    }

    #[test]
    fn test_default_matcher() {
        let matcher = PathMatcher::new(&["/*".to_string()], &default_middleware_exclude()).unwrap();
        assert!(matcher.applies("/"));
        assert!(matcher.applies("/middleware-demo"));
        assert!(matcher.applies("/api-demo"));
        assert!(!matcher.applies("/api/hello"));
        assert!(!matcher.applies("/_static/app.css"));
        assert!(!matcher.applies("/_actions/create_user"));
        assert!(!matcher.applies("/health"));
        assert!(!matcher.applies("/favicon.ico"));
    }
}

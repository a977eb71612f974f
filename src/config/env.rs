// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 3000)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Path patterns the middleware pipeline applies to
    pub middleware_include: Vec<String>,

    /// Path patterns the middleware pipeline never touches
    pub middleware_exclude: Vec<String>,

    /// Redirect rules as (from, to) pairs
    pub redirects: Vec<(String, String)>,

    /// Rewrite rules as (from, to) pairs
    pub rewrites: Vec<(String, String)>,

    /// Allowed remote image origins, "https://images.unsplash.com" style
    pub image_remote_patterns: Vec<String>,

    /// Simulated latency of the demo server actions, in milliseconds
    pub action_latency_ms: u64,

    /// How long a submission token is remembered, in seconds
    pub submission_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        dotenv().ok();

        Config {
            server_address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            middleware_include: env::var("MIDDLEWARE_INCLUDE")
                .map(|v| split_list(&v))
                .unwrap_or_else(|_| vec!["/*".to_string()]),

            middleware_exclude: env::var("MIDDLEWARE_EXCLUDE")
                .map(|v| split_list(&v))
                .unwrap_or_else(|_| default_middleware_exclude()),

            redirects: env::var("REDIRECTS")
                .map(|v| split_pairs(&v))
                .unwrap_or_default(),

            rewrites: env::var("REWRITES")
                .map(|v| split_pairs(&v))
                .unwrap_or_default(),

            image_remote_patterns: env::var("IMAGE_REMOTE_PATTERNS")
                .map(|v| split_list(&v))
                .unwrap_or_else(|_| vec!["https://images.unsplash.com".to_string()]),

            action_latency_ms: env::var("ACTION_LATENCY_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),

            submission_ttl_secs: env::var("SUBMISSION_TTL_SECS")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .unwrap_or(600),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.server_address.is_empty() {
            return Err("SERVER_ADDRESS is required".to_string());
        }

        for pattern in self.middleware_include.iter().chain(&self.middleware_exclude) {
            if !pattern.starts_with('/') {
                return Err(format!("Middleware pattern must start with '/': {}", pattern));
            }
        }

        for (from, to) in self.redirects.iter().chain(&self.rewrites) {
            if !from.starts_with('/') || !to.starts_with('/') {
                return Err(format!("Rule paths must start with '/': {} -> {}", from, to));
            }
        }

        if self.image_remote_patterns.is_empty() {
            log::warn!("IMAGE_REMOTE_PATTERNS is empty - pages with remote images will fail");
        }

        Ok(())
    }
}

#[cfg(test)]
impl Config {
    /// Fast, fully-defaulted configuration for tests
    pub fn sample() -> Self {
        Config {
            server_address: "127.0.0.1".to_string(),
            server_port: 3000,
            environment: "test".to_string(),
            log_level: "debug".to_string(),
            middleware_include: vec!["/*".to_string()],
            middleware_exclude: default_middleware_exclude(),
            redirects: vec![],
            rewrites: vec![],
            image_remote_patterns: vec!["https://images.unsplash.com".to_string()],
            action_latency_ms: 10,
            submission_ttl_secs: 60,
        }
    }
}

pub fn default_middleware_exclude() -> Vec<String> {
    ["/api/*", "/_static/*", "/_actions/*", "/health", "/favicon.ico"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Split "a, b,c" into trimmed, non-empty entries
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split "/old=/new,/a=/b" into (from, to) pairs, skipping malformed entries
fn split_pairs(raw: &str) -> Vec<(String, String)> {
    split_list(raw)
        .into_iter()
        .filter_map(|entry| {
            let (from, to) = entry.split_once('=')?;
            Some((from.trim().to_string(), to.trim().to_string()))
        })
        .collect()
}

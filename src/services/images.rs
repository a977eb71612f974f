// src/services/images.rs
// DOCUMENTATION: Remote image allow-list
// PURPOSE: Refuse to render images from hosts that were not configured

use crate::errors::AppError;
use crate::routing::view::{escape, ContentError};
use actix_web::http::Uri;

/// One configured origin, e.g. "https://images.unsplash.com" or "https://*.example.com/media"
#[derive(Debug, Clone, PartialEq, Eq)]
struct RemotePattern {
    scheme: String,
    /// Lower-cased; a leading "*." matches any subdomain
    host: String,
    path_prefix: String,
}

impl RemotePattern {
    fn parse(pattern: &str) -> Result<Self, AppError> {
        let uri: Uri = pattern
            .parse()
            .map_err(|e| AppError::InvalidInput(format!("Image pattern {}: {}", pattern, e)))?;

        let (Some(scheme), Some(host)) = (uri.scheme_str(), uri.host()) else {
            return Err(AppError::InvalidInput(format!(
                "Image pattern needs scheme and host: {}",
                pattern
            )));
        };

        Ok(Self {
            scheme: scheme.to_ascii_lowercase(),
            host: host.to_ascii_lowercase(),
            path_prefix: uri.path().trim_end_matches('/').to_string(),
        })
    }

    fn matches(&self, uri: &Uri) -> bool {
        let (Some(scheme), Some(host)) = (uri.scheme_str(), uri.host()) else {
            return false;
        };
        let host = host.to_ascii_lowercase();

        let host_ok = match self.host.strip_prefix("*.") {
            Some(domain) => host.len() > domain.len() && host.ends_with(&format!(".{}", domain)),
            None => host == self.host,
        };

        scheme.eq_ignore_ascii_case(&self.scheme) && host_ok && uri.path().starts_with(&self.path_prefix)
    }
}

/// Checks every image URL a page renders
#[derive(Debug, Clone, Default)]
pub struct ImagePolicy {
    patterns: Vec<RemotePattern>,
}

impl ImagePolicy {
    pub fn new(patterns: &[String]) -> Result<Self, AppError> {
        let patterns = patterns
            .iter()
            .map(|p| RemotePattern::parse(p))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("Image allow-list has {} remote patterns", patterns.len());
        Ok(Self { patterns })
    }

    /// Site-relative paths are always allowed
    pub fn allows(&self, url: &str) -> bool {
        if url.starts_with('/') && !url.starts_with("//") {
            return true;
        }
        match url.parse::<Uri>() {
            Ok(uri) => self.patterns.iter().any(|p| p.matches(&uri)),
            Err(_) => false,
        }
    }

    /// Attribute-safe `src` value, or a render failure for disallowed hosts
    pub fn src(&self, url: &str) -> Result<String, ContentError> {
        if self.allows(url) {
            Ok(escape(url))
        } else {
            log::warn!("Refusing image from unconfigured host: {}", url);
            Err(ContentError::Failed(format!(
                "Image host is not configured for remote images: {}",
                url
            )))
        }
    }
}

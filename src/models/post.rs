// src/models/post.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Blog post, keyed by its URL slug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub slug: String,
    pub title: String,
    /// Body as plain paragraphs separated by blank lines
    pub content: String,
    pub author: String,
    pub date: NaiveDate,
}

impl Post {
    /// Short description used for page metadata
    pub fn summary(&self, max_chars: usize) -> String {
        let text = self.content.split_whitespace().collect::<Vec<_>>().join(" ");
        text.chars().take(max_chars).collect()
    }

    /// Non-empty paragraphs of the body
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post {
            slug: "hello".to_string(),
            title: "Hello".to_string(),
            content: "First   paragraph\nwraps.\n\n  Second one.\n\n".to_string(),
            author: "Someone".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    #[test]
    fn test_summary_collapses_whitespace() {
        assert_eq!(post().summary(100), "First paragraph wraps. Second one.");
        assert_eq!(post().summary(5), "First");
    }

    #[test]
    fn test_paragraphs() {
        let post = post();
        let paragraphs: Vec<_> = post.paragraphs().collect();
        assert_eq!(paragraphs, vec!["First   paragraph\nwraps.", "Second one."]);
    }
}

// src/models/photo.rs

use serde::{Deserialize, Serialize};

/// Gallery photo shown on the photo pages and in the modal slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub title: String,
    /// Remote image URL (must pass the image allow-list at render time)
    pub url: String,
    pub description: String,
}

impl Photo {
    pub fn new(id: &str, title: &str, url: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            description: description.to_string(),
        }
    }

    /// Image URL sized for the given width
    pub fn sized_url(&self, width: u32, height: u32) -> String {
        format!("{}?w={}&h={}&fit=crop", self.url, width, height)
    }
}

// src/models/product.rs

use serde::{Deserialize, Serialize};

/// Catalogue product for the dynamic route demo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price in whole currency units
    pub price: u32,
}

impl Product {
    pub fn new(id: &str, name: &str, description: &str, price: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price,
        }
    }
}

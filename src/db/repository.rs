// src/db/repository.rs
// DOCUMENTATION: Read-only record access for the render path
// PURPOSE: Keep pages independent of where records live

use crate::errors::AppError;
use crate::models::{Photo, Post, Product};
use std::collections::HashMap;
use std::sync::Arc;

/// Record with a unique string key
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Photo {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Product {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Post {
    fn key(&self) -> &str {
        &self.slug
    }
}

/// Capability set pages need from a data source
pub trait Repository<T>: Send + Sync {
    /// Fetch one record, or AppError::NotFound
    fn get(&self, id: &str) -> Result<T, AppError>;

    /// All records in their canonical order
    fn list(&self) -> Vec<T>;
}

/// Immutable in-memory table, filled once at startup
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    kind: &'static str,
    records: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T: Keyed + Clone> InMemoryRepository<T> {
    /// Build the table, rejecting duplicate keys
    pub fn new(kind: &'static str, records: Vec<T>) -> Result<Self, AppError> {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if index.insert(record.key().to_string(), position).is_some() {
                return Err(AppError::DuplicateKey(format!("{} {}", kind, record.key())));
            }
        }

        log::debug!("Loaded {} {} records", records.len(), kind);
        Ok(Self {
            kind,
            records,
            index,
        })
    }
}

impl<T: Keyed + Clone + Send + Sync> Repository<T> for InMemoryRepository<T> {
    fn get(&self, id: &str) -> Result<T, AppError> {
        self.index
            .get(id)
            .map(|&position| self.records[position].clone())
            .ok_or_else(|| AppError::NotFound(format!("{} {}", self.kind, id)))
    }

    fn list(&self) -> Vec<T> {
        self.records.clone()
    }
}

/// Every repository the pages read from
/// DOCUMENTATION: Injected into each render; swap an implementation here to
/// change persistence without touching pages
#[derive(Clone)]
pub struct Store {
    pub photos: Arc<dyn Repository<Photo>>,
    pub products: Arc<dyn Repository<Product>>,
    pub posts: Arc<dyn Repository<Post>>,
}

impl Store {
    /// Store backed by the built-in demo tables
    pub fn seeded() -> Result<Self, AppError> {
        Ok(Self {
            photos: Arc::new(InMemoryRepository::new("photo", super::fixtures::photos())?),
            products: Arc::new(InMemoryRepository::new("product", super::fixtures::products())?),
            posts: Arc::new(InMemoryRepository::new("post", super::fixtures::posts())?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_get_and_list() {
        let repo = InMemoryRepository::new(
            "product",
            vec![
                Product::new("1", "A", "first", 10),
                Product::new("2", "B", "second", 20),
            ],
        )
        .unwrap();

        let product = assert_ok!(repo.get("2"));
        assert_eq!(product.name, "B");
        assert_eq!(repo.list().len(), 2);
        assert_eq!(repo.list()[0].id, "1");
    }

    #[test]
    fn test_missing_key_is_not_found() {
        let repo = InMemoryRepository::new("product", vec![Product::new("1", "A", "a", 1)]).unwrap();
        match repo.get("99") {
            Err(AppError::NotFound(what)) => assert_eq!(what, "product 99"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = InMemoryRepository::new(
            "product",
            vec![Product::new("1", "A", "a", 1), Product::new("1", "B", "b", 2)],
        );
        assert_err!(result);
    }

    #[test]
    fn test_seeded_store() {
        let store = Store::seeded().unwrap();
        assert_eq!(store.photos.list().len(), 6);
        assert_eq!(store.products.list().len(), 3);
        assert_eq!(store.posts.list().len(), 3);
        assert!(store.posts.get("app-router-deep-dive").is_ok());
    }
}

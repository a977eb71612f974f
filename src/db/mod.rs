// src/db/mod.rs
// DOCUMENTATION: Data access module organization
// PURPOSE: Re-export repository components

pub mod fixtures;
pub mod repository;

pub use repository::*;

// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod action;
pub mod api;
pub mod photo;
pub mod post;
pub mod product;

pub use action::*;
pub use api::*;
pub use photo::*;
pub use post::*;
pub use product::*;

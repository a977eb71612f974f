// src/middleware/mod.rs
// DOCUMENTATION: Middleware module organization
// PURPOSE: Re-export the request pipeline

pub mod matcher;
pub mod pipeline;

pub use matcher::{PathMatcher, PathPattern};
pub use pipeline::{run_pipeline, Pipeline};

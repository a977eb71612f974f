// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod actions;
pub mod demo_actions;
pub mod images;
pub mod submissions;

pub use actions::*;
pub use demo_actions::demo_actions;
pub use images::ImagePolicy;
pub use submissions::*;

// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod actions;
pub mod health;
pub mod hello;
pub mod pages;

pub use actions::config as actions_config;
pub use health::config as health_config;
pub use hello::config as hello_config;
pub use pages::render_page;

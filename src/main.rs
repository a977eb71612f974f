// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, build the route table and start the HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod middleware;
mod models;
mod pages;
mod routing;
mod services;

use actix_web::{middleware::{from_fn, Logger}, web, App, HttpServer};
use anyhow::Context;
use config::Config;
use dotenv::dotenv;
use middleware::{run_pipeline, Pipeline};
use pages::{app_routes, DemoTiming, Site};
use services::{demo_actions, start_cleanup_task, ActionDispatcher, ImagePolicy, SubmissionLedger};
use std::sync::Arc;
use std::time::Duration;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,actix_web=info"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    log::info!("Starting segment-router...");
    log::info!("Environment: {}", config.environment);
    log::info!("Server Address: {}:{}", config.server_address, config.server_port);

    // 4. Build the site: data, image policy and route table
    let store = Arc::new(db::Store::seeded().context("seeding the demo store")?);
    let images = Arc::new(ImagePolicy::new(&config.image_remote_patterns)?);
    let tree = app_routes(DemoTiming::default()).context("building the route table")?;
    log::info!("Registered {} pages", tree.page_count());
    let site = web::Data::new(Site::new(tree, store, images));

    // 5. Middleware pipeline
    let pipeline = web::Data::new(Pipeline::from_config(&config)?);

    // 6. Server actions and the submission ledger
    let ledger = Arc::new(SubmissionLedger::new(config.submission_ttl_secs));
    start_cleanup_task(ledger.clone(), 60);
    log::info!(
        "Initialized submission ledger (TTL: {}s)",
        config.submission_ttl_secs
    );

    let registry = demo_actions(Duration::from_millis(config.action_latency_ms))?;
    log::info!("Registered actions: {}", registry.names().join(", "));
    let dispatcher = web::Data::new(ActionDispatcher::new(Arc::new(registry), ledger.clone()));
    let ledger = web::Data::new(ledger);

    // 7. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(site.clone())
            .app_data(pipeline.clone())
            .app_data(ledger.clone())
            .app_data(dispatcher.clone())
            .app_data(config.clone())
            // Middleware
            .wrap(from_fn(run_pipeline))
            .wrap(Logger::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::hello_config)
            .configure(handlers::actions_config)
            .default_service(web::to(handlers::render_page))
    })
    .bind(&server_addr)?
    .run()
    .await?;

    Ok(())
}

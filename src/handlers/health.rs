// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Simple endpoint to verify service status

use crate::pages::Site;
use crate::services::SubmissionLedger;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use std::sync::Arc;

pub async fn health_check(
    site: web::Data<Site>,
    ledger: web::Data<Arc<SubmissionLedger>>,
) -> impl Responder {
    let submissions = ledger.stats().await;
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "segment-router",
        "version": env!("CARGO_PKG_VERSION"),
        "routes": site.tree.page_count(),
        "submissions": submissions
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

// src/handlers/hello.rs
// DOCUMENTATION: HTTP handlers for the /api/hello demo endpoint
// PURPOSE: One JSON handler per method

use crate::errors::AppError;
use crate::models::{HelloQuery, HelloResponse};
use actix_web::{web, HttpResponse, Responder};
use serde_json::Value;

fn parse_json(body: &[u8]) -> Result<Value, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::InvalidInput(format!("Invalid JSON body: {}", e)))
}

/// GET /api/hello?name=X
pub async fn get_hello(query: web::Query<HelloQuery>) -> impl Responder {
    let name = query
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("World");
    HttpResponse::Ok().json(HelloResponse::greeting(name))
}

/// POST /api/hello
/// Echo the JSON body back
pub async fn post_hello(body: web::Bytes) -> Result<impl Responder, AppError> {
    let data = parse_json(&body)?;
    Ok(HttpResponse::Ok().json(HelloResponse::received(data)))
}

/// PUT /api/hello
pub async fn put_hello(body: web::Bytes) -> Result<impl Responder, AppError> {
    let data = parse_json(&body)?;
    Ok(HttpResponse::Ok().json(HelloResponse::updated(data)))
}

/// DELETE /api/hello
pub async fn delete_hello() -> impl Responder {
    HttpResponse::Ok().json(HelloResponse::deleted())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/hello")
            .route(web::get().to(get_hello))
            .route(web::post().to(post_hello))
            .route(web::put().to(put_hello))
            .route(web::delete().to(delete_hello)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_get_greets_by_name() {
        let app = test::init_service(App::new().configure(config)).await;
        let req = test::TestRequest::get().uri("/api/hello?name=Next.js").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["message"], "Hello, Next.js!");
        assert_eq!(body["method"], "GET");
        assert!(body["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn test_get_defaults_to_world() {
        let app = test::init_service(App::new().configure(config)).await;
        let req = test::TestRequest::get().uri("/api/hello").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Hello, World!");
    }

    #[actix_web::test]
    async fn test_post_echoes_body() {
        let app = test::init_service(App::new().configure(config)).await;
        let req = test::TestRequest::post()
            .uri("/api/hello")
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"{"name":"Test","value":123}"#)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["method"], "POST");
        assert_eq!(body["message"], "Data received successfully");
        assert_eq!(body["receivedData"]["value"], 123);
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let app = test::init_service(App::new().configure(config)).await;
        for req in [
            test::TestRequest::post().uri("/api/hello").set_payload("{not json"),
            test::TestRequest::put().uri("/api/hello").set_payload(""),
        ] {
            let res = test::call_service(&app, req.to_request()).await;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(res).await;
            assert_eq!(body["error"]["code"], "INVALID_INPUT");
        }
    }

    #[actix_web::test]
    async fn test_put_and_delete() {
        let app = test::init_service(App::new().configure(config)).await;

        let req = test::TestRequest::put()
            .uri("/api/hello")
            .set_payload(r#"{"id":1}"#)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["method"], "PUT");
        assert_eq!(body["updatedData"]["id"], 1);

        let req = test::TestRequest::delete().uri("/api/hello").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["method"], "DELETE");
        assert_eq!(body["message"], "Deleted successfully");
    }
}

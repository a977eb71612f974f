// src/handlers/actions.rs
// DOCUMENTATION: HTTP handlers for server actions
// PURPOSE: Decode form or JSON input, dispatch, report submissions

use crate::errors::AppError;
use crate::models::{ActionArgs, ActionInput, ActionResult, Priority, SubmissionStatus};
use crate::services::{ActionDispatcher, Dispatch};
use actix_web::{http::StatusCode, web, HttpMessage, HttpRequest, HttpResponse};
use std::collections::HashMap;

/// Request header carrying the submission token
pub const SUBMISSION_HEADER: &str = "x-action-submission";

/// Request header selecting the dispatch priority ("low")
pub const PRIORITY_HEADER: &str = "x-action-priority";

/// Hidden form field carrying the submission token
pub const SUBMISSION_FIELD: &str = "_submission";

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Action input plus the submission token, from a form post or a JSON call
fn parse_input(req: &HttpRequest, body: &[u8]) -> Result<(ActionInput, Option<String>), AppError> {
    let mut submission = header(req, SUBMISSION_HEADER).map(str::to_string);

    let input = match req.content_type() {
        "application/x-www-form-urlencoded" => {
            let text = std::str::from_utf8(body)
                .map_err(|e| AppError::InvalidInput(format!("Form body is not UTF-8: {}", e)))?;
            let mut fields = web::Query::<HashMap<String, String>>::from_query(text)
                .map_err(|e| AppError::InvalidInput(format!("Invalid form body: {}", e)))?
                .into_inner();
            if let Some(token) = fields.remove(SUBMISSION_FIELD).filter(|t| !t.trim().is_empty()) {
                submission.get_or_insert(token);
            }
            ActionInput::Form(fields)
        }
        "application/json" | "" if body.iter().all(u8::is_ascii_whitespace) => ActionInput::Args(Vec::new()),
        "application/json" | "" => {
            let call: ActionArgs = serde_json::from_slice(body)
                .map_err(|e| AppError::InvalidInput(format!("Invalid action arguments: {}", e)))?;
            ActionInput::Args(call.args)
        }
        other => {
            return Err(AppError::InvalidInput(format!(
                "Unsupported action content type: {}",
                other
            )))
        }
    };

    Ok((input, submission))
}

fn respond(result: ActionResult) -> HttpResponse {
    let status = StatusCode::from_u16(result.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(result)
}

/// POST /_actions/{name}
/// Run a server action; low priority calls answer 202 with the token to poll
pub async fn invoke_action(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
    dispatcher: web::Data<ActionDispatcher>,
) -> Result<HttpResponse, AppError> {
    let name = path.into_inner();
    let (input, submission) = parse_input(&req, &body)?;

    match Priority::from_header(header(&req, PRIORITY_HEADER)) {
        Priority::Low => match dispatcher.dispatch_background(&name, input, submission).await? {
            Dispatch::Accepted { submission } => {
                Ok(HttpResponse::Accepted().json(SubmissionStatus::Pending { submission }))
            }
            Dispatch::Done(result) => Ok(respond(result)),
        },
        Priority::Normal => Ok(respond(dispatcher.dispatch(&name, input, submission).await?)),
    }
}

/// GET /_actions/{name}/submissions/{token}
pub async fn submission_status(
    path: web::Path<(String, String)>,
    dispatcher: web::Data<ActionDispatcher>,
) -> Result<HttpResponse, AppError> {
    let (name, token) = path.into_inner();
    dispatcher
        .ledger()
        .status(&name, &token)
        .await
        .map(|status| HttpResponse::Ok().json(status))
        .ok_or_else(|| AppError::NotFound(format!("submission {} of {}", token, name)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/_actions")
            .route("/{name}/submissions/{token}", web::get().to(submission_status))
            .route("/{name}", web::post().to(invoke_action)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;
    use crate::handlers::pages::render_page;
    use crate::pages::{app_routes, DemoTiming, Site};
    use crate::services::{demo_actions, ImagePolicy, SubmissionLedger};
    use actix_web::{test, App};
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;

    fn dispatcher() -> web::Data<ActionDispatcher> {
        let registry = demo_actions(Duration::ZERO).unwrap();
        web::Data::new(ActionDispatcher::new(
            Arc::new(registry),
            Arc::new(SubmissionLedger::new(60)),
        ))
    }

    fn form_post(name: &str, body: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri(&format!("/_actions/{}", name))
            .insert_header(("content-type", "application/x-www-form-urlencoded"))
            .set_payload(body.to_string())
    }

    #[actix_web::test]
    async fn test_form_submission_replays_on_repeat() {
        let app = test::init_service(App::new().app_data(dispatcher()).configure(config)).await;
        let body = "name=Ada+Lovelace&email=ada%40example.com&_submission=form-1";

        let first: Value = test::call_and_read_body_json(&app, form_post("create_user", body).to_request()).await;
        assert_eq!(first["status"], "ok");
        assert_eq!(
            first["value"]["message"],
            "User Ada Lovelace (ada@example.com) created successfully!"
        );

        let second: Value = test::call_and_read_body_json(&app, form_post("create_user", body).to_request()).await;
        assert_eq!(second["value"]["id"], first["value"]["id"]);
    }

    #[actix_web::test]
    async fn test_json_args_call() {
        let app = test::init_service(App::new().app_data(dispatcher()).configure(config)).await;
        let req = test::TestRequest::post()
            .uri("/_actions/increment_counter")
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"{"args":[4]}"#)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, serde_json::json!({"status": "ok", "value": 5}));
    }

    #[actix_web::test]
    async fn test_validation_error_result() {
        let app = test::init_service(App::new().app_data(dispatcher()).configure(config)).await;
        let res = test::call_service(&app, form_post("create_user", "name=&email=x").to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[actix_web::test]
    async fn test_unknown_action_is_not_found() {
        let app = test::init_service(App::new().app_data(dispatcher()).configure(config)).await;
        let res = test::call_service(&app, form_post("drop_tables", "").to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_low_priority_is_polled() {
        let app = test::init_service(App::new().app_data(dispatcher()).configure(config)).await;
        let req = test::TestRequest::post()
            .uri("/_actions/search")
            .insert_header(("content-type", "application/json"))
            .insert_header((PRIORITY_HEADER, "low"))
            .insert_header((SUBMISSION_HEADER, "search-1"))
            .set_payload(r#"{"args":["1000"]}"#)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::ACCEPTED);
        let accepted: Value = test::read_body_json(res).await;
        assert_eq!(accepted["submission"], "search-1");

        tokio::time::sleep(Duration::from_millis(50)).await;

        let req = test::TestRequest::get()
            .uri("/_actions/search/submissions/search-1")
            .to_request();
        let status: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(status["status"], "completed");
        assert_eq!(status["result"]["value"], serde_json::json!(["Item 1000"]));

        let req = test::TestRequest::get().uri("/_actions/search/submissions/unknown").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        // the token belongs to search only
        let req = test::TestRequest::get()
            .uri("/_actions/create_user/submissions/search-1")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    /// Token the page script would write into the hidden field for one submit
    fn submit_body(fields: &str, token: &str) -> String {
        format!("{}&{}={}", fields, SUBMISSION_FIELD, token)
    }

    #[actix_web::test]
    async fn test_separate_submits_from_rendered_page_each_run() {
        let images = ImagePolicy::new(&["https://images.unsplash.com".to_string()]).unwrap();
        let site = web::Data::new(Site::new(
            app_routes(DemoTiming::default().scaled(100)).unwrap(),
            Arc::new(Store::seeded().unwrap()),
            Arc::new(images),
        ));
        let app = test::init_service(
            App::new()
                .app_data(site)
                .app_data(dispatcher())
                .configure(config)
                .default_service(web::to(render_page)),
        )
        .await;

        let page = test::call_and_read_body(&app, test::TestRequest::get().uri("/server-actions").to_request()).await;
        let page = String::from_utf8(page.to_vec()).unwrap();
        // no token is baked into the page; each submit makes its own
        assert_eq!(
            page.matches(&format!("name=\"{}\" value=\"\"", SUBMISSION_FIELD)).count(),
            3
        );
        assert!(page.contains("crypto.randomUUID()"));
        assert!(page.contains("/submissions/"));
        assert!(page.contains("data-action data-priority=\"normal\" data-feedback=\"count\""));

        let ada: Value = test::call_and_read_body_json(
            &app,
            form_post(
                "create_user",
                &submit_body("name=Ada&email=ada%40example.com", "click-1"),
            )
            .to_request(),
        )
        .await;
        let bob: Value = test::call_and_read_body_json(
            &app,
            form_post(
                "create_user",
                &submit_body("name=Bob&email=bob%40example.com", "click-2"),
            )
            .to_request(),
        )
        .await;
        assert_eq!(ada["value"]["message"], "User Ada (ada@example.com) created successfully!");
        assert_eq!(bob["value"]["message"], "User Bob (bob@example.com) created successfully!");

        // the counter feeds its last result into the next submit
        let mut count = 0;
        for click in ["inc-1", "inc-2", "inc-3"] {
            let body: Value = test::call_and_read_body_json(
                &app,
                form_post("increment_counter", &submit_body(&format!("count={}", count), click)).to_request(),
            )
            .await;
            count = body["value"].as_i64().unwrap();
        }
        assert_eq!(count, 3);

        // an empty token field is treated as no token at all
        let first: Value = test::call_and_read_body_json(
            &app,
            form_post("increment_counter", &submit_body("count=7", "")).to_request(),
        )
        .await;
        let second: Value = test::call_and_read_body_json(
            &app,
            form_post("increment_counter", &submit_body("count=8", "")).to_request(),
        )
        .await;
        assert_eq!(first["value"], 8);
        assert_eq!(second["value"], 9);
    }
}

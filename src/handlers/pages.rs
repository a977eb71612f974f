// src/handlers/pages.rs
// DOCUMENTATION: HTML page handler
// PURPOSE: Route every remaining GET through the router and stream the result

use crate::pages::Site;
use crate::routing::{
    compose, Chunk, Navigation, Outcome, PageRequest, NAVIGATION_FROM_HEADER, NAVIGATION_HEADER, SWAP_RUNTIME,
};
use actix_web::{
    body::{BodySize, MessageBody},
    http::{header, Method, StatusCode},
    web::{self, Bytes},
    HttpRequest, HttpResponse,
};
use std::collections::HashMap;
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Response body: the shell, then each late chunk as it arrives, then the document tail
pub struct StreamedPage {
    head: Option<Bytes>,
    tail: Option<Bytes>,
    pending: Option<mpsc::UnboundedReceiver<Chunk>>,
    runtime_sent: bool,
}

impl StreamedPage {
    pub fn new(shell: String, pending: mpsc::UnboundedReceiver<Chunk>) -> Self {
        // late chunks go before </body> so the document stays well formed
        let (head, tail) = match shell.rfind("</body>") {
            Some(at) => {
                let tail = shell[at..].to_string();
                let mut head = shell;
                head.truncate(at);
                (head, Some(Bytes::from(tail)))
            }
            None => (shell, None),
        };

        Self {
            head: Some(Bytes::from(head)),
            tail,
            pending: Some(pending),
            runtime_sent: false,
        }
    }
}

impl MessageBody for StreamedPage {
    type Error = Infallible;

    fn size(&self) -> BodySize {
        BodySize::Stream
    }

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Result<Bytes, Self::Error>>> {
        let this = self.get_mut();

        if let Some(head) = this.head.take() {
            return Poll::Ready(Some(Ok(head)));
        }

        if let Some(pending) = this.pending.as_mut() {
            match pending.poll_recv(cx) {
                Poll::Ready(Some(chunk)) => {
                    let mut html = String::new();
                    if !this.runtime_sent {
                        html.push_str(SWAP_RUNTIME);
                        this.runtime_sent = true;
                    }
                    html.push_str(&chunk.to_html());
                    return Poll::Ready(Some(Ok(Bytes::from(html))));
                }
                Poll::Ready(None) => this.pending = None,
                Poll::Pending => return Poll::Pending,
            }
        }

        Poll::Ready(this.tail.take().map(Ok))
    }
}

fn page_request(req: &HttpRequest) -> PageRequest {
    let query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
        .map(|q| q.into_inner())
        .unwrap_or_default();

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .filter_map(|(name, value)| Some((name.as_str().to_ascii_lowercase(), value.to_str().ok()?.to_string())))
        .collect();

    let navigation = Navigation::from_headers(
        headers.get(NAVIGATION_HEADER).map(String::as_str),
        headers.get(NAVIGATION_FROM_HEADER).map(String::as_str),
    );

    PageRequest {
        path: req.path().to_string(),
        query,
        headers,
        navigation,
    }
}

/// Default service: every GET/HEAD that no other handler claimed
pub async fn render_page(req: HttpRequest, site: web::Data<Site>) -> HttpResponse {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return HttpResponse::MethodNotAllowed()
            .insert_header((header::ALLOW, "GET, HEAD"))
            .finish();
    }

    let request = page_request(&req);
    let retry_path = match req.query_string() {
        "" => request.path.clone(),
        query => format!("{}?{}", request.path, query),
    };

    let composition = compose(&site.tree, &request, site.store.clone(), site.images.clone());
    let rendered = site.renderer.render(composition.view, &retry_path).await;

    let status = match (composition.matched, rendered.outcome) {
        (false, _) | (_, Outcome::NotFound) => StatusCode::NOT_FOUND,
        (_, Outcome::Errored) => StatusCode::INTERNAL_SERVER_ERROR,
        (true, Outcome::Ready) => StatusCode::OK,
    };
    log::debug!(
        "Rendered {} ({}, {})",
        request.path,
        status,
        if request.navigation.is_soft() { "soft" } else { "hard" }
    );

    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(StreamedPage::new(rendered.shell, rendered.pending))
}

// src/routing/render.rs
// DOCUMENTATION: Streaming renderer
// PURPOSE: Emit the shell first, then suspended subtrees as they resolve

use super::view::{escape, BoxFuture, ContentError, ErrorFallback, ErrorInfo, Fallback, View, ViewFuture};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Client-side helper that moves streamed content into its placeholder
pub const SWAP_RUNTIME: &str = concat!(
    "<script>function __swap(id){",
    "var t=document.querySelector('template[data-target=\"'+id+'\"]'),e=document.getElementById(id);",
    "if(!t||!e)return;e.replaceChildren(t.content.cloneNode(true));",
    "e.removeAttribute('data-pending');t.remove();}</script>"
);

/// Late output, sent after the shell in completion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// Resolved content for suspense placeholder `s{id}`
    Resolve { id: usize, html: String },
    /// Replacement for the whole boundary region `b{id}`
    Replace { id: usize, html: String },
}

impl Chunk {
    pub fn target(&self) -> String {
        match self {
            Chunk::Resolve { id, .. } => format!("s{}", id),
            Chunk::Replace { id, .. } => format!("b{}", id),
        }
    }

    pub fn to_html(&self) -> String {
        let html = match self {
            Chunk::Resolve { html, .. } | Chunk::Replace { html, .. } => html,
        };
        let target = self.target();
        format!(
            "<template data-target=\"{}\">{}</template><script>__swap(\"{}\")</script>",
            target, html, target
        )
    }
}

/// How the shell ended, used to pick the response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ready,
    /// A not-found fallback replaced part of the shell
    NotFound,
    /// An error reached the top without a user error boundary
    Errored,
}

pub struct Rendered {
    pub outcome: Outcome,
    pub shell: String,
    /// Closes once every suspended subtree has been sent.
    /// Dropping it abandons whatever is still in flight.
    pub pending: mpsc::UnboundedReceiver<Chunk>,
}

#[derive(Clone)]
pub struct Renderer {
    not_found: Fallback,
    error: ErrorFallback,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(
            Arc::new(|| {
                View::html(
                    "<section data-not-found><h1>404</h1><p>This page could not be found.</p></section>",
                )
            }),
            Arc::new(|info: &ErrorInfo| {
                View::html(format!(
                    "<section data-error><h1>Something went wrong</h1><p>{}</p>\
                     <p><code>{}</code></p><a href=\"{}\" data-retry>Try again</a></section>",
                    escape(&info.message),
                    info.digest,
                    escape(&info.retry_path)
                ))
            }),
        )
    }
}

impl Renderer {
    /// `not_found` and `error` render when nothing closer catches a failure
    pub fn new(not_found: Fallback, error: ErrorFallback) -> Self {
        Self { not_found, error }
    }

    pub async fn render(&self, view: View, retry_path: &str) -> Rendered {
        let (late, pending) = mpsc::unbounded_channel();
        let scope = Scope {
            ids: Arc::new(AtomicUsize::new(0)),
            late,
            boundaries: Vec::new(),
            not_found_hit: Arc::new(AtomicBool::new(false)),
            retry_path: Arc::from(retry_path),
            defaults: self.clone(),
        };

        let (shell, outcome) = match render_inline(view, scope.clone()).await {
            Ok(shell) if scope.not_found_hit.load(Ordering::SeqCst) => (shell, Outcome::NotFound),
            Ok(shell) => (shell, Outcome::Ready),
            Err(ContentError::NotFound(what)) => {
                log::info!("Not found while rendering {}: {}", retry_path, what);
                let html = settle(render_inline((self.not_found)(), scope.clone()).await);
                (document(&html), Outcome::NotFound)
            }
            Err(ContentError::Failed(message)) => {
                let html = settle(render_error(&self.error, message, &scope).await);
                (document(&html), Outcome::Errored)
            }
        };

        Rendered {
            outcome,
            shell,
            pending,
        }
    }
}

#[derive(Clone)]
enum Boundary {
    Error { id: usize, fallback: ErrorFallback },
    NotFound { id: usize, fallback: Fallback },
}

impl Boundary {
    fn catches(&self, err: &ContentError) -> bool {
        matches!(
            (self, err),
            (Boundary::Error { .. }, ContentError::Failed(_)) | (Boundary::NotFound { .. }, ContentError::NotFound(_))
        )
    }
}

#[derive(Clone)]
struct Scope {
    ids: Arc<AtomicUsize>,
    late: mpsc::UnboundedSender<Chunk>,
    /// Enclosing boundaries, innermost last
    boundaries: Vec<Boundary>,
    not_found_hit: Arc<AtomicBool>,
    retry_path: Arc<str>,
    defaults: Renderer,
}

impl Scope {
    fn next_id(&self) -> usize {
        self.ids.fetch_add(1, Ordering::SeqCst)
    }

    fn enter(&self, boundary: Boundary) -> Scope {
        let mut inner = self.clone();
        inner.boundaries.push(boundary);
        inner
    }

    /// Turn a failure of suspended content into the chunk that reports it
    async fn catch_late(&self, suspense_id: usize, err: ContentError) -> Chunk {
        let Some(position) = self.boundaries.iter().rposition(|b| b.catches(&err)) else {
            // no boundary of that kind: the default view takes the placeholder
            let html = match err {
                ContentError::NotFound(_) => render_inline((self.defaults.not_found)(), self.clone()).await,
                ContentError::Failed(message) => render_error(&self.defaults.error, message, self).await,
            };
            return Chunk::Resolve {
                id: suspense_id,
                html: settle(html),
            };
        };

        let mut outer = self.clone();
        outer.boundaries.truncate(position);
        match (&self.boundaries[position], err) {
            (Boundary::Error { id, fallback }, ContentError::Failed(message)) => Chunk::Replace {
                id: *id,
                html: settle(render_error(fallback, message, &outer).await),
            },
            (Boundary::NotFound { id, fallback }, _) => Chunk::Replace {
                id: *id,
                html: settle(render_inline(fallback(), outer).await),
            },
            (Boundary::Error { id, .. }, err) => Chunk::Replace {
                id: *id,
                html: escape(&err.to_string()),
            },
        }
    }
}

/// Render everything that is not suspended, spawning suspended content
fn render_inline(view: View, scope: Scope) -> BoxFuture<Result<String, ContentError>> {
    Box::pin(async move {
        match view {
            View::Html(markup) => Ok(markup),
            View::List(views) => {
                let mut out = String::new();
                for view in views {
                    out.push_str(&render_inline(view, scope.clone()).await?);
                }
                Ok(out)
            }
            View::Children | View::Slot(_) => Ok(String::new()),
            View::Await(content) => {
                let view = content.await?;
                render_inline(view, scope).await
            }
            View::Suspense { fallback, content } => {
                let id = scope.next_id();
                let fallback = render_inline(*fallback, scope.clone()).await?;
                spawn_pending(id, content, scope);
                Ok(format!("<div id=\"s{}\" data-pending>{}</div>", id, fallback))
            }
            View::ErrorBoundary { fallback, content } => {
                let id = scope.next_id();
                let inner = scope.enter(Boundary::Error {
                    id,
                    fallback: fallback.clone(),
                });
                let body = match render_inline(*content, inner).await {
                    Ok(html) => html,
                    Err(ContentError::Failed(message)) => render_error(&fallback, message, &scope).await?,
                    Err(not_found) => return Err(not_found),
                };
                Ok(region(id, &body))
            }
            View::NotFoundBoundary { fallback, content } => {
                let id = scope.next_id();
                let inner = scope.enter(Boundary::NotFound {
                    id,
                    fallback: fallback.clone(),
                });
                let body = match render_inline(*content, inner).await {
                    Ok(html) => html,
                    Err(ContentError::NotFound(what)) => {
                        log::info!("Not found at {}: {}", scope.retry_path, what);
                        scope.not_found_hit.store(true, Ordering::SeqCst);
                        render_inline(fallback(), scope.clone()).await?
                    }
                    Err(failed) => return Err(failed),
                };
                Ok(region(id, &body))
            }
        }
    })
}

fn spawn_pending(id: usize, content: ViewFuture, mut scope: Scope) {
    let outer = scope.late.clone();
    // the status line is already decided by the shell; late not-founds only swap markup
    scope.not_found_hit = Arc::new(AtomicBool::new(false));
    tokio::spawn(async move {
        // suspended content nested in this one is held back until our own chunk is out
        let (nested_tx, mut nested_rx) = mpsc::unbounded_channel();
        let mut nested_scope = scope.clone();
        nested_scope.late = nested_tx;

        let work = async move {
            let view = content.await?;
            render_inline(view, nested_scope).await
        };
        let result = tokio::select! {
            result = work => result,
            _ = outer.closed() => {
                log::debug!("Abandoned suspended content s{}", id);
                return;
            }
        };

        let chunk = match result {
            Ok(html) => Chunk::Resolve { id, html },
            Err(err) => scope.catch_late(id, err).await,
        };
        if outer.send(chunk).is_err() {
            return;
        }

        loop {
            tokio::select! {
                next = nested_rx.recv() => match next {
                    Some(chunk) => {
                        if outer.send(chunk).is_err() {
                            return;
                        }
                    }
                    None => break,
                },
                _ = outer.closed() => return,
            }
        }
    });
}

async fn render_error(
    fallback: &ErrorFallback,
    message: String,
    scope: &Scope,
) -> Result<String, ContentError> {
    let info = ErrorInfo {
        message,
        digest: Uuid::new_v4().simple().to_string()[..8].to_string(),
        retry_path: scope.retry_path.to_string(),
    };
    log::error!(
        "Render error [{}] at {}: {}",
        info.digest,
        info.retry_path,
        info.message
    );
    render_inline(fallback(&info), scope.clone()).await
}

/// A fallback that fails itself degrades to its escaped error text
fn settle(result: Result<String, ContentError>) -> String {
    result.unwrap_or_else(|err| {
        log::error!("Fallback failed to render: {}", err);
        format!("<p data-error>{}</p>", escape(&err.to_string()))
    })
}

fn region(id: usize, body: &str) -> String {
    format!("<div id=\"b{}\" data-boundary>{}</div>", id, body)
}

fn document(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head><body>{}</body></html>",
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    fn delayed(ms: u64, html: &'static str) -> impl std::future::Future<Output = Result<View, ContentError>> {
        async move {
            sleep(Duration::from_millis(ms)).await;
            Ok(View::html(html))
        }
    }

    async fn drain(rendered: &mut Rendered) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        while let Some(chunk) = rendered.pending.recv().await {
            chunks.push(chunk);
        }
        chunks
    }

    fn boundary(label: &'static str) -> ErrorFallback {
        Arc::new(move |info: &ErrorInfo| View::html(format!("{}: {}", label, info.message)))
    }

    #[tokio::test]
    async fn test_shell_first_then_completion_order() {
        let view = View::list([
            View::html("<h1>static</h1>"),
            View::suspense(View::html("[slow]"), delayed(300, "slow")),
            View::suspense(View::html("[fast]"), delayed(50, "fast")),
            View::suspense(View::html("[medium]"), delayed(150, "medium")),
        ]);

        let mut rendered = Renderer::default().render(view, "/streaming").await;
        assert_eq!(rendered.outcome, Outcome::Ready);
        assert!(rendered.shell.starts_with("<h1>static</h1>"));
        for fallback in ["[slow]", "[fast]", "[medium]"] {
            assert!(rendered.shell.contains(fallback));
        }
        assert!(!rendered.shell.contains(">fast<"));
        assert!(rendered.pending.try_recv().is_err());

        let chunks = drain(&mut rendered).await;
        assert_eq!(
            chunks,
            vec![
                Chunk::Resolve { id: 1, html: "fast".to_string() },
                Chunk::Resolve { id: 2, html: "medium".to_string() },
                Chunk::Resolve { id: 0, html: "slow".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn test_inline_error_isolated_to_boundary() {
        let view = View::list([
            View::ErrorBoundary {
                fallback: boundary("caught"),
                content: Box::new(View::deferred(async {
                    Err(ContentError::Failed("boom".to_string()))
                })),
            },
            View::html("<p>sibling</p>"),
        ]);

        let rendered = Renderer::default().render(view, "/error-demo").await;
        assert_eq!(rendered.outcome, Outcome::Ready);
        assert!(rendered.shell.contains("caught: boom"));
        assert!(rendered.shell.contains("<p>sibling</p>"));
        assert!(rendered.shell.starts_with("<div id=\"b0\" data-boundary>"));
    }

    #[tokio::test]
    async fn test_uncaught_error_uses_default_with_retry() {
        let view = View::deferred(async { Err(ContentError::Failed("kaput".to_string())) });

        let rendered = Renderer::default().render(view, "/broken").await;
        assert_eq!(rendered.outcome, Outcome::Errored);
        assert!(rendered.shell.contains("kaput"));
        assert!(rendered.shell.contains("href=\"/broken\" data-retry"));
        assert!(rendered.shell.starts_with("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn test_not_found_caught_by_nearest_boundary() {
        let view = View::list([
            View::html("<nav>layout</nav>"),
            View::NotFoundBoundary {
                fallback: Arc::new(|| View::html("no such product")),
                content: Box::new(View::deferred(async {
                    Err(ContentError::NotFound("product 99".to_string()))
                })),
            },
        ]);

        let rendered = Renderer::default().render(view, "/products/99").await;
        assert_eq!(rendered.outcome, Outcome::NotFound);
        assert!(rendered.shell.contains("<nav>layout</nav>"));
        assert!(rendered.shell.contains("no such product"));
    }

    #[tokio::test]
    async fn test_late_not_found_leaves_outcome_ready() {
        let missing = View::NotFoundBoundary {
            fallback: Arc::new(|| View::html("gone")),
            content: Box::new(View::deferred(async {
                Err(ContentError::NotFound("post".to_string()))
            })),
        };
        let view = View::list([
            View::suspense(View::html("[late]"), async move { Ok(missing) }),
            // keeps the shell busy until the suspended content has settled
            View::deferred(delayed(100, "<p>tail</p>")),
        ]);

        let mut rendered = Renderer::default().render(view, "/late-missing").await;
        assert_eq!(rendered.outcome, Outcome::Ready);
        assert!(rendered.shell.contains("<p>tail</p>"));

        let chunks = drain(&mut rendered).await;
        assert_eq!(
            chunks,
            vec![Chunk::Resolve {
                id: 0,
                html: "<div id=\"b1\" data-boundary>gone</div>".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_error_boundary_ignores_not_found() {
        let view = View::ErrorBoundary {
            fallback: boundary("caught"),
            content: Box::new(View::deferred(async {
                Err(ContentError::NotFound("post".to_string()))
            })),
        };

        let rendered = Renderer::default().render(view, "/blog/missing").await;
        assert_eq!(rendered.outcome, Outcome::NotFound);
        assert!(rendered.shell.contains("data-not-found"));
        assert!(!rendered.shell.contains("caught"));
    }

    #[tokio::test]
    async fn test_late_failure_replaces_boundary_region() {
        let view = View::ErrorBoundary {
            fallback: boundary("late"),
            content: Box::new(View::list([
                View::suspense(View::html("[a]"), async {
                    sleep(Duration::from_millis(20)).await;
                    Err(ContentError::Failed("slow failure".to_string()))
                }),
                View::suspense(View::html("[b]"), delayed(5, "fine")),
            ])),
        };

        let mut rendered = Renderer::default().render(view, "/late").await;
        assert_eq!(rendered.outcome, Outcome::Ready);

        let chunks = drain(&mut rendered).await;
        assert_eq!(chunks[0], Chunk::Resolve { id: 2, html: "fine".to_string() });
        assert_eq!(
            chunks[1],
            Chunk::Replace { id: 0, html: "late: slow failure".to_string() }
        );
    }

    #[tokio::test]
    async fn test_nested_suspense_follows_parent() {
        let view = View::suspense(View::html("[outer]"), async {
            sleep(Duration::from_millis(50)).await;
            Ok(View::list([
                View::html("outer"),
                View::suspense(View::html("[inner]"), async { Ok(View::html("inner")) }),
            ]))
        });

        let mut rendered = Renderer::default().render(view, "/nested").await;
        let chunks = drain(&mut rendered).await;
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].target(), "s0");
        assert_eq!(chunks[1], Chunk::Resolve { id: 1, html: "inner".to_string() });
        assert!(chunks[0].to_html().contains("<div id=\"s1\" data-pending>[inner]</div>"));
    }

    #[tokio::test]
    async fn test_dropping_receiver_abandons_pending_work() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        let view = View::suspense(View::html("[wait]"), async move {
            sleep(Duration::from_millis(100)).await;
            flag.store(true, Ordering::SeqCst);
            Ok(View::html("done"))
        });

        let rendered = Renderer::default().render(view, "/cancel").await;
        drop(rendered.pending);

        sleep(Duration::from_millis(250)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[test]
    fn test_chunk_serialization() {
        let chunk = Chunk::Replace { id: 3, html: "<p>x</p>".to_string() };
        assert_eq!(
            chunk.to_html(),
            "<template data-target=\"b3\"><p>x</p></template><script>__swap(\"b3\")</script>"
        );
    }
}

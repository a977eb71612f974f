// src/routing/compose.rs
// DOCUMENTATION: Nested layout composition
// PURPOSE: Build one View from the matched chain, its fallbacks and its slots

use super::context::{Metadata, Navigation, PageRequest, RenderContext};
use super::resolver::{resolve, MatchMode, RouteMatch, Step};
use super::segment::split_path;
use super::tree::{RouteTree, SegmentNode};
use super::view::{ErrorInfo, Holes, View};
use crate::db::Store;
use crate::services::ImagePolicy;
use std::collections::HashMap;
use std::sync::Arc;

/// Result of composing one request
pub struct Composition {
    pub view: View,
    /// False when no route matched and a not-found view was composed instead
    pub matched: bool,
}

pub fn compose(
    tree: &RouteTree,
    request: &PageRequest,
    store: Arc<Store>,
    images: Arc<ImagePolicy>,
) -> Composition {
    let target = split_path(&request.path);
    let slot_mode = if request.navigation.is_soft() {
        MatchMode::Intercepting
    } else {
        MatchMode::Primary
    };

    // A soft navigation that a slot intercepts keeps the origin page underneath
    let from = match &request.navigation {
        Navigation::Soft { from: Some(from) } => Some(from.as_str()),
        _ => None,
    };
    let origin = from.map(split_path);
    let (primary, primary_path): (&[&str], &str) = match (&origin, from) {
        (Some(origin), Some(from)) if intercepts(tree, origin, &target) => {
            log::debug!("Intercepting {} over {}", request.path, from);
            (origin.as_slice(), from)
        }
        _ => (target.as_slice(), request.path.as_str()),
    };

    // the primary chain sees the page it renders; slots keep the requested path
    let mut base = RenderContext::new(request, store, images);
    base.path = primary_path.to_string();
    let composer = Composer {
        target: &target,
        target_path: &request.path,
        slot_mode,
    };

    match resolve(&tree.root, primary, 0, MatchMode::Primary) {
        Ok(matched) => {
            let mut ctx = base.with_params(matched.params.clone());
            ctx.metadata = collect_metadata(&matched, &ctx);
            let page = composer.page_view(&matched, &ctx);
            Composition {
                view: composer.chain_view(&matched.chain, page, &ctx),
                matched: true,
            }
        }
        Err(miss) => {
            let mut ctx = base;
            ctx.metadata = Metadata::titled("Page not found");

            let owner = miss.chain.iter().rposition(|s| s.node.not_found.is_some());
            let (chain, leaf) = match owner {
                Some(i) => {
                    let fallback = miss.chain[i].node.not_found.as_ref().map(|f| f(&ctx));
                    (&miss.chain[..=i], fallback.unwrap_or_else(View::empty))
                }
                None => (&miss.chain[..miss.chain.len().min(1)], (tree.default_not_found)(&ctx)),
            };
            log::info!("No route for {}", request.path);
            Composition {
                view: composer.chain_view(chain, leaf, &ctx),
                matched: false,
            }
        }
    }
}

/// Does any slot along the origin's chain intercept the target?
fn intercepts(tree: &RouteTree, origin: &[&str], target: &[&str]) -> bool {
    let Ok(matched) = resolve(&tree.root, origin, 0, MatchMode::Primary) else {
        return false;
    };
    matched.chain.iter().any(|step| {
        step.node.slots.iter().any(|slot| {
            resolve(slot, target, step.consumed, MatchMode::Intercepting)
                .map(|m| m.intercepted())
                .unwrap_or(false)
        })
    })
}

fn collect_metadata(matched: &RouteMatch<'_>, ctx: &RenderContext) -> Metadata {
    let mut metadata = Metadata::default();
    for step in &matched.chain {
        if let Some(produce) = &step.node.metadata {
            metadata.merge(produce(ctx));
        }
    }
    metadata
}

struct Composer<'p> {
    target: &'p [&'p str],
    target_path: &'p str,
    slot_mode: MatchMode,
}

impl<'p> Composer<'p> {
    fn page_view(&self, matched: &RouteMatch<'_>, ctx: &RenderContext) -> View {
        match &matched.leaf().page {
            Some(page) => View::Await(page(ctx.clone())),
            None => View::empty(),
        }
    }

    /// Wrap `leaf` in every segment of `chain`, innermost first
    fn chain_view(&self, chain: &[Step<'_>], leaf: View, ctx: &RenderContext) -> View {
        chain
            .iter()
            .rev()
            .fold(leaf, |inner, step| self.wrap_segment(step, inner, ctx))
    }

    /// Layout(ErrorBoundary(Suspense(loading, NotFoundBoundary(inner))))
    fn wrap_segment(&self, step: &Step<'_>, inner: View, ctx: &RenderContext) -> View {
        let node = step.node;
        let mut view = inner;

        if let Some(not_found) = &node.not_found {
            let not_found = not_found.clone();
            let fallback_ctx = ctx.clone();
            view = View::NotFoundBoundary {
                fallback: Arc::new(move || not_found(&fallback_ctx)),
                content: Box::new(view),
            };
        }

        if let Some(loading) = &node.loading {
            let content = view;
            view = View::suspense(loading(ctx), async move { Ok(content) });
        }

        if let Some(error) = &node.error {
            let error = error.clone();
            let fallback_ctx = ctx.clone();
            view = View::ErrorBoundary {
                fallback: Arc::new(move |info: &ErrorInfo| error(&fallback_ctx, info)),
                content: Box::new(view),
            };
        }

        match &node.layout {
            Some(layout) => {
                let mut holes = Holes {
                    children: Some(view),
                    slots: self.slot_views(step, ctx),
                };
                let shell = layout(ctx.clone());
                let label = node.kind.label();
                View::deferred(async move {
                    let filled = shell.await?.fill(&mut holes);
                    if !holes.is_empty() {
                        log::warn!("Layout {} did not place {:?}", label, holes.leftovers());
                    }
                    Ok(filled)
                })
            }
            None => {
                if !node.slots.is_empty() {
                    log::warn!("Segment {} has slots but no layout", node.kind.label());
                }
                view
            }
        }
    }

    fn slot_views(&self, step: &Step<'_>, ctx: &RenderContext) -> HashMap<String, View> {
        step.node
            .slots
            .iter()
            .map(|slot| {
                let name = slot.slot_name().unwrap_or_default().to_string();
                (name, self.slot_view(slot, step.consumed, ctx))
            })
            .collect()
    }

    fn slot_view(&self, slot: &SegmentNode, start: usize, ctx: &RenderContext) -> View {
        let mut slot_ctx = ctx.clone();
        slot_ctx.path = self.target_path.to_string();

        match resolve(slot, self.target, start, self.slot_mode) {
            Ok(matched) => {
                let slot_ctx = slot_ctx.with_params(matched.params.clone());
                let page = self.page_view(&matched, &slot_ctx);
                self.chain_view(&matched.chain, page, &slot_ctx)
            }
            Err(_) => match &slot.default {
                Some(default) => default(&slot_ctx),
                None => View::empty(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{ContentError, Outcome, Renderer};

    async fn shows_path(ctx: RenderContext) -> Result<View, ContentError> {
        Ok(View::list([
            View::html(format!("<main data-path=\"{}\">", ctx.path)),
            View::Children,
            View::Slot("modal".to_string()),
            View::html("</main>"),
        ]))
    }

    async fn gallery(ctx: RenderContext) -> Result<View, ContentError> {
        Ok(View::html(format!("<ul data-gallery=\"{}\"></ul>", ctx.path)))
    }

    async fn modal(ctx: RenderContext) -> Result<View, ContentError> {
        Ok(View::html(format!(
            "<dialog data-modal=\"{}\" data-id=\"{}\"></dialog>",
            ctx.path,
            ctx.param("id").unwrap_or_default()
        )))
    }

    fn tree() -> RouteTree {
        RouteTree::builder()
            .layout("/", shows_path)
            .and_then(|b| b.page("/photos", gallery))
            .and_then(|b| b.page("/photos/[id]", gallery))
            .and_then(|b| b.default("/@modal", |_ctx| View::empty()))
            .and_then(|b| b.page("/@modal/(.)photos/[id]", modal))
            .unwrap()
            .build()
    }

    fn request(path: &str, navigation: Navigation) -> PageRequest {
        PageRequest {
            path: path.to_string(),
            query: HashMap::new(),
            headers: HashMap::new(),
            navigation,
        }
    }

    async fn shell(request: &PageRequest) -> String {
        let images = ImagePolicy::new(&[]).unwrap();
        let composition = compose(&tree(), request, Arc::new(Store::seeded().unwrap()), Arc::new(images));
        assert!(composition.matched);
        let rendered = Renderer::default().render(composition.view, &request.path).await;
        assert_eq!(rendered.outcome, Outcome::Ready);
        rendered.shell
    }

    #[tokio::test]
    async fn test_intercepted_primary_chain_sees_origin_path() {
        let soft = Navigation::Soft {
            from: Some("/photos".to_string()),
        };
        let html = shell(&request("/photos/2", soft)).await;

        assert!(html.contains("<main data-path=\"/photos\">"));
        assert!(html.contains("<ul data-gallery=\"/photos\">"));
        assert!(html.contains("<dialog data-modal=\"/photos/2\" data-id=\"2\">"));
    }

    #[tokio::test]
    async fn test_hard_navigation_renders_target_everywhere() {
        let html = shell(&request("/photos/2", Navigation::Hard)).await;

        assert!(html.contains("<main data-path=\"/photos/2\">"));
        assert!(html.contains("<ul data-gallery=\"/photos/2\">"));
        assert!(!html.contains("<dialog"));
    }
}

// src/pages/mod.rs
// DOCUMENTATION: The demo site
// PURPOSE: Register every page, layout and fallback in one route table

pub mod blog;
pub mod catalog;
pub mod dashboard;
pub mod demos;
pub mod root;

use crate::db::Store;
use crate::routing::{RouteError, RouteTree, Renderer};
use crate::services::ImagePolicy;
use std::sync::Arc;
use std::time::Duration;

/// Simulated data latency of the loading and streaming demos
#[derive(Debug, Clone, Copy)]
pub struct DemoTiming {
    pub loading: Duration,
    pub fast: Duration,
    pub medium: Duration,
    pub slow: Duration,
}

impl Default for DemoTiming {
    fn default() -> Self {
        Self {
            loading: Duration::from_secs(2),
            fast: Duration::from_millis(500),
            medium: Duration::from_millis(1500),
            slow: Duration::from_secs(3),
        }
    }
}

impl DemoTiming {
    /// Every delay divided by `factor`
    pub fn scaled(self, factor: u32) -> Self {
        let factor = factor.max(1);
        Self {
            loading: self.loading / factor,
            fast: self.fast / factor,
            medium: self.medium / factor,
            slow: self.slow / factor,
        }
    }
}

pub fn app_routes(timing: DemoTiming) -> Result<RouteTree, RouteError> {
    let tree = RouteTree::builder()
        .layout("/", root::layout)?
        .metadata("/", root::metadata)?
        .not_found("/", root::not_found)?
        .page("/", root::home)?
        .page("/about", root::about)?
        // products
        .page("/products", catalog::product_list)?
        .page("/products/[id]", catalog::product_detail)?
        .metadata("/products/[id]", catalog::product_metadata)?
        .not_found("/products/[id]", catalog::product_not_found)?
        // photos and the intercepting modal slot
        .error("/photos", catalog::photos_error)?
        .page("/photos", catalog::photo_list)?
        .page("/photos/[id]", catalog::photo_detail)?
        .default("/@modal", |_ctx| crate::routing::View::empty())?
        .page("/@modal/(.)photos/[id]", catalog::photo_modal)?
        .page("/photos-alternative", catalog::photos_alternative)?
        // blog
        .layout("/blog", blog::layout)?
        .page("/blog", blog::list)?
        .metadata("/blog", blog::list_metadata)?
        .page("/blog/[slug]", blog::post)?
        .metadata("/blog/[slug]", blog::post_metadata)?
        .not_found("/blog/[slug]", blog::post_not_found)?
        // dashboard and the route group
        .layout("/dashboard", dashboard::layout)?
        .page("/dashboard", dashboard::overview)?
        .page("/dashboard/settings", dashboard::settings)?
        .page("/dashboard/analytics", dashboard::analytics)?
        .layout("/(dashboard)", dashboard::group_layout)?
        .page("/(dashboard)/overview", dashboard::group_overview)?
        // rendering demos
        .loading("/loading-demo", demos::loading_fallback)?
        .page("/loading-demo", move |ctx| demos::loading_demo(ctx, timing))?
        .page("/loading-demo-manual", move |ctx| demos::loading_demo_manual(ctx, timing))?
        .page("/streaming-demo", move |ctx| demos::streaming_demo(ctx, timing))?
        .error("/error-demo", demos::error_fallback)?
        .page("/error-demo", demos::error_demo)?
        .page("/middleware-demo", demos::middleware_demo)?
        .page("/server-actions", demos::server_actions)?
        .page("/api-demo", demos::api_demo)?
        .build();

    Ok(tree)
}

/// Everything the page handler needs to render a request
pub struct Site {
    pub tree: RouteTree,
    pub store: Arc<Store>,
    pub images: Arc<ImagePolicy>,
    pub renderer: Renderer,
}

impl Site {
    pub fn new(tree: RouteTree, store: Arc<Store>, images: Arc<ImagePolicy>) -> Self {
        Self {
            tree,
            store,
            images,
            renderer: Renderer::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{compose, resolve, split_path, MatchMode, Outcome, PageRequest};

    fn site() -> Site {
        let images = ImagePolicy::new(&["https://images.unsplash.com".to_string()]).unwrap();
        Site::new(
            app_routes(DemoTiming::default().scaled(100)).unwrap(),
            Arc::new(Store::seeded().unwrap()),
            Arc::new(images),
        )
    }

    async fn shell(site: &Site, path: &str) -> (bool, Outcome, String) {
        let request = PageRequest::get(path);
        let composition = compose(&site.tree, &request, site.store.clone(), site.images.clone());
        let rendered = site.renderer.render(composition.view, path).await;
        (composition.matched, rendered.outcome, rendered.shell)
    }

    #[test]
    fn test_every_page_registered() {
        let tree = app_routes(DemoTiming::default()).unwrap();
        assert_eq!(tree.page_count(), 21);

        for path in ["/", "/products/3", "/photos/6", "/blog/app-router-deep-dive", "/overview", "/dashboard/settings"] {
            assert!(
                resolve(&tree.root, &split_path(path), 0, MatchMode::Primary).is_ok(),
                "{} should resolve",
                path
            );
        }
    }

    #[tokio::test]
    async fn test_layouts_nest_and_metadata_applies() {
        let site = site();
        let (matched, outcome, html) = shell(&site, "/blog/app-router-deep-dive").await;
        assert!(matched);
        assert_eq!(outcome, Outcome::Ready);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Router deep dive</title>"));
        assert!(html.contains("data-back"));

        let blog = html.find("class=\"blog\"").unwrap();
        let article = html.find("data-post=").unwrap();
        assert!(blog < article);
    }

    #[tokio::test]
    async fn test_blog_list_hides_back_link() {
        let (_, _, html) = shell(&site(), "/blog").await;
        assert!(!html.contains("data-back"));
        assert!(html.contains("<title>Blog</title>"));
    }

    #[tokio::test]
    async fn test_missing_product_uses_segment_not_found() {
        let (matched, outcome, html) = shell(&site(), "/products/99").await;
        assert!(matched);
        assert_eq!(outcome, Outcome::NotFound);
        assert!(html.contains("Product not found"));
        assert!(html.contains("<nav>"));
    }

    #[tokio::test]
    async fn test_route_group_page() {
        let (matched, _, html) = shell(&site(), "/overview").await;
        assert!(matched);
        assert!(html.contains("<code>(dashboard)</code> shares this layout"));
    }

    #[tokio::test]
    async fn test_disallowed_image_host_hits_error_boundary() {
        let images = ImagePolicy::new(&["https://cdn.example.com".to_string()]).unwrap();
        let site = Site::new(
            app_routes(DemoTiming::default()).unwrap(),
            Arc::new(Store::seeded().unwrap()),
            Arc::new(images),
        );
        let (_, outcome, html) = shell(&site, "/photos").await;
        assert_eq!(outcome, Outcome::Ready);
        assert!(html.contains("The gallery could not be shown"));
        assert!(html.contains("<footer>"));
    }
}

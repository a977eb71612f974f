// src/routing/tree.rs
// DOCUMENTATION: Route table built from directory-style patterns
// PURPOSE: Register layouts, pages and fallbacks per segment

use super::context::{Metadata, RenderContext};
use super::segment::{split_path, RouteError, SegmentKind};
use super::view::{ContentError, ErrorInfo, View, ViewFuture};
use std::future::Future;
use std::sync::Arc;

/// Async producer of a layout or page
pub type Component = Arc<dyn Fn(RenderContext) -> ViewFuture + Send + Sync>;

/// Synchronous producer of a loading, not-found or default view
pub type FallbackComponent = Arc<dyn Fn(&RenderContext) -> View + Send + Sync>;

pub type ErrorComponent = Arc<dyn Fn(&RenderContext, &ErrorInfo) -> View + Send + Sync>;

pub type MetadataComponent = Arc<dyn Fn(&RenderContext) -> Metadata + Send + Sync>;

/// One directory level of the route table
pub struct SegmentNode {
    pub kind: SegmentKind,
    pub layout: Option<Component>,
    pub page: Option<Component>,
    pub loading: Option<FallbackComponent>,
    pub error: Option<ErrorComponent>,
    pub not_found: Option<FallbackComponent>,
    /// Rendered by a slot when nothing in it matches
    pub default: Option<FallbackComponent>,
    pub metadata: Option<MetadataComponent>,
    pub children: Vec<SegmentNode>,
    pub slots: Vec<SegmentNode>,
}

impl SegmentNode {
    fn new(kind: SegmentKind) -> Self {
        Self {
            kind,
            layout: None,
            page: None,
            loading: None,
            error: None,
            not_found: None,
            default: None,
            metadata: None,
            children: Vec::new(),
            slots: Vec::new(),
        }
    }

    fn child_mut(&mut self, kind: SegmentKind, pattern: &str) -> Result<&mut SegmentNode, RouteError> {
        if let SegmentKind::Dynamic(new) = &kind {
            let existing = self.children.iter().find_map(|c| match &c.kind {
                SegmentKind::Dynamic(name) if name != new => Some(name.clone()),
                _ => None,
            });
            if let Some(existing) = existing {
                return Err(RouteError::ConflictingDynamic {
                    pattern: pattern.to_string(),
                    existing,
                    new: new.clone(),
                });
            }
        }

        let list = if matches!(kind, SegmentKind::Slot(_)) {
            &mut self.slots
        } else {
            &mut self.children
        };

        let position = match list.iter().position(|c| c.kind == kind) {
            Some(position) => position,
            None => {
                list.push(SegmentNode::new(kind));
                list.len() - 1
            }
        };
        Ok(&mut list[position])
    }

    /// Slot name when this node is a slot root
    pub fn slot_name(&self) -> Option<&str> {
        match &self.kind {
            SegmentKind::Slot(name) => Some(name),
            _ => None,
        }
    }
}

pub struct RouteTree {
    pub root: SegmentNode,
    /// Used for unmatched paths when no segment on the way defines one
    pub default_not_found: FallbackComponent,
}

impl RouteTree {
    pub fn builder() -> RouteTreeBuilder {
        RouteTreeBuilder {
            root: SegmentNode::new(SegmentKind::Root),
            default_not_found: Arc::new(|ctx: &RenderContext| {
                View::html(format!(
                    "<section data-not-found><h1>404</h1><p>No page at {}</p></section>",
                    super::view::escape(&ctx.path)
                ))
            }),
        }
    }

    /// Number of registered pages, including slot pages
    pub fn page_count(&self) -> usize {
        fn count(node: &SegmentNode) -> usize {
            usize::from(node.page.is_some())
                + node.children.iter().map(count).sum::<usize>()
                + node.slots.iter().map(count).sum::<usize>()
        }
        count(&self.root)
    }
}

pub struct RouteTreeBuilder {
    root: SegmentNode,
    default_not_found: FallbackComponent,
}

/// Wrap an async fn into a Component
pub fn component<F, Fut>(f: F) -> Component
where
    F: Fn(RenderContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<View, ContentError>> + Send + 'static,
{
    Arc::new(move |ctx: RenderContext| -> ViewFuture { Box::pin(f(ctx)) })
}

fn set<T>(slot: &mut Option<T>, value: T, pattern: &str, name: &'static str) -> Result<(), RouteError> {
    if slot.is_some() {
        return Err(RouteError::DuplicateComponent {
            pattern: pattern.to_string(),
            component: name,
        });
    }
    *slot = Some(value);
    Ok(())
}

impl RouteTreeBuilder {
    fn node_mut(&mut self, pattern: &str) -> Result<&mut SegmentNode, RouteError> {
        let mut node = &mut self.root;
        for raw in split_path(pattern) {
            let kind = SegmentKind::parse(raw)?;
            node = node.child_mut(kind, pattern)?;
        }
        Ok(node)
    }

    pub fn layout<F, Fut>(mut self, pattern: &str, f: F) -> Result<Self, RouteError>
    where
        F: Fn(RenderContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<View, ContentError>> + Send + 'static,
    {
        let node = self.node_mut(pattern)?;
        set(&mut node.layout, component(f), pattern, "layout")?;
        Ok(self)
    }

    pub fn page<F, Fut>(mut self, pattern: &str, f: F) -> Result<Self, RouteError>
    where
        F: Fn(RenderContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<View, ContentError>> + Send + 'static,
    {
        let node = self.node_mut(pattern)?;
        set(&mut node.page, component(f), pattern, "page")?;
        Ok(self)
    }

    pub fn loading<F>(mut self, pattern: &str, f: F) -> Result<Self, RouteError>
    where
        F: Fn(&RenderContext) -> View + Send + Sync + 'static,
    {
        let node = self.node_mut(pattern)?;
        set(&mut node.loading, Arc::new(f) as FallbackComponent, pattern, "loading fallback")?;
        Ok(self)
    }

    pub fn error<F>(mut self, pattern: &str, f: F) -> Result<Self, RouteError>
    where
        F: Fn(&RenderContext, &ErrorInfo) -> View + Send + Sync + 'static,
    {
        let node = self.node_mut(pattern)?;
        set(&mut node.error, Arc::new(f) as ErrorComponent, pattern, "error boundary")?;
        Ok(self)
    }

    pub fn not_found<F>(mut self, pattern: &str, f: F) -> Result<Self, RouteError>
    where
        F: Fn(&RenderContext) -> View + Send + Sync + 'static,
    {
        let node = self.node_mut(pattern)?;
        set(&mut node.not_found, Arc::new(f) as FallbackComponent, pattern, "not-found fallback")?;
        Ok(self)
    }

    pub fn default<F>(mut self, pattern: &str, f: F) -> Result<Self, RouteError>
    where
        F: Fn(&RenderContext) -> View + Send + Sync + 'static,
    {
        let node = self.node_mut(pattern)?;
        set(&mut node.default, Arc::new(f) as FallbackComponent, pattern, "default view")?;
        Ok(self)
    }

    pub fn metadata<F>(mut self, pattern: &str, f: F) -> Result<Self, RouteError>
    where
        F: Fn(&RenderContext) -> Metadata + Send + Sync + 'static,
    {
        let node = self.node_mut(pattern)?;
        set(&mut node.metadata, Arc::new(f) as MetadataComponent, pattern, "metadata")?;
        Ok(self)
    }

    pub fn build(self) -> RouteTree {
        let tree = RouteTree {
            root: self.root,
            default_not_found: self.default_not_found,
        };
        log::debug!("Route table built with {} pages", tree.page_count());
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn blank(_ctx: RenderContext) -> Result<View, ContentError> {
        Ok(View::empty())
    }

    #[test]
    fn test_builder_creates_nested_nodes() {
        let tree = RouteTree::builder()
            .page("/", blank)
            .and_then(|b| b.page("/blog/[slug]", blank))
            .and_then(|b| b.page("/@modal/(.)photos/[id]", blank))
            .unwrap()
            .build();

        assert_eq!(tree.page_count(), 3);
        let blog = &tree.root.children[0];
        assert_eq!(blog.kind, SegmentKind::Literal("blog".to_string()));
        assert_eq!(blog.children[0].kind, SegmentKind::Dynamic("slug".to_string()));
        assert_eq!(tree.root.slots[0].slot_name(), Some("modal"));
        assert!(tree.root.children.iter().all(|c| c.slot_name().is_none()));
    }

    #[test]
    fn test_duplicate_component_rejected() {
        let result = RouteTree::builder()
            .page("/about", blank)
            .and_then(|b| b.page("/about/", blank));
        assert!(matches!(
            result,
            Err(RouteError::DuplicateComponent { component: "page", .. })
        ));
    }

    #[test]
    fn test_conflicting_dynamic_names_rejected() {
        let result = RouteTree::builder()
            .page("/products/[id]", blank)
            .and_then(|b| b.page("/products/[slug]/reviews", blank));
        assert!(matches!(result, Err(RouteError::ConflictingDynamic { .. })));
    }

    #[test]
    fn test_invalid_segment_rejected() {
        let result = RouteTree::builder().page("/products/[id", blank);
        assert!(matches!(result, Err(RouteError::InvalidSegment(_))));
    }
}

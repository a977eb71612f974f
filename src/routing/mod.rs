// src/routing/mod.rs
// DOCUMENTATION: Routing module organization
// PURPOSE: Route table, resolution, composition and streaming

pub mod compose;
pub mod context;
pub mod render;
pub mod resolver;
pub mod segment;
pub mod tree;
pub mod view;

pub use compose::{compose, Composition};
pub use context::{Metadata, Navigation, PageRequest, RenderContext, NAVIGATION_FROM_HEADER, NAVIGATION_HEADER};
pub use render::{Chunk, Outcome, Rendered, Renderer, SWAP_RUNTIME};
pub use resolver::{resolve, MatchMode, RouteMatch, RouteMiss};
pub use segment::{split_path, RouteError, SegmentKind};
pub use tree::{RouteTree, RouteTreeBuilder};
pub use view::{escape, ContentError, ErrorInfo, View};

// src/pages/root.rs
// DOCUMENTATION: Root layout, home and about pages
// PURPOSE: Document shell shared by every page

use crate::routing::{escape, ContentError, Metadata, RenderContext, View};

pub const SITE_TITLE: &str = "Segment Router Demo";

const SITE_DESCRIPTION: &str = "A demo covering nested layouts, streaming, slots and server actions";

const NAV: &str = concat!(
    "<nav><a href=\"/\" data-brand>Segment Router</a>",
    "<a href=\"/\">Home</a>",
    "<a href=\"/about\">About</a>",
    "<a href=\"/products\">Products</a>",
    "<a href=\"/photos\">Photos</a>",
    "<a href=\"/dashboard\">Dashboard</a>",
    "<a href=\"/blog\">Blog</a></nav>"
);

/// (title, description, href)
const FEATURES: &[(&str, &str, &str)] = &[
    ("Static page", "A plain static route", "/about"),
    ("Dynamic route", "Pages driven by path parameters", "/products/1"),
    ("Nested layout", "A layout shared by sub-pages", "/dashboard"),
    ("Route group", "Layout grouping that adds no URL segment", "/overview"),
    ("Loading state", "A loading fallback streamed before the page", "/loading-demo"),
    ("Manual suspense", "The same effect without a segment fallback", "/loading-demo-manual"),
    ("Streaming", "Three sections resolving independently", "/streaming-demo"),
    ("Error handling", "An error boundary with retry", "/error-demo"),
    ("API routes", "JSON handlers per method", "/api-demo"),
    ("Server actions", "Form mutations with submission tokens", "/server-actions"),
    ("Intercepted modal", "A photo opened over the gallery", "/photos"),
    ("Query-driven modal", "The same gallery without slots", "/photos-alternative"),
    ("Blog", "List and detail pages with metadata", "/blog"),
    ("Middleware", "Request interception and header injection", "/middleware-demo"),
];

pub fn metadata(_ctx: &RenderContext) -> Metadata {
    Metadata {
        title: Some(SITE_TITLE.to_string()),
        description: Some(SITE_DESCRIPTION.to_string()),
    }
}

pub async fn layout(ctx: RenderContext) -> Result<View, ContentError> {
    let title = ctx.metadata.title.as_deref().unwrap_or(SITE_TITLE);
    let description = ctx.metadata.description.as_deref().unwrap_or(SITE_DESCRIPTION);

    Ok(View::list([
        View::html(format!(
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
             <title>{}</title><meta name=\"description\" content=\"{}\"></head><body>",
            escape(title),
            escape(description)
        )),
        View::html(NAV),
        View::html("<main>"),
        View::Children,
        View::html("</main>"),
        View::Slot("modal".to_string()),
        View::html(format!("<footer>{} - every routing scenario</footer></body></html>", SITE_TITLE)),
    ]))
}

pub async fn home(_ctx: RenderContext) -> Result<View, ContentError> {
    let cards: String = FEATURES
        .iter()
        .map(|(title, description, href)| {
            format!(
                "<a class=\"card\" href=\"{}\"><h3>{}</h3><p>{}</p></a>",
                href, title, description
            )
        })
        .collect();

    Ok(View::html(format!(
        "<h1>{}</h1><p>Every major routing scenario in one site.</p>\
         <section class=\"features\">{}</section>",
        SITE_TITLE, cards
    )))
}

pub async fn about(_ctx: RenderContext) -> Result<View, ContentError> {
    Ok(View::html(
        "<h1>About</h1>\
         <p>A static page: no parameters, no data, rendered the same for everyone.</p>\
         <ul><li>Registered at <code>/about</code></li>\
         <li>Wrapped by the root layout only</li></ul>",
    ))
}

pub fn not_found(ctx: &RenderContext) -> View {
    View::html(format!(
        "<section data-not-found><h1>404</h1><h2>Page not found</h2>\
         <p>Nothing lives at <code>{}</code>.</p><a href=\"/\">Back home</a></section>",
        escape(&ctx.path)
    ))
}

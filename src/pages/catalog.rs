// src/pages/catalog.rs
// DOCUMENTATION: Product and photo pages
// PURPOSE: Dynamic routes, not-found fallbacks and the intercepted photo modal

use crate::models::{Photo, Product};
use crate::routing::{escape, ContentError, ErrorInfo, Metadata, RenderContext, View};

/// Photos shown on the query-driven gallery
const ALTERNATIVE_PHOTOS: usize = 3;

fn param(ctx: &RenderContext, name: &str) -> Result<String, ContentError> {
    ctx.param(name)
        .map(str::to_string)
        .ok_or_else(|| ContentError::Failed(format!("missing route parameter {}", name)))
}

pub async fn product_list(ctx: RenderContext) -> Result<View, ContentError> {
    let items: String = ctx
        .store
        .products
        .list()
        .iter()
        .map(|p: &Product| {
            format!(
                "<a class=\"card\" href=\"/products/{}\"><h3>{}</h3><p>{}</p><span>View details</span></a>",
                escape(&p.id),
                escape(&p.name),
                escape(&p.description)
            )
        })
        .collect();

    Ok(View::html(format!(
        "<h1>Products</h1><p>Pick a product to open its dynamic route.</p><section>{}</section>",
        items
    )))
}

pub fn product_metadata(ctx: &RenderContext) -> Metadata {
    let product = ctx.param("id").and_then(|id| ctx.store.products.get(id).ok());
    match product {
        Some(product) => Metadata {
            title: Some(product.name),
            description: Some(product.description),
        },
        None => Metadata::titled("Product not found"),
    }
}

pub async fn product_detail(ctx: RenderContext) -> Result<View, ContentError> {
    let id = param(&ctx, "id")?;
    let product = ctx.store.products.get(&id)?;

    Ok(View::html(format!(
        "<a href=\"/products\">Back to products</a>\
         <article data-product=\"{}\"><h1>{}</h1><p>{}</p><p class=\"price\">${}</p></article>\
         <section><h2>About this route</h2><ul>\
         <li>Registered as <code>/products/[id]</code></li>\
         <li>The <code>id</code> parameter comes from the path</li>\
         <li>Title and description come from the product</li></ul></section>",
        escape(&product.id),
        escape(&product.name),
        escape(&product.description),
        product.price
    )))
}

pub fn product_not_found(_ctx: &RenderContext) -> View {
    View::html(
        "<section data-not-found><h1>404</h1><h2>Product not found</h2>\
         <p>Sorry, that product does not exist.</p>\
         <a href=\"/products\">Back to products</a></section>",
    )
}

fn photo_card(ctx: &RenderContext, photo: &Photo, href: &str) -> Result<String, ContentError> {
    Ok(format!(
        "<a class=\"card\" href=\"{}\"><img src=\"{}\" alt=\"{}\" loading=\"lazy\">\
         <h3>{}</h3><p>{}</p></a>",
        href,
        ctx.images.src(&photo.sized_url(800, 600))?,
        escape(&photo.title),
        escape(&photo.title),
        escape(&photo.description)
    ))
}

pub async fn photo_list(ctx: RenderContext) -> Result<View, ContentError> {
    let mut cards = String::new();
    for photo in ctx.store.photos.list() {
        cards.push_str(&photo_card(&ctx, &photo, &format!("/photos/{}", escape(&photo.id)))?);
    }

    Ok(View::html(format!(
        "<h1>Photos</h1>\
         <p>Opening a photo from this page shows it in a modal; loading its URL directly shows the full page.</p>\
         <section class=\"gallery\">{}</section>",
        cards
    )))
}

pub async fn photo_detail(ctx: RenderContext) -> Result<View, ContentError> {
    let id = param(&ctx, "id")?;
    let photo = ctx.store.photos.get(&id)?;

    Ok(View::html(format!(
        "<a href=\"/photos\">Back to photos</a>\
         <article data-photo=\"{}\"><h1>{}</h1><p>{}</p>\
         <img src=\"{}\" alt=\"{}\"></article>\
         <p>This is the full page view of <code>/photos/{}</code>.</p>",
        escape(&photo.id),
        escape(&photo.title),
        escape(&photo.description),
        ctx.images.src(&photo.sized_url(1200, 800))?,
        escape(&photo.title),
        escape(&photo.id)
    )))
}

fn modal(photo: &Photo, src: &str, close_href: &str) -> String {
    format!(
        "<div data-modal role=\"dialog\" aria-label=\"{}\"><div class=\"modal\">\
         <a href=\"{}\" data-close aria-label=\"Close\">&times;</a>\
         <img src=\"{}\" alt=\"{}\"><h2>{}</h2><p>{}</p></div></div>",
        escape(&photo.title),
        close_href,
        src,
        escape(&photo.title),
        escape(&photo.title),
        escape(&photo.description)
    )
}

/// Modal slot content when a gallery link is followed client-side
pub async fn photo_modal(ctx: RenderContext) -> Result<View, ContentError> {
    let id = param(&ctx, "id")?;
    let photo = match ctx.store.photos.get(&id) {
        Ok(photo) => photo,
        Err(_) => {
            return Ok(View::html(
                "<div data-modal role=\"dialog\"><div class=\"modal\"><p>Photo not found</p>\
                 <a href=\"/photos\" data-close>Close</a></div></div>",
            ))
        }
    };
    let src = ctx.images.src(&photo.sized_url(1200, 800))?;
    Ok(View::html(modal(&photo, &src, "/photos")))
}

pub fn photos_error(_ctx: &RenderContext, info: &ErrorInfo) -> View {
    View::html(format!(
        "<section data-error><h2>The gallery could not be shown</h2><p>{}</p>\
         <p><code>{}</code></p><a href=\"{}\" data-retry>Try again</a></section>",
        escape(&info.message),
        info.digest,
        escape(&info.retry_path)
    ))
}

/// Gallery whose modal is driven by `?photo=id` instead of a slot
pub async fn photos_alternative(ctx: RenderContext) -> Result<View, ContentError> {
    let photos: Vec<Photo> = ctx.store.photos.list().into_iter().take(ALTERNATIVE_PHOTOS).collect();

    let mut cards = String::new();
    for photo in &photos {
        cards.push_str(&photo_card(&ctx, photo, &format!("/photos-alternative?photo={}", escape(&photo.id)))?);
    }

    let selected = ctx
        .query("photo")
        .and_then(|id| photos.iter().find(|p| p.id == id));
    let overlay = match selected {
        Some(photo) => modal(photo, &ctx.images.src(&photo.sized_url(1200, 800))?, "/photos-alternative"),
        None => String::new(),
    };

    Ok(View::html(format!(
        "<h1>Photos (query-driven modal)</h1>\
         <p>The modal below is selected by the <code>photo</code> query parameter, without a slot.</p>\
         <section class=\"gallery\">{}</section>{}",
        cards, overlay
    )))
}

// src/pages/blog.rs
// DOCUMENTATION: Blog section
// PURPOSE: Layout with back link, post list and post detail with metadata

use crate::routing::{escape, ContentError, Metadata, RenderContext, View};

/// Characters of a post body used as its description
const SUMMARY_CHARS: usize = 120;

pub async fn layout(ctx: RenderContext) -> Result<View, ContentError> {
    let on_list = ctx.path.trim_end_matches('/') == "/blog";
    let back = if on_list {
        "<a href=\"/blog\" aria-current=\"page\">All posts</a>"
    } else {
        "<a href=\"/blog\" data-back>Back to the blog</a>"
    };

    Ok(View::list([
        View::html(format!("<div class=\"blog\">{}", back)),
        View::Children,
        View::html("</div>"),
    ]))
}

pub fn list_metadata(_ctx: &RenderContext) -> Metadata {
    Metadata {
        title: Some("Blog".to_string()),
        description: Some("All blog posts".to_string()),
    }
}

pub async fn list(ctx: RenderContext) -> Result<View, ContentError> {
    let items: String = ctx
        .store
        .posts
        .list()
        .iter()
        .map(|post| {
            format!(
                "<a class=\"card\" href=\"/blog/{}\"><h2>{}</h2><p>{}</p>\
                 <span>{}</span> <time datetime=\"{}\">{}</time></a>",
                escape(&post.slug),
                escape(&post.title),
                escape(&post.summary(SUMMARY_CHARS)),
                escape(&post.author),
                post.date,
                post.date.format("%B %-d, %Y")
            )
        })
        .collect();

    Ok(View::html(format!(
        "<h1>Blog</h1><p>Posts are read from the injected store.</p><section>{}</section>",
        items
    )))
}

pub fn post_metadata(ctx: &RenderContext) -> Metadata {
    let post = ctx.param("slug").and_then(|slug| ctx.store.posts.get(slug).ok());
    match post {
        Some(post) => Metadata {
            description: Some(post.summary(SUMMARY_CHARS)),
            title: Some(post.title),
        },
        None => Metadata::titled("Post not found"),
    }
}

pub async fn post(ctx: RenderContext) -> Result<View, ContentError> {
    let slug = ctx
        .param("slug")
        .ok_or_else(|| ContentError::Failed("missing route parameter slug".to_string()))?;
    let post = ctx.store.posts.get(slug)?;

    let body: String = post
        .paragraphs()
        .map(|p| format!("<p>{}</p>", escape(p)))
        .collect();

    Ok(View::html(format!(
        "<article data-post=\"{}\"><h1>{}</h1>\
         <p class=\"byline\">{} &middot; <time datetime=\"{}\">{}</time></p>{}</article>",
        escape(&post.slug),
        escape(&post.title),
        escape(&post.author),
        post.date,
        post.date.format("%B %-d, %Y"),
        body
    )))
}

pub fn post_not_found(_ctx: &RenderContext) -> View {
    View::html(
        "<section data-not-found><h1>404</h1><h2>Post not found</h2>\
         <p>Sorry, that post does not exist.</p><a href=\"/blog\">Back to the blog</a></section>",
    )
}

// src/pages/dashboard.rs
// DOCUMENTATION: Dashboard section and the (dashboard) route group
// PURPOSE: Nested layout with sub-pages, and a group that adds no URL segment

use crate::routing::{ContentError, RenderContext, View};

const TABS: &[(&str, &str)] = &[
    ("/dashboard", "Overview"),
    ("/dashboard/settings", "Settings"),
    ("/dashboard/analytics", "Analytics"),
];

const STATS: &str = "<div class=\"stats\">\
    <div><h3>Total users</h3><p>1,234</p></div>\
    <div><h3>Revenue</h3><p>$56,789</p></div>\
    <div><h3>Orders</h3><p>890</p></div></div>";

fn tabs(current: &str) -> String {
    let links: String = TABS
        .iter()
        .map(|(href, label)| {
            let active = if *href == current { " aria-current=\"page\"" } else { "" };
            format!("<a href=\"{}\"{}>{}</a>", href, active, label)
        })
        .collect();
    format!("<div class=\"tabs\">{}</div>", links)
}

fn frame(intro: &str, current: &str) -> View {
    View::list([
        View::html(format!(
            "<div class=\"dashboard\"><h1>Dashboard</h1><p>{}</p>{}<div class=\"panel\">",
            intro,
            tabs(current)
        )),
        View::Children,
        View::html("</div></div>"),
    ])
}

pub async fn layout(ctx: RenderContext) -> Result<View, ContentError> {
    Ok(frame(
        "A dashboard using the real <code>/dashboard</code> path.",
        ctx.path.trim_end_matches('/'),
    ))
}

pub async fn overview(_ctx: RenderContext) -> Result<View, ContentError> {
    Ok(View::html(format!(
        "<h2>Overview</h2>{}<ul><li>Registered at <code>/dashboard</code></li>\
         <li>Sub-pages: <code>/dashboard/settings</code> and <code>/dashboard/analytics</code></li></ul>",
        STATS
    )))
}

pub async fn settings(_ctx: RenderContext) -> Result<View, ContentError> {
    Ok(View::html(
        "<h2>Settings</h2>\
         <div><h3>Notifications</h3><p>Manage your notification preferences</p></div>\
         <div><h3>Privacy</h3><p>Control your privacy options</p></div>\
         <div><h3>Account</h3><p>Update your account details</p></div>",
    ))
}

pub async fn analytics(_ctx: RenderContext) -> Result<View, ContentError> {
    Ok(View::html(
        "<h2>Analytics</h2><p>Charts and statistics would live here.</p>",
    ))
}

pub async fn group_layout(ctx: RenderContext) -> Result<View, ContentError> {
    Ok(frame(
        "A route group: <code>(dashboard)</code> shares this layout without adding a URL segment.",
        ctx.path.trim_end_matches('/'),
    ))
}

pub async fn group_overview(_ctx: RenderContext) -> Result<View, ContentError> {
    Ok(View::html(format!(
        "<h2>Overview</h2>{}<ul><li>Groups are written in parentheses, like <code>(dashboard)</code></li>\
         <li>This page is registered as <code>/(dashboard)/overview</code> and served at <code>/overview</code></li></ul>",
        STATS
    )))
}

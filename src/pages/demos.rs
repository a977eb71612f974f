// src/pages/demos.rs
// DOCUMENTATION: Loading, streaming, error, middleware, action and API demo pages
// PURPOSE: One page per rendering feature, with simulated latency

use super::DemoTiming;
use crate::handlers::actions::SUBMISSION_FIELD;
use crate::middleware::pipeline::{CUSTOM_HEADER, PATHNAME_HEADER};
use crate::routing::{escape, ContentError, ErrorInfo, RenderContext, View};
use std::time::Duration;
use tokio::time::sleep;

const SKELETON: &str = "<div class=\"skeleton\" aria-busy=\"true\"><div></div><div></div><div></div></div>";

/// Page content that only exists after the simulated fetch
async fn loaded_content(delay: Duration, explanation: &'static str) -> Result<View, ContentError> {
    sleep(delay).await;
    Ok(View::html(format!(
        "<h1>Loaded!</h1><p>This data came from the server.</p>\
         <section><h2>Loading demo</h2><p>{}</p></section>",
        explanation
    )))
}

pub fn loading_fallback(_ctx: &RenderContext) -> View {
    View::html(format!(
        "{}<section><h3>About the loading fallback</h3><ul>\
         <li>Registered for the <code>/loading-demo</code> segment</li>\
         <li>Sent immediately while the page is still loading</li>\
         <li>Replaced in place once the page is ready</li></ul></section>",
        SKELETON
    ))
}

pub async fn loading_demo(_ctx: RenderContext, timing: DemoTiming) -> Result<View, ContentError> {
    loaded_content(
        timing.loading,
        "While this page waited, the segment loading fallback was shown.",
    )
    .await
}

pub async fn loading_demo_manual(_ctx: RenderContext, timing: DemoTiming) -> Result<View, ContentError> {
    let fallback = View::html(format!(
        "{}<section><h3>Manual suspense</h3><ul>\
         <li>No segment loading fallback is registered</li>\
         <li>The page wraps its own content in a suspense boundary</li>\
         <li>The effect is the same</li></ul></section>",
        SKELETON
    ));

    Ok(View::suspense(
        fallback,
        loaded_content(
            timing.loading,
            "While this content waited, the page's own suspense fallback was shown.",
        ),
    ))
}

async fn streamed_section(delay: Duration, title: &'static str) -> Result<View, ContentError> {
    sleep(delay).await;
    Ok(View::html(format!(
        "<div class=\"streamed\"><h3>{}</h3><p>Loaded after {:.1} seconds.</p></div>",
        title,
        delay.as_secs_f64()
    )))
}

pub async fn streaming_demo(_ctx: RenderContext, timing: DemoTiming) -> Result<View, ContentError> {
    let section = |delay: Duration, title: &'static str| {
        View::suspense(View::html(SKELETON), streamed_section(delay, title))
    };

    Ok(View::list([
        View::html(
            "<h1>Streaming demo</h1>\
             <p>The page shell arrives first. Each section below streams in on its own as soon as its data is ready.</p>",
        ),
        section(timing.fast, "Fast data"),
        section(timing.medium, "Medium data"),
        section(timing.slow, "Slow data"),
        View::html(
            "<section><h2>How it works</h2><ul>\
             <li>Every section is an independent suspense boundary</li>\
             <li>Sections are sent in the order they finish, not the order they appear</li>\
             <li>A slow section never holds back a fast one</li></ul></section>",
        ),
    ]))
}

pub async fn error_demo(ctx: RenderContext) -> Result<View, ContentError> {
    if ctx.query("trigger") == Some("1") {
        return Err(ContentError::Failed("This is a test error!".to_string()));
    }

    Ok(View::html(
        "<h1>Error handling demo</h1>\
         <p>Following the link below fails this page, and the segment error boundary takes its place.</p>\
         <a href=\"/error-demo?trigger=1\" data-trigger>Trigger an error</a>\
         <section><h2>About error boundaries</h2><ul>\
         <li>A boundary catches failures of its segment and everything below it</li>\
         <li>The layout around the boundary keeps rendering</li>\
         <li>The fallback gets the message, a digest and a retry link</li></ul></section>",
    ))
}

pub fn error_fallback(_ctx: &RenderContext, info: &ErrorInfo) -> View {
    View::html(format!(
        "<section data-error><h1>Something went wrong!</h1><p>{}</p>\
         <p>Digest: <code>{}</code></p>\
         <a href=\"{}\" data-retry>Try again</a> <a href=\"/error-demo\">Back to the demo</a></section>",
        escape(&info.message),
        info.digest,
        escape(&info.retry_path)
    ))
}

pub async fn middleware_demo(ctx: RenderContext) -> Result<View, ContentError> {
    let (custom_name, _) = CUSTOM_HEADER;
    let shown = |name: &str| {
        escape(ctx.header(name).unwrap_or("(not set: the middleware did not run for this request)"))
    };

    Ok(View::html(format!(
        "<h1>Middleware demo</h1>\
         <p>The middleware ran before this page was routed and added these headers to the request and the response:</p>\
         <ul><li><code>{}</code>: <span data-header=\"{}\">{}</span></li>\
         <li><code>{}</code>: <span data-header=\"{}\">{}</span></li></ul>\
         <section><h2>What middleware can do</h2><ul>\
         <li>Log requests</li><li>Add or change headers</li>\
         <li>Redirect or rewrite paths before routing</li>\
         <li>Answer directly, for example to deny access</li></ul></section>",
        custom_name,
        custom_name,
        shown(custom_name),
        PATHNAME_HEADER,
        PATHNAME_HEADER,
        shown(PATHNAME_HEADER)
    )))
}

/// Milliseconds between polls of a low-priority submission
const POLL_INTERVAL_MS: u64 = 300;

/// Each submit is one trigger: it gets a fresh token and disables its button until answered.
/// Low-priority submissions are polled until they complete.
fn action_script() -> String {
    format!(
        "<script>\
function __show(v){{if(Array.isArray(v))return v.length?v.join(', '):'(no results)';\
if(v&&typeof v==='object')return v.message?v.message+(v.id?' (ID: '+v.id+')':''):JSON.stringify(v);return String(v);}}\
document.querySelectorAll('form[data-action]').forEach(function(f){{\
f.addEventListener('submit',async function(e){{e.preventDefault();\
var out=f.querySelector('output'),btn=f.querySelector('button');\
if(btn.disabled)return;btn.disabled=true;out.textContent='Working...';\
var token=crypto.randomUUID();f.elements['{field}'].value=token;\
try{{var r=await fetch(f.action,{{method:'POST',headers:{{'x-action-priority':f.dataset.priority||'normal'}},\
body:new URLSearchParams(new FormData(f))}});var body=await r.json();\
if(r.status===202){{out.textContent='Pending...';\
while(body.status==='pending'){{await new Promise(function(ok){{setTimeout(ok,{poll})}});\
body=await(await fetch(f.action+'/submissions/'+encodeURIComponent(token))).json();}}\
body=body.result;}}\
if(body.status==='ok'){{out.textContent=__show(body.value);\
if(f.dataset.feedback)f.elements[f.dataset.feedback].value=body.value;}}\
else{{out.textContent='Error: '+(body.message||(body.error&&body.error.message)||'request failed');}}\
}}catch(err){{out.textContent='Error: '+err;}}finally{{btn.disabled=false;}}}});}});\
</script>",
        field = SUBMISSION_FIELD,
        poll = POLL_INTERVAL_MS
    )
}

/// A form posting to `/_actions/{action}`; `feedback` names the input the result is written back to
fn action_form(action: &str, priority: &str, feedback: Option<&str>, fields: &str, submit: &str) -> String {
    let feedback = feedback
        .map(|name| format!(" data-feedback=\"{}\"", name))
        .unwrap_or_default();
    format!(
        "<form method=\"post\" action=\"/_actions/{}\" data-action data-priority=\"{}\"{}>\
         <input type=\"hidden\" name=\"{}\" value=\"\">{}\
         <button type=\"submit\">{}</button> <output></output></form>",
        action, priority, feedback, SUBMISSION_FIELD, fields, submit
    )
}

pub async fn server_actions(_ctx: RenderContext) -> Result<View, ContentError> {
    Ok(View::html(format!(
        "<h1>Server actions demo</h1>\
         <section><h2>Create a user (form submission)</h2>{}</section>\
         <section><h2>Counter</h2>{}</section>\
         <section><h2>Search (low priority)</h2>{}\
         <p>Low priority calls answer at once with a submission token; the page polls \
         <code>/_actions/search/submissions/{{token}}</code> until the result is ready.</p></section>\
         <section><h2>About server actions</h2><ul>\
         <li>Each form posts to a named action</li>\
         <li>Every submit carries a fresh token, so a repeated delivery of the same submit commits once</li>\
         <li>The button stays disabled while its submit is pending</li>\
         <li>Inputs are validated before the action runs</li></ul></section>{}",
        action_form(
            "create_user",
            "normal",
            None,
            "<label>Name <input type=\"text\" name=\"name\" required></label>\
             <label>Email <input type=\"email\" name=\"email\" required></label>",
            "Submit",
        ),
        action_form(
            "increment_counter",
            "normal",
            Some("count"),
            "<label>Count <input type=\"number\" name=\"count\" value=\"0\"></label>",
            "Increment",
        ),
        action_form(
            "search",
            "low",
            None,
            "<label>Query <input type=\"search\" name=\"query\"></label>",
            "Search",
        ),
        action_script()
    )))
}

pub async fn api_demo(_ctx: RenderContext) -> Result<View, ContentError> {
    Ok(View::html(
        "<h1>API routes demo</h1>\
         <p><button data-call=\"get\">Test GET</button> <button data-call=\"post\">Test POST</button></p>\
         <pre data-response></pre>\
         <section><h2>Endpoints</h2><ul>\
         <li><code>GET /api/hello?name=X</code> greets X</li>\
         <li><code>POST /api/hello</code> echoes a JSON body as <code>receivedData</code></li>\
         <li><code>PUT /api/hello</code> echoes a JSON body as <code>updatedData</code></li>\
         <li><code>DELETE /api/hello</code> confirms the deletion</li>\
         <li>A malformed JSON body is answered with 400</li></ul></section>\
         <script>\
         document.querySelectorAll('button[data-call]').forEach(function(b){\
         b.addEventListener('click',async function(){\
         var r=b.dataset.call==='get'?await fetch('/api/hello?name=Router'):\
         await fetch('/api/hello',{method:'POST',headers:{'Content-Type':'application/json'},\
         body:JSON.stringify({name:'Router',type:'POST'})});\
         document.querySelector('pre[data-response]').textContent=JSON.stringify(await r.json(),null,2);});});\
         </script>",
    ))
}

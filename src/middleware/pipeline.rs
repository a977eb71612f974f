// src/middleware/pipeline.rs
// DOCUMENTATION: Request middleware pipeline
// PURPOSE: Log, inject headers, redirect and rewrite before path resolution

use super::matcher::{PathMatcher, PathPattern};
use crate::config::Config;
use crate::errors::AppError;
use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{
        header::{HeaderMap, HeaderName, HeaderValue, LOCATION},
        StatusCode, Uri,
    },
    middleware::Next,
    web, Error, HttpResponse,
};

/// Header every page request carries once the pipeline ran
pub const CUSTOM_HEADER: (&str, &str) = ("x-custom-header", "middleware-header");

/// Original request path, as seen by the pipeline
pub const PATHNAME_HEADER: &str = "x-pathname";

/// The part of a request the steps see and change
#[derive(Debug, Clone)]
pub struct Exchange {
    pub method: String,
    pub path: String,
    /// Set on the request before routing and on the response after it
    pub injected: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    /// 307 to this location; later steps are skipped
    Redirect(String),
    /// Route this path instead; later steps see the new path
    Rewrite(String),
    /// Answer directly; later steps are skipped
    Respond { status: u16, body: String },
}

pub trait Step: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, exchange: &mut Exchange) -> StepOutcome;
}

pub struct RequestLog;

impl Step for RequestLog {
    fn name(&self) -> &'static str {
        "request-log"
    }

    fn apply(&self, exchange: &mut Exchange) -> StepOutcome {
        log::info!("Middleware: {} {}", exchange.method, exchange.path);
        StepOutcome::Continue
    }
}

pub struct InjectHeaders;

impl Step for InjectHeaders {
    fn name(&self) -> &'static str {
        "inject-headers"
    }

    fn apply(&self, exchange: &mut Exchange) -> StepOutcome {
        let (name, value) = CUSTOM_HEADER;
        exchange.injected.push((name.to_string(), value.to_string()));
        exchange
            .injected
            .push((PATHNAME_HEADER.to_string(), exchange.path.clone()));
        StepOutcome::Continue
    }
}

/// "/from" => "/to", or "/from/*" => "/to/*" keeping the rest of the path
#[derive(Debug, Clone)]
pub struct Rule {
    from: PathPattern,
    to: String,
}

impl Rule {
    pub fn parse(from: &str, to: &str) -> Result<Self, AppError> {
        let from = PathPattern::parse(from)?;
        if !to.starts_with('/') {
            return Err(AppError::InvalidInput(format!("Rule target must start with '/': {}", to)));
        }
        Ok(Self {
            from,
            to: to.to_string(),
        })
    }

    pub fn target(&self, path: &str) -> Option<String> {
        match (&self.from, self.to.strip_suffix("/*")) {
            (PathPattern::Prefix(_), Some(to_prefix)) => self
                .from
                .remainder(path)
                .map(|rest| format!("{}{}", to_prefix, rest))
                .map(|t| if t.is_empty() { "/".to_string() } else { t }),
            (from, _) if from.matches(path) => Some(self.to.clone()),
            _ => None,
        }
    }

    fn parse_all(pairs: &[(String, String)]) -> Result<Vec<Rule>, AppError> {
        pairs.iter().map(|(from, to)| Rule::parse(from, to)).collect()
    }
}

pub struct Redirects(pub Vec<Rule>);

impl Step for Redirects {
    fn name(&self) -> &'static str {
        "redirects"
    }

    fn apply(&self, exchange: &mut Exchange) -> StepOutcome {
        match self.0.iter().find_map(|rule| rule.target(&exchange.path)) {
            Some(location) => StepOutcome::Redirect(location),
            None => StepOutcome::Continue,
        }
    }
}

pub struct Rewrites(pub Vec<Rule>);

impl Step for Rewrites {
    fn name(&self) -> &'static str {
        "rewrites"
    }

    fn apply(&self, exchange: &mut Exchange) -> StepOutcome {
        match self.0.iter().find_map(|rule| rule.target(&exchange.path)) {
            Some(path) => StepOutcome::Rewrite(path),
            None => StepOutcome::Continue,
        }
    }
}

/// What the pipeline decided for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub injected: Vec<(String, String)>,
    /// Continue, or the first short-circuiting outcome; a rewrite is folded
    /// into `Rewrite` with the final path
    pub outcome: StepOutcome,
}

pub struct Pipeline {
    matcher: PathMatcher,
    steps: Vec<Box<dyn Step>>,
}

impl Pipeline {
    pub fn new(matcher: PathMatcher, steps: Vec<Box<dyn Step>>) -> Self {
        Self { matcher, steps }
    }

    /// Default steps in their fixed order, with rules from configuration
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let matcher = PathMatcher::new(&config.middleware_include, &config.middleware_exclude)?;
        let steps: Vec<Box<dyn Step>> = vec![
            Box::new(RequestLog),
            Box::new(InjectHeaders),
            Box::new(Redirects(Rule::parse_all(&config.redirects)?)),
            Box::new(Rewrites(Rule::parse_all(&config.rewrites)?)),
        ];
        log::debug!(
            "Middleware pipeline: {:?}",
            steps.iter().map(|s| s.name()).collect::<Vec<_>>()
        );
        Ok(Self::new(matcher, steps))
    }

    /// None when the path is out of the pipeline's scope
    pub fn run(&self, method: &str, path: &str) -> Option<Decision> {
        if !self.matcher.applies(path) {
            return None;
        }

        let mut exchange = Exchange {
            method: method.to_string(),
            path: path.to_string(),
            injected: Vec::new(),
        };
        let mut rewritten = false;

        for step in &self.steps {
            match step.apply(&mut exchange) {
                StepOutcome::Continue => {}
                StepOutcome::Rewrite(target) => {
                    log::debug!("Middleware {}: rewrite {} -> {}", step.name(), exchange.path, target);
                    exchange.path = target;
                    rewritten = true;
                }
                outcome => {
                    log::debug!("Middleware {}: {:?} for {}", step.name(), outcome, path);
                    return Some(Decision {
                        injected: exchange.injected,
                        outcome,
                    });
                }
            }
        }

        Some(Decision {
            injected: exchange.injected,
            outcome: if rewritten {
                StepOutcome::Rewrite(exchange.path)
            } else {
                StepOutcome::Continue
            },
        })
    }
}

fn insert_headers(headers: &mut HeaderMap, injected: &[(String, String)]) {
    for (name, value) in injected {
        match (HeaderName::try_from(name.as_str()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => log::warn!("Skipping invalid injected header {}: {}", name, value),
        }
    }
}

/// actix-web entry point, installed with `middleware::from_fn`
pub async fn run_pipeline(
    mut req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let decision = req
        .app_data::<web::Data<Pipeline>>()
        .and_then(|pipeline| pipeline.run(req.method().as_str(), req.path()));

    let Some(decision) = decision else {
        return Ok(next.call(req).await?.map_into_left_body());
    };

    insert_headers(req.headers_mut(), &decision.injected);

    let early = match decision.outcome {
        StepOutcome::Continue => None,
        StepOutcome::Rewrite(path) => {
            let target = match req.query_string() {
                "" => path,
                query => format!("{}?{}", path, query),
            };
            let uri: Uri = target
                .parse()
                .map_err(|e| AppError::InternalError(format!("Rewrite target {}: {}", target, e)))?;
            req.match_info_mut().get_mut().update(&uri);
            req.head_mut().uri = uri;
            None
        }
        StepOutcome::Redirect(location) => Some(
            HttpResponse::TemporaryRedirect()
                .insert_header((LOCATION, location))
                .finish(),
        ),
        StepOutcome::Respond { status, body } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            Some(HttpResponse::build(status).body(body))
        }
    };

    let mut res = match early {
        Some(response) => req.into_response(response).map_into_right_body(),
        None => next.call(req).await?.map_into_left_body(),
    };
    insert_headers(res.headers_mut(), &decision.injected);
    Ok(res)
}

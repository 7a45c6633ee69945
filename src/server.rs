//! HTTP surface: tool routes, billing webhook and health check.

use std::sync::{Arc, Mutex};
use axum::{
    body::Bytes,
    extract::{FromRequest, Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use async_trait::async_trait;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use log::{debug, error, info, warn};

use crate::adapter::ToolAdapter;
use crate::error::{Error, ErrorCode};
use crate::rate::RateWindow;
use crate::request::*;
use crate::webhook::{BillingEvent, BillingSink, WebhookConfig, SIGNATURE_HEADER};
use crate::ToolKind;

/// Everything the handlers share
#[derive(Clone)]
pub struct AppState
{   pub adapter: Arc<ToolAdapter>
  , pub rate: Arc<Mutex<RateWindow>>
  , pub billing: Arc<dyn BillingSink>
  , pub webhook: WebhookConfig
}

impl AppState
{   pub fn new(
      adapter: ToolAdapter
    , rate: RateWindow
    , billing: Arc<dyn BillingSink>
    , webhook: WebhookConfig
    ) -> Self
    {   AppState
        {   adapter: Arc::new(adapter)
          , rate: Arc::new(Mutex::new(rate))
          , billing
          , webhook
        }
    }
}

/// Routes without CORS; tool routes sit behind the rate guard
pub fn router(state: AppState) -> Router
{   let tools = Router::new()
      .route(&ToolKind::GrammarChecker.route(), post(grammar_checker))
      .route(&ToolKind::ReadabilityChecker.route(), post(readability_checker))
      .route(&ToolKind::Paraphraser.route(), post(paraphraser))
      .route(&ToolKind::Summarizer.route(), post(summarizer))
      .route(&ToolKind::Translator.route(), post(translator))
      .route(&ToolKind::ToneConverter.route(), post(tone_converter))
      .route(&ToolKind::Humanizer.route(), post(humanizer))
      .route(&ToolKind::ArticleRewriter.route(), post(article_rewriter))
      .route_layer(middleware::from_fn_with_state(state.clone(), rate_guard));

    Router::new()
      .merge(tools)
      .route("/api/webhooks/lemon-squeezy", post(lemon_squeezy_webhook))
      .route("/api/health", get(health))
      .with_state(state)
}

/// CORS for the configured frontend origin
pub fn cors_layer(frontend_url: &str) -> Result<CorsLayer, Error>
{   let origin = HeaderValue::from_str(frontend_url.trim_end_matches('/'))
      .map_err(|_| {
        Error::InvalidConfiguration(
          format!("FRONTEND_URL is not a valid origin: {}", frontend_url)
        )
      })?;
    Ok(CorsLayer::new()
      .allow_origin(origin)
      .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
      .allow_headers([axum::http::header::CONTENT_TYPE]))
}

/// Turn an adapter error into `{error, code}` or a 400
pub fn error_response(err: &Error) -> Response
{   match err
    {   Error::InvalidRequest(message) => {
          debug!("Rejected tool request: {}", message);
          (StatusCode::BAD_REQUEST, Json(ErrorResponse::invalid(message.clone())))
            .into_response()
        }
      , _ => {
          let code = ErrorCode::classify(err);
          error!("Tool call failed ({}): {}", code, err);
          let status = StatusCode::from_u16(code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
          (status, Json(ErrorResponse::coded(code))).into_response()
        }
    }
}

fn respond<T: Serialize>(result: Result<T, Error>) -> Response
{   match result
    {   Ok(reply) => Json(reply).into_response()
      , Err(e) => error_response(&e)
    }
}

/// Tool request body. Any body `Json` refuses becomes a 400 `{error}`
/// instead of axum's plain-text 415/422.
pub struct ToolPayload(pub ToolRequest);

#[async_trait]
impl<S> FromRequest<S> for ToolPayload
where S: Send + Sync
{   type Rejection = Response;

    async fn from_request(request: Request, state: &S)
      -> Result<Self, Self::Rejection>
    {   match Json::<ToolRequest>::from_request(request, state).await
        {   Ok(Json(request)) => Ok(ToolPayload(request))
          , Err(rejection) => {
              let err = Error::InvalidRequest(rejection.body_text());
              Err(error_response(&err))
            }
        }
    }
}

async fn rate_guard(
  State(state): State<AppState>
, request: Request
, next: Next
) -> Response
{   let admitted = state.rate
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .try_admit();
    if admitted.is_err()
    {   warn!("Rejecting {} under rate limit", request.uri().path());
        return (StatusCode::TOO_MANY_REQUESTS, Json(ErrorResponse::rate_limited()))
          .into_response();
    }
    next.run(request).await
}

async fn grammar_checker(
  State(state): State<AppState>
, ToolPayload(request): ToolPayload
) -> Response
{   respond(state.adapter.check_grammar(&request).await)
}

async fn readability_checker(
  State(state): State<AppState>
, ToolPayload(request): ToolPayload
) -> Response
{   respond(state.adapter.check_readability(&request).await)
}

async fn paraphraser(
  State(state): State<AppState>
, ToolPayload(request): ToolPayload
) -> Response
{   respond(state.adapter.paraphrase(&request).await)
}

async fn summarizer(
  State(state): State<AppState>
, ToolPayload(request): ToolPayload
) -> Response
{   respond(state.adapter.summarize(&request).await)
}

async fn translator(
  State(state): State<AppState>
, ToolPayload(request): ToolPayload
) -> Response
{   respond(state.adapter.translate(&request).await)
}

async fn tone_converter(
  State(state): State<AppState>
, ToolPayload(request): ToolPayload
) -> Response
{   respond(state.adapter.convert_tone(&request).await)
}

async fn humanizer(
  State(state): State<AppState>
, ToolPayload(request): ToolPayload
) -> Response
{   respond(state.adapter.humanize(&request).await)
}

async fn article_rewriter(
  State(state): State<AppState>
, ToolPayload(request): ToolPayload
) -> Response
{   respond(state.adapter.rewrite_article(&request).await)
}

async fn lemon_squeezy_webhook(
  State(state): State<AppState>
, headers: HeaderMap
, body: Bytes
) -> Response
{   let signature = headers
      .get(SIGNATURE_HEADER)
      .and_then(|v| v.to_str().ok());

    match state.webhook.check(&body, signature)
    {   Ok(()) => {}
      , Err(Error::InvalidSignature) => {
          warn!("Webhook rejected: invalid signature");
          return (StatusCode::UNAUTHORIZED, "Invalid signature").into_response();
        }
      , Err(e) => {
          error!("Webhook misconfigured: {}", e);
          return (StatusCode::INTERNAL_SERVER_ERROR, "Webhook not configured")
            .into_response();
        }
    }

    let event = match BillingEvent::from_body(&body)
    {   Ok(event) => event
      , Err(e) => {
          warn!("Webhook payload unreadable: {}", e);
          return (StatusCode::BAD_REQUEST, "Invalid payload").into_response();
        }
    };

    info!("Webhook event received: {:?}", event.kind);
    match state.billing.record(event).await
    {   Ok(()) => (StatusCode::OK, "OK").into_response()
      , Err(e) => {
          error!("Webhook processing failed: {}", e);
          (StatusCode::INTERNAL_SERVER_ERROR, "Webhook processing failed")
            .into_response()
        }
    }
}

#[derive(Serialize)]
struct Health
{   status: &'static str
}

async fn health() -> Json<Health>
{   Json(Health { status: "ok" })
}

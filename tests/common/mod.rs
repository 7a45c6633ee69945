#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use wordsmith::server::{self, AppState};
use wordsmith::webhook::{BillingEvent, BillingSink, WebhookConfig};
use wordsmith::{Completer, Error, RateWindow, ToolAdapter};

/// Completer that replays scripted replies and counts calls
#[derive(Default)]
pub struct ScriptedCompleter
{   replies: Mutex<VecDeque<Result<String, Error>>>
  , calls: AtomicUsize
  , delay: Option<Duration>
}

impl ScriptedCompleter
{   pub fn replying(replies: Vec<Result<String, Error>>) -> Arc<Self>
    {   Arc::new(ScriptedCompleter
        {   replies: Mutex::new(replies.into())
          , calls: AtomicUsize::new(0)
          , delay: None
        })
    }

    pub fn always(reply: &str) -> Arc<Self>
    {   Self::replying(vec![Ok(reply.to_string()); 16])
    }

    pub fn slow(delay: Duration) -> Arc<Self>
    {   Arc::new(ScriptedCompleter
        {   replies: Mutex::new(VecDeque::new())
          , calls: AtomicUsize::new(0)
          , delay: Some(delay)
        })
    }

    pub fn calls(&self) -> usize
    {   self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Completer for ScriptedCompleter
{   async fn complete(&self, _prompt: String) -> Result<String, Error>
    {   self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay
        {   tokio::time::sleep(delay).await;
        }
        self.replies
          .lock()
          .unwrap()
          .pop_front()
          .unwrap_or_else(|| Ok("scripted reply".to_string()))
    }
}

/// Sink that keeps every event
#[derive(Default)]
pub struct RecordingSink
{   pub events: Mutex<Vec<BillingEvent>>
  , pub fail: bool
}

#[async_trait]
impl BillingSink for RecordingSink
{   async fn record(&self, event: BillingEvent) -> Result<(), Error>
    {   if self.fail
        {   return Err(Error::Other("store unavailable".to_string()));
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

pub fn app_with(
  completer: Arc<ScriptedCompleter>
, rate: RateWindow
, timeout: Duration
) -> Router
{   app_full(
      completer
    , rate
    , timeout
    , Arc::new(RecordingSink::default())
    , WebhookConfig::default()
    )
}

pub fn app_full(
  completer: Arc<ScriptedCompleter>
, rate: RateWindow
, timeout: Duration
, sink: Arc<RecordingSink>
, webhook: WebhookConfig
) -> Router
{   let adapter = ToolAdapter::new(completer, timeout);
    server::router(AppState::new(adapter, rate, sink, webhook))
}

pub fn app(completer: Arc<ScriptedCompleter>) -> Router
{   app_with(completer, RateWindow::default(), Duration::from_secs(15))
}

pub async fn post_json(
  app: Router
, path: &str
, body: serde_json::Value
) -> (StatusCode, serde_json::Value)
{   let response = app
      .oneshot(
        Request::builder()
          .method("POST")
          .uri(path)
          .header("content-type", "application/json")
          .body(Body::from(body.to_string()))
          .unwrap()
      )
      .await
      .unwrap();
    read(response).await
}

pub async fn post_raw(
  app: Router
, path: &str
, body: &str
, signature: Option<&str>
) -> (StatusCode, String)
{   let mut builder = Request::builder()
      .method("POST")
      .uri(path)
      .header("content-type", "application/json");
    if let Some(signature) = signature
    {   builder = builder.header("X-Signature", signature);
    }
    let response = app
      .oneshot(builder.body(Body::from(body.to_string())).unwrap())
      .await
      .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

pub async fn read(response: axum::response::Response)
  -> (StatusCode, serde_json::Value)
{   let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = serde_json::from_slice(&bytes)
      .unwrap_or(serde_json::Value::Null);
    (status, value)
}

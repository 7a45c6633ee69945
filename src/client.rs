use std::time::Duration;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use log::{debug, trace, error, warn};

use crate::request::*;
use crate::ToolKind;

/// Classified reason a tool call fell back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Failure
{   RateLimited
  , ModelOverloaded
  , InvalidApiKey
  , Timeout
  , NetworkError
}

impl Failure
{   pub fn as_str(&self) -> &'static str
    {   match self
        {   Failure::RateLimited => "RATE_LIMITED"
          , Failure::ModelOverloaded => "MODEL_OVERLOADED"
          , Failure::InvalidApiKey => "INVALID_API_KEY"
          , Failure::Timeout => "TIMEOUT"
          , Failure::NetworkError => "NETWORK_ERROR"
        }
    }

    /// Classify a non-2xx, non-400 answer from the tool server; a 504 is
    /// the server's own model timeout
    pub fn from_status(status: u16, body: &str) -> Self
    {   let body = body.to_lowercase();
        if status == 429
          || body.contains("isratelimited")
          || body.contains("quota")
          || body.contains("rate limit")
        {   Failure::RateLimited
        } else if status == 504
          || body.contains("timeout")
          || body.contains("timed out")
        {   Failure::Timeout
        } else if status == 503
          || body.contains("overloaded")
          || body.contains("service_unavailable")
        {   Failure::ModelOverloaded
        } else if body.contains("invalid_api_key")
          || body.contains("api key")
        {   Failure::InvalidApiKey
        } else
        {   Failure::NetworkError
        }
    }

    /// Classify an error message; anything unrecognised is a network error
    pub fn from_message(message: &str) -> Self
    {   let message = message.to_lowercase();
        if message.contains("timeout") || message.contains("timed out")
        {   Failure::Timeout
        } else if message.contains("quota") || message.contains("rate limit")
        {   Failure::RateLimited
        } else if message.contains("overloaded")
        {   Failure::ModelOverloaded
        } else if message.contains("api key")
        {   Failure::InvalidApiKey
        } else
        {   Failure::NetworkError
        }
    }

    fn from_transport(err: &reqwest::Error) -> Self
    {   if err.is_timeout()
        {   Failure::Timeout
        } else
        {   Failure::from_message(&err.to_string())
        }
    }
}

impl std::fmt::Display for Failure
{   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {   f.write_str(self.as_str())
    }
}

/// A tool reply, live or fallback. `failure` says why it fell back.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched<T>
{   pub reply: T
  , pub failure: Option<Failure>
}

impl<T> Dispatched<T>
{   pub fn is_fallback(&self) -> bool
    {   self.failure.is_some()
    }

    pub fn into_reply(self) -> T
    {   self.reply
    }
}

enum Outcome<T>
{   Reply(T)
  , Failed(Failure)
  , Rejected(String)
}

/// Resilient dispatcher for the tool server.
///
/// One attempt per call, bounded by the configured timeout. Any
/// classified failure is answered with the tool's local fallback; only
/// a request the server rejects as malformed comes back as an error.
pub struct ToolClient
{   base_url: String
  , timeout: Duration
  , http: reqwest::Client
}

impl ToolClient
{   pub fn new(config: crate::config::DispatcherConfig)
      -> Result<Self, crate::error::Error>
    {   debug!("Creating ToolClient for: {}", config.base_url);
        let http = reqwest::Client::builder()
          .build()
          .map_err(|e| {
            error!("HTTP client build failed: {}", e);
            crate::error::Error::InvalidConfiguration(e.to_string())
          })?;
        Ok(ToolClient
        {   base_url: config.base_url.trim_end_matches('/').to_string()
          , timeout: Duration::from_secs(config.timeout_secs)
          , http
        })
    }

    /// Override the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self
    {   self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str
    {   &self.base_url
    }

    pub async fn check_grammar(
      &self
    , text: &str
    , mode: Option<&str>
    ) -> Result<Dispatched<GrammarReply>, crate::error::Error>
    {   let mut request = ToolRequest::new(text);
        request.mode = mode.map(str::to_string);
        self.dispatch(ToolKind::GrammarChecker, &request, || {
          crate::fallback::grammar(text)
        }).await
    }

    pub async fn check_readability(
      &self
    , text: &str
    ) -> Result<Dispatched<ReadabilityReply>, crate::error::Error>
    {   let request = ToolRequest::new(text);
        self.dispatch(ToolKind::ReadabilityChecker, &request, || {
          crate::fallback::readability(text)
        }).await
    }

    pub async fn paraphrase(
      &self
    , text: &str
    , mode: Option<&str>
    ) -> Result<Dispatched<ParaphraseReply>, crate::error::Error>
    {   let mut request = ToolRequest::new(text);
        request.mode = mode.map(str::to_string);
        self.dispatch(ToolKind::Paraphraser, &request, || {
          crate::fallback::paraphrase(text)
        }).await
    }

    pub async fn summarize(
      &self
    , text: &str
    , mode: Option<&str>
    ) -> Result<Dispatched<SummaryReply>, crate::error::Error>
    {   let mut request = ToolRequest::new(text);
        request.mode = mode.map(str::to_string);
        self.dispatch(ToolKind::Summarizer, &request, || {
          crate::fallback::summary(text)
        }).await
    }

    pub async fn translate(
      &self
    , text: &str
    , target_language: &str
    ) -> Result<Dispatched<TranslationReply>, crate::error::Error>
    {   let request = ToolRequest::new(text)
          .with_target_language(target_language);
        self.dispatch(ToolKind::Translator, &request, || {
          crate::fallback::translation(text, target_language)
        }).await
    }

    pub async fn convert_tone(
      &self
    , text: &str
    , tone: &str
    ) -> Result<Dispatched<ToneReply>, crate::error::Error>
    {   let request = ToolRequest::new(text).with_tone(tone);
        self.dispatch(ToolKind::ToneConverter, &request, || {
          crate::fallback::tone(text, tone)
        }).await
    }

    pub async fn humanize(
      &self
    , text: &str
    , mode: Option<&str>
    ) -> Result<Dispatched<HumanizeReply>, crate::error::Error>
    {   let mut request = ToolRequest::new(text);
        request.mode = mode.map(str::to_string);
        self.dispatch(ToolKind::Humanizer, &request, || {
          crate::fallback::humanize(text)
        }).await
    }

    pub async fn rewrite_article(
      &self
    , text: &str
    , mode: Option<&str>
    , keyword: Option<&str>
    ) -> Result<Dispatched<RewriteReply>, crate::error::Error>
    {   let mut request = ToolRequest::new(text);
        request.mode = mode.map(str::to_string);
        request.keyword = keyword.map(str::to_string);
        self.dispatch(ToolKind::ArticleRewriter, &request, || {
          crate::fallback::rewrite(text)
        }).await
    }

    /// Post `request` to the tool's route and settle on a reply.
    pub async fn dispatch<T, F>(
      &self
    , kind: ToolKind
    , request: &ToolRequest
    , fallback: F
    ) -> Result<Dispatched<T>, crate::error::Error>
    where T: DeserializeOwned
        , F: FnOnce() -> T
    {   match self.attempt(kind, request).await
        {   Outcome::Reply(reply) => {
              debug!("{} answered", kind.slug());
              Ok(Dispatched { reply, failure: None })
            }
          , Outcome::Failed(failure) => {
              warn!("{} failed ({}); using fallback", kind.slug(), failure);
              Ok(Dispatched { reply: fallback(), failure: Some(failure) })
            }
          , Outcome::Rejected(message) => {
              debug!("{} rejected request: {}", kind.slug(), message);
              Err(crate::error::Error::InvalidRequest(message))
            }
        }
    }

    async fn attempt<T>(&self, kind: ToolKind, request: &ToolRequest)
      -> Outcome<T>
    where T: DeserializeOwned
    {   let url = format!("{}{}", self.base_url, kind.route());
        trace!("POST {}", url);

        let call = async {
          let response = self.http
            .post(&url)
            .json(request)
            .send()
            .await?;
          let status = response.status().as_u16();
          let body = response.text().await?;
          Ok::<_, reqwest::Error>((status, body))
        };

        // Dropping the future on timeout cancels the in-flight request
        let (status, body) = match tokio::time::timeout(self.timeout, call).await
        {   Err(_) => {
              error!("{} timed out after {:?}", kind.slug(), self.timeout);
              return Outcome::Failed(Failure::Timeout);
            }
          , Ok(Err(e)) => {
              error!("{} transport error: {}", kind.slug(), e);
              return Outcome::Failed(Failure::from_transport(&e));
            }
          , Ok(Ok(answer)) => answer
        };

        trace!("{} answered {}", kind.slug(), status);
        if (200..300).contains(&status)
        {   return match serde_json::from_str::<T>(&body)
            {   Ok(reply) => Outcome::Reply(reply)
              , Err(e) => {
                  error!("{} reply unreadable: {}", kind.slug(), e);
                  Outcome::Failed(Failure::NetworkError)
                }
            };
        }

        if status == 400
        {   let message = serde_json::from_str::<ErrorResponse>(&body)
              .map(|e| e.error)
              .unwrap_or_else(|_| "Invalid request".to_string());
            return Outcome::Rejected(message);
        }

        Outcome::Failed(Failure::from_status(status, &body))
    }
}

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use async_trait::async_trait;
use log::{debug, trace, error, info};

pub const GEMINI_API_BASE: &str
  = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

// ===== Message Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part
{   #[serde(default)]
    pub text: String
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content
{   #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>
  , #[serde(default)]
    pub parts: Vec<Part>
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig
{   #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<usize>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest
{   pub contents: Vec<Content>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse
{   #[serde(default)]
    pub candidates: Vec<Candidate>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate
{   #[serde(default)]
    pub content: Option<Content>
  , #[serde(default)]
    pub finish_reason: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiErrorBody
{   pub error: GeminiErrorDetail
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiErrorDetail
{   #[serde(default)]
    pub code: u16
  , #[serde(default)]
    pub message: String
  , #[serde(default)]
    pub status: String
}

impl GenerateContentResponse
{   /// Concatenated text of the first candidate
    pub fn first_text(&self) -> Option<String>
    {   let candidate = self.candidates.first()?;
        let content = candidate.content.as_ref()?;
        Some(
          content.parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("")
        )
    }
}

// ===== Gemini Client Actor =====

pub type SendPromptReply = Result<String, crate::error::Error>;

/// Commands for GeminiClient actor
pub enum GeminiCommand
{   SendPrompt
    {   prompt: String
      , reply: oneshot::Sender<SendPromptReply>
    }
  , SetApiKey
    {   key: String
      , reply: oneshot::Sender<Result<(), crate::error::Error>>
    }
  , Shutdown
}

/// Gemini client state
#[derive(Clone)]
pub struct GeminiClientState
{   api_key: Option<String>
  , config: crate::config::LlmConfig
  , http_client: reqwest::Client
}

impl GeminiClientState
{   pub fn new(
      api_key: Option<String>
    , config: crate::config::LlmConfig
    ) -> Self
    {   debug!("Creating GeminiClientState for: {}", config.model);
        GeminiClientState
        {   api_key
          , config
          , http_client: reqwest::Client::new()
        }
    }

    fn get_api_key(&self) -> Result<String, crate::error::Error>
    {   self.api_key.clone().ok_or_else(|| {
          error!("No API key for model: {}", self.config.model);
          crate::error::Error::MissingApiKey(
            format!("Gemini:{}", self.config.model)
          )
        })
    }

    async fn handle_send_prompt(
      &self
    , prompt: String
    ) -> Result<String, crate::error::Error>
    {   debug!("Handling send_prompt for: {}", self.config.model);

        let api_key = self.get_api_key()?;

        let request = GenerateContentRequest
        {   contents: vec![
              Content
              {   role: Some("user".to_string())
                , parts: vec![Part { text: prompt }]
              }
            ]
          , generation_config: Some(GenerationConfig
            {   max_output_tokens: Some(self.config.max_output_tokens)
              , temperature: Some(self.config.temperature)
            })
        };

        trace!("Gemini request: {:?}", request);

        let response = self.http_client
          .post(format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
          ))
          .header("x-goog-api-key", api_key)
          .header("Content-Type", "application/json")
          .json(&request)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            if e.is_timeout()
            {   crate::error::Error::Timeout
            } else
            {   crate::error::Error::HttpError(e.to_string())
            }
          })?;

        let status = response.status();
        trace!("Gemini response status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!("Gemini API error ({}): {}", status, error_text);
            if status.as_u16() == 429
            {   return Err(crate::error::Error::RateLimitExceeded);
            }
            let message = serde_json::from_str::<GeminiErrorBody>(
                &error_text
              )
              .map(|body| body.error.message)
              .unwrap_or(error_text);
            let message = if status.as_u16() == 503
              && !message.to_lowercase().contains("overloaded")
            {   format!("Service Unavailable: {}", message)
            } else
            {   message
            };
            return Err(crate::error::Error::ApiError(message));
        }

        let body: GenerateContentResponse
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            crate::error::Error::ParseError(e.to_string())
          })?;

        let text = body.first_text()
          .ok_or_else(|| {
            error!("No candidates in response");
            crate::error::Error::NoCandidatesInResponse
          })?;

        if text.trim().is_empty()
        {   error!("Empty completion from {}", self.config.model);
            return Err(crate::error::Error::EmptyResponse);
        }
        Ok(text)
    }
}

/// Public Gemini client interface
pub struct GeminiClient
{   tx: mpsc::UnboundedSender<GeminiCommand>
  , _task: tokio::task::JoinHandle<()>
}

impl GeminiClient
{   /// Create and spawn a new Gemini client
    pub fn new(
      api_key: Option<String>
    , config: crate::config::LlmConfig
    ) -> Self
    {   debug!("Creating GeminiClient");
        let (cmd_tx, cmd_rx)
          = mpsc::unbounded_channel();

        let _task = tokio::spawn(async move {
          run_gemini_loop(cmd_rx, api_key, config).await;
        });

        GeminiClient
        {   tx: cmd_tx
          , _task
        }
    }

    /// Queue a prompt - returns immediately
    pub fn send_prompt(
      &self
    , prompt: String
    , reply: oneshot::Sender<SendPromptReply>
    ) -> Result<(), crate::error::Error>
    {   debug!("send_prompt queued ({} chars)", prompt.len());

        self.tx.send(GeminiCommand::SendPrompt {
          prompt,
          reply,
        }).map_err(|_| {
          error!("Gemini client disconnected");
          crate::error::Error::Other(
            "Gemini client disconnected".to_string()
          )
        })
    }

    /// Replace the API key used for later prompts
    pub async fn set_api_key(
      &self
    , key: String
    ) -> Result<(), crate::error::Error>
    {   debug!("set_api_key queued");
        let (reply, reply_rx) = oneshot::channel();

        self.tx.send(GeminiCommand::SetApiKey {
          key,
          reply,
        }).map_err(|_| {
          error!("Gemini client disconnected");
          crate::error::Error::Other(
            "Gemini client disconnected".to_string()
          )
        })?;

        reply_rx.await.map_err(|_| {
          crate::error::Error::Other(
            "Gemini client dropped reply".to_string()
          )
        })?
    }

    /// Shutdown the client
    pub fn shutdown(self)
      -> Result<(), crate::error::Error>
    {   debug!("Shutting down GeminiClient");
        self.tx.send(GeminiCommand::Shutdown)
          .map_err(|_| {
            crate::error::Error::Other(
              "Client already shutdown".to_string()
            )
          })
    }
}

#[async_trait]
impl crate::providers::Completer for GeminiClient
{   async fn complete(&self, prompt: String)
      -> Result<String, crate::error::Error>
    {   let (reply_tx, reply_rx) = oneshot::channel();
        self.send_prompt(prompt, reply_tx)?;
        reply_rx.await.map_err(|_| {
          error!("Gemini client dropped reply");
          crate::error::Error::Other(
            "Gemini client dropped reply".to_string()
          )
        })?
    }
}

/// Main gemini event loop
///
/// Each prompt runs on its own task so a slow completion never holds
/// up the commands queued behind it.
async fn run_gemini_loop(
  mut cmd_rx: mpsc::UnboundedReceiver<GeminiCommand>
, api_key: Option<String>
, config: crate::config::LlmConfig
)
{   debug!("Starting Gemini client loop");
    let mut state = GeminiClientState::new(api_key, config);

    loop
    { match cmd_rx.recv().await
      {   Some(GeminiCommand::SendPrompt { prompt, reply }) => {
            debug!("Processing SendPrompt");
            let worker = state.clone();
            tokio::spawn(async move {
              let result = worker.handle_send_prompt(prompt).await;
              let _ = reply.send(result);
            });
          }
        , Some(GeminiCommand::SetApiKey { key, reply }) => {
            debug!("Processing SetApiKey");
            state.api_key = Some(key);
            let _ = reply.send(Ok(()));
          }
        , Some(GeminiCommand::Shutdown) => {
            info!("Gemini client shutting down");
            break;
          }
        , None => {
            debug!("Command channel closed");
            break;
          }
      }
    }
}

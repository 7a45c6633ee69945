use std::fmt;
use serde::{Deserialize, Serialize};

/// Custom error type for wordsmith operations
/// Implements Clone for sending through channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// API key is missing for the LLM provider
    MissingApiKey(String)
  , /// HTTP transport error
    HttpError(String)
  , /// API returned an error response
    ApiError(String)
  , /// Failed to parse API response
    ParseError(String)
  , /// No candidates in the completion response
    NoCandidatesInResponse
  , /// Completion came back as an empty string
    EmptyResponse
  , /// Rate limit or quota exceeded
    RateLimitExceeded
  , /// Caller sent a malformed tool request
    InvalidRequest(String)
  , /// Webhook signature missing or wrong
    InvalidSignature
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Timeout error
    Timeout
  , /// Generic error
    Other(String)
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingApiKey(provider) => {
              write!(f, "Missing API key for: {}", provider)
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError(msg) => {
              write!(f, "API error: {}", msg)
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::NoCandidatesInResponse => {
              write!(f, "API response contained no candidates")
            }
          , Error::EmptyResponse => {
              write!(f, "API returned an empty completion")
            }
          , Error::RateLimitExceeded => {
              write!(f, "API rate limit exceeded")
            }
          , Error::InvalidRequest(msg) => {
              write!(f, "{}", msg)
            }
          , Error::InvalidSignature => {
              write!(f, "Invalid webhook signature")
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}

/// Error codes surfaced to API callers as `{error, code}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode
{   InvalidApiKey
  , QuotaExceeded
  , Timeout
  , ServiceUnavailable
  , UnknownError
}

impl ErrorCode
{   /// Classify an error, typed variants first, then by message content.
    pub fn classify(err: &Error) -> Self
    {   match err
        {   Error::Timeout => return ErrorCode::Timeout
          , Error::RateLimitExceeded => return ErrorCode::QuotaExceeded
          , Error::MissingApiKey(_) => return ErrorCode::InvalidApiKey
          , _ => {}
        }

        let msg = err.to_string().to_lowercase();
        if msg.contains("api key")
        {   ErrorCode::InvalidApiKey
        } else if msg.contains("quota") || msg.contains("rate limit")
        {   ErrorCode::QuotaExceeded
        } else if msg.contains("timeout") || msg.contains("timed out")
        {   ErrorCode::Timeout
        } else if msg.contains("model is overloaded")
          || msg.contains("service unavailable")
        {   ErrorCode::ServiceUnavailable
        } else
        {   ErrorCode::UnknownError
        }
    }

    pub fn as_str(&self) -> &'static str
    {   match self
        {   ErrorCode::InvalidApiKey => "INVALID_API_KEY"
          , ErrorCode::QuotaExceeded => "QUOTA_EXCEEDED"
          , ErrorCode::Timeout => "TIMEOUT"
          , ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE"
          , ErrorCode::UnknownError => "UNKNOWN_ERROR"
        }
    }

    /// HTTP status the server answers with for this code
    pub fn http_status(&self) -> u16
    {   match self
        {   ErrorCode::InvalidApiKey => 500
          , ErrorCode::QuotaExceeded => 429
          , ErrorCode::Timeout => 504
          , ErrorCode::ServiceUnavailable => 503
          , ErrorCode::UnknownError => 500
        }
    }

    /// Message shown to the end user
    pub fn user_message(&self) -> &'static str
    {   match self
        {   ErrorCode::InvalidApiKey => {
              "The AI service is misconfigured. Please contact support."
            }
          , ErrorCode::QuotaExceeded => {
              "API quota exceeded. Please try again later."
            }
          , ErrorCode::Timeout => {
              "The request timed out. Please try again."
            }
          , ErrorCode::ServiceUnavailable => {
              "The AI model is currently overloaded. Please try again in a few moments."
            }
          , ErrorCode::UnknownError => {
              "An unexpected error occurred while processing your request."
            }
        }
    }
}

impl fmt::Display for ErrorCode
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.as_str())
    }
}

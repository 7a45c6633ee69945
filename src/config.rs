//! Configuration for the tool server, the LLM provider and the client
//! dispatcher

use serde::{Deserialize, Serialize};
use log::{debug, warn};

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig
{   /// API base URL
    pub api_base: String
  , /// Model name
    pub model: String
  , /// Upper bound on a single completion, in seconds
    pub timeout_secs: u64
  , /// Max tokens the model may generate
    pub max_output_tokens: usize
  , /// Sampling temperature
    pub temperature: f32
}

impl Default for LlmConfig
{   fn default() -> Self
    {   LlmConfig
        {   api_base: crate::providers::gemini::GEMINI_API_BASE
              .to_string()
          , model: crate::providers::gemini::DEFAULT_MODEL
              .to_string()
          , timeout_secs: 15
          , max_output_tokens: 2048
          , temperature: 0.7
        }
    }
}

/// Rate admission window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateConfig
{   /// Requests admitted per window
    pub max_requests: usize
  , /// Window length in seconds
    pub window_secs: u64
}

impl Default for RateConfig
{   fn default() -> Self
    {   RateConfig
        {   max_requests: 1000
          , window_secs: 3600
        }
    }
}

/// Client dispatcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig
{   /// Base URL of the tool server
    pub base_url: String
  , /// Request timeout in seconds
    pub timeout_secs: u64
}

impl Default for DispatcherConfig
{   fn default() -> Self
    {   DispatcherConfig
        {   base_url: "http://localhost:5000".to_string()
          , timeout_secs: 30
        }
    }
}

/// Deployment environment, from `NODE_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment
{   Production
  , Development
}

impl Environment
{   pub fn parse(value: Option<&str>) -> Self
    {   match value.map(|v| v.trim().to_lowercase())
        {   Some(v) if v == "production" => Environment::Production
          , _ => Environment::Development
        }
    }

    pub fn is_production(&self) -> bool
    {   *self == Environment::Production
    }
}

/// Tool server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig
{   pub gemini_api_key: Option<String>
  , pub port: u16
  , pub frontend_url: String
  , pub supabase_url: Option<String>
  , pub supabase_service_role_key: Option<String>
  , pub lemon_squeezy_signing_secret: Option<String>
  , pub environment: Environment
  , pub llm: LlmConfig
  , pub rate: RateConfig
}

impl Default for ServerConfig
{   fn default() -> Self
    {   ServerConfig
        {   gemini_api_key: None
          , port: 5000
          , frontend_url: "http://localhost:3000".to_string()
          , supabase_url: None
          , supabase_service_role_key: None
          , lemon_squeezy_signing_secret: None
          , environment: Environment::Development
          , llm: LlmConfig::default()
          , rate: RateConfig::default()
        }
    }
}

impl ServerConfig
{   /// Load from the process environment (after `.env`, if any)
    pub fn from_env() -> Result<Self, crate::error::Error>
    {   match dotenvy::dotenv()
        {   Ok(path) => debug!("Loaded env file: {}", path.display())
          , Err(e) => debug!("No env file loaded: {}", e)
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F)
      -> Result<Self, crate::error::Error>
    where F: Fn(&str) -> Option<String>
    {   let var = |name: &str| {
          lookup(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        };

        let mut config = ServerConfig::default();
        config.gemini_api_key = var("GEMINI_API_KEY");
        if config.gemini_api_key.is_none()
        {   warn!("GEMINI_API_KEY is not set; tool calls will fail");
        }

        if let Some(port) = var("PORT")
        {   config.port = port.parse().map_err(|_| {
              crate::error::Error::InvalidConfiguration(
                format!("PORT must be a port number, got {:?}", port)
              )
            })?;
        }
        if let Some(url) = var("FRONTEND_URL")
        {   config.frontend_url = url;
        }
        if let Some(model) = var("GEMINI_MODEL")
        {   config.llm.model = model;
        }

        config.supabase_url = var("SUPABASE_URL");
        config.supabase_service_role_key
          = var("SUPABASE_SERVICE_ROLE_KEY");
        config.lemon_squeezy_signing_secret
          = var("LEMON_SQUEEZY_SIGNING_SECRET");
        config.environment
          = Environment::parse(var("NODE_ENV").as_deref());

        Ok(config)
    }

    pub fn supabase_configured(&self) -> bool
    {   self.supabase_url.is_some()
          && self.supabase_service_role_key.is_some()
    }
}

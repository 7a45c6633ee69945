//! Request and reply types shared by the server and the client dispatcher

use serde::{Deserialize, Deserializer, Serialize};

/// Body of every tool call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRequest
{   /// Raw user text, may contain HTML from the editor
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String
  , /// Tool-specific mode (e.g. "bullet", "advanced")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>
  , /// Translator only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>
  , /// Tone converter only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>
  , /// Article rewriter SEO mode only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>
}

/// `"text": null` reads as missing text, not a malformed body
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where D: Deserializer<'de>
{   Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ToolRequest
{   pub fn new(text: impl Into<String>) -> Self
    {   ToolRequest
        {   text: text.into()
          , ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self
    {   self.mode = Some(mode.into());
        self
    }

    pub fn with_target_language(
      mut self
    , language: impl Into<String>
    ) -> Self
    {   self.target_language = Some(language.into());
        self
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self
    {   self.tone = Some(tone.into());
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self
    {   self.keyword = Some(keyword.into());
        self
    }
}

/// A single grammar fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction
{   pub original: String
  , pub corrected: String
  , /// Highlight color for the UI
    pub color: String
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarReply
{   pub original_text: String
  , pub corrected_text: String
  , pub corrections: Vec<Correction>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilityScores
{   /// Flesch-Kincaid reading ease, 0-100
    pub flesch_kincaid: f64
  , /// Gunning Fog index, 0-20
    pub gunning_fog: f64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilityReply
{   pub readability_analysis: String
  , pub scores: ReadabilityScores
  , pub improvement_points: Vec<String>
  , pub revised_example: String
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParaphraseReply
{   pub paraphrased_text: String
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReply
{   pub summary: String
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationReply
{   pub translated_text: String
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneReply
{   pub converted_text: String
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizeReply
{   pub humanized_text: String
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteReply
{   pub rewritten_text: String
}

/// Error body returned by every failing tool route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse
{   pub error: String
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<crate::error::ErrorCode>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_rate_limited: Option<bool>
}

impl ErrorResponse
{   pub fn invalid(message: impl Into<String>) -> Self
    {   ErrorResponse
        {   error: message.into()
          , code: None
          , is_rate_limited: None
        }
    }

    pub fn coded(code: crate::error::ErrorCode) -> Self
    {   ErrorResponse
        {   error: code.user_message().to_string()
          , code: Some(code)
          , is_rate_limited: None
        }
    }

    pub fn rate_limited() -> Self
    {   ErrorResponse
        {   error: "Too many requests. Please try again later."
              .to_string()
          , code: None
          , is_rate_limited: Some(true)
        }
    }
}

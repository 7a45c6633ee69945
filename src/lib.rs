pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod prompt;
pub mod parse;
pub mod rate;
pub mod adapter;
pub mod fallback;
pub mod client;
pub mod webhook;
pub mod server;
use serde::{Deserialize, Serialize};

/*

wordsmith: the text-tool layer behind the writing assistant.

  server side:  ToolRequest -> prompt -> LLM (15s) -> labeled-section
                parse -> StructuredReply, gated by a process-wide
                RateWindow
  client side:  ToolClient posts to the server (30s), classifies any
                failure and substitutes the tool's FallbackReply

*/

pub use adapter::ToolAdapter;
pub use client::{Dispatched, Failure, ToolClient};
pub use error::{Error, ErrorCode};
pub use providers::{Completer, GeminiClient};
pub use rate::RateWindow;
pub use request::*;

/// Every text tool the server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind
{   GrammarChecker
  , ReadabilityChecker
  , Paraphraser
  , Summarizer
  , Translator
  , ToneConverter
  , Humanizer
  , ArticleRewriter
}

impl ToolKind
{   pub const ALL: [ToolKind; 8] =
      [ ToolKind::GrammarChecker
      , ToolKind::ReadabilityChecker
      , ToolKind::Paraphraser
      , ToolKind::Summarizer
      , ToolKind::Translator
      , ToolKind::ToneConverter
      , ToolKind::Humanizer
      , ToolKind::ArticleRewriter
      ];

    /// Path segment under `/api/tools/`
    pub fn slug(&self) -> &'static str
    {   match self
        {   ToolKind::GrammarChecker => "grammar-checker"
          , ToolKind::ReadabilityChecker => "readability-checker"
          , ToolKind::Paraphraser => "paraphraser"
          , ToolKind::Summarizer => "summarizer"
          , ToolKind::Translator => "translator"
          , ToolKind::ToneConverter => "tone-converter"
          , ToolKind::Humanizer => "humanizer"
          , ToolKind::ArticleRewriter => "article-rewriter"
        }
    }

    pub fn route(&self) -> String
    {   format!("/api/tools/{}", self.slug())
    }

    /// Human-readable name used in notices
    pub fn label(&self) -> &'static str
    {   match self
        {   ToolKind::GrammarChecker => "Grammar Checker"
          , ToolKind::ReadabilityChecker => "Readability Checker"
          , ToolKind::Paraphraser => "Paraphraser"
          , ToolKind::Summarizer => "Summarizer"
          , ToolKind::Translator => "Translator"
          , ToolKind::ToneConverter => "Tone Converter"
          , ToolKind::Humanizer => "AI Humanizer"
          , ToolKind::ArticleRewriter => "Article Rewriter"
        }
    }
}

//! Prompt/response adapter: one operation per tool.
//!
//! Every operation validates the request, builds the tool's prompt,
//! calls the completer under a hard timeout and turns the free-text
//! reply into the tool's structured reply.

use std::sync::Arc;
use std::time::Duration;
use log::{debug, error, info, trace};

use crate::error::Error;
use crate::parse;
use crate::prompt::{self, GrammarMode, HumanizeMode, ParaphraseMode, RewriteMode, SummaryMode};
use crate::providers::Completer;
use crate::request::*;

/// Inputs shorter than this skip the readability model call
pub const MIN_READABILITY_CHARS: usize = 10;

pub const PERFECT_GRAMMAR_MESSAGE: &str
  = "Perfect grammar! No corrections needed.";

pub struct ToolAdapter
{   completer: Arc<dyn Completer>
  , timeout: Duration
}

impl ToolAdapter
{   pub fn new(completer: Arc<dyn Completer>, timeout: Duration) -> Self
    {   debug!("Creating ToolAdapter with {:?} timeout", timeout);
        ToolAdapter
        {   completer
          , timeout
        }
    }

    pub fn from_config(
      completer: Arc<dyn Completer>
    , config: &crate::config::LlmConfig
    ) -> Self
    {   ToolAdapter::new(completer, Duration::from_secs(config.timeout_secs))
    }

    pub async fn check_grammar(&self, request: &ToolRequest)
      -> Result<GrammarReply, Error>
    {   let text = required_text(request)?;
        let mode = GrammarMode::parse(request.mode.as_deref());
        let reply = self.complete(prompt::grammar_prompt(&text, mode)).await?;
        let parsed = parse::parse_grammar(&reply, &text);

        let message = if parsed.corrections.is_empty()
        {   Some(PERFECT_GRAMMAR_MESSAGE.to_string())
        } else
        {   None
        };
        Ok(GrammarReply
        {   original_text: text
          , corrected_text: parsed.corrected_text
          , corrections: parsed.corrections
          , message
        })
    }

    pub async fn check_readability(&self, request: &ToolRequest)
      -> Result<ReadabilityReply, Error>
    {   let text = required_text(request)?;
        if text.trim().chars().count() < MIN_READABILITY_CHARS
        {   info!("Readability input too short; skipping model call");
            return Ok(short_text_readability(&text));
        }
        let reply = self.complete(prompt::readability_prompt(&text)).await?;
        Ok(parse::parse_readability(&reply, &text))
    }

    pub async fn paraphrase(&self, request: &ToolRequest)
      -> Result<ParaphraseReply, Error>
    {   let text = required_text(request)?;
        let mode = ParaphraseMode::parse(request.mode.as_deref());
        let reply = self.complete(prompt::paraphrase_prompt(&text, mode)).await?;
        Ok(ParaphraseReply
        {   paraphrased_text: parse::plain_text(&reply)
        })
    }

    pub async fn summarize(&self, request: &ToolRequest)
      -> Result<SummaryReply, Error>
    {   let text = required_text(request)?;
        let mode = SummaryMode::parse(request.mode.as_deref());
        let reply = self.complete(prompt::summary_prompt(&text, mode)).await?;
        Ok(SummaryReply
        {   summary: parse::plain_text(&reply)
        })
    }

    pub async fn translate(&self, request: &ToolRequest)
      -> Result<TranslationReply, Error>
    {   let text = required_text(request)?;
        let language = required_field(
          request.target_language.as_deref()
        , "Target language is required"
        )?;
        let reply = self
          .complete(prompt::translation_prompt(&text, &language))
          .await?;
        Ok(TranslationReply
        {   translated_text: parse::plain_text(&reply)
        })
    }

    pub async fn convert_tone(&self, request: &ToolRequest)
      -> Result<ToneReply, Error>
    {   let text = required_text(request)?;
        let tone = required_field(request.tone.as_deref(), "Tone is required")?;
        let reply = self.complete(prompt::tone_prompt(&text, &tone)).await?;
        Ok(ToneReply
        {   converted_text: parse::plain_text(&reply)
        })
    }

    pub async fn humanize(&self, request: &ToolRequest)
      -> Result<HumanizeReply, Error>
    {   let text = required_text(request)?;
        let mode = HumanizeMode::parse(request.mode.as_deref());
        let reply = self.complete(prompt::humanize_prompt(&text, mode)).await?;
        Ok(HumanizeReply
        {   humanized_text: parse::clean_generated_text(&reply)
        })
    }

    pub async fn rewrite_article(&self, request: &ToolRequest)
      -> Result<RewriteReply, Error>
    {   let text = required_text(request)?;
        let mode = RewriteMode::parse(request.mode.as_deref());
        let keyword = if mode == RewriteMode::Seo
        {   Some(required_field(
              request.keyword.as_deref()
            , "Keyword is required for SEO mode"
            )?)
        } else
        {   None
        };
        let reply = self
          .complete(prompt::rewrite_prompt(&text, mode, keyword.as_deref()))
          .await?;
        Ok(RewriteReply
        {   rewritten_text: parse::clean_generated_text(&reply)
        })
    }

    /// One bounded completion; empty output counts as failure.
    async fn complete(&self, prompt: String) -> Result<String, Error>
    {   trace!("Prompt ({} chars)", prompt.len());
        let reply = tokio::time::timeout(
            self.timeout
          , self.completer.complete(prompt)
          )
          .await
          .map_err(|_| {
            error!("Completion exceeded {:?}", self.timeout);
            Error::Timeout
          })??;

        if reply.trim().is_empty()
        {   error!("Completion came back empty");
            return Err(Error::EmptyResponse);
        }
        debug!("Completion received ({} chars)", reply.len());
        Ok(reply)
    }
}

/// Input text with markup removed; must not be empty
pub fn required_text(request: &ToolRequest) -> Result<String, Error>
{   let text = prompt::strip_html(&request.text);
    if text.trim().is_empty()
    {   return Err(Error::InvalidRequest("Text is required".to_string()));
    }
    Ok(text)
}

fn required_field(value: Option<&str>, message: &str)
  -> Result<String, Error>
{   value
      .map(str::trim)
      .filter(|v| !v.is_empty())
      .map(str::to_string)
      .ok_or_else(|| Error::InvalidRequest(message.to_string()))
}

/// Canned reply for inputs too short to analyze
pub fn short_text_readability(text: &str) -> ReadabilityReply
{   ReadabilityReply
    {   readability_analysis: "This text is very short, so it is easy to \
          read. Add a few complete sentences for a more meaningful \
          readability analysis."
          .to_string()
      , scores: ReadabilityScores
        {   flesch_kincaid: 100.0
          , gunning_fog: 0.0
        }
      , improvement_points: vec![
          "Add more content to get a detailed readability analysis."
            .to_string()
        ]
      , revised_example: text.trim().to_string()
    }
}

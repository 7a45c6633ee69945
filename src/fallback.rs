//! Local fallback replies for when the tool server cannot answer.
//!
//! Every generator returns the same reply type as the live tool, with
//! an HTML "Service Temporarily Unavailable" notice in the main text
//! field. Output depends only on the arguments.

use crate::request::*;
use crate::ToolKind;

/// Escape text for embedding in the notice markup
pub fn escape_html(text: &str) -> String
{   let mut out = String::with_capacity(text.len());
    for c in text.chars()
    {   match c
        {   '&' => out.push_str("&amp;")
          , '<' => out.push_str("&lt;")
          , '>' => out.push_str("&gt;")
          , '"' => out.push_str("&quot;")
          , '\'' => out.push_str("&#39;")
          , _ => out.push(c)
        }
    }
    out
}

/// The notice block shared by every fallback
pub fn unavailable_notice(tool: ToolKind, detail: &str, text: &str) -> String
{   format!(
      "<div class=\"service-notice\">\
       <h3>Service Temporarily Unavailable</h3>\
       <p>The {tool} is experiencing high demand right now. {detail}</p>\
       <p>Please try again in a few moments by clicking <strong>Process</strong>.</p>\
       <div class=\"original-text\"><h4>Your original text:</h4><p>{text}</p></div>\
       </div>",
      tool = tool.label(),
      detail = escape_html(detail),
      text = escape_html(text.trim()),
    )
}

pub fn grammar(text: &str) -> GrammarReply
{   GrammarReply
    {   original_text: text.to_string()
      , corrected_text: unavailable_notice(
          ToolKind::GrammarChecker
        , "We could not check your grammar this time."
        , text
        )
      , corrections: vec![]
      , message: Some(
          "Grammar checking is temporarily unavailable.".to_string()
        )
    }
}

pub fn readability(text: &str) -> ReadabilityReply
{   ReadabilityReply
    {   readability_analysis: unavailable_notice(
          ToolKind::ReadabilityChecker
        , "We could not analyze your text this time."
        , text
        )
      , scores: ReadabilityScores
        {   flesch_kincaid: crate::parse::DEFAULT_FLESCH_KINCAID
          , gunning_fog: crate::parse::DEFAULT_GUNNING_FOG
        }
      , improvement_points: vec![
          "Readability suggestions will be available once the service recovers."
            .to_string()
        ]
      , revised_example: text.to_string()
    }
}

pub fn paraphrase(text: &str) -> ParaphraseReply
{   ParaphraseReply
    {   paraphrased_text: unavailable_notice(
          ToolKind::Paraphraser
        , "We could not paraphrase your text this time."
        , text
        )
    }
}

pub fn summary(text: &str) -> SummaryReply
{   SummaryReply
    {   summary: unavailable_notice(
          ToolKind::Summarizer
        , "We could not summarize your text this time."
        , text
        )
    }
}

pub fn translation(text: &str, target_language: &str) -> TranslationReply
{   TranslationReply
    {   translated_text: unavailable_notice(
          ToolKind::Translator
        , &format!(
            "We could not translate your text into {} this time.",
            target_language.trim()
          )
        , text
        )
    }
}

pub fn tone(text: &str, tone: &str) -> ToneReply
{   ToneReply
    {   converted_text: unavailable_notice(
          ToolKind::ToneConverter
        , &format!(
            "We could not convert your text to a {} tone this time.",
            tone.trim()
          )
        , text
        )
    }
}

pub fn humanize(text: &str) -> HumanizeReply
{   HumanizeReply
    {   humanized_text: unavailable_notice(
          ToolKind::Humanizer
        , "We could not humanize your text this time."
        , text
        )
    }
}

pub fn rewrite(text: &str) -> RewriteReply
{   RewriteReply
    {   rewritten_text: unavailable_notice(
          ToolKind::ArticleRewriter
        , "We could not rewrite your article this time."
        , text
        )
    }
}

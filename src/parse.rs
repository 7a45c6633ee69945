//! Extraction of structured fields from free-text model replies.
//!
//! Multi-field replies are laid out as `LABEL: content` sections, each
//! label opening its own line. A section's content runs until the next
//! known label or the end of the reply. Every field has a default, so a
//! parsed reply is always fully populated no matter what the model
//! returned.

use std::collections::HashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use log::{debug, trace};

pub const DEFAULT_FLESCH_KINCAID: f64 = 50.0;
pub const DEFAULT_GUNNING_FOG: f64 = 10.0;

pub const DEFAULT_ANALYSIS: &str
  = "A detailed readability analysis could not be generated for this text.";

pub const DEFAULT_IMPROVEMENT_POINT: &str
  = "Use shorter sentences and familiar words to make the text easier to read.";

/// Highlight colors handed out to corrections in order
pub const CORRECTION_COLORS: [&str; 5]
  = ["#ffeb3b", "#ff9800", "#4caf50", "#2196f3", "#e91e63"];

static GRAMMAR_LABELS: Lazy<Regex> = Lazy::new(|| {
  label_pattern(&["CORRECTED_TEXT", "CORRECTIONS"])
});

static READABILITY_LABELS: Lazy<Regex> = Lazy::new(|| {
  label_pattern(&[
    "READABILITY_ANALYSIS",
    "FLESCH_KINCAID_SCORE",
    "GUNNING_FOG_INDEX",
    "IMPROVEMENT_POINTS",
    "REVISED_EXAMPLE",
  ])
});

static NUMBER: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"-?\d+(?:\.\d+)?").expect("number pattern")
});

static LIST_MARKER: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s*").expect("list marker pattern")
});

static ARROW: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"\s*(?:->|→|=>)\s*").expect("arrow pattern")
});

static LEADING_FILLER: Lazy<Regex> = Lazy::new(|| {
  Regex::new(
    r"(?i)^\s*(?:(?:sure|certainly|of course|absolutely)[!,.]\s*)?(?:here(?:'s| is| are)\b[^:\n]*:\s*)?"
  ).expect("filler pattern")
});

static BULLET: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?m)^[ \t]*(?:[-*•]|#{1,6})[ \t]+").expect("bullet pattern")
});

static EMPHASIS: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"\*+|__").expect("emphasis pattern")
});

static BLANK_RUN: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"\n{3,}").expect("blank run pattern")
});

/// Labels only count at the start of a line, optionally behind a
/// markdown heading or bold markers.
fn label_pattern(labels: &[&str]) -> Regex
{   Regex::new(&format!(
      r"(?im)^[ \t]*(?:#{{1,6}}[ \t]*)?\**\b({})\b\**[ \t]*:\**",
      labels.join("|")
    ))
    .expect("label pattern")
}

/// Labeled sections found in one reply, keyed by upper-case label
#[derive(Debug, Clone, Default)]
pub struct Sections
{   entries: HashMap<String, String>
}

impl Sections
{   /// Split `reply` at every match of `labels`. The first occurrence
    /// of a label wins.
    pub fn parse(reply: &str, labels: &Regex) -> Self
    {   let marks: Vec<(String, usize, usize)> = labels
          .captures_iter(reply)
          .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str().to_uppercase();
            Some((name, whole.start(), whole.end()))
          })
          .collect();

        let mut entries = HashMap::new();
        for (i, (name, _, content_start)) in marks.iter().enumerate()
        {   let content_end = marks.get(i + 1)
              .map(|(_, start, _)| *start)
              .unwrap_or(reply.len());
            let content = reply[*content_start..content_end]
              .trim()
              .trim_matches('*')
              .trim()
              .to_string();
            entries.entry(name.clone()).or_insert(content);
        }

        trace!("Parsed sections: {:?}", entries.keys());
        Sections { entries }
    }

    /// Non-empty content of a label
    pub fn get(&self, label: &str) -> Option<&str>
    {   self.entries
          .get(&label.to_uppercase())
          .map(|s| s.as_str())
          .filter(|s| !s.is_empty())
    }
}

// ===== Grammar =====

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedGrammar
{   pub corrected_text: String
  , pub corrections: Vec<crate::request::Correction>
}

/// Parse a grammar reply. Missing corrected text falls back to the
/// input; a missing or empty corrections section yields no corrections.
pub fn parse_grammar(reply: &str, original: &str) -> ParsedGrammar
{   let sections = Sections::parse(reply, &GRAMMAR_LABELS);

    let corrected_text = sections.get("CORRECTED_TEXT")
      .map(|s| s.to_string())
      .unwrap_or_else(|| original.to_string());

    let corrections = sections.get("CORRECTIONS")
      .map(parse_corrections)
      .unwrap_or_default();

    debug!("Grammar reply parsed: {} corrections", corrections.len());
    ParsedGrammar
    {   corrected_text
      , corrections
    }
}

/// `original -> corrected` lines; entries that change nothing are dropped.
pub fn parse_corrections(section: &str)
  -> Vec<crate::request::Correction>
{   section
      .lines()
      .filter_map(|line| {
        let line = LIST_MARKER.replace(line, "");
        let mut halves = ARROW.splitn(line.trim(), 2);
        let original = unquote(halves.next()?);
        let corrected = unquote(halves.next()?);
        if original.is_empty()
          || corrected.is_empty()
          || original == corrected
        {   return None;
        }
        Some((original, corrected))
      })
      .enumerate()
      .map(|(i, (original, corrected))| {
        crate::request::Correction
        {   original
          , corrected
          , color: CORRECTION_COLORS[i % CORRECTION_COLORS.len()]
              .to_string()
        }
      })
      .collect()
}

fn unquote(s: &str) -> String
{   s.trim()
      .trim_matches(|c| matches!(c, '"' | '\'' | '“' | '”' | '`'))
      .trim()
      .to_string()
}

// ===== Readability =====

/// Parse a readability reply into a fully populated reply.
pub fn parse_readability(reply: &str, original: &str)
  -> crate::request::ReadabilityReply
{   let sections = Sections::parse(reply, &READABILITY_LABELS);

    let flesch_kincaid = score(
      sections.get("FLESCH_KINCAID_SCORE")
    , DEFAULT_FLESCH_KINCAID
    , 100.0
    );
    let gunning_fog = score(
      sections.get("GUNNING_FOG_INDEX")
    , DEFAULT_GUNNING_FOG
    , 20.0
    );

    let mut improvement_points: Vec<String> = sections
      .get("IMPROVEMENT_POINTS")
      .map(|s| {
        s.lines()
          .map(|line| LIST_MARKER.replace(line, "").trim().to_string())
          .filter(|line| !line.is_empty())
          .collect()
      })
      .unwrap_or_default();
    if improvement_points.is_empty()
    {   improvement_points.push(DEFAULT_IMPROVEMENT_POINT.to_string());
    }

    crate::request::ReadabilityReply
    {   readability_analysis: sections.get("READABILITY_ANALYSIS")
          .unwrap_or(DEFAULT_ANALYSIS)
          .to_string()
      , scores: crate::request::ReadabilityScores
        {   flesch_kincaid
          , gunning_fog
        }
      , improvement_points
      , revised_example: sections.get("REVISED_EXAMPLE")
          .unwrap_or(original)
          .to_string()
    }
}

/// First number in `content`, clamped to `[0, max]`
fn score(content: Option<&str>, default: f64, max: f64) -> f64
{   content
      .and_then(|c| NUMBER.find(c))
      .and_then(|m| m.as_str().parse::<f64>().ok())
      .filter(|v| v.is_finite())
      .map(|v| v.clamp(0.0, max))
      .unwrap_or(default)
}

// ===== Free text =====

/// Trimmed single-field reply
pub fn plain_text(reply: &str) -> String
{   reply.trim().to_string()
}

/// Strip an introductory filler phrase and markdown list/emphasis
/// artifacts from a humanized or rewritten text.
pub fn clean_generated_text(reply: &str) -> String
{   let text = LEADING_FILLER.replace(reply.trim(), "");
    let text = BULLET.replace_all(&text, "");
    let text = EMPHASIS.replace_all(&text, "");
    BLANK_RUN.replace_all(text.trim(), "\n\n").into_owned()
}

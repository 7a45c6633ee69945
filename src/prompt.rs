//! Prompt templates for every tool.
//!
//! Each tool has one template per mode; an absent or unrecognised mode
//! selects the tool's default. The stripped user text is always
//! embedded verbatim at the end of the prompt.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?s)<[^>]*>").expect("tag pattern")
});

static BLOCK_TAG: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?i)<\s*(br\s*/?|/p|/div|/li|/h[1-6])\s*>")
    .expect("block tag pattern")
});

static BLANK_RUN: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"\n{3,}").expect("blank run pattern")
});

/// Remove editor markup, keeping paragraph breaks.
pub fn strip_html(input: &str) -> String
{   let text = BLOCK_TAG.replace_all(input, "\n");
    let text = TAG.replace_all(&text, "");
    let text = text
      .replace("&nbsp;", " ")
      .replace("&lt;", "<")
      .replace("&gt;", ">")
      .replace("&quot;", "\"")
      .replace("&#39;", "'")
      .replace("&amp;", "&");
    BLANK_RUN.replace_all(text.trim(), "\n\n").into_owned()
}

// ===== Modes =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrammarMode
{   #[default]
    Standard
  , Advanced
}

impl GrammarMode
{   pub fn parse(mode: Option<&str>) -> Self
    {   match normalized(mode).as_deref()
        {   Some("advanced") => GrammarMode::Advanced
          , _ => GrammarMode::Standard
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParaphraseMode
{   #[default]
    Standard
  , Fluency
  , Formal
  , Creative
  , Simple
  , Shorten
  , Expand
}

impl ParaphraseMode
{   pub fn parse(mode: Option<&str>) -> Self
    {   match normalized(mode).as_deref()
        {   Some("fluency") => ParaphraseMode::Fluency
          , Some("formal") => ParaphraseMode::Formal
          , Some("creative") => ParaphraseMode::Creative
          , Some("simple") => ParaphraseMode::Simple
          , Some("shorten") => ParaphraseMode::Shorten
          , Some("expand") => ParaphraseMode::Expand
          , _ => ParaphraseMode::Standard
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryMode
{   #[default]
    Concise
  , Bullet
  , Executive
  , Detailed
}

impl SummaryMode
{   pub fn parse(mode: Option<&str>) -> Self
    {   match normalized(mode).as_deref()
        {   Some("bullet") | Some("bullets") => SummaryMode::Bullet
          , Some("executive") => SummaryMode::Executive
          , Some("detailed") => SummaryMode::Detailed
          , _ => SummaryMode::Concise
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HumanizeMode
{   #[default]
    Standard
  , Casual
  , Professional
  , Academic
}

impl HumanizeMode
{   pub fn parse(mode: Option<&str>) -> Self
    {   match normalized(mode).as_deref()
        {   Some("casual") => HumanizeMode::Casual
          , Some("professional") => HumanizeMode::Professional
          , Some("academic") => HumanizeMode::Academic
          , _ => HumanizeMode::Standard
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewriteMode
{   #[default]
    Standard
  , Creative
  , Seo
}

impl RewriteMode
{   pub fn parse(mode: Option<&str>) -> Self
    {   match normalized(mode).as_deref()
        {   Some("creative") => RewriteMode::Creative
          , Some("seo") => RewriteMode::Seo
          , _ => RewriteMode::Standard
        }
    }
}

fn normalized(mode: Option<&str>) -> Option<String>
{   mode.map(|m| m.trim().to_lowercase())
      .filter(|m| !m.is_empty())
}

// ===== Templates =====

const PLAIN_OUTPUT: &str = "Return only the resulting text. Do not add \
  explanations, headings, quotation marks or markdown formatting.";

pub fn grammar_prompt(text: &str, mode: GrammarMode) -> String
{   let focus = match mode
    {   GrammarMode::Standard => {
          "Fix spelling, grammar and punctuation mistakes. Keep the \
           author's wording wherever it is already correct."
        }
      , GrammarMode::Advanced => {
          "Fix spelling, grammar and punctuation mistakes, and also \
           correct awkward phrasing, word choice, subject-verb \
           agreement and sentence structure problems."
        }
    };
    format!(
      "You are a meticulous proofreader. {focus}\n\n\
       Respond in exactly this format:\n\
       CORRECTED_TEXT: <the full corrected text>\n\
       CORRECTIONS:\n\
       <one correction per line as: original -> corrected>\n\n\
       If there is nothing to correct, repeat the text unchanged after \
       CORRECTED_TEXT and write None after CORRECTIONS.\n\n\
       Text:\n{text}"
    )
}

pub fn readability_prompt(text: &str) -> String
{   format!(
      "Analyze the readability of the text below.\n\n\
       Respond in exactly this format:\n\
       READABILITY_ANALYSIS: <two or three sentences on how easy the \
       text is to read and who it suits>\n\
       FLESCH_KINCAID_SCORE: <reading ease from 0 to 100>\n\
       GUNNING_FOG_INDEX: <fog index from 0 to 20>\n\
       IMPROVEMENT_POINTS:\n\
       - <one concrete suggestion per line>\n\
       REVISED_EXAMPLE: <the text rewritten to be easier to read>\n\n\
       Text:\n{text}"
    )
}

pub fn paraphrase_prompt(text: &str, mode: ParaphraseMode) -> String
{   let style = match mode
    {   ParaphraseMode::Standard => {
          "Paraphrase the text using different wording while keeping \
           its meaning and length."
        }
      , ParaphraseMode::Fluency => {
          "Rewrite the text so it reads smoothly and naturally, fixing \
           clumsy phrasing without changing the meaning."
        }
      , ParaphraseMode::Formal => {
          "Paraphrase the text in a formal, polished register suitable \
           for business or official writing."
        }
      , ParaphraseMode::Creative => {
          "Paraphrase the text creatively with vivid, original wording \
           while preserving the core message."
        }
      , ParaphraseMode::Simple => {
          "Paraphrase the text using plain, simple words and short \
           sentences that anyone can understand."
        }
      , ParaphraseMode::Shorten => {
          "Paraphrase the text more concisely, removing redundancy \
           while keeping every key point."
        }
      , ParaphraseMode::Expand => {
          "Paraphrase the text in a fuller form, adding helpful detail \
           and elaboration without inventing facts."
        }
    };
    format!("{style} {PLAIN_OUTPUT}\n\nText:\n{text}")
}

pub fn summary_prompt(text: &str, mode: SummaryMode) -> String
{   let style = match mode
    {   SummaryMode::Concise => {
          "Summarize the text in one short paragraph that captures the \
           main idea."
        }
      , SummaryMode::Bullet => {
          "Summarize the text as a list of key points, one per line, \
           each starting with \"- \"."
        }
      , SummaryMode::Executive => {
          "Write an executive summary of the text for a busy decision \
           maker: the main conclusion first, then the essential \
           supporting facts and any recommended actions."
        }
      , SummaryMode::Detailed => {
          "Write a detailed summary of the text covering every major \
           section and argument in a few well-organised paragraphs."
        }
    };
    format!("{style} Do not add information that is not in the text.\n\nText:\n{text}")
}

pub fn translation_prompt(text: &str, target_language: &str) -> String
{   format!(
      "Translate the text below into {target_language}. Preserve the \
       meaning, tone and paragraph structure. {PLAIN_OUTPUT}\n\n\
       Text:\n{text}"
    )
}

pub fn tone_prompt(text: &str, tone: &str) -> String
{   let tone = tone.trim();
    let guidance = match tone.to_lowercase().as_str()
    {   "formal" => " Use complete sentences, precise vocabulary and no contractions."
      , "casual" | "informal" => " Use relaxed, conversational language and contractions."
      , "friendly" => " Sound warm and approachable."
      , "professional" => " Sound confident, clear and courteous."
      , "persuasive" => " Make a compelling case that motivates the reader to act."
      , "empathetic" => " Acknowledge the reader's feelings with care."
      , _ => ""
    };
    format!(
      "Rewrite the text below in a {tone} tone while keeping its \
       meaning.{guidance} {PLAIN_OUTPUT}\n\nText:\n{text}"
    )
}

pub fn humanize_prompt(text: &str, mode: HumanizeMode) -> String
{   let style = match mode
    {   HumanizeMode::Standard => {
          "Rewrite the text so it sounds like it was written by a \
           thoughtful person: vary sentence length, prefer natural \
           transitions and avoid stock phrases."
        }
      , HumanizeMode::Casual => {
          "Rewrite the text so it sounds like a person talking to a \
           friend: relaxed, direct, with contractions and natural \
           rhythm."
        }
      , HumanizeMode::Professional => {
          "Rewrite the text so it sounds like an experienced \
           professional wrote it: clear, confident and free of filler."
        }
      , HumanizeMode::Academic => {
          "Rewrite the text so it sounds like a careful human academic \
           wrote it: measured, precise and naturally varied."
        }
    };
    format!(
      "{style} Keep the original meaning. Do not use bullet points, \
       asterisks or any introduction such as \"Here is\". \
       {PLAIN_OUTPUT}\n\nText:\n{text}"
    )
}

pub fn rewrite_prompt(
  text: &str
, mode: RewriteMode
, keyword: Option<&str>
) -> String
{   let style = match (mode, keyword)
    {   (RewriteMode::Seo, Some(keyword)) => {
          format!(
            "Rewrite the article for search engines. Use the keyword \
             \"{keyword}\" naturally in the opening paragraph and a few \
             more times throughout, keep paragraphs scannable and the \
             facts unchanged."
          )
        }
      , (RewriteMode::Creative, _) => {
          "Rewrite the article with fresh, engaging language and a \
           stronger narrative flow while keeping every fact."
            .to_string()
        }
      , _ => {
          "Rewrite the article in original wording, improving clarity \
           and flow while keeping its structure and facts."
            .to_string()
        }
    };
    format!("{style} {PLAIN_OUTPUT}\n\nArticle:\n{text}")
}

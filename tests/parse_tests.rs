use wordsmith::parse::*;
use wordsmith::prompt::{self, GrammarMode, ParaphraseMode, RewriteMode, SummaryMode};

// ===== Grammar =====

#[test]
fn test_grammar_reply_with_one_correction()
{   let parsed = parse_grammar(
      "CORRECTED_TEXT: Hello world\nCORRECTIONS: Helo -> Hello"
    , "Helo world"
    );
    assert_eq!(parsed.corrected_text, "Hello world");
    assert_eq!(parsed.corrections.len(), 1);
    assert_eq!(parsed.corrections[0].original, "Helo");
    assert_eq!(parsed.corrections[0].corrected, "Hello");
    assert_eq!(parsed.corrections[0].color, CORRECTION_COLORS[0]);
}

#[test]
fn test_grammar_reply_without_corrections_section()
{   let parsed = parse_grammar("CORRECTED_TEXT: Fine as is.", "Fine as is.");
    assert_eq!(parsed.corrected_text, "Fine as is.");
    assert!(parsed.corrections.is_empty());
}

#[test]
fn test_grammar_reply_without_corrected_text_uses_input()
{   let parsed = parse_grammar("CORRECTIONS: teh -> the", "teh cat");
    assert_eq!(parsed.corrected_text, "teh cat");
    assert_eq!(parsed.corrections.len(), 1);

    let unlabeled = parse_grammar("I could not help with that.", "teh cat");
    assert_eq!(unlabeled.corrected_text, "teh cat");
    assert!(unlabeled.corrections.is_empty());
}

#[test]
fn test_grammar_labels_tolerate_markdown_and_case()
{   let reply = "**Corrected_Text:** They're going home.\n\n\
                 **CORRECTIONS:**\n\
                 1. \"Their\" -> \"They're\"\n\
                 - goin → going\n\
                 * home -> home\n\
                 None";
    let parsed = parse_grammar(reply, "Their goin home.");

    assert_eq!(parsed.corrected_text, "They're going home.");
    let pairs: Vec<(&str, &str)> = parsed.corrections
      .iter()
      .map(|c| (c.original.as_str(), c.corrected.as_str()))
      .collect();
    assert_eq!(pairs, vec![("Their", "They're"), ("goin", "going")]);
    assert_eq!(parsed.corrections[1].color, CORRECTION_COLORS[1]);
}

#[test]
fn test_labels_inside_a_sentence_are_content()
{   let parsed = parse_grammar(
      "CORRECTED_TEXT: Our corrections: none were needed.\nCORRECTIONS: None"
    , "Our corrections: none were needed."
    );
    assert_eq!(parsed.corrected_text, "Our corrections: none were needed.");
    assert!(parsed.corrections.is_empty());

    let reply = parse_readability(
      "READABILITY_ANALYSIS: The revised_example: below is simpler.\n\
       ## FLESCH_KINCAID_SCORE: 64\n\
       REVISED_EXAMPLE: Short words help."
    , "input"
    );
    assert_eq!(reply.readability_analysis, "The revised_example: below is simpler.");
    assert_eq!(reply.scores.flesch_kincaid, 64.0);
    assert_eq!(reply.revised_example, "Short words help.");
}

#[test]
fn test_corrections_none_is_empty()
{   assert!(parse_corrections("None").is_empty());
    assert!(parse_corrections("").is_empty());
    assert!(parse_corrections("same -> same").is_empty());
}

#[test]
fn test_correction_colors_cycle()
{   let section = (0..7)
      .map(|i| format!("w{} -> x{}", i, i))
      .collect::<Vec<_>>()
      .join("\n");
    let corrections = parse_corrections(&section);
    assert_eq!(corrections.len(), 7);
    assert_eq!(corrections[5].color, CORRECTION_COLORS[0]);
    assert_eq!(corrections[6].color, CORRECTION_COLORS[1]);
}

// ===== Readability =====

#[test]
fn test_readability_scores_are_clamped()
{   let reply = parse_readability(
      "FLESCH_KINCAID_SCORE: 150\nGUNNING_FOG_INDEX: 35"
    , "input"
    );
    assert_eq!(reply.scores.flesch_kincaid, 100.0);
    assert_eq!(reply.scores.gunning_fog, 20.0);

    let negative = parse_readability(
      "FLESCH_KINCAID_SCORE: -12\nGUNNING_FOG_INDEX: -3.5"
    , "input"
    );
    assert_eq!(negative.scores.flesch_kincaid, 0.0);
    assert_eq!(negative.scores.gunning_fog, 0.0);
}

#[test]
fn test_readability_missing_fields_get_defaults()
{   let reply = parse_readability("Nothing structured here.", "original text");

    assert_eq!(reply.scores.flesch_kincaid, DEFAULT_FLESCH_KINCAID);
    assert_eq!(reply.scores.gunning_fog, DEFAULT_GUNNING_FOG);
    assert_eq!(reply.readability_analysis, DEFAULT_ANALYSIS);
    assert_eq!(reply.improvement_points, vec![DEFAULT_IMPROVEMENT_POINT.to_string()]);
    assert_eq!(reply.revised_example, "original text");
}

#[test]
fn test_readability_non_numeric_score_uses_default()
{   let reply = parse_readability(
      "FLESCH_KINCAID_SCORE: fairly easy\nGUNNING_FOG_INDEX: about 12 (high school)"
    , "input"
    );
    assert_eq!(reply.scores.flesch_kincaid, 50.0);
    assert_eq!(reply.scores.gunning_fog, 12.0);
}

#[test]
fn test_readability_full_reply()
{   let reply = parse_readability(
      "READABILITY_ANALYSIS: Clear and direct.\n\
       FLESCH_KINCAID_SCORE: 72.5\n\
       GUNNING_FOG_INDEX: 9\n\
       IMPROVEMENT_POINTS:\n\
       - Split the long sentence\n\
       2. Define the acronym\n\
       REVISED_EXAMPLE: The plan works."
    , "input"
    );
    assert_eq!(reply.readability_analysis, "Clear and direct.");
    assert_eq!(reply.scores.flesch_kincaid, 72.5);
    assert_eq!(reply.scores.gunning_fog, 9.0);
    assert_eq!(
      reply.improvement_points
    , vec!["Split the long sentence".to_string(), "Define the acronym".to_string()]
    );
    assert_eq!(reply.revised_example, "The plan works.");
}

#[test]
fn test_first_label_occurrence_wins()
{   let sections = Sections::parse(
      "CORRECTED_TEXT: first\nCORRECTED_TEXT: second"
    , &regex::Regex::new(r"(?i)\b(CORRECTED_TEXT)\s*:").unwrap()
    );
    assert_eq!(sections.get("corrected_text"), Some("first"));
    assert_eq!(sections.get("MISSING"), None);
}

// ===== Free text =====

#[test]
fn test_clean_generated_text()
{   assert_eq!(
      clean_generated_text("Certainly! Here is the rewritten text:\n\n## Intro\n* one\n* two")
    , "Intro\none\ntwo"
    );
    assert_eq!(
      clean_generated_text("Here's your text: It was __really__ fine.")
    , "It was really fine."
    );
    assert_eq!(clean_generated_text("Plain text stays."), "Plain text stays.");
    assert_eq!(clean_generated_text("Surely not."), "Surely not.");
}

#[test]
fn test_plain_text_trims()
{   assert_eq!(plain_text("\n  translated  \n"), "translated");
}

// ===== Prompts =====

#[test]
fn test_strip_html()
{   assert_eq!(
      prompt::strip_html("<p>Hello&nbsp;<b>world</b></p><p>Fish &amp; chips</p>")
    , "Hello world\nFish & chips"
    );
    assert_eq!(prompt::strip_html("<br/><p></p>"), "");
}

#[test]
fn test_prompts_embed_text_verbatim()
{   let text = "Ths is my txt.";
    assert!(prompt::grammar_prompt(text, GrammarMode::Advanced).ends_with(text));
    assert!(prompt::readability_prompt(text).ends_with(text));
    assert!(prompt::paraphrase_prompt(text, ParaphraseMode::Formal).ends_with(text));
    assert!(prompt::summary_prompt(text, SummaryMode::Bullet).ends_with(text));
    assert!(prompt::translation_prompt(text, "Italian").contains("into Italian"));
    assert!(prompt::tone_prompt(text, "friendly").contains("friendly tone"));
    assert!(
      prompt::rewrite_prompt(text, RewriteMode::Seo, Some("espresso"))
        .contains("\"espresso\"")
    );
}

#[test]
fn test_unknown_modes_select_defaults()
{   assert_eq!(GrammarMode::parse(None), GrammarMode::Standard);
    assert_eq!(GrammarMode::parse(Some(" ADVANCED ")), GrammarMode::Advanced);
    assert_eq!(ParaphraseMode::parse(Some("poetic")), ParaphraseMode::Standard);
    assert_eq!(SummaryMode::parse(Some("bullet")), SummaryMode::Bullet);
    assert_eq!(SummaryMode::parse(Some("")), SummaryMode::Concise);
    assert_eq!(RewriteMode::parse(Some("seo")), RewriteMode::Seo);
    assert_eq!(
      prompt::paraphrase_prompt("x", ParaphraseMode::parse(Some("poetic")))
    , prompt::paraphrase_prompt("x", ParaphraseMode::Standard)
    );
}

//! MISCAST generation prompts.

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::validation::Difficulty;

pub const SYSTEM_PROMPT: &str = "\
You are a puzzle writer for MISCAST, a daily spot-the-error reading game.
Each day has three short passages (easy, medium, hard) about podcasting, public speaking
or creative work. Every passage hides a fixed number of wrong words: homophones,
near-homophones or commonly confused words that a careful reader can spot.

Rules that every passage must follow:
- Each wrong word appears EXACTLY ONCE in its passage (case-insensitive)
- No two errors in the same passage use the same wrong word
- The rest of the passage is correct, natural English
- Errors are single words, never phrases

Always return valid JSON matching the exact schema provided.
";

/// Build the generation prompt for a full vault day
pub fn build_prompt(date: NaiveDate, recent_themes: &[String]) -> String {
    let avoid = if recent_themes.is_empty() {
        "none".to_string()
    } else {
        recent_themes.join(", ")
    };

    let mut tiers = String::new();
    for tier in Difficulty::ALL {
        let rules = tier.rules();
        let _ = writeln!(
            tiers,
            "- {}: {}-{} words, exactly {} errors",
            tier, rules.min_words, rules.max_words, rules.min_errors
        );
    }

    format!(
        r#"Write the MISCAST puzzles for date {date}.

Recently used themes (DO NOT repeat these): {avoid}

Tier requirements (words are counted after splitting on whitespace):
{tiers}
Each error lists the wrong word exactly as it appears in the text and a list of accepted corrections.

Return ONLY valid JSON matching this exact schema (no markdown, no explanation):
{{
  "easy": {{
    "theme": "Getting Started",
    "text": "Starting a podcast is easier than most people think. You do not kneed ...",
    "errors": [
      {{"wrong": "kneed", "right": ["need"]}}
    ]
  }},
  "medium": {{"theme": "...", "text": "...", "errors": [...]}},
  "hard": {{"theme": "...", "text": "...", "errors": [...]}}
}}
"#,
        date = date.format("%Y-%m-%d"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_tier_rules() {
        let prompt = build_prompt(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), &[]);
        assert!(prompt.starts_with("Write the MISCAST puzzles for date 2026-03-01."));
        assert!(prompt.contains("- easy: 25-80 words, exactly 3 errors\n"));
        assert!(prompt.contains("- medium: 40-150 words, exactly 5 errors\n"));
        assert!(prompt.contains("- hard: 100-300 words, exactly 7 errors\n"));
        assert!(prompt.contains("(DO NOT repeat these): none"));
        assert!(prompt.contains(r#"{"wrong": "kneed", "right": ["need"]}"#));
    }

    #[test]
    fn test_prompt_lists_recent_themes() {
        let themes = vec!["Stage Fright".to_string(), "Rise and Shine".to_string()];
        let prompt = build_prompt(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), &themes);
        assert!(prompt.contains("(DO NOT repeat these): Stage Fright, Rise and Shine"));
    }
}

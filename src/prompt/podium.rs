//! PODIUM generation prompts.

use chrono::NaiveDate;

/// How many recent categories are fetched from storage
pub const RECENT_CATEGORY_FETCH: usize = 30;

/// How many of those are listed in the prompt
pub const RECENT_CATEGORY_SHOWN: usize = 15;

pub const SYSTEM_PROMPT: &str = "\
You are a puzzle designer for PODIUM, a daily podcast-themed ranking game.
Each puzzle has 5 items that players rank on a single dimension (e.g., oldest to newest, cheapest to most expensive).
Scoring uses Kendall tau: 10 possible pairs, each correct relative ordering = +1 point.

Your puzzles must be:
- VERIFIABLE: use only real, publicly documented facts
- FUN: surprising or counterintuitive orderings are more interesting
- EDUCATIONAL: players should learn something about podcasting
- DISTINCT: never repeat a category used in the last 30 puzzles

Good categories: launch years, episode lengths, host ages, gear prices, subscriber counts,
acquisition prices, streaming deal values, production steps, genre lengths, platform ages,
episode counts, chronological milestones, regional listener counts, award dates.

Always return valid JSON matching the exact schema provided.
";

/// Build the generation prompt for `date`.
///
/// `recent_categories` is newest first, as the store returns it; the prompt
/// lists at most [`RECENT_CATEGORY_SHOWN`] of them.
pub fn build_prompt(date: NaiveDate, puzzle_number: i64, recent_categories: &[String]) -> String {
    let avoid = if recent_categories.is_empty() {
        "none".to_string()
    } else {
        recent_categories
            .iter()
            .take(RECENT_CATEGORY_SHOWN)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        r#"Generate a PODIUM puzzle for date {date} (puzzle #{puzzle_number}).

Recently used categories (DO NOT repeat these): {avoid}

Requirements:
1. Choose a podcast-related ranking dimension not in the recent list above
2. Provide exactly 5 items in CORRECT ORDER (index 0 = "first" per the direction)
3. Items must be well-known enough that a podcast enthusiast would recognize most of them
4. sort_value must strictly increase (no ties, use decimals like 2009.1 if needed)
5. display_value is human-readable (e.g. "2008", "~45 min", "~$399", "b. 1967")
6. fun_fact must be genuinely interesting, factually accurate, and 1-3 sentences
7. The puzzle should be challenging but fair, a mix of obvious and surprising items

Return ONLY valid JSON matching this exact schema (no markdown, no explanation):
{{
  "question": "Rank these podcasts OLDEST to NEWEST (by first episode date)",
  "direction": "Oldest → Newest",
  "category": "Launch Years",
  "emoji": "📅",
  "fun_fact": "One interesting sentence about the puzzle topic.",
  "items": [
    {{"id": "a", "name": "Podcast or item name", "sort_value": 2008, "display_value": "2008"}},
    {{"id": "b", "name": "...", "sort_value": 2009, "display_value": "2009"}},
    {{"id": "c", "name": "...", "sort_value": 2014, "display_value": "2014"}},
    {{"id": "d", "name": "...", "sort_value": 2017, "display_value": "2017"}},
    {{"id": "e", "name": "...", "sort_value": 2018, "display_value": "2018"}}
  ]
}}

Use IDs "a" through "e" exactly. Items must be in CORRECT ORDER (sort_value ascending).
"#,
        date = date.format("%Y-%m-%d"),
    )
}

//! Pull a JSON object out of free-form generator output.

use serde_json::Value;

use crate::error::{PuzzleError, Result};

/// Strip code-fence lines, then parse the text between the first `{` and
/// the last `}`. Prose around the object is tolerated.
pub fn extract_json(raw: &str) -> Result<Value> {
    let mut text = raw.trim().to_string();
    if text.starts_with("```") {
        text = text
            .lines()
            .filter(|line| !line.trim_start().starts_with("```"))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();
    }

    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(PuzzleError::Parse(format!(
            "No JSON object found in response. Got: {:?}",
            preview(&text, 200)
        )));
    };
    if end < start {
        return Err(PuzzleError::Parse(format!(
            "No JSON object found in response. Got: {:?}",
            preview(&text, 200)
        )));
    }

    serde_json::from_str(&text[start..=end]).map_err(|e| {
        PuzzleError::Parse(format!("JSON parse error: {}. Response: {:?}", e, preview(raw, 300)))
    })
}

/// First `max_chars` characters of `s`
pub fn preview(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

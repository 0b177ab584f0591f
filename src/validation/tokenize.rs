//! Word tokenizer used by the MISCAST uniqueness checks.
//!
//! Splits on whitespace and trims punctuation from each chunk's edges while
//! leaving internal apostrophes and hyphens alone, so "don't" and
//! "well-known" stay single tokens.

/// Characters that may bound a word: ASCII letters, the straight apostrophe,
/// the right single quote (U+2019) and the ASCII hyphen. The game client
/// strips with the same set, so an opening U+2018 is punctuation.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '\'' | '\u{2019}' | '-')
}

/// Strip one whitespace-delimited chunk down to its word.
///
/// A chunk with no word character at all ("123", "...") comes back unchanged.
pub fn strip_chunk(chunk: &str) -> &str {
    let start = chunk.find(is_word_char);
    let end = chunk.rfind(is_word_char);

    match (start, end) {
        (Some(start), Some(end)) => {
            let last_len = chunk[end..].chars().next().map_or(0, char::len_utf8);
            &chunk[start..end + last_len]
        }
        _ => chunk,
    }
}

/// Split text into word tokens. Case is preserved; callers compare
/// case-insensitively when they need to.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().map(strip_chunk).collect()
}

/// Count case-insensitive occurrences of `word` among `tokens`.
pub fn count_occurrences(tokens: &[&str], word: &str) -> usize {
    let needle = word.to_lowercase();
    tokens.iter().filter(|t| t.to_lowercase() == needle).count()
}

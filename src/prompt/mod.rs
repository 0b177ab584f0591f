//! Generation prompts
//!
//! Each game has a fixed system prompt and a `build_prompt` that renders the
//! per-day instructions. Retries append the previous failure with
//! [`with_feedback`] so the generator can correct itself.

pub mod miscast;
pub mod podium;

/// Append the previous attempt's failure to a freshly built prompt
pub fn with_feedback(prompt: &str, error: &str) -> String {
    format!(
        "{}\n\nIMPORTANT: Your previous attempt had this error: {}\nFix this in your new response.",
        prompt, error
    )
}

//! Generator layer - the AI text-generation collaborator
//!
//! This module provides:
//! - Generator trait for the opaque `generate(prompt, options)` call
//! - AnthropicGenerator implementation
//! - MockGenerator with scripted responses
//! - JSON extraction from fenced or prose-wrapped output

pub mod anthropic;
pub mod client;
pub mod extract;

pub use anthropic::{AnthropicConfig, AnthropicGenerator};
pub use client::{GenerateOptions, Generator, MockGenerator, RecordedCall};
pub use extract::{extract_json, preview};

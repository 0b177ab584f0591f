//! Generation runner
//!
//! This module provides:
//! - GenerationLoop, the bounded retry loop with backoff and error feedback
//! - PuzzleJob, the per-game seam (prompt, rules, storage)
//! - PodiumJob and MiscastJob
//! - RetryPolicy and the Sleeper seam

mod generation;
mod miscast;
mod podium;
mod retry;

pub use generation::{GenerationLoop, GenerationRequest, PuzzleJob};
pub use miscast::{MiscastJob, MiscastPlan};
pub use podium::{PodiumJob, PodiumPlan};
pub use retry::{RecordingSleeper, RetryPolicy, Sleeper, TokioSleeper};

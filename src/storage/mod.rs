//! Persistence for both games.
//!
//! PODIUM puzzles live in a SQLite table keyed by date; MISCAST days live as
//! JSON files in a vault directory.

pub mod podium;
pub mod vault;

pub use podium::{PodiumRow, PodiumStore, SqliteStore};
pub use vault::VaultStore;

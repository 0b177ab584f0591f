//! Generation outcome types.

/// Outcome of a generation run that did not fail.
///
/// Total failure is an error (`PuzzleError::GenerationFailed`), so callers can
/// tell "made one", "would have made one" and "already had one" apart.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome<P> {
    /// A new puzzle was validated and persisted
    Created { puzzle: P, attempts: u32 },
    /// A puzzle was validated but not persisted (dry run)
    DryRun { puzzle: P, attempts: u32 },
    /// A puzzle already existed for the date and no override was requested
    AlreadyExists,
}

impl<P> GenerationOutcome<P> {
    pub fn puzzle(&self) -> Option<&P> {
        match self {
            GenerationOutcome::Created { puzzle, .. } | GenerationOutcome::DryRun { puzzle, .. } => Some(puzzle),
            GenerationOutcome::AlreadyExists => None,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            GenerationOutcome::Created { attempts, .. } | GenerationOutcome::DryRun { attempts, .. } => *attempts,
            GenerationOutcome::AlreadyExists => 0,
        }
    }
}

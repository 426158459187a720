//! Generation error taxonomy.

use thiserror::Error;

/// Errors that can abort a generation pass.
///
/// Generation is all-or-nothing: any of these aborts the whole pass and the
/// caller's previous world (if any) is left untouched. Per-tile lookup
/// problems (classification gaps, unknown terrain colors) are not errors;
/// they degrade to documented fallbacks and are logged as registry defects.
#[derive(Error, Debug)]
pub enum GenError {
    /// Invalid generation settings, rejected before any work is done.
    #[error("invalid settings: {0}")]
    Config(String),

    /// The tiling produced a graph violating the sphere's topological
    /// invariant (V - E + F = 2), even after re-perturbation retries.
    #[error("degenerate tiling geometry after {attempts} attempts")]
    DegenerateGeometry { attempts: u32 },

    /// A pipeline stage was scheduled before one of its dependencies.
    #[error("stage '{stage}' requires '{requires}' to run first")]
    MissingDependency {
        stage: &'static str,
        requires: &'static str,
    },

    /// A stage failed for a reason other than the above.
    #[error("stage '{stage}' failed: {message}")]
    StageFailed { stage: String, message: String },
}

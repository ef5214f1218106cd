//! The crate's error type.
//!
//! Per the error-handling design, the LFG core itself has no recoverable
//! errors during parsing — a branch that fails is dropped silently and
//! only contributes to a smaller result set. `Error` exists for the one
//! class of failure that must surface loudly: a malformed grammar caught
//! at construction time, plus the solver's resource guard.

use thiserror::Error;

/// Error type for grammar construction and solving.
#[derive(Error, Debug)]
pub enum Error {
    /// A grammar failed validation: a production's right-hand side and its
    /// annotation list disagree in length, a declared start symbol has no
    /// productions, or some other structural inconsistency that must be
    /// caught at construction time rather than surfacing as silent parse
    /// failure later.
    #[error("malformed grammar: {0}")]
    MalformedGrammar(String),

    /// The solver gave up on a parse because the number of disjunction
    /// branches it would need to explore exceeded `SolverConfig::max_branches`.
    #[error("branch limit of {0} exceeded while solving")]
    BranchLimitExceeded(usize),
}

/// Result type for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;
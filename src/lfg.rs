//! Lexical-Functional Grammar: f-description construction and solving.
//!
//! - [`equation`]: the three-level equation algebra and the grounding
//!   discipline that turns relative `UP`/`DOWN` schemas into absolute
//!   ground equations.
//! - [`annotation`]: decorates a constituent tree with the equation
//!   schemas a grammar's productions and lexicon assign to it.
//! - [`description`]: walks an annotated tree into a flat f-description.
//! - [`fstructure`]: the union-find-backed f-structure model and its
//!   immutable, canonicalizable output type.
//! - [`solver`]: the four-phase algorithm that resolves a description.
//! - [`grammar`]: the productions/lexicon/start-symbol a host builds up.
//! - [`driver`]: composes a grammar with a `CfgParser` collaborator into
//!   an end-to-end `tokens -> f-structures` pipeline.

pub mod annotation;
pub mod description;
pub mod driver;
pub mod equation;
pub mod fstructure;
pub mod grammar;
pub mod solver;

pub use description::{build, FDescription};
pub use equation::{Atom, Equation, Expr, GroundEquation, IdGen, NodeId, RelativeId, Schema};
pub use fstructure::{FStructure, FStructureValue};
pub use grammar::{Grammar, LfgProduction};
pub use solver::{solve, solve_all_parallel, SolverConfig};

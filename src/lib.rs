//! # LFG F-Structure Core
//!
//! An implementation of the functional side of Lexical-Functional Grammar:
//! the equation algebra over grammatical-function paths, f-description
//! construction from an annotated constituent tree, and the solver that
//! resolves a description into the f-structures it admits.
//!
//! The constituent-structure parser, tokenizer, and lexicon loader are
//! treated as external collaborators, specified by the traits in [`cfg`];
//! this crate ships one small reference implementation of each so a
//! grammar built with [`lfg::Grammar`] is runnable standalone, and a host
//! application is free to substitute its own chart parser or lexicon
//! source against the same traits.
//!
//! ```
//! use lfg_fstructure::cfg::Lexicon;
//! use lfg_fstructure::lfg::equation::build::*;
//! use lfg_fstructure::lfg::equation::Equation;
//! use lfg_fstructure::lfg::grammar::{Grammar, LfgProduction};
//! use lfg_fstructure::lfg::solver::SolverConfig;
//!
//! let mut grammar = Grammar::new().with_start_symbol("S");
//! grammar.add_production(LfgProduction::new(
//!     "S",
//!     vec![
//!         ("NP", Equation::Assignment(up().attr("SUBJ"), down())),
//!         ("VP", Equation::Assignment(up(), down())),
//!     ],
//! ));
//! grammar.add_lexical_entry("john", "NP", Equation::Assignment(up().attr("PRED"), pred("john", &[])));
//! grammar.add_lexical_entry("sleeps", "VP", Equation::Assignment(up().attr("PRED"), pred("sleep", &["SUBJ"])));
//! let grammar = grammar.finish().unwrap();
//!
//! let solutions = grammar.parse("john sleeps", &SolverConfig::default()).unwrap();
//! assert_eq!(solutions.len(), 1);
//! let _ = Lexicon::new();
//! ```

pub mod common;

/// External collaborators (CFG parsing, tokenization, lexicon lookup)
/// and the one reference implementation this crate ships of each.
pub mod cfg;

/// The LFG core: equation algebra, annotation, f-description
/// construction, and the solver.
pub mod lfg;

pub use common::error::{Error, Result};
pub use lfg::equation::{Atom, Equation, Expr, GroundEquation, IdGen, NodeId, RelativeId, Schema};
pub use lfg::fstructure::{FStructure, FStructureValue};
pub use lfg::grammar::{Grammar, LfgProduction};
pub use lfg::solver::SolverConfig;

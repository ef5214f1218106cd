//! Common data structures shared by the LFG core and its reference
//! collaborators: currently just the crate's error type.

pub mod error;

pub use error::Error;
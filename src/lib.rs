//! Revdiff: rebase-aware line diffing between file revisions.
//!
//! The crate provides:
//! - Line splitting and charset handling (`sequence`)
//! - Line-level alignment with whitespace modes (`line_diff`)
//! - Character-level highlighting inside hunks (`intraline`)
//! - Rebase vs. authored hunk classification (`rebase`)
//! - Hunk assembly with statistics (`assemble`, `engine`)
//! - A bounded single-flight result cache (`cache`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use revdiff::engine::{self, DiffRequest};
//! use revdiff::sequence::LineSequence;
//!
//! let request = DiffRequest {
//!     name_a: Some("greeting.txt".into()),
//!     name_b: Some("greeting.txt".into()),
//!     old: Some(LineSequence::from_str("hello old world\n")),
//!     new: Some(LineSequence::from_str("hello new world\n")),
//!     ..DiffRequest::default()
//! };
//! let diff = engine::compute_diff(&request).unwrap();
//! assert_eq!(diff.lines_inserted, Some(1));
//! assert_eq!(diff.lines_deleted, Some(1));
//! ```

pub mod assemble;
pub mod cache;
pub mod engine;
pub mod intraline;
pub mod line_diff;
pub mod rebase;
pub mod script;
pub mod sequence;

mod myers;

#[cfg(feature = "cli")]
pub mod cli;

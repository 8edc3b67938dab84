//! # topas
//!
//! A parser for TOPAS refinement control files.
//!
//! Source text parses into a syntax tree, the tree serializes to a
//! JSON-compatible tagged-tuple form, and either one renders back to
//! source. Parsing is permissive by default: fragments no rule accepts are
//! kept as text and reported as diagnostics.
//!
//! ```rust,ignore
//! use topas::topas::{parse, serialize, unparse, unserialize, ParseMode, SerializeMode};
//!
//! let (root, diagnostics) = parse("prm a 1 min 0", ParseMode::Permissive)?;
//! let data = serialize(&root, SerializeMode::Verbose);
//! assert_eq!(unserialize(&data)?, root);
//! assert_eq!(unparse(&root), "prm a 1 min 0");
//! ```

pub mod topas;

//! Output formats for TOPAS trees
//!
//! - `json`: the tagged-tuple codec, verbose and compact
//! - `source`: back to TOPAS text

pub mod json;
pub mod source;

pub use json::{serialize, unserialize, Serializable};
pub use source::{unparse, Unparse};

//! Syntax tree for TOPAS control files
//!
//! - `elements`: the node types
//! - `kind`: tag and operator tables shared by parser, codec and unparser
//! - `decimal`: exact number storage
//! - `location`, `diagnostics`, `error`: positions and problem reporting

pub mod decimal;
pub mod diagnostics;
pub mod elements;
pub mod error;
pub mod kind;
pub mod location;

pub use decimal::{Decimal, DecimalError};
pub use diagnostics::{Diagnostic, DiagnosticSeverity, TEXT_FALLBACK};
pub use elements::*;
pub use error::{ParseError, ReconstructError};
pub use kind::{NodeKind, Operator, OperatorInfo, NARY_LEVELS, OPERATORS};
pub use location::{Position, SourceLocation, Span};

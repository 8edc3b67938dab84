//! Node definitions for TOPAS control files
//!
//! Every node is a plain immutable value. A parent owns its children
//! exclusively; parameter chains are boxed links ending in `None`.

pub mod formula;
pub mod macro_block;
pub mod parameter;
pub mod root;
pub mod statements;
pub mod text;

pub use formula::{Formula, FormulaOp, FuncArg, FunctionCall, Operand};
pub use macro_block::Macro;
pub use parameter::{
    Clause, Clauses, EquationBody, Parameter, ParameterEquation, ParameterValue, Prm, PrmValue,
    Reporting, ValueLiteralError,
};
pub use root::{Root, Statement};
pub use statements::{
    AxialConv, AxialField, Bkg, ExistingOp, ExistingPrm, Local, NumRuns, NumRunsValue, Xdd,
    XddFlag, XddSource, XDD_XY,
};
pub use text::{ParameterName, Text};

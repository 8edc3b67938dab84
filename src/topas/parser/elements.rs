//! Element grammars

pub(crate) mod formula;
pub(crate) mod parameter;
pub(crate) mod statements;

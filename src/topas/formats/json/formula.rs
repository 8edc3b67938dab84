//! Formula nodes: operators, calls and their operands

use serde_json::{json, Value};

use super::{check_len, kind_of, string_at, tuple, Serializable};
use crate::topas::ast::{
    Formula, FormulaOp, FuncArg, FunctionCall, NodeKind, Operand, Parameter, ReconstructError,
    Text,
};
use crate::topas::formats::source::Unparse;
use crate::topas::options::SerializeMode;

impl Serializable for Operand {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        match self {
            Operand::Call(call) => call.serialize_with(mode),
            Operand::Parameter(parameter) => parameter.serialize_with(mode),
            Operand::Op(op) => op.serialize_with(mode),
            Operand::Text(text) => text.serialize_with(mode),
        }
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        const EXPECTED: &str = "an operator, \"func_call\", \"p\" or \"text\" tag";
        match kind_of(data, EXPECTED)? {
            NodeKind::FunctionCall => FunctionCall::unserialize(data).map(Operand::Call),
            NodeKind::Parameter => Parameter::unserialize(data).map(Operand::Parameter),
            NodeKind::Operator(_) => FormulaOp::unserialize(data).map(Operand::Op),
            NodeKind::Text => Text::unserialize(data).map(Operand::Text),
            _ => Err(ReconstructError::tag(EXPECTED, data)),
        }
    }
}

impl Serializable for FormulaOp {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        let mut tuple = vec![json!(self.operator.tag())];
        tuple.extend(self.operands.iter().map(|operand| operand.serialize_with(mode)));
        Value::Array(tuple)
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        let operator = match kind_of(data, "an operator tag")? {
            NodeKind::Operator(operator) => operator,
            _ => return Err(ReconstructError::tag("an operator tag", data)),
        };
        let items = tuple(data, NodeKind::Operator(operator))?;
        if operator.is_unary() {
            check_len(data, items, 2, Some(2))?;
        } else {
            check_len(data, items, 3, None)?;
        }
        let operands = items[1..]
            .iter()
            .map(Operand::unserialize)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FormulaOp { operator, operands })
    }
}

impl Serializable for Formula {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        match mode {
            SerializeMode::Verbose => {
                json!([NodeKind::Formula.tag(), self.value.serialize_with(mode)])
            }
            SerializeMode::Compact => Value::String(self.unparse()),
        }
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        let items = tuple(data, NodeKind::Formula)?;
        check_len(data, items, 2, Some(2))?;
        Ok(Formula::new(Operand::unserialize(&items[1])?))
    }
}

fn arg_to_json(arg: &Option<FuncArg>, mode: SerializeMode) -> Value {
    match arg {
        None => Value::Null,
        Some(FuncArg::Str(value)) => Value::String(value.clone()),
        Some(FuncArg::Formula(formula)) => formula.serialize_with(mode),
        Some(FuncArg::Text(text)) => text.serialize_with(mode),
    }
}

fn arg_from_json(data: &Value) -> Result<Option<FuncArg>, ReconstructError> {
    const EXPECTED: &str = "null, a string, or a \"formula\" or \"text\" tuple";
    match data {
        Value::Null => Ok(None),
        Value::String(value) => Ok(Some(FuncArg::Str(value.clone()))),
        _ => match kind_of(data, EXPECTED)? {
            NodeKind::Formula => Formula::unserialize(data).map(|f| Some(FuncArg::Formula(f))),
            NodeKind::Text => Text::unserialize(data).map(|t| Some(FuncArg::Text(t))),
            _ => Err(ReconstructError::tag(EXPECTED, data)),
        },
    }
}

/// Argument slots of a call or macro header
pub(crate) fn args_to_json(args: &[Option<FuncArg>], mode: SerializeMode) -> Vec<Value> {
    args.iter().map(|arg| arg_to_json(arg, mode)).collect()
}

pub(crate) fn args_from_json(args: &[Value]) -> Result<Vec<Option<FuncArg>>, ReconstructError> {
    args.iter().map(arg_from_json).collect()
}

impl Serializable for FunctionCall {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        let mut tuple = vec![json!(NodeKind::FunctionCall.tag()), json!(self.name)];
        tuple.extend(args_to_json(&self.args, mode));
        Value::Array(tuple)
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        let items = tuple(data, NodeKind::FunctionCall)?;
        check_len(data, items, 2, None)?;
        let name = string_at(data, items, 1)?;
        Ok(FunctionCall::new(name, args_from_json(&items[2..])?))
    }
}

//! Statement nodes, macros and the document root

use serde_json::{json, Map, Value};
use std::collections::BTreeSet;

use super::formula::{args_from_json, args_to_json};
use super::{array_at, check_len, kind_of, string_at, tuple, Serializable};
use crate::topas::ast::{
    AxialConv, AxialField, Bkg, Decimal, ExistingOp, ExistingPrm, Formula, Local, Macro, NodeKind,
    NumRuns, NumRunsValue, Parameter, ParameterName, Prm, ReconstructError, Reporting, Root,
    Statement, Text, Xdd, XddFlag, XddSource, XDD_XY,
};
use crate::topas::options::SerializeMode;

impl Serializable for Local {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        json!([NodeKind::Local.tag(), self.parameter.serialize_with(mode)])
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        let items = tuple(data, NodeKind::Local)?;
        check_len(data, items, 2, Some(2))?;
        Ok(Local {
            parameter: Parameter::unserialize(&items[1])?,
        })
    }
}

impl Serializable for ExistingPrm {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        let mut tuple = vec![
            json!(NodeKind::ExistingPrm.tag()),
            self.name.serialize_with(mode),
            json!(self.op.symbol()),
            self.formula.serialize_with(mode),
        ];
        if let Some(reporting) = &self.reporting {
            tuple.push(reporting.serialize_with(mode));
        }
        Value::Array(tuple)
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        let items = tuple(data, NodeKind::ExistingPrm)?;
        check_len(data, items, 4, Some(5))?;
        let symbol = string_at(data, items, 2)?;
        let op = ExistingOp::from_symbol(symbol).ok_or_else(|| {
            ReconstructError::field("data[2] in (=, +=, -=, *=, *-, /=, ^=)", data)
        })?;
        Ok(ExistingPrm {
            name: ParameterName::unserialize(&items[1])?,
            op,
            formula: Formula::unserialize(&items[3])?,
            reporting: items.get(4).map(Reporting::unserialize).transpose()?,
        })
    }
}

impl Serializable for NumRuns {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        let value = match &self.value {
            NumRunsValue::Count(count) => json!(count),
            NumRunsValue::Name(name) => name.serialize_with(mode),
        };
        json!([NodeKind::NumRuns.tag(), value])
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        let items = tuple(data, NodeKind::NumRuns)?;
        check_len(data, items, 2, Some(2))?;
        let value = match &items[1] {
            Value::Number(count) => count.as_u64().map(NumRunsValue::Count).ok_or_else(|| {
                ReconstructError::field("data[1] is a non-negative integer", data)
            })?,
            Value::Array(_) => NumRunsValue::Name(ParameterName::unserialize(&items[1])?),
            _ => {
                return Err(ReconstructError::field(
                    "type(data[1]) in (int, parameter_name)",
                    data,
                ))
            }
        };
        Ok(NumRuns { value })
    }
}

impl Serializable for Xdd {
    fn serialize_with(&self, _mode: SerializeMode) -> Value {
        let mut options = Map::new();
        let mut flags: Vec<Value> = Vec::new();
        match &self.source {
            XddSource::File(filename) => {
                options.insert("filename".to_string(), json!(filename));
            }
            XddSource::Inline { xy, data } => {
                let numbers: Vec<&str> = data.iter().map(Decimal::as_str).collect();
                options.insert("inline_data".to_string(), json!(numbers));
                if *xy {
                    flags.push(json!(XDD_XY));
                }
            }
        }
        if let Some(range) = &self.range {
            options.insert("range".to_string(), json!(range.as_str()));
        }
        flags.extend(self.flags.iter().map(|flag| json!(flag.keyword())));

        let mut tuple = vec![json!(NodeKind::Xdd.tag()), Value::Object(options)];
        if !flags.is_empty() {
            tuple.push(Value::Array(flags));
        }
        Value::Array(tuple)
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        let items = tuple(data, NodeKind::Xdd)?;
        check_len(data, items, 2, Some(3))?;
        let options = items[1]
            .as_object()
            .ok_or_else(|| ReconstructError::field("type(data[1]) == dict", data))?;
        let decimal = |value: &Value, expected: &str| {
            value
                .as_str()
                .and_then(|text| text.parse::<Decimal>().ok())
                .ok_or_else(|| ReconstructError::field(expected, data))
        };

        let mut xy = false;
        let mut flags = BTreeSet::new();
        let raw_flags: &[Value] = if items.len() == 3 {
            array_at(data, items, 2)?
        } else {
            &[]
        };
        for flag in raw_flags {
            match flag.as_str() {
                Some(XDD_XY) => xy = true,
                Some(keyword) => {
                    let flag = XddFlag::from_keyword(keyword).ok_or_else(|| {
                        ReconstructError::field("data[2] holds known xdd flags", data)
                    })?;
                    flags.insert(flag);
                }
                None => return Err(ReconstructError::field("data[2] holds strings", data)),
            }
        }

        let mut source = None;
        let mut range = None;
        for (key, value) in options {
            match key.as_str() {
                "filename" if source.is_none() => {
                    let filename = value.as_str().ok_or_else(|| {
                        ReconstructError::field("type(data[1][\"filename\"]) == str", data)
                    })?;
                    source = Some(XddSource::File(filename.to_string()));
                }
                "inline_data" if source.is_none() => {
                    let numbers = value
                        .as_array()
                        .ok_or_else(|| {
                            ReconstructError::field("type(data[1][\"inline_data\"]) == list", data)
                        })?
                        .iter()
                        .map(|n| decimal(n, "data[1][\"inline_data\"] holds number strings"))
                        .collect::<Result<Vec<_>, _>>()?;
                    source = Some(XddSource::Inline { xy, data: numbers });
                }
                "range" => range = Some(decimal(value, "data[1][\"range\"] is a number string")?),
                _ => {
                    return Err(ReconstructError::field(
                        "data[1] keys: one of filename or inline_data, then range",
                        data,
                    ))
                }
            }
        }

        let source = source.ok_or_else(|| {
            ReconstructError::field("data[1] has filename or inline_data", data)
        })?;
        if xy && matches!(source, XddSource::File(_)) {
            return Err(ReconstructError::field("_xy only with inline_data", data));
        }
        Ok(Xdd {
            source,
            range,
            flags,
        })
    }
}

impl Serializable for AxialConv {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        let required: Vec<Value> = AxialField::REQUIRED
            .into_iter()
            .filter_map(|field| self.get(field))
            .map(|parameter| parameter.serialize_with(mode))
            .collect();

        let mut optional = Map::new();
        for field in AxialField::ALL {
            if let (Some(key), Some(parameter)) = (field.key(), self.get(field)) {
                optional.insert(key.to_string(), parameter.serialize_with(mode));
            }
        }

        let mut tuple = vec![json!(NodeKind::AxialConv.tag()), Value::Array(required)];
        if !optional.is_empty() {
            tuple.push(Value::Object(optional));
        }
        Value::Array(tuple)
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        let items = tuple(data, NodeKind::AxialConv)?;
        check_len(data, items, 2, Some(3))?;

        let required = array_at(data, items, 1)?;
        if required.len() != AxialField::REQUIRED.len() {
            return Err(ReconstructError::arity("len(data[1]) == 3", data));
        }
        let mut fields = Vec::new();
        for (field, value) in AxialField::REQUIRED.into_iter().zip(required) {
            fields.push((field, Parameter::unserialize(value)?));
        }

        if let Some(optional) = items.get(2) {
            let optional = optional
                .as_object()
                .ok_or_else(|| ReconstructError::field("type(data[2]) == dict", data))?;
            for (key, value) in optional {
                let field = AxialField::ALL
                    .into_iter()
                    .find(|field| field.key() == Some(key.as_str()))
                    .ok_or_else(|| ReconstructError::field("data[2] keys in (p, s, b)", data))?;
                fields.push((field, Parameter::unserialize(value)?));
            }
        }

        AxialConv::from_fields(fields)
            .ok_or_else(|| ReconstructError::field("three required axial_conv parameters", data))
    }
}

impl Serializable for Bkg {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        let mut tuple = vec![json!(NodeKind::Bkg.tag())];
        tuple.extend(self.params.iter().map(|p| p.serialize_with(mode)));
        Value::Array(tuple)
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        let items = tuple(data, NodeKind::Bkg)?;
        check_len(data, items, 2, None)?;
        let params = items[1..]
            .iter()
            .map(Parameter::unserialize)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Bkg { params })
    }
}

fn statements_to_json(statements: &[Statement], mode: SerializeMode) -> Vec<Value> {
    statements.iter().map(|s| s.serialize_with(mode)).collect()
}

fn statements_from_json(items: &[Value]) -> Result<Vec<Statement>, ReconstructError> {
    items.iter().map(Statement::unserialize).collect()
}

impl Serializable for Macro {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        json!([
            NodeKind::Macro.tag(),
            self.name,
            args_to_json(&self.args, mode),
            statements_to_json(&self.statements, mode),
        ])
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        let items = tuple(data, NodeKind::Macro)?;
        check_len(data, items, 4, Some(4))?;
        let name = string_at(data, items, 1)?;
        let args = args_from_json(array_at(data, items, 2)?)?;
        let statements = statements_from_json(array_at(data, items, 3)?)?;
        Ok(Macro::new(name, args, statements))
    }
}

impl Serializable for Statement {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        match self {
            Statement::LineBreak => json!([NodeKind::LineBreak.tag()]),
            Statement::Text(text) => text.serialize_with(mode),
            Statement::Str(value) => Value::String(value.clone()),
            Statement::Formula(formula) => formula.serialize_with(mode),
            Statement::Prm(prm) => prm.serialize_with(mode),
            Statement::Local(local) => local.serialize_with(mode),
            Statement::ExistingPrm(existing) => existing.serialize_with(mode),
            Statement::NumRuns(num_runs) => num_runs.serialize_with(mode),
            Statement::Xdd(xdd) => xdd.serialize_with(mode),
            Statement::AxialConv(axial) => axial.serialize_with(mode),
            Statement::Bkg(bkg) => bkg.serialize_with(mode),
            Statement::Macro(macro_def) => macro_def.serialize_with(mode),
        }
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        const EXPECTED: &str = "a statement tag";
        if let Value::String(value) = data {
            return Ok(Statement::Str(value.clone()));
        }
        match kind_of(data, EXPECTED)? {
            NodeKind::LineBreak => {
                let items = tuple(data, NodeKind::LineBreak)?;
                check_len(data, items, 1, Some(1))?;
                Ok(Statement::LineBreak)
            }
            NodeKind::Text => Text::unserialize(data).map(Statement::Text),
            NodeKind::Formula => Formula::unserialize(data).map(Statement::Formula),
            NodeKind::Prm => Prm::unserialize(data).map(Statement::Prm),
            NodeKind::Local => Local::unserialize(data).map(Statement::Local),
            NodeKind::ExistingPrm => ExistingPrm::unserialize(data).map(Statement::ExistingPrm),
            NodeKind::NumRuns => NumRuns::unserialize(data).map(Statement::NumRuns),
            NodeKind::Xdd => Xdd::unserialize(data).map(Statement::Xdd),
            NodeKind::AxialConv => AxialConv::unserialize(data).map(Statement::AxialConv),
            NodeKind::Bkg => Bkg::unserialize(data).map(Statement::Bkg),
            NodeKind::Macro => Macro::unserialize(data).map(Statement::Macro),
            _ => Err(ReconstructError::tag(EXPECTED, data)),
        }
    }
}

impl Serializable for Root {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        let mut tuple = vec![json!(NodeKind::Root.tag())];
        tuple.extend(statements_to_json(&self.statements, mode));
        Value::Array(tuple)
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        let items = tuple(data, NodeKind::Root)?;
        Ok(Root::new(statements_from_json(&items[1..])?))
    }
}

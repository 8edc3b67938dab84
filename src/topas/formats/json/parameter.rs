//! Leaf and parameter nodes

use serde_json::{json, Map, Value};

use super::{check_len, kind_of, string_at, tuple, Serializable};
use crate::topas::ast::{
    Clause, EquationBody, Formula, NodeKind, Parameter, ParameterEquation, ParameterName,
    ParameterValue, Prm, PrmValue, ReconstructError, Reporting, Text,
};
use crate::topas::formats::source::Unparse;
use crate::topas::options::SerializeMode;

impl Serializable for Text {
    fn serialize_with(&self, _mode: SerializeMode) -> Value {
        json!([NodeKind::Text.tag(), self.value])
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        let items = tuple(data, NodeKind::Text)?;
        check_len(data, items, 2, Some(2))?;
        Ok(Text::new(string_at(data, items, 1)?))
    }
}

impl Serializable for ParameterName {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        match mode {
            SerializeMode::Verbose => json!([NodeKind::ParameterName.tag(), self.name]),
            SerializeMode::Compact => Value::String(self.name.clone()),
        }
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        let items = tuple(data, NodeKind::ParameterName)?;
        check_len(data, items, 2, Some(2))?;
        let name = string_at(data, items, 1)?;
        if !ParameterName::is_valid(name) {
            return Err(ReconstructError::field("data[1] is an identifier", data));
        }
        Ok(ParameterName::new(name))
    }
}

impl Serializable for ParameterValue {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        match mode {
            SerializeMode::Verbose => json!([NodeKind::ParameterValue.tag(), self.to_string()]),
            SerializeMode::Compact => Value::String(self.to_string()),
        }
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        let items = tuple(data, NodeKind::ParameterValue)?;
        check_len(data, items, 2, Some(2))?;
        ParameterValue::from_literal(string_at(data, items, 1)?)
            .map_err(|_| ReconstructError::field("data[1] is a value literal", data))
    }
}

impl Serializable for Reporting {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        match self {
            Reporting::Value(value) => value.serialize_with(mode),
            Reporting::Text(text) => text.serialize_with(mode),
        }
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        const EXPECTED: &str = "data[0] in (\"parameter_value\", \"text\")";
        match kind_of(data, EXPECTED)? {
            NodeKind::ParameterValue => ParameterValue::unserialize(data).map(Reporting::Value),
            NodeKind::Text => Text::unserialize(data).map(Reporting::Text),
            _ => Err(ReconstructError::tag(EXPECTED, data)),
        }
    }
}

impl Serializable for ParameterEquation {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        if mode == SerializeMode::Compact {
            return Value::String(self.unparse());
        }
        let body = match &self.body {
            EquationBody::Formula(formula) => formula.serialize_with(mode),
            EquationBody::Text(text) => text.serialize_with(mode),
        };
        let mut tuple = vec![json!(NodeKind::ParameterEquation.tag()), body];
        if let Some(reporting) = &self.reporting {
            tuple.push(reporting.serialize_with(mode));
        }
        Value::Array(tuple)
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        const EXPECTED: &str = "data[1][0] in (\"formula\", \"text\")";
        let items = tuple(data, NodeKind::ParameterEquation)?;
        check_len(data, items, 2, Some(3))?;

        let body = match kind_of(&items[1], EXPECTED)? {
            NodeKind::Formula => EquationBody::Formula(Box::new(Formula::unserialize(&items[1])?)),
            NodeKind::Text => EquationBody::Text(Text::unserialize(&items[1])?),
            _ => return Err(ReconstructError::tag(EXPECTED, &items[1])),
        };
        let reporting = items.get(2).map(Reporting::unserialize).transpose()?;
        Ok(ParameterEquation { body, reporting })
    }
}

impl Serializable for PrmValue {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        match self {
            PrmValue::Value(value) => value.serialize_with(mode),
            PrmValue::Equation(equation) => equation.serialize_with(mode),
            PrmValue::Text(text) => text.serialize_with(mode),
        }
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        const EXPECTED: &str = "data[0] in (\"parameter_value\", \"prm_eq\", \"text\")";
        match kind_of(data, EXPECTED)? {
            NodeKind::ParameterValue => ParameterValue::unserialize(data).map(PrmValue::Value),
            NodeKind::ParameterEquation => {
                ParameterEquation::unserialize(data).map(PrmValue::Equation)
            }
            NodeKind::Text => Text::unserialize(data).map(PrmValue::Text),
            _ => Err(ReconstructError::tag(EXPECTED, data)),
        }
    }
}

/// Keyed record shared by `p` and `prm` tuples
fn record(parameter: &Parameter, mode: SerializeMode) -> Map<String, Value> {
    let mut record = Map::new();
    if parameter.fixed {
        record.insert("!".to_string(), Value::Bool(true));
    }
    if parameter.refined {
        record.insert("@".to_string(), Value::Bool(true));
    }
    if let Some(name) = &parameter.name {
        record.insert("n".to_string(), name.serialize_with(mode));
    }
    if let Some(value) = &parameter.value {
        record.insert("v".to_string(), value.serialize_with(mode));
    }
    for (clause, value) in &parameter.clauses {
        record.insert(clause.key().to_string(), value.serialize_with(mode));
    }
    if let Some(next) = &parameter.next {
        record.insert(">".to_string(), next.serialize_with(mode));
    }
    record
}

fn flag(data: &Value, key: &str, value: &Value) -> Result<bool, ReconstructError> {
    value
        .as_bool()
        .ok_or_else(|| ReconstructError::field(format!("type(data[1][{:?}]) == bool", key), data))
}

fn from_record(data: &Value, kind: NodeKind) -> Result<Parameter, ReconstructError> {
    let items = tuple(data, kind)?;
    check_len(data, items, 2, Some(2))?;
    let fields = items[1]
        .as_object()
        .ok_or_else(|| ReconstructError::field("type(data[1]) == dict", data))?;

    let mut parameter = Parameter::default();
    for (key, value) in fields {
        match key.as_str() {
            "!" => parameter.fixed = flag(data, key, value)?,
            "@" => parameter.refined = flag(data, key, value)?,
            "n" => parameter.name = Some(ParameterName::unserialize(value)?),
            "v" => parameter.value = Some(PrmValue::unserialize(value)?),
            ">" => parameter.next = Some(Box::new(Parameter::unserialize(value)?)),
            other => {
                let clause = Clause::from_key(other).ok_or_else(|| {
                    let expected = format!(
                        "data[1] keys in (!, @, n, v, _, ^, d, u, s, c, >), got {:?}",
                        other
                    );
                    ReconstructError::field(expected, data)
                })?;
                parameter.clauses.insert(clause, PrmValue::unserialize(value)?);
            }
        }
    }

    let has_content =
        parameter.name.is_some() || parameter.value.is_some() || !parameter.clauses.is_empty();
    if !has_content && !parameter.refined {
        return Err(ReconstructError::field("data[1] has @, n, v or a clause", data));
    }
    if parameter.is_chain() && !parameter.links().take(2).all(is_bare_link) {
        return Err(ReconstructError::field(
            "data[1] with > holds exactly one of n, v and nothing else",
            data,
        ));
    }
    Ok(parameter)
}

/// A chain link is one bare name or one plain value
fn is_bare_link(link: &Parameter) -> bool {
    let single = match (&link.name, &link.value) {
        (Some(_), None) | (None, Some(PrmValue::Value(_))) => true,
        _ => false,
    };
    single && !link.fixed && !link.refined && link.clauses.is_empty()
}

impl Serializable for Parameter {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        json!([NodeKind::Parameter.tag(), record(self, mode)])
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        from_record(data, NodeKind::Parameter)
    }
}

impl Serializable for Prm {
    fn serialize_with(&self, mode: SerializeMode) -> Value {
        json!([NodeKind::Prm.tag(), record(&self.to_parameter(), mode)])
    }

    fn unserialize(data: &Value) -> Result<Self, ReconstructError> {
        let parameter = from_record(data, NodeKind::Prm)?;
        Prm::from_parameter(parameter)
            .ok_or_else(|| ReconstructError::field("data[1] has v and neither @ nor >", data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_record_keys() {
        let parameter = Parameter::named("a")
            .refined()
            .with_value(ParameterValue::from_literal("1_0.1").unwrap())
            .with_clause(Clause::Min, ParameterValue::from_literal("0").unwrap());
        assert_eq!(
            parameter.serialize(),
            json!(["p", {
                "@": true,
                "n": ["parameter_name", "a"],
                "v": ["parameter_value", "1_0.1"],
                "_": ["parameter_value", "0"],
            }])
        );
        assert_eq!(Parameter::unserialize(&parameter.serialize()).unwrap(), parameter);
    }

    #[test]
    fn test_record_must_be_an_object() {
        let err = Parameter::unserialize(&json!(["p", "not-a-record"])).unwrap_err();
        assert!(matches!(err, ReconstructError::FieldType { .. }));
        assert_eq!(err.fragment(), &json!(["p", "not-a-record"]));
    }

    #[test]
    fn test_unknown_record_key() {
        let data = json!(["p", {"n": ["parameter_name", "a"], "zz": true}]);
        let err = Parameter::unserialize(&data).unwrap_err();
        assert!(matches!(err, ReconstructError::FieldType { .. }));
    }

    #[test]
    fn test_flags_are_not_coerced() {
        let data = json!(["p", {"!": 1, "n": ["parameter_name", "a"]}]);
        let err = Parameter::unserialize(&data).unwrap_err();
        assert_eq!(err.expected(), "type(data[1][\"!\"]) == bool");
    }

    #[test]
    fn test_flag_only_records() {
        let refined = Parameter::unserialize(&json!(["p", {"@": true}])).unwrap();
        assert_eq!(refined, Parameter::default().refined());
        assert!(Parameter::unserialize(&json!(["p", {"!": true}])).is_err());
        assert!(Parameter::unserialize(&json!(["p", {}])).is_err());
    }

    #[test]
    fn test_chain_links_must_be_bare() {
        let b = json!(["p", {"n": ["parameter_name", "b"]}]);
        let chain = json!(["p", {"n": ["parameter_name", "a"], ">": b}]);
        assert!(Parameter::unserialize(&chain).unwrap().is_chain());

        let labeled_head = json!(["p", {
            "n": ["parameter_name", "a"],
            "v": ["parameter_value", "1"],
            ">": b,
        }]);
        let flagged_head = json!(["p", {"!": true, "n": ["parameter_name", "a"], ">": b}]);
        let labeled_tail = json!(["p", {
            "n": ["parameter_name", "a"],
            ">": ["p", {"n": ["parameter_name", "b"], "_": ["parameter_value", "0"]}],
        }]);
        for data in [labeled_head, flagged_head, labeled_tail] {
            let err = Parameter::unserialize(&data).unwrap_err();
            assert!(matches!(err, ReconstructError::FieldType { .. }));
        }
    }

    #[test]
    fn test_prm_rejects_refined() {
        let data = json!(["prm", {"@": true, "v": ["parameter_value", "1"]}]);
        assert!(Prm::unserialize(&data).is_err());
        let data = json!(["prm", {"!": true, "v": ["parameter_value", "1"]}]);
        let prm = Prm::unserialize(&data).unwrap();
        assert!(prm.fixed);
    }

    #[test]
    fn test_value_literal_is_validated() {
        let err = ParameterValue::unserialize(&json!(["parameter_value", "abc"])).unwrap_err();
        assert!(matches!(err, ReconstructError::FieldType { .. }));
    }

    #[test]
    fn test_compact_values_are_strings() {
        let value = ParameterValue::from_literal("2`").unwrap();
        assert_eq!(value.serialize_with(SerializeMode::Compact), json!("2`"));
    }
}

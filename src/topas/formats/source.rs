//! Source text reconstruction
//!
//! Turns a tree back into TOPAS text with fixed canonical whitespace: one
//! space between tokens of a parameter, one space around binary operators,
//! none inside a value literal. Parsing the output yields the same tree.
//!
//! Parentheses are not stored in the tree. They are re-derived from the
//! operator table: an operator operand is wrapped when it binds looser than
//! its parent, or equally tight while sitting in a non-first slot or
//! repeating the parent's own operator.

use crate::topas::ast::{
    AxialConv, AxialField, Bkg, EquationBody, ExistingPrm, Formula, FormulaOp, FuncArg,
    FunctionCall, Local, Macro, NumRuns, NumRunsValue, Operand, Operator, Parameter,
    ParameterEquation, ParameterName, ParameterValue, Prm, PrmValue, Reporting, Root, Statement,
    Text, Xdd, XddSource, XDD_XY,
};

/// Render a node as TOPAS source
pub trait Unparse {
    fn unparse(&self) -> String;
}

/// Render a whole document
pub fn unparse(root: &Root) -> String {
    root.unparse()
}

/// JSON string quoting, which is also what the lexer unescapes
pub(crate) fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}

/// Join statements, adding a newline only where no line break statement
/// already separates them
///
/// Text captures never consume their newline, so a line break right after
/// text ends that line rather than adding a blank one.
fn join_statements(statements: &[Statement]) -> String {
    let mut out = String::new();
    for (idx, statement) in statements.iter().enumerate() {
        let separated = match idx.checked_sub(1).map(|prev| &statements[prev]) {
            None | Some(Statement::LineBreak) => true,
            Some(Statement::Text(_)) => statement.is_line_break(),
            Some(_) => false,
        };
        if !separated {
            out.push('\n');
        }
        out.push_str(&statement.unparse());
    }
    out
}

fn join_args(args: &[Option<FuncArg>]) -> String {
    args.iter()
        .map(|arg| arg.as_ref().map(Unparse::unparse).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Unparse for Text {
    fn unparse(&self) -> String {
        self.value.clone()
    }
}

impl Unparse for ParameterName {
    fn unparse(&self) -> String {
        self.name.clone()
    }
}

impl Unparse for ParameterValue {
    fn unparse(&self) -> String {
        self.to_string()
    }
}

impl Unparse for Reporting {
    fn unparse(&self) -> String {
        match self {
            Reporting::Value(value) => value.unparse(),
            Reporting::Text(text) => text.unparse(),
        }
    }
}

fn with_reporting(head: String, reporting: &Option<Reporting>) -> String {
    match reporting {
        Some(reporting) => format!("{} : {}", head, reporting.unparse()),
        None => head,
    }
}

impl Unparse for ParameterEquation {
    fn unparse(&self) -> String {
        let body = match &self.body {
            EquationBody::Formula(formula) => formula.unparse(),
            EquationBody::Text(text) => text.unparse(),
        };
        with_reporting(format!("= {};", body), &self.reporting)
    }
}

impl Unparse for PrmValue {
    fn unparse(&self) -> String {
        match self {
            PrmValue::Value(value) => value.unparse(),
            PrmValue::Equation(equation) => equation.unparse(),
            PrmValue::Text(text) => text.unparse(),
        }
    }
}

impl Unparse for Parameter {
    fn unparse(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.fixed {
            parts.push("!".to_string());
        }
        if self.refined {
            parts.push("@".to_string());
        }
        if let Some(name) = &self.name {
            parts.push(name.unparse());
        }
        if let Some(value) = &self.value {
            parts.push(value.unparse());
        }
        for (clause, value) in &self.clauses {
            parts.push(format!("{} {}", clause.keyword(), value.unparse()));
        }
        if let Some(next) = &self.next {
            parts.push(next.unparse());
        }
        parts.join(" ")
    }
}

impl Unparse for Prm {
    fn unparse(&self) -> String {
        format!("prm {}", self.to_parameter().unparse())
    }
}

impl Unparse for FuncArg {
    fn unparse(&self) -> String {
        match self {
            FuncArg::Formula(formula) => formula.unparse(),
            FuncArg::Str(value) => quote(value),
            FuncArg::Text(text) => text.unparse(),
        }
    }
}

impl Unparse for FunctionCall {
    fn unparse(&self) -> String {
        format!("{}({})", self.name, join_args(&self.args))
    }
}

/// Whether `child` at position `index` under `parent` needs parentheses
fn needs_parens(parent: Operator, child: &Operand, index: usize) -> bool {
    let child = match child {
        Operand::Op(op) if !op.operator.is_unary() => op.operator,
        _ => return false,
    };
    if parent.is_unary() {
        return true;
    }
    let (outer, inner) = (parent.precedence(), child.precedence());
    inner < outer || (inner == outer && (index > 0 || child == parent))
}

impl Unparse for FormulaOp {
    fn unparse(&self) -> String {
        let rendered: Vec<String> = self
            .operands
            .iter()
            .enumerate()
            .map(|(idx, operand)| {
                let text = operand.unparse();
                if needs_parens(self.operator, operand, idx) {
                    format!("( {} )", text)
                } else {
                    text
                }
            })
            .collect();

        if self.operator.is_unary() {
            format!("{} {}", self.operator.symbol(), rendered.join(" "))
        } else {
            rendered.join(&format!(" {} ", self.operator.symbol()))
        }
    }
}

impl Unparse for Operand {
    fn unparse(&self) -> String {
        match self {
            Operand::Call(call) => call.unparse(),
            Operand::Parameter(parameter) => parameter.unparse(),
            Operand::Op(op) => op.unparse(),
            Operand::Text(text) => text.unparse(),
        }
    }
}

impl Unparse for Formula {
    fn unparse(&self) -> String {
        self.value.unparse()
    }
}

impl Unparse for Local {
    fn unparse(&self) -> String {
        format!("local {}", self.parameter.unparse())
    }
}

impl Unparse for ExistingPrm {
    fn unparse(&self) -> String {
        let head = format!(
            "existing_prm {} {} {};",
            self.name.unparse(),
            self.op.symbol(),
            self.formula.unparse()
        );
        with_reporting(head, &self.reporting)
    }
}

impl Unparse for NumRuns {
    fn unparse(&self) -> String {
        match &self.value {
            NumRunsValue::Count(count) => format!("num_runs {}", count),
            NumRunsValue::Name(name) => format!("num_runs {}", name.unparse()),
        }
    }
}

impl Unparse for Xdd {
    fn unparse(&self) -> String {
        let mut parts = vec!["xdd".to_string()];
        match &self.source {
            XddSource::File(filename) => parts.push(quote(filename)),
            XddSource::Inline { xy, data } => {
                let mut block = vec!["{".to_string()];
                if *xy {
                    block.push(XDD_XY.to_string());
                }
                block.extend(data.iter().map(|n| n.to_string()));
                block.push("}".to_string());
                parts.push(block.join(" "));
            }
        }
        if let Some(range) = &self.range {
            parts.push(format!("range {}", range));
        }
        parts.extend(self.flags.iter().map(|flag| flag.keyword().to_string()));
        parts.join(" ")
    }
}

impl Unparse for AxialConv {
    fn unparse(&self) -> String {
        let mut parts = vec!["axial_conv".to_string()];
        for field in AxialField::ALL {
            if let Some(parameter) = self.get(field) {
                parts.push(format!("{} {}", field.keyword(), parameter.unparse()));
            }
        }
        parts.join(" ")
    }
}

impl Unparse for Bkg {
    fn unparse(&self) -> String {
        let params: Vec<String> = self.params.iter().map(Unparse::unparse).collect();
        format!("bkg {}", params.join(" "))
    }
}

impl Unparse for Macro {
    fn unparse(&self) -> String {
        let mut out = format!("macro {}", self.name);
        if !self.args.is_empty() {
            out.push_str(&format!("({})", join_args(&self.args)));
        }
        out.push(' ');

        match self.statements.as_slice() {
            [] => out.push_str("{}"),
            [single] if !single.is_line_break() => {
                out.push_str(&format!("{{ {} }}", single.unparse()));
            }
            statements => {
                out.push_str("{\n");
                out.push_str(&join_statements(statements));
                if !statements.last().is_some_and(Statement::is_line_break) {
                    out.push('\n');
                }
                out.push('}');
            }
        }
        out
    }
}

impl Unparse for Statement {
    fn unparse(&self) -> String {
        match self {
            Statement::LineBreak => "\n".to_string(),
            Statement::Text(text) => text.unparse(),
            Statement::Str(value) => quote(value),
            Statement::Formula(formula) => formula.unparse(),
            Statement::Prm(prm) => prm.unparse(),
            Statement::Local(local) => local.unparse(),
            Statement::ExistingPrm(existing) => existing.unparse(),
            Statement::NumRuns(num_runs) => num_runs.unparse(),
            Statement::Xdd(xdd) => xdd.unparse(),
            Statement::AxialConv(axial) => axial.unparse(),
            Statement::Bkg(bkg) => bkg.unparse(),
            Statement::Macro(macro_def) => macro_def.unparse(),
        }
    }
}

impl Unparse for Root {
    fn unparse(&self) -> String {
        join_statements(&self.statements)
    }
}

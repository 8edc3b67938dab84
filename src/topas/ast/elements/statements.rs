//! Keyword statements: local, existing_prm, num_runs, xdd, axial_conv, bkg

use std::collections::BTreeSet;

use super::formula::Formula;
use super::parameter::{Parameter, Reporting};
use super::text::ParameterName;
use crate::topas::ast::decimal::Decimal;

/// `local [!|@] name value [clauses]`
#[derive(Debug, Clone, PartialEq)]
pub struct Local {
    pub parameter: Parameter,
}

/// Operators allowed after `existing_prm name`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExistingOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    /// `*-`, kept for compatibility with older control files
    MulNeg,
    DivAssign,
    ExpAssign,
}

impl ExistingOp {
    pub const ALL: [ExistingOp; 7] = [
        ExistingOp::Assign,
        ExistingOp::AddAssign,
        ExistingOp::SubAssign,
        ExistingOp::MulAssign,
        ExistingOp::MulNeg,
        ExistingOp::DivAssign,
        ExistingOp::ExpAssign,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            ExistingOp::Assign => "=",
            ExistingOp::AddAssign => "+=",
            ExistingOp::SubAssign => "-=",
            ExistingOp::MulAssign => "*=",
            ExistingOp::MulNeg => "*-",
            ExistingOp::DivAssign => "/=",
            ExistingOp::ExpAssign => "^=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<ExistingOp> {
        ExistingOp::ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}

/// `existing_prm name op formula; [: reporting]`
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingPrm {
    pub name: ParameterName,
    pub op: ExistingOp,
    pub formula: Formula,
    pub reporting: Option<Reporting>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumRunsValue {
    Count(u64),
    Name(ParameterName),
}

/// `num_runs 10` or `num_runs name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumRuns {
    pub value: NumRunsValue,
}

/// Where the diffraction data of an `xdd` comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XddSource {
    File(String),
    /// `{ [_xy] n n n ... }`
    Inline { xy: bool, data: Vec<Decimal> },
}

/// Format and gui switches of an `xdd`, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum XddFlag {
    XyeFormat,
    GsasFormat,
    FullprofFormat,
    GuiReload,
    GuiIgnore,
}

impl XddFlag {
    pub const ALL: [XddFlag; 5] = [
        XddFlag::XyeFormat,
        XddFlag::GsasFormat,
        XddFlag::FullprofFormat,
        XddFlag::GuiReload,
        XddFlag::GuiIgnore,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            XddFlag::XyeFormat => "xye_format",
            XddFlag::GsasFormat => "gsas_format",
            XddFlag::FullprofFormat => "fullprof_format",
            XddFlag::GuiReload => "gui_reload",
            XddFlag::GuiIgnore => "gui_ignore",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<XddFlag> {
        XddFlag::ALL.into_iter().find(|f| f.keyword() == keyword)
    }
}

/// Wire name of the inline `_xy` switch
pub const XDD_XY: &str = "_xy";

/// `xdd source [range n] [flags]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xdd {
    pub source: XddSource,
    pub range: Option<Decimal>,
    pub flags: BTreeSet<XddFlag>,
}

impl Xdd {
    pub fn file(filename: impl Into<String>) -> Self {
        Self {
            source: XddSource::File(filename.into()),
            range: None,
            flags: BTreeSet::new(),
        }
    }

    pub fn inline(xy: bool, data: Vec<Decimal>) -> Self {
        Self {
            source: XddSource::Inline { xy, data },
            range: None,
            flags: BTreeSet::new(),
        }
    }

    pub fn with_flag(mut self, flag: XddFlag) -> Self {
        self.flags.insert(flag);
        self
    }
}

/// Keyword clauses of `axial_conv`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxialField {
    FilamentLength,
    SampleLength,
    ReceivingSlitLength,
    PrimarySollerAngle,
    SecondarySollerAngle,
    AxialNBeta,
}

impl AxialField {
    pub const ALL: [AxialField; 6] = [
        AxialField::FilamentLength,
        AxialField::SampleLength,
        AxialField::ReceivingSlitLength,
        AxialField::PrimarySollerAngle,
        AxialField::SecondarySollerAngle,
        AxialField::AxialNBeta,
    ];

    pub const REQUIRED: [AxialField; 3] = [
        AxialField::FilamentLength,
        AxialField::SampleLength,
        AxialField::ReceivingSlitLength,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            AxialField::FilamentLength => "filament_length",
            AxialField::SampleLength => "sample_length",
            AxialField::ReceivingSlitLength => "receiving_slit_length",
            AxialField::PrimarySollerAngle => "primary_soller_angle",
            AxialField::SecondarySollerAngle => "secondary_soller_angle",
            AxialField::AxialNBeta => "axial_n_beta",
        }
    }

    /// Key in the serialized options record; only optional fields have one
    pub fn key(self) -> Option<&'static str> {
        match self {
            AxialField::PrimarySollerAngle => Some("p"),
            AxialField::SecondarySollerAngle => Some("s"),
            AxialField::AxialNBeta => Some("b"),
            _ => None,
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<AxialField> {
        AxialField::ALL.into_iter().find(|f| f.keyword() == keyword)
    }
}

/// Axial divergence convolution
#[derive(Debug, Clone, PartialEq)]
pub struct AxialConv {
    pub filament_length: Parameter,
    pub sample_length: Parameter,
    pub receiving_slit_length: Parameter,
    pub primary_soller_angle: Option<Parameter>,
    pub secondary_soller_angle: Option<Parameter>,
    pub axial_n_beta: Option<Parameter>,
}

impl AxialConv {
    /// Assemble from clauses in any order; `None` when a required one is missing
    pub fn from_fields(fields: Vec<(AxialField, Parameter)>) -> Option<AxialConv> {
        let mut slots: [Option<Parameter>; 6] = Default::default();
        for (field, parameter) in fields {
            slots[field as usize] = Some(parameter);
        }
        let [filament, sample, receiving, primary, secondary, n_beta] = slots;
        Some(AxialConv {
            filament_length: filament?,
            sample_length: sample?,
            receiving_slit_length: receiving?,
            primary_soller_angle: primary,
            secondary_soller_angle: secondary,
            axial_n_beta: n_beta,
        })
    }

    pub fn get(&self, field: AxialField) -> Option<&Parameter> {
        match field {
            AxialField::FilamentLength => Some(&self.filament_length),
            AxialField::SampleLength => Some(&self.sample_length),
            AxialField::ReceivingSlitLength => Some(&self.receiving_slit_length),
            AxialField::PrimarySollerAngle => self.primary_soller_angle.as_ref(),
            AxialField::SecondarySollerAngle => self.secondary_soller_angle.as_ref(),
            AxialField::AxialNBeta => self.axial_n_beta.as_ref(),
        }
    }
}

/// Background polynomial coefficients
#[derive(Debug, Clone, PartialEq)]
pub struct Bkg {
    pub params: Vec<Parameter>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axial_conv_requires_three_lengths() {
        let p = || Parameter::named("x");
        assert!(AxialConv::from_fields(vec![
            (AxialField::SampleLength, p()),
            (AxialField::FilamentLength, p()),
        ])
        .is_none());

        let conv = AxialConv::from_fields(vec![
            (AxialField::AxialNBeta, p()),
            (AxialField::ReceivingSlitLength, p()),
            (AxialField::SampleLength, p()),
            (AxialField::FilamentLength, p()),
        ])
        .unwrap();
        assert!(conv.axial_n_beta.is_some());
        assert!(conv.primary_soller_angle.is_none());
    }

    #[test]
    fn test_existing_op_symbols() {
        for op in ExistingOp::ALL {
            assert_eq!(ExistingOp::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(ExistingOp::from_symbol("=="), None);
    }

    #[test]
    fn test_xdd_flags_sort_canonically() {
        let xdd = Xdd::file("a.xy")
            .with_flag(XddFlag::GuiIgnore)
            .with_flag(XddFlag::XyeFormat);
        let order: Vec<_> = xdd.flags.iter().map(|f| f.keyword()).collect();
        assert_eq!(order, vec!["xye_format", "gui_ignore"]);
    }
}

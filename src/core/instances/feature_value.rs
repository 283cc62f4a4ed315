use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    Numeric,
    Nominal,
}

impl Display for FeatureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureKind::Numeric => write!(f, "numeric"),
            FeatureKind::Nominal => write!(f, "nominal"),
        }
    }
}

/// One feature value. Nominal values are category indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FeatureValue {
    Numeric(f64),
    Nominal(usize),
}

impl FeatureValue {
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureValue::Numeric(_) => FeatureKind::Numeric,
            FeatureValue::Nominal(_) => FeatureKind::Nominal,
        }
    }
}

/// Supervision target: a class index or a numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Label {
    Class(usize),
    Numeric(f64),
}

impl Label {
    pub fn as_class(&self) -> Option<usize> {
        match self {
            Label::Class(c) => Some(*c),
            Label::Numeric(_) => None,
        }
    }

    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Label::Numeric(v) => Some(*v),
            Label::Class(_) => None,
        }
    }
}

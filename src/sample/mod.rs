use serde::{Serialize, Deserialize};
use std::fmt::{self, Display};

/// Dimensionality of every feature vector.
pub const N_FEATURES : usize = 4;

/// Number of classes the classifiers discriminate between.
pub const N_CLASSES : usize = 3;

pub type Features = [f64; N_FEATURES];

/// Class label of a record. Codes 1..=3 are the classes proper; Unknown (code 0)
/// marks input whose class name could not be recognized, and is never
/// used as a candidate class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Unknown,
    Setosa,
    Versicolor,
    Virginica
}

impl Label {

    /// Candidate classes, in the order they are examined (and in which ties are broken).
    pub const CLASSES : [Label; N_CLASSES] = [Label::Setosa, Label::Versicolor, Label::Virginica];

    pub fn code(&self) -> u8 {
        match self {
            Label::Unknown => 0,
            Label::Setosa => 1,
            Label::Versicolor => 2,
            Label::Virginica => 3
        }
    }

    pub fn from_code(code : u8) -> Self {
        match code {
            1 => Label::Setosa,
            2 => Label::Versicolor,
            3 => Label::Virginica,
            _ => Label::Unknown
        }
    }

    /// Position of the class in Label::CLASSES; None for Unknown.
    pub fn class_index(&self) -> Option<usize> {
        match self {
            Label::Unknown => None,
            other => Some(other.code() as usize - 1)
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Label::Unknown => "Unknown",
            Label::Setosa => "Iris-setosa",
            Label::Versicolor => "Iris-versicolor",
            Label::Virginica => "Iris-virginica"
        }
    }

}

impl<'a> From<&'a str> for Label {

    fn from(name : &'a str) -> Self {
        match name.trim() {
            "Iris-setosa" => Label::Setosa,
            "Iris-versicolor" => Label::Versicolor,
            "Iris-virginica" => Label::Virginica,
            _ => Label::Unknown
        }
    }

}

impl Display for Label {

    fn fmt(&self, f : &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.name())
    }

}

/// Labeled observation, immutable after ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {

    features : Features,

    label : Label
}

impl FeatureRecord {

    pub fn new(features : Features, label : Label) -> Self {
        Self { features, label }
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    pub fn label(&self) -> Label {
        self.label
    }

}

/// Outcome of classifying one held-out record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {

    pub features : Features,

    pub actual : Label,

    pub predicted : Label
}

impl Prediction {

    pub fn is_correct(&self) -> bool {
        self.actual == self.predicted
    }

}

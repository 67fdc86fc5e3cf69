use thiserror::Error;
use crate::matrix::MatrixError;
use crate::sample::{FeatureRecord, Features, Label, N_CLASSES, N_FEATURES};

/// Non-parametric classifier estimating class-conditional densities with a
/// Gaussian window centered at each training exemplar.
pub mod parzen;

/// Modified quadratic discriminant function, built on per-class mean vectors
/// and covariance matrices.
pub mod mqdf;

/// Random partitioning of a dataset into folds and round-robin cross-validation
/// of any Classifier over those folds.
pub mod validation;

pub use parzen::ParzenWindow;

pub use mqdf::QuadraticDiscriminant;

pub use validation::{CrossValidation, Diagnostic, RoundSummary, partition, N_FOLDS};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {

    #[error("Class {label} has {found} training exemplar(s), but at least {required} are required")]
    InsufficientSamples { label : Label, found : usize, required : usize },

    #[error("Covariance of class {label} has non-positive determinant {det}")]
    NonPositiveDeterminant { label : Label, det : f64 },

    #[error("Training partition has no labeled records")]
    EmptyTraining,

    #[error("Classifier used before being fitted")]
    NotFitted,

    #[error("No class could be estimated from the training partition")]
    NoCandidateClass,

    #[error("Partition index {0} outside valid range 0..5")]
    PartitionIndex(usize),

    #[error("Cross-validation requires 5 partitions, but {0} were informed")]
    PartitionCount(usize),

    #[error(transparent)]
    Matrix(#[from] MatrixError)

}

/// Summary of a call to Classifier::fit: how many exemplars of each class were seen,
/// and which classes were left out of scoring (with the reason).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FitReport {

    pub counts : [usize; N_CLASSES],

    pub excluded : Vec<(Label, ClassifyError)>
}

impl FitReport {

    /// Classes that will take part in prediction.
    pub fn fitted(&self) -> Vec<Label> {
        Label::CLASSES.iter()
            .filter(|l| !self.excluded.iter().any(|(ex, _)| ex == *l ) )
            .cloned()
            .collect()
    }

}

/// Trait shared by the classification strategies driven by CrossValidation.
/// Implementors own all the state estimated from the training records, and
/// discard it entirely at every call to fit(.), so that successive rounds never
/// accumulate statistics from one another.
pub trait Classifier {

    /// Short identifier, used when reporting results.
    fn name(&self) -> &'static str;

    /// Estimates the classifier state from the informed training records.
    /// Records labeled Unknown are ignored. Classes that cannot be estimated are
    /// listed in the report and excluded from prediction; an error is returned
    /// only if no labeled record is available at all.
    fn fit(&mut self, train : &[FeatureRecord]) -> Result<FitReport, ClassifyError>;

    /// Assigns one of the fitted classes to the feature vector x.
    fn predict(&self, x : &Features) -> Result<Label, ClassifyError>;

}

/// Splits the labeled records by class, in Label::CLASSES order.
pub(crate) fn group_by_class(train : &[FeatureRecord]) -> [Vec<Features>; N_CLASSES] {
    let mut groups : [Vec<Features>; N_CLASSES] = [Vec::new(), Vec::new(), Vec::new()];
    for rec in train {
        if let Some(ix) = rec.label().class_index() {
            groups[ix].push(*rec.features());
        }
    }
    groups
}

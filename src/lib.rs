/// Dense matrices with the arithmetic, determinant and LU-based inverse
/// required by the discriminant classifier.
pub mod matrix;

/// Labeled feature records and the prediction records produced from them.
pub mod sample;

/// Classification strategies (Parzen window and modified quadratic discriminant)
/// and the cross-validation harness that drives them.
pub mod fit;

/// Accuracy, confusion counts and per-class error rates of a set of predictions.
pub mod decision;

/// Reading records from delimited text and writing prediction tables.
pub mod table;

/// Run settings loaded from JSON.
pub mod config;

pub use matrix::{Matrix, MatrixError};

pub use sample::{FeatureRecord, Label, Prediction};

pub use fit::{Classifier, ClassifyError, CrossValidation, ParzenWindow, QuadraticDiscriminant};

use super::*;
use crate::matrix::Matrix;
use serde::{Serialize, Deserialize};

/// Sufficient statistics of one class within a training partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassStatistics {

    pub label : Label,

    pub count : usize,

    /// Mean feature vector (1 x 4)
    pub mean : Matrix,

    /// Unbiased sample covariance (4 x 4)
    pub cov : Matrix
}

impl ClassStatistics {

    /// Estimates the mean vector and the covariance matrix (with n - 1 divisor) of
    /// the informed exemplars. At least two exemplars are required.
    pub fn estimate(label : Label, samples : &[Features]) -> Result<Self, ClassifyError> {
        let n = samples.len();
        if n < 2 {
            return Err(ClassifyError::InsufficientSamples { label, found : n, required : 2 });
        }
        let mut sum = Matrix::zeros(1, N_FEATURES);
        for s in samples {
            sum = sum.add(&Matrix::row_vector(&s[..]))?;
        }
        let mean = sum.scale(1. / n as f64);

        // Centered data, one exemplar per row.
        let mut centered = Matrix::zeros(n, N_FEATURES);
        for (i, s) in samples.iter().enumerate() {
            let dev = Matrix::row_vector(&s[..]).subtract(&mean)?;
            for j in 0..N_FEATURES {
                centered.set(i, j, dev.get(0, j)?)?;
            }
        }
        let cov = centered.transpose()
            .multiply(&centered)?
            .scale(1. / (n - 1) as f64);
        Ok(Self { label, count : n, mean, cov })
    }

}

/// Per-class quantities used at prediction time, cached at fit time.
#[derive(Debug, Clone)]
struct Discriminant {

    stats : ClassStatistics,

    cov_inv : Matrix,

    log_det : f64
}

impl Discriminant {

    fn new(stats : ClassStatistics) -> Result<Self, ClassifyError> {
        let det = stats.cov.determinant()?;
        if !(det > 0.0) {
            return Err(ClassifyError::NonPositiveDeterminant { label : stats.label, det });
        }
        let cov_inv = stats.cov.inverse()?;
        Ok(Self { stats, cov_inv, log_det : det.ln() })
    }

    /// |(x - m) S^-1 (x - m)^T| + ln |S|
    fn score(&self, x : &Features) -> Result<f64, ClassifyError> {
        let dev = Matrix::row_vector(&x[..]).subtract(&self.stats.mean)?;
        let quad = dev.multiply(&self.cov_inv)?.multiply(&dev.transpose())?;
        Ok(quad.get(0, 0)?.abs() + self.log_det)
    }

}

/// Modified quadratic discriminant classifier: each class is summarized by its
/// mean vector and covariance matrix, and a sample goes to the class with the
/// smallest Mahalanobis distance penalized by the log-determinant of the class
/// covariance.
#[derive(Debug, Clone, Default)]
pub struct QuadraticDiscriminant {

    classes : Vec<Discriminant>,

    fitted : bool
}

impl QuadraticDiscriminant {

    pub fn new() -> Self {
        Default::default()
    }

    /// Statistics estimated for the informed class at the last fit, if the class
    /// could be estimated.
    pub fn statistics(&self, label : Label) -> Option<&ClassStatistics> {
        self.classes.iter()
            .find(|d| d.stats.label == label )
            .map(|d| &d.stats )
    }

    /// Discriminant score of every fitted class at x, in Label::CLASSES order.
    /// Lower is better.
    pub fn scores(&self, x : &Features) -> Result<Vec<(Label, f64)>, ClassifyError> {
        if !self.fitted {
            return Err(ClassifyError::NotFitted);
        }
        self.classes.iter()
            .map(|d| Ok((d.stats.label, d.score(x)?)) )
            .collect()
    }

}

impl Classifier for QuadraticDiscriminant {

    fn name(&self) -> &'static str {
        "MQDF"
    }

    fn fit(&mut self, train : &[FeatureRecord]) -> Result<FitReport, ClassifyError> {
        self.classes.clear();
        self.fitted = false;

        let groups = group_by_class(train);
        if groups.iter().all(|g| g.is_empty() ) {
            return Err(ClassifyError::EmptyTraining);
        }
        let mut report = FitReport::default();
        for (k, label) in Label::CLASSES.iter().enumerate() {
            report.counts[k] = groups[k].len();
            let estimated = ClassStatistics::estimate(*label, &groups[k][..])
                .and_then(Discriminant::new);
            match estimated {
                Ok(d) => self.classes.push(d),
                Err(e) => report.excluded.push((*label, e))
            }
        }
        self.fitted = true;
        Ok(report)
    }

    fn predict(&self, x : &Features) -> Result<Label, ClassifyError> {
        let mut best : Option<(Label, f64)> = None;
        for (label, s) in self.scores(x)? {
            match best {
                Some((_, b)) if s >= b => { },
                _ => best = Some((label, s))
            }
        }
        best.map(|(label, _)| label ).ok_or(ClassifyError::NoCandidateClass)
    }

}

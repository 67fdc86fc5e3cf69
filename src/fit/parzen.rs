use super::*;
use std::f64::consts::PI;

/// Standard isotropic Gaussian kernel over the 4-dimensional feature space,
/// i.e. the product of four independent unit-variance univariate normals.
pub fn gauss_window(u : &Features) -> f64 {
    let sq : f64 = u.iter().map(|ui| ui * ui ).sum();
    (-sq / 2.).exp() / (2. * PI).powi(2)
}

/// Parzen-window classifier. The density of class k at x is estimated as
/// (1 / n_k) Σ K((x - t) / h) / h^4 over the training exemplars t of class k,
/// and the class with the largest prior-weighted density is chosen.
#[derive(Debug, Clone)]
pub struct ParzenWindow {

    /// Window width
    h : f64,

    train : Vec<FeatureRecord>,

    counts : [usize; N_CLASSES],

    priors : [f64; N_CLASSES],

    fitted : bool
}

impl Default for ParzenWindow {

    fn default() -> Self {
        Self::new(1.0)
    }

}

impl ParzenWindow {

    /// Creates an unfitted classifier with window width h. Panics if h is not
    /// a positive finite number.
    pub fn new(h : f64) -> Self {
        assert!(h.is_finite() && h > 0.0, "Window width must be positive, found {}", h);
        Self {
            h,
            train : Vec::new(),
            counts : [0; N_CLASSES],
            priors : [0.0; N_CLASSES],
            fitted : false
        }
    }

    pub fn bandwidth(&self) -> f64 {
        self.h
    }

    /// Changes the window width. Takes effect on the next prediction; the
    /// class priors do not depend on it.
    pub fn set_bandwidth(&mut self, h : f64) {
        assert!(h.is_finite() && h > 0.0, "Window width must be positive, found {}", h);
        self.h = h;
    }

    pub fn priors(&self) -> &[f64; N_CLASSES] {
        &self.priors
    }

    pub fn counts(&self) -> &[usize; N_CLASSES] {
        &self.counts
    }

    /// Prior-weighted density of every candidate class at x. Classes with no
    /// training exemplars yield None.
    pub fn scores(&self, x : &Features) -> Result<[Option<f64>; N_CLASSES], ClassifyError> {
        if !self.fitted {
            return Err(ClassifyError::NotFitted);
        }
        let h_d = self.h.powi(4);
        let mut sums = [0.0; N_CLASSES];
        for t in self.train.iter() {
            if let Some(ix) = t.label().class_index() {
                let mut u = [0.0; N_FEATURES];
                for (ui, (xi, ti)) in u.iter_mut().zip(x.iter().zip(t.features().iter())) {
                    *ui = (xi - ti) / self.h;
                }
                sums[ix] += gauss_window(&u) / h_d;
            }
        }
        let mut scores = [None; N_CLASSES];
        for k in 0..N_CLASSES {
            if self.counts[k] > 0 {
                scores[k] = Some(self.priors[k] * (sums[k] / self.counts[k] as f64));
            }
        }
        Ok(scores)
    }

}

impl Classifier for ParzenWindow {

    fn name(&self) -> &'static str {
        "Parzen window"
    }

    fn fit(&mut self, train : &[FeatureRecord]) -> Result<FitReport, ClassifyError> {
        self.train.clear();
        self.counts = [0; N_CLASSES];
        self.priors = [0.0; N_CLASSES];
        self.fitted = false;

        for rec in train {
            if let Some(ix) = rec.label().class_index() {
                self.counts[ix] += 1;
                self.train.push(*rec);
            }
        }
        let n_total = self.train.len();
        if n_total == 0 {
            return Err(ClassifyError::EmptyTraining);
        }

        let mut report = FitReport { counts : self.counts, excluded : Vec::new() };
        for (k, label) in Label::CLASSES.iter().enumerate() {
            self.priors[k] = self.counts[k] as f64 / n_total as f64;
            if self.counts[k] == 0 {
                let err = ClassifyError::InsufficientSamples { label : *label, found : 0, required : 1 };
                report.excluded.push((*label, err));
            }
        }
        self.fitted = true;
        Ok(report)
    }

    fn predict(&self, x : &Features) -> Result<Label, ClassifyError> {
        let scores = self.scores(x)?;

        // Strict comparison: the first class reaching the maximum wins.
        let mut best : Option<(usize, f64)> = None;
        for (k, s) in scores.iter().enumerate() {
            if let Some(s) = s {
                match best {
                    Some((_, b)) if *s <= b => { },
                    _ => best = Some((k, *s))
                }
            }
        }
        best.map(|(k, _)| Label::CLASSES[k] ).ok_or(ClassifyError::NoCandidateClass)
    }

}

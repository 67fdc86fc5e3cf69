use crate::sample::{Label, Prediction};
use std::fmt::{self, Display};

const N_CODES : usize = 4;

/// Fraction of predictions whose predicted label equals the actual label.
/// None if there are no predictions.
pub fn accuracy(preds : &[Prediction]) -> Option<f64> {
    if preds.is_empty() {
        return None;
    }
    let correct = preds.iter().filter(|p| p.is_correct() ).count();
    Some(correct as f64 / preds.len() as f64)
}

/// One-vs-rest error rates of a class. true_pos + false_neg sum to one,
/// and so do true_neg + false_pos (whenever the corresponding actual
/// counts are non-zero).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorRate {

    pub true_pos : f64,

    pub true_neg : f64,

    pub false_pos : f64,

    pub false_neg : f64
}

/// Counts of (actual, predicted) label pairs, indexed by label code so that
/// Unknown predictions are kept as well.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Confusion {
    counts : [[usize; N_CODES]; N_CODES]
}

impl Confusion {

    pub fn from_predictions(preds : &[Prediction]) -> Self {
        let mut conf = Self::default();
        for p in preds {
            conf.counts[p.actual.code() as usize][p.predicted.code() as usize] += 1;
        }
        conf
    }

    pub fn count(&self, actual : Label, predicted : Label) -> usize {
        self.counts[actual.code() as usize][predicted.code() as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|row| row.iter().sum::<usize>() ).sum()
    }

    pub fn correct(&self) -> usize {
        (0..N_CODES).map(|i| self.counts[i][i] ).sum()
    }

    pub fn accuracy(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            n => Some(self.correct() as f64 / n as f64)
        }
    }

    /// Error rates of treating label as the positive class and every other label
    /// as negative. Rates with an empty denominator are zero.
    pub fn error_rate(&self, label : Label) -> ErrorRate {
        let k = label.code() as usize;
        let tp = self.counts[k][k];
        let fn_ : usize = (0..N_CODES).filter(|j| *j != k ).map(|j| self.counts[k][j] ).sum();
        let fp : usize = (0..N_CODES).filter(|i| *i != k ).map(|i| self.counts[i][k] ).sum();
        let tn = self.total() - tp - fn_ - fp;
        let ratio = |a : usize, b : usize| if a + b == 0 { 0.0 } else { a as f64 / (a + b) as f64 };
        ErrorRate {
            true_pos : ratio(tp, fn_),
            false_neg : ratio(fn_, tp),
            true_neg : ratio(tn, fp),
            false_pos : ratio(fp, tn)
        }
    }

}

impl Display for Confusion {

    fn fmt(&self, f : &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let labels = [Label::Unknown, Label::Setosa, Label::Versicolor, Label::Virginica];
        write!(f, "{:>16}", "actual\\predicted")?;
        for l in labels.iter() {
            write!(f, "{:>16}", l.name())?;
        }
        writeln!(f)?;
        for a in labels.iter() {
            write!(f, "{:>16}", a.name())?;
            for p in labels.iter() {
                write!(f, "{:>16}", self.count(*a, *p))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }

}

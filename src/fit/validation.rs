use super::*;
use crate::sample::Prediction;
use rand::Rng;

/// Number of partitions (and of rounds) of a cross-validation pass.
pub const N_FOLDS : usize = 5;

/// Randomly splits records into N_FOLDS disjoint partitions. Records are drawn
/// one at a time, uniformly from the remaining pool, and each drawn record goes
/// to partition (remaining - 1) / (N / N_FOLDS), where remaining is the pool
/// size before the draw. The last partition absorbs what is left over from the
/// integer division. Always returns N_FOLDS partitions, all empty if records is
/// empty.
pub fn partition<R>(mut records : Vec<FeatureRecord>, rng : &mut R) -> Vec<Vec<FeatureRecord>>
where
    R : Rng + ?Sized
{
    let split_size = (records.len() / N_FOLDS).max(1);
    let mut parts : Vec<Vec<FeatureRecord>> = (0..N_FOLDS).map(|_| Vec::new() ).collect();
    while !records.is_empty() {
        let remaining = records.len();
        let ix = rng.gen_range(0, remaining);
        let part = ((remaining - 1) / split_size).min(N_FOLDS - 1);
        parts[part].push(records.remove(ix));
    }
    parts
}

/// Failure reported while running a round. The round goes on with whatever
/// could still be estimated or scored.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {

    /// Partition used for training when the failure happened.
    pub training : usize,

    pub error : ClassifyError
}

/// Outcome of a single round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {

    pub training : usize,

    pub n_train : usize,

    pub n_tested : usize,

    pub n_correct : usize,

    /// Classes left out of scoring in this round.
    pub excluded : Vec<Label>
}

/// Round-robin cross-validation of a classifier over N_FOLDS partitions. At each
/// round one partition is used to fit the classifier and every record of the
/// remaining partitions is predicted. Predictions accumulate over rounds, in the
/// order they were made.
pub struct CrossValidation<C>
where
    C : Classifier
{

    classifier : C,

    partitions : Vec<Vec<FeatureRecord>>,

    training : usize,

    results : Vec<Prediction>,

    diagnostics : Vec<Diagnostic>
}

impl<C> CrossValidation<C>
where
    C : Classifier
{

    /// Partitions records at random with the informed generator.
    pub fn new<R>(records : Vec<FeatureRecord>, classifier : C, rng : &mut R) -> Self
    where
        R : Rng + ?Sized
    {
        let partitions = partition(records, rng);
        Self { classifier, partitions, training : 0, results : Vec::new(), diagnostics : Vec::new() }
    }

    /// Uses a split computed elsewhere. There must be exactly N_FOLDS partitions.
    pub fn from_partitions(partitions : Vec<Vec<FeatureRecord>>, classifier : C) -> Result<Self, ClassifyError> {
        if partitions.len() != N_FOLDS {
            return Err(ClassifyError::PartitionCount(partitions.len()));
        }
        Ok(Self { classifier, partitions, training : 0, results : Vec::new(), diagnostics : Vec::new() })
    }

    pub fn partitions(&self) -> &[Vec<FeatureRecord>] {
        &self.partitions[..]
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn training(&self) -> usize {
        self.training
    }

    /// Sets which partition will be used for training at the next round.
    pub fn select_training(&mut self, ix : usize) -> Result<(), ClassifyError> {
        if ix >= N_FOLDS {
            return Err(ClassifyError::PartitionIndex(ix));
        }
        self.training = ix;
        Ok(())
    }

    fn report(&mut self, error : ClassifyError) {
        let diag = Diagnostic { training : self.training, error };
        if self.diagnostics.last() != Some(&diag) {
            self.diagnostics.push(diag);
        }
    }

    /// Fits the classifier with the current training partition and predicts every
    /// record from the other partitions. Records that cannot be scored are
    /// recorded with the Unknown label, and the failure is kept as a diagnostic.
    pub fn run_round(&mut self) -> RoundSummary {
        let train_ix = self.training;
        let mut excluded = Vec::new();
        let fitted = match self.classifier.fit(&self.partitions[train_ix][..]) {
            Ok(report) => {
                for (label, e) in report.excluded {
                    excluded.push(label);
                    self.report(e);
                }
                true
            },
            Err(e) => {
                excluded.extend(Label::CLASSES.iter().cloned());
                self.report(e);
                false
            }
        };

        let mut n_tested = 0;
        let mut n_correct = 0;
        for part_ix in (0..N_FOLDS).filter(|ix| *ix != train_ix ) {
            for i in 0..self.partitions[part_ix].len() {
                let rec = self.partitions[part_ix][i];
                let predicted = if fitted {
                    match self.classifier.predict(rec.features()) {
                        Ok(label) => label,
                        Err(e) => {
                            self.report(e);
                            Label::Unknown
                        }
                    }
                } else {
                    Label::Unknown
                };
                let pred = Prediction { features : *rec.features(), actual : rec.label(), predicted };
                n_tested += 1;
                if pred.is_correct() {
                    n_correct += 1;
                }
                self.results.push(pred);
            }
        }

        RoundSummary {
            training : train_ix,
            n_train : self.partitions[train_ix].len(),
            n_tested,
            n_correct,
            excluded
        }
    }

    /// Runs the N_FOLDS rounds, using each partition for training exactly once.
    pub fn run(&mut self) -> Vec<RoundSummary> {
        let mut rounds = Vec::new();
        for ix in 0..N_FOLDS {
            self.training = ix;
            rounds.push(self.run_round());
        }
        rounds
    }

    pub fn results(&self) -> &[Prediction] {
        &self.results[..]
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics[..]
    }

    pub fn into_results(self) -> Vec<Prediction> {
        self.results
    }

}

use anyhow::{anyhow, Context};
use discrim::config::{Method, Settings};
use discrim::decision::Confusion;
use discrim::fit::{Classifier, CrossValidation, ParzenWindow, QuadraticDiscriminant, RoundSummary, N_FOLDS};
use discrim::sample::FeatureRecord;
use discrim::table;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{SeedableRng, rngs::StdRng};
use std::path::PathBuf;
use std::time::Instant;
use structopt::StructOpt;

/// Cross-validate a Parzen window or a modified quadratic discriminant classifier
/// over a labeled dataset (5 rounds, one partition used for training at each round).
#[derive(StructOpt, Debug)]
#[structopt(name = "discrim")]
struct Discrim {

    /// Comma-delimited dataset, with four features and the class name per line
    #[structopt(parse(from_os_str))]
    data : Option<PathBuf>,

    /// Classification method: parzen or mqdf
    #[structopt(short, long)]
    method : Option<Method>,

    /// Window width of the Parzen classifier
    #[structopt(short, long)]
    bandwidth : Option<f64>,

    /// Seed for the random partition of the dataset
    #[structopt(short, long)]
    seed : Option<u64>,

    /// Saves the per-sample results to this CSV file
    #[structopt(short, long, parse(from_os_str))]
    output : Option<PathBuf>,

    /// JSON settings file. Command-line options take precedence over it.
    #[structopt(short, long, parse(from_os_str))]
    config : Option<PathBuf>,

    /// Prints the summary of each round and the confusion table
    #[structopt(short, long)]
    verbose : bool,

    /// Prints the records of the first partition, and the predicted and actual
    /// class of every tested record
    #[structopt(short, long)]
    trace : bool
}

fn settings(opts : &Discrim) -> Result<Settings, anyhow::Error> {
    let mut settings = match &opts.config {
        Some(path) => Settings::load_from_path(path)?,
        None => Settings::default()
    };
    if let Some(method) = opts.method {
        settings.method = method;
    }
    if let Some(h) = opts.bandwidth {
        settings.bandwidth = h;
    }
    if opts.seed.is_some() {
        settings.seed = opts.seed;
    }
    if opts.data.is_some() {
        settings.data = opts.data.clone();
    }
    if opts.output.is_some() {
        settings.output = opts.output.clone();
    }
    settings.validate()?;
    Ok(settings)
}

fn describe(summary : &RoundSummary) -> String {
    let mut msg = format!(
        "Round {}: trained on {} records, {} of {} test records correct",
        summary.training + 1,
        summary.n_train,
        summary.n_correct,
        summary.n_tested
    );
    if !summary.excluded.is_empty() {
        let names : Vec<_> = summary.excluded.iter().map(|l| l.name() ).collect();
        msg += &format!(" (not scored: {})", names.join(", "));
    }
    msg
}

fn cross_validate<C>(
    records : Vec<FeatureRecord>,
    classifier : C,
    seed : Option<u64>,
    verbose : bool,
    trace : bool
) -> Result<CrossValidation<C>, anyhow::Error>
where
    C : Classifier
{
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy()
    };
    let mut cv = CrossValidation::new(records, classifier, &mut rng);
    let bar = ProgressBar::new(N_FOLDS as u64);
    bar.set_style(ProgressStyle::default_bar().template("{prefix} [{bar:30}] round {pos}/{len}"));
    bar.set_prefix(cv.classifier().name());
    if trace {
        for rec in cv.partitions()[0].iter() {
            let x = rec.features();
            bar.println(format!("Record: {} {} {} {}, class: {}", x[0], x[1], x[2], x[3], rec.label()));
        }
    }
    for ix in 0..N_FOLDS {
        cv.select_training(ix)?;
        let n_before = cv.results().len();
        let summary = cv.run_round();
        if trace {
            for p in cv.results()[n_before..].iter() {
                bar.println(format!("predicted: {}, actual: {}", p.predicted, p.actual));
            }
        }
        if verbose {
            bar.println(describe(&summary));
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(cv)
}

fn report<C>(cv : CrossValidation<C>, start : Instant, settings : &Settings, verbose : bool) -> Result<(), anyhow::Error>
where
    C : Classifier
{
    for diag in cv.diagnostics() {
        eprintln!("Round {}: {}", diag.training + 1, diag.error);
    }
    let conf = Confusion::from_predictions(cv.results());
    let accuracy = conf.accuracy()
        .ok_or_else(|| anyhow!("No records were classified") )?;
    println!("Classification accuracy: {:.2}%", accuracy * 100.);
    println!("The run time is {} ms", start.elapsed().as_millis());
    if verbose {
        print!("{}", conf);
    }
    if let Some(path) = &settings.output {
        table::save_predictions(path, cv.results())?;
        println!("Saved {} results to {}", cv.results().len(), path.display());
    }
    Ok(())
}

fn main() -> Result<(), anyhow::Error> {
    let opts = Discrim::from_args();
    let settings = settings(&opts)?;
    let data = settings.data.as_ref()
        .ok_or_else(|| anyhow!("Missing data file") )?;
    let records = table::load_records(data)
        .with_context(|| format!("Could not load records from {}", data.display()) )?;
    let start = Instant::now();
    match settings.method {
        Method::Parzen => {
            let cv = cross_validate(records, ParzenWindow::new(settings.bandwidth), settings.seed, opts.verbose, opts.trace)?;
            report(cv, start, &settings, opts.verbose)
        },
        Method::Mqdf => {
            let cv = cross_validate(records, QuadraticDiscriminant::new(), settings.seed, opts.verbose, opts.trace)?;
            report(cv, start, &settings, opts.verbose)
        }
    }
}

use discrim::*;
use discrim::config::{Method, Settings};
use discrim::decision::{accuracy, Confusion};
use discrim::fit::N_FOLDS;
use discrim::table;
use nalgebra::DMatrix;
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};

const CENTERS : [[f64; 4]; 3] = [
    [5., 3., 1., 0.],
    [6., 3., 4., 1.],
    [7., 3., 6., 2.]
];

/// n records per class, drawn around CENTERS with independent gaussian noise.
fn clusters(n : usize, sd : f64, seed : u64) -> Vec<FeatureRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, sd).unwrap();
    let mut recs = Vec::new();
    for (center, label) in CENTERS.iter().zip(Label::CLASSES.iter()) {
        for _ in 0..n {
            let mut x = *center;
            for v in x.iter_mut() {
                *v += noise.sample(&mut rng);
            }
            recs.push(FeatureRecord::new(x, *label));
        }
    }
    recs
}

fn full_pass<C : Classifier>(classifier : C) -> CrossValidation<C> {
    let mut rng = StdRng::seed_from_u64(17);
    let mut cv = CrossValidation::new(clusters(50, 0.15, 3), classifier, &mut rng);
    cv.run();
    cv
}

#[test]
fn held_out_sample_near_first_cluster() {
    let train = clusters(20, 0.1, 1);
    let x = [5.1, 3.0, 1.1, 0.1];

    let mut parzen = ParzenWindow::new(0.5);
    parzen.fit(&train).unwrap();
    assert_eq!(parzen.predict(&x).unwrap(), Label::Setosa);

    let mut mqdf = QuadraticDiscriminant::new();
    let report = mqdf.fit(&train).unwrap();
    assert!(report.excluded.is_empty());
    assert_eq!(report.counts, [20, 20, 20]);
    assert_eq!(mqdf.predict(&x).unwrap(), Label::Setosa);
}

#[test]
fn parzen_cross_validation() {
    let cv = full_pass(ParzenWindow::default());
    assert_eq!(cv.results().len(), (N_FOLDS - 1) * 150);
    assert!(cv.diagnostics().is_empty());
    assert!(accuracy(cv.results()).unwrap() > 0.9);
}

#[test]
fn mqdf_cross_validation() {
    let cv = full_pass(QuadraticDiscriminant::new());
    assert_eq!(cv.results().len(), (N_FOLDS - 1) * 150);
    let conf = Confusion::from_predictions(cv.results());
    assert_eq!(conf.total(), 600);
    assert!(conf.accuracy().unwrap() > 0.9);
    for l in Label::CLASSES.iter() {
        assert!(conf.error_rate(*l).true_pos > 0.8);
    }
}

#[test]
fn determinant_and_inverse_agree_with_nalgebra() {
    let mut rng = StdRng::seed_from_u64(5);
    let noise = Normal::new(0.0, 1.0).unwrap();
    for n in 2..6 {
        let vals : Vec<f64> = (0..n*n).map(|_| noise.sample(&mut rng) ).collect();
        let m = Matrix::from_row_slice(n, n, &vals);
        let dm = DMatrix::from_row_slice(n, n, &vals);
        approx::assert_relative_eq!(m.determinant().unwrap(), dm.determinant(), max_relative = 1e-6);
        let inv = DMatrix::from(&m.inverse().unwrap());
        let expected = dm.try_inverse().unwrap();
        assert!((inv - expected).abs().max() < 1e-6);
    }
}

#[test]
fn dataset_to_result_table() {
    let mut text = String::new();
    for rec in clusters(10, 0.1, 8) {
        let x = rec.features();
        text += &format!("{},{},{},{},{}\n", x[0], x[1], x[2], x[3], rec.label());
    }
    text += "5.0,3.0,1.0,0.0,Iris-unlisted\n";
    let records = table::read_records(text.as_bytes()).unwrap();
    assert_eq!(records.len(), 31);
    assert_eq!(records[30].label(), Label::Unknown);

    let settings = Settings::load(r#"{ "method" : "mqdf", "seed" : 11 }"#.as_bytes()).unwrap();
    assert_eq!(settings.method, Method::Mqdf);
    let mut rng = StdRng::seed_from_u64(settings.seed.unwrap());
    let mut cv = CrossValidation::new(records, QuadraticDiscriminant::new(), &mut rng);
    cv.run();
    let results = cv.into_results();
    assert_eq!(results.len(), 4 * 31);

    let mut buf : Vec<u8> = Vec::new();
    table::write_predictions(&mut buf, &results).unwrap();
    let out = String::from_utf8(buf).unwrap();
    assert_eq!(out.lines().next(), Some("val1,val2,val3,val4,predict,actual"));
    assert_eq!(out.lines().count(), 1 + results.len());
}

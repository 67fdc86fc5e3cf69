use anyhow::{bail, Context};
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use crate::sample::{FeatureRecord, Label, Prediction, N_FEATURES};

/// Reads comma-delimited records without header: four numeric features
/// followed by the class name. Unrecognized class names yield Label::Unknown.
/// Blank lines are skipped.
pub fn read_records<R>(reader : R) -> Result<Vec<FeatureRecord>, anyhow::Error>
where
    R : Read
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    for (ix, row) in csv_reader.records().enumerate() {
        let row = row.with_context(|| format!("Could not read record {}", ix + 1) )?;
        let line = row.position().map(|p| p.line() ).unwrap_or(ix as u64 + 1);
        if row.iter().all(|field| field.is_empty() ) {
            continue;
        }
        if row.len() < N_FEATURES + 1 {
            bail!("Line {} has {} field(s), but {} are required", line, row.len(), N_FEATURES + 1);
        }
        let mut features = [0.0; N_FEATURES];
        for (j, x) in features.iter_mut().enumerate() {
            *x = row[j].parse::<f64>()
                .with_context(|| format!("Invalid value {:?} for feature {} at line {}", &row[j], j + 1, line) )?;
        }
        records.push(FeatureRecord::new(features, Label::from(&row[N_FEATURES])));
    }
    Ok(records)
}

pub fn load_records<P>(path : P) -> Result<Vec<FeatureRecord>, anyhow::Error>
where
    P : AsRef<Path>
{
    let f = File::open(path.as_ref())
        .with_context(|| format!("Could not open dataset {}", path.as_ref().display()) )?;
    read_records(f)
}

/// Row of the result table, one per prediction.
#[derive(Serialize)]
struct ResultRow {
    val1 : f64,
    val2 : f64,
    val3 : f64,
    val4 : f64,
    predict : u8,
    actual : u8
}

impl<'a> From<&'a Prediction> for ResultRow {

    fn from(p : &'a Prediction) -> Self {
        Self {
            val1 : p.features[0],
            val2 : p.features[1],
            val3 : p.features[2],
            val4 : p.features[3],
            predict : p.predicted.code(),
            actual : p.actual.code()
        }
    }

}

/// Writes predictions as CSV with header val1,val2,val3,val4,predict,actual,
/// labels being written as their numeric codes.
pub fn write_predictions<W>(writer : W, preds : &[Prediction]) -> Result<(), anyhow::Error>
where
    W : Write
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for p in preds {
        csv_writer.serialize(ResultRow::from(p))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn save_predictions<P>(path : P, preds : &[Prediction]) -> Result<(), anyhow::Error>
where
    P : AsRef<Path>
{
    let f = File::create(path.as_ref())
        .with_context(|| format!("Could not create {}", path.as_ref().display()) )?;
    write_predictions(f, preds)
}

#[cfg(test)]
mod tests {

    use super::*;

    const IRIS_HEAD : &str = "5.1,3.5,1.4,0.2,Iris-setosa\n\
        7.0,3.2,4.7,1.4,Iris-versicolor\n\
        \n\
        6.3, 3.3, 6.0, 2.5, Iris-virginica\n\
        4.9,3.0,1.4,0.2,Iris-unknown\n";

    #[test]
    fn reads_records() {
        let recs = read_records(IRIS_HEAD.as_bytes()).unwrap();
        assert_eq!(recs.len(), 4);
        assert_eq!(recs[0], FeatureRecord::new([5.1, 3.5, 1.4, 0.2], Label::Setosa));
        assert_eq!(recs[1].label(), Label::Versicolor);
        assert_eq!(recs[2], FeatureRecord::new([6.3, 3.3, 6.0, 2.5], Label::Virginica));
        assert_eq!(recs[3].label(), Label::Unknown);
    }

    #[test]
    fn rejects_malformed_rows() {
        let short = read_records("5.1,3.5,1.4,Iris-setosa\n".as_bytes()).unwrap_err();
        assert!(format!("{}", short).contains("Line 1"));
        let bad = read_records("5.1,3.5,1.4,0.2,Iris-setosa\n5.1,x,1.4,0.2,Iris-setosa\n".as_bytes());
        let msg = format!("{:#}", bad.unwrap_err());
        assert!(msg.contains("feature 2 at line 2"), "{}", msg);
    }

    #[test]
    fn writes_result_table() {
        let preds = [
            Prediction { features : [5.1, 3.5, 1.4, 0.2], actual : Label::Setosa, predicted : Label::Setosa },
            Prediction { features : [6.3, 3.3, 6.0, 2.5], actual : Label::Virginica, predicted : Label::Unknown }
        ];
        let mut buf : Vec<u8> = Vec::new();
        write_predictions(&mut buf, &preds).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines : Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![
            "val1,val2,val3,val4,predict,actual",
            "5.1,3.5,1.4,0.2,1,1",
            "6.3,3.3,6.0,2.5,0,3"
        ]);
    }

}

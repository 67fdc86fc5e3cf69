use anyhow::{bail, Context};
use serde::{Serialize, Deserialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Classification strategy to cross-validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Parzen,
    Mqdf
}

impl FromStr for Method {

    type Err = String;

    fn from_str(s : &str) -> Result<Self, String> {
        match &s.to_lowercase()[..] {
            "parzen" | "1" => Ok(Method::Parzen),
            "mqdf" | "2" => Ok(Method::Mqdf),
            other => Err(format!("Unknown method: {} (expected parzen or mqdf)", other))
        }
    }

}

/// Settings of a cross-validation run, usually read from a JSON file such as
/// { "method" : "parzen", "bandwidth" : 0.5, "seed" : 42, "data" : "iris.data" }.
/// Missing fields take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {

    pub method : Method,

    /// Window width of the Parzen classifier
    pub bandwidth : f64,

    /// Seed for the partition draw. Partitions are drawn from entropy when absent.
    pub seed : Option<u64>,

    pub data : Option<PathBuf>,

    /// Destination of the per-sample results (CSV)
    pub output : Option<PathBuf>
}

impl Default for Settings {

    fn default() -> Self {
        Self {
            method : Method::Parzen,
            bandwidth : 1.0,
            seed : None,
            data : None,
            output : None
        }
    }

}

impl Settings {

    pub fn load_from_path<P>(path : P) -> Result<Self, anyhow::Error>
    where
        P : AsRef<Path>
    {
        let f = File::open(path.as_ref())
            .with_context(|| format!("Could not open settings {}", path.as_ref().display()) )?;
        Self::load(f)
    }

    pub fn load<R>(mut reader : R) -> Result<Self, anyhow::Error>
    where
        R : Read
    {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        let settings : Settings = serde_json::from_str(&content[..])
            .context("Invalid settings file")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save<W>(&self, mut writer : W) -> Result<(), anyhow::Error>
    where
        W : Write
    {
        let content = serde_json::to_string_pretty(self)?;
        writer.write_all(content.as_bytes())?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.bandwidth.is_finite() && self.bandwidth > 0.0) {
            bail!("Bandwidth must be a positive number, found {}", self.bandwidth);
        }
        Ok(())
    }

}

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use crate::engine::TrainingError;
use crate::features::FeatureRecord;
use crate::models::training::TrainingRow;

pub const TEST_FRACTION: f64 = 0.2;
pub const SPLIT_SEED: u64 = 42;

/// Labelled training table, one record per CSV row.
#[derive(Debug, Clone, Default)]
pub struct TrainingTable {
    pub records: Vec<FeatureRecord>,
    pub labels: Vec<String>,
}

/// Row indices of a train / held-out split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl TrainingTable {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TrainingError> {
        let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut table = TrainingTable::default();
        for row in csv.deserialize::<TrainingRow>() {
            let (record, label) = row?.into_labeled();
            table.records.push(record);
            table.labels.push(label);
        }
        Ok(table)
    }

    pub fn from_path(path: &Path) -> Result<Self, TrainingError> {
        let file = std::fs::File::open(path).map_err(|e| TrainingError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let table = Self::from_reader(file)?;
        info!("Loaded {} training rows from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Per-class shuffled split: each class contributes `round(n * test_fraction)` rows
    /// to the held-out side, but always keeps at least one row for training.
    pub fn stratified_split(&self, test_fraction: f64, seed: u64) -> Split {
        let mut by_class: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (i, label) in self.labels.iter().enumerate() {
            by_class.entry(label.as_str()).or_default().push(i);
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut split = Split {
            train: Vec::with_capacity(self.len()),
            test: Vec::new(),
        };
        for (_, mut indices) in by_class {
            indices.shuffle(&mut rng);
            let n = indices.len();
            let n_test = ((n as f64 * test_fraction).round() as usize).min(n - 1);
            split.test.extend_from_slice(&indices[..n_test]);
            split.train.extend_from_slice(&indices[n_test..]);
        }
        split.train.shuffle(&mut rng);
        split.test.shuffle(&mut rng);
        split
    }
}

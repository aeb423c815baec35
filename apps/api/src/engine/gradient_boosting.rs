//! Gradient-boosted decision trees over the label/scale encoding.
//!
//! Multinomial deviance: every stage fits one regression tree per class to the softmax
//! residuals `y_k - p_k`, with Newton-step leaf values
//! `(K-1)/K * Σr / Σ p(1-p)`. Raw scores start from the log class priors.
//!
//! # Split search
//! Feature columns are sorted once per tree; each node keeps its samples in per-feature
//! sorted order and partitions them stably on split, so a level costs O(n · features).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::encoding::{CategoricalVocabulary, EncodingError, LabelScaleArtifact};
use crate::engine::dataset::{TrainingTable, SPLIT_SEED, TEST_FRACTION};
use crate::engine::metrics::classification_report;
use crate::engine::{
    argmax, check_classes, softmax, EngineKind, Prediction, PredictionEngine, TrainingError,
    TrainingReport,
};
use crate::features::FeatureRecord;

/// Probabilities are clipped to `[EPS, 1 - EPS]` when taking log priors.
const PRIOR_EPS: f64 = f32::EPSILON as f64;
const MIN_SPLIT_GAIN: f64 = 1e-12;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for GradientBoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            learning_rate: 0.1,
            max_depth: 5,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut i = 0;
        loop {
            match self.nodes[i] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => i = if row[feature] <= threshold { left } else { right },
            }
        }
    }
}

struct TreeBuilder<'a> {
    rows: &'a [Vec<f64>],
    residuals: &'a [f64],
    probabilities: &'a [f64],
    params: &'a GradientBoostingParams,
    /// `(K-1)/K`
    leaf_scale: f64,
    goes_left: Vec<bool>,
    nodes: Vec<Node>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

impl<'a> TreeBuilder<'a> {
    fn build(mut self, sorted: Vec<Vec<usize>>) -> RegressionTree {
        self.grow(sorted, 0);
        RegressionTree { nodes: self.nodes }
    }

    fn grow(&mut self, sorted: Vec<Vec<usize>>, depth: usize) -> usize {
        let id = self.nodes.len();
        let samples = &sorted[0];
        let value = self.leaf_value(samples);
        self.nodes.push(Node::Leaf { value });

        if depth >= self.params.max_depth || samples.len() < self.params.min_samples_split {
            return id;
        }
        let Some(best) = self.best_split(&sorted) else {
            return id;
        };

        for &i in samples {
            self.goes_left[i] = self.rows[i][best.feature] <= best.threshold;
        }
        let (left, right): (Vec<_>, Vec<_>) = sorted
            .into_iter()
            .map(|column| column.into_iter().partition::<Vec<_>, _>(|&i| self.goes_left[i]))
            .unzip();

        let left = self.grow(left, depth + 1);
        let right = self.grow(right, depth + 1);
        self.nodes[id] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        id
    }

    /// Newton step on the multinomial deviance.
    fn leaf_value(&self, samples: &[usize]) -> f64 {
        let (num, den) = samples.iter().fold((0.0, 0.0), |(num, den), &i| {
            let p = self.probabilities[i];
            (num + self.residuals[i], den + p * (1.0 - p))
        });
        if den.abs() < 1e-150 {
            0.0
        } else {
            self.leaf_scale * num / den
        }
    }

    /// Maximises the squared-error reduction `sL²/nL + sR²/nR - s²/n`.
    fn best_split(&self, sorted: &[Vec<usize>]) -> Option<BestSplit> {
        let n = sorted[0].len();
        let total: f64 = sorted[0].iter().map(|&i| self.residuals[i]).sum();
        let parent = total * total / n as f64;
        let min_leaf = self.params.min_samples_leaf.max(1);

        let mut best: Option<BestSplit> = None;
        for (feature, column) in sorted.iter().enumerate() {
            let mut left_sum = 0.0;
            for j in 0..n - 1 {
                let i = column[j];
                left_sum += self.residuals[i];
                let n_left = j + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }
                let here = self.rows[i][feature];
                let next = self.rows[column[j + 1]][feature];
                if here >= next {
                    continue;
                }
                let right_sum = total - left_sum;
                let gain = left_sum * left_sum / n_left as f64
                    + right_sum * right_sum / n_right as f64
                    - parent;
                if gain > MIN_SPLIT_GAIN && best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(BestSplit {
                        feature,
                        threshold: here + (next - here) / 2.0,
                        gain,
                    });
                }
            }
        }
        best
    }
}

/// The boosted ensemble: `stages[m][k]` is stage `m`'s tree for class `k`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingModel {
    init: Vec<f64>,
    learning_rate: f64,
    stages: Vec<Vec<RegressionTree>>,
}

impl GradientBoostingModel {
    /// `y[i]` is a class index in `0..n_classes`; rows share one non-zero width.
    pub fn fit(
        rows: &[Vec<f64>],
        y: &[usize],
        n_classes: usize,
        params: &GradientBoostingParams,
    ) -> Self {
        let n = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        let mut counts = vec![0usize; n_classes];
        for &label in y {
            counts[label] += 1;
        }
        let init: Vec<f64> = counts
            .iter()
            .map(|&c| (c as f64 / n.max(1) as f64).clamp(PRIOR_EPS, 1.0 - PRIOR_EPS).ln())
            .collect();

        let presorted: Vec<Vec<usize>> = (0..width)
            .map(|f| {
                let mut idx: Vec<usize> = (0..n).collect();
                idx.sort_by(|&a, &b| rows[a][f].total_cmp(&rows[b][f]));
                idx
            })
            .collect();

        let leaf_scale = (n_classes as f64 - 1.0) / n_classes as f64;
        let mut raw: Vec<Vec<f64>> = vec![init.clone(); n];
        let mut stages = Vec::with_capacity(params.n_estimators);

        for stage in 0..params.n_estimators {
            let probabilities: Vec<Vec<f64>> = raw
                .iter()
                .map(|r| {
                    let mut p = r.clone();
                    softmax(&mut p);
                    p
                })
                .collect();

            let mut trees = Vec::with_capacity(n_classes);
            for k in 0..n_classes {
                let p_k: Vec<f64> = probabilities.iter().map(|p| p[k]).collect();
                let residuals: Vec<f64> = y
                    .iter()
                    .zip(&p_k)
                    .map(|(&label, &p)| if label == k { 1.0 - p } else { -p })
                    .collect();

                let tree = TreeBuilder {
                    rows,
                    residuals: &residuals,
                    probabilities: &p_k,
                    params,
                    leaf_scale,
                    goes_left: vec![false; n],
                    nodes: Vec::new(),
                }
                .build(presorted.clone());

                for (row, scores) in rows.iter().zip(raw.iter_mut()) {
                    scores[k] += params.learning_rate * tree.predict(row);
                }
                trees.push(tree);
            }
            stages.push(trees);

            if (stage + 1) % 50 == 0 {
                debug!("Boosting stage {}/{}", stage + 1, params.n_estimators);
            }
        }

        Self {
            init,
            learning_rate: params.learning_rate,
            stages,
        }
    }

    pub fn predict_proba(&self, row: &[f64]) -> Vec<f64> {
        let mut scores = self.init.clone();
        for trees in &self.stages {
            for (score, tree) in scores.iter_mut().zip(trees) {
                *score += self.learning_rate * tree.predict(row);
            }
        }
        softmax(&mut scores);
        scores
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingEngine {
    artifact: LabelScaleArtifact,
    model: GradientBoostingModel,
    report: TrainingReport,
}

fn encode_rows(
    artifact: &LabelScaleArtifact,
    table: &TrainingTable,
    indices: &[usize],
) -> Result<(Vec<Vec<f64>>, Vec<usize>), EncodingError> {
    indices
        .iter()
        .map(|&i| {
            let label = &table.labels[i];
            let code = artifact
                .target()
                .encode(label)
                .ok_or_else(|| EncodingError::UnknownLabel(label.clone()))?;
            Ok((artifact.transform(&table.records[i])?, code))
        })
        .collect::<Result<Vec<_>, EncodingError>>()
        .map(|pairs| pairs.into_iter().unzip())
}

impl GradientBoostingEngine {
    /// Encoders are fit on the whole table, the ensemble on the stratified training split.
    pub fn fit(table: &TrainingTable, params: &GradientBoostingParams) -> Result<Self, TrainingError> {
        check_classes(table)?;
        let artifact = LabelScaleArtifact::fit(&table.records, &table.labels)?;
        let split = table.stratified_split(TEST_FRACTION, SPLIT_SEED);

        let (x_train, y_train) = encode_rows(&artifact, table, &split.train)?;
        let model = GradientBoostingModel::fit(&x_train, &y_train, artifact.target().len(), params);

        let (x_test, y_test) = encode_rows(&artifact, table, &split.test)?;
        let y_pred: Vec<usize> = x_test.iter().map(|r| argmax(&model.predict_proba(r))).collect();

        let report = TrainingReport {
            engine: EngineKind::GradientBoosting,
            classes: artifact.target().classes().to_vec(),
            train_rows: split.train.len(),
            test_rows: split.test.len(),
            epochs_run: None,
            best_epoch: None,
            evaluation: classification_report(&y_test, &y_pred, artifact.target().classes()),
        };

        Ok(Self {
            artifact,
            model,
            report,
        })
    }
}

impl PredictionEngine for GradientBoostingEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::GradientBoosting
    }

    fn vocabulary(&self) -> &CategoricalVocabulary {
        self.artifact.vocabulary()
    }

    fn predict(&self, record: &FeatureRecord) -> Result<Prediction, EncodingError> {
        let row = self.artifact.transform(record)?;
        let probabilities = self.model.predict_proba(&row);
        Ok(Prediction::from_probabilities(self.artifact.target(), &probabilities))
    }

    fn report(&self) -> &TrainingReport {
        &self.report
    }
}

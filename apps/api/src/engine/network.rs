//! Embedding network.
//!
//! Each categorical field gets its own learned embedding table. The looked-up vectors are
//! concatenated after the scaled numerics and pass through dense blocks
//! (`Dense -> ReLU -> BatchNorm -> Dropout`) into a softmax head.
//!
//! All trainable values live in one flat parameter vector; `Layout` records where each
//! kernel, bias, scale and table sits. Gradients and AdamW moments share that layout, and a
//! best-epoch snapshot is a plain clone of `Weights`.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::encoding::{
    CategoricalVocabulary, EmbeddingArtifact, EmbeddingInput, EncodingError,
};
use crate::engine::dataset::{TrainingTable, SPLIT_SEED, TEST_FRACTION};
use crate::engine::metrics::classification_report;
use crate::engine::{
    argmax, check_classes, softmax, EngineKind, Prediction, PredictionEngine, TrainingError,
    TrainingReport,
};
use crate::features::{CategoricalField, FeatureRecord};

const BN_MOMENTUM: f64 = 0.99;
const BN_EPSILON: f64 = 1e-3;
const ADAM_BETA1: f64 = 0.9;
const ADAM_BETA2: f64 = 0.999;
const ADAM_EPSILON: f64 = 1e-7;
/// Probabilities are clipped to `[PROB_CLIP, 1 - PROB_CLIP]` inside the log.
const PROB_CLIP: f64 = 1e-7;
const EMBEDDING_INIT: f64 = 0.05;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkParams {
    pub hidden_widths: Vec<usize>,
    /// Dropout rate per hidden block; missing entries mean no dropout.
    pub dropout: Vec<f64>,
    pub learning_rate: f64,
    pub weight_decay: f64,
    pub batch_size: usize,
    pub epochs: usize,
    /// Epochs without a validation-loss improvement before training stops.
    pub patience: usize,
    pub seed: u64,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            hidden_widths: vec![256, 128, 64],
            dropout: vec![0.4, 0.3, 0.2],
            learning_rate: 0.001,
            weight_decay: 0.004,
            batch_size: 32,
            epochs: 50,
            patience: 7,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    Improved,
    Wait,
    Stop,
}

/// Tracks the best validation loss seen so far.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    patience: usize,
    best: f64,
    wait: usize,
}

impl EarlyStopping {
    pub fn new(patience: usize) -> Self {
        Self {
            patience,
            best: f64::INFINITY,
            wait: 0,
        }
    }

    pub fn observe(&mut self, loss: f64) -> StopSignal {
        if loss < self.best {
            self.best = loss;
            self.wait = 0;
            return StopSignal::Improved;
        }
        self.wait += 1;
        if self.wait >= self.patience {
            StopSignal::Stop
        } else {
            StopSignal::Wait
        }
    }

    pub fn best(&self) -> f64 {
        self.best
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Span {
    offset: usize,
    len: usize,
}

impl Span {
    fn range(self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

#[derive(Default)]
struct Allocator {
    next: usize,
}

impl Allocator {
    fn take(&mut self, len: usize) -> Span {
        let span = Span {
            offset: self.next,
            len,
        };
        self.next += len;
        span
    }
}

/// Kernel is `inputs x outputs`, row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Dense {
    kernel: Span,
    bias: Span,
    inputs: usize,
    outputs: usize,
}

impl Dense {
    fn allocate(alloc: &mut Allocator, inputs: usize, outputs: usize) -> Self {
        Self {
            kernel: alloc.take(inputs * outputs),
            bias: alloc.take(outputs),
            inputs,
            outputs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Block {
    dense: Dense,
    gamma: Span,
    beta: Span,
    dropout: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmbeddingTable {
    table: Span,
    width: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Layout {
    numeric_width: usize,
    embeddings: Vec<EmbeddingTable>,
    blocks: Vec<Block>,
    output: Dense,
    input_width: usize,
    n_params: usize,
}

impl Layout {
    fn new(artifact: &EmbeddingArtifact, params: &NetworkParams) -> Self {
        let mut alloc = Allocator::default();
        let embeddings: Vec<EmbeddingTable> = CategoricalField::ALL
            .iter()
            .map(|&field| {
                let width = artifact.embedding_width(field);
                EmbeddingTable {
                    table: alloc.take(artifact.vocab_size(field) * width),
                    width,
                }
            })
            .collect();

        let numeric_width = artifact.numeric_width();
        let input_width = numeric_width + embeddings.iter().map(|e| e.width).sum::<usize>();

        let mut previous = input_width;
        let mut blocks = Vec::with_capacity(params.hidden_widths.len());
        for (i, &width) in params.hidden_widths.iter().enumerate() {
            blocks.push(Block {
                dense: Dense::allocate(&mut alloc, previous, width),
                gamma: alloc.take(width),
                beta: alloc.take(width),
                dropout: params.dropout.get(i).copied().unwrap_or(0.0),
            });
            previous = width;
        }
        let output = Dense::allocate(&mut alloc, previous, artifact.target().len());

        Self {
            numeric_width,
            embeddings,
            blocks,
            output,
            input_width,
            n_params: alloc.next,
        }
    }
}

/// Everything a best-epoch snapshot needs to restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Weights {
    params: Vec<f64>,
    moving_mean: Vec<Vec<f64>>,
    moving_var: Vec<Vec<f64>>,
}

fn dense_forward(params: &[f64], layer: &Dense, x: &[f64], m: usize) -> Vec<f64> {
    let (n_in, n_out) = (layer.inputs, layer.outputs);
    let kernel = &params[layer.kernel.range()];
    let bias = &params[layer.bias.range()];

    let mut out = Vec::with_capacity(m * n_out);
    for r in 0..m {
        out.extend_from_slice(bias);
        let row = &x[r * n_in..(r + 1) * n_in];
        let target = &mut out[r * n_out..];
        for (i, &xi) in row.iter().enumerate() {
            if xi == 0.0 {
                continue;
            }
            let weights = &kernel[i * n_out..(i + 1) * n_out];
            for (o, &w) in target.iter_mut().zip(weights) {
                *o += xi * w;
            }
        }
    }
    out
}

/// Accumulates kernel and bias gradients into `grads`; returns the input gradient.
fn dense_backward(
    params: &[f64],
    layer: &Dense,
    x: &[f64],
    dz: &[f64],
    m: usize,
    grads: &mut [f64],
) -> Vec<f64> {
    let (n_in, n_out) = (layer.inputs, layer.outputs);
    let kernel = &params[layer.kernel.range()];
    let mut dx = vec![0.0; m * n_in];

    for r in 0..m {
        let xr = &x[r * n_in..(r + 1) * n_in];
        let dzr = &dz[r * n_out..(r + 1) * n_out];

        let grad_kernel = &mut grads[layer.kernel.range()];
        for (i, &xi) in xr.iter().enumerate() {
            for (g, &d) in grad_kernel[i * n_out..(i + 1) * n_out].iter_mut().zip(dzr) {
                *g += xi * d;
            }
        }
        for (g, &d) in grads[layer.bias.range()].iter_mut().zip(dzr) {
            *g += d;
        }
        for (i, dxi) in dx[r * n_in..(r + 1) * n_in].iter_mut().enumerate() {
            *dxi = kernel[i * n_out..(i + 1) * n_out]
                .iter()
                .zip(dzr)
                .map(|(w, d)| w * d)
                .sum();
        }
    }
    dx
}

/// Per-column mean and biased variance of an `m x width` matrix.
fn moments(values: &[f64], m: usize, width: usize) -> (Vec<f64>, Vec<f64>) {
    let mut mean = vec![0.0; width];
    for (idx, &v) in values.iter().enumerate() {
        mean[idx % width] += v;
    }
    mean.iter_mut().for_each(|v| *v /= m as f64);

    let mut var = vec![0.0; width];
    for (idx, &v) in values.iter().enumerate() {
        let d = v - mean[idx % width];
        var[idx % width] += d * d;
    }
    var.iter_mut().for_each(|v| *v /= m as f64);
    (mean, var)
}

fn glorot_uniform<R: Rng>(rng: &mut R, slot: &mut [f64], inputs: usize, outputs: usize) {
    let limit = (6.0 / (inputs + outputs) as f64).sqrt();
    for w in slot {
        *w = rng.gen_range(-limit..=limit);
    }
}

/// Adam with decoupled weight decay.
#[derive(Debug, Clone)]
struct AdamW {
    learning_rate: f64,
    weight_decay: f64,
    first_moment: Vec<f64>,
    second_moment: Vec<f64>,
    steps: i32,
}

impl AdamW {
    fn new(learning_rate: f64, weight_decay: f64, n_params: usize) -> Self {
        Self {
            learning_rate,
            weight_decay,
            first_moment: vec![0.0; n_params],
            second_moment: vec![0.0; n_params],
            steps: 0,
        }
    }

    fn step(&mut self, params: &mut [f64], grads: &[f64]) {
        self.steps += 1;
        let alpha = self.learning_rate * (1.0 - ADAM_BETA2.powi(self.steps)).sqrt()
            / (1.0 - ADAM_BETA1.powi(self.steps));
        let decay = self.learning_rate * self.weight_decay;

        for (((p, &g), m), v) in params
            .iter_mut()
            .zip(grads)
            .zip(self.first_moment.iter_mut())
            .zip(self.second_moment.iter_mut())
        {
            *p -= *p * decay;
            *m += (g - *m) * (1.0 - ADAM_BETA1);
            *v += (g * g - *v) * (1.0 - ADAM_BETA2);
            *p -= alpha * *m / (v.sqrt() + ADAM_EPSILON);
        }
    }
}

struct BlockCache {
    input: Vec<f64>,
    pre_activation: Vec<f64>,
    normalized: Vec<f64>,
    inv_std: Vec<f64>,
    mask: Vec<f64>,
}

/// One training-mode forward and backward pass over a batch.
struct Pass {
    loss: f64,
    grads: Vec<f64>,
    batch_means: Vec<Vec<f64>>,
    batch_vars: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Copy)]
struct TrainingOutcome {
    epochs_run: usize,
    best_epoch: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Network {
    layout: Layout,
    weights: Weights,
}

impl Network {
    fn new<R: Rng>(artifact: &EmbeddingArtifact, params: &NetworkParams, rng: &mut R) -> Self {
        let layout = Layout::new(artifact, params);
        let mut values = vec![0.0; layout.n_params];

        for table in &layout.embeddings {
            for v in &mut values[table.table.range()] {
                *v = rng.gen_range(-EMBEDDING_INIT..=EMBEDDING_INIT);
            }
        }
        for block in &layout.blocks {
            let dense = &block.dense;
            glorot_uniform(rng, &mut values[dense.kernel.range()], dense.inputs, dense.outputs);
            values[block.gamma.range()].fill(1.0);
        }
        let output = &layout.output;
        glorot_uniform(rng, &mut values[output.kernel.range()], output.inputs, output.outputs);

        let weights = Weights {
            params: values,
            moving_mean: layout.blocks.iter().map(|b| vec![0.0; b.dense.outputs]).collect(),
            moving_var: layout.blocks.iter().map(|b| vec![1.0; b.dense.outputs]).collect(),
        };
        Self { layout, weights }
    }

    /// Numerics followed by each field's embedding row.
    fn assemble(&self, batch: &[&EmbeddingInput]) -> Vec<f64> {
        let mut x = Vec::with_capacity(batch.len() * self.layout.input_width);
        for input in batch {
            x.extend_from_slice(&input.numeric);
            for (table, &token) in self.layout.embeddings.iter().zip(&input.tokens) {
                let start = table.table.offset + token * table.width;
                x.extend_from_slice(&self.weights.params[start..start + table.width]);
            }
        }
        x
    }

    /// Inference mode: moving statistics, no dropout. One probability row per input.
    fn predict_batch(&self, batch: &[&EmbeddingInput]) -> Vec<Vec<f64>> {
        let m = batch.len();
        let params = &self.weights.params;
        let mut x = self.assemble(batch);

        for (b, block) in self.layout.blocks.iter().enumerate() {
            let h = block.dense.outputs;
            let z = dense_forward(params, &block.dense, &x, m);
            let mean = &self.weights.moving_mean[b];
            let var = &self.weights.moving_var[b];
            let gamma = &params[block.gamma.range()];
            let beta = &params[block.beta.range()];
            x = z
                .iter()
                .enumerate()
                .map(|(idx, &v)| {
                    let j = idx % h;
                    gamma[j] * (v.max(0.0) - mean[j]) / (var[j] + BN_EPSILON).sqrt() + beta[j]
                })
                .collect();
        }

        let k = self.layout.output.outputs;
        dense_forward(params, &self.layout.output, &x, m)
            .chunks(k)
            .map(|row| {
                let mut p = row.to_vec();
                softmax(&mut p);
                p
            })
            .collect()
    }

    fn cross_entropy(&self, batch: &[&EmbeddingInput], targets: &[usize]) -> f64 {
        let total: f64 = self
            .predict_batch(batch)
            .iter()
            .zip(targets)
            .map(|(p, &t)| -p[t].clamp(PROB_CLIP, 1.0 - PROB_CLIP).ln())
            .sum();
        total / targets.len().max(1) as f64
    }

    fn forward_backward<R: Rng>(
        &self,
        batch: &[&EmbeddingInput],
        targets: &[usize],
        rng: &mut R,
    ) -> Pass {
        let m = batch.len();
        let mf = m as f64;
        let params = &self.weights.params;
        let mut x = self.assemble(batch);

        let mut caches = Vec::with_capacity(self.layout.blocks.len());
        let mut batch_means = Vec::with_capacity(self.layout.blocks.len());
        let mut batch_vars = Vec::with_capacity(self.layout.blocks.len());

        for block in &self.layout.blocks {
            let h = block.dense.outputs;
            let z = dense_forward(params, &block.dense, &x, m);
            let activated: Vec<f64> = z.iter().map(|v| v.max(0.0)).collect();
            let (mean, var) = moments(&activated, m, h);
            let inv_std: Vec<f64> = var.iter().map(|v| 1.0 / (v + BN_EPSILON).sqrt()).collect();
            let gamma = &params[block.gamma.range()];
            let beta = &params[block.beta.range()];
            let keep = 1.0 - block.dropout;

            let mut normalized = Vec::with_capacity(m * h);
            let mut mask = Vec::with_capacity(m * h);
            let mut out = Vec::with_capacity(m * h);
            for (idx, &a) in activated.iter().enumerate() {
                let j = idx % h;
                let xhat = (a - mean[j]) * inv_std[j];
                let scale = if block.dropout <= 0.0 {
                    1.0
                } else if rng.gen::<f64>() < keep {
                    1.0 / keep
                } else {
                    0.0
                };
                normalized.push(xhat);
                mask.push(scale);
                out.push((gamma[j] * xhat + beta[j]) * scale);
            }

            caches.push(BlockCache {
                input: std::mem::replace(&mut x, out),
                pre_activation: z,
                normalized,
                inv_std,
                mask,
            });
            batch_means.push(mean);
            batch_vars.push(var);
        }

        let output = &self.layout.output;
        let k = output.outputs;
        let logits = dense_forward(params, output, &x, m);
        let mut loss = 0.0;
        let mut dlogits = Vec::with_capacity(m * k);
        for (row, &target) in logits.chunks(k).zip(targets) {
            let mut p = row.to_vec();
            softmax(&mut p);
            loss -= p[target].clamp(PROB_CLIP, 1.0 - PROB_CLIP).ln();
            for (j, &pj) in p.iter().enumerate() {
                let y = if j == target { 1.0 } else { 0.0 };
                dlogits.push((pj - y) / mf);
            }
        }

        let mut grads = vec![0.0; self.layout.n_params];
        let mut dx = dense_backward(params, output, &x, &dlogits, m, &mut grads);

        for (block, cache) in self.layout.blocks.iter().zip(caches).rev() {
            let h = block.dense.outputs;
            let gamma = &params[block.gamma.range()];
            let mut dgamma = vec![0.0; h];
            let mut dbeta = vec![0.0; h];
            let mut sum_dxhat = vec![0.0; h];
            let mut sum_dxhat_xhat = vec![0.0; h];
            let mut dxhat = Vec::with_capacity(m * h);
            for (idx, (&d, &scale)) in dx.iter().zip(&cache.mask).enumerate() {
                let j = idx % h;
                let dy = d * scale;
                let xhat = cache.normalized[idx];
                dgamma[j] += dy * xhat;
                dbeta[j] += dy;
                let g = dy * gamma[j];
                sum_dxhat[j] += g;
                sum_dxhat_xhat[j] += g * xhat;
                dxhat.push(g);
            }
            for (g, d) in grads[block.gamma.range()].iter_mut().zip(&dgamma) {
                *g += d;
            }
            for (g, d) in grads[block.beta.range()].iter_mut().zip(&dbeta) {
                *g += d;
            }

            let dz: Vec<f64> = dxhat
                .iter()
                .enumerate()
                .map(|(idx, &g)| {
                    if cache.pre_activation[idx] <= 0.0 {
                        return 0.0;
                    }
                    let j = idx % h;
                    cache.inv_std[j] / mf
                        * (mf * g - sum_dxhat[j] - cache.normalized[idx] * sum_dxhat_xhat[j])
                })
                .collect();
            dx = dense_backward(params, &block.dense, &cache.input, &dz, m, &mut grads);
        }

        let width = self.layout.input_width;
        for (r, input) in batch.iter().enumerate() {
            let mut column = self.layout.numeric_width;
            for (table, &token) in self.layout.embeddings.iter().zip(&input.tokens) {
                let start = table.table.offset + token * table.width;
                let upstream = &dx[r * width + column..r * width + column + table.width];
                for (g, d) in grads[start..start + table.width].iter_mut().zip(upstream) {
                    *g += d;
                }
                column += table.width;
            }
        }

        Pass {
            loss: loss / mf,
            grads,
            batch_means,
            batch_vars,
        }
    }

    fn apply(&mut self, pass: &Pass, optimizer: &mut AdamW) {
        optimizer.step(&mut self.weights.params, &pass.grads);
        let moving = self
            .weights
            .moving_mean
            .iter_mut()
            .zip(&pass.batch_means)
            .chain(self.weights.moving_var.iter_mut().zip(&pass.batch_vars));
        for (running, batch) in moving {
            for (r, &b) in running.iter_mut().zip(batch) {
                *r = *r * BN_MOMENTUM + b * (1.0 - BN_MOMENTUM);
            }
        }
    }

    /// Mini-batch training with per-epoch shuffling. The weights of the epoch with the
    /// lowest validation loss are restored at the end.
    fn train(
        &mut self,
        train: (&[&EmbeddingInput], &[usize]),
        validation: (&[&EmbeddingInput], &[usize]),
        params: &NetworkParams,
        rng: &mut StdRng,
    ) -> TrainingOutcome {
        let (inputs, targets) = train;
        let mut optimizer = AdamW::new(params.learning_rate, params.weight_decay, self.layout.n_params);
        let mut stopping = EarlyStopping::new(params.patience);
        let mut order: Vec<usize> = (0..inputs.len()).collect();
        let mut best: Option<(Weights, usize)> = None;
        let mut epochs_run = 0;

        for epoch in 1..=params.epochs {
            order.shuffle(rng);
            let mut epoch_loss = 0.0;
            for chunk in order.chunks(params.batch_size.max(1)) {
                let batch: Vec<&EmbeddingInput> = chunk.iter().map(|&i| inputs[i]).collect();
                let batch_targets: Vec<usize> = chunk.iter().map(|&i| targets[i]).collect();
                let pass = self.forward_backward(&batch, &batch_targets, rng);
                epoch_loss += pass.loss * chunk.len() as f64;
                self.apply(&pass, &mut optimizer);
            }
            epochs_run = epoch;

            let val_loss = self.cross_entropy(validation.0, validation.1);
            debug!(
                "Epoch {epoch}/{}: loss={:.4} val_loss={val_loss:.4}",
                params.epochs,
                epoch_loss / inputs.len().max(1) as f64
            );
            match stopping.observe(val_loss) {
                StopSignal::Improved => best = Some((self.weights.clone(), epoch)),
                StopSignal::Wait => {}
                StopSignal::Stop => {
                    info!(
                        "Early stopping at epoch {epoch}, best val_loss={:.4}",
                        stopping.best()
                    );
                    break;
                }
            }
        }

        let best_epoch = best.map(|(weights, epoch)| {
            self.weights = weights;
            epoch
        });
        TrainingOutcome {
            epochs_run,
            best_epoch,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingNetworkEngine {
    artifact: EmbeddingArtifact,
    network: Network,
    report: TrainingReport,
}

fn encode_inputs(
    artifact: &EmbeddingArtifact,
    table: &TrainingTable,
    indices: &[usize],
) -> Result<(Vec<EmbeddingInput>, Vec<usize>), EncodingError> {
    let mut inputs = Vec::with_capacity(indices.len());
    let mut codes = Vec::with_capacity(indices.len());
    for &i in indices {
        let label = &table.labels[i];
        codes.push(
            artifact
                .target()
                .encode(label)
                .ok_or_else(|| EncodingError::UnknownLabel(label.clone()))?,
        );
        inputs.push(artifact.transform(&table.records[i])?);
    }
    Ok((inputs, codes))
}

impl EmbeddingNetworkEngine {
    /// Encoders see the whole table. Held-out rows drive early stopping and the final
    /// evaluation; with none held out, the training rows stand in for validation.
    pub fn fit(table: &TrainingTable, params: &NetworkParams) -> Result<Self, TrainingError> {
        check_classes(table)?;
        let artifact = EmbeddingArtifact::fit(&table.records, &table.labels)?;
        let split = table.stratified_split(TEST_FRACTION, SPLIT_SEED);

        let (x_train, y_train) = encode_inputs(&artifact, table, &split.train)?;
        let (x_test, y_test) = encode_inputs(&artifact, table, &split.test)?;
        let train_refs: Vec<&EmbeddingInput> = x_train.iter().collect();
        let test_refs: Vec<&EmbeddingInput> = x_test.iter().collect();

        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut network = Network::new(&artifact, params, &mut rng);
        info!(
            "Embedding network: {} inputs, hidden {:?}, {} parameters",
            network.layout.input_width, params.hidden_widths, network.layout.n_params
        );

        let validation = if test_refs.is_empty() {
            (train_refs.as_slice(), y_train.as_slice())
        } else {
            (test_refs.as_slice(), y_test.as_slice())
        };
        let outcome = network.train(
            (train_refs.as_slice(), y_train.as_slice()),
            validation,
            params,
            &mut rng,
        );

        let y_pred: Vec<usize> = network
            .predict_batch(&test_refs)
            .iter()
            .map(|p| argmax(p))
            .collect();

        let report = TrainingReport {
            engine: EngineKind::Embedding,
            classes: artifact.target().classes().to_vec(),
            train_rows: split.train.len(),
            test_rows: split.test.len(),
            epochs_run: Some(outcome.epochs_run),
            best_epoch: outcome.best_epoch,
            evaluation: classification_report(&y_test, &y_pred, artifact.target().classes()),
        };

        Ok(Self {
            artifact,
            network,
            report,
        })
    }
}

impl PredictionEngine for EmbeddingNetworkEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Embedding
    }

    fn vocabulary(&self) -> &CategoricalVocabulary {
        self.artifact.vocabulary()
    }

    fn predict(&self, record: &FeatureRecord) -> Result<Prediction, EncodingError> {
        let input = self.artifact.transform(record)?;
        let probabilities = self.network.predict_batch(&[&input]).pop().unwrap_or_default();
        Ok(Prediction::from_probabilities(self.artifact.target(), &probabilities))
    }

    fn report(&self) -> &TrainingReport {
        &self.report
    }
}

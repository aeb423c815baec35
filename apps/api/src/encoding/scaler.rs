use serde::{Deserialize, Serialize};

/// Zero-mean / unit-variance scaling per column (population standard deviation).
/// Constant columns keep a scale of 1 so they transform to 0 instead of NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// `None` for an empty row set.
    pub fn fit<R: AsRef<[f64]>>(rows: &[R]) -> Option<Self> {
        let width = rows.first()?.as_ref().len();
        let n = rows.len() as f64;

        let mut mean = vec![0.0; width];
        for row in rows {
            for (m, v) in mean.iter_mut().zip(row.as_ref()) {
                *m += v;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut variance = vec![0.0; width];
        for row in rows {
            for ((var, v), m) in variance.iter_mut().zip(row.as_ref()).zip(&mean) {
                *var += (v - m).powi(2);
            }
        }
        let scale = variance
            .into_iter()
            .map(|var| {
                let std = (var / n).sqrt();
                if std > f64::EPSILON {
                    std
                } else {
                    1.0
                }
            })
            .collect();

        Some(Self { mean, scale })
    }

    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(v, (m, s))| (v - m) / s)
            .collect()
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }
}

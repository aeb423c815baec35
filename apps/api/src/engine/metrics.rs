//! Held-out evaluation: accuracy plus per-class and support-weighted precision/recall/F1.
//! Undefined ratios (no predictions / no support) count as 0.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub weighted_precision: f64,
    pub weighted_recall: f64,
    pub weighted_f1: f64,
    pub classes: Vec<ClassMetrics>,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// `labels[i]` names class `i`. Returns `None` when there is nothing to evaluate.
pub fn classification_report(
    y_true: &[usize],
    y_pred: &[usize],
    labels: &[String],
) -> Option<ClassificationReport> {
    if y_true.is_empty() || y_true.len() != y_pred.len() {
        return None;
    }

    let k = labels.len();
    let mut true_pos = vec![0usize; k];
    let mut predicted = vec![0usize; k];
    let mut support = vec![0usize; k];
    for (&t, &p) in y_true.iter().zip(y_pred) {
        if t < k {
            support[t] += 1;
        }
        if p < k {
            predicted[p] += 1;
        }
        if t == p && t < k {
            true_pos[t] += 1;
        }
    }

    let classes: Vec<ClassMetrics> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let precision = ratio(true_pos[i], predicted[i]);
            let recall = ratio(true_pos[i], support[i]);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassMetrics {
                label: label.clone(),
                precision,
                recall,
                f1,
                support: support[i],
            }
        })
        .collect();

    let total = y_true.len() as f64;
    let weighted = |f: fn(&ClassMetrics) -> f64| {
        classes.iter().map(|c| f(c) * c.support as f64).sum::<f64>() / total
    };

    Some(ClassificationReport {
        accuracy: ratio(true_pos.iter().sum(), y_true.len()),
        weighted_precision: weighted(|c| c.precision),
        weighted_recall: weighted(|c| c.recall),
        weighted_f1: weighted(|c| c.f1),
        classes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into()]
    }

    #[test]
    fn test_perfect_predictions() {
        let report = classification_report(&[0, 1, 2, 1], &[0, 1, 2, 1], &labels()).unwrap();
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.weighted_f1, 1.0);
        assert_eq!(report.classes[1].support, 2);
    }

    #[test]
    fn test_mixed_predictions() {
        // a: tp=1 of 2, predicted twice; b: tp=1, predicted once; c never predicted
        let report =
            classification_report(&[0, 0, 1, 2], &[0, 1, 1, 0], &labels()).unwrap();
        assert_eq!(report.accuracy, 0.5);
        assert_eq!(report.classes[0].precision, 0.5);
        assert_eq!(report.classes[0].recall, 0.5);
        assert_eq!(report.classes[1].precision, 0.5);
        assert_eq!(report.classes[1].recall, 1.0);
        assert_eq!(report.classes[2].f1, 0.0);
        // recall weighted by support is accuracy
        assert!((report.weighted_recall - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input_has_no_report() {
        assert!(classification_report(&[], &[], &labels()).is_none());
    }
}

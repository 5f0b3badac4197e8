use super::assert_same_shape;
use crate::neural_network::{LossFunction, Tensor};

/// Predictions are clipped to `[EPSILON, 1 - EPSILON]` before taking logarithms
const EPSILON: f32 = 1e-7;

/// Binary Cross Entropy loss function for binary classification
///
/// `L = -mean(y * ln(a) + (1 - y) * ln(1 - a))`. Paired with a sigmoid output layer, the
/// derivative of `L` with respect to the pre-activation collapses to `a - y`, which is the error
/// signal returned by `compute_delta`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCrossEntropy;

impl BinaryCrossEntropy {
    /// Creates a new instance of BinaryCrossEntropy
    pub fn new() -> Self {
        Self {}
    }
}

impl LossFunction for BinaryCrossEntropy {
    fn compute_loss(&self, y_true: &Tensor, y_pred: &Tensor) -> f32 {
        assert_same_shape(y_true, y_pred);
        let y_pred_clipped = y_pred.mapv(|x| x.clamp(EPSILON, 1.0 - EPSILON));

        let losses = y_true * &y_pred_clipped.mapv(f32::ln)
            + (1.0 - y_true) * &y_pred_clipped.mapv(|p| (1.0 - p).ln());

        let n = losses.len() as f32;
        -losses.sum() / n
    }

    fn compute_delta(&self, y_true: &Tensor, y_pred: &Tensor) -> Tensor {
        assert_same_shape(y_true, y_pred);
        y_pred - y_true
    }
}

use super::assert_same_shape;
use crate::neural_network::Tensor;
use crate::neural_network::neural_network_trait::LossFunction;

/// Mean Squared Error loss function
///
/// The loss is `mean((y_pred - y_true)^2)`. The error signal handed to the output layer is the
/// plain residual `y_pred - y_true`: for a linear output layer that is the gradient of
/// `0.5 * sum((y_pred - y_true)^2)` with respect to the pre-activation.
///
/// # Example
///
/// ```rust
/// use rustynn::neural_network::{LossFunction, MeanSquaredError};
/// use ndarray::array;
///
/// let mse = MeanSquaredError::new();
///
/// let y_true = array![[1.0], [2.0], [3.0]];
/// let y_pred = array![[1.0], [2.0], [5.0]];
///
/// let loss = mse.compute_loss(&y_true, &y_pred);
/// assert!((loss - 4.0 / 3.0).abs() < 1e-6);
///
/// let delta = mse.compute_delta(&y_true, &y_pred);
/// assert_eq!(delta, array![[0.0f32], [0.0], [2.0]]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSquaredError;

impl MeanSquaredError {
    /// Creates a new instance of MeanSquaredError
    pub fn new() -> Self {
        Self {}
    }
}

impl LossFunction for MeanSquaredError {
    fn compute_loss(&self, y_true: &Tensor, y_pred: &Tensor) -> f32 {
        assert_same_shape(y_true, y_pred);
        let squared_diff = (y_pred - y_true).mapv(|x| x * x);

        let n = squared_diff.len() as f32;
        squared_diff.sum() / n
    }

    fn compute_delta(&self, y_true: &Tensor, y_pred: &Tensor) -> Tensor {
        assert_same_shape(y_true, y_pred);
        y_pred - y_true
    }
}

/// Binary Cross Entropy loss function for sigmoid output layers
pub mod binary_cross_entropy;
/// Mean Squared Error loss function for linear output layers
pub mod mean_squared_error;

pub use binary_cross_entropy::*;
pub use mean_squared_error::*;

use crate::neural_network::Tensor;

/// Panics unless the targets and the predictions have the same shape
fn assert_same_shape(y_true: &Tensor, y_pred: &Tensor) {
    if y_true.dim() != y_pred.dim() {
        panic!(
            "Targets and predictions must have the same shape. Targets: {:?}, Predictions: {:?}",
            y_true.dim(),
            y_pred.dim()
        );
    }
}

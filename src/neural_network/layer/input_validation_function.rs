use crate::error::ModelError;
use crate::neural_network::Tensor;

/// Validates that a tensor has exactly the expected `(rows, cols)` shape.
///
/// # Parameters
///
/// - `tensor` - The tensor to check
/// - `expected` - The required shape
/// - `layer_index` - Index of the layer performing the operation (for the error message)
/// - `operation` - Name of the operation (for the error message)
///
/// # Returns
///
/// - `Ok(())` if the shape matches
/// - `Err(ModelError::ShapeMismatch)` otherwise
pub(super) fn validate_shape(
    tensor: &Tensor,
    expected: (usize, usize),
    layer_index: usize,
    operation: &'static str,
) -> Result<(), ModelError> {
    if tensor.dim() != expected {
        return Err(ModelError::ShapeMismatch {
            layer_index,
            operation,
            expected,
            actual: tensor.dim(),
        });
    }
    Ok(())
}

/// Validates that a batch holds at least one sample.
pub(super) fn validate_non_empty_batch(
    tensor: &Tensor,
    layer_index: usize,
    operation: &'static str,
) -> Result<(), ModelError> {
    if tensor.nrows() == 0 {
        return Err(ModelError::InputValidationError(format!(
            "{} of layer {} received an empty batch",
            operation, layer_index
        )));
    }
    Ok(())
}

/// Validates that the L2 regularization strength is non-negative and finite.
pub(super) fn validate_regularization(regularization: f32) -> Result<(), ModelError> {
    if !(regularization >= 0.0 && regularization.is_finite()) {
        return Err(ModelError::InputValidationError(format!(
            "regularization strength must be non-negative and finite, got {}",
            regularization
        )));
    }
    Ok(())
}

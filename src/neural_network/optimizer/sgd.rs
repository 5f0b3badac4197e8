use super::input_validation_function::validate_learning_rate;
use crate::error::ModelError;
use crate::neural_network::{Layer, Optimizer};
use rayon::prelude::*;

/// Gradient Descent optimizer.
///
/// Updates parameters in the direction of the negative gradient, scaled by the learning rate:
/// `weights -= learning_rate * weight_gradient`, `bias -= learning_rate * bias_gradient`.
/// Whether this is full-batch or stochastic gradient descent is decided by the batches the
/// training driver feeds through the network.
///
/// # Fields
///
/// * `learning_rate` - Learning rate controlling the size of parameter updates
///
/// # Example
/// ```rust
/// use rustynn::neural_network::SGD;
///
/// let sgd = SGD::new(0.1).unwrap();
/// assert_eq!(sgd.learning_rate(), 0.1);
/// assert!(SGD::new(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SGD {
    learning_rate: f32,
}

impl SGD {
    /// Creates a new SGD optimizer with the specified learning rate.
    ///
    /// # Parameters
    ///
    /// * `learning_rate` - Step size for parameter updates
    ///
    /// # Returns
    ///
    /// - `Ok(SGD)` - A new SGD optimizer instance
    /// - `Err(ModelError::InputValidationError)` - If the learning rate is not positive and finite
    pub fn new(learning_rate: f32) -> Result<Self, ModelError> {
        validate_learning_rate(learning_rate)?;
        Ok(Self { learning_rate })
    }

    /// Returns the learning rate.
    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    /// Simultaneously update two sets of parameters in parallel
    ///
    /// # Parameters
    ///
    /// - `weights` - Mutable reference to weights array to be updated
    /// - `weight_grads` - Reference to weight gradients array
    /// - `bias` - Mutable reference to bias array to be updated
    /// - `bias_grads` - Reference to bias gradients array
    /// - `lr` - Learning rate
    pub fn update_sgd_parameters(
        weights: &mut [f32],
        weight_grads: &[f32],
        bias: &mut [f32],
        bias_grads: &[f32],
        lr: f32,
    ) {
        rayon::join(
            || {
                weights
                    .par_iter_mut()
                    .zip(weight_grads.par_iter())
                    .for_each(|(w, wg)| {
                        *w -= *wg * lr;
                    });
            },
            || {
                bias.par_iter_mut()
                    .zip(bias_grads.par_iter())
                    .for_each(|(b, bg)| {
                        *b -= *bg * lr;
                    });
            },
        );
    }
}

impl Optimizer for SGD {
    fn update(&mut self, layer: &mut dyn Layer) -> Result<(), ModelError> {
        layer.update(self.learning_rate)
    }
}

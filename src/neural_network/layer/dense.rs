use super::LayerPhase;
use super::input_validation_function::{
    validate_non_empty_batch, validate_regularization, validate_shape,
};
use crate::error::ModelError;
use crate::neural_network::optimizer::SGD;
use crate::neural_network::optimizer::input_validation_function::validate_learning_rate;
use crate::neural_network::{Activation, Initializer, Layer, LayerContainer, Tensor};
use ndarray::Axis;

/// Dense (Fully Connected) layer implementation for neural networks.
///
/// This layer performs an affine transformation of the input followed by an activation:
/// `output = activation(input · weights + bias)`, with the bias row broadcast across the batch.
///
/// The layer takes part in a strict training protocol (see [`LayerPhase`]):
///
/// 1. `forward` caches the output (and, for the first layer only, the raw input);
/// 2. `backward` computes this layer's delta and its weight/bias gradients. A hidden layer derives
///    its delta from the next layer's weights, which it reads through the container view it is
///    handed; the first layer uses its cached input as "previous output", every other layer reads
///    the previous layer's cached output;
/// 3. `update` applies `weights -= learning_rate * weight_gradient` (same for bias) and consumes
///    the gradients.
///
/// # Dimensions
///
/// - Input shape: (batch_size, input_size)
/// - Output shape: (batch_size, output_size)
///
/// # Fields
/// ## Core fields
/// - `index` - Position in the network, assigned when the network is built
/// - `input_size` - Input dimension size
/// - `output_size` - Output dimension size
/// - `is_output_layer` - Whether the backward signal is used as delta directly
/// - `activation` - Activation function for the layer
/// - `weights` - Weight matrix with shape (input_size, output_size)
/// - `bias` - Bias row with shape (1, output_size)
///
/// ## Cache
/// - `last_input` - Raw input of the most recent forward pass (first layer only)
/// - `output` - Activated output of the most recent forward pass
/// - `delta` - Error signal of the most recent backward pass
/// - `grad_weights` - Weight gradient waiting for `update`
/// - `grad_bias` - Bias gradient waiting for `update`
/// - `phase` - Position in the forward/backward/update cycle
/// - `step` - Number of forward passes performed
///
/// # Example
/// ```rust
/// use rustynn::prelude::*;
/// use ndarray::Array2;
///
/// let mut network = Sequential::builder(InputShape::flat(4))
///     .add(Dense::new(4, 3, ReLU::new()).unwrap())
///     .add(Dense::new_output_layer(3, 1, Linear::new()).unwrap())
///     .build()
///     .unwrap();
/// network.init(&mut XavierUniform::new(Some(1))).unwrap();
///
/// let x = Array2::ones((2, 4));
/// let prediction = network.forward(&x).unwrap();
/// assert_eq!(prediction.dim(), (2, 1));
///
/// let error = prediction - Array2::<f32>::ones((2, 1));
/// network.backward(&error, 0.0).unwrap();
/// network.update(&mut SGD::new(0.01).unwrap()).unwrap();
/// ```
pub struct Dense {
    /// Position in the network
    index: usize,
    /// Input dimension size
    input_size: usize,
    /// Output dimension size
    output_size: usize,
    /// Whether the backward signal is used as delta directly
    is_output_layer: bool,
    /// Activation function for the layer
    activation: Box<dyn Activation>,
    /// Weight matrix with shape (input_size, output_size)
    weights: Option<Tensor>,
    /// Bias row with shape (1, output_size)
    bias: Option<Tensor>,
    /// Raw input of the most recent forward pass, kept by the first layer only
    last_input: Option<Tensor>,
    /// Activated output of the most recent forward pass
    output: Option<Tensor>,
    /// Error signal of the most recent backward pass
    delta: Option<Tensor>,
    /// Stored weight gradients
    grad_weights: Option<Tensor>,
    /// Stored bias gradients
    grad_bias: Option<Tensor>,
    /// Position in the forward/backward/update cycle
    phase: LayerPhase,
    /// Number of forward passes performed
    step: u64,
}

impl Dense {
    /// Creates a new hidden dense layer.
    ///
    /// The layer holds no parameters until it is initialized (see `Layer::init`).
    ///
    /// # Parameters
    ///
    /// - `input_size` - Number of input features
    /// - `output_size` - Number of units
    /// - `activation` - Activation applied to the affine output
    ///
    /// # Returns
    ///
    /// - `Ok(Dense)` - A new hidden Dense layer
    /// - `Err(ModelError::InputValidationError)` - If either size is zero
    pub fn new<A>(input_size: usize, output_size: usize, activation: A) -> Result<Self, ModelError>
    where
        A: Activation + 'static,
    {
        Self::with_role(input_size, output_size, Box::new(activation), false)
    }

    /// Creates a new output dense layer.
    ///
    /// During backward the output layer takes the supplied error signal (e.g. `prediction - target`)
    /// as its delta without further transformation.
    ///
    /// # Parameters
    ///
    /// - `input_size` - Number of input features
    /// - `output_size` - Number of units
    /// - `activation` - Activation applied to the affine output
    ///
    /// # Returns
    ///
    /// - `Ok(Dense)` - A new output Dense layer
    /// - `Err(ModelError::InputValidationError)` - If either size is zero
    pub fn new_output_layer<A>(
        input_size: usize,
        output_size: usize,
        activation: A,
    ) -> Result<Self, ModelError>
    where
        A: Activation + 'static,
    {
        Self::with_role(input_size, output_size, Box::new(activation), true)
    }

    fn with_role(
        input_size: usize,
        output_size: usize,
        activation: Box<dyn Activation>,
        is_output_layer: bool,
    ) -> Result<Self, ModelError> {
        if input_size == 0 || output_size == 0 {
            return Err(ModelError::InputValidationError(format!(
                "dense layer sizes must be greater than 0, got {}x{}",
                input_size, output_size
            )));
        }

        Ok(Self {
            index: 0,
            input_size,
            output_size,
            is_output_layer,
            activation,
            weights: None,
            bias: None,
            last_input: None,
            output: None,
            delta: None,
            grad_weights: None,
            grad_bias: None,
            phase: LayerPhase::AwaitingForward,
            step: 0,
        })
    }

    /// Returns the activation function of the layer.
    pub fn activation(&self) -> &dyn Activation {
        self.activation.as_ref()
    }

    /// Returns the raw input cached by the most recent forward pass.
    ///
    /// Only the first layer of a network keeps its input; every other layer reads the previous
    /// layer's output instead.
    pub fn last_input(&self) -> Result<&Tensor, ModelError> {
        self.last_input
            .as_ref()
            .ok_or(ModelError::StateNotComputed {
                layer_index: self.index,
                state: "last_input",
            })
    }

    fn parameters(&self, operation: &'static str) -> Result<(&Tensor, &Tensor), ModelError> {
        match (&self.weights, &self.bias) {
            (Some(weights), Some(bias)) => Ok((weights, bias)),
            _ => Err(ModelError::UninitializedParameter {
                layer_index: self.index,
                operation,
            }),
        }
    }

    fn ordering_violation(&self, operation: &'static str, reason: String) -> ModelError {
        ModelError::OrderingViolation {
            layer_index: self.index,
            operation,
            reason,
        }
    }

    fn expect_phase(&self, expected: LayerPhase, operation: &'static str) -> Result<(), ModelError> {
        if self.phase != expected {
            return Err(self.ordering_violation(
                operation,
                format!("layer is {}, expected {}", self.phase, expected),
            ));
        }
        Ok(())
    }

    /// Neighbour caches are only meaningful if they belong to the same forward pass as ours.
    fn expect_same_step(
        &self,
        neighbor: &dyn Layer,
        operation: &'static str,
    ) -> Result<(), ModelError> {
        if neighbor.step() != self.step {
            return Err(self.ordering_violation(
                operation,
                format!(
                    "layer {} is at step {} but this layer is at step {}",
                    neighbor.index(),
                    neighbor.step(),
                    self.step
                ),
            ));
        }
        Ok(())
    }
}

impl Layer for Dense {
    fn index(&self) -> usize {
        self.index
    }

    fn attach(&mut self, index: usize) {
        self.index = index;
    }

    fn input_size(&self) -> usize {
        self.input_size
    }

    fn output_size(&self) -> usize {
        self.output_size
    }

    fn is_output_layer(&self) -> bool {
        self.is_output_layer
    }

    fn init(&mut self, initializer: &mut dyn Initializer) -> Result<(), ModelError> {
        let weights = initializer.weights(self.input_size, self.output_size);
        let bias = initializer.bias(self.output_size);
        self.set_parameters(weights, bias)
    }

    fn set_parameters(&mut self, weights: Tensor, bias: Tensor) -> Result<(), ModelError> {
        validate_shape(
            &weights,
            (self.input_size, self.output_size),
            self.index,
            "set_parameters",
        )?;
        validate_shape(&bias, (1, self.output_size), self.index, "set_parameters")?;

        self.weights = Some(weights.as_standard_layout().into_owned());
        self.bias = Some(bias.as_standard_layout().into_owned());
        self.last_input = None;
        self.output = None;
        self.delta = None;
        self.grad_weights = None;
        self.grad_bias = None;
        self.phase = LayerPhase::AwaitingForward;

        log::debug!(
            "init => layer {}, weights {:?}, bias {:?}",
            self.index,
            (self.input_size, self.output_size),
            (1, self.output_size)
        );
        Ok(())
    }

    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        let output = {
            let (weights, bias) = self.parameters("forward")?;
            validate_non_empty_batch(input, self.index, "forward")?;
            validate_shape(input, (input.nrows(), self.input_size), self.index, "forward")?;

            let z = input.dot(weights) + bias;
            self.activation.forward(&z)
        };

        if self.index == 0 {
            self.last_input = Some(input.to_owned());
        }
        self.output = Some(output.clone());
        self.grad_weights = None;
        self.grad_bias = None;
        self.phase = LayerPhase::AwaitingBackward;
        self.step += 1;

        log::debug!(
            "forward => layer {}, step {}, input {:?}, weights {:?}, output {:?}",
            self.index,
            self.step,
            input.dim(),
            (self.input_size, self.output_size),
            output.dim()
        );
        Ok(output)
    }

    fn backward(
        &mut self,
        signal: &Tensor,
        regularization: f32,
        container: &dyn LayerContainer,
    ) -> Result<Tensor, ModelError> {
        self.expect_phase(LayerPhase::AwaitingBackward, "backward")?;
        validate_regularization(regularization)?;

        let (delta, grad_weights, grad_bias) = {
            let (weights, _) = self.parameters("backward")?;
            let output = self.output.as_ref().ok_or(ModelError::StateNotComputed {
                layer_index: self.index,
                state: "output",
            })?;

            let delta = if self.is_output_layer {
                validate_shape(signal, output.dim(), self.index, "backward")?;
                signal.to_owned()
            } else {
                let next = container.neighbor(self.index + 1)?;
                self.expect_same_step(next, "backward")?;
                if next.phase() != LayerPhase::AwaitingUpdate {
                    return Err(self.ordering_violation(
                        "backward",
                        format!(
                            "next layer {} has not completed its backward pass for step {} (it is {})",
                            next.index(),
                            self.step,
                            next.phase()
                        ),
                    ));
                }

                // delta = (signal · next_weights^T) ⊙ activation'(output)
                let next_weights = next.weights()?;
                validate_shape(
                    signal,
                    (output.nrows(), next_weights.ncols()),
                    self.index,
                    "backward",
                )?;
                signal.dot(&next_weights.t()) * &self.activation.backward(output)
            };

            let previous_output = if self.index == 0 {
                self.last_input()?
            } else {
                let previous = container.neighbor(self.index - 1)?;
                self.expect_same_step(previous, "backward")?;
                previous.output()?
            };
            validate_shape(
                previous_output,
                (delta.nrows(), self.input_size),
                self.index,
                "backward",
            )?;

            // dW = previous_output^T · delta + λ·W
            let mut grad_weights = previous_output.t().dot(&delta);
            if regularization != 0.0 {
                grad_weights.scaled_add(regularization, weights);
            }
            // db = column sum of delta over the batch
            let grad_bias = delta.sum_axis(Axis(0)).insert_axis(Axis(0));

            (delta, grad_weights, grad_bias)
        };

        log::debug!(
            "backward => layer {}, step {}, delta {:?}, grad_weights {:?}, grad_bias {:?}",
            self.index,
            self.step,
            delta.dim(),
            grad_weights.dim(),
            grad_bias.dim()
        );

        self.grad_weights = Some(grad_weights);
        self.grad_bias = Some(grad_bias);
        self.delta = Some(delta.clone());
        self.phase = LayerPhase::AwaitingUpdate;
        Ok(delta)
    }

    fn update(&mut self, learning_rate: f32) -> Result<(), ModelError> {
        validate_learning_rate(learning_rate)?;
        self.expect_phase(LayerPhase::AwaitingUpdate, "update")?;

        let (Some(grad_weights), Some(grad_bias)) = (self.grad_weights.take(), self.grad_bias.take())
        else {
            return Err(ModelError::StateNotComputed {
                layer_index: self.index,
                state: "weight_gradient",
            });
        };
        let (Some(weights), Some(bias)) = (self.weights.as_mut(), self.bias.as_mut()) else {
            return Err(ModelError::UninitializedParameter {
                layer_index: self.index,
                operation: "update",
            });
        };

        if let (Some(w), Some(gw), Some(b), Some(gb)) = (
            weights.as_slice_mut(),
            grad_weights.as_slice(),
            bias.as_slice_mut(),
            grad_bias.as_slice(),
        ) {
            SGD::update_sgd_parameters(w, gw, b, gb, learning_rate);
        } else {
            weights.scaled_add(-learning_rate, &grad_weights);
            bias.scaled_add(-learning_rate, &grad_bias);
        }

        self.phase = LayerPhase::AwaitingForward;
        log::debug!(
            "update => layer {}, step {}, learning_rate {}",
            self.index,
            self.step,
            learning_rate
        );
        Ok(())
    }

    fn weights(&self) -> Result<&Tensor, ModelError> {
        self.parameters("weights").map(|(weights, _)| weights)
    }

    fn bias(&self) -> Result<&Tensor, ModelError> {
        self.parameters("bias").map(|(_, bias)| bias)
    }

    fn output(&self) -> Result<&Tensor, ModelError> {
        self.output.as_ref().ok_or(ModelError::StateNotComputed {
            layer_index: self.index,
            state: "output",
        })
    }

    fn delta(&self) -> Result<&Tensor, ModelError> {
        self.delta.as_ref().ok_or(ModelError::StateNotComputed {
            layer_index: self.index,
            state: "delta",
        })
    }

    fn weight_gradient(&self) -> Result<&Tensor, ModelError> {
        self.grad_weights
            .as_ref()
            .ok_or(ModelError::StateNotComputed {
                layer_index: self.index,
                state: "weight_gradient",
            })
    }

    fn bias_gradient(&self) -> Result<&Tensor, ModelError> {
        self.grad_bias.as_ref().ok_or(ModelError::StateNotComputed {
            layer_index: self.index,
            state: "bias_gradient",
        })
    }

    fn phase(&self) -> LayerPhase {
        self.phase
    }

    fn step(&self) -> u64 {
        self.step
    }

    fn layer_type(&self) -> &str {
        "Dense"
    }
}

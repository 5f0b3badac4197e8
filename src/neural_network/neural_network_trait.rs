use crate::error::ModelError;
use crate::neural_network::Tensor;
use crate::neural_network::layer::LayerPhase;

/// Defines the contract every activation function has to satisfy.
///
/// An activation is a stateless pair of pure functions applied elementwise to the affine output
/// of a layer.
///
/// # Output-based derivative
///
/// `backward` receives the *activated* output `a = forward(z)`, not the pre-activation `z`.
/// Layers therefore never have to keep the pre-activation tensor around. The price is that only
/// activations whose derivative can be written purely in terms of their own output are
/// pluggable (sigmoid: `a * (1 - a)`, tanh: `1 - a^2`, ReLU: `1[a > 0]`, linear: `1`).
/// Supporting other activations requires widening this trait to pass both `z` and `a`.
pub trait Activation: Send + Sync {
    /// Applies the activation to the affine output of a layer.
    ///
    /// # Parameters
    ///
    /// - `z` - Affine output with shape (batch_size, output_size)
    ///
    /// # Returns
    ///
    /// - `Tensor` - Activated output with the same shape as `z`
    fn forward(&self, z: &Tensor) -> Tensor;

    /// Computes the local derivative evaluated at the already activated output.
    ///
    /// # Parameters
    ///
    /// - `activated` - Output previously returned by [`Activation::forward`]
    ///
    /// # Returns
    ///
    /// - `Tensor` - Elementwise derivative with the same shape as `activated`
    fn backward(&self, activated: &Tensor) -> Tensor;

    /// Returns the name of the activation (e.g. "Sigmoid").
    fn name(&self) -> &str;
}

/// Defines a pluggable source of initial layer parameters.
///
/// Implementations own their source of randomness, so tests can inject a seeded or fully
/// deterministic initializer.
pub trait Initializer {
    /// Produces an initial weight matrix with shape (input_size, output_size).
    fn weights(&mut self, input_size: usize, output_size: usize) -> Tensor;

    /// Produces an initial bias row with shape (1, output_size).
    fn bias(&mut self, output_size: usize) -> Tensor;
}

/// Defines the interface for neural network layers.
///
/// A layer owns its parameters and the caches of the current training step. The training step
/// is a strict cycle: `forward` (in increasing index order across the network), `backward`
/// (in decreasing index order) and `update`. Each layer records its [`LayerPhase`] and a step
/// counter, and refuses calls that break the cycle.
pub trait Layer: Send + Sync {
    /// Returns the position of the layer in its network.
    fn index(&self) -> usize;

    /// Assigns the position of the layer in its network. Called once by the network builder.
    fn attach(&mut self, index: usize);

    /// Returns the number of input features the layer expects.
    fn input_size(&self) -> usize;

    /// Returns the number of output features the layer produces.
    fn output_size(&self) -> usize;

    /// Returns `true` if the layer receives the top-level error signal directly.
    fn is_output_layer(&self) -> bool;

    /// Allocates and initializes weights and bias from the given initializer.
    ///
    /// # Parameters
    ///
    /// - `initializer` - Source of the initial weights and bias
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Parameters are initialized and the layer awaits its first forward pass
    /// - `Err(ModelError)` - If the initializer produced tensors of the wrong shape
    fn init(&mut self, initializer: &mut dyn Initializer) -> Result<(), ModelError>;

    /// Replaces weights and bias with explicitly provided values.
    ///
    /// # Parameters
    ///
    /// - `weights` - Weight matrix with shape (input_size, output_size)
    /// - `bias` - Bias row with shape (1, output_size)
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Parameters are replaced and the layer awaits a forward pass
    /// - `Err(ModelError::ShapeMismatch)` - If either tensor has the wrong shape
    fn set_parameters(&mut self, weights: Tensor, bias: Tensor) -> Result<(), ModelError>;

    /// Performs forward propagation through the layer.
    ///
    /// # Parameters
    ///
    /// - `input` - Input tensor with shape (batch_size, input_size)
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - The activated output with shape (batch_size, output_size)
    /// - `Err(ModelError)` - If the layer is uninitialized or the input shape is wrong
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError>;

    /// Performs backward propagation through the layer.
    ///
    /// # Parameters
    ///
    /// - `signal` - The top-level error for the output layer, otherwise the next layer's delta
    /// - `regularization` - L2 strength folded into the weight gradient
    /// - `container` - Read-only view of the other layers of the network
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - This layer's delta, to be passed to the previous layer
    /// - `Err(ModelError)` - On shape mismatch or if called out of order
    fn backward(
        &mut self,
        signal: &Tensor,
        regularization: f32,
        container: &dyn LayerContainer,
    ) -> Result<Tensor, ModelError>;

    /// Applies one gradient-descent step using the gradients of the current backward pass.
    ///
    /// # Parameters
    ///
    /// - `learning_rate` - Step size scaling the gradients
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Parameters updated and gradients consumed
    /// - `Err(ModelError::OrderingViolation)` - If no backward pass ran since the last update
    fn update(&mut self, learning_rate: f32) -> Result<(), ModelError>;

    /// Returns the weight matrix.
    fn weights(&self) -> Result<&Tensor, ModelError>;

    /// Returns the bias row.
    fn bias(&self) -> Result<&Tensor, ModelError>;

    /// Returns the output cached by the most recent forward pass.
    fn output(&self) -> Result<&Tensor, ModelError>;

    /// Returns the delta cached by the most recent backward pass.
    fn delta(&self) -> Result<&Tensor, ModelError>;

    /// Returns the weight gradient waiting to be applied by `update`.
    fn weight_gradient(&self) -> Result<&Tensor, ModelError>;

    /// Returns the bias gradient waiting to be applied by `update`.
    fn bias_gradient(&self) -> Result<&Tensor, ModelError>;

    /// Returns the phase of the forward/backward/update cycle the layer is in.
    fn phase(&self) -> LayerPhase;

    /// Returns the number of forward passes the layer has performed.
    fn step(&self) -> u64;

    /// Returns the type name of the layer (e.g. "Dense").
    fn layer_type(&self) -> &str {
        "Unknown"
    }

    /// Returns a description of the output shape of the layer.
    fn output_shape(&self) -> String {
        format!("(None, {})", self.output_size())
    }

    /// Returns the total number of trainable parameters in the layer.
    fn param_count(&self) -> usize {
        self.input_size() * self.output_size() + self.output_size()
    }
}

/// Read-only access to the layers of a network, used for neighbour lookups during backpropagation.
///
/// A layer never owns or stores a reference to its neighbours. Instead the network hands a
/// container view to `Layer::backward`, and the layer asks it for "the next layer's weights" and
/// "the previous layer's output".
pub trait LayerContainer {
    /// Returns the number of layer positions in the container.
    fn len(&self) -> usize;

    /// Returns the layer at `index`, or `None` if the position is empty or not visible.
    fn layer_at(&self, index: usize) -> Option<&dyn Layer>;

    /// Returns `true` if the container holds no layers.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the layer at `index` or an error naming the missing position.
    fn neighbor(&self, index: usize) -> Result<&dyn Layer, ModelError> {
        self.layer_at(index).ok_or_else(|| {
            ModelError::ProcessingError(format!(
                "no layer is visible at index {} (container holds {} layers)",
                index,
                self.len()
            ))
        })
    }

    /// Returns the weights of the layer at `index`.
    fn weights_of(&self, index: usize) -> Result<&Tensor, ModelError> {
        self.neighbor(index)?.weights()
    }

    /// Returns the cached output of the layer at `index`.
    fn output_of(&self, index: usize) -> Result<&Tensor, ModelError> {
        self.neighbor(index)?.output()
    }
}

/// Defines the interface for loss functions used by the training driver.
///
/// The output layer takes its error signal as-is (see `Layer::backward`), so a loss function is
/// responsible for returning the error with respect to the output layer's pre-activation, with any
/// chain-rule factor between loss and activation already folded in.
///
/// Both methods require `y_true` and `y_pred` to have the same shape and panic otherwise, even
/// where ndarray broadcasting would accept the pair.
/// `Trainer::train_step` checks the shapes and returns `ModelError::ShapeMismatch` before calling
/// them; callers that use a loss function directly must check the shapes themselves.
pub trait LossFunction {
    /// Computes the scalar loss between true and predicted values.
    ///
    /// # Parameters
    ///
    /// - `y_true` - Tensor containing the ground truth values
    /// - `y_pred` - Tensor containing the predicted values
    ///
    /// # Returns
    ///
    /// - `f32` - The scalar loss value
    ///
    /// # Panics
    ///
    /// Panics if `y_true` and `y_pred` differ in shape
    fn compute_loss(&self, y_true: &Tensor, y_pred: &Tensor) -> f32;

    /// Computes the error signal handed to the output layer's backward pass.
    ///
    /// # Parameters
    ///
    /// - `y_true` - Tensor containing the ground truth values
    /// - `y_pred` - Tensor containing the predicted values
    ///
    /// # Returns
    ///
    /// - `Tensor` - Error signal with the same shape as `y_pred`
    ///
    /// # Panics
    ///
    /// Panics if `y_true` and `y_pred` differ in shape
    fn compute_delta(&self, y_true: &Tensor, y_pred: &Tensor) -> Tensor;
}

/// Defines the interface for optimization algorithms.
pub trait Optimizer {
    /// Updates the parameters of a layer according to the optimization algorithm.
    ///
    /// # Parameters
    ///
    /// - `layer` - The layer whose parameters should be updated
    fn update(&mut self, layer: &mut dyn Layer) -> Result<(), ModelError>;
}

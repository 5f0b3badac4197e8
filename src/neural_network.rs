/// Module that contains activation function implementations
pub mod activation;
/// Module that contains parameter initialization strategies
pub mod initializer;
/// Module that contains the passive network input descriptor
pub mod input_shape;
/// Module that contains neural network layer implementations
pub mod layer;
/// Module that contains loss function implementations
pub mod loss_function;
/// Module that contains the traits shared by layers, containers, losses and optimizers
pub mod neural_network_trait;
/// Module that contains the gradient-descent optimizer
pub mod optimizer;
/// Module that contains the sequential network container
pub mod sequential;
/// Module that contains the training driver and its configuration
pub mod trainer;

pub use activation::*;
pub use initializer::*;
pub use input_shape::*;
pub use layer::*;
pub use loss_function::*;
pub use optimizer::*;
pub use sequential::*;
pub use trainer::*;

pub use crate::error::ModelError;
use ndarray::Array2;

/// Type alias for the two-dimensional `(batch, features)` arrays that flow through the network
pub type Tensor = Array2<f32>;

pub use neural_network_trait::{Activation, Initializer, Layer, LayerContainer, LossFunction, Optimizer};

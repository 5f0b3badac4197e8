pub use crate::neural_network::Tensor;
pub use crate::neural_network::activation::*;
pub use crate::neural_network::initializer::*;
pub use crate::neural_network::input_shape::InputShape;
pub use crate::neural_network::layer::{Dense, LayerPhase};
pub use crate::neural_network::loss_function::*;
pub use crate::neural_network::neural_network_trait::*;
pub use crate::neural_network::optimizer::SGD;
pub use crate::neural_network::sequential::{Sequential, SequentialBuilder};
pub use crate::neural_network::trainer::{Trainer, TrainingConfig};

use super::map_elementwise;
use crate::neural_network::{Activation, Tensor};

/// Tanh (Hyperbolic Tangent) activation.
///
/// Maps values to (-1, 1). Derivative in terms of the output: `1 - a^2`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tanh;

impl Tanh {
    /// Creates a new Tanh activation.
    pub fn new() -> Self {
        Tanh
    }
}

impl Activation for Tanh {
    fn forward(&self, z: &Tensor) -> Tensor {
        map_elementwise(z, |x| x.tanh())
    }

    fn backward(&self, activated: &Tensor) -> Tensor {
        map_elementwise(activated, |a| 1.0 - a * a)
    }

    fn name(&self) -> &str {
        "Tanh"
    }
}

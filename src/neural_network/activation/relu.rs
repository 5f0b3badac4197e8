use super::map_elementwise;
use crate::neural_network::{Activation, Tensor};

/// ReLU (Rectified Linear Unit) activation.
///
/// `max(0, x)`. The derivative is recovered from the output: positive outputs came from
/// positive inputs, so the derivative is `1` where `a > 0` and `0` elsewhere.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReLU;

impl ReLU {
    /// Creates a new ReLU activation.
    pub fn new() -> Self {
        ReLU
    }
}

impl Activation for ReLU {
    fn forward(&self, z: &Tensor) -> Tensor {
        map_elementwise(z, |x| if x > 0.0 { x } else { 0.0 })
    }

    fn backward(&self, activated: &Tensor) -> Tensor {
        map_elementwise(activated, |a| if a > 0.0 { 1.0 } else { 0.0 })
    }

    fn name(&self) -> &str {
        "ReLU"
    }
}

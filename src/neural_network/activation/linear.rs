use crate::neural_network::{Activation, Tensor};

/// Linear (identity) activation: `f(x) = x`, `f'(x) = 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Linear;

impl Linear {
    /// Creates a new Linear activation.
    pub fn new() -> Self {
        Linear
    }
}

impl Activation for Linear {
    fn forward(&self, z: &Tensor) -> Tensor {
        z.to_owned()
    }

    fn backward(&self, activated: &Tensor) -> Tensor {
        Tensor::ones(activated.raw_dim())
    }

    fn name(&self) -> &str {
        "Linear"
    }
}

use super::map_elementwise;
use crate::neural_network::{Activation, Tensor};

/// Max input clipping value to prevent overflow in the exp function
const INPUT_CLIP_MAX: f32 = 500.0;

/// Min input clipping value to prevent overflow in the exp function
const INPUT_CLIP_MIN: f32 = -500.0;

/// Sigmoid activation.
///
/// Applies `1 / (1 + e^(-x))` element-wise, squashing values to (0, 1). Its derivative is
/// `a * (1 - a)` where `a` is the activated output.
///
/// # Examples
///
/// ```rust
/// use rustynn::neural_network::{Activation, Sigmoid};
/// use ndarray::array;
///
/// let sigmoid = Sigmoid::new();
/// let a = sigmoid.forward(&array![[0.0, 2.0]]);
/// assert_eq!(a[[0, 0]], 0.5);
///
/// let d = sigmoid.backward(&a);
/// assert_eq!(d[[0, 0]], 0.25);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sigmoid;

impl Sigmoid {
    /// Creates a new Sigmoid activation.
    pub fn new() -> Self {
        Sigmoid
    }
}

impl Activation for Sigmoid {
    fn forward(&self, z: &Tensor) -> Tensor {
        map_elementwise(z, |x| {
            let clipped_x = x.clamp(INPUT_CLIP_MIN, INPUT_CLIP_MAX);
            1.0 / (1.0 + (-clipped_x).exp())
        })
    }

    fn backward(&self, activated: &Tensor) -> Tensor {
        map_elementwise(activated, |a| a * (1.0 - a))
    }

    fn name(&self) -> &str {
        "Sigmoid"
    }
}

use crate::neural_network::Tensor;

/// Threshold for using parallel computation (number of elements)
const ACTIVATION_PARALLEL_THRESHOLD: usize = 1000;

/// Applies `f` to every element of `input`, switching to rayon above the parallel threshold.
fn map_elementwise<F>(input: &Tensor, f: F) -> Tensor
where
    F: Fn(f32) -> f32 + Sync + Send,
{
    let mut output = input.to_owned();
    if output.len() >= ACTIVATION_PARALLEL_THRESHOLD {
        output.par_mapv_inplace(f);
    } else {
        output.mapv_inplace(f);
    }
    output
}

/// Linear (identity) activation
pub mod linear;
/// ReLU (Rectified Linear Unit) activation
pub mod relu;
/// Sigmoid activation
pub mod sigmoid;
/// Tanh (Hyperbolic Tangent) activation
pub mod tanh;

pub use linear::*;
pub use relu::*;
pub use sigmoid::*;
pub use tanh::*;

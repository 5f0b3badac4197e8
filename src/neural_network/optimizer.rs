/// Validation helpers for optimizer hyper-parameters
pub(crate) mod input_validation_function;
/// Plain (stochastic) gradient descent
pub mod sgd;

pub use sgd::*;

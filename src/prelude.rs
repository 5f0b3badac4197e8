pub use crate::error::{IoError, ModelError};

/// Prelude module for neural network functionality.
#[cfg(feature = "neural_network")]
pub mod neural_network_prelude;

#[cfg(feature = "neural_network")]
pub use neural_network_prelude::*;

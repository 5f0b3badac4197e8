//! # rustynn
//!
//! A minimal, from-scratch feed-forward neural network engine. Forward propagation,
//! backpropagation with L2 regularization and gradient-descent parameter updates are written
//! out by hand on top of `ndarray`; there is no automatic differentiation.
//!
//! The interesting part of the crate is the protocol that couples adjacent layers into a
//! trainable network: every layer caches what it computed, and during the backward pass a
//! layer reads its neighbours' cached state (the next layer's weights, the previous layer's
//! output) through a read-only container view. Each layer tracks which phase of the
//! forward/backward/update cycle it is in, so calling the protocol out of order is reported as
//! an error instead of silently producing wrong gradients.
//!
//! # Example
//! ```rust
//! use rustynn::prelude::*;
//! use ndarray::array;
//!
//! let x = array![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
//! let y = array![[0.0], [1.0], [1.0], [1.0]];
//!
//! let mut network = Sequential::builder(InputShape::flat(2))
//!     .add(Dense::new(2, 4, Sigmoid::new()).unwrap())
//!     .add(Dense::new_output_layer(4, 1, Sigmoid::new()).unwrap())
//!     .build()
//!     .unwrap();
//! network.init(&mut RandomUniform::new(-1.0, 1.0, Some(42)).unwrap()).unwrap();
//!
//! let config = TrainingConfig {
//!     learning_rate: 0.5,
//!     epochs: 200,
//!     ..TrainingConfig::default()
//! };
//! let mut trainer = Trainer::new(config, BinaryCrossEntropy::new()).unwrap();
//! let history = trainer.fit(&mut network, &x, &y).unwrap();
//! assert!(history.last().unwrap() < history.first().unwrap());
//! ```

/// Error types shared by every module of the crate
pub mod error;

pub use error::{IoError, ModelError};

/// Components for building and training feed-forward neural networks.
///
/// # Core Components
///
/// ## Layers
/// - **Dense**: Fully connected layer computing `activation(input · weights + bias)`
///
/// ## Activations
/// - **Sigmoid**, **Tanh**, **ReLU**, **Linear**: Elementwise activations whose derivative can be
///   expressed through their own output
///
/// ## Network
/// - **Sequential**: Ordered container of layers; validates adjacent shapes at build time and answers
///   the neighbour queries used during backpropagation
/// - **InputShape**: Passive description of the network input (flat or width × height × channels)
///
/// ## Training
/// - **Initializer**: Pluggable, seedable parameter initialization (RandomUniform, XavierUniform, Constant)
/// - **LossFunction**: BinaryCrossEntropy and MeanSquaredError, producing the output-layer error signal
/// - **SGD**: Plain gradient descent
/// - **Trainer** / **TrainingConfig**: Epoch orchestration with optional mini-batches
///
/// # Examples
/// ```rust
/// use rustynn::neural_network::*;
/// use ndarray::Array2;
///
/// let x = Array2::<f32>::ones((2, 3));
///
/// let mut network = Sequential::builder(InputShape::flat(3))
///     .add(Dense::new(3, 4, Sigmoid::new()).unwrap())
///     .add(Dense::new_output_layer(4, 1, Sigmoid::new()).unwrap())
///     .build()
///     .unwrap();
/// network.init(&mut XavierUniform::new(Some(7))).unwrap();
///
/// let prediction = network.forward(&x).unwrap();
/// assert_eq!(prediction.dim(), (2, 1));
/// ```
#[cfg(feature = "neural_network")]
pub mod neural_network;

/// A convenience module that re-exports the most commonly used types and traits from this crate.
///
/// # Examples
/// ```rust
/// use rustynn::prelude::*;
/// ```
pub mod prelude;

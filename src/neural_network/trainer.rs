use crate::error::{IoError, ModelError};
use crate::neural_network::optimizer::SGD;
use crate::neural_network::optimizer::input_validation_function::validate_learning_rate;
use crate::neural_network::{LayerContainer, LossFunction, Sequential, Tensor};
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Axis;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Hyper-parameters of a training run.
///
/// Every field has a default, so a JSON document only needs to name the values it overrides:
///
/// ```rust
/// use rustynn::neural_network::TrainingConfig;
///
/// let config = TrainingConfig::from_json_str(r#"{ "learning_rate": 0.5, "batch_size": 2 }"#).unwrap();
/// assert_eq!(config.learning_rate, 0.5);
/// assert_eq!(config.batch_size, Some(2));
/// assert_eq!(config.epochs, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Step size of the SGD update
    pub learning_rate: f32,
    /// L2 regularization strength folded into every weight gradient
    pub regularization: f32,
    /// Number of passes over the training data
    pub epochs: usize,
    /// Rows per mini-batch; `None` trains on the full batch
    pub batch_size: Option<usize>,
    /// Seed of the mini-batch shuffling; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Epochs between two progress log lines; 0 disables them
    pub log_interval: usize,
    /// Whether to draw a progress bar on the terminal
    pub show_progress: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            regularization: 0.0,
            epochs: 1000,
            batch_size: None,
            seed: None,
            log_interval: 100,
            show_progress: false,
        }
    }
}

impl TrainingConfig {
    /// Checks that the configuration describes a runnable training loop
    ///
    /// # Returns
    ///
    /// - `Ok(())` - The configuration is usable
    /// - `Err(ModelError::InputValidationError)` - If the learning rate is not positive and finite,
    ///   the regularization is negative or not finite, or `epochs` or `batch_size` is zero
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_learning_rate(self.learning_rate)?;
        if self.regularization < 0.0 || !self.regularization.is_finite() {
            return Err(ModelError::InputValidationError(format!(
                "regularization must be non-negative and finite, got {}",
                self.regularization
            )));
        }
        if self.epochs == 0 {
            return Err(ModelError::InputValidationError(
                "epochs must be greater than 0".to_string(),
            ));
        }
        if self.batch_size == Some(0) {
            return Err(ModelError::InputValidationError(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, IoError> {
        let config: Self = serde_json::from_str(json).map_err(IoError::JsonError)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a configuration from a JSON file
    ///
    /// # Parameters
    ///
    /// * `path` - Path of the JSON file
    ///
    /// # Returns
    ///
    /// - `Ok(TrainingConfig)` - The parsed configuration
    /// - `Err(IoError)` - If the file cannot be read, is not valid JSON, or fails validation
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, IoError> {
        let reader = IoError::load_in_buf_reader(path)?;
        let config: Self = serde_json::from_reader(reader).map_err(IoError::JsonError)?;
        config.validate()?;
        Ok(config)
    }
}

/// Drives a [`Sequential`] network through epochs of forward, loss, backward and update.
///
/// The loss function supplies both the reported loss and the error signal fed to the output
/// layer, so it has to match the output activation (see [`LossFunction`]).
///
/// # Example
/// ```rust
/// use rustynn::prelude::*;
/// use ndarray::array;
///
/// let x = array![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
/// let y = array![[0.0], [0.0], [0.0], [1.0]];
///
/// let mut network = Sequential::builder(InputShape::flat(2))
///     .add(Dense::new(2, 3, Tanh::new()).unwrap())
///     .add(Dense::new_output_layer(3, 1, Sigmoid::new()).unwrap())
///     .build()
///     .unwrap();
/// network.init(&mut XavierUniform::new(Some(11))).unwrap();
///
/// let config = TrainingConfig { epochs: 5, seed: Some(1), batch_size: Some(2), ..TrainingConfig::default() };
/// let mut trainer = Trainer::new(config, BinaryCrossEntropy::new()).unwrap();
/// let losses = trainer.fit(&mut network, &x, &y).unwrap();
/// assert_eq!(losses.len(), 5);
/// ```
pub struct Trainer {
    config: TrainingConfig,
    optimizer: SGD,
    loss: Box<dyn LossFunction>,
}

impl Trainer {
    /// Creates a trainer from a configuration and a loss function
    ///
    /// # Returns
    ///
    /// - `Ok(Trainer)` - A new trainer
    /// - `Err(ModelError::InputValidationError)` - If the configuration is invalid
    pub fn new<L>(config: TrainingConfig, loss: L) -> Result<Self, ModelError>
    where
        L: LossFunction + 'static,
    {
        config.validate()?;
        let optimizer = SGD::new(config.learning_rate)?;
        Ok(Self {
            config,
            optimizer,
            loss: Box::new(loss),
        })
    }

    /// Returns the configuration of the trainer
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Runs one forward, backward and update cycle on a single batch
    ///
    /// # Parameters
    ///
    /// - `network` - Network to train
    /// - `x` - Input batch with shape (batch_size, input_size)
    /// - `y` - Targets with shape (batch_size, output_size)
    ///
    /// # Returns
    ///
    /// - `Ok(f32)` - Loss of the batch before the update
    /// - `Err(ModelError)` - If shapes disagree or a layer operation fails
    pub fn train_step(
        &mut self,
        network: &mut Sequential,
        x: &Tensor,
        y: &Tensor,
    ) -> Result<f32, ModelError> {
        let prediction = network.forward(x)?;
        if prediction.dim() != y.dim() {
            return Err(ModelError::ShapeMismatch {
                layer_index: network.len().saturating_sub(1),
                operation: "train_step",
                expected: prediction.dim(),
                actual: y.dim(),
            });
        }

        let loss = self.loss.compute_loss(y, &prediction);
        let error = self.loss.compute_delta(y, &prediction);
        network.backward(&error, self.config.regularization)?;
        network.update(&mut self.optimizer)?;
        Ok(loss)
    }

    /// Trains the network for the configured number of epochs
    ///
    /// With a `batch_size`, every epoch shuffles the row indices and walks them in mini-batches;
    /// the last batch of an epoch may be smaller.
    ///
    /// # Parameters
    ///
    /// - `network` - Network to train
    /// - `x` - Training inputs with shape (n_samples, input_size)
    /// - `y` - Training targets with shape (n_samples, output_size)
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<f32>)` - Mean batch loss of every epoch
    /// - `Err(ModelError)` - If the data is empty or inconsistent, or a layer operation fails
    pub fn fit(
        &mut self,
        network: &mut Sequential,
        x: &Tensor,
        y: &Tensor,
    ) -> Result<Vec<f32>, ModelError> {
        let n_samples = x.nrows();
        if n_samples == 0 {
            return Err(ModelError::InputValidationError(
                "Input data is empty".to_string(),
            ));
        }
        if y.nrows() != n_samples {
            return Err(ModelError::InputValidationError(format!(
                "Input data length ({}) does not match target length ({})",
                n_samples,
                y.nrows()
            )));
        }
        let batch_size = self.config.batch_size.unwrap_or(n_samples);
        if batch_size > n_samples {
            return Err(ModelError::InputValidationError(format!(
                "batch_size ({}) exceeds the number of samples ({})",
                batch_size, n_samples
            )));
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let mut indices: Vec<usize> = (0..n_samples).collect();

        let progress_bar = if self.config.show_progress {
            let bar = ProgressBar::new(self.config.epochs as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} | Loss: {msg}")
                    .map_err(|e| ModelError::ProcessingError(e.to_string()))?
                    .progress_chars("█▓░"),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        log::info!(
            "training: {} samples, {} epochs, batch size {}, learning rate {}",
            n_samples,
            self.config.epochs,
            batch_size,
            self.config.learning_rate
        );

        let mut epoch_losses = Vec::with_capacity(self.config.epochs);
        for epoch in 0..self.config.epochs {
            let epoch_loss = if batch_size == n_samples {
                self.train_step(network, x, y)?
            } else {
                indices.shuffle(&mut rng);
                let mut total = 0.0;
                let mut batches = 0;
                for chunk in indices.chunks(batch_size) {
                    let batch_x = x.select(Axis(0), chunk);
                    let batch_y = y.select(Axis(0), chunk);
                    total += self.train_step(network, &batch_x, &batch_y)?;
                    batches += 1;
                }
                total / batches as f32
            };

            if !epoch_loss.is_finite() {
                log::warn!("epoch {}: loss is not finite ({})", epoch + 1, epoch_loss);
            }
            if self.config.log_interval > 0 && (epoch + 1) % self.config.log_interval == 0 {
                log::info!("epoch {}/{}: loss {:.6}", epoch + 1, self.config.epochs, epoch_loss);
            }

            progress_bar.set_message(format!("{:.6}", epoch_loss));
            progress_bar.inc(1);
            epoch_losses.push(epoch_loss);
        }
        progress_bar.finish_with_message("Training completed");

        Ok(epoch_losses)
    }
}

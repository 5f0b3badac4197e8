use crate::error::ModelError;
use crate::neural_network::{Initializer, Tensor};
use ndarray::Array;
use ndarray_rand::RandomExt;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand_distr::Uniform;

/// Creates the random generator used by an initializer.
///
/// A fixed seed makes initialization reproducible; without one the generator is seeded from
/// system entropy.
fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Initializes weights and bias uniformly at random in `[low, high)`.
///
/// `RandomUniform::unit` draws from `[0, 1)` for both weights and bias, which is the classic
/// `rand(input, output)` / `rand(1, output)` initialization.
///
/// # Fields
///
/// - `low` - Inclusive lower bound of the distribution
/// - `high` - Exclusive upper bound of the distribution
/// - `rng` - Random generator, seeded at construction
///
/// # Example
/// ```rust
/// use rustynn::neural_network::{Initializer, RandomUniform};
///
/// let mut init = RandomUniform::new(-0.5, 0.5, Some(42)).unwrap();
/// let w = init.weights(3, 4);
/// assert_eq!(w.dim(), (3, 4));
/// assert!(w.iter().all(|&v| (-0.5..0.5).contains(&v)));
/// ```
pub struct RandomUniform {
    low: f32,
    high: f32,
    rng: StdRng,
}

impl RandomUniform {
    /// Creates a uniform initializer over `[low, high)`.
    ///
    /// # Parameters
    ///
    /// - `low` - Inclusive lower bound
    /// - `high` - Exclusive upper bound
    /// - `seed` - Optional seed for reproducible initialization
    ///
    /// # Returns
    ///
    /// - `Ok(RandomUniform)` - The initializer
    /// - `Err(ModelError::InputValidationError)` - If a bound is not finite or `low >= high`
    pub fn new(low: f32, high: f32, seed: Option<u64>) -> Result<Self, ModelError> {
        if !(low.is_finite() && high.is_finite()) || low >= high {
            return Err(ModelError::InputValidationError(format!(
                "uniform bounds must be finite with low < high, got [{}, {})",
                low, high
            )));
        }

        Ok(Self {
            low,
            high,
            rng: seeded_rng(seed),
        })
    }

    /// Creates a uniform initializer over `[0, 1)`.
    pub fn unit(seed: Option<u64>) -> Self {
        Self {
            low: 0.0,
            high: 1.0,
            rng: seeded_rng(seed),
        }
    }

    /// Returns the bounds `(low, high)` of the distribution.
    pub fn bounds(&self) -> (f32, f32) {
        (self.low, self.high)
    }
}

impl Initializer for RandomUniform {
    fn weights(&mut self, input_size: usize, output_size: usize) -> Tensor {
        Array::random_using(
            (input_size, output_size),
            Uniform::new(self.low, self.high),
            &mut self.rng,
        )
    }

    fn bias(&mut self, output_size: usize) -> Tensor {
        Array::random_using(
            (1, output_size),
            Uniform::new(self.low, self.high),
            &mut self.rng,
        )
    }
}

/// Xavier/Glorot uniform initialization.
///
/// Weights are drawn from `[-limit, limit)` with `limit = sqrt(6 / (input_size + output_size))`,
/// which keeps activation variance roughly constant across layers. Bias values start at zero.
pub struct XavierUniform {
    rng: StdRng,
}

impl XavierUniform {
    /// Creates a Xavier uniform initializer with an optional seed.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: seeded_rng(seed),
        }
    }
}

impl Initializer for XavierUniform {
    fn weights(&mut self, input_size: usize, output_size: usize) -> Tensor {
        let limit = (6.0 / (input_size + output_size).max(1) as f32).sqrt();
        Array::random_using(
            (input_size, output_size),
            Uniform::new(-limit, limit),
            &mut self.rng,
        )
    }

    fn bias(&mut self, output_size: usize) -> Tensor {
        Tensor::zeros((1, output_size))
    }
}

/// Fills every weight and every bias with a fixed value.
///
/// Mostly useful in tests. Note that a constant initialization gives all units of a layer the
/// same gradient, so hidden units never differentiate during training.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant {
    weight: f32,
    bias: f32,
}

impl Constant {
    /// Creates a constant initializer.
    ///
    /// # Parameters
    ///
    /// - `weight` - Value for every weight
    /// - `bias` - Value for every bias entry
    pub fn new(weight: f32, bias: f32) -> Self {
        Self { weight, bias }
    }
}

impl Initializer for Constant {
    fn weights(&mut self, input_size: usize, output_size: usize) -> Tensor {
        Tensor::from_elem((input_size, output_size), self.weight)
    }

    fn bias(&mut self, output_size: usize) -> Tensor {
        Tensor::from_elem((1, output_size), self.bias)
    }
}

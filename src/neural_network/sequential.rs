use crate::error::ModelError;
use crate::neural_network::{
    InputShape, Initializer, Layer, LayerContainer, LayerPhase, Optimizer, Tensor,
};

/// Borrowed view of every layer of a network except the one currently being mutated.
///
/// `Sequential::backward_layer` splits its layer vector around the layer that runs its backward
/// pass; the layer itself is borrowed mutably while all other layers are handed to it through this
/// view for read-only neighbour lookups.
pub struct LayerView<'a> {
    before: &'a [Box<dyn Layer>],
    after: &'a [Box<dyn Layer>],
    skipped: usize,
}

impl LayerContainer for LayerView<'_> {
    fn len(&self) -> usize {
        self.before.len() + 1 + self.after.len()
    }

    fn layer_at(&self, index: usize) -> Option<&dyn Layer> {
        if index < self.skipped {
            self.before.get(index).map(|layer| -> &dyn Layer { &**layer })
        } else if index > self.skipped {
            self.after.get(index - self.skipped - 1).map(|layer| -> &dyn Layer { &**layer })
        } else {
            None
        }
    }
}

/// Builder for a [`Sequential`] network.
///
/// Layers are validated and indexed when `build` is called, never later: a network that
/// exists is guaranteed to have compatible adjacent layer sizes.
pub struct SequentialBuilder {
    input_shape: InputShape,
    layers: Vec<Box<dyn Layer>>,
}

impl SequentialBuilder {
    /// Appends a layer to the network
    ///
    /// # Parameters
    ///
    /// * `layer` - The layer to add to the network
    ///
    /// # Returns
    ///
    /// * `SequentialBuilder` - The builder, for method chaining
    pub fn add<L: 'static + Layer>(mut self, layer: L) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// Validates the layer chain and builds the network
    ///
    /// # Returns
    ///
    /// - `Ok(Sequential)` - The network, with every layer attached to its index
    /// - `Err(ModelError::InputValidationError)` - If there are no layers, or the output-layer flag is
    ///   not set on exactly the last layer
    /// - `Err(ModelError::NetworkShapeIncompatibility)` - If the input descriptor and the first layer,
    ///   or two adjacent layers, disagree on size
    pub fn build(mut self) -> Result<Sequential, ModelError> {
        let Some(first) = self.layers.first() else {
            return Err(ModelError::InputValidationError(
                "Layers not specified".to_string(),
            ));
        };

        if first.input_size() != self.input_shape.size() {
            return Err(ModelError::NetworkShapeIncompatibility {
                layer_index: 0,
                expected_input: first.input_size(),
                actual_input: self.input_shape.size(),
            });
        }

        for (i, pair) in self.layers.windows(2).enumerate() {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(ModelError::NetworkShapeIncompatibility {
                    layer_index: i + 1,
                    expected_input: pair[1].input_size(),
                    actual_input: pair[0].output_size(),
                });
            }
        }

        let last_index = self.layers.len() - 1;
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.is_output_layer() != (i == last_index) {
                return Err(ModelError::InputValidationError(format!(
                    "exactly the last layer must be the output layer, but layer {} has is_output_layer = {}",
                    i,
                    layer.is_output_layer()
                )));
            }
        }

        for (i, layer) in self.layers.iter_mut().enumerate() {
            layer.attach(i);
        }

        log::info!(
            "built sequential network: input {}, {} layers",
            self.input_shape,
            self.layers.len()
        );

        Ok(Sequential {
            input_shape: self.input_shape,
            layers: self.layers,
        })
    }
}

/// A Sequential neural network: an ordered chain of layers.
///
/// The network owns its layers and is the only component with a global view of them. It answers
/// the two neighbour queries layers make during backpropagation ("weights of layer k" and "output
/// of layer k", see [`LayerContainer`]) and sequences the per-layer operations:
/// forward in increasing index order, backward in decreasing index order, then update. Epochs, loss
/// computation and batching are left to the training driver.
///
/// # Example
/// ```rust
/// use rustynn::prelude::*;
/// use ndarray::Array2;
///
/// let mut network = Sequential::builder(InputShape::flat(3))
///     .add(Dense::new(3, 4, Sigmoid::new()).unwrap())
///     .add(Dense::new_output_layer(4, 1, Sigmoid::new()).unwrap())
///     .build()
///     .unwrap();
/// network.init(&mut RandomUniform::unit(Some(3))).unwrap();
///
/// let x = Array2::from_elem((5, 3), 0.5);
/// let y = Array2::<f32>::ones((5, 1));
///
/// let prediction = network.forward(&x).unwrap();
/// network.backward(&(prediction - &y), 0.01).unwrap();
/// network.update(&mut SGD::new(0.1).unwrap()).unwrap();
///
/// network.summary();
/// ```
pub struct Sequential {
    input_shape: InputShape,
    layers: Vec<Box<dyn Layer>>,
}

impl Sequential {
    /// Starts building a network for inputs described by `input_shape`
    pub fn builder(input_shape: InputShape) -> SequentialBuilder {
        SequentialBuilder {
            input_shape,
            layers: Vec::new(),
        }
    }

    /// Returns the input descriptor of the network
    pub fn input_shape(&self) -> InputShape {
        self.input_shape
    }

    /// Returns the layer at `index`
    pub fn layer(&self, index: usize) -> Result<&dyn Layer, ModelError> {
        self.neighbor(index)
    }

    /// Iterates over the layers in index order
    pub fn layers(&self) -> impl Iterator<Item = &dyn Layer> {
        self.layers.iter().map(|layer| -> &dyn Layer { &**layer })
    }

    /// Initializes the parameters of every layer
    ///
    /// # Parameters
    ///
    /// * `initializer` - Source of initial weights and bias, shared by all layers in index order
    pub fn init(&mut self, initializer: &mut dyn Initializer) -> Result<(), ModelError> {
        for layer in &mut self.layers {
            layer.init(initializer)?;
        }
        Ok(())
    }

    /// Replaces the weights and bias of one layer with fixed values
    ///
    /// # Parameters
    ///
    /// - `index` - Index of the layer
    /// - `weights` - Weight matrix with shape (input_size, output_size)
    /// - `bias` - Bias row with shape (1, output_size)
    pub fn set_layer_parameters(
        &mut self,
        index: usize,
        weights: Tensor,
        bias: Tensor,
    ) -> Result<(), ModelError> {
        let count = self.layers.len();
        let layer = self.layers.get_mut(index).ok_or_else(|| {
            ModelError::InputValidationError(format!(
                "layer index {} out of range for a network of {} layers",
                index, count
            ))
        })?;
        layer.set_parameters(weights, bias)
    }

    /// Runs the forward pass through every layer in index order
    ///
    /// # Parameters
    ///
    /// * `x` - Input batch with shape (batch_size, input_size)
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - Output of the last layer with shape (batch_size, output_size)
    /// - `Err(ModelError)` - If a layer is uninitialized or the input shape is wrong
    pub fn forward(&mut self, x: &Tensor) -> Result<Tensor, ModelError> {
        // All layers must be usable before any of them advances its step counter.
        for layer in &self.layers {
            layer.weights()?;
        }

        let mut output = x.clone();
        for layer in &mut self.layers {
            output = layer.forward(&output)?;
        }
        Ok(output)
    }

    /// Runs the backward pass of a single layer
    ///
    /// The layer at `index` is borrowed mutably; every other layer is exposed to it through a
    /// read-only [`LayerView`].
    ///
    /// # Parameters
    ///
    /// - `index` - Index of the layer
    /// - `signal` - Top-level error for the output layer, otherwise the delta of layer `index + 1`
    /// - `regularization` - L2 regularization strength
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - The delta of the layer
    /// - `Err(ModelError)` - If the index is out of range, shapes disagree, or the call is out of order
    pub fn backward_layer(
        &mut self,
        index: usize,
        signal: &Tensor,
        regularization: f32,
    ) -> Result<Tensor, ModelError> {
        if index >= self.layers.len() {
            return Err(ModelError::InputValidationError(format!(
                "layer index {} out of range for a network of {} layers",
                index,
                self.layers.len()
            )));
        }

        let (before, rest) = self.layers.split_at_mut(index);
        let (current, after) = rest.split_at_mut(1);
        let view = LayerView {
            before,
            after,
            skipped: index,
        };
        current[0].backward(signal, regularization, &view)
    }

    /// Runs the backward pass through every layer in decreasing index order
    ///
    /// # Parameters
    ///
    /// - `error` - Error signal for the output layer (e.g. `prediction - target`)
    /// - `regularization` - L2 regularization strength
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - The delta of the first layer
    pub fn backward(&mut self, error: &Tensor, regularization: f32) -> Result<Tensor, ModelError> {
        let mut signal = error.clone();
        for index in (0..self.layers.len()).rev() {
            signal = self.backward_layer(index, &signal, regularization)?;
        }
        Ok(signal)
    }

    /// Applies the optimizer to every layer
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Every layer applied its gradients
    /// - `Err(ModelError::OrderingViolation)` - If some layer has not completed its backward pass;
    ///   no layer is updated in that case
    pub fn update(&mut self, optimizer: &mut dyn Optimizer) -> Result<(), ModelError> {
        // Every layer must hold gradients before any of them applies its own.
        for layer in &self.layers {
            if layer.phase() != LayerPhase::AwaitingUpdate {
                return Err(ModelError::OrderingViolation {
                    layer_index: layer.index(),
                    operation: "update",
                    reason: format!(
                        "layer is {}, expected {}",
                        layer.phase(),
                        LayerPhase::AwaitingUpdate
                    ),
                });
            }
        }

        for layer in &mut self.layers {
            optimizer.update(layer.as_mut())?;
        }
        Ok(())
    }

    /// Prints a summary of the network's structure
    ///
    /// Displays each layer's information and parameter count in a tabular format
    pub fn summary(&self) {
        let col1_width = 33;
        let col2_width = 24;
        let col3_width = 15;
        println!("Model: \"sequential\"");
        println!(" Input shape: {}", self.input_shape);
        println!(
            "┏{}┳{}┳{}┓",
            "━".repeat(col1_width),
            "━".repeat(col2_width),
            "━".repeat(col3_width)
        );
        println!(
            "┃ {:<31} ┃ {:<22} ┃ {:>13} ┃",
            "Layer (type)", "Output Shape", "Param #"
        );
        println!(
            "┡{}╇{}╇{}┩",
            "━".repeat(col1_width),
            "━".repeat(col2_width),
            "━".repeat(col3_width)
        );

        let mut total_params: usize = 0;
        for layer in &self.layers {
            let layer_name = if layer.index() == 0 {
                "Layer".to_string()
            } else {
                format!("Layer_{}", layer.index())
            };
            let param_count = layer.param_count();
            total_params += param_count;

            println!(
                "│ {:<31} │ {:<22} │ {:>13} │",
                format!("{} ({})", layer_name, layer.layer_type()),
                layer.output_shape(),
                param_count
            );
        }
        println!(
            "└{}┴{}┴{}┘",
            "─".repeat(col1_width),
            "─".repeat(col2_width),
            "─".repeat(col3_width)
        );
        println!(" Total params: {} ({} B)", total_params, total_params * 4); // f32, 4 bytes each
    }
}

impl LayerContainer for Sequential {
    fn len(&self) -> usize {
        self.layers.len()
    }

    fn layer_at(&self, index: usize) -> Option<&dyn Layer> {
        self.layers.get(index).map(|layer| -> &dyn Layer { &**layer })
    }
}

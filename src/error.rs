/// Error types that can occur while building, initializing or training a network
///
/// Every variant that concerns a single layer carries the index of that layer so that a
/// failing step can be traced back to the exact position in the network.
///
/// # Variants
///
/// - `ShapeMismatch` - Input, weight, bias or error-signal dimensions are incompatible for the operation
/// - `UninitializedParameter` - A layer was used before its weights and bias were initialized
/// - `OrderingViolation` - The forward/backward/update protocol was invoked out of order
/// - `NetworkShapeIncompatibility` - Adjacent layers (or the network input and the first layer) disagree on size
/// - `StateNotComputed` - A cached value (output, delta, gradient) was read before the pass that produces it
/// - `InputValidationError` - Indicates the input data or hyper-parameters do not meet the expected rules
/// - `ProcessingError` - Indicates that there is something wrong while processing
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    ShapeMismatch {
        layer_index: usize,
        operation: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    UninitializedParameter {
        layer_index: usize,
        operation: &'static str,
    },
    OrderingViolation {
        layer_index: usize,
        operation: &'static str,
        reason: String,
    },
    NetworkShapeIncompatibility {
        layer_index: usize,
        expected_input: usize,
        actual_input: usize,
    },
    StateNotComputed {
        layer_index: usize,
        state: &'static str,
    },
    InputValidationError(String),
    ProcessingError(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::ShapeMismatch {
                layer_index,
                operation,
                expected,
                actual,
            } => write!(
                f,
                "Shape mismatch in {} of layer {}: expected {:?}, got {:?}",
                operation, layer_index, expected, actual
            ),
            ModelError::UninitializedParameter {
                layer_index,
                operation,
            } => write!(
                f,
                "Layer {} has no initialized weights/bias; call init() before {}",
                layer_index, operation
            ),
            ModelError::OrderingViolation {
                layer_index,
                operation,
                reason,
            } => write!(
                f,
                "Ordering violation in {} of layer {}: {}",
                operation, layer_index, reason
            ),
            ModelError::NetworkShapeIncompatibility {
                layer_index,
                expected_input,
                actual_input,
            } => write!(
                f,
                "Network shape incompatibility: layer {} expects input size {}, but receives {}",
                layer_index, expected_input, actual_input
            ),
            ModelError::StateNotComputed { layer_index, state } => write!(
                f,
                "Layer {} has no `{}` yet; the pass that produces it has not run",
                layer_index, state
            ),
            ModelError::InputValidationError(msg) => write!(f, "Input validation error: {}", msg),
            ModelError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {}

/// Input/Output error types that can occur while loading a training configuration
///
/// # Variants
///
/// - `StdIoError` - Wraps standard I/O errors from file system operations (reading, file access)
/// - `JsonError` - Wraps JSON deserialization errors
/// - `InvalidConfig` - The configuration parsed but failed validation
#[derive(Debug)]
pub enum IoError {
    StdIoError(std::io::Error),
    JsonError(serde_json::Error),
    InvalidConfig(ModelError),
}

impl IoError {
    pub fn load_in_buf_reader(
        path: impl AsRef<std::path::Path>,
    ) -> Result<std::io::BufReader<std::fs::File>, IoError> {
        let file = std::fs::File::open(path).map_err(IoError::StdIoError)?;
        Ok(std::io::BufReader::new(file))
    }
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::StdIoError(e) => write!(f, "IO error: {}", e),
            IoError::JsonError(e) => write!(f, "JSON error: {}", e),
            IoError::InvalidConfig(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for IoError {}

impl From<ModelError> for IoError {
    fn from(err: ModelError) -> Self {
        IoError::InvalidConfig(err)
    }
}

/// Dense (fully connected) layer
pub mod dense;
/// Shape and hyper-parameter checks shared by layer implementations
mod input_validation_function;

pub use dense::*;

/// Position of a layer within one forward → backward → update training step.
///
/// Layers start in `AwaitingForward`. A forward pass is accepted in every phase (inference runs
/// forward repeatedly) and always moves the layer to `AwaitingBackward`. Backward is only accepted
/// in `AwaitingBackward` and moves the layer to `AwaitingUpdate`; update is only accepted in
/// `AwaitingUpdate` and moves the layer back to `AwaitingForward`.
///
/// # Variants
///
/// - `AwaitingForward` - Parameters are ready; no step is in flight
/// - `AwaitingBackward` - Output is cached; the backward pass of this step has not run yet
/// - `AwaitingUpdate` - Delta and gradients are cached; the update of this step has not run yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerPhase {
    AwaitingForward,
    AwaitingBackward,
    AwaitingUpdate,
}

impl std::fmt::Display for LayerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LayerPhase::AwaitingForward => "awaiting forward",
            LayerPhase::AwaitingBackward => "awaiting backward",
            LayerPhase::AwaitingUpdate => "awaiting update",
        };
        f.write_str(name)
    }
}

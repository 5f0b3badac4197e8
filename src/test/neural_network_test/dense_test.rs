use super::*;

/// Container for a layer that stands alone, with no neighbours to query.
struct NoNeighbors;

impl LayerContainer for NoNeighbors {
    fn len(&self) -> usize {
        1
    }

    fn layer_at(&self, _index: usize) -> Option<&dyn Layer> {
        None
    }
}

fn single_output_layer() -> Dense {
    let mut dense = Dense::new_output_layer(3, 2, Linear::new()).unwrap();
    dense
        .set_parameters(
            array![[0.5, -1.0], [0.25, 0.0], [1.0, 2.0]],
            array![[0.1, -0.2]],
        )
        .unwrap();
    dense
}

#[test]
fn test_dense_forward_pass_dimensions() {
    let mut dense = Dense::new(4, 3, ReLU::new()).unwrap();
    dense.init(&mut Constant::new(0.5, 0.1)).unwrap();

    let output = dense.forward(&Array2::ones((2, 4))).unwrap();
    assert_eq!(output.dim(), (2, 3));
    for &v in output.iter() {
        assert_relative_eq!(v, 4.0 * 0.5 + 0.1, epsilon = 1e-6);
    }
    assert_eq!(dense.output().unwrap(), &output);
    assert_eq!(dense.phase(), LayerPhase::AwaitingBackward);
    assert_eq!(dense.step(), 1);
}

#[test]
fn test_dense_forward_is_deterministic() {
    let mut dense = Dense::new(3, 4, Sigmoid::new()).unwrap();
    dense.init(&mut RandomUniform::unit(Some(8))).unwrap();
    let x = array![[0.3, -0.7, 1.2], [2.0, 0.0, -1.0]];

    let first = dense.forward(&x).unwrap();
    let second = dense.forward(&x).unwrap();
    assert_eq!(first, second);
    assert_eq!(dense.step(), 2);
}

#[test]
fn test_dense_rejects_zero_sizes() {
    assert!(matches!(
        Dense::new(0, 3, ReLU::new()),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(Dense::new_output_layer(3, 0, Linear::new()).is_err());
}

#[test]
fn test_dense_uninitialized_parameters() {
    let mut dense = Dense::new(2, 2, Tanh::new()).unwrap();

    assert_eq!(
        dense.forward(&Array2::ones((1, 2))),
        Err(ModelError::UninitializedParameter {
            layer_index: 0,
            operation: "forward",
        })
    );
    assert!(matches!(
        dense.weights(),
        Err(ModelError::UninitializedParameter { .. })
    ));
    assert!(matches!(
        dense.bias(),
        Err(ModelError::UninitializedParameter { .. })
    ));
    // A failed forward leaves the step counter untouched
    assert_eq!(dense.step(), 0);
}

#[test]
fn test_dense_forward_shape_mismatch() {
    let mut dense = Dense::new(4, 3, ReLU::new()).unwrap();
    dense.init(&mut XavierUniform::new(Some(2))).unwrap();

    assert_eq!(
        dense.forward(&Array2::ones((2, 3))),
        Err(ModelError::ShapeMismatch {
            layer_index: 0,
            operation: "forward",
            expected: (2, 4),
            actual: (2, 3),
        })
    );
    assert_eq!(dense.phase(), LayerPhase::AwaitingForward);
}

#[test]
fn test_dense_set_parameters_shape_mismatch() {
    let mut dense = Dense::new(3, 2, Linear::new()).unwrap();

    assert_eq!(
        dense.set_parameters(Array2::zeros((2, 3)), Array2::zeros((1, 2))),
        Err(ModelError::ShapeMismatch {
            layer_index: 0,
            operation: "set_parameters",
            expected: (3, 2),
            actual: (2, 3),
        })
    );
    assert!(
        dense
            .set_parameters(Array2::zeros((3, 2)), Array2::zeros((2, 1)))
            .is_err()
    );
    assert!(dense.weights().is_err());
}

#[test]
fn test_dense_state_not_computed() {
    let dense = single_output_layer();

    assert_eq!(
        dense.output(),
        Err(ModelError::StateNotComputed {
            layer_index: 0,
            state: "output",
        })
    );
    assert!(matches!(
        dense.delta(),
        Err(ModelError::StateNotComputed { state: "delta", .. })
    ));
    assert!(matches!(
        dense.weight_gradient(),
        Err(ModelError::StateNotComputed { .. })
    ));
    assert!(matches!(
        dense.bias_gradient(),
        Err(ModelError::StateNotComputed { .. })
    ));
    assert!(matches!(
        dense.last_input(),
        Err(ModelError::StateNotComputed { .. })
    ));
}

#[test]
fn test_output_layer_passes_signal_through() {
    let mut dense = single_output_layer();
    let x = array![[1.0, 2.0, 3.0], [-1.0, 0.5, 0.0]];
    let error = array![[0.3, -0.1], [0.0, 2.0]];

    for regularization in [0.0, 0.7] {
        dense.forward(&x).unwrap();
        let delta = dense.backward(&error, regularization, &NoNeighbors).unwrap();
        assert_eq!(delta, error);
        assert_eq!(dense.delta().unwrap(), &error);
        dense.update(0.1).unwrap();
    }
}

#[test]
fn test_output_layer_rejects_wrong_signal_shape() {
    let mut dense = single_output_layer();
    dense.forward(&Array2::ones((4, 3))).unwrap();

    assert_eq!(
        dense.backward(&Array2::ones((4, 3)), 0.0, &NoNeighbors),
        Err(ModelError::ShapeMismatch {
            layer_index: 0,
            operation: "backward",
            expected: (4, 2),
            actual: (4, 3),
        })
    );
    assert_eq!(dense.phase(), LayerPhase::AwaitingBackward);
}

#[test]
fn test_gradients_without_regularization() {
    let mut dense = single_output_layer();
    let x = array![[1.0, 2.0, 3.0], [-1.0, 0.5, 0.0]];
    let error = array![[0.3, -0.1], [0.0, 2.0]];

    dense.forward(&x).unwrap();
    dense.backward(&error, 0.0, &NoNeighbors).unwrap();

    assert_eq!(dense.last_input().unwrap(), &x);
    assert_eq!(dense.weight_gradient().unwrap(), &x.t().dot(&error));
    assert_eq!(dense.bias_gradient().unwrap(), &array![[0.3f32, 1.9]]);
    assert_eq!(dense.phase(), LayerPhase::AwaitingUpdate);
}

#[test]
fn test_gradients_with_regularization() {
    let mut dense = single_output_layer();
    let weights = dense.weights().unwrap().clone();
    let x = array![[1.0, 2.0, 3.0], [-1.0, 0.5, 0.0]];
    let error = array![[0.3, -0.1], [0.0, 2.0]];

    dense.forward(&x).unwrap();
    dense.backward(&error, 0.5, &NoNeighbors).unwrap();

    let expected = x.t().dot(&error) + &(&weights * 0.5);
    let gradient = dense.weight_gradient().unwrap();
    assert_eq!(gradient.dim(), (3, 2));
    for (&g, &e) in gradient.iter().zip(expected.iter()) {
        assert_relative_eq!(g, e, epsilon = 1e-6);
    }
    // Regularization never touches the bias gradient
    assert_eq!(dense.bias_gradient().unwrap(), &array![[0.3f32, 1.9]]);
}

#[test]
fn test_update_applies_gradient_step() {
    let mut dense = single_output_layer();
    let weights = dense.weights().unwrap().clone();
    let bias = dense.bias().unwrap().clone();
    let x = array![[1.0, 2.0, 3.0], [-1.0, 0.5, 0.0]];
    let error = array![[0.3, -0.1], [0.0, 2.0]];

    dense.forward(&x).unwrap();
    dense.backward(&error, 0.0, &NoNeighbors).unwrap();
    let grad_weights = dense.weight_gradient().unwrap().clone();
    let grad_bias = dense.bias_gradient().unwrap().clone();
    dense.update(0.1).unwrap();

    for ((&w, &w0), &g) in dense
        .weights()
        .unwrap()
        .iter()
        .zip(weights.iter())
        .zip(grad_weights.iter())
    {
        assert_relative_eq!(w, w0 - 0.1 * g, epsilon = 1e-6);
    }
    for ((&b, &b0), &g) in dense
        .bias()
        .unwrap()
        .iter()
        .zip(bias.iter())
        .zip(grad_bias.iter())
    {
        assert_relative_eq!(b, b0 - 0.1 * g, epsilon = 1e-6);
    }

    // Gradients are consumed by the update
    assert!(dense.weight_gradient().is_err());
    assert_eq!(dense.phase(), LayerPhase::AwaitingForward);
}

#[test]
fn test_update_with_column_major_signal() {
    let x = array![[1.0, 2.0, 3.0], [-1.0, 0.5, 0.0]];
    let error: Tensor = array![[0.3, -0.1], [0.0, 2.0]];
    let mut column_major = Array2::zeros((2, 2).f());
    column_major.assign(&error);
    assert!(!column_major.is_standard_layout());

    let mut row_major_layer = single_output_layer();
    let mut column_major_layer = single_output_layer();
    let weights = row_major_layer.weights().unwrap().clone();
    let bias = row_major_layer.bias().unwrap().clone();

    for (dense, signal) in [
        (&mut row_major_layer, &error),
        (&mut column_major_layer, &column_major),
    ] {
        dense.forward(&x).unwrap();
        dense.backward(signal, 0.0, &NoNeighbors).unwrap();
        dense.update(0.1).unwrap();
    }

    let expected_weights = &weights - &(x.t().dot(&error) * 0.1);
    let expected_bias = &bias - &(array![[0.3f32, 1.9]] * 0.1);
    for dense in [&row_major_layer, &column_major_layer] {
        for (&w, &e) in dense.weights().unwrap().iter().zip(expected_weights.iter()) {
            assert_relative_eq!(w, e, epsilon = 1e-6);
        }
        for (&b, &e) in dense.bias().unwrap().iter().zip(expected_bias.iter()) {
            assert_relative_eq!(b, e, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_backward_without_forward_is_ordering_violation() {
    let mut dense = single_output_layer();

    assert!(matches!(
        dense.backward(&Array2::ones((1, 2)), 0.0, &NoNeighbors),
        Err(ModelError::OrderingViolation {
            layer_index: 0,
            operation: "backward",
            ..
        })
    ));
}

#[test]
fn test_update_without_backward_is_ordering_violation() {
    let mut dense = single_output_layer();
    dense.forward(&Array2::ones((1, 3))).unwrap();

    assert!(matches!(
        dense.update(0.1),
        Err(ModelError::OrderingViolation {
            operation: "update",
            ..
        })
    ));
    // The forward caches are still usable after the rejected update
    assert!(
        dense
            .backward(&Array2::ones((1, 2)), 0.0, &NoNeighbors)
            .is_ok()
    );
}

#[test]
fn test_double_update_is_ordering_violation() {
    let mut dense = single_output_layer();
    dense.forward(&Array2::ones((1, 3))).unwrap();
    dense
        .backward(&Array2::ones((1, 2)), 0.0, &NoNeighbors)
        .unwrap();
    dense.update(0.1).unwrap();
    let weights = dense.weights().unwrap().clone();

    assert!(matches!(
        dense.update(0.1),
        Err(ModelError::OrderingViolation { .. })
    ));
    assert_eq!(dense.weights().unwrap(), &weights);
}

#[test]
fn test_double_backward_is_ordering_violation() {
    let mut dense = single_output_layer();
    dense.forward(&Array2::ones((1, 3))).unwrap();
    dense
        .backward(&Array2::ones((1, 2)), 0.0, &NoNeighbors)
        .unwrap();

    assert!(matches!(
        dense.backward(&Array2::ones((1, 2)), 0.0, &NoNeighbors),
        Err(ModelError::OrderingViolation { .. })
    ));
}

#[test]
fn test_invalid_hyper_parameters() {
    let mut dense = single_output_layer();
    dense.forward(&Array2::ones((1, 3))).unwrap();

    assert!(matches!(
        dense.backward(&Array2::ones((1, 2)), -0.1, &NoNeighbors),
        Err(ModelError::InputValidationError(_))
    ));
    dense
        .backward(&Array2::ones((1, 2)), 0.0, &NoNeighbors)
        .unwrap();
    assert!(matches!(
        dense.update(0.0),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(dense.update(f32::NAN).is_err());
    assert!(dense.update(0.1).is_ok());
}

#[test]
fn test_hidden_layer_without_neighbor() {
    let mut dense = Dense::new(3, 2, Sigmoid::new()).unwrap();
    dense.init(&mut Constant::new(0.1, 0.0)).unwrap();
    dense.forward(&Array2::ones((1, 3))).unwrap();

    assert!(matches!(
        dense.backward(&Array2::ones((1, 1)), 0.0, &NoNeighbors),
        Err(ModelError::ProcessingError(_))
    ));
}

#[test]
fn test_dense_metadata() {
    let dense = Dense::new(4, 3, ReLU::new()).unwrap();

    assert_eq!(dense.layer_type(), "Dense");
    assert_eq!(dense.output_shape(), "(None, 3)");
    assert_eq!(dense.param_count(), 4 * 3 + 3);
    assert_eq!(dense.activation().name(), "ReLU");
    assert!(!dense.is_output_layer());
    assert!(
        Dense::new_output_layer(3, 1, Sigmoid::new())
            .unwrap()
            .is_output_layer()
    );
}

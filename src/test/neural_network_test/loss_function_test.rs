use super::*;

#[test]
fn mean_squared_error_test() {
    let mse = MeanSquaredError::new();
    let y_true = array![[1.0, 0.0], [0.5, 2.0]];
    let y_pred = array![[0.0, 0.0], [1.5, 4.0]];

    // (1 + 0 + 1 + 4) / 4
    assert_relative_eq!(mse.compute_loss(&y_true, &y_pred), 1.5);
    assert_eq!(
        mse.compute_delta(&y_true, &y_pred),
        array![[-1.0f32, 0.0], [1.0, 2.0]]
    );
    assert_relative_eq!(mse.compute_loss(&y_true, &y_true), 0.0);
}

#[test]
fn binary_cross_entropy_test() {
    let bce = BinaryCrossEntropy::new();
    let y_true = array![[1.0], [0.0]];
    let y_pred = array![[0.8], [0.4]];

    let expected = -(0.8f32.ln() + 0.6f32.ln()) / 2.0;
    assert_relative_eq!(bce.compute_loss(&y_true, &y_pred), expected, epsilon = 1e-6);

    let delta = bce.compute_delta(&y_true, &y_pred);
    assert_relative_eq!(delta[[0, 0]], -0.2, epsilon = 1e-6);
    assert_relative_eq!(delta[[1, 0]], 0.4, epsilon = 1e-6);
}

#[test]
fn binary_cross_entropy_clips_predictions_test() {
    let bce = BinaryCrossEntropy::new();
    let y_true = array![[1.0], [0.0]];
    let y_pred = array![[0.0], [1.0]];

    let loss = bce.compute_loss(&y_true, &y_pred);
    assert!(loss.is_finite());
    assert!(loss > 10.0);
}

#[test]
fn loss_delta_matches_output_gradient_test() {
    // For a sigmoid output with cross entropy, dL/dz = a - y.
    // Checked numerically on a single unit.
    let bce = BinaryCrossEntropy::new();
    let sigmoid = Sigmoid::new();
    let y = array![[1.0]];
    let z = 0.3f32;
    let h = 1e-2f32;

    let loss_at = |v: f32| bce.compute_loss(&y, &sigmoid.forward(&array![[v]]));
    let numeric = (loss_at(z + h) - loss_at(z - h)) / (2.0 * h);
    let delta = bce.compute_delta(&y, &sigmoid.forward(&array![[z]]));

    assert_relative_eq!(delta[[0, 0]], numeric, epsilon = 1e-3);
}

#[test]
#[should_panic(expected = "Targets and predictions must have the same shape")]
fn mean_squared_error_rejects_broadcastable_shapes_test() {
    let y_true = array![[1.0], [0.0], [1.0]];
    let y_pred = array![[0.5]];
    MeanSquaredError::new().compute_loss(&y_true, &y_pred);
}

#[test]
#[should_panic(expected = "Targets and predictions must have the same shape")]
fn binary_cross_entropy_delta_rejects_shape_mismatch_test() {
    let y_true = array![[1.0, 0.0]];
    let y_pred = array![[0.5], [0.5]];
    BinaryCrossEntropy::new().compute_delta(&y_true, &y_pred);
}

use super::*;

#[test]
fn sigmoid_forward_backward_test() {
    let sigmoid = Sigmoid::new();
    let z = array![[0.0, 2.0, -2.0]];

    let a = sigmoid.forward(&z);
    assert_relative_eq!(a[[0, 0]], 0.5);
    assert_relative_eq!(a[[0, 1]], 1.0 / (1.0 + (-2.0f32).exp()), epsilon = 1e-6);
    assert_relative_eq!(a[[0, 1]] + a[[0, 2]], 1.0, epsilon = 1e-6);

    // Derivative is evaluated at the activated output
    let d = sigmoid.backward(&a);
    for (&ai, &di) in a.iter().zip(d.iter()) {
        assert_relative_eq!(di, ai * (1.0 - ai), epsilon = 1e-6);
    }
    assert_eq!(sigmoid.name(), "Sigmoid");
}

#[test]
fn sigmoid_extreme_inputs_test() {
    let sigmoid = Sigmoid::new();
    let a = sigmoid.forward(&array![[1000.0, -1000.0]]);
    assert!(a.iter().all(|v| v.is_finite()));
    assert_abs_diff_eq!(a[[0, 0]], 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(a[[0, 1]], 0.0, epsilon = 1e-6);
}

#[test]
fn tanh_forward_backward_test() {
    let tanh = Tanh::new();
    let z = array![[0.0, 0.5], [-1.0, 3.0]];

    let a = tanh.forward(&z);
    for (&zi, &ai) in z.iter().zip(a.iter()) {
        assert_relative_eq!(ai, zi.tanh(), epsilon = 1e-6);
    }

    let d = tanh.backward(&a);
    assert_relative_eq!(d[[0, 0]], 1.0);
    for (&ai, &di) in a.iter().zip(d.iter()) {
        assert_relative_eq!(di, 1.0 - ai * ai, epsilon = 1e-6);
    }
}

#[test]
fn relu_forward_backward_test() {
    let relu = ReLU::new();
    let z = array![[-2.0, -1.0, 0.0], [1.0, 2.0, 3.0]];

    let a = relu.forward(&z);
    assert_eq!(a, array![[0.0f32, 0.0, 0.0], [1.0, 2.0, 3.0]]);

    let d = relu.backward(&a);
    assert_eq!(d, array![[0.0f32, 0.0, 0.0], [1.0, 1.0, 1.0]]);
}

#[test]
fn linear_forward_backward_test() {
    let linear = Linear::new();
    let z = array![[-2.5, 0.0, 4.0]];

    assert_eq!(linear.forward(&z), z);
    assert_eq!(linear.backward(&z), Array2::<f32>::ones((1, 3)));
}

#[test]
fn large_tensor_parallel_path_test() {
    // Above the parallel threshold the result must be identical to the sequential map
    let z = Array2::from_shape_fn((50, 40), |(i, j)| (i as f32 - 25.0) * 0.1 + j as f32 * 0.01);
    let a = Sigmoid::new().forward(&z);

    assert_eq!(a.dim(), (50, 40));
    for (&zi, &ai) in z.iter().zip(a.iter()) {
        assert_relative_eq!(ai, 1.0 / (1.0 + (-zi).exp()), epsilon = 1e-6);
    }
}

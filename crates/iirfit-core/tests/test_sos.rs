//! Second-order section tests
//!
//! Test coverage:
//! - Cascade response matches the transfer function
//! - Ordering and gain placement
//! - Runtime coefficient layout
//! - Fitted filters decompose cleanly

use iirfit_core::filter::{sos_response, sos_to_tf, tf2sos};
use iirfit_core::frequency::FrequencyGrid;
use iirfit_core::invfreqz::InvFreqz;
use iirfit_core::{FitError, FrequencySamples, TransferFunction};

fn assert_cascade_matches(tf: &TransferFunction) {
    let omega = FrequencyGrid::normalized(128);
    let sections = tf.to_sos().unwrap();
    let expected = tf.response(&omega);
    let actual = sos_response(&sections, &omega);
    for (x, y) in actual.iter().zip(expected.iter()) {
        assert!((x - y).norm() < 1e-7 * y.norm().max(1.0), "{} vs {}", x, y);
    }
}

#[test]
fn test_sixth_order_cascade() {
    // (1 - z⁻¹ + 0.5 z⁻²)(1 - 0.9 z⁻¹ + 0.2 z⁻²)(1 + 0.8 z⁻²)
    // Zeros at ±j, e^{±jπ/3} and e^{±j2π/3}
    let b = [0.05, 0.0, 0.1, 0.0, 0.1, 0.0, 0.05];
    let a = [1.0, -1.9, 2.4, -2.17, 1.38, -0.52, 0.08];
    let tf = TransferFunction::from_real(&b, &a);
    assert!(tf.is_stable().unwrap());
    assert_eq!(tf.to_sos().unwrap().len(), 3);
    assert_cascade_matches(&tf);
}

#[test]
fn test_sections_ordered_towards_unit_circle() {
    // Poles at radius 0.3 and 0.95
    let a1 = [1.0, 0.0, 0.09];
    let a2 = [1.0, 0.0, 0.9025];
    let a = [1.0, 0.0, a1[2] + a2[2], 0.0, a1[2] * a2[2]];
    let b = [1.0, 0.0, 0.0, 0.0, 0.0];
    let sections = tf2sos(&b, &a).unwrap();

    assert_eq!(sections.len(), 2);
    assert!((sections[0].a[2] - 0.09).abs() < 1e-9);
    assert!((sections[1].a[2] - 0.9025).abs() < 1e-9);
}

#[test]
fn test_gain_in_first_section() {
    let b = [4.0, 0.0, -4.0 * 0.25];
    let a = [1.0, -0.5];
    let sections = tf2sos(&b, &a).unwrap();
    assert_eq!(sections.len(), 1);
    assert!((sections[0].b[0] - 4.0).abs() < 1e-12);
    assert_eq!(sections[0].a[0], 1.0);
}

#[test]
fn test_runtime_layout_drops_leading_one() {
    let tf = TransferFunction::from_real(&[0.2, 0.3, 0.1], &[1.0, -0.4, 0.1]);
    let sections = tf.to_sos().unwrap();
    let full = sections[0].coefficients();
    let runtime = sections[0].runtime_coefficients();
    assert_eq!(full[3], 1.0);
    assert_eq!(runtime, [full[0], full[1], full[2], full[4], full[5]]);
}

#[test]
fn test_sos_to_tf_inverts() {
    let tf = TransferFunction::from_real(&[0.1, 0.1, 0.2, 0.1, 0.1], &[1.0, -1.9, 1.6, -0.65, 0.1]);
    let back = sos_to_tf(&tf.to_sos().unwrap());
    for (x, y) in back.a.iter().zip(tf.a.iter()) {
        assert!((x - y).norm() < 1e-9);
    }
    for (x, y) in back.b.iter().zip(tf.b.iter()) {
        assert!((x - y).norm() < 1e-9);
    }
}

#[test]
fn test_fitted_filter_decomposes() {
    let truth = TransferFunction::from_real(&[0.02, 0.05, 0.07, 0.05, 0.02], &[1.0, -1.9, 1.6, -0.65, 0.1]);
    let omega = FrequencyGrid::normalized(256);
    let samples = FrequencySamples::new(&omega, truth.response(&omega).as_slice().unwrap(), None).unwrap();

    let fitted = InvFreqz::refined().fit(&samples, 4, 4).unwrap();
    assert_cascade_matches(&fitted);
}

#[test]
fn test_complex_filter_rejected() {
    let tf = TransferFunction::new(
        ndarray::arr1(&[num_complex::Complex64::new(1.0, 0.5)]),
        ndarray::arr1(&[num_complex::Complex64::new(1.0, 0.0)]),
    );
    assert_eq!(tf.to_sos().unwrap_err(), FitError::ComplexCoefficients);
}

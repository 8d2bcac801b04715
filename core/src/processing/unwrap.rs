use ndarray::{Array2, ArrayView2};
use std::f64::consts::{PI, TAU};

use crate::prelude::PhaseStage;

/// Removes ±2π jumps between neighbouring subcarriers within each time row.
///
/// Differences of exactly ±π are left alone (strict comparisons). A single
/// frequency bin is returned unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseUnwrapper;

impl PhaseUnwrapper {
    pub fn new() -> Self {
        Self
    }
}

/// Brings a neighbour difference into [-π, π] by whole turns.
///
/// For |delta| <= 3π this is exactly one 2π correction.
fn wrap_step(delta: f64) -> f64 {
    if delta > PI {
        delta - ((delta - PI) / TAU).ceil() * TAU
    } else if delta < -PI {
        delta + ((-PI - delta) / TAU).ceil() * TAU
    } else {
        delta
    }
}

impl PhaseStage for PhaseUnwrapper {
    fn name(&self) -> &'static str {
        "unwrap"
    }

    fn apply(&self, phase: ArrayView2<f64>) -> Array2<f64> {
        let mut unwrapped = phase.to_owned();
        for mut row in unwrapped.rows_mut() {
            for f in 1..row.len() {
                let current = row[f - 1];
                let delta = row[f] - current;
                row[f] = current + wrap_step(delta);
            }
        }
        unwrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn assert_bounded(matrix: &Array2<f64>) {
        for row in matrix.rows() {
            for f in 1..row.len() {
                assert!((row[f] - row[f - 1]).abs() <= PI + 1e-9);
            }
        }
    }

    #[test]
    fn jump_beyond_pi_is_corrected_by_one_turn() {
        let input = array![[3.0, -3.0, 3.0]];
        let output = PhaseUnwrapper.apply(input.view());
        assert!((output[[0, 1]] - (-3.0 + TAU)).abs() < 1e-12);
        assert!((output[[0, 2]] - 3.0).abs() < 1e-12);
        assert_bounded(&output);
    }

    #[test]
    fn steady_drift_accumulates_past_pi() {
        // phase advancing 2.5 rad per bin, wrapped into (-pi, pi]
        let raw: Vec<f64> = (0..12)
            .map(|f| {
                let value = 2.5 * f as f64;
                (value + PI).rem_euclid(TAU) - PI
            })
            .collect();
        let input = Array2::from_shape_vec((1, 12), raw).unwrap();
        let output = PhaseUnwrapper.apply(input.view());
        for f in 0..12 {
            assert!((output[[0, f]] - 2.5 * f as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn exact_pi_difference_is_left_alone() {
        let input = array![[0.0, PI, 0.0]];
        let output = PhaseUnwrapper.apply(input.view());
        assert_eq!(output, input);
    }

    #[test]
    fn rows_are_independent() {
        let input = array![[0.0, 3.0, -3.0], [1.0, 1.1, 1.2]];
        let output = PhaseUnwrapper.apply(input.view());
        assert_eq!(output.row(1), input.row(1));
        assert_bounded(&output);
    }

    #[test]
    fn single_frequency_is_unchanged() {
        let input = array![[2.0], [-1.0], [0.5]];
        assert_eq!(PhaseUnwrapper.apply(input.view()), input);
    }

    #[test]
    fn step_beyond_three_pi_takes_two_turns() {
        // unwrapped row climbs 0, 2.5, 5.0, 7.5; the raw -3.0 then sits 10.5 rad
        // below the running value, past one turn of correction
        let input = array![[0.0, 2.5, 5.0 - TAU, 7.5 - TAU, -3.0]];
        let output = PhaseUnwrapper.apply(input.view());
        assert!((output[[0, 3]] - 7.5).abs() < 1e-12);
        assert!((output[[0, 4]] - (-3.0 + 2.0 * TAU)).abs() < 1e-12);
        assert!(((-3.0 + TAU) - output[[0, 3]]).abs() > PI);
        assert_bounded(&output);
    }

    #[test]
    fn non_finite_values_do_not_panic() {
        let input = array![[0.0, f64::NAN, 1.0, f64::INFINITY, 0.5]];
        let output = PhaseUnwrapper.apply(input.view());
        assert_eq!(output.dim(), (1, 5));
        assert!(output[[0, 1]].is_nan());
    }

    #[test]
    fn input_view_is_not_mutated() {
        let input = array![[3.0, -3.0]];
        let _ = PhaseUnwrapper.apply(input.view());
        assert_eq!(input, array![[3.0, -3.0]]);
    }
}

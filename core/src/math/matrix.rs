use ndarray::{Array2, ArrayView2, Axis};

use crate::math::boundary::Boundary;
use crate::math::stats::StatsHelper;

pub struct MatrixHelper;

impl MatrixHelper {
    /// 1-D median filter of odd width `kernel` along `axis`, edges replicated.
    pub fn median_along(input: ArrayView2<f64>, axis: Axis, kernel: usize) -> Array2<f64> {
        let half = (kernel / 2) as isize;
        let len = input.len_of(axis);
        let mut output = Array2::zeros(input.raw_dim());
        let mut window = vec![0.0; kernel];

        for ((row, col), out) in output.indexed_iter_mut() {
            let center = (if axis == Axis(0) { row } else { col }) as isize;
            for (slot, offset) in window.iter_mut().zip(-half..=half) {
                let pos = Boundary::Replicate.resolve(center + offset, len);
                *slot = if axis == Axis(0) {
                    input[[pos, col]]
                } else {
                    input[[row, pos]]
                };
            }
            *out = StatsHelper::median_odd(&mut window);
        }
        output
    }

    /// `kernel x kernel` box average ("same" output size), symmetric boundaries.
    pub fn uniform_filter(input: ArrayView2<f64>, kernel: usize) -> Array2<f64> {
        let half = (kernel / 2) as isize;
        let (rows, cols) = input.dim();
        let weight = 1.0 / (kernel * kernel) as f64;
        let mut output = Array2::zeros(input.raw_dim());

        for ((row, col), out) in output.indexed_iter_mut() {
            let mut acc = 0.0;
            for dr in -half..=half {
                let r = Boundary::Symmetric.resolve(row as isize + dr, rows);
                for dc in -half..=half {
                    let c = Boundary::Symmetric.resolve(col as isize + dc, cols);
                    acc += input[[r, c]];
                }
            }
            *out = acc * weight;
        }
        output
    }
}

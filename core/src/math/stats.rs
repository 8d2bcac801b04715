pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    /// Median of an odd-length window. Reorders `window` in place.
    ///
    /// NaN sorts after every number (`total_cmp`), so it never panics.
    pub fn median_odd(window: &mut [f64]) -> f64 {
        if window.is_empty() {
            return f64::NAN;
        }
        let mid = window.len() / 2;
        let (_, median, _) = window.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
        *median
    }

    /// Largest absolute step between neighbouring values.
    pub fn max_abs_step(samples: &[f64]) -> f64 {
        samples
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).abs())
            .fold(0.0, f64::max)
    }

    pub fn spread(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let (min, max) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        max - min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(StatsHelper::mean(&[]), 0.0);
        assert_eq!(StatsHelper::mean(&[1.0, 2.0, 6.0]), 3.0);
    }

    #[test]
    fn median_picks_middle_value() {
        assert_eq!(StatsHelper::median_odd(&mut [9.0, -1.0, 4.0]), 4.0);
        assert_eq!(StatsHelper::median_odd(&mut [7.0]), 7.0);
    }

    #[test]
    fn median_tolerates_nan() {
        let median = StatsHelper::median_odd(&mut [f64::NAN, 1.0, 2.0]);
        assert!(median == 1.0 || median == 2.0);
    }

    #[test]
    fn step_and_spread() {
        let row = [0.0, 1.5, 1.0, -2.0];
        assert_eq!(StatsHelper::max_abs_step(&row), 3.0);
        assert_eq!(StatsHelper::spread(&row), 3.5);
    }
}

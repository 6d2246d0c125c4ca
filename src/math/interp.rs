//! Linear interpolation helpers.
//!
//! Two operations are needed by the pipeline:
//! - filling NaN gaps inside a series (`fill_gaps`)
//! - resampling a short series onto more evenly spaced positions
//!   (`resample_linear`), e.g. quarterly/annual points onto a monthly grid.

/// `n` evenly spaced points over `[start, end]`, endpoints included exactly.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n as f64 - 1.0);
            let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            out[n - 1] = end;
            out
        }
    }
}

/// Linearly interpolate `values` (at positions `0..n`) onto `target` evenly
/// spaced positions spanning `[0, n - 1]`.
///
/// The first and last input values are preserved exactly. A single-point
/// input yields `target` copies of that point.
pub fn resample_linear(values: &[f64], target: usize) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let last = (values.len() - 1) as f64;
    linspace(0.0, last, target)
        .into_iter()
        .map(|x| value_at(values, x))
        .collect()
}

fn value_at(values: &[f64], x: f64) -> f64 {
    let n = values.len();
    if x <= 0.0 {
        return values[0];
    }
    let lo = x.floor() as usize;
    if lo >= n - 1 {
        return values[n - 1];
    }
    let frac = x - lo as f64;
    values[lo] + (values[lo + 1] - values[lo]) * frac
}

/// Replace NaN entries by linear interpolation between their nearest valid
/// neighbours.
///
/// Leading gaps take the first valid value and trailing gaps the last one.
/// An all-NaN input is returned unchanged.
pub fn fill_gaps(values: &[f64]) -> Vec<f64> {
    let valid: Vec<usize> = (0..values.len()).filter(|&i| !values[i].is_nan()).collect();
    let (Some(&first), Some(&last)) = (valid.first(), valid.last()) else {
        return values.to_vec();
    };

    let mut out = values.to_vec();
    out[..first].fill(values[first]);
    out[last + 1..].fill(values[last]);

    for pair in valid.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if b - a < 2 {
            continue;
        }
        let span = (b - a) as f64;
        for i in a + 1..b {
            let frac = (i - a) as f64 / span;
            out[i] = values[a] + (values[b] - values[a]) * frac;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linspace_includes_endpoints() {
        let v = linspace(0.0, 7.0, 24);
        assert_eq!(v.len(), 24);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[23], 7.0);
        assert!(linspace(1.0, 2.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    }

    #[test]
    fn resample_eight_points_to_two_years_monthly() {
        let raw = [1.0, 3.0, 2.0, 6.0, 6.0, 4.0, 8.0, 10.0];
        let out = resample_linear(&raw, 24);

        assert_eq!(out.len(), 24);
        assert_eq!(out[0], raw[0]);
        assert_eq!(out[23], raw[7]);

        // Each output lies on the segment between its two neighbouring raw points.
        let xs = linspace(0.0, 7.0, 24);
        for (x, y) in xs.iter().zip(&out) {
            let lo = x.floor() as usize;
            let hi = (lo + 1).min(7);
            let (a, b) = (raw[lo], raw[hi]);
            assert!(*y >= a.min(b) - 1e-12 && *y <= a.max(b) + 1e-12);
            assert_relative_eq!(*y, a + (b - a) * (x - lo as f64), epsilon = 1e-12);
        }
    }

    #[test]
    fn resample_single_point_repeats() {
        assert_eq!(resample_linear(&[4.2], 3), vec![4.2, 4.2, 4.2]);
        assert!(resample_linear(&[], 3).is_empty());
    }

    #[test]
    fn fill_gaps_interpolates_interior_and_holds_edges() {
        let nan = f64::NAN;
        let out = fill_gaps(&[nan, 1.0, nan, nan, 4.0, nan]);
        assert_eq!(out, vec![1.0, 1.0, 2.0, 3.0, 4.0, 4.0]);
    }

    #[test]
    fn fill_gaps_leaves_all_nan_alone() {
        let out = fill_gaps(&[f64::NAN, f64::NAN]);
        assert!(out.iter().all(|v| v.is_nan()));
    }
}

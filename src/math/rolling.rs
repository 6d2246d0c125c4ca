//! Trailing window statistics.

/// Trailing rolling mean.
///
/// Position `i` averages the non-NaN values in `values[i + 1 - window ..= i]`
/// (clipped at the start). Positions with fewer than `min_periods` valid
/// values are NaN, so `min_periods = 1` never yields NaN once the first valid
/// value has been seen.
pub fn trailing_mean(values: &[f64], window: usize, min_periods: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    let mut count = 0usize;

    for (i, &v) in values.iter().enumerate() {
        if !v.is_nan() {
            sum += v;
            count += 1;
        }
        if i >= window {
            let dropped = values[i - window];
            if !dropped.is_nan() {
                sum -= dropped;
                count -= 1;
            }
        }

        if count >= min_periods.max(1) {
            out.push(sum / count as f64);
        } else {
            out.push(f64::NAN);
        }
    }

    out
}

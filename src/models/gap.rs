//! Output gap derivation from GDP and potential GDP.
//!
//! Both inputs go through the same resampling chain before the gap is taken:
//! gap-fill -> trailing mean over native observations -> optional upsampling
//! to the monthly horizon.

use log::warn;

use crate::domain::{ObservationSeries, ZeroPotentialPolicy};
use crate::math::{fill_gaps, resample_linear, trailing_mean};

/// Resampling parameters shared by GDP and potential GDP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resampling {
    /// Upsample shorter series onto this many points.
    pub target_len: Option<usize>,
    pub window: usize,
}

/// Derived output gap plus the number of zero-potential positions hit.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputGap {
    pub series: ObservationSeries,
    pub zero_potential_positions: usize,
}

/// Gap-fill, smooth with a trailing mean (min periods 1) at native
/// frequency, then optionally upsample onto the monthly horizon.
pub fn resample_and_smooth(values: &[f64], resampling: Resampling) -> Vec<f64> {
    let filled = fill_gaps(values);
    let smoothed = trailing_mean(&filled, resampling.window, 1);
    match resampling.target_len {
        Some(target) if smoothed.len() < target => resample_linear(&smoothed, target),
        _ => smoothed,
    }
}

/// Percentage gap at one position, or `None` when potential GDP is zero.
pub fn gap_percent(gdp: f64, potential: f64) -> Option<f64> {
    if potential == 0.0 {
        None
    } else {
        Some((gdp - potential) / potential * 100.0)
    }
}

/// `(gdp - potential) / potential * 100` over the overlapping positions.
pub fn output_gap(gdp: &[f64], potential: &[f64], policy: ZeroPotentialPolicy) -> OutputGap {
    let mut zero_potential_positions = 0;
    let series = gdp
        .iter()
        .zip(potential)
        .map(|(&g, &p)| match gap_percent(g, p) {
            Some(gap) => gap,
            None => {
                zero_potential_positions += 1;
                match policy {
                    ZeroPotentialPolicy::Nan => f64::NAN,
                    ZeroPotentialPolicy::Zero => 0.0,
                }
            }
        })
        .collect();

    if zero_potential_positions > 0 {
        warn!(
            "Potential GDP is zero at {zero_potential_positions} position(s); output gap set to {}.",
            match policy {
                ZeroPotentialPolicy::Nan => "NaN",
                ZeroPotentialPolicy::Zero => "0",
            }
        );
    }

    OutputGap {
        series,
        zero_potential_positions,
    }
}

/// Full derivation: resample both inputs, then take the gap.
pub fn derive_output_gap(
    gdp: &ObservationSeries,
    potential: &ObservationSeries,
    resampling: Resampling,
    policy: ZeroPotentialPolicy,
) -> OutputGap {
    let gdp_smooth = resample_and_smooth(gdp.values(), resampling);
    let potential_smooth = resample_and_smooth(potential.values(), resampling);
    output_gap(&gdp_smooth, &potential_smooth, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const NATIVE: Resampling = Resampling {
        target_len: None,
        window: 12,
    };

    #[test]
    fn gap_sign_follows_gdp_relative_to_potential() {
        assert!(gap_percent(103.0, 100.0).unwrap() > 0.0);
        assert!(gap_percent(97.0, 100.0).unwrap() < 0.0);
        assert_eq!(gap_percent(100.0, 100.0), Some(0.0));
        assert_relative_eq!(gap_percent(100.0, 102.0).unwrap(), -1.9607843137254901, epsilon = 1e-12);
    }

    #[test]
    fn equal_inputs_give_exact_zero_gap() {
        let gdp = ObservationSeries::new(vec![100.0, 101.5, 99.0, 104.0]);
        let gap = derive_output_gap(&gdp, &gdp, NATIVE, ZeroPotentialPolicy::Nan);
        assert!(gap.series.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zero_potential_follows_policy() {
        let gdp = [1.0, 2.0];
        let potential = [0.0, 1.0];

        let nan = output_gap(&gdp, &potential, ZeroPotentialPolicy::Nan);
        assert!(nan.series.values()[0].is_nan());
        assert_eq!(nan.series.values()[1], 100.0);
        assert_eq!(nan.zero_potential_positions, 1);

        let zero = output_gap(&gdp, &potential, ZeroPotentialPolicy::Zero);
        assert_eq!(zero.series.values(), &[0.0, 100.0]);
    }

    #[test]
    fn smoothing_uses_trailing_mean_with_min_periods_one() {
        let raw: Vec<f64> = (0..16).map(|v| 100.0 + v as f64).collect();
        let smooth = resample_and_smooth(&raw, NATIVE);
        assert_eq!(smooth.len(), 16);
        assert_eq!(smooth[0], 100.0);
        assert_relative_eq!(smooth[11], raw[..12].iter().sum::<f64>() / 12.0);
    }

    #[test]
    fn upsampling_reaches_target_len() {
        let raw = [100.0, 104.0, 108.0, 112.0];
        let resampling = Resampling {
            target_len: Some(48),
            window: 12,
        };
        let smooth = resample_and_smooth(&raw, resampling);
        assert_eq!(smooth.len(), 48);
        assert_eq!(smooth[0], 100.0);
    }

    #[test]
    fn window_spans_native_observations_when_upsampling() {
        let raw: Vec<f64> = (0..16).map(|v| v as f64).collect();
        let resampling = Resampling {
            target_len: Some(48),
            window: 12,
        };
        let smooth = resample_and_smooth(&raw, resampling);
        assert_eq!(smooth.len(), 48);
        // Mean of the last twelve quarters (4..=15).
        assert_relative_eq!(smooth[47], 9.5);
        assert_relative_eq!(smooth[0], 0.0);
    }

    #[test]
    fn gaps_are_filled_before_smoothing() {
        let raw = [100.0, f64::NAN, 104.0];
        let smooth = resample_and_smooth(&raw, NATIVE);
        assert_eq!(smooth, vec![100.0, 101.0, 102.0]);
    }
}

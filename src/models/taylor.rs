//! Taylor-type policy rule.
//!
//! ```text
//! rate = r* + 1.5 * (π - π*) + 0.5 * gap
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{ObservationSeries, SimulationConfig};

pub const INFLATION_WEIGHT: f64 = 1.5;
pub const OUTPUT_GAP_WEIGHT: f64 = 0.5;

/// Policy rate implied by the rule with the standard weights.
///
/// NaN inputs propagate.
pub fn calculate_interest_rate(
    equilibrium_rate: f64,
    inflation: f64,
    target_inflation: f64,
    output_gap: f64,
) -> f64 {
    equilibrium_rate + INFLATION_WEIGHT * (inflation - target_inflation) + OUTPUT_GAP_WEIGHT * output_gap
}

/// Rule parameters for element-wise evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaylorRule {
    pub equilibrium_rate: f64,
    pub target_inflation: f64,
    pub inflation_weight: f64,
    pub output_gap_weight: f64,
}

impl TaylorRule {
    pub fn new(equilibrium_rate: f64, target_inflation: f64) -> Self {
        Self {
            equilibrium_rate,
            target_inflation,
            inflation_weight: INFLATION_WEIGHT,
            output_gap_weight: OUTPUT_GAP_WEIGHT,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            equilibrium_rate: config.equilibrium_rate,
            target_inflation: config.target_inflation,
            inflation_weight: config.inflation_weight,
            output_gap_weight: config.output_gap_weight,
        }
    }

    pub fn rate(&self, inflation: f64, output_gap: f64) -> f64 {
        self.equilibrium_rate
            + self.inflation_weight * (inflation - self.target_inflation)
            + self.output_gap_weight * output_gap
    }

    /// Apply the rule position by position; the result is as long as the
    /// shorter input.
    pub fn apply(&self, inflation: &ObservationSeries, output_gap: &ObservationSeries) -> ObservationSeries {
        inflation
            .iter()
            .zip(output_gap.iter())
            .map(|(&i, &g)| self.rate(i, g))
            .collect()
    }
}

impl Default for TaylorRule {
    fn default() -> Self {
        Self::new(1.0, 2.0)
    }
}

//! Terminal formatting of a simulation run.

use chrono::NaiveDate;

use crate::domain::{ObservationSeries, SimulationConfig, SimulationOutput};
use crate::plot::monthly_axis;

/// Format the full run summary (inputs + rule + per-series statistics).
pub fn format_run_summary(output: &SimulationOutput, config: &SimulationConfig) -> String {
    let mut out = String::new();

    out.push_str("=== taylor - ECB policy-rate simulation ===\n");
    out.push_str(&format!(
        "Rule: r = {:.2} + {:.2} * (inflation - {:.2}) + {:.2} * gap\n",
        config.equilibrium_rate, config.inflation_weight, config.target_inflation, config.output_gap_weight,
    ));
    out.push_str(&format!(
        "Horizon: {} years | GDP: {} | length policy: {:?} | zero potential: {:?}\n",
        config.years,
        if config.upsample_gdp { "monthly" } else { "native" },
        config.length_policy,
        config.zero_potential,
    ));

    out.push_str("\nInputs:\n");
    let specs = [
        &config.catalog.inflation,
        &config.catalog.gdp,
        &config.catalog.potential_gdp,
        &config.catalog.policy_rate,
    ];
    for ((name, status), spec) in output.provenance.entries().iter().zip(specs) {
        out.push_str(&format!(
            "  {name:<14} {:<48} {}..{}  {}\n",
            spec.identifier(),
            spec.start_period,
            spec.end_period,
            status.label(),
        ));
    }
    if config.catalog.gdp_series_shared() {
        out.push_str("  warning: GDP and potential GDP share one series; the output gap is not informative.\n");
    }
    if output.zero_potential_positions > 0 {
        out.push_str(&format!(
            "  warning: potential GDP was zero at {} position(s).\n",
            output.zero_potential_positions
        ));
    }

    out.push_str(&format!("\n{}\n", period_line(output.len(), config.epoch)));
    out.push_str(&format!(
        "{:<24} {:>9} {:>9} {:>9} {:>9}\n",
        "series", "first", "last", "min", "max"
    ));
    out.push_str(&format!("{}\n", "-".repeat(64)));
    let rows: [(&str, &ObservationSeries); 4] = [
        ("Simulated rate (%)", &output.rates),
        ("ECB rate (%)", &output.policy_rate),
        ("Inflation (%)", &output.inflation),
        ("Output gap (%)", &output.output_gap),
    ];
    for (label, series) in rows {
        out.push_str(&format_series_row(label, series));
    }

    out
}

fn period_line(len: usize, epoch: NaiveDate) -> String {
    let axis = monthly_axis(epoch, len);
    match (axis.first(), axis.last()) {
        (Some(first), Some(last)) => format!(
            "Observations: {len} ({} .. {})",
            first.format("%Y-%m"),
            last.format("%Y-%m")
        ),
        _ => "Observations: 0".to_string(),
    }
}

fn format_series_row(label: &str, series: &ObservationSeries) -> String {
    let (min, max) = series.finite_range().unwrap_or((f64::NAN, f64::NAN));
    format!(
        "{label:<24} {:>9} {:>9} {:>9} {:>9}\n",
        fmt_value(series.first()),
        fmt_value(series.last()),
        fmt_value(Some(min)),
        fmt_value(Some(max)),
    )
}

fn fmt_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FetchFailure, InputProvenance, InputStatus};

    fn output() -> SimulationOutput {
        SimulationOutput {
            rates: ObservationSeries::new(vec![1.75, 2.0]),
            inflation: ObservationSeries::new(vec![2.5, 2.5]),
            output_gap: ObservationSeries::new(vec![0.0, f64::NAN]),
            policy_rate: ObservationSeries::new(vec![2.0, 2.0]),
            provenance: InputProvenance {
                inflation: InputStatus::Fetched,
                gdp: InputStatus::Defaulted(FetchFailure::Status(503)),
                potential_gdp: InputStatus::Fetched,
                policy_rate: InputStatus::Fetched,
            },
            zero_potential_positions: 1,
        }
    }

    #[test]
    fn summary_reports_provenance_and_stats() {
        let txt = format_run_summary(&output(), &SimulationConfig::default());
        assert!(txt.contains("default (HTTP status 503)"));
        assert!(txt.contains("ICP/M.U2.N.000000.4.ANR"));
        assert!(txt.contains("Observations: 2 (2000-01 .. 2000-02)"));
        assert!(txt.contains("potential GDP was zero at 1 position(s)"));
        assert!(txt.contains("Simulated rate (%)            1.75      2.00      1.75      2.00"));
        assert!(txt.contains("Output gap (%)                0.00         -      0.00      0.00"));
    }

    #[test]
    fn empty_run_has_no_period() {
        assert_eq!(period_line(0, SimulationConfig::default().epoch), "Observations: 0");
    }
}

//! Shared simulation pipeline used by both the CLI and the dashboard.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch (x4) -> output gap -> length reconciliation -> policy rule
//!
//! The front-ends can then focus on presentation (printing, charts, widgets).

use log::{info, warn};

use crate::data::EcbClient;
use crate::domain::{
    FetchOutcome, InputProvenance, LengthPolicy, ObservationSeries, SimulationConfig, SimulationOutput,
};
use crate::error::AppError;
use crate::models::{Resampling, TaylorRule, derive_output_gap};

/// Raw outcomes of the four remote fetches.
#[derive(Debug, Clone)]
pub struct FetchedInputs {
    pub inflation: FetchOutcome,
    pub gdp: FetchOutcome,
    pub potential_gdp: FetchOutcome,
    pub policy_rate: FetchOutcome,
}

impl FetchedInputs {
    pub fn provenance(&self) -> InputProvenance {
        InputProvenance {
            inflation: self.inflation.status(),
            gdp: self.gdp.status(),
            potential_gdp: self.potential_gdp.status(),
            policy_rate: self.policy_rate.status(),
        }
    }
}

/// Run the full simulation against the configured (or environment) endpoint.
pub fn simulate(config: &SimulationConfig) -> Result<SimulationOutput, AppError> {
    let client = EcbClient::from_env(config.base_url.as_deref())?;
    simulate_with_client(&client, config)
}

/// Run the simulation with a pre-built client.
///
/// Fetch failures never surface here; the `Err` arm is reserved for invalid
/// configuration.
pub fn simulate_with_client(client: &EcbClient, config: &SimulationConfig) -> Result<SimulationOutput, AppError> {
    config.validate()?;
    if config.catalog.gdp_series_shared() {
        warn!(
            "GDP and potential GDP share series '{}'; the output gap will be zero wherever both fetches succeed.",
            config.catalog.gdp.identifier()
        );
    }

    let inputs = fetch_inputs(client, config);
    Ok(derive(inputs, config))
}

/// Issue the four independent fetches, concurrently unless disabled.
pub fn fetch_inputs(client: &EcbClient, config: &SimulationConfig) -> FetchedInputs {
    let catalog = &config.catalog;

    if !config.parallel {
        return FetchedInputs {
            inflation: client.fetch(&catalog.inflation, config.inflation_request()),
            gdp: client.fetch(&catalog.gdp, config.gdp_request()),
            potential_gdp: client.fetch(&catalog.potential_gdp, config.potential_gdp_request()),
            policy_rate: client.fetch(&catalog.policy_rate, config.policy_rate_request()),
        };
    }

    // Each closure owns a client handle (cheap clone of the shared pool).
    let (c1, c2, c3, c4) = (client.clone(), client.clone(), client.clone(), client.clone());
    let ((inflation, policy_rate), (gdp, potential_gdp)) = rayon::join(
        || {
            rayon::join(
                move || c1.fetch(&catalog.inflation, config.inflation_request()),
                move || c2.fetch(&catalog.policy_rate, config.policy_rate_request()),
            )
        },
        || {
            rayon::join(
                move || c3.fetch(&catalog.gdp, config.gdp_request()),
                move || c4.fetch(&catalog.potential_gdp, config.potential_gdp_request()),
            )
        },
    );

    FetchedInputs {
        inflation,
        gdp,
        potential_gdp,
        policy_rate,
    }
}

/// Turn fetched inputs into aligned output series.
pub fn derive(inputs: FetchedInputs, config: &SimulationConfig) -> SimulationOutput {
    let provenance = inputs.provenance();

    let resampling = Resampling {
        target_len: config.upsample_gdp.then(|| config.monthly_len()),
        window: config.rolling_window,
    };
    let gap = derive_output_gap(
        inputs.gdp.series(),
        inputs.potential_gdp.series(),
        resampling,
        config.zero_potential,
    );

    let [inflation, output_gap, policy_rate] = reconcile_lengths(
        [
            inputs.inflation.into_series(),
            gap.series,
            inputs.policy_rate.into_series(),
        ],
        config.length_policy,
    );

    let rates = TaylorRule::from_config(config).apply(&inflation, &output_gap);
    info!("Simulated {} policy-rate observations.", rates.len());

    SimulationOutput {
        rates,
        inflation,
        output_gap,
        policy_rate,
        provenance,
        zero_potential_positions: gap.zero_potential_positions,
    }
}

/// Bring every series to a common length according to `policy`.
pub fn reconcile_lengths<const N: usize>(
    series: [ObservationSeries; N],
    policy: LengthPolicy,
) -> [ObservationSeries; N] {
    let lengths = series.iter().map(ObservationSeries::len);
    let target = match policy {
        LengthPolicy::Truncate => lengths.min(),
        LengthPolicy::PadLast => lengths.max(),
    }
    .unwrap_or(0);

    if series.iter().any(|s| s.len() != target) {
        info!("Reconciling series lengths to {target} ({policy:?}).");
    }
    series.map(|s| if s.len() == target { s } else { s.resized(target) })
}

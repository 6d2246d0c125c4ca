//! Economic models: the policy rule and the output gap.

pub mod gap;
pub mod taylor;

pub use gap::{OutputGap, Resampling, derive_output_gap, gap_percent, output_gap, resample_and_smooth};
pub use taylor::{TaylorRule, calculate_interest_rate};

use crate::config::CostConfig;
use crate::models::{CallCounts, CostEstimate};
use std::collections::BTreeMap;

pub const HIBP: &str = "hibp";
pub const HUNTER: &str = "hunter";
pub const INTELX: &str = "intelx";

/// Round a monetary amount to 4 decimal places, halves away from zero.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Price a set of provider calls against the configured rates and budget.
///
/// The remaining budget is not clamped: a negative value means overrun.
pub fn estimate(counts: &CallCounts, costs: &CostConfig) -> CostEstimate {
    let lines = [
        (HIBP, counts.hibp_calls, costs.hibp_cost_per_call),
        (HUNTER, counts.hunter_calls, costs.hunter_cost_per_call),
        (INTELX, counts.intelx_calls, costs.intelx_cost_per_call),
    ];

    let mut call_counts = BTreeMap::new();
    let mut cost_breakdown = BTreeMap::new();
    for (provider, calls, rate) in lines {
        call_counts.insert(provider.to_string(), calls);
        cost_breakdown.insert(provider.to_string(), round4(calls as f64 * rate));
    }

    let estimated_total = round4(cost_breakdown.values().sum());

    CostEstimate {
        call_counts,
        cost_breakdown,
        estimated_total,
        monthly_budget: costs.monthly_budget_usd,
        budget_remaining: round4(costs.monthly_budget_usd - estimated_total),
    }
}

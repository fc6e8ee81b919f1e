use serde::Serialize;
use utoipa::ToSchema;

/// A resale tier offered to customers. Read-only reference data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResellerPlan {
    #[schema(value_type = String)]
    pub id: &'static str,
    #[schema(value_type = String)]
    pub name: &'static str,
    pub price_usd: f64,
    #[schema(value_type = String)]
    pub features: &'static str,
    /// Provider-backed scans included per month.
    pub monthly_call_limit: u32,
}

pub static RESELLER_PLANS: [ResellerPlan; 4] = [
    ResellerPlan {
        id: "free",
        name: "Free",
        price_usd: 0.0,
        features: "Self-service audit checklist and one email exposure scan per month",
        monthly_call_limit: 5,
    },
    ResellerPlan {
        id: "starter",
        name: "Starter",
        price_usd: 29.0,
        features: "Breach monitoring for up to 5 emails, domain signals and DNS checks",
        monthly_call_limit: 250,
    },
    ResellerPlan {
        id: "pro",
        name: "Pro",
        price_usd: 99.0,
        features: "Team monitoring, monthly risk reports and priority support",
        monthly_call_limit: 1500,
    },
    ResellerPlan {
        id: "doneForYou",
        name: "Done For You",
        price_usd: 499.0,
        features: "Full FK94 security audit performed by an analyst, with remediation follow-up",
        monthly_call_limit: 5000,
    },
];

/// Look up a plan by its identifier.
pub fn find_plan(id: &str) -> Option<&'static ResellerPlan> {
    RESELLER_PLANS.iter().find(|plan| plan.id == id)
}

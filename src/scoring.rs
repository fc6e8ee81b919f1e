//! Risk scoring over normalized provider results.
//!
//! The score is additive and bounded: each signal only ever adds points, so the
//! result is monotonic in every input and the tier cutoffs stay comparable
//! across requests.

use crate::config::ScoringWeights;
use crate::models::{BreachLookup, DomainLookup, ProviderOutcome, RiskAssessment, RiskTier};

pub const MAX_SCORE: u32 = 100;

pub const HIGH_RISK_RECOMMENDATION: &str = "High exposure detected. Change the passwords of every breached account now, enable two-factor authentication everywhere and book a full FK94 security audit.";
pub const MEDIUM_RISK_RECOMMENDATION: &str = "Moderate exposure. Review the breached accounts, enable two-factor authentication on email and banking, and consider a guided FK94 audit.";
pub const LOW_RISK_RECOMMENDATION: &str = "Low exposure. Keep monitoring your accounts and work through the self-service audit checklist.";

#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    weights: ScoringWeights,
}

impl RiskScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Combine both provider results into a bounded score and tier.
    ///
    /// Disabled and failed providers contribute nothing.
    pub fn score(&self, breach: &BreachLookup, domain: &DomainLookup) -> RiskAssessment {
        let mut total = 0u32;

        if breach.succeeded() {
            total = total.saturating_add(self.breach_contribution(breach.breach_count()));
        }

        if domain.succeeded() {
            if domain.is_webmail() {
                total = total.saturating_add(self.weights.webmail_points);
            }
            if domain.is_disposable() {
                total = total.saturating_add(self.weights.disposable_points);
            }
            if domain.has_public_contacts() {
                total = total.saturating_add(self.weights.public_contact_points);
            }
        }

        let score = total.min(MAX_SCORE);
        let tier = self.tier_for(score);

        RiskAssessment {
            score,
            tier,
            recommendation: recommendation_for(tier).to_string(),
        }
    }

    /// Points from breaches, capped so breaches alone cannot fill the scale.
    pub fn breach_contribution(&self, breach_count: u64) -> u32 {
        let points = breach_count.saturating_mul(u64::from(self.weights.breach_points));
        points.min(u64::from(self.weights.breach_cap)) as u32
    }

    /// Lower bounds are inclusive: a score equal to a threshold lands in the higher tier.
    pub fn tier_for(&self, score: u32) -> RiskTier {
        if score >= self.weights.high_threshold {
            RiskTier::High
        } else if score >= self.weights.medium_threshold {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

pub fn recommendation_for(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::High => HIGH_RISK_RECOMMENDATION,
        RiskTier::Medium => MEDIUM_RISK_RECOMMENDATION,
        RiskTier::Low => LOW_RISK_RECOMMENDATION,
    }
}

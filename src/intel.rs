//! Shared email intelligence logic for the scan handlers
//!
//! The aggregate pipeline:
//! 1. Normalize and validate the email
//! 2. Query HIBP and Hunter concurrently
//! 3. Score the combined results
//! 4. Price the provider calls that were made
use crate::config::{CostConfig, ScoringWeights};
use crate::cost;
use crate::models::*;
use crate::scoring::RiskScorer;
use crate::services::{HibpService, HunterService};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

pub const INVALID_EMAIL: &str = "Valid email required";

// RFC 5322 simplified, lower-case only since input is normalized first.
// Requires a dotted domain.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$",
    )
    .expect("email regex is valid")
});

/// Validate email address
///
/// Expects an already trimmed, lower-cased value.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 5 || email.len() > 254 {
        return false;
    }

    if !EMAIL_REGEX.is_match(email) {
        tracing::warn!("❌ Invalid email format: {}", email);
        return false;
    }

    true
}

/// Trim and lower-case an email, returning it only if well-formed.
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    is_valid_email(&email).then_some(email)
}

/// Substring after the first `@`.
pub fn email_domain(email: &str) -> Option<&str> {
    email
        .split_once('@')
        .map(|(_, domain)| domain)
        .filter(|domain| !domain.is_empty())
}

/// Calls billed for one aggregate scan: one per provider that was queried.
pub fn billed_calls(breach: &BreachLookup, domain: &DomainLookup) -> CallCounts {
    CallCounts {
        hibp_calls: u64::from(breach.enabled()),
        hunter_calls: u64::from(domain.enabled()),
        intelx_calls: 0,
    }
}

/// Assemble the report from provider results and the calls made to get them. No I/O.
pub fn build_report(
    email: String,
    domain: String,
    breach: BreachLookup,
    domain_signals: DomainLookup,
    calls: &CallCounts,
    weights: &ScoringWeights,
    costs: &CostConfig,
) -> IntelReport {
    let risk = RiskScorer::new(weights.clone()).score(&breach, &domain_signals);
    let estimate = cost::estimate(calls, costs);

    IntelReport {
        email,
        domain,
        providers: ProviderResults {
            breach,
            domain_signals,
        },
        risk_score: risk.score,
        tier: risk.tier,
        recommendation: risk.recommendation,
        estimated_provider_cost_usd: estimate.estimated_total,
        cost_estimate: estimate,
        scanned_at: Utc::now().to_rfc3339(),
    }
}

/// Run both provider lookups concurrently and build the aggregate report.
///
/// `email` must come from [`normalize_email`]. Provider failures are embedded in
/// the report and never abort the scan.
pub async fn scan_email(
    hibp: &HibpService,
    hunter: &HunterService,
    email: String,
    weights: &ScoringWeights,
    costs: &CostConfig,
) -> IntelReport {
    let domain = email_domain(&email).unwrap_or_default().to_string();

    let (breach, domain_signals) = tokio::join!(hibp.lookup(&email), hunter.lookup(&domain));

    let calls = billed_calls(&breach, &domain_signals);
    let report = build_report(email, domain, breach, domain_signals, &calls, weights, costs);

    tracing::info!(
        "✅ Scan complete for {}: score {} ({:?}), cost ${:.4}",
        report.email,
        report.risk_score,
        report.tier,
        report.estimated_provider_cost_usd
    );

    report
}

/// Fixed example used by the demo endpoint, scored like a real scan.
///
/// No provider is queried, so nothing is billed.
pub fn demo_report(weights: &ScoringWeights, costs: &CostConfig) -> IntelReport {
    let breach = BreachLookup::found(vec![
        Breach {
            name: "LinkedIn".to_string(),
            title: "LinkedIn".to_string(),
            date: "2012-05-05".to_string(),
            description: Some("164 million accounts compromised".to_string()),
            pwn_count: 164_611_595,
            data_classes: vec!["Email addresses".to_string(), "Passwords".to_string()],
            verified: true,
        },
        Breach {
            name: "Adobe".to_string(),
            title: "Adobe".to_string(),
            date: "2013-10-04".to_string(),
            description: Some("153 million accounts compromised".to_string()),
            pwn_count: 152_445_165,
            data_classes: vec![
                "Email addresses".to_string(),
                "Password hints".to_string(),
                "Passwords".to_string(),
                "Usernames".to_string(),
            ],
            verified: true,
        },
    ]);
    let domain_signals = DomainLookup::found(DomainSignals {
        organization: Some("FK94 Security".to_string()),
        disposable: false,
        webmail: false,
        email_patterns: Some("{first}".to_string()),
        confidence: None,
        sample_emails: vec![],
    });

    build_report(
        "demo@fk94security.com".to_string(),
        "fk94security.com".to_string(),
        breach,
        domain_signals,
        &CallCounts::default(),
        weights,
        costs,
    )
}

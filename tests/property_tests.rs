/// Property-based tests using proptest
/// Tests invariants of scoring and cost estimation that should hold for all inputs
use fk94_intel_api::config::{CostConfig, ScoringWeights};
use fk94_intel_api::core::cost::{estimate, round4};
use fk94_intel_api::core::intel::normalize_email;
use fk94_intel_api::core::models::{
    Breach, BreachLookup, CallCounts, DomainLookup, DomainSignals, RiskTier, SampleEmail,
};
use fk94_intel_api::core::scoring::RiskScorer;
use proptest::prelude::*;

fn breach_lookup(count: usize) -> BreachLookup {
    BreachLookup::found(
        (0..count)
            .map(|i| Breach {
                name: format!("B{}", i),
                title: format!("B{}", i),
                date: "2020-01-01".to_string(),
                description: None,
                pwn_count: 1,
                data_classes: vec![],
                verified: false,
            })
            .collect(),
    )
}

fn domain_lookup(webmail: bool, disposable: bool, samples: usize) -> DomainLookup {
    DomainLookup::found(DomainSignals {
        webmail,
        disposable,
        sample_emails: (0..samples)
            .map(|i| SampleEmail {
                value: format!("c{}@example.com", i),
                confidence: None,
                kind: None,
            })
            .collect(),
        ..Default::default()
    })
}

fn arb_domain() -> impl Strategy<Value = DomainLookup> {
    prop_oneof![
        (any::<bool>(), any::<bool>(), 0usize..6)
            .prop_map(|(w, d, s)| domain_lookup(w, d, s)),
        Just(DomainLookup::disabled("credential missing")),
        Just(DomainLookup::failed("timeout")),
    ]
}

// Property: score is bounded and consistent with its tier
proptest! {
    #[test]
    fn score_is_bounded(breaches in 0usize..200, domain in arb_domain()) {
        let scorer = RiskScorer::default();
        let result = scorer.score(&breach_lookup(breaches), &domain);
        prop_assert!(result.score <= 100);
        let expected = if result.score >= 70 {
            RiskTier::High
        } else if result.score >= 35 {
            RiskTier::Medium
        } else {
            RiskTier::Low
        };
        prop_assert_eq!(result.tier, expected);
    }

    #[test]
    fn more_breaches_never_lower_the_score(
        breaches in 0usize..50,
        extra in 0usize..50,
        domain in arb_domain()
    ) {
        let scorer = RiskScorer::default();
        let fewer = scorer.score(&breach_lookup(breaches), &domain);
        let more = scorer.score(&breach_lookup(breaches + extra), &domain);
        prop_assert!(more.score >= fewer.score);
        prop_assert!(more.tier >= fewer.tier);
    }

    #[test]
    fn breach_contribution_caps_at_seventy(count in 5u64..u64::MAX) {
        let scorer = RiskScorer::new(ScoringWeights::default());
        prop_assert_eq!(scorer.breach_contribution(count), 70);
    }

    #[test]
    fn disabled_breach_provider_contributes_nothing(domain in arb_domain()) {
        let scorer = RiskScorer::default();
        let disabled = scorer.score(&BreachLookup::disabled("credential missing"), &domain);
        let empty = scorer.score(&breach_lookup(0), &domain);
        prop_assert_eq!(disabled.score, empty.score);
    }
}

// Property: cost estimation is additive and never clamps the budget
proptest! {
    #[test]
    fn estimate_is_additive(
        hibp in 0u64..10_000,
        hunter in 0u64..10_000,
        intelx in 0u64..10_000
    ) {
        let costs = CostConfig {
            monthly_budget_usd: 25.0,
            hibp_cost_per_call: 0.0035,
            hunter_cost_per_call: 0.0125,
            intelx_cost_per_call: 0.02,
        };
        let counts = CallCounts { hibp_calls: hibp, hunter_calls: hunter, intelx_calls: intelx };
        let result = estimate(&counts, &costs);

        let expected = round4(
            hibp as f64 * 0.0035 + hunter as f64 * 0.0125 + intelx as f64 * 0.02,
        );
        prop_assert!((result.estimated_total - expected).abs() < 1e-9);
        prop_assert!((result.budget_remaining - (25.0 - result.estimated_total)).abs() < 1e-9);
        if result.estimated_total > 25.0 {
            prop_assert!(result.budget_remaining < 0.0);
        }
        prop_assert!(result.cost_breakdown.values().all(|v| *v >= 0.0));
    }
}

// Property: email normalization never panics and is idempotent
proptest! {
    #[test]
    fn normalize_email_never_panics(email in "\\PC*") {
        let _ = normalize_email(&email);
    }

    #[test]
    fn normalized_emails_are_stable(
        local in "[a-zA-Z0-9._]{1,12}",
        domain in "[a-z]{1,10}",
        tld in "[a-z]{2,4}"
    ) {
        let raw = format!(" {}@{}.{} ", local, domain, tld);
        if let Some(normalized) = normalize_email(&raw) {
            prop_assert_eq!(normalize_email(&normalized), Some(normalized.clone()));
            prop_assert_eq!(normalized.clone(), normalized.to_lowercase());
        }
    }
}

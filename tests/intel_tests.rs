/// Unit tests for the aggregate scan pipeline
/// Tests email validation and the concurrent provider fan-out
use fk94_intel_api::intel::{email_domain, is_valid_email, normalize_email};

#[cfg(test)]
mod email_validation_tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("test.user@example.com"));
        assert!(is_valid_email("user+tag@example.co.uk"));
        assert!(is_valid_email("user_name@example-domain.com"));
        assert!(is_valid_email("a@b.co"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("userexample.com"));
        assert!(!is_valid_email("user@examplecom"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("user @example.com"));
        assert!(!is_valid_email("user@exam ple.com"));
        assert!(!is_valid_email("user@-example.com"));
    }

    #[test]
    fn test_validation_expects_normalized_input() {
        // Upper case is only accepted after normalization
        assert!(!is_valid_email("User@Example.com"));
        assert_eq!(
            normalize_email("User@Example.com").as_deref(),
            Some("user@example.com")
        );
    }

    #[test]
    fn test_domain_after_first_at() {
        assert_eq!(email_domain("user@example.com"), Some("example.com"));
        assert_eq!(email_domain("user"), None);
    }
}

#[cfg(test)]
mod pipeline_tests {
    use fk94_intel_api::config::{Config, CostConfig, ScoringWeights};
    use fk94_intel_api::intel::scan_email;
    use fk94_intel_api::models::RiskTier;
    use fk94_intel_api::services::{HibpService, HunterService};
    use std::time::{Duration, Instant};
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: String) -> Config {
        Config {
            hibp_api_key: Some("k".to_string()),
            hunter_api_key: Some("k".to_string()),
            hibp_base_url: base_url.clone(),
            hunter_base_url: base_url,
            provider_timeout_secs: 5,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_providers_are_queried_concurrently() {
        let server = MockServer::start().await;
        let breaches: Vec<_> = (0..6)
            .map(|i| {
                serde_json::json!({
                    "Name": format!("B{}", i),
                    "Title": format!("B{}", i),
                    "BreachDate": "2021-01-01"
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path_regex(r"^/breachedaccount/.+$"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(breaches)
                    .set_delay(Duration::from_millis(800)),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/domain-search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "data": {"webmail": true, "disposable": false, "emails": []}
                    }))
                    .set_delay(Duration::from_millis(800)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = config(server.uri());
        let hibp = HibpService::new(&config).unwrap();
        let hunter = HunterService::new(&config).unwrap();

        let started = Instant::now();
        let report = scan_email(
            &hibp,
            &hunter,
            "someone@gmail.com".to_string(),
            &ScoringWeights::default(),
            &CostConfig::default(),
        )
        .await;
        let elapsed = started.elapsed();

        // 6 breaches cap at 70, webmail adds 8
        assert_eq!(report.risk_score, 78);
        assert_eq!(report.tier, RiskTier::High);
        assert_eq!(report.domain, "gmail.com");
        assert!(
            elapsed < Duration::from_millis(1500),
            "lookups ran sequentially: {:?}",
            elapsed
        );
        server.verify().await;
    }

    #[tokio::test]
    async fn test_custom_weights_apply() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/breachedaccount/.+$"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/domain-search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"webmail": false, "disposable": true}
            })))
            .mount(&server)
            .await;

        let config = config(server.uri());
        let weights = ScoringWeights {
            disposable_points: 40,
            ..ScoringWeights::default()
        };
        let report = scan_email(
            &HibpService::new(&config).unwrap(),
            &HunterService::new(&config).unwrap(),
            "x@throwaway.io".to_string(),
            &weights,
            &CostConfig::default(),
        )
        .await;

        assert_eq!(report.risk_score, 40);
        assert_eq!(report.tier, RiskTier::Medium);
        assert_eq!(report.providers.breach.breach_count, Some(0));
    }
}

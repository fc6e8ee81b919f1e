use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Reason reported by a provider that was never queried for lack of a credential.
pub const CREDENTIAL_MISSING: &str = "credential missing";
/// Error reported when a provider answers with HTTP 429.
pub const RATE_LIMITED: &str = "rate limited";

// ============ Provider Results ============

/// Common view over a provider result, used by scoring and billing.
pub trait ProviderOutcome {
    /// Whether the provider was configured and therefore queried.
    fn enabled(&self) -> bool;
    fn error(&self) -> Option<&str>;

    /// Queried and answered without error.
    fn succeeded(&self) -> bool {
        self.enabled() && self.error().is_none()
    }
}

/// A single breach as reported by the breach provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Breach {
    pub name: String,
    pub title: String,
    /// Breach date as reported (YYYY-MM-DD).
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub pwn_count: u64,
    pub data_classes: Vec<String>,
    pub verified: bool,
}

/// Outcome of a breach lookup.
///
/// Built only through [`BreachLookup::disabled`], [`BreachLookup::failed`] and
/// [`BreachLookup::found`], so a disabled result never carries data or an error
/// and a failed one never carries data.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BreachLookup {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breach_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breaches: Option<Vec<Breach>>,
}

impl BreachLookup {
    pub fn disabled(reason: impl Into<String>) -> Self {
        Self {
            enabled: false,
            reason: Some(reason.into()),
            error: None,
            breach_count: None,
            breaches: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            enabled: true,
            reason: None,
            error: Some(error.into()),
            breach_count: None,
            breaches: None,
        }
    }

    pub fn found(breaches: Vec<Breach>) -> Self {
        Self {
            enabled: true,
            reason: None,
            error: None,
            breach_count: Some(breaches.len() as u64),
            breaches: Some(breaches),
        }
    }

    /// Number of breaches; zero unless the lookup succeeded.
    pub fn breach_count(&self) -> u64 {
        self.breach_count.unwrap_or(0)
    }
}

impl ProviderOutcome for BreachLookup {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// A public contact found on the domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SampleEmail {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Normalized domain-intelligence payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainSignals {
    pub organization: Option<String>,
    pub disposable: bool,
    pub webmail: bool,
    pub email_patterns: Option<String>,
    pub confidence: Option<u32>,
    pub sample_emails: Vec<SampleEmail>,
}

/// Outcome of a domain-signals lookup. Same construction rules as [`BreachLookup`].
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DomainLookup {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webmail: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_patterns: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_emails: Option<Vec<SampleEmail>>,
}

impl DomainLookup {
    /// Maximum number of sample contacts kept from a provider answer.
    pub const SAMPLE_LIMIT: usize = 3;

    pub fn disabled(reason: impl Into<String>) -> Self {
        Self {
            enabled: false,
            reason: Some(reason.into()),
            ..Self::empty()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            enabled: true,
            error: Some(error.into()),
            ..Self::empty()
        }
    }

    /// Successful lookup. Sample contacts beyond [`Self::SAMPLE_LIMIT`] are dropped.
    pub fn found(signals: DomainSignals) -> Self {
        let mut samples = signals.sample_emails;
        samples.truncate(Self::SAMPLE_LIMIT);
        Self {
            enabled: true,
            reason: None,
            error: None,
            organization: signals.organization,
            disposable: Some(signals.disposable),
            webmail: Some(signals.webmail),
            email_patterns: signals.email_patterns,
            confidence: signals.confidence,
            sample_emails: Some(samples),
        }
    }

    fn empty() -> Self {
        Self {
            enabled: false,
            reason: None,
            error: None,
            organization: None,
            disposable: None,
            webmail: None,
            email_patterns: None,
            confidence: None,
            sample_emails: None,
        }
    }

    pub fn is_webmail(&self) -> bool {
        self.webmail.unwrap_or(false)
    }

    pub fn is_disposable(&self) -> bool {
        self.disposable.unwrap_or(false)
    }

    pub fn has_public_contacts(&self) -> bool {
        self.sample_emails
            .as_ref()
            .map(|samples| !samples.is_empty())
            .unwrap_or(false)
    }
}

impl ProviderOutcome for DomainLookup {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

// ============ Cost Estimation ============

/// Provider call counts to price. Missing fields default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CallCounts {
    pub hibp_calls: u64,
    pub hunter_calls: u64,
    pub intelx_calls: u64,
}

/// Projected provider spend against the monthly budget, in USD.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub call_counts: BTreeMap<String, u64>,
    pub cost_breakdown: BTreeMap<String, f64>,
    pub estimated_total: f64,
    pub monthly_budget: f64,
    /// Negative when the estimate exceeds the budget.
    pub budget_remaining: f64,
}

// ============ Risk Assessment ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Always within 0..=100.
    pub score: u32,
    pub tier: RiskTier,
    pub recommendation: String,
}

// ============ Request / Response Envelopes ============

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EmailRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResults {
    pub breach: BreachLookup,
    pub domain_signals: DomainLookup,
}

/// Aggregated email intelligence report.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntelReport {
    pub email: String,
    pub domain: String,
    pub providers: ProviderResults,
    pub risk_score: u32,
    pub tier: RiskTier,
    pub recommendation: String,
    pub cost_estimate: CostEstimate,
    /// Same value as `costEstimate.estimatedTotal`.
    pub estimated_provider_cost_usd: f64,
    /// RFC 3339, UTC.
    pub scanned_at: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IntelResponse {
    pub success: bool,
    pub data: IntelReport,
}

/// Breach-only scan result.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub email: String,
    pub is_compromised: bool,
    pub breach_count: u64,
    pub breaches: Vec<Breach>,
    pub scanned_at: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScanResponse {
    pub success: bool,
    pub data: ScanReport,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CostEstimateResponse {
    pub success: bool,
    pub estimate: CostEstimate,
}

// ============ DNS Security ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DnsRecordStatus {
    Found,
    NotFound,
    Error,
}

/// SPF or DMARC check result.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TxtRecordCheck {
    pub status: DnsRecordStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
    /// Resolver that answered, if any did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MxRecordCheck {
    pub status: DnsRecordStatus,
    pub records: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DnsSecurityReport {
    pub domain: String,
    pub spf: TxtRecordCheck,
    pub dmarc: TxtRecordCheck,
    pub mx: MxRecordCheck,
    pub checked_at: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DnsResponse {
    pub success: bool,
    pub data: DnsSecurityReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_result_has_no_data_or_error() {
        let lookup = BreachLookup::disabled(CREDENTIAL_MISSING);
        let json = serde_json::to_value(&lookup).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"enabled": false, "reason": "credential missing"})
        );
        assert!(!lookup.succeeded());
    }

    #[test]
    fn test_failed_result_is_enabled_without_payload() {
        let lookup = DomainLookup::failed(RATE_LIMITED);
        let json = serde_json::to_value(&lookup).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"enabled": true, "error": "rate limited"})
        );
        assert!(lookup.enabled());
        assert!(!lookup.succeeded());
    }

    #[test]
    fn test_zero_findings_is_distinct_from_failure() {
        let lookup = BreachLookup::found(vec![]);
        let json = serde_json::to_value(&lookup).unwrap();
        assert_eq!(json["breachCount"], 0);
        assert_eq!(json["breaches"], serde_json::json!([]));
        assert!(json.get("error").is_none());
        assert!(lookup.succeeded());
    }

    #[test]
    fn test_domain_samples_truncated_to_three() {
        let sample = |i: u32| SampleEmail {
            value: format!("person{}@example.com", i),
            confidence: Some(90),
            kind: Some("personal".to_string()),
        };
        let lookup = DomainLookup::found(DomainSignals {
            sample_emails: (0..10).map(sample).collect(),
            ..Default::default()
        });
        assert_eq!(lookup.sample_emails.as_ref().map(Vec::len), Some(3));
        assert!(lookup.has_public_contacts());
    }

    #[test]
    fn test_call_counts_default_missing_fields() {
        let counts: CallCounts = serde_json::from_str(r#"{"hunterCalls": 4}"#).unwrap();
        assert_eq!(
            counts,
            CallCounts {
                hibp_calls: 0,
                hunter_calls: 4,
                intelx_calls: 0
            }
        );
    }

    #[test]
    fn test_dns_status_serializes_snake_case() {
        let json = serde_json::to_value(DnsRecordStatus::NotFound).unwrap();
        assert_eq!(json, "not_found");
    }
}

use crate::config::Config;
use crate::errors::AppError;
use crate::models::*;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT: &str = "FK94-Security-Monitor";

fn provider_client(config: &Config, provider: &str) -> Result<Client, AppError> {
    Client::builder()
        .timeout(Duration::from_secs(config.provider_timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| {
            AppError::InternalError(format!("Failed to create {} client: {}", provider, e))
        })
}

fn describe_request_error(provider: &str, err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("{} request timed out", provider)
    } else {
        format!("{} request failed: {}", provider, err)
    }
}

// ============ HIBP (breach lookup) ============

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HibpBreach {
    pub name: String,
    pub title: String,
    pub breach_date: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pwn_count: u64,
    #[serde(default)]
    pub data_classes: Vec<String>,
    #[serde(default)]
    pub is_verified: bool,
}

impl From<HibpBreach> for Breach {
    fn from(b: HibpBreach) -> Self {
        Breach {
            name: b.name,
            title: b.title,
            date: b.breach_date,
            description: b.description,
            pwn_count: b.pwn_count,
            data_classes: b.data_classes,
            verified: b.is_verified,
        }
    }
}

#[derive(Clone)]
pub struct HibpService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HibpService {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            client: provider_client(config, "HIBP")?,
            base_url: config.hibp_base_url.clone(),
            api_key: config.hibp_api_key.clone(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Look up breaches for an already validated, lower-cased email.
    ///
    /// Never fails: every outcome is folded into the returned [`BreachLookup`].
    /// Makes exactly one request when a key is configured and none otherwise.
    pub async fn lookup(&self, email: &str) -> BreachLookup {
        let Some(ref api_key) = self.api_key else {
            tracing::debug!("HIBP: skipped, no API key configured");
            return BreachLookup::disabled(CREDENTIAL_MISSING);
        };

        let encoded: String = url::form_urlencoded::byte_serialize(email.as_bytes()).collect();
        let url = format!(
            "{}/breachedaccount/{}?truncateResponse=false",
            self.base_url, encoded
        );

        tracing::info!("HIBP: Looking up breaches for {}", email);

        let response = match self
            .client
            .get(&url)
            .header("hibp-api-key", api_key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let message = describe_request_error("HIBP", &e);
                tracing::warn!("{}", message);
                return BreachLookup::failed(message);
            }
        };

        match response.status() {
            StatusCode::NOT_FOUND => {
                tracing::info!("HIBP: No breaches for {}", email);
                return BreachLookup::found(vec![]);
            }
            StatusCode::TOO_MANY_REQUESTS => {
                tracing::warn!("HIBP: Rate limited");
                return BreachLookup::failed(RATE_LIMITED);
            }
            status if !status.is_success() => {
                tracing::error!("HIBP returned error {}", status);
                return BreachLookup::failed(format!("HIBP returned status {}", status));
            }
            _ => {}
        }

        match response.json::<Vec<HibpBreach>>().await {
            Ok(raw) => {
                let breaches: Vec<Breach> = raw.into_iter().map(Breach::from).collect();
                tracing::info!("HIBP: Found {} breaches for {}", breaches.len(), email);
                BreachLookup::found(breaches)
            }
            Err(e) => {
                tracing::error!("Failed to parse HIBP response: {}", e);
                BreachLookup::failed(format!("Failed to parse HIBP response: {}", e))
            }
        }
    }
}

// ============ Hunter (domain signals) ============

#[derive(Debug, Clone, Deserialize)]
pub struct HunterDomainSearch {
    pub data: HunterDomainData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HunterDomainData {
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub disposable: bool,
    #[serde(default)]
    pub webmail: bool,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub emails: Vec<HunterEmail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HunterEmail {
    pub value: String,
    #[serde(default)]
    pub confidence: Option<u32>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl From<HunterDomainData> for DomainSignals {
    fn from(data: HunterDomainData) -> Self {
        let confidence = data.emails.iter().filter_map(|e| e.confidence).max();
        DomainSignals {
            organization: data.organization,
            disposable: data.disposable,
            webmail: data.webmail,
            email_patterns: data.pattern,
            confidence,
            sample_emails: data
                .emails
                .into_iter()
                .take(DomainLookup::SAMPLE_LIMIT)
                .map(|e| SampleEmail {
                    value: e.value,
                    confidence: e.confidence,
                    kind: e.kind,
                })
                .collect(),
        }
    }
}

#[derive(Clone)]
pub struct HunterService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HunterService {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            client: provider_client(config, "Hunter")?,
            base_url: config.hunter_base_url.clone(),
            api_key: config.hunter_api_key.clone(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch organization and contact signals for a lower-cased domain.
    ///
    /// Same containment rules as [`HibpService::lookup`].
    pub async fn lookup(&self, domain: &str) -> DomainLookup {
        let Some(ref api_key) = self.api_key else {
            tracing::debug!("Hunter: skipped, no API key configured");
            return DomainLookup::disabled(CREDENTIAL_MISSING);
        };

        // Build URL with proper parameter encoding to prevent injection attacks
        let url = match reqwest::Url::parse_with_params(
            &format!("{}/domain-search", self.base_url),
            &[("domain", domain), ("api_key", api_key.as_str())],
        ) {
            Ok(url) => url,
            Err(e) => return DomainLookup::failed(format!("Failed to build URL: {}", e)),
        };

        tracing::info!("Hunter: Fetching domain signals for {}", domain);
        // Redact key from logs to prevent credential exposure
        tracing::debug!(
            "Hunter URL: {}/domain-search?domain={}&api_key=[REDACTED]",
            self.base_url,
            domain
        );

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                // reqwest errors carry the URL, which includes the key
                let message = describe_request_error("Hunter", &e.without_url());
                tracing::warn!("{}", message);
                return DomainLookup::failed(message);
            }
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("Hunter: Rate limited");
            return DomainLookup::failed(RATE_LIMITED);
        }
        if !status.is_success() {
            tracing::error!("Hunter returned error {}", status);
            return DomainLookup::failed(format!("Hunter returned status {}", status));
        }

        match response.json::<HunterDomainSearch>().await {
            Ok(result) => {
                let signals = DomainSignals::from(result.data);
                tracing::info!(
                    "Hunter: {} (webmail: {}, disposable: {}, contacts: {})",
                    domain,
                    signals.webmail,
                    signals.disposable,
                    signals.sample_emails.len()
                );
                DomainLookup::found(signals)
            }
            Err(e) => {
                let message = format!("Failed to parse Hunter response: {}", e.without_url());
                tracing::error!("{}", message);
                DomainLookup::failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hibp_breach_maps_fields() {
        let raw: HibpBreach = serde_json::from_value(serde_json::json!({
            "Name": "LinkedIn",
            "Title": "LinkedIn",
            "BreachDate": "2012-05-05",
            "PwnCount": 164611595u64,
            "DataClasses": ["Email addresses", "Passwords"],
            "IsVerified": true
        }))
        .unwrap();
        let breach = Breach::from(raw);
        assert_eq!(breach.date, "2012-05-05");
        assert_eq!(breach.pwn_count, 164_611_595);
        assert!(breach.verified);
        assert!(breach.description.is_none());
    }

    #[test]
    fn test_hunter_confidence_is_highest_contact() {
        let data: HunterDomainData = serde_json::from_value(serde_json::json!({
            "organization": "Example",
            "webmail": false,
            "disposable": false,
            "pattern": "{first}.{last}",
            "emails": [
                {"value": "a@example.com", "confidence": 40, "type": "personal"},
                {"value": "b@example.com", "confidence": 97, "type": "generic"},
                {"value": "c@example.com"},
                {"value": "d@example.com", "confidence": 99}
            ]
        }))
        .unwrap();
        let signals = DomainSignals::from(data);
        assert_eq!(signals.confidence, Some(99));
        assert_eq!(signals.sample_emails.len(), 3);
        assert_eq!(signals.email_patterns.as_deref(), Some("{first}.{last}"));
    }

    #[test]
    fn test_hunter_without_contacts_has_no_confidence() {
        let data: HunterDomainData =
            serde_json::from_value(serde_json::json!({"webmail": true})).unwrap();
        let signals = DomainSignals::from(data);
        assert!(signals.confidence.is_none());
        assert!(signals.webmail);
        assert!(signals.sample_emails.is_empty());
    }
}

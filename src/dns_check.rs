//! Email-security DNS checks (SPF, DMARC, MX) over DNS-over-HTTPS.
//!
//! Every lookup walks the configured resolver chain and uses the first
//! resolver that answers.

use crate::config::Config;
use crate::endpoint_chain::{ChainOutcome, EndpointChain};
use crate::errors::AppError;
use crate::models::{DnsRecordStatus, DnsSecurityReport, MxRecordCheck, TxtRecordCheck};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

static DOMAIN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}$")
        .expect("domain regex is valid")
});

/// DNS response codes a resolver may return for a lookup that worked.
const RCODE_NOERROR: u32 = 0;
const RCODE_NXDOMAIN: u32 = 3;

/// Answer type for MX records.
const TYPE_MX: u16 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    Txt,
    Mx,
}

impl RecordType {
    fn as_str(self) -> &'static str {
        match self {
            RecordType::Txt => "TXT",
            RecordType::Mx => "MX",
        }
    }
}

/// DoH JSON answer (Google / Cloudflare `application/dns-json` format).
#[derive(Debug, Clone, Deserialize)]
pub struct DohResponse {
    #[serde(rename = "Status", default)]
    pub status: u32,
    #[serde(rename = "Answer", default)]
    pub answer: Vec<DohAnswer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DohAnswer {
    #[serde(rename = "type", default)]
    pub record_type: u16,
    #[serde(default)]
    pub data: String,
}

/// Keep a DoH answer only if the resolver actually completed the lookup.
///
/// NOERROR and NXDOMAIN are answers; SERVFAIL, REFUSED and the rest move on to
/// the next resolver.
pub fn accept_rcode(response: DohResponse) -> Result<DohResponse, String> {
    match response.status {
        RCODE_NOERROR | RCODE_NXDOMAIN => Ok(response),
        rcode => Err(format!("rcode {}", rcode)),
    }
}

/// Lower-case and validate a domain name. Returns `None` if it is not a hostname.
pub fn normalize_domain(raw: &str) -> Option<String> {
    let domain = raw.trim().trim_end_matches('.').to_lowercase();
    if domain.len() > 253 || !DOMAIN_REGEX.is_match(&domain) {
        return None;
    }
    Some(domain)
}

/// First TXT answer containing `marker`, with the quoting removed.
pub fn find_txt_record(answers: &[DohAnswer], marker: &str) -> Option<String> {
    answers
        .iter()
        .find(|a| a.data.contains(marker))
        .map(|a| a.data.replace('"', ""))
}

#[derive(Clone)]
pub struct DnsSecurityService {
    client: Client,
    resolvers: EndpointChain,
}

impl DnsSecurityService {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.provider_timeout_secs))
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to create DoH client: {}", e)))?;

        Ok(Self {
            client,
            resolvers: EndpointChain::new(config.doh_resolvers.clone())?,
        })
    }

    /// Run SPF, DMARC and MX checks concurrently for a normalized domain.
    pub async fn check(&self, domain: &str) -> DnsSecurityReport {
        let dmarc_name = format!("_dmarc.{}", domain);
        let (spf, dmarc, mx) = tokio::join!(
            self.resolve(domain, RecordType::Txt),
            self.resolve(&dmarc_name, RecordType::Txt),
            self.resolve(domain, RecordType::Mx),
        );

        DnsSecurityReport {
            domain: domain.to_string(),
            spf: txt_check(spf, "v=spf1"),
            dmarc: txt_check(dmarc, "v=DMARC1"),
            mx: mx_check(mx),
            checked_at: Utc::now().to_rfc3339(),
        }
    }

    async fn resolve(&self, name: &str, record_type: RecordType) -> ChainOutcome<DohResponse> {
        let outcome = self
            .resolvers
            .first_success(|resolver| self.query(resolver, name.to_string(), record_type))
            .await;

        match outcome.endpoint() {
            Some(resolver) => {
                tracing::debug!("DoH {} {} answered by {}", record_type.as_str(), name, resolver)
            }
            None => tracing::warn!(
                "DoH {} {} failed on every resolver: {}",
                record_type.as_str(),
                name,
                outcome.failure_summary()
            ),
        }
        outcome
    }

    async fn query(
        &self,
        resolver: String,
        name: String,
        record_type: RecordType,
    ) -> Result<DohResponse, String> {
        let response = self
            .client
            .get(&resolver)
            .query(&[("name", name.as_str()), ("type", record_type.as_str())])
            .header("accept", "application/dns-json")
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("status {}", response.status()));
        }

        let answer = response
            .json::<DohResponse>()
            .await
            .map_err(|e| format!("invalid DoH response: {}", e))?;

        accept_rcode(answer)
    }
}

fn txt_check(outcome: ChainOutcome<DohResponse>, marker: &str) -> TxtRecordCheck {
    match outcome.selected {
        Some((resolver, answer)) => {
            let record = find_txt_record(&answer.answer, marker);
            TxtRecordCheck {
                status: if record.is_some() {
                    DnsRecordStatus::Found
                } else {
                    DnsRecordStatus::NotFound
                },
                record,
                resolver: Some(resolver),
            }
        }
        None => TxtRecordCheck {
            status: DnsRecordStatus::Error,
            record: None,
            resolver: None,
        },
    }
}

fn mx_check(outcome: ChainOutcome<DohResponse>) -> MxRecordCheck {
    match outcome.selected {
        Some((resolver, answer)) => {
            // CNAME hops show up in the answer section too
            let records: Vec<String> = answer
                .answer
                .into_iter()
                .filter(|a| a.record_type == TYPE_MX)
                .map(|a| a.data)
                .collect();
            MxRecordCheck {
                status: if records.is_empty() {
                    DnsRecordStatus::NotFound
                } else {
                    DnsRecordStatus::Found
                },
                records,
                resolver: Some(resolver),
            }
        }
        None => MxRecordCheck {
            status: DnsRecordStatus::Error,
            records: vec![],
            resolver: None,
        },
    }
}

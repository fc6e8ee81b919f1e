use serde::Deserialize;

pub const DEFAULT_HIBP_BASE_URL: &str = "https://haveibeenpwned.com/api/v3";
pub const DEFAULT_HUNTER_BASE_URL: &str = "https://api.hunter.io/v2";
pub const DEFAULT_DOH_RESOLVERS: &str =
    "https://dns.google/resolve,https://cloudflare-dns.com/dns-query";

/// Per-call provider rates and the monthly spend ceiling, all in USD.
#[derive(Debug, Clone, Deserialize)]
pub struct CostConfig {
    pub monthly_budget_usd: f64,
    pub hibp_cost_per_call: f64,
    pub hunter_cost_per_call: f64,
    pub intelx_cost_per_call: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            monthly_budget_usd: 50.0,
            hibp_cost_per_call: 0.004,
            hunter_cost_per_call: 0.01,
            intelx_cost_per_call: 0.02,
        }
    }
}

/// Points and tier cutoffs used by the risk scorer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoringWeights {
    /// Points added per known breach.
    pub breach_points: u32,
    /// Ceiling on the total breach contribution.
    pub breach_cap: u32,
    pub webmail_points: u32,
    pub disposable_points: u32,
    /// Added once when at least one public contact exists on the domain.
    pub public_contact_points: u32,
    /// Lowest score classified as high risk.
    pub high_threshold: u32,
    /// Lowest score classified as medium risk.
    pub medium_threshold: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            breach_points: 15,
            breach_cap: 70,
            webmail_points: 8,
            disposable_points: 20,
            public_contact_points: 10,
            high_threshold: 70,
            medium_threshold: 35,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Absent credentials disable the matching provider.
    pub hibp_api_key: Option<String>,
    pub hunter_api_key: Option<String>,
    pub hibp_base_url: String,
    pub hunter_base_url: String,
    /// DNS-over-HTTPS resolvers, tried in order.
    pub doh_resolvers: Vec<String>,
    pub provider_timeout_secs: u64,
    pub costs: CostConfig,
    pub scoring: ScoringWeights,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            hibp_api_key: None,
            hunter_api_key: None,
            hibp_base_url: DEFAULT_HIBP_BASE_URL.to_string(),
            hunter_base_url: DEFAULT_HUNTER_BASE_URL.to_string(),
            doh_resolvers: split_list(DEFAULT_DOH_RESOLVERS),
            provider_timeout_secs: 12,
            costs: CostConfig::default(),
            scoring: ScoringWeights::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let default_costs = CostConfig::default();
        let default_weights = ScoringWeights::default();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            hibp_api_key: optional_secret("HIBP_API_KEY"),
            hunter_api_key: optional_secret("HUNTER_API_KEY"),
            hibp_base_url: http_url("HIBP_BASE_URL", DEFAULT_HIBP_BASE_URL)?,
            hunter_base_url: http_url("HUNTER_BASE_URL", DEFAULT_HUNTER_BASE_URL)?,
            doh_resolvers: {
                let raw = std::env::var("DOH_RESOLVERS")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_DOH_RESOLVERS.to_string());
                let resolvers = split_list(&raw);
                if resolvers.is_empty() {
                    anyhow::bail!("DOH_RESOLVERS must list at least one resolver");
                }
                if let Some(bad) = resolvers
                    .iter()
                    .find(|r| !r.starts_with("http://") && !r.starts_with("https://"))
                {
                    anyhow::bail!("DOH_RESOLVERS entry must start with http:// or https://: {}", bad);
                }
                resolvers
            },
            provider_timeout_secs: parse_var("PROVIDER_TIMEOUT_SECS", defaults.provider_timeout_secs)
                .and_then(|secs| {
                    if secs == 0 {
                        anyhow::bail!("PROVIDER_TIMEOUT_SECS must be greater than zero");
                    }
                    Ok(secs)
                })?,
            costs: CostConfig {
                monthly_budget_usd: non_negative(
                    "MONTHLY_BUDGET_USD",
                    default_costs.monthly_budget_usd,
                )?,
                hibp_cost_per_call: non_negative(
                    "HIBP_COST_PER_CALL",
                    default_costs.hibp_cost_per_call,
                )?,
                hunter_cost_per_call: non_negative(
                    "HUNTER_COST_PER_CALL",
                    default_costs.hunter_cost_per_call,
                )?,
                intelx_cost_per_call: non_negative(
                    "INTELX_COST_PER_CALL",
                    default_costs.intelx_cost_per_call,
                )?,
            },
            scoring: ScoringWeights {
                breach_points: parse_var("RISK_BREACH_POINTS", default_weights.breach_points)?,
                breach_cap: parse_var("RISK_BREACH_CAP", default_weights.breach_cap)?,
                webmail_points: parse_var("RISK_WEBMAIL_POINTS", default_weights.webmail_points)?,
                disposable_points: parse_var(
                    "RISK_DISPOSABLE_POINTS",
                    default_weights.disposable_points,
                )?,
                public_contact_points: parse_var(
                    "RISK_PUBLIC_CONTACT_POINTS",
                    default_weights.public_contact_points,
                )?,
                high_threshold: parse_var("RISK_HIGH_THRESHOLD", default_weights.high_threshold)?,
                medium_threshold: parse_var(
                    "RISK_MEDIUM_THRESHOLD",
                    default_weights.medium_threshold,
                )?,
            },
        };

        if config.scoring.medium_threshold > config.scoring.high_threshold {
            anyhow::bail!("RISK_MEDIUM_THRESHOLD cannot exceed RISK_HIGH_THRESHOLD");
        }

        // Log what was loaded without exposing credentials
        tracing::info!("Configuration loaded successfully");
        tracing::info!(
            "Providers: HIBP {}, Hunter {}",
            if config.hibp_api_key.is_some() { "enabled" } else { "disabled (no HIBP_API_KEY)" },
            if config.hunter_api_key.is_some() { "enabled" } else { "disabled (no HUNTER_API_KEY)" },
        );
        tracing::debug!("HIBP Base URL: {}", config.hibp_base_url);
        tracing::debug!("Hunter Base URL: {}", config.hunter_base_url);
        tracing::debug!("DoH resolvers: {:?}", config.doh_resolvers);
        tracing::debug!(
            "Monthly budget: ${:.2}, provider timeout: {}s",
            config.costs.monthly_budget_usd,
            config.provider_timeout_secs
        );
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

fn optional_secret(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn http_url(name: &str, default: &str) -> anyhow::Result<String> {
    let url = std::env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string());
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("{} must start with http:// or https://", name);
    }
    Ok(url.trim_end_matches('/').to_string())
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {}", name, raw)),
        _ => Ok(default),
    }
}

fn non_negative(name: &str, default: f64) -> anyhow::Result<f64> {
    let value: f64 = parse_var(name, default)?;
    if !value.is_finite() || value < 0.0 {
        anyhow::bail!("{} must be a non-negative number", name);
    }
    Ok(value)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_skips_empty() {
        let list = split_list(" https://a.example/ , ,https://b.example");
        assert_eq!(list, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_defaults_match_observed_weights() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.breach_points, 15);
        assert_eq!(weights.breach_cap, 70);
        assert_eq!(weights.high_threshold, 70);
        assert_eq!(weights.medium_threshold, 35);

        let config = Config::default();
        assert_eq!(config.provider_timeout_secs, 12);
        assert_eq!(config.doh_resolvers.len(), 2);
        assert!(config.hibp_api_key.is_none());
    }
}

use crate::config::Config;
use crate::cost;
use crate::dns_check::{self, DnsSecurityService};
use crate::errors::{AppError, ResultExt};
use crate::intel;
use crate::models::*;
use crate::plans::{self, RESELLER_PLANS};
use crate::services::{HibpService, HunterService};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers. Read-only after start-up.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Breach provider client.
    pub hibp: HibpService,
    /// Domain-signals provider client.
    pub hunter: HunterService,
    /// DNS-over-HTTPS checker.
    pub dns: DnsSecurityService,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        Ok(Self {
            hibp: HibpService::new(&config).context("initializing HIBP client")?,
            hunter: HunterService::new(&config).context("initializing Hunter client")?,
            dns: DnsSecurityService::new(&config).context("initializing DoH client")?,
            config,
        })
    }
}

/// Normalized email from the request body.
///
/// A body that is not JSON, or whose `email` is not a string, is treated like a
/// missing email.
fn require_email(payload: Result<Json<EmailRequest>, JsonRejection>) -> Result<String, AppError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!("❌ Unreadable email body: {}", rejection.body_text());
            EmailRequest::default()
        }
    };

    request
        .email
        .as_deref()
        .and_then(intel::normalize_email)
        .ok_or_else(|| AppError::BadRequest(intel::INVALID_EMAIL.to_string()))
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
}

/// POST /api/v1/intel/email
///
/// Aggregated breach + domain-signals scan with risk score and cost estimate.
/// Malformed emails are rejected before any provider is called.
#[utoipa::path(
    post,
    path = "/api/v1/intel/email",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Aggregated scan", body = IntelResponse),
        (status = 400, description = "Valid email required")
    )
)]
pub async fn intel_email(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> Result<Json<IntelResponse>, AppError> {
    let email = require_email(payload)?;
    tracing::info!("POST /intel/email - {}", email);

    let data = intel::scan_email(
        &state.hibp,
        &state.hunter,
        email,
        &state.config.scoring,
        &state.config.costs,
    )
    .await;

    Ok(Json(IntelResponse {
        success: true,
        data,
    }))
}

/// POST /api/v1/scan
///
/// Breach-only scan. Unlike the aggregate scan, a provider failure fails the request.
#[utoipa::path(
    post,
    path = "/api/v1/scan",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Breach scan", body = ScanResponse),
        (status = 400, description = "Valid email required"),
        (status = 502, description = "Breach provider failed"),
        (status = 503, description = "Breach provider not configured")
    )
)]
pub async fn scan(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> Result<Json<ScanResponse>, AppError> {
    let email = require_email(payload)?;
    tracing::info!("POST /scan - {}", email);

    if !state.hibp.is_enabled() {
        return Err(AppError::ServiceUnavailable(
            "Breach provider not configured".to_string(),
        ));
    }

    let lookup = state.hibp.lookup(&email).await;
    if let Some(error) = lookup.error() {
        return Err(AppError::ExternalApiError(error.to_string()));
    }

    let breaches = lookup.breaches.unwrap_or_default();
    Ok(Json(ScanResponse {
        success: true,
        data: ScanReport {
            email,
            is_compromised: !breaches.is_empty(),
            breach_count: breaches.len() as u64,
            breaches,
            scanned_at: Utc::now().to_rfc3339(),
        },
    }))
}

/// POST /api/v1/admin/cost-estimate
///
/// What a given number of provider calls would cost. Missing counts default to 0.
#[utoipa::path(
    post,
    path = "/api/v1/admin/cost-estimate",
    request_body = CallCounts,
    responses(
        (status = 200, description = "Cost estimate", body = CostEstimateResponse),
        (status = 400, description = "Call counts must be non-negative integers")
    )
)]
pub async fn cost_estimate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CallCounts>, JsonRejection>,
) -> Result<Json<CostEstimateResponse>, AppError> {
    let Json(counts) = payload.map_err(|rejection| {
        AppError::BadRequest(format!("Invalid call counts: {}", rejection.body_text()))
    })?;

    tracing::info!("POST /admin/cost-estimate - {:?}", counts);
    Ok(Json(CostEstimateResponse {
        success: true,
        estimate: cost::estimate(&counts, &state.config.costs),
    }))
}

/// GET /api/v1/pricing/plans
#[utoipa::path(
    get,
    path = "/api/v1/pricing/plans",
    responses((status = 200, description = "Reseller plans and provider costs"))
)]
pub async fn pricing_plans(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let costs = &state.config.costs;
    Json(json!({
        "success": true,
        "plans": RESELLER_PLANS,
        "monthlyBudgetUsd": costs.monthly_budget_usd,
        "providerCosts": {
            "hibp": costs.hibp_cost_per_call,
            "hunter": costs.hunter_cost_per_call,
            "intelx": costs.intelx_cost_per_call,
        },
    }))
}

/// GET /api/v1/pricing/plans/:id
#[utoipa::path(
    get,
    path = "/api/v1/pricing/plans/{id}",
    params(("id" = String, Path, description = "Plan identifier")),
    responses(
        (status = 200, description = "Single plan"),
        (status = 404, description = "Unknown plan")
    )
)]
pub async fn pricing_plan(Path(id): Path<String>) -> Result<Json<serde_json::Value>, AppError> {
    let plan = plans::find_plan(&id)
        .ok_or_else(|| AppError::NotFound(format!("Plan '{}' not found", id)))?;
    Ok(Json(json!({ "success": true, "plan": plan })))
}

/// GET /api/v1/demo
///
/// Fixed example report for front-end demos. Makes no provider calls.
#[utoipa::path(
    get,
    path = "/api/v1/demo",
    responses((status = 200, description = "Example scan", body = IntelResponse))
)]
pub async fn demo(State(state): State<Arc<AppState>>) -> Json<IntelResponse> {
    Json(IntelResponse {
        success: true,
        data: intel::demo_report(&state.config.scoring, &state.config.costs),
    })
}

/// GET /api/v1/dns/:domain
///
/// SPF, DMARC and MX checks for a domain.
#[utoipa::path(
    get,
    path = "/api/v1/dns/{domain}",
    params(("domain" = String, Path, description = "Domain to check")),
    responses(
        (status = 200, description = "DNS security report", body = DnsResponse),
        (status = 400, description = "Valid domain required")
    )
)]
pub async fn dns_check(
    State(state): State<Arc<AppState>>,
    Path(domain): Path<String>,
) -> Result<Json<DnsResponse>, AppError> {
    let domain = dns_check::normalize_domain(&domain)
        .ok_or_else(|| AppError::BadRequest("Valid domain required".to_string()))?;
    tracing::info!("GET /dns/{}", domain);

    Ok(Json(DnsResponse {
        success: true,
        data: state.dns.check(&domain).await,
    }))
}

/// Fallback for unknown routes.
pub async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

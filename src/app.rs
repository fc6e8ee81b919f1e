use crate::handlers::{self, AppState};
use crate::models::*;
use crate::plans::ResellerPlan;
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;

/// Request bodies are small JSON documents.
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    info(title = "FK94 Intel API", description = "Email exposure, risk scoring and provider cost estimation"),
    paths(
        handlers::intel_email,
        handlers::scan,
        handlers::cost_estimate,
        handlers::pricing_plans,
        handlers::pricing_plan,
        handlers::demo,
        handlers::dns_check,
    ),
    components(schemas(
        EmailRequest,
        CallCounts,
        CostEstimate,
        CostEstimateResponse,
        RiskTier,
        RiskAssessment,
        Breach,
        BreachLookup,
        SampleEmail,
        DomainLookup,
        ProviderResults,
        IntelReport,
        IntelResponse,
        ScanReport,
        ScanResponse,
        DnsRecordStatus,
        TxtRecordCheck,
        MxRecordCheck,
        DnsSecurityReport,
        DnsResponse,
        ResellerPlan,
    ))
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document.
async fn serve_openapi_spec() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Serves the Swagger UI HTML page.
///
/// The page loads the document served by `serve_openapi_spec`.
async fn serve_swagger_ui() -> impl IntoResponse {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>FK94 Intel API - Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/api-docs/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>
"#;
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}

/// Build the full router: API routes, docs, health check and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // API Documentation
        .route("/docs", get(serve_swagger_ui))
        .route("/api-docs/openapi.json", get(serve_openapi_spec))
        // Scans
        .route("/api/v1/intel/email", post(handlers::intel_email))
        .route("/api/v1/scan", post(handlers::scan))
        .route("/api/v1/dns/:domain", get(handlers::dns_check))
        // Pricing and cost administration
        .route("/api/v1/admin/cost-estimate", post(handlers::cost_estimate))
        .route("/api/v1/pricing/plans", get(handlers::pricing_plans))
        .route("/api/v1/pricing/plans/:id", get(handlers::pricing_plan))
        .route("/api/v1/demo", get(handlers::demo))
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(api_routes)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

//! FK94 Intel API Library
//!
//! Email exposure scanning for the FK94 security audit experience: breach and
//! domain-intelligence providers are queried concurrently, combined into a
//! bounded risk score and priced against a monthly provider budget.
//!
//! # Modules
//!
//! - `api`: HTTP surface (router and handlers).
//! - `core`: Scoring, cost estimation and the aggregate scan pipeline.
//! - `integrations`: External provider and DNS clients.
//! - `app`: Router construction and OpenAPI document.
//! - `config`: Configuration management.
//! - `cost`: Provider cost estimation.
//! - `dns_check`: SPF / DMARC / MX checks over DNS-over-HTTPS.
//! - `endpoint_chain`: Ordered endpoint fallback.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `intel`: Aggregate email scan.
//! - `models`: Core data models.
//! - `plans`: Reseller plan catalog.
//! - `scoring`: Risk scoring.
//! - `services`: Provider adapters (HIBP, Hunter).

pub mod api;
pub mod core;
pub mod integrations;

pub mod app;
pub mod config;
pub mod cost;
pub mod dns_check;
pub mod endpoint_chain;
pub mod errors;
pub mod handlers;
pub mod intel;
pub mod models;
pub mod plans;
pub mod scoring;
pub mod services;

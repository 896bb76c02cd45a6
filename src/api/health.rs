//! Liveness and readiness probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode};
use serde::Serialize;
use tracing::warn;

use super::state::AppState;
use crate::api::types::Json;

/// Probe outcome
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    fn status_code(self) -> StatusCode {
        match self {
            Self::Healthy => StatusCode::OK,
            Self::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// One table probed by the readiness check
#[derive(Debug, Serialize)]
pub struct TableProbe {
    pub table: &'static str,
    pub status: HealthStatus,
    pub latency_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct ProbeResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<TableProbe>,
}

/// GET /health
pub async fn health_check() -> Json<ProbeResponse> {
    Json(ProbeResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION"),
        tables: Vec::new(),
    })
}

/// GET /ready
///
/// Reads one row from each table; any failure turns the probe unhealthy.
pub async fn ready_check(State(state): State<AppState>) -> (StatusCode, Json<ProbeResponse>) {
    let users = probe("users", state.user_service.find_all(1)).await;
    let posts = probe("posts", state.post_service.find_all(1)).await;

    let status = if users.status == HealthStatus::Healthy && posts.status == HealthStatus::Healthy {
        HealthStatus::Healthy
    } else {
        HealthStatus::Unhealthy
    };

    let response = ProbeResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        tables: vec![users, posts],
    };

    (status.status_code(), Json(response))
}

async fn probe<T, F>(table: &'static str, read: F) -> TableProbe
where
    F: std::future::Future<Output = Result<T, crate::domain::DomainError>>,
{
    let start = Instant::now();
    let result = read.await;
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    let status = match result {
        Ok(_) => HealthStatus::Healthy,
        Err(e) => {
            warn!(table, error = %e, "Readiness probe failed");
            HealthStatus::Unhealthy
        }
    };

    TableProbe {
        table,
        status,
        latency_ms,
    }
}

//! Route handlers.
//!
//! Query parameters arrive as raw strings and are parsed here: missing
//! parameters fall back to their defaults, anything that is not a
//! non-negative integer is rejected with 400 rather than clamped.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use tracing::{info, warn};

use surge_load::{LoadError, cpu_burn};
use surge_metrics::{Route, render_prometheus};

use crate::ApiState;

/// Iterations used when the query parameter is absent.
pub const DEFAULT_ITERATIONS: u64 = 10;
/// Megabytes used when the query parameter is absent.
pub const DEFAULT_MEMORY_MB: u64 = 100;

/// Error body for rejected or failed requests.
#[derive(serde::Serialize)]
struct ErrorResponse {
    success: bool,
    kind: &'static str,
    error: String,
}

fn error_response(kind: &'static str, msg: impl Into<String>, status: StatusCode) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            kind,
            error: msg.into(),
        }),
    )
        .into_response()
}

/// Parse an optional query value as a non-negative integer.
///
/// Absent values take the default; present-but-invalid values (empty,
/// non-numeric, negative) are a client error.
fn parse_param(raw: Option<&str>, name: &'static str, default: u64) -> Result<u64, Response> {
    match raw {
        None => Ok(default),
        Some(s) => s.parse::<u64>().map_err(|_| {
            error_response(
                "invalid_input",
                format!("{name} must be a non-negative integer, got {s:?}"),
                StatusCode::BAD_REQUEST,
            )
        }),
    }
}

// ── Health ─────────────────────────────────────────────────────

/// GET /
pub async fn health_check(State(state): State<ApiState>) -> impl IntoResponse {
    state.stats.record(Route::Health);
    "Service is up!"
}

// ── CPU load ───────────────────────────────────────────────────

/// Query parameters for the CPU endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct CpuParams {
    pub iterations: Option<String>,
}

/// GET /cpu_intensive
pub async fn cpu_intensive(
    State(state): State<ApiState>,
    Query(params): Query<CpuParams>,
) -> Response {
    let iterations =
        match parse_param(params.iterations.as_deref(), "iterations", DEFAULT_ITERATIONS) {
            Ok(v) => v,
            Err(resp) => {
                state.stats.record_client_error();
                return resp;
            }
        };

    if let Err(e) = state.limits.admit_cpu(iterations) {
        state.stats.record_client_error();
        return error_response("invalid_input", e.to_string(), StatusCode::BAD_REQUEST);
    }

    info!(iterations, "cpu intensive request received");

    // The burn is pure spinning; move it off the async workers.
    let report = match tokio::task::spawn_blocking(move || cpu_burn(iterations)).await {
        Ok(report) => report,
        Err(e) => {
            warn!(error = %e, "cpu burn task failed");
            state.stats.record_server_error();
            return error_response(
                "internal",
                "cpu burn task failed",
                StatusCode::INTERNAL_SERVER_ERROR,
            );
        }
    };

    info!(
        iterations = report.iterations,
        checksum = report.checksum,
        "cpu intensive task completed"
    );
    state.stats.record(Route::CpuIntensive);
    state.stats.add_cpu_iterations(report.iterations);

    format!("CPU intensive task executed successfully with {iterations} iterations")
        .into_response()
}

// ── Memory load ────────────────────────────────────────────────

/// Query parameters for the memory endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct MemoryParams {
    pub memory_mb: Option<String>,
}

/// GET /memory_intensive
pub async fn memory_intensive(
    State(state): State<ApiState>,
    Query(params): Query<MemoryParams>,
) -> Response {
    let memory_mb =
        match parse_param(params.memory_mb.as_deref(), "memory_mb", DEFAULT_MEMORY_MB) {
            Ok(v) => v,
            Err(resp) => {
                state.stats.record_client_error();
                return resp;
            }
        };

    if let Err(e) = state.limits.admit_memory(memory_mb) {
        state.stats.record_client_error();
        return error_response("invalid_input", e.to_string(), StatusCode::BAD_REQUEST);
    }

    info!(memory_mb, "memory intensive request received");

    // Zeroing a multi-GB block takes long enough to matter; run the
    // replacement on the blocking pool.
    let ballast = state.ballast.clone();
    let result = match tokio::task::spawn_blocking(move || ballast.replace(memory_mb)).await {
        Ok(result) => result,
        Err(e) => {
            warn!(error = %e, "ballast task failed");
            state.stats.record_server_error();
            return error_response(
                "internal",
                "ballast task failed",
                StatusCode::INTERNAL_SERVER_ERROR,
            );
        }
    };

    match result {
        Ok(bytes) => {
            info!(memory_mb, bytes, "memory intensive task completed");
            state.stats.record(Route::MemoryIntensive);
            state.stats.set_retained_bytes(bytes);
            format!(
                "Memory intensive task executed successfully with {memory_mb} MB of memory consumption"
            )
            .into_response()
        }
        Err(e @ LoadError::Allocation { .. }) => {
            warn!(memory_mb, error = %e, "ballast allocation failed");
            state.stats.record_server_error();
            error_response(
                "resource_exhaustion",
                e.to_string(),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
        Err(e) => {
            state.stats.record_client_error();
            error_response("invalid_input", e.to_string(), StatusCode::BAD_REQUEST)
        }
    }
}

// ── Prometheus ─────────────────────────────────────────────────

/// GET /metrics
pub async fn prometheus_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let body = render_prometheus(&state.stats);
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use surge_load::{BYTES_PER_MB, LoadLimits};

    fn test_state() -> ApiState {
        ApiState::new(LoadLimits::default())
    }

    async fn body_string(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_check_returns_banner() {
        let state = test_state();
        let resp = health_check(State(state)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "Service is up!");
    }

    #[tokio::test]
    async fn cpu_intensive_echoes_iteration_count() {
        let state = test_state();
        let params = CpuParams {
            iterations: Some("5".to_string()),
        };

        let resp = cpu_intensive(State(state.clone()), Query(params)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_string(resp).await.contains('5'));
        assert_eq!(state.stats.requests(Route::CpuIntensive), 1);
    }

    #[tokio::test]
    async fn cpu_intensive_defaults_to_ten() {
        let state = test_state();
        let params = CpuParams { iterations: None };

        let resp = cpu_intensive(State(state), Query(params)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_string(resp).await.contains("10"));
    }

    #[tokio::test]
    async fn cpu_intensive_is_idempotent() {
        let state = test_state();
        let first = cpu_intensive(
            State(state.clone()),
            Query(CpuParams {
                iterations: Some("7".to_string()),
            }),
        )
        .await;
        let second = cpu_intensive(
            State(state),
            Query(CpuParams {
                iterations: Some("7".to_string()),
            }),
        )
        .await;

        assert_eq!(body_string(first).await, body_string(second).await);
    }

    #[tokio::test]
    async fn cpu_intensive_rejects_non_numeric() {
        let state = test_state();
        let params = CpuParams {
            iterations: Some("lots".to_string()),
        };

        let resp = cpu_intensive(State(state.clone()), Query(params)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.stats.client_errors(), 1);
    }

    #[tokio::test]
    async fn cpu_intensive_rejects_negative() {
        let state = test_state();
        let params = CpuParams {
            iterations: Some("-5".to_string()),
        };

        let resp = cpu_intensive(State(state), Query(params)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cpu_intensive_enforces_iteration_limit() {
        let state = ApiState::new(LoadLimits {
            max_iterations: 4,
            max_memory_mb: 4096,
        });
        let params = CpuParams {
            iterations: Some("5".to_string()),
        };

        let resp = cpu_intensive(State(state), Query(params)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn memory_intensive_echoes_mb_and_retains_block() {
        let state = test_state();
        let params = MemoryParams {
            memory_mb: Some("50".to_string()),
        };

        let resp = memory_intensive(State(state.clone()), Query(params)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_string(resp).await.contains("50"));
        assert_eq!(state.ballast.retained_bytes(), 50 * BYTES_PER_MB);
        assert_eq!(state.stats.retained_bytes(), 50 * BYTES_PER_MB);
    }

    #[tokio::test]
    async fn memory_intensive_defaults_to_one_hundred() {
        let state = test_state();
        let params = MemoryParams { memory_mb: None };

        let resp = memory_intensive(State(state.clone()), Query(params)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(state.ballast.retained_bytes(), 100 * BYTES_PER_MB);
    }

    #[tokio::test]
    async fn memory_intensive_replaces_previous_block() {
        let state = test_state();

        let _ = memory_intensive(
            State(state.clone()),
            Query(MemoryParams {
                memory_mb: Some("8".to_string()),
            }),
        )
        .await;
        let _ = memory_intensive(
            State(state.clone()),
            Query(MemoryParams {
                memory_mb: Some("2".to_string()),
            }),
        )
        .await;

        // Only the most recent allocation is kept alive.
        assert_eq!(state.ballast.retained_bytes(), 2 * BYTES_PER_MB);
    }

    #[tokio::test]
    async fn memory_intensive_rejects_non_numeric() {
        let state = test_state();
        let params = MemoryParams {
            memory_mb: Some("much".to_string()),
        };

        let resp = memory_intensive(State(state), Query(params)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn memory_intensive_enforces_memory_limit() {
        let state = ApiState::new(LoadLimits {
            max_iterations: 1_000_000,
            max_memory_mb: 16,
        });
        let params = MemoryParams {
            memory_mb: Some("17".to_string()),
        };

        let resp = memory_intensive(State(state.clone()), Query(params)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.ballast.retained_bytes(), 0);
    }

    #[tokio::test]
    async fn prometheus_endpoint_returns_text() {
        let state = test_state();
        state.stats.record(Route::Health);

        let resp = prometheus_metrics(State(state)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(content_type.contains("text/plain"));
        assert!(
            body_string(resp)
                .await
                .contains("surge_requests_total{route=\"health\"} 1")
        );
    }
}

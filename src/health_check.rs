//! Backend readiness check: three probes issued together, judged as one.
//!
//! The probes run concurrently and the join fails fast: the first probe
//! error aborts the whole check. There is no partial-success report.

use crate::api::{ApiError, CdssApi};
use crate::models::HealthResponse;

/// Which of the three probes a verdict refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Basic,
    Detailed,
    Database,
}

impl std::fmt::Display for Probe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "Basic health"),
            Self::Detailed => write!(f, "Detailed health"),
            Self::Database => write!(f, "Database"),
        }
    }
}

/// Responses from all three probes.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub basic: HealthResponse,
    pub detailed: HealthResponse,
    pub database: HealthResponse,
}

impl HealthReport {
    pub fn all_healthy(&self) -> bool {
        self.failing_probe().is_none()
    }

    /// First probe that did not report healthy/connected, in probe order.
    pub fn failing_probe(&self) -> Option<Probe> {
        if !self.basic.is_healthy() {
            Some(Probe::Basic)
        } else if !self.detailed.is_healthy() {
            Some(Probe::Detailed)
        } else if !self.database.is_database_connected() {
            Some(Probe::Database)
        } else {
            None
        }
    }

    /// User-facing explanation of the failing probe, if any.
    pub fn failure_message(&self) -> Option<String> {
        let probe = self.failing_probe()?;
        let reported = match probe {
            Probe::Basic => self.basic.status.as_str(),
            Probe::Detailed => self.detailed.status.as_str(),
            Probe::Database => self.database.database_state().unwrap_or("unknown"),
        };
        Some(format!("{probe} check failed: reported '{reported}'"))
    }
}

/// Run all three probes concurrently and collect their responses.
pub async fn check_all<A: CdssApi>(api: &A) -> Result<HealthReport, ApiError> {
    tracing::info!("Starting health checks");

    let (basic, detailed, database) = tokio::try_join!(
        api.check_basic_health(),
        api.check_detailed_health(),
        api.check_database_health(),
    )
    .map_err(|e| {
        tracing::warn!(error = %e, "Health check failed");
        e
    })?;

    let report = HealthReport {
        basic,
        detailed,
        database,
    };
    tracing::info!(all_healthy = report.all_healthy(), "All health checks completed");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockApi, NetworkFailure};

    fn network_down() -> ApiError {
        ApiError::Network {
            base_url: "http://127.0.0.1:8000".into(),
            failure: NetworkFailure::Connection,
        }
    }

    #[tokio::test]
    async fn all_probes_healthy() {
        let report = check_all(&MockApi::healthy()).await.unwrap();
        assert!(report.all_healthy());
        assert_eq!(report.failure_message(), None);
    }

    #[tokio::test]
    async fn issues_all_three_probes() {
        let api = MockApi::healthy();
        check_all(&api).await.unwrap();
        assert_eq!(api.call_count("check_basic_health"), 1);
        assert_eq!(api.call_count("check_detailed_health"), 1);
        assert_eq!(api.call_count("check_database_health"), 1);
    }

    #[tokio::test]
    async fn legacy_database_field_counts_as_connected() {
        let api = MockApi::healthy().with_database(Ok(
            HealthResponse::with_status("healthy").with_legacy_database_state("connected"),
        ));
        assert!(check_all(&api).await.unwrap().all_healthy());
    }

    #[tokio::test]
    async fn degraded_detailed_probe_named() {
        let api = MockApi::healthy().with_detailed(Ok(HealthResponse::with_status("degraded")));
        let report = check_all(&api).await.unwrap();
        assert!(!report.all_healthy());
        assert_eq!(report.failing_probe(), Some(Probe::Detailed));
        assert_eq!(
            report.failure_message().unwrap(),
            "Detailed health check failed: reported 'degraded'"
        );
    }

    #[tokio::test]
    async fn disconnected_database_named() {
        let api = MockApi::healthy().with_database(Ok(
            HealthResponse::with_status("healthy").with_database_state("disconnected"),
        ));
        let report = check_all(&api).await.unwrap();
        assert_eq!(report.failing_probe(), Some(Probe::Database));
        assert_eq!(
            report.failure_message().unwrap(),
            "Database check failed: reported 'disconnected'"
        );
    }

    #[tokio::test]
    async fn database_status_missing_is_not_connected() {
        let api = MockApi::healthy().with_database(Ok(HealthResponse::with_status("healthy")));
        let report = check_all(&api).await.unwrap();
        assert_eq!(report.failing_probe(), Some(Probe::Database));
        assert!(report.failure_message().unwrap().contains("'unknown'"));
    }

    #[tokio::test]
    async fn any_probe_error_fails_whole_check() {
        for api in [
            MockApi::healthy().with_basic(Err(network_down())),
            MockApi::healthy().with_detailed(Err(ApiError::ServerUnspecified { status: 500 })),
            MockApi::healthy().with_database(Err(network_down())),
        ] {
            assert!(check_all(&api).await.is_err());
        }
    }

    #[tokio::test]
    async fn health_checks_run_concurrently_over_http() {
        use crate::api::{
            HttpClient, PATH_BASIC_HEALTH, PATH_DATABASE_HEALTH, PATH_DETAILED_HEALTH,
        };
        use crate::config::ClientConfig;
        use axum::routing::get;
        use axum::{Json, Router};
        use serde_json::json;
        use std::time::{Duration, Instant};

        const DELAY: Duration = Duration::from_millis(400);

        let router = Router::new()
            .route(
                PATH_BASIC_HEALTH,
                get(|| async {
                    tokio::time::sleep(DELAY).await;
                    Json(json!({"status": "healthy"}))
                }),
            )
            .route(
                PATH_DETAILED_HEALTH,
                get(|| async {
                    tokio::time::sleep(DELAY).await;
                    Json(json!({"status": "healthy"}))
                }),
            )
            .route(
                PATH_DATABASE_HEALTH,
                get(|| async {
                    tokio::time::sleep(DELAY).await;
                    Json(json!({"status": "healthy", "database_status": "connected"}))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        let client =
            HttpClient::new(&ClientConfig::default().with_base_url(&format!("http://{addr}")))
                .unwrap();

        let started = Instant::now();
        let report = check_all(&client).await.unwrap();
        let elapsed = started.elapsed();

        assert!(report.all_healthy());
        assert!(elapsed >= DELAY, "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(1000), "{elapsed:?}");
    }

    #[tokio::test]
    async fn probe_error_is_returned_classified() {
        let api = MockApi::healthy().with_database(Err(ApiError::Server {
            status: 503,
            detail: "Database unavailable".into(),
        }));
        let err = check_all(&api).await.unwrap_err();
        assert_eq!(err.to_string(), "Error 503: Database unavailable");
    }
}

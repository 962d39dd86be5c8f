use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use crate::database::connection::DatabaseManager;
use crate::services::scheduler::SchedulerStatusHandle;
use chrono::{DateTime, Utc};
use tower_http::trace::TraceLayer;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub database: DatabaseHealth,
    pub scheduler: SchedulerHealth,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub status: String,
    pub connection_pool_size: u32,
    pub response_time_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SchedulerHealth {
    pub last_tick_at: Option<DateTime<Utc>>,
    pub ticks_completed: u64,
    /// Items that failed in the last tick and wait for a retry
    pub last_tick_failures: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseManager>,
    pub scheduler: SchedulerStatusHandle,
    pub start_time: DateTime<Utc>,
}

pub struct HealthService {
    pub router: Router,
}

impl HealthService {
    pub fn new(db: Arc<DatabaseManager>, scheduler: SchedulerStatusHandle) -> Self {
        let state = AppState {
            db,
            scheduler,
            start_time: Utc::now(),
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/health/ready", get(readiness_check))
            .route("/health/live", get(liveness_check))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        Self { router }
    }
}

async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();
    let db_healthy = state.db.ping().await.is_ok();
    let response_time_ms = start.elapsed().as_millis() as u64;

    let uptime = Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;

    let scheduler = {
        let status = state.scheduler.read().await;
        SchedulerHealth {
            last_tick_at: status.last_tick_at,
            ticks_completed: status.ticks_completed,
            last_tick_failures: status
                .last_report
                .as_ref()
                .map_or(0, |report| report.total_failed()),
        }
    };

    if !db_healthy {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            status: "healthy".to_string(),
            connection_pool_size: state.db.pool.size(),
            response_time_ms,
        },
        scheduler,
        uptime_seconds: uptime,
    }))
}

async fn readiness_check(State(state): State<AppState>) -> Result<Json<&'static str>, StatusCode> {
    match state.db.ping().await {
        Ok(_) => Ok(Json("ready")),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::services::scheduler::{SchedulerService, TickReport};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use std::time::Duration;
    use tempfile::TempDir;

    async fn create_test_db() -> (Arc<DatabaseManager>, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let db = DatabaseManager::new(&db_url)
            .await
            .expect("Failed to create test database");
        db.run_migrations().await.expect("Failed to run migrations");

        (Arc::new(db), temp_dir)
    }

    #[tokio::test]
    async fn test_health_endpoint_before_first_tick() {
        let (db, _temp_dir) = create_test_db().await;
        let scheduler = SchedulerService::new(Vec::new(), Duration::from_secs(60));
        let health_service = HealthService::new(db, scheduler.status());
        let server = TestServer::new(health_service.router).expect("Failed to create test server");

        let response = server.get("/health").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let health_response: HealthResponse = response.json();
        assert_eq!(health_response.status, "healthy");
        assert_eq!(health_response.database.status, "healthy");
        assert_eq!(health_response.version, env!("CARGO_PKG_VERSION"));
        assert!(health_response.scheduler.last_tick_at.is_none());
        assert_eq!(health_response.scheduler.ticks_completed, 0);
    }

    #[tokio::test]
    async fn test_health_endpoint_reports_last_tick() {
        let (db, _temp_dir) = create_test_db().await;
        let scheduler = SchedulerService::new(Vec::new(), Duration::from_secs(60));
        let now = Utc::now();
        let report: Option<TickReport> = scheduler.run_tick(now).await;
        assert!(report.is_some());

        let health_service = HealthService::new(db, scheduler.status());
        let server = TestServer::new(health_service.router).expect("Failed to create test server");

        let health_response: HealthResponse = server.get("/health").await.json();
        assert_eq!(health_response.scheduler.ticks_completed, 1);
        assert_eq!(
            health_response.scheduler.last_tick_at.map(|t| t.timestamp()),
            Some(now.timestamp())
        );
        assert_eq!(health_response.scheduler.last_tick_failures, 0);
    }

    #[tokio::test]
    async fn test_readiness_endpoint() {
        let (db, _temp_dir) = create_test_db().await;
        let scheduler = SchedulerService::new(Vec::new(), Duration::from_secs(60));
        let server = TestServer::new(HealthService::new(db, scheduler.status()).router)
            .expect("Failed to create test server");

        let response = server.get("/health/ready").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let ready_response: String = response.json();
        assert_eq!(ready_response, "ready");
    }

    #[tokio::test]
    async fn test_liveness_endpoint() {
        let (db, _temp_dir) = create_test_db().await;
        let scheduler = SchedulerService::new(Vec::new(), Duration::from_secs(60));
        let server = TestServer::new(HealthService::new(db, scheduler.status()).router)
            .expect("Failed to create test server");

        let alive_response: String = server.get("/health/live").await.json();
        assert_eq!(alive_response, "alive");
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub dependencies: HashMap<String, DependencyStatus>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyStatus {
    Healthy { status: String, latency_ms: u64 },
    Unhealthy { status: String, error: String },
}

#[async_trait]
pub trait DependencyChecker: Send + Sync {
    async fn check(&self) -> DependencyStatus;
}

pub struct PostgresChecker {
    pool: sqlx::PgPool,
}

impl PostgresChecker {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DependencyChecker for PostgresChecker {
    async fn check(&self) -> DependencyStatus {
        let start = Instant::now();
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => DependencyStatus::Healthy {
                status: "healthy".to_string(),
                latency_ms: start.elapsed().as_millis() as u64,
            },
            Err(e) => DependencyStatus::Unhealthy {
                status: "unhealthy".to_string(),
                error: e.to_string(),
            },
        }
    }
}

/// Named dependency checks plus process uptime.
#[derive(Clone)]
pub struct HealthService {
    checkers: Vec<(String, Arc<dyn DependencyChecker>)>,
    start_time: Instant,
}

impl HealthService {
    pub fn new() -> Self {
        Self {
            checkers: Vec::new(),
            start_time: Instant::now(),
        }
    }

    pub fn with_checker(mut self, name: &str, checker: Arc<dyn DependencyChecker>) -> Self {
        self.checkers.push((name.to_string(), checker));
        self
    }

    pub async fn check(&self) -> HealthResponse {
        let mut dependencies = HashMap::new();
        for (name, checker) in &self.checkers {
            let status = timeout(CHECK_TIMEOUT, checker.check())
                .await
                .unwrap_or_else(|_| DependencyStatus::Unhealthy {
                    status: "unhealthy".to_string(),
                    error: "timeout".to_string(),
                });
            dependencies.insert(name.clone(), status);
        }

        HealthResponse {
            status: determine_overall_status(&dependencies),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            dependencies,
        }
    }
}

impl Default for HealthService {
    fn default() -> Self {
        Self::new()
    }
}

fn determine_overall_status(dependencies: &HashMap<String, DependencyStatus>) -> String {
    let healthy = dependencies
        .values()
        .all(|status| matches!(status, DependencyStatus::Healthy { .. }));

    if healthy {
        "healthy".to_string()
    } else {
        "unhealthy".to_string()
    }
}

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

/// Kind of outbound request issued during discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Search,
    Page,
    Probe,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Search => "search",
            Self::Page => "page",
            Self::Probe => "probe",
        };
        f.write_str(name)
    }
}

/// Request metrics collector, shared by all workers
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    metrics: Arc<Mutex<Metrics>>,
}

/// Per-kind counters
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct KindCounts {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_duration_ms: u64,
}

/// Metrics data structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Metrics {
    /// Start time of the metrics collection
    pub start_time: DateTime<Utc>,

    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,

    pub by_kind: HashMap<RequestKind, KindCounts>,

    /// HTTP status code counts
    pub status_codes: HashMap<u16, usize>,
}

impl Metrics {
    /// Average request duration for a kind, in milliseconds
    pub fn average_ms(&self, kind: RequestKind) -> Option<u64> {
        self.by_kind.get(&kind)
            .filter(|counts| counts.total > 0)
            .map(|counts| counts.total_duration_ms / counts.total as u64)
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        let metrics = Metrics {
            start_time: Utc::now(),
            ..Default::default()
        };

        Self {
            metrics: Arc::new(Mutex::new(metrics)),
        }
    }

    /// Record a finished request
    pub async fn record_request(&self, kind: RequestKind, success: bool, duration_ms: u64, status_code: Option<u16>) {
        let mut metrics = self.metrics.lock().await;

        metrics.total_requests += 1;
        if success {
            metrics.successful_requests += 1;
        } else {
            metrics.failed_requests += 1;
        }

        let counts = metrics.by_kind.entry(kind).or_default();
        counts.total += 1;
        counts.total_duration_ms += duration_ms;
        if success {
            counts.successful += 1;
        } else {
            counts.failed += 1;
        }

        if let Some(code) = status_code {
            *metrics.status_codes.entry(code).or_default() += 1;
        }
    }

    /// Start timing a request
    pub fn start_timer(&self) -> RequestTimer {
        RequestTimer {
            start: Instant::now(),
        }
    }

    pub async fn get_metrics(&self) -> Metrics {
        self.metrics.lock().await.clone()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Request timer for measuring request durations
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// End timing and get the duration in milliseconds
    pub fn end(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

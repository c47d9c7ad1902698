use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, IntCounter, Opts, Registry, TextEncoder,
};
use std::time::{Duration, Instant};

/// Prometheus collectors for the gateway, registered on a private registry so
/// several instances can coexist in one process.
pub struct MetricsService {
    registry: Registry,
    http_requests: CounterVec,
    http_request_duration: HistogramVec,
    metered_calls: CounterVec,
    quota_exceeded_calls: IntCounter,
    queries_rejected: IntCounter,
    auth_failures: IntCounter,
}

impl MetricsService {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests = CounterVec::new(
            Opts::new("http_requests_total", "HTTP requests by method and status"),
            &["method", "status"],
        )?;
        let http_request_duration = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request latency"),
            &["method"],
        )?;
        let metered_calls = CounterVec::new(
            Opts::new("metered_calls_total", "Metered calls by endpoint"),
            &["endpoint"],
        )?;
        let quota_exceeded_calls = IntCounter::new(
            "quota_exceeded_calls_total",
            "Metered calls answered after the free quota was used up",
        )?;
        let queries_rejected =
            IntCounter::new("queries_rejected_total", "Statements refused by the query guard")?;
        let auth_failures =
            IntCounter::new("auth_failures_total", "Rejected logins and unauthenticated requests")?;

        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(http_request_duration.clone()))?;
        registry.register(Box::new(metered_calls.clone()))?;
        registry.register(Box::new(quota_exceeded_calls.clone()))?;
        registry.register(Box::new(queries_rejected.clone()))?;
        registry.register(Box::new(auth_failures.clone()))?;

        Ok(Self {
            registry,
            http_requests,
            http_request_duration,
            metered_calls,
            quota_exceeded_calls,
            queries_rejected,
            auth_failures,
        })
    }

    pub fn record_request(&self, method: &str, status: u16, duration: Duration) {
        self.http_requests
            .with_label_values(&[method, &status.to_string()])
            .inc();
        self.http_request_duration
            .with_label_values(&[method])
            .observe(duration.as_secs_f64());
    }

    pub fn record_metered_call(&self, endpoint: &str, quota_exceeded: bool) {
        self.metered_calls.with_label_values(&[endpoint]).inc();
        if quota_exceeded {
            self.quota_exceeded_calls.inc();
        }
    }

    pub fn record_query_rejected(&self) {
        self.queries_rejected.inc();
    }

    pub fn record_auth_failure(&self) {
        self.auth_failures.inc();
    }

    /// Text exposition format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

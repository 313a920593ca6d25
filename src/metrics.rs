//! Metrics collection and export module

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Opts, Registry, TextEncoder,
};

/// Global metrics registry
pub struct Metrics {
    registry: Registry,

    // Holder count poller
    pub holder_fetch_attempts: IntCounter,
    pub holder_fetch_failures: IntCounter,
    pub holder_fetch_retries: IntCounter,
    pub holder_count: IntGauge,
    pub holder_fetch_latency: Histogram,

    // Chat terminal
    pub chat_requests: IntCounter,
    pub chat_failures: IntCounter,

    // Agent creator
    pub agent_submissions: IntCounter,
}

impl Metrics {
    /// Create new metrics instance
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let holder_fetch_attempts = IntCounter::with_opts(Opts::new(
            "holder_fetch_attempts_total",
            "Total number of holder count fetch attempts",
        ))?;

        let holder_fetch_failures = IntCounter::with_opts(Opts::new(
            "holder_fetch_failures_total",
            "Number of failed holder count fetch attempts",
        ))?;

        let holder_fetch_retries = IntCounter::with_opts(Opts::new(
            "holder_fetch_retries_total",
            "Number of scheduled holder count retries",
        ))?;

        let holder_count =
            IntGauge::with_opts(Opts::new("holder_count", "Last fetched token account count"))?;

        let holder_fetch_latency = Histogram::with_opts(
            HistogramOpts::new("holder_fetch_latency_seconds", "getProgramAccounts latency")
                .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        )?;

        let chat_requests = IntCounter::with_opts(Opts::new(
            "chat_requests_total",
            "Total number of chat completion requests",
        ))?;

        let chat_failures = IntCounter::with_opts(Opts::new(
            "chat_failures_total",
            "Number of failed chat completion requests",
        ))?;

        let agent_submissions = IntCounter::with_opts(Opts::new(
            "agent_submissions_total",
            "Number of accepted agent creator submissions",
        ))?;

        // Register all metrics
        registry.register(Box::new(holder_fetch_attempts.clone()))?;
        registry.register(Box::new(holder_fetch_failures.clone()))?;
        registry.register(Box::new(holder_fetch_retries.clone()))?;
        registry.register(Box::new(holder_count.clone()))?;
        registry.register(Box::new(holder_fetch_latency.clone()))?;
        registry.register(Box::new(chat_requests.clone()))?;
        registry.register(Box::new(chat_failures.clone()))?;
        registry.register(Box::new(agent_submissions.clone()))?;

        Ok(Self {
            registry,
            holder_fetch_attempts,
            holder_fetch_failures,
            holder_fetch_retries,
            holder_count,
            holder_fetch_latency,
            chat_requests,
            chat_failures,
            agent_submissions,
        })
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Global metrics instance
pub fn metrics() -> &'static Metrics {
    static METRICS: once_cell::sync::Lazy<Metrics> =
        once_cell::sync::Lazy::new(|| Metrics::new().expect("Failed to initialize metrics"));
    &METRICS
}

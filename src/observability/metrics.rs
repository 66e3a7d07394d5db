use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub proximity_queries_total: IntCounterVec,
    pub proximity_query_latency_seconds: HistogramVec,
    pub campaigns_skipped_total: IntCounter,
    pub campaigns_stored: IntGauge,
    pub route_estimates_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let proximity_queries_total = IntCounterVec::new(
            Opts::new("proximity_queries_total", "Nearby-campaign queries by outcome"),
            &["outcome"],
        )
        .expect("valid proximity_queries_total metric");

        let proximity_query_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "proximity_query_latency_seconds",
                "Latency of nearby-campaign queries in seconds",
            ),
            &["outcome"],
        )
        .expect("valid proximity_query_latency_seconds metric");

        let campaigns_skipped_total = IntCounter::new(
            "campaigns_skipped_total",
            "Campaign records skipped by queries for lacking a usable location",
        )
        .expect("valid campaigns_skipped_total metric");

        let campaigns_stored = IntGauge::new("campaigns_stored", "Campaigns currently held")
            .expect("valid campaigns_stored metric");

        let route_estimates_total = IntCounterVec::new(
            Opts::new("route_estimates_total", "Route estimates by outcome"),
            &["outcome"],
        )
        .expect("valid route_estimates_total metric");

        registry
            .register(Box::new(proximity_queries_total.clone()))
            .expect("register proximity_queries_total");
        registry
            .register(Box::new(proximity_query_latency_seconds.clone()))
            .expect("register proximity_query_latency_seconds");
        registry
            .register(Box::new(campaigns_skipped_total.clone()))
            .expect("register campaigns_skipped_total");
        registry
            .register(Box::new(campaigns_stored.clone()))
            .expect("register campaigns_stored");
        registry
            .register(Box::new(route_estimates_total.clone()))
            .expect("register route_estimates_total");

        Self {
            registry,
            proximity_queries_total,
            proximity_query_latency_seconds,
            campaigns_skipped_total,
            campaigns_stored,
            route_estimates_total,
        }
    }

    pub fn record_query(&self, outcome: &str, elapsed_seconds: f64) {
        self.proximity_queries_total
            .with_label_values(&[outcome])
            .inc();
        self.proximity_query_latency_seconds
            .with_label_values(&[outcome])
            .observe(elapsed_seconds);
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

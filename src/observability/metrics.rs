use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub order_fetches_total: IntCounterVec,
    pub order_transitions_total: IntCounterVec,
    pub order_transition_latency_seconds: HistogramVec,
    pub order_collection_size: IntGaugeVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let order_fetches_total = IntCounterVec::new(
            Opts::new("order_fetches_total", "Order list fetches by status and outcome"),
            &["status", "outcome"],
        )?;

        let order_transitions_total = IntCounterVec::new(
            Opts::new(
                "order_transitions_total",
                "Order transitions by transition and outcome",
            ),
            &["transition", "outcome"],
        )?;

        let order_transition_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "order_transition_latency_seconds",
                "Latency of a transition including its refreshes, in seconds",
            ),
            &["transition"],
        )?;

        let order_collection_size = IntGaugeVec::new(
            Opts::new("order_collection_size", "Orders currently held per collection"),
            &["status"],
        )?;

        registry.register(Box::new(order_fetches_total.clone()))?;
        registry.register(Box::new(order_transitions_total.clone()))?;
        registry.register(Box::new(order_transition_latency_seconds.clone()))?;
        registry.register(Box::new(order_collection_size.clone()))?;

        Ok(Self {
            registry,
            order_fetches_total,
            order_transitions_total,
            order_transition_latency_seconds,
            order_collection_size,
        })
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

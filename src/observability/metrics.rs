use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;


// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Rotation metrics
    pub rotations: IntCounterVec,
    pub step_failures: IntCounterVec,
    pub step_duration: HistogramVec,

    // Secret store metrics
    pub versions_destroyed: IntCounter,

    // Exchange metrics
    pub exchange_responses: IntCounterVec,

    // Runtime
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        // Metric definitions are static, construction only fails on a programming error.
        let registry = Registry::new_custom(Some("tokenrotator".into()), None).expect("metrics registry");

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Rotation
            rotations: IntCounterVec::new(Opts::new("rotations_total", "Rotation invocations by outcome"),&["outcome"],).expect("rotations_total"),
            step_failures: IntCounterVec::new(Opts::new("step_failures_total", "Failed rotation steps"),&["step"],).expect("step_failures_total"),
            step_duration: HistogramVec::new(HistogramOpts::new("step_duration_seconds", "Rotation step duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),&["step"],).expect("step_duration_seconds"),

            // Secret store
            versions_destroyed: IntCounter::new("versions_destroyed_total", "Registration token versions destroyed").expect("versions_destroyed_total"),

            // Exchange
            exchange_responses: IntCounterVec::new(Opts::new("exchange_responses_total", "Registration endpoint answers by status class"),&["class"],).expect("exchange_responses_total"),

            up: IntGauge::new("up", "1 if service is healthy").expect("up"),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(metrics.rotations.clone()),
            Box::new(metrics.step_failures.clone()),
            Box::new(metrics.step_duration.clone()),
            Box::new(metrics.versions_destroyed.clone()),
            Box::new(metrics.exchange_responses.clone()),
            Box::new(metrics.up.clone()),
        ];
        for collector in collectors {
            reg.register(collector).expect("metric registered once");
        }

        metrics
    }
}

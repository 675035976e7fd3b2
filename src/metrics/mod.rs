use lazy_static::lazy_static;
use prometheus::exponential_buckets;
use prometheus::Encoder;
use prometheus::HistogramOpts;
use prometheus::HistogramVec;
use prometheus::IntCounterVec;
use prometheus::Opts;
use prometheus::Registry;
use tracing::error;


lazy_static! {
    pub static ref INSERTS_ISSUED: IntCounterVec = IntCounterVec::new(
        Opts::new("inserts_issued", "Inserts issued, by coordinator slot"),
        &["coordinator"]
    )
    .expect("metric can not be created");

    pub static ref KEYSPACES_VERIFIED: IntCounterVec = IntCounterVec::new(
        Opts::new("keyspaces_verified", "Keyspaces whose full-consistency read matched"),
        &["pass"]
    )
    .expect("metric can not be created");

    pub static ref SCENARIO_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("scenario_failures", "Scenario runs that failed, by phase"),
        &["phase"]
    )
    .expect("metric can not be created");

    pub static ref VERIFY_LATENCY_MS: HistogramVec = HistogramVec::new(
        HistogramOpts::new("verify_latency_ms", "Full-consistency read latency in ms")
            .buckets(exponential_buckets(1.0, 2.0, 12).expect("valid buckets")),
        &["pass"]
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = {
        let registry = Registry::new_custom(Some("ringcheck".to_string()), None)
            .expect("registry can be created");
        register_custom_metrics(&registry);
        registry
    };
}

pub(crate) fn register_custom_metrics(registry: &Registry) {
    registry
        .register(Box::new(INSERTS_ISSUED.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(KEYSPACES_VERIFIED.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(SCENARIO_FAILURES.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(VERIFY_LATENCY_MS.clone()))
        .expect("collector can be registered");
}

/// Prometheus text exposition of every scenario metric
pub fn render() -> String {
    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        error!("could not encode custom metrics: {}", e);
        return String::default();
    }
    match String::from_utf8(buffer) {
        Ok(v) => v,
        Err(e) => {
            error!("custom metrics could not be from_utf8'd: {}", e);
            String::default()
        }
    }
}

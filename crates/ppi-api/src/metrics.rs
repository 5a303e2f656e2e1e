//! Prometheus registry behind `/metrics`.
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    requests: IntCounterVec,
    records: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let requests = IntCounterVec::new(
            Opts::new("ppi_http_requests_total", "Requests served, by route and status"),
            &["route", "status"],
        )?;
        let records = IntGauge::new("ppi_records_loaded", "Report rows held in memory")?;
        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(records.clone()))?;
        Ok(Self {
            registry,
            requests,
            records,
        })
    }

    pub fn observe(&self, route: &str, status: u16) {
        self.requests
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    pub fn set_records(&self, count: usize) {
        self.records.set(count as i64);
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

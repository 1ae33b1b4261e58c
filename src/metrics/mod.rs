//! Metrics module for the application.
//!
//! - This module contains the global Prometheus registry.
//! - Defines the relay pipeline and system metrics.

use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use sysinfo::System;

lazy_static! {
    // Global Prometheus registry.
    pub static ref REGISTRY: Registry = Registry::new();

    // Counter: batches received from the spy.
    pub static ref BATCHES_OBSERVED: Counter = {
        let counter = Counter::new("relay_batches_observed_total", "Total number of signed batches received from the spy").unwrap();
        REGISTRY.register(Box::new(counter.clone())).unwrap();
        counter
    };

    // Counter: batches dropped by a stage, by reason.
    pub static ref BATCHES_DISCARDED: CounterVec = {
        let opts = Opts::new("relay_batches_discarded_total", "Total number of batches discarded by the pipeline");
        let counter_vec = CounterVec::new(opts, &["stage", "reason"]).unwrap();
        REGISTRY.register(Box::new(counter_vec.clone())).unwrap();
        counter_vec
    };

    // Counter: batches handed from the inspector to the deliverer.
    pub static ref BATCHES_FORWARDED: Counter = {
        let counter = Counter::new("relay_batches_forwarded_total", "Total number of batches approved for delivery").unwrap();
        REGISTRY.register(Box::new(counter.clone())).unwrap();
        counter
    };

    // Counter: delivery submissions per destination chain and outcome.
    pub static ref DELIVERIES: CounterVec = {
        let opts = Opts::new("relay_deliveries_total", "Total number of delivery submissions");
        let counter_vec = CounterVec::new(opts, &["destination", "status"]).unwrap();
        REGISTRY.register(Box::new(counter_vec.clone())).unwrap();
        counter_vec
    };

    // Counter: stage restarts performed by the supervisor.
    pub static ref STAGE_RESTARTS: CounterVec = {
        let opts = Opts::new("relay_stage_restarts_total", "Total number of pipeline stage restarts");
        let counter_vec = CounterVec::new(opts, &["stage"]).unwrap();
        REGISTRY.register(Box::new(counter_vec.clone())).unwrap();
        counter_vec
    };

    // Histogram for chain RPC latency in seconds.
    pub static ref GATEWAY_REQUEST_SECONDS: HistogramVec = {
      let histogram_opts = HistogramOpts::new("relay_gateway_request_seconds", "Chain RPC latency in seconds")
          .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]);
      let histogram_vec = HistogramVec::new(histogram_opts, &["operation"]).unwrap();
      REGISTRY.register(Box::new(histogram_vec.clone())).unwrap();
      histogram_vec
    };

    // Gauge for CPU usage percentage.
    pub static ref CPU_USAGE: Gauge = {
      let gauge = Gauge::new("cpu_usage_percentage", "Current CPU usage percentage").unwrap();
      REGISTRY.register(Box::new(gauge.clone())).unwrap();
      gauge
    };

    // Gauge for memory usage percentage.
    pub static ref MEMORY_USAGE_PERCENT: Gauge = {
      let gauge = Gauge::new("memory_usage_percentage", "Memory usage percentage").unwrap();
      REGISTRY.register(Box::new(gauge.clone())).unwrap();
      gauge
    };

    // Gauge for memory usage in bytes.
    pub static ref MEMORY_USAGE: Gauge = {
        let gauge = Gauge::new("memory_usage_bytes", "Memory usage in bytes").unwrap();
        REGISTRY.register(Box::new(gauge.clone())).unwrap();
        gauge
    };

    // Gauge for total memory in bytes.
    pub static ref TOTAL_MEMORY: Gauge = {
      let gauge = Gauge::new("total_memory_bytes", "Total memory in bytes").unwrap();
      REGISTRY.register(Box::new(gauge.clone())).unwrap();
      gauge
    };
}

/// Gather all metrics and encode into the provided format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(buffer)
}

fn memory_percentage(used: u64, total: u64) -> f64 {
    if total > 0 {
        (used as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Updates the system metrics for CPU and memory usage.
pub fn update_system_metrics() {
    let mut sys = System::new();
    sys.refresh_cpu_usage();
    sys.refresh_memory();

    CPU_USAGE.set(sys.global_cpu_usage() as f64);

    let total_memory = sys.total_memory();
    TOTAL_MEMORY.set(total_memory as f64);

    let memory_usage = sys.used_memory();
    MEMORY_USAGE.set(memory_usage as f64);
    MEMORY_USAGE_PERCENT.set(memory_percentage(memory_usage, total_memory));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_gather_metrics_contains_expected_names() {
        update_system_metrics();
        BATCHES_OBSERVED.inc();
        BATCHES_DISCARDED
            .with_label_values(&["inspector", "unknown_source_chain"])
            .inc();

        let metrics = gather_metrics().expect("failed to gather metrics");
        let output = String::from_utf8(metrics).expect("metrics output is not valid UTF-8");

        assert!(output.contains("cpu_usage_percentage"));
        assert!(output.contains("total_memory_bytes"));
        assert!(output.contains("relay_batches_observed_total"));
        assert!(output.contains("relay_batches_discarded_total"));
    }

    proptest! {
        #[test]
        fn prop_memory_percentage((total, used) in {
            (1u64..1_000_000u64).prop_flat_map(|total| {
                (Just(total), 0u64..=total)
            })
        }) {
            let percentage = memory_percentage(used, total);
            prop_assert!(percentage >= 0.0);
            prop_assert!(percentage <= 100.0);
        }
    }
}

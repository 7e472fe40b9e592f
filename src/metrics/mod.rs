//! Operation counters, snapshots, and export for the LRU cache.
//!
//! Recording, snapshotting, and export are separate concerns:
//!
//! - recorder traits ([`traits::CoreMetricsRecorder`],
//!   [`traits::LruMetricsRecorder`]) only write counters;
//! - [`traits::MetricsSnapshotProvider`] reads them out as a `Copy`
//!   [`snapshot::LruMetricsSnapshot`] for tests and benchmarks;
//! - [`traits::MetricsExporter`] publishes snapshots to monitoring systems
//!   ([`exporter::PrometheusTextExporter`] writes the Prometheus text
//!   exposition format).

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

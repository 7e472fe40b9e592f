//! Recorder, snapshot, and export traits for cache metrics.
//!
//! Recorders only write counters; snapshot providers only read them;
//! exporters only publish. Operations taking `&mut self` use the mutable
//! recorder traits, while `&self` read paths (`peek`, `peek_lru`,
//! `recency_rank`)
//! go through [`LruMetricsReadRecorder`], which relies on interior
//! mutability ([`MetricsCell`](crate::metrics::cell::MetricsCell)).

/// Counters common to any cache policy.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// Counters for recency-order operations.
pub trait LruMetricsRecorder: CoreMetricsRecorder {
    fn record_pop_lru_call(&mut self);
    fn record_pop_lru_found(&mut self);
    fn record_touch_call(&mut self);
    fn record_touch_found(&mut self);
}

/// Counters recordable from `&self` methods (uses interior mutability).
pub trait LruMetricsReadRecorder {
    fn record_peek_call(&self);
    fn record_peek_hit(&self);
    fn record_peek_lru_call(&self);
    fn record_peek_lru_found(&self);
    fn record_recency_rank_call(&self);
    fn record_recency_rank_found(&self);
    fn record_recency_rank_scan_step(&self);
}

/// Produce a point-in-time snapshot of recorded metrics.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Export/publish metrics snapshots to monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}

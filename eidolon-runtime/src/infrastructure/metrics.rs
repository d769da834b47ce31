// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Process Metrics (§10.7)
//!
//! Ambient, `prometheus`-backed counters and gauges for this process's own
//! operational visibility, mirroring what this codebase's binaries already
//! carry. Not a pipeline capability: no manifest or pipeline document field
//! turns this off or on, and no network exporter is wired up here — that is
//! left to whatever embeds this crate.

use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGaugeVec, Opts, Registry};

/// One process's worth of counters/gauges, registered against its own
/// private [`Registry`] so embedding binaries can expose it (or not)
/// without this crate reaching for the global default registry.
pub struct Metrics {
    pub registry: Registry,
    pub envelopes_published: IntCounter,
    pub envelopes_delivered: IntCounter,
    pub envelopes_dropped: IntCounter,
    pub translation_cache_hits: IntCounter,
    pub translation_cache_misses: IntCounter,
    pub mailbox_depth: IntGaugeVec,
    pub module_faults: IntCounterVec,
    pub shutdown_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let envelopes_published = IntCounter::with_opts(Opts::new(
            "eidolon_envelopes_published_total",
            "Envelopes published onto the bus across every topic",
        ))
        .expect("static metric options are well-formed");
        let envelopes_delivered = IntCounter::with_opts(Opts::new(
            "eidolon_envelopes_delivered_total",
            "Envelopes successfully enqueued into a subscriber mailbox",
        ))
        .expect("static metric options are well-formed");
        let envelopes_dropped = IntCounter::with_opts(Opts::new(
            "eidolon_envelopes_dropped_total",
            "Envelopes dropped by a mailbox overflow policy or a translation failure",
        ))
        .expect("static metric options are well-formed");
        let translation_cache_hits = IntCounter::with_opts(Opts::new(
            "eidolon_translation_cache_hits_total",
            "Coercion-rule lookups served from the translation cache",
        ))
        .expect("static metric options are well-formed");
        let translation_cache_misses = IntCounter::with_opts(Opts::new(
            "eidolon_translation_cache_misses_total",
            "Coercion-rule lookups that missed the translation cache",
        ))
        .expect("static metric options are well-formed");
        let mailbox_depth = IntGaugeVec::new(
            Opts::new("eidolon_mailbox_depth", "Pending envelopes queued in a slot's input mailbox"),
            &["slot_id", "input"],
        )
        .expect("static metric options are well-formed");
        let module_faults = IntCounterVec::new(
            Opts::new("eidolon_module_faults_total", "Module faults observed by the engine, by error_policy outcome"),
            &["slot_id", "outcome"],
        )
        .expect("static metric options are well-formed");
        let shutdown_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "eidolon_shutdown_duration_seconds",
            "Wall-clock time from shutdown trigger to every host task completing or being forced",
        ))
        .expect("static metric options are well-formed");

        for metric in [
            Box::new(envelopes_published.clone()) as Box<dyn prometheus::core::Collector>,
            Box::new(envelopes_delivered.clone()),
            Box::new(envelopes_dropped.clone()),
            Box::new(translation_cache_hits.clone()),
            Box::new(translation_cache_misses.clone()),
            Box::new(mailbox_depth.clone()),
            Box::new(module_faults.clone()),
            Box::new(shutdown_duration_seconds.clone()),
        ] {
            registry.register(metric).expect("metric names are unique within this registry");
        }

        Self {
            registry,
            envelopes_published,
            envelopes_delivered,
            envelopes_dropped,
            translation_cache_hits,
            translation_cache_misses,
            mailbox_depth,
            module_faults,
            shutdown_duration_seconds,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_metric_registers_without_name_collisions() {
        let metrics = Metrics::new();
        metrics.envelopes_published.inc();
        metrics.module_faults.with_label_values(&["crawler", "halt"]).inc();
        let families = metrics.registry.gather();
        assert!(families.iter().any(|f| f.get_name() == "eidolon_envelopes_published_total"));
    }
}

//! The diagnostics aggregator: fan one compilation unit out to every
//! registered rule collector and concatenate the results.

use std::panic::{catch_unwind, AssertUnwindSafe};

use jade_syntax::{CompilationUnit, Resolver};
use jade_types::Diagnostic;
use once_cell::sync::Lazy;

/// One rule collector per Jakarta sub-specification.
pub trait Collector: Send + Sync {
    /// Diagnostic source tag for this rule set (e.g. `"jakarta-servlet"`).
    fn source(&self) -> &'static str;

    fn collect(&self, unit: &CompilationUnit, resolver: &dyn Resolver, sink: &mut Vec<Diagnostic>);
}

// Registration order is fixed at process start; diagnostics are returned in
// this order, then in per-collector emission order. There is no global sort
// by source position.
static COLLECTORS: Lazy<Vec<Box<dyn Collector>>> = Lazy::new(|| {
    vec![
        Box::new(crate::bean_validation::BeanValidationCollector),
        Box::new(crate::servlet::ServletCollector),
        Box::new(crate::persistence::PersistenceCollector),
        Box::new(crate::websocket::WebSocketCollector),
        Box::new(crate::jsonb::JsonbCollector),
        Box::new(crate::jsonp::JsonpCollector),
        Box::new(crate::cdi::CdiCollector),
        Box::new(crate::jaxrs::JaxrsCollector),
        Box::new(crate::di::DiCollector),
        Box::new(crate::fault_tolerance::FaultToleranceCollector),
    ]
});

pub fn collectors() -> &'static [Box<dyn Collector>] {
    &COLLECTORS
}

/// Run every registered collector over `unit`, stamping each diagnostic with
/// its collector's source tag.
///
/// A `None` unit yields an empty list. A panicking collector contributes no
/// diagnostics and does not abort the others.
pub fn collect_diagnostics(unit: Option<&CompilationUnit>, resolver: &dyn Resolver) -> Vec<Diagnostic> {
    let Some(unit) = unit else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for collector in COLLECTORS.iter() {
        let mut sink = Vec::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            collector.collect(unit, resolver, &mut sink);
        }));
        match result {
            Ok(()) => {
                out.extend(sink.into_iter().map(|d| d.with_source(collector.source())));
            }
            Err(_) => {
                tracing::warn!(
                    source = collector.source(),
                    "rule collector panicked; treating it as having produced no diagnostics"
                );
            }
        }
    }
    out
}

/// Parse `source` and collect diagnostics. An unparsable source yields an
/// empty list, matching the "host resolution failure" contract.
pub fn analyze_source(source: &str, resolver: &dyn Resolver) -> Vec<Diagnostic> {
    match CompilationUnit::parse(source) {
        Ok(unit) => collect_diagnostics(Some(&unit), resolver),
        Err(err) => {
            tracing::debug!(error = %err, "failed to parse Java source");
            Vec::new()
        }
    }
}

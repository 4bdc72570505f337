//! MicroProfile Fault Tolerance rules: `@Fallback` target existence,
//! `@Asynchronous` return types and `@Retry` timing sanity.
//!
//! The whole collector is gated on the FT annotations actually being
//! resolvable, via the classpath index or the unit's own imports.

use std::collections::{HashMap, HashSet};

use jade_syntax::{simple_name, strip_generic_args, Annotation, CompilationUnit, Resolver, TypeDecl};
use jade_types::Diagnostic;

use crate::Collector;

pub const SOURCE: &str = "jakarta-micro-fault-tolerance";

pub const FALLBACK_METHOD_MISSING: &str = "FT_FALLBACK_METHOD_MISSING";
pub const ASYNC_RETURN_TYPE: &str = "FT_ASYNC_RETURN_TYPE";
pub const RETRY_DELAY_EXCEEDS_MAX: &str = "FT_RETRY_DELAY_EXCEEDS_MAX";

const FT_PKG: &str = "org.eclipse.microprofile.faulttolerance";
pub const FALLBACK: &str = "org.eclipse.microprofile.faulttolerance.Fallback";
pub const ASYNCHRONOUS: &str = "org.eclipse.microprofile.faulttolerance.Asynchronous";
pub const RETRY: &str = "org.eclipse.microprofile.faulttolerance.Retry";

/// Reactive return types honored by @Asynchronous when their library is on
/// the classpath.
const REACTIVE_RETURN_TYPES: &[(&str, &str)] = &[
    ("io.smallrye.mutiny.Uni", "Uni"),
    ("io.smallrye.mutiny.Multi", "Multi"),
    ("io.reactivex.rxjava3.core.Completable", "Completable"),
    ("io.reactivex.rxjava3.core.Flowable", "Flowable"),
    ("io.reactivex.rxjava3.core.Maybe", "Maybe"),
    ("io.reactivex.rxjava3.core.Observable", "Observable"),
    ("io.reactivex.rxjava3.core.Single", "Single"),
];

// Unspecified @Retry attributes: delay and jitter evaluate as 0, maxDuration
// as 180000; units default to milliseconds.
const DEFAULT_MAX_DURATION_MS: u128 = 180_000;

pub struct FaultToleranceCollector;

impl Collector for FaultToleranceCollector {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn collect(&self, unit: &CompilationUnit, resolver: &dyn Resolver, sink: &mut Vec<Diagnostic>) {
        if !resolver.classpath_has_prefix(FT_PKG) && !unit.imports_prefix(FT_PKG) {
            return;
        }

        // Per-call memo of declared method names, keyed by type name.
        let mut method_names: HashMap<&str, HashSet<&str>> = HashMap::new();

        for ty in unit.all_types() {
            for method in &ty.methods {
                for ann in &method.annotations {
                    if ann.simple_name == "Fallback"
                        && resolver.annotation_matches(unit, ann, FALLBACK)
                    {
                        check_fallback(ty, ann, &mut method_names, sink);
                    }
                    if ann.simple_name == "Asynchronous"
                        && resolver.annotation_matches(unit, ann, ASYNCHRONOUS)
                    {
                        check_async_return(resolver, &method.return_type, ann, sink);
                    }
                    if ann.simple_name == "Retry" && resolver.annotation_matches(unit, ann, RETRY) {
                        check_retry(ann, sink);
                    }
                }
            }
        }
    }
}

fn check_fallback<'u>(
    ty: &'u TypeDecl,
    ann: &Annotation,
    method_names: &mut HashMap<&'u str, HashSet<&'u str>>,
    sink: &mut Vec<Diagnostic>,
) {
    let Some(arg) = ann.arg("fallbackMethod") else {
        return;
    };
    let names = method_names
        .entry(ty.name.as_str())
        .or_insert_with(|| ty.methods.iter().map(|m| m.name.as_str()).collect());
    if !names.contains(arg.value.as_str()) {
        sink.push(Diagnostic::error(
            FALLBACK_METHOD_MISSING,
            format!(
                "The fallback method '{}' is not defined on class '{}'.",
                arg.value, ty.name
            ),
            Some(arg.span),
        ));
    }
}

fn check_async_return(
    resolver: &dyn Resolver,
    return_type: &str,
    ann: &Annotation,
    sink: &mut Vec<Diagnostic>,
) {
    let stripped = strip_generic_args(return_type);
    let base = stripped.trim();
    let simple = simple_name(base).unwrap_or(base);

    if matches!(simple, "Future" | "CompletionStage" | "CompletableFuture") {
        return;
    }
    let reactive_ok = REACTIVE_RETURN_TYPES
        .iter()
        .any(|(fqn, s)| *s == simple && resolver.class_on_classpath(fqn));
    if reactive_ok {
        return;
    }

    sink.push(
        Diagnostic::error(
            ASYNC_RETURN_TYPE,
            "Methods annotated with @Asynchronous must return Future or CompletionStage.",
            Some(ann.span),
        )
        .with_data(ASYNCHRONOUS),
    );
}

fn check_retry(ann: &Annotation, sink: &mut Vec<Diagnostic>) {
    let Some(delay) = duration_ms(ann, "delay", "delayUnit", 0) else {
        return;
    };
    let Some(jitter) = duration_ms(ann, "jitter", "jitterDelayUnit", 0) else {
        return;
    };
    let Some(max_duration) =
        duration_ms(ann, "maxDuration", "durationUnit", DEFAULT_MAX_DURATION_MS)
    else {
        return;
    };

    if delay + jitter >= max_duration {
        sink.push(Diagnostic::warning(
            RETRY_DELAY_EXCEEDS_MAX,
            "The effective delay, including jitter, can exceed maxDuration.",
            Some(ann.span),
        ));
    }
}

/// Read a numeric attribute and normalize it to milliseconds. Returns `None`
/// when the attribute is present but not a constant we can evaluate, which
/// disables the whole check rather than guessing.
fn duration_ms(ann: &Annotation, attr: &str, unit_attr: &str, default: u128) -> Option<u128> {
    let value = match ann.arg_value(attr) {
        Some(raw) => parse_long(raw)?,
        None => default,
    };
    let unit = ann
        .arg_value(unit_attr)
        .map(|u| u.rsplit('.').next().unwrap_or(u).to_owned())
        .unwrap_or_else(|| "MILLIS".to_owned());
    Some(to_millis(value, &unit))
}

fn parse_long(raw: &str) -> Option<u128> {
    let trimmed = raw.trim().trim_end_matches(['L', 'l']);
    let digits: String = trimmed.chars().filter(|c| *c != '_').collect();
    digits.parse().ok()
}

fn to_millis(value: u128, chrono_unit: &str) -> u128 {
    match chrono_unit {
        "NANOS" => value / 1_000_000,
        "MICROS" => value / 1_000,
        "MILLIS" => value,
        "SECONDS" => value * 1_000,
        "MINUTES" => value * 60_000,
        "HOURS" => value * 3_600_000,
        "HALF_DAYS" => value * 43_200_000,
        "DAYS" => value * 86_400_000,
        _ => value,
    }
}

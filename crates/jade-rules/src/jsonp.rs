//! JSON Processing rules: literal arguments to `Json.createPointer` must be
//! valid RFC 6901 pointers.
//!
//! This is the one expression-level rule, so it walks the retained
//! tree-sitter tree instead of the declaration snapshot.

use jade_syntax::{node_text, span_of, visit_nodes, CompilationUnit, Resolver};
use jade_types::Diagnostic;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::Collector;

pub const SOURCE: &str = "jakarta-jsonp";

pub const INVALID_POINTER: &str = "JSONP_INVALID_POINTER";

// Empty string (whole document) is handled separately.
static POINTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(/[^/]+)+$").unwrap());

pub struct JsonpCollector;

impl Collector for JsonpCollector {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn collect(&self, unit: &CompilationUnit, resolver: &dyn Resolver, sink: &mut Vec<Diagnostic>) {
        let _ = resolver;
        let root = unit.tree().root_node();
        visit_nodes(root, &mut |node| {
            if node.kind() != "method_invocation" {
                return;
            }
            let Some(name) = node.child_by_field_name("name") else {
                return;
            };
            if node_text(&unit.source, name) != "createPointer" {
                return;
            }
            let Some(object) = node.child_by_field_name("object") else {
                return;
            };
            if !receiver_is_json(unit, node_text(&unit.source, object)) {
                return;
            }
            let Some(args) = node.child_by_field_name("arguments") else {
                return;
            };
            // Only a single literal argument is checkable statically.
            if args.named_child_count() != 1 {
                return;
            }
            let arg = match args.named_child(0) {
                Some(a) if a.kind() == "string_literal" => a,
                _ => return,
            };
            let raw = node_text(&unit.source, arg);
            let value = raw.trim_matches('"');
            if !value.is_empty() && !POINTER_RE.is_match(value) {
                sink.push(Diagnostic::error(
                    INVALID_POINTER,
                    "Json.createPointer target must be a sequence of '/' prefixed tokens or an \
                     empty String.",
                    Some(span_of(arg)),
                ));
            }
        });
    }
}

/// Accept `Json.createPointer(...)` when the imports prove the receiver, or a
/// receiver written with the full package.
fn receiver_is_json(unit: &CompilationUnit, receiver: &str) -> bool {
    if receiver == "Json" {
        return unit.imports.iter().any(|imp| {
            imp.path == "jakarta.json.Json"
                || imp.path == "javax.json.Json"
                || imp.path == "jakarta.json.*"
                || imp.path == "javax.json.*"
        });
    }
    receiver == "jakarta.json.Json" || receiver == "javax.json.Json"
}

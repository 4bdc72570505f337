//! JSON Binding rules: creator uniqueness and `@JsonbTransient` exclusivity.

use jade_syntax::{Annotation, CompilationUnit, Resolver, Span};
use jade_types::Diagnostic;

use crate::Collector;

pub const SOURCE: &str = "jakarta-jsonb";

pub const MULTIPLE_CREATORS: &str = "JSONB_MULTIPLE_CREATORS";
pub const TRANSIENT_CONFLICT: &str = "JSONB_TRANSIENT_CONFLICT";

const JSONB_PKG: &str = "jakarta.json.bind.annotation.";
const JSONB_CREATOR: &str = "jakarta.json.bind.annotation.JsonbCreator";
const JSONB_TRANSIENT: &str = "jakarta.json.bind.annotation.JsonbTransient";

/// The rest of the `jakarta.json.bind.annotation` vocabulary; any of these on
/// a `@JsonbTransient` member is a conflict.
const OTHER_JSONB: &[&str] = &[
    "JsonbAnnotation",
    "JsonbCreator",
    "JsonbDateFormat",
    "JsonbNillable",
    "JsonbNumberFormat",
    "JsonbProperty",
    "JsonbPropertyOrder",
    "JsonbTypeAdapter",
    "JsonbTypeDeserializer",
    "JsonbTypeSerializer",
    "JsonbVisibility",
];

pub struct JsonbCollector;

impl Collector for JsonbCollector {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn collect(&self, unit: &CompilationUnit, resolver: &dyn Resolver, sink: &mut Vec<Diagnostic>) {
        for ty in unit.all_types() {
            check_creators(unit, resolver, ty, sink);
            for field in &ty.fields {
                check_transient(unit, resolver, &field.annotations, field.name_span, sink);
            }
            for method in &ty.methods {
                check_transient(unit, resolver, &method.annotations, method.name_span, sink);
            }
        }
    }
}

fn creator_annotation<'a>(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    annotations: &'a [Annotation],
) -> Option<&'a Annotation> {
    annotations
        .iter()
        .find(|a| a.simple_name == "JsonbCreator" && resolver.annotation_matches(unit, a, JSONB_CREATOR))
}

fn check_creators(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    ty: &jade_syntax::TypeDecl,
    sink: &mut Vec<Diagnostic>,
) {
    let mut creators: Vec<Span> = Vec::new();
    for ctor in &ty.constructors {
        if let Some(ann) = creator_annotation(unit, resolver, &ctor.annotations) {
            creators.push(ann.span);
        }
    }
    // Static factory methods count too.
    for method in &ty.methods {
        if method.modifiers.is_static() {
            if let Some(ann) = creator_annotation(unit, resolver, &method.annotations) {
                creators.push(ann.span);
            }
        }
    }
    if creators.len() > 1 {
        for span in creators {
            sink.push(Diagnostic::error(
                MULTIPLE_CREATORS,
                "Only one constructor or static factory method can be annotated with \
                 @JsonbCreator in a given class.",
                Some(span),
            ));
        }
    }
}

fn check_transient(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    annotations: &[Annotation],
    name_span: Span,
    sink: &mut Vec<Diagnostic>,
) {
    let transient = annotations
        .iter()
        .any(|a| a.simple_name == "JsonbTransient" && resolver.annotation_matches(unit, a, JSONB_TRANSIENT));
    if !transient {
        return;
    }
    let conflicting = annotations.iter().any(|a| {
        OTHER_JSONB.contains(&a.simple_name.as_str())
            && resolver.annotation_matches(unit, a, &format!("{JSONB_PKG}{}", a.simple_name))
    });
    if conflicting {
        sink.push(Diagnostic::error(
            TRANSIENT_CONFLICT,
            "A member annotated with @JsonbTransient must not be annotated with other \
             JSON Binding annotations.",
            Some(name_span),
        ));
    }
}

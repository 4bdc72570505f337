//! CDI managed-bean rules: scope cardinality, public-field scope restriction,
//! producer/injection conflicts and `@Disposes` placement.

use jade_syntax::{simple_name, Annotation, CompilationUnit, Resolver, TypeDecl, TypeKind};
use jade_types::Diagnostic;

use crate::Collector;

pub const SOURCE: &str = "jakarta-cdi";

pub const MULTIPLE_SCOPES: &str = "CDI_MULTIPLE_SCOPES";
pub const PUBLIC_FIELD_SCOPE: &str = "CDI_PUBLIC_FIELD_SCOPE";
pub const PRODUCES_INJECT_CONFLICT: &str = "CDI_PRODUCES_INJECT_CONFLICT";
pub const DISPOSES_MULTIPLE: &str = "CDI_DISPOSES_MULTIPLE";
pub const DISPOSES_ON_PRODUCER: &str = "CDI_DISPOSES_ON_PRODUCER";

pub const PRODUCES: &str = "jakarta.enterprise.inject.Produces";
pub const INJECT: &str = "jakarta.inject.Inject";
const DISPOSES: &str = "jakarta.enterprise.inject.Disposes";
const DEPENDENT: &str = "jakarta.enterprise.context.Dependent";

/// Bean scope annotations; a bean declares at most one.
const SCOPES: &[&str] = &[
    "jakarta.enterprise.context.ApplicationScoped",
    "jakarta.enterprise.context.ConversationScoped",
    "jakarta.enterprise.context.Dependent",
    "jakarta.enterprise.context.RequestScoped",
    "jakarta.enterprise.context.SessionScoped",
    "jakarta.inject.Singleton",
];

pub struct CdiCollector;

impl Collector for CdiCollector {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn collect(&self, unit: &CompilationUnit, resolver: &dyn Resolver, sink: &mut Vec<Diagnostic>) {
        for ty in unit.all_types() {
            if ty.kind == TypeKind::Class {
                check_scopes(unit, resolver, ty, sink);
            }

            let matches = |ann: &Annotation, fqn: &str| resolver.annotation_matches(unit, ann, fqn);

            for field in &ty.fields {
                let produces = field.annotations.iter().any(|a| matches(a, PRODUCES));
                let inject = field.annotations.iter().any(|a| matches(a, INJECT));
                if produces && inject {
                    sink.push(Diagnostic::error(
                        PRODUCES_INJECT_CONFLICT,
                        "@Produces and @Inject cannot be used on the same field.",
                        Some(field.name_span),
                    ));
                }
            }

            for method in &ty.methods {
                let produces = method.annotations.iter().any(|a| matches(a, PRODUCES));
                let inject = method.annotations.iter().any(|a| matches(a, INJECT));
                if produces && inject {
                    sink.push(Diagnostic::error(
                        PRODUCES_INJECT_CONFLICT,
                        "@Produces and @Inject cannot be used on the same method.",
                        Some(method.name_span),
                    ));
                }

                let disposes = method
                    .params
                    .iter()
                    .filter(|p| p.annotations.iter().any(|a| matches(a, DISPOSES)))
                    .count();
                if produces && disposes > 0 {
                    sink.push(Diagnostic::error(
                        DISPOSES_ON_PRODUCER,
                        "A @Produces method cannot declare a @Disposes parameter.",
                        Some(method.name_span),
                    ));
                }
                if disposes > 1 {
                    sink.push(Diagnostic::error(
                        DISPOSES_MULTIPLE,
                        "A method cannot declare more than one parameter annotated with @Disposes.",
                        Some(method.name_span),
                    ));
                }
            }
        }
    }
}

fn check_scopes(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    ty: &TypeDecl,
    sink: &mut Vec<Diagnostic>,
) {
    let scopes: Vec<&Annotation> = ty
        .annotations
        .iter()
        .filter(|a| {
            SCOPES.iter().any(|fqn| {
                simple_name(fqn) == Some(a.simple_name.as_str())
                    && resolver.annotation_matches(unit, a, fqn)
            })
        })
        .collect();

    if scopes.len() > 1 {
        let names: Vec<String> = scopes.iter().map(|a| format!("@{}", a.simple_name)).collect();
        sink.push(Diagnostic::error(
            MULTIPLE_SCOPES,
            format!(
                "A managed bean must specify at most one scope type annotation; found {}.",
                names.join(", ")
            ),
            Some(ty.name_span),
        ));
    }

    // Normal-scoped beans are proxied, and proxies cannot expose fields.
    let normal_scoped = scopes
        .iter()
        .any(|a| !resolver.annotation_matches(unit, a, DEPENDENT));
    if normal_scoped {
        for field in &ty.fields {
            if field.modifiers.is_public() && !field.modifiers.is_static() {
                sink.push(Diagnostic::error(
                    PUBLIC_FIELD_SCOPE,
                    "A managed bean with a non-static public field must have scope @Dependent.",
                    Some(field.name_span),
                ));
            }
        }
    }
}

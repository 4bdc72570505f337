//! JAX-RS resource rules: constructor accessibility, resource method
//! visibility and entity parameter cardinality.

use jade_syntax::{simple_name, Annotation, CompilationUnit, MethodDecl, ParamDecl, Resolver, TypeKind};
use jade_types::Diagnostic;

use crate::Collector;

pub const SOURCE: &str = "jakarta-jax_rs";

pub const NO_PUBLIC_CONSTRUCTOR: &str = "JAXRS_NO_PUBLIC_CONSTRUCTOR";
pub const METHOD_NOT_PUBLIC: &str = "JAXRS_METHOD_NOT_PUBLIC";
pub const MULTIPLE_ENTITY_PARAMS: &str = "JAXRS_MULTIPLE_ENTITY_PARAMS";

const PATH: &str = "jakarta.ws.rs.Path";

const HTTP_VERBS: &[&str] = &[
    "jakarta.ws.rs.DELETE",
    "jakarta.ws.rs.GET",
    "jakarta.ws.rs.HEAD",
    "jakarta.ws.rs.OPTIONS",
    "jakarta.ws.rs.PATCH",
    "jakarta.ws.rs.POST",
    "jakarta.ws.rs.PUT",
];

/// Parameter annotations that make a parameter non-entity.
const PARAM_ANNOTATIONS: &[&str] = &[
    "jakarta.ws.rs.BeanParam",
    "jakarta.ws.rs.CookieParam",
    "jakarta.ws.rs.FormParam",
    "jakarta.ws.rs.HeaderParam",
    "jakarta.ws.rs.MatrixParam",
    "jakarta.ws.rs.PathParam",
    "jakarta.ws.rs.QueryParam",
    "jakarta.ws.rs.container.Suspended",
    "jakarta.ws.rs.core.Context",
];

pub struct JaxrsCollector;

impl Collector for JaxrsCollector {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn collect(&self, unit: &CompilationUnit, resolver: &dyn Resolver, sink: &mut Vec<Diagnostic>) {
        for ty in unit.all_types() {
            if ty.kind != TypeKind::Class {
                continue;
            }

            let is_root_resource = ty
                .annotations
                .iter()
                .any(|a| a.simple_name == "Path" && resolver.annotation_matches(unit, a, PATH));
            if is_root_resource
                && ty.has_explicit_ctor()
                && !ty.constructors.iter().any(|c| c.modifiers.is_public())
            {
                sink.push(Diagnostic::error(
                    NO_PUBLIC_CONSTRUCTOR,
                    "Root resource classes are instantiated by the JAX-RS runtime and must \
                     have a public constructor.",
                    Some(ty.name_span),
                ));
            }

            for method in &ty.methods {
                if !is_resource_method(unit, resolver, method) {
                    continue;
                }
                if !method.modifiers.is_public() {
                    sink.push(Diagnostic::error(
                        METHOD_NOT_PUBLIC,
                        "Only public methods can be exposed as resource methods.",
                        Some(method.name_span),
                    ));
                }
                check_entity_params(unit, resolver, method, sink);
            }
        }
    }
}

fn is_resource_method(unit: &CompilationUnit, resolver: &dyn Resolver, method: &MethodDecl) -> bool {
    method.annotations.iter().any(|a| {
        HTTP_VERBS.iter().any(|fqn| {
            simple_name(fqn) == Some(a.simple_name.as_str())
                && resolver.annotation_matches(unit, a, fqn)
        })
    })
}

fn check_entity_params(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    method: &MethodDecl,
    sink: &mut Vec<Diagnostic>,
) {
    let entity_params: Vec<&ParamDecl> = method
        .params
        .iter()
        .filter(|p| !is_bound_param(unit, resolver, p))
        .collect();
    if entity_params.len() > 1 {
        for param in &entity_params[1..] {
            sink.push(Diagnostic::error(
                MULTIPLE_ENTITY_PARAMS,
                "Resource methods cannot have more than one entity parameter.",
                Some(param.span),
            ));
        }
    }
}

fn is_bound_param(unit: &CompilationUnit, resolver: &dyn Resolver, param: &ParamDecl) -> bool {
    param.annotations.iter().any(|a: &Annotation| {
        PARAM_ANNOTATIONS.iter().any(|fqn| {
            simple_name(fqn) == Some(a.simple_name.as_str())
                && resolver.annotation_matches(unit, a, fqn)
        })
    })
}

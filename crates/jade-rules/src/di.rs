//! Dependency injection rules: where `@Inject` may legally sit.

use jade_syntax::{Annotation, CompilationUnit, Resolver};
use jade_types::Diagnostic;

use crate::Collector;

pub const SOURCE: &str = "jakarta-di";

pub const INJECT_FINAL_FIELD: &str = "DI_INJECT_FINAL_FIELD";
pub const INJECT_FINAL_METHOD: &str = "DI_INJECT_FINAL_METHOD";
pub const INJECT_ABSTRACT_METHOD: &str = "DI_INJECT_ABSTRACT_METHOD";
pub const INJECT_STATIC_METHOD: &str = "DI_INJECT_STATIC_METHOD";
pub const INJECT_GENERIC_METHOD: &str = "DI_INJECT_GENERIC_METHOD";
pub const MULTIPLE_INJECT_CTORS: &str = "DI_MULTIPLE_INJECT_CTORS";

pub const INJECT: &str = "jakarta.inject.Inject";

pub struct DiCollector;

impl Collector for DiCollector {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn collect(&self, unit: &CompilationUnit, resolver: &dyn Resolver, sink: &mut Vec<Diagnostic>) {
        let inject = |annotations: &[Annotation]| {
            annotations
                .iter()
                .any(|a| a.simple_name == "Inject" && resolver.annotation_matches(unit, a, INJECT))
        };

        for ty in unit.all_types() {
            for field in &ty.fields {
                if inject(&field.annotations) && field.modifiers.is_final() {
                    sink.push(
                        Diagnostic::error(
                            INJECT_FINAL_FIELD,
                            "Injectable fields cannot be final.",
                            Some(field.name_span),
                        )
                        .with_data(INJECT),
                    );
                }
            }

            for method in &ty.methods {
                if !inject(&method.annotations) {
                    continue;
                }
                if method.modifiers.is_final() {
                    sink.push(
                        Diagnostic::error(
                            INJECT_FINAL_METHOD,
                            "Injectable methods cannot be final.",
                            Some(method.name_span),
                        )
                        .with_data(INJECT),
                    );
                }
                if method.modifiers.is_abstract() {
                    sink.push(
                        Diagnostic::error(
                            INJECT_ABSTRACT_METHOD,
                            "Injectable methods cannot be abstract.",
                            Some(method.name_span),
                        )
                        .with_data(INJECT),
                    );
                }
                if method.modifiers.is_static() {
                    sink.push(
                        Diagnostic::error(
                            INJECT_STATIC_METHOD,
                            "Injectable methods cannot be static.",
                            Some(method.name_span),
                        )
                        .with_data(INJECT),
                    );
                }
                if method.is_generic {
                    sink.push(
                        Diagnostic::error(
                            INJECT_GENERIC_METHOD,
                            "Injectable methods cannot declare their own type parameters.",
                            Some(method.name_span),
                        )
                        .with_data(INJECT),
                    );
                }
            }

            let inject_ctors: Vec<_> = ty
                .constructors
                .iter()
                .filter(|c| inject(&c.annotations))
                .collect();
            if inject_ctors.len() > 1 {
                for ctor in inject_ctors {
                    sink.push(Diagnostic::error(
                        MULTIPLE_INJECT_CTORS,
                        "A bean class can declare at most one constructor annotated with @Inject.",
                        Some(ctor.name_span),
                    ));
                }
            }
        }
    }
}

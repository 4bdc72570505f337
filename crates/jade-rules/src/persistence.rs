//! Persistence (JPA) rules: map-key annotation exclusivity and the structural
//! requirements `@Entity` places on a class.

use jade_syntax::{Annotation, CompilationUnit, Resolver, Span, TypeDecl, TypeKind};
use jade_types::Diagnostic;

use crate::Collector;

pub const SOURCE: &str = "jakarta-persistence";

pub const MAPKEY_EXCLUSIVE: &str = "PERSISTENCE_MAPKEY_EXCLUSIVE";
pub const MAPKEYJOINCOLUMN_ATTRIBUTES: &str = "PERSISTENCE_MAPKEYJOINCOLUMN_ATTRIBUTES";
pub const ENTITY_MISSING_CTOR: &str = "PERSISTENCE_ENTITY_MISSING_CTOR";
pub const ENTITY_FINAL_CLASS: &str = "PERSISTENCE_ENTITY_FINAL_CLASS";
pub const ENTITY_FINAL_MEMBER: &str = "PERSISTENCE_ENTITY_FINAL_MEMBER";

const MAP_KEY: &str = "jakarta.persistence.MapKey";
const MAP_KEY_CLASS: &str = "jakarta.persistence.MapKeyClass";
const MAP_KEY_JOIN_COLUMN: &str = "jakarta.persistence.MapKeyJoinColumn";
const ENTITY: &str = "jakarta.persistence.Entity";

pub struct PersistenceCollector;

impl Collector for PersistenceCollector {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn collect(&self, unit: &CompilationUnit, resolver: &dyn Resolver, sink: &mut Vec<Diagnostic>) {
        for ty in unit.all_types() {
            for field in &ty.fields {
                check_map_keys(unit, resolver, "A field", &field.annotations, field.name_span, sink);
            }
            for method in &ty.methods {
                check_map_keys(
                    unit,
                    resolver,
                    "A method",
                    &method.annotations,
                    method.name_span,
                    sink,
                );
            }

            if ty.kind == TypeKind::Class && has_entity_annotation(unit, resolver, ty) {
                check_entity(ty, sink);
            }
        }
    }
}

fn check_map_keys(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    element: &str,
    annotations: &[Annotation],
    name_span: Span,
    sink: &mut Vec<Diagnostic>,
) {
    let matches = |ann: &&Annotation, fqn: &str| resolver.annotation_matches(unit, ann, fqn);

    let map_key = annotations
        .iter()
        .find(|a| a.simple_name == "MapKey" && matches(a, MAP_KEY));
    let map_key_class = annotations
        .iter()
        .find(|a| a.simple_name == "MapKeyClass" && matches(a, MAP_KEY_CLASS));
    if map_key.is_some() && map_key_class.is_some() {
        sink.push(Diagnostic::error(
            MAPKEY_EXCLUSIVE,
            "@MapKeyClass and @MapKey annotations cannot be used on the same field or property.",
            Some(name_span),
        ));
    }

    let join_columns: Vec<&Annotation> = annotations
        .iter()
        .filter(|a| a.simple_name == "MapKeyJoinColumn" && matches(a, MAP_KEY_JOIN_COLUMN))
        .collect();
    if join_columns.len() > 1 {
        for ann in join_columns {
            if !ann.has_arg("name") || !ann.has_arg("referencedColumnName") {
                sink.push(Diagnostic::error(
                    MAPKEYJOINCOLUMN_ATTRIBUTES,
                    format!(
                        "{element} with multiple @MapKeyJoinColumn annotations must explicitly \
                         specify both the name and referencedColumnName attributes."
                    ),
                    Some(ann.span),
                ));
            }
        }
    }
}

fn has_entity_annotation(unit: &CompilationUnit, resolver: &dyn Resolver, ty: &TypeDecl) -> bool {
    ty.annotations
        .iter()
        .any(|a| a.simple_name == "Entity" && resolver.annotation_matches(unit, a, ENTITY))
}

fn check_entity(ty: &TypeDecl, sink: &mut Vec<Diagnostic>) {
    if ty.modifiers.is_final() {
        sink.push(Diagnostic::error(
            ENTITY_FINAL_CLASS,
            "Entity classes must not be final.",
            Some(ty.name_span),
        ));
    }

    let has_usable_ctor = ty
        .constructors
        .iter()
        .any(|c| c.is_no_arg() && (c.modifiers.is_public() || c.modifiers.is_protected()));
    if ty.has_explicit_ctor() && !has_usable_ctor {
        sink.push(Diagnostic::error(
            ENTITY_MISSING_CTOR,
            "Entity classes must have a public or protected no-argument constructor.",
            Some(ty.name_span),
        ));
    }

    for method in &ty.methods {
        if method.modifiers.is_final() {
            sink.push(Diagnostic::error(
                ENTITY_FINAL_MEMBER,
                "Entity classes must not declare final methods.",
                Some(method.name_span),
            ));
        }
    }
    for field in &ty.fields {
        // Static fields are not persistent state, so final is fine there.
        if field.modifiers.is_final() && !field.modifiers.is_static() {
            sink.push(Diagnostic::error(
                ENTITY_FINAL_MEMBER,
                "Entity classes must not declare final persistent fields.",
                Some(field.name_span),
            ));
        }
    }
}

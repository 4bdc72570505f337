//! Quick-fix proposals for the diagnostics emitted by `jade-rules`.
//!
//! Each diagnostic code maps to a fixed set of proposal generators. A
//! generator re-locates the triggering element through the diagnostic's span
//! (and the `data` payload where one is carried); when the element cannot be
//! found in the given unit the result is simply empty, never an error.

mod edits;

pub use edits::{
    add_annotation_attribute, extend_class, implement_interface, insert_no_arg_constructor,
    remove_annotation, remove_annotation_attribute, remove_modifier,
};

use jade_rules::{bean_validation, cdi, di, fault_tolerance, persistence, servlet, websocket};
use jade_syntax::{Annotation, CompilationUnit, Modifiers, Span, TypeDecl};
use jade_types::{CodeActionProposal, Diagnostic, TextEdit};

/// Compute the quick fixes for one diagnostic against the unit it was
/// produced from. The unit must be the same snapshot (or byte-identical
/// source); spans are how elements are found again.
pub fn proposals(unit: &CompilationUnit, diagnostic: &Diagnostic) -> Vec<CodeActionProposal> {
    let Some(span) = diagnostic.span else {
        return Vec::new();
    };
    let code = diagnostic.code;

    match code {
        bean_validation::CONSTRAINT_ON_STATIC => {
            let Some((ann, mods)) = annotation_site(unit, span) else {
                return Vec::new();
            };
            let mut out = vec![proposal(
                format!("Remove '@{}'", ann.simple_name),
                vec![remove_annotation(unit, ann)],
                code,
            )];
            if let Some(edit) = mods.and_then(|m| remove_modifier(unit, m, "static")) {
                out.push(proposal("Remove the 'static' modifier", vec![edit], code));
            }
            out
        }
        bean_validation::INVALID_CONSTRAINT_TYPE => {
            let Some((ann, _)) = annotation_site(unit, span) else {
                return Vec::new();
            };
            vec![proposal(
                format!("Remove '@{}'", ann.simple_name),
                vec![remove_annotation(unit, ann)],
                code,
            )]
        }

        servlet::FILTER_MISSING_IMPLEMENTS => {
            let Some(ty) = type_at(unit, span) else {
                return Vec::new();
            };
            let fqn = diagnostic.data.as_deref().unwrap_or(servlet::FILTER_INTERFACE);
            vec![proposal(
                format!("Let '{}' implement '{fqn}'", ty.name),
                vec![implement_interface(unit, ty, fqn)],
                code,
            )]
        }
        servlet::LISTENER_MISSING_IMPLEMENTS => {
            let Some(ty) = type_at(unit, span) else {
                return Vec::new();
            };
            servlet::LISTENER_INTERFACES
                .iter()
                .map(|fqn| {
                    proposal(
                        format!("Let '{}' implement '{fqn}'", ty.name),
                        vec![implement_interface(unit, ty, fqn)],
                        code,
                    )
                })
                .collect()
        }
        servlet::SERVLET_MISSING_EXTENDS => {
            let Some(ty) = type_at(unit, span) else {
                return Vec::new();
            };
            let fqn = diagnostic
                .data
                .as_deref()
                .unwrap_or(servlet::HTTP_SERVLET_CLASS);
            let Some(edit) = extend_class(unit, ty, fqn) else {
                return Vec::new();
            };
            vec![proposal(
                format!("Let '{}' extend '{fqn}'", ty.name),
                vec![edit],
                code,
            )]
        }
        servlet::FILTER_MISSING_ATTRIBUTE | servlet::SERVLET_MISSING_ATTRIBUTE => {
            let Some((ann, _)) = annotation_site(unit, span) else {
                return Vec::new();
            };
            vec![proposal(
                "Add the 'urlPatterns' attribute",
                vec![add_annotation_attribute(ann, "urlPatterns", "\"\"")],
                code,
            )]
        }
        servlet::FILTER_DUPLICATE_ATTRIBUTES | servlet::SERVLET_DUPLICATE_ATTRIBUTES => {
            let Some((ann, _)) = annotation_site(unit, span) else {
                return Vec::new();
            };
            ["value", "urlPatterns"]
                .iter()
                .filter_map(|attr| {
                    let edit = remove_annotation_attribute(unit, ann, attr)?;
                    Some(proposal(
                        format!("Remove the '{attr}' attribute"),
                        vec![edit],
                        code,
                    ))
                })
                .collect()
        }

        persistence::ENTITY_MISSING_CTOR | websocket::MISSING_NOARG_CTOR => {
            let Some(ty) = type_at(unit, span) else {
                return Vec::new();
            };
            vec![proposal(
                "Add a public no-argument constructor",
                vec![insert_no_arg_constructor(ty)],
                code,
            )]
        }
        persistence::ENTITY_FINAL_CLASS => {
            let Some(ty) = type_at(unit, span) else {
                return Vec::new();
            };
            remove_final(unit, &ty.modifiers, code)
        }
        persistence::ENTITY_FINAL_MEMBER => {
            let Some(member) = member_at(unit, span) else {
                return Vec::new();
            };
            remove_final(unit, member.modifiers, code)
        }

        cdi::PRODUCES_INJECT_CONFLICT => {
            let Some(member) = member_at(unit, span) else {
                return Vec::new();
            };
            ["Produces", "Inject"]
                .iter()
                .filter_map(|simple| {
                    let ann = member.annotation(simple)?;
                    Some(proposal(
                        format!("Remove '@{simple}'"),
                        vec![remove_annotation(unit, ann)],
                        code,
                    ))
                })
                .collect()
        }

        di::INJECT_FINAL_FIELD => {
            let Some(member) = member_at(unit, span) else {
                return Vec::new();
            };
            let mut out = remove_final(unit, member.modifiers, code);
            out.extend(remove_inject(unit, &member, code));
            out
        }
        di::INJECT_FINAL_METHOD | di::INJECT_ABSTRACT_METHOD | di::INJECT_STATIC_METHOD => {
            let keyword = match code {
                di::INJECT_FINAL_METHOD => "final",
                di::INJECT_ABSTRACT_METHOD => "abstract",
                _ => "static",
            };
            let Some(member) = member_at(unit, span) else {
                return Vec::new();
            };
            let mut out = Vec::new();
            if let Some(edit) = remove_modifier(unit, member.modifiers, keyword) {
                out.push(proposal(
                    format!("Remove the '{keyword}' modifier"),
                    vec![edit],
                    code,
                ));
            }
            out.extend(remove_inject(unit, &member, code));
            out
        }

        fault_tolerance::ASYNC_RETURN_TYPE => {
            let Some((ann, _)) = annotation_site(unit, span) else {
                return Vec::new();
            };
            vec![proposal(
                "Remove '@Asynchronous'",
                vec![remove_annotation(unit, ann)],
                code,
            )]
        }

        _ => Vec::new(),
    }
}

fn proposal(
    title: impl Into<String>,
    edits: Vec<TextEdit>,
    resolves: &'static str,
) -> CodeActionProposal {
    CodeActionProposal {
        title: title.into(),
        edits,
        resolves,
    }
}

fn remove_final(
    unit: &CompilationUnit,
    modifiers: &Modifiers,
    code: &'static str,
) -> Vec<CodeActionProposal> {
    remove_modifier(unit, modifiers, "final")
        .map(|edit| proposal("Remove the 'final' modifier", vec![edit], code))
        .into_iter()
        .collect()
}

fn remove_inject(
    unit: &CompilationUnit,
    member: &MemberSite<'_>,
    code: &'static str,
) -> Option<CodeActionProposal> {
    let ann = member.annotation("Inject")?;
    Some(proposal(
        "Remove '@Inject'",
        vec![remove_annotation(unit, ann)],
        code,
    ))
}

/// A field, method or constructor found again by its name span.
struct MemberSite<'a> {
    annotations: &'a [Annotation],
    modifiers: &'a Modifiers,
}

impl<'a> MemberSite<'a> {
    fn annotation(&self, simple: &str) -> Option<&'a Annotation> {
        self.annotations.iter().find(|a| a.simple_name == simple)
    }
}

fn member_at<'a>(unit: &'a CompilationUnit, span: Span) -> Option<MemberSite<'a>> {
    for ty in unit.all_types() {
        for field in &ty.fields {
            if field.name_span == span {
                return Some(MemberSite {
                    annotations: &field.annotations,
                    modifiers: &field.modifiers,
                });
            }
        }
        for method in &ty.methods {
            if method.name_span == span {
                return Some(MemberSite {
                    annotations: &method.annotations,
                    modifiers: &method.modifiers,
                });
            }
        }
        for ctor in &ty.constructors {
            if ctor.name_span == span {
                return Some(MemberSite {
                    annotations: &ctor.annotations,
                    modifiers: &ctor.modifiers,
                });
            }
        }
    }
    None
}

fn type_at<'a>(unit: &'a CompilationUnit, span: Span) -> Option<&'a TypeDecl> {
    unit.all_types().into_iter().find(|t| t.name_span == span)
}

fn annotation_site<'a>(
    unit: &'a CompilationUnit,
    span: Span,
) -> Option<(&'a Annotation, Option<&'a Modifiers>)> {
    fn scan<'a>(
        annotations: &'a [Annotation],
        modifiers: Option<&'a Modifiers>,
        span: Span,
    ) -> Option<(&'a Annotation, Option<&'a Modifiers>)> {
        annotations
            .iter()
            .find(|a| a.span == span)
            .map(|a| (a, modifiers))
    }

    for ty in unit.all_types() {
        if let Some(found) = scan(&ty.annotations, Some(&ty.modifiers), span) {
            return Some(found);
        }
        for field in &ty.fields {
            if let Some(found) = scan(&field.annotations, Some(&field.modifiers), span) {
                return Some(found);
            }
        }
        for method in &ty.methods {
            if let Some(found) = scan(&method.annotations, Some(&method.modifiers), span) {
                return Some(found);
            }
            for param in &method.params {
                if let Some(found) = scan(&param.annotations, None, span) {
                    return Some(found);
                }
            }
        }
        for ctor in &ty.constructors {
            if let Some(found) = scan(&ctor.annotations, Some(&ctor.modifiers), span) {
                return Some(found);
            }
        }
    }
    None
}

//! Servlet deployment-annotation rules: `@WebFilter`, `@WebListener` and
//! `@WebServlet` classes must wire into the right container contracts.

use jade_syntax::{simple_name, Annotation, CompilationUnit, Resolver, TypeDecl, TypeKind};
use jade_types::Diagnostic;

use crate::Collector;

pub const SOURCE: &str = "jakarta-servlet";

pub const FILTER_MISSING_IMPLEMENTS: &str = "SERVLET_FILTER_MISSING_IMPLEMENTS";
pub const FILTER_MISSING_ATTRIBUTE: &str = "SERVLET_FILTER_MISSING_ATTRIBUTE";
pub const FILTER_DUPLICATE_ATTRIBUTES: &str = "SERVLET_FILTER_DUPLICATE_ATTRIBUTES";
pub const LISTENER_MISSING_IMPLEMENTS: &str = "SERVLET_LISTENER_MISSING_IMPLEMENTS";
pub const SERVLET_MISSING_EXTENDS: &str = "SERVLET_SERVLET_MISSING_EXTENDS";
pub const SERVLET_MISSING_ATTRIBUTE: &str = "SERVLET_SERVLET_MISSING_ATTRIBUTE";
pub const SERVLET_DUPLICATE_ATTRIBUTES: &str = "SERVLET_SERVLET_DUPLICATE_ATTRIBUTES";

const WEB_FILTER: &str = "jakarta.servlet.annotation.WebFilter";
const WEB_LISTENER: &str = "jakarta.servlet.annotation.WebListener";
const WEB_SERVLET: &str = "jakarta.servlet.annotation.WebServlet";

pub const FILTER_INTERFACE: &str = "jakarta.servlet.Filter";
pub const HTTP_SERVLET_CLASS: &str = "jakarta.servlet.http.HttpServlet";

/// Interfaces a `@WebListener` class may implement.
pub const LISTENER_INTERFACES: &[&str] = &[
    "jakarta.servlet.ServletContextListener",
    "jakarta.servlet.ServletContextAttributeListener",
    "jakarta.servlet.ServletRequestListener",
    "jakarta.servlet.ServletRequestAttributeListener",
    "jakarta.servlet.http.HttpSessionListener",
    "jakarta.servlet.http.HttpSessionAttributeListener",
    "jakarta.servlet.http.HttpSessionIdListener",
];

pub struct ServletCollector;

impl Collector for ServletCollector {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn collect(&self, unit: &CompilationUnit, resolver: &dyn Resolver, sink: &mut Vec<Diagnostic>) {
        for ty in unit.all_types() {
            if ty.kind != TypeKind::Class {
                continue;
            }
            if let Some(ann) = find_annotation(unit, resolver, ty, WEB_FILTER) {
                check_filter(unit, resolver, ty, ann, sink);
            }
            if let Some(ann) = find_annotation(unit, resolver, ty, WEB_LISTENER) {
                check_listener(unit, resolver, ty, ann, sink);
            }
            if let Some(ann) = find_annotation(unit, resolver, ty, WEB_SERVLET) {
                check_servlet(unit, resolver, ty, ann, sink);
            }
        }
    }
}

fn find_annotation<'a>(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    ty: &'a TypeDecl,
    fqn: &str,
) -> Option<&'a Annotation> {
    let simple = simple_name(fqn)?;
    ty.annotations
        .iter()
        .find(|a| a.simple_name == simple && resolver.annotation_matches(unit, a, fqn))
}

fn check_filter(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    ty: &TypeDecl,
    ann: &Annotation,
    sink: &mut Vec<Diagnostic>,
) {
    if !resolver.type_implements(unit, ty, FILTER_INTERFACE) {
        sink.push(
            Diagnostic::error(
                FILTER_MISSING_IMPLEMENTS,
                "Annotated classes with @WebFilter must implement the Filter interface.",
                Some(ty.name_span),
            )
            .with_data(FILTER_INTERFACE),
        );
    }

    let value = ann.has_arg("value");
    let url_patterns = ann.has_arg("urlPatterns");
    let servlet_names = ann.has_arg("servletNames");
    if !value && !url_patterns && !servlet_names {
        sink.push(Diagnostic::error(
            FILTER_MISSING_ATTRIBUTE,
            "The annotation @WebFilter must define the attribute urlPatterns, servletNames or value.",
            Some(ann.span),
        ));
    }
    if value && url_patterns {
        sink.push(Diagnostic::error(
            FILTER_DUPLICATE_ATTRIBUTES,
            "The annotation @WebFilter can not have both value and urlPatterns specified at the same time.",
            Some(ann.span),
        ));
    }
}

fn check_listener(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    ty: &TypeDecl,
    _ann: &Annotation,
    sink: &mut Vec<Diagnostic>,
) {
    let implements_one = LISTENER_INTERFACES
        .iter()
        .any(|fqn| resolver.type_implements(unit, ty, fqn));
    if !implements_one {
        sink.push(Diagnostic::error(
            LISTENER_MISSING_IMPLEMENTS,
            "Annotated classes with @WebListener must implement one or more of the \
             ServletContextListener, ServletContextAttributeListener, ServletRequestListener, \
             ServletRequestAttributeListener, HttpSessionListener, HttpSessionAttributeListener \
             or HttpSessionIdListener interfaces.",
            Some(ty.name_span),
        ));
    }
}

fn check_servlet(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    ty: &TypeDecl,
    ann: &Annotation,
    sink: &mut Vec<Diagnostic>,
) {
    if !resolver.type_implements(unit, ty, HTTP_SERVLET_CLASS) {
        sink.push(
            Diagnostic::error(
                SERVLET_MISSING_EXTENDS,
                "Annotated classes with @WebServlet must extend the HttpServlet class.",
                Some(ty.name_span),
            )
            .with_data(HTTP_SERVLET_CLASS),
        );
    }

    let value = ann.has_arg("value");
    let url_patterns = ann.has_arg("urlPatterns");
    if !value && !url_patterns {
        sink.push(Diagnostic::error(
            SERVLET_MISSING_ATTRIBUTE,
            "The annotation @WebServlet must define the attribute urlPatterns or value.",
            Some(ann.span),
        ));
    }
    if value && url_patterns {
        sink.push(Diagnostic::error(
            SERVLET_DUPLICATE_ATTRIBUTES,
            "The annotation @WebServlet can not have both value and urlPatterns specified at the same time.",
            Some(ann.span),
        ));
    }
}

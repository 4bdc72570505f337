//! WebSocket endpoint rules: `@ServerEndpoint` path templates, lifecycle
//! method parameter legality, per-format `@OnMessage` uniqueness and the
//! endpoint constructor requirement.

use std::collections::HashSet;

use jade_syntax::{
    is_primitive, simple_name, strip_generic_args, unbox, Annotation, CompilationUnit, MethodDecl,
    ParamDecl, Resolver, TypeDecl, TypeKind,
};
use jade_types::Diagnostic;

use crate::Collector;

pub const SOURCE: &str = "jakarta-websocket";

pub const ENDPOINT_PATH: &str = "WS_ENDPOINT_PATH";
pub const ENDPOINT_DUPLICATE_VARIABLE: &str = "WS_ENDPOINT_DUPLICATE_VARIABLE";
pub const INVALID_PARAM: &str = "WS_INVALID_PARAM";
pub const MISSING_PATHPARAM_ANNOTATION: &str = "WS_MISSING_PATHPARAM_ANNOTATION";
pub const DUPLICATE_ONMESSAGE: &str = "WS_DUPLICATE_ONMESSAGE";
pub const MISSING_NOARG_CTOR: &str = "WS_MISSING_NOARG_CTOR";

const SERVER_ENDPOINT: &str = "jakarta.websocket.server.ServerEndpoint";
const CLIENT_ENDPOINT: &str = "jakarta.websocket.ClientEndpoint";
const ON_OPEN: &str = "jakarta.websocket.OnOpen";
const ON_CLOSE: &str = "jakarta.websocket.OnClose";
const ON_ERROR: &str = "jakarta.websocket.OnError";
const ON_MESSAGE: &str = "jakarta.websocket.OnMessage";
const PATH_PARAM: &str = "jakarta.websocket.server.PathParam";

/// Wire formats an `@OnMessage` method can consume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum MessageFormat {
    Text,
    Binary,
    Pong,
}

pub struct WebSocketCollector;

impl Collector for WebSocketCollector {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn collect(&self, unit: &CompilationUnit, resolver: &dyn Resolver, sink: &mut Vec<Diagnostic>) {
        for ty in unit.all_types() {
            if ty.kind != TypeKind::Class {
                continue;
            }
            let server = find_annotation(unit, resolver, ty, SERVER_ENDPOINT);
            let client = find_annotation(unit, resolver, ty, CLIENT_ENDPOINT);
            if server.is_none() && client.is_none() {
                continue;
            }

            if let Some(ann) = server {
                check_endpoint_path(ann, sink);
                if !ty.has_public_no_arg_ctor() {
                    sink.push(Diagnostic::error(
                        MISSING_NOARG_CTOR,
                        "Server endpoint classes must have a public no-argument constructor.",
                        Some(ty.name_span),
                    ));
                }
            }

            check_lifecycle_methods(unit, resolver, ty, sink);
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

fn check_endpoint_path(ann: &Annotation, sink: &mut Vec<Diagnostic>) {
    // @ServerEndpoint without a value is a compile error on its own.
    let Some(arg) = ann.arg("value") else {
        return;
    };
    let path = arg.value.as_str();
    let span = Some(arg.span);

    if !path.starts_with('/') {
        sink.push(Diagnostic::error(
            ENDPOINT_PATH,
            "Server endpoint paths must begin with a leading '/'.",
            span,
        ));
        return;
    }
    if path.contains("//")
        || path.contains("/./")
        || path.contains("/../")
        || path.ends_with("/.")
        || path.ends_with("/..")
    {
        sink.push(Diagnostic::error(
            ENDPOINT_PATH,
            "Server endpoint paths must not contain the sequences '//', '/./' or '/../'.",
            span,
        ));
        return;
    }

    let mut seen = HashSet::new();
    for segment in path[1..].split('/') {
        if let Some(variable) = segment
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
        {
            if !is_java_identifier(variable) {
                sink.push(Diagnostic::error(
                    ENDPOINT_PATH,
                    format!("'{{{variable}}}' is not a valid path template variable."),
                    span,
                ));
            } else if !seen.insert(variable) {
                sink.push(Diagnostic::error(
                    ENDPOINT_DUPLICATE_VARIABLE,
                    format!("Duplicate path template variable '{variable}'."),
                    span,
                ));
            }
        } else if segment.contains('{') || segment.contains('}') {
            sink.push(Diagnostic::error(
                ENDPOINT_PATH,
                "Path segments must be either a literal or a single template variable.",
                span,
            ));
        }
    }
}

fn is_java_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn check_lifecycle_methods(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    ty: &TypeDecl,
    sink: &mut Vec<Diagnostic>,
) {
    let mut formats_seen: HashSet<MessageFormat> = HashSet::new();

    for method in &ty.methods {
        let matches =
            |fqn: &str, simple: &str| -> bool {
                method.annotations.iter().any(|a| {
                    a.simple_name == simple && resolver.annotation_matches(unit, a, fqn)
                })
            };

        if matches(ON_OPEN, "OnOpen") {
            check_params(unit, resolver, method, &["Session", "EndpointConfig"], "OnOpen", sink);
        }
        if matches(ON_CLOSE, "OnClose") {
            check_params(unit, resolver, method, &["Session", "CloseReason"], "OnClose", sink);
        }
        if matches(ON_ERROR, "OnError") {
            check_params(unit, resolver, method, &["Session", "Throwable"], "OnError", sink);
        }
        if matches(ON_MESSAGE, "OnMessage") {
            let format = check_message_params(unit, resolver, method, sink);
            if let Some(format) = format {
                if !formats_seen.insert(format) {
                    sink.push(Diagnostic::error(
                        DUPLICATE_ONMESSAGE,
                        "An endpoint must declare at most one @OnMessage method per message format.",
                        Some(method.name_span),
                    ));
                }
            }
        }
    }
}

/// Parameters allowed on @OnOpen/@OnClose/@OnError: the listed context types,
/// plus `@PathParam`-annotated template parameters.
fn check_params(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    method: &MethodDecl,
    allowed: &[&str],
    lifecycle: &str,
    sink: &mut Vec<Diagnostic>,
) {
    for param in &method.params {
        let simple = param_simple_name(param);
        if allowed.contains(&simple.as_str()) {
            continue;
        }
        check_path_param(unit, resolver, param, &simple, lifecycle, sink);
    }
}

/// @OnMessage additionally allows the message payload itself and the
/// partial-delivery boolean; returns the wire format the payload implies.
fn check_message_params(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    method: &MethodDecl,
    sink: &mut Vec<Diagnostic>,
) -> Option<MessageFormat> {
    let mut format = None;
    for param in &method.params {
        let simple = param_simple_name(param);
        if simple == "Session" {
            continue;
        }
        // An annotated parameter is a path parameter, never the payload.
        if has_path_param(unit, resolver, param) {
            if !path_param_legal_type(&simple) {
                sink.push(Diagnostic::error(
                    INVALID_PARAM,
                    "Invalid parameter type for a method annotated with @OnMessage.",
                    Some(param.span),
                ));
            }
            continue;
        }
        if format.is_none() {
            if let Some(f) = message_format(param, &simple) {
                format = Some(f);
                continue;
            }
        }
        if unbox(&simple) == "boolean"
            && matches!(format, Some(MessageFormat::Text | MessageFormat::Binary))
        {
            // Partial-message flag following the payload parameter.
            continue;
        }
        check_path_param(unit, resolver, param, &simple, "OnMessage", sink);
    }
    format
}

fn has_path_param(unit: &CompilationUnit, resolver: &dyn Resolver, param: &ParamDecl) -> bool {
    param
        .annotations
        .iter()
        .any(|a| a.simple_name == "PathParam" && resolver.annotation_matches(unit, a, PATH_PARAM))
}

fn check_path_param(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    param: &ParamDecl,
    simple: &str,
    lifecycle: &str,
    sink: &mut Vec<Diagnostic>,
) {
    if path_param_legal_type(simple) {
        if !has_path_param(unit, resolver, param) {
            sink.push(Diagnostic::error(
                MISSING_PATHPARAM_ANNOTATION,
                format!(
                    "A String or primitive parameter of a method annotated with @{lifecycle} \
                     must be annotated with @PathParam."
                ),
                Some(param.span),
            ));
        }
    } else {
        sink.push(Diagnostic::error(
            INVALID_PARAM,
            format!("Invalid parameter type for a method annotated with @{lifecycle}."),
            Some(param.span),
        ));
    }
}

fn param_simple_name(param: &ParamDecl) -> String {
    let stripped = strip_generic_args(&param.ty);
    let base = stripped.trim();
    if base.ends_with("[]") {
        return base.to_owned();
    }
    simple_name(base).unwrap_or(base).to_owned()
}

fn path_param_legal_type(simple: &str) -> bool {
    simple == "String" || is_primitive(unbox(simple))
}

fn message_format(param: &ParamDecl, simple: &str) -> Option<MessageFormat> {
    if simple == "String" || simple == "Reader" {
        return Some(MessageFormat::Text);
    }
    if simple == "ByteBuffer" || simple == "InputStream" || param.ty.trim().ends_with("byte[]") {
        return Some(MessageFormat::Binary);
    }
    if simple == "PongMessage" {
        return Some(MessageFormat::Pong);
    }
    None
}

//! tree-sitter-java parsing into the [`CompilationUnit`] snapshot.

use std::cell::RefCell;

use jade_types::Span;
use tree_sitter::{Node, Parser, Tree};

use crate::model::{
    Annotation, AnnotationArg, CompilationUnit, ConstructorDecl, FieldDecl, Import, MethodDecl,
    Modifiers, ParamDecl, TypeDecl, TypeKind,
};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("tree-sitter-java language load failed")]
    Language,
    #[error("tree-sitter failed to produce a syntax tree")]
    NoTree,
}

thread_local! {
    static JAVA_PARSER: RefCell<Result<Parser, ParseError>> = RefCell::new({
        let mut parser = Parser::new();
        match parser.set_language(tree_sitter_java::language()) {
            Ok(()) => Ok(parser),
            Err(_) => Err(ParseError::Language),
        }
    });
}

pub(crate) fn parse_java(source: &str) -> Result<Tree, ParseError> {
    JAVA_PARSER.with(|parser_cell| {
        let mut parser = parser_cell
            .try_borrow_mut()
            .map_err(|_| ParseError::Language)?;
        let parser = match parser.as_mut() {
            Ok(parser) => parser,
            Err(err) => return Err(err.clone()),
        };
        parser.parse(source, None).ok_or(ParseError::NoTree)
    })
}

impl CompilationUnit {
    pub fn parse(source: &str) -> Result<CompilationUnit, ParseError> {
        let tree = parse_java(source)?;
        let root = tree.root_node();

        let mut package = None;
        let mut imports = Vec::new();
        let mut types = Vec::new();

        for idx in 0..root.named_child_count() {
            let Some(child) = root.named_child(idx) else {
                continue;
            };
            match child.kind() {
                "package_declaration" => {
                    package = parse_package(child, source);
                }
                "import_declaration" => {
                    if let Some(import) = parse_import(child, source) {
                        imports.push(import);
                    }
                }
                "class_declaration" | "interface_declaration" | "enum_declaration" => {
                    if let Some(ty) = parse_type_declaration(child, source) {
                        types.push(ty);
                    }
                }
                _ => {}
            }
        }

        Ok(CompilationUnit {
            source: source.to_string(),
            package,
            imports,
            types,
            tree,
        })
    }
}

fn parse_package(node: Node<'_>, source: &str) -> Option<String> {
    for idx in 0..node.named_child_count() {
        let child = node.named_child(idx)?;
        if matches!(child.kind(), "scoped_identifier" | "identifier") {
            return Some(node_text(source, child).to_string());
        }
    }
    None
}

fn parse_import(node: Node<'_>, source: &str) -> Option<Import> {
    // `import [static] a.b.C;` / `import a.b.*;`
    let text = node_text(source, node).trim();
    let rest = text.strip_prefix("import")?;
    let mut rest = rest.trim_start();
    let mut is_static = false;
    if let Some(after) = rest.strip_prefix("static") {
        if after.starts_with(char::is_whitespace) {
            is_static = true;
            rest = after.trim_start();
        }
    }
    let path: String = rest
        .trim_end_matches(';')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if path.is_empty() {
        return None;
    }
    Some(Import {
        path,
        is_static,
        span: span_of(node),
    })
}

fn parse_type_declaration(node: Node<'_>, source: &str) -> Option<TypeDecl> {
    let kind = match node.kind() {
        "class_declaration" => TypeKind::Class,
        "interface_declaration" => TypeKind::Interface,
        "enum_declaration" => TypeKind::Enum,
        _ => return None,
    };

    let (annotations, modifiers) = parse_modifiers(node, source);

    let name_node = node
        .child_by_field_name("name")
        .or_else(|| find_named_child(node, "identifier"))?;
    let name = node_text(source, name_node).to_string();

    let body = node
        .child_by_field_name("body")
        .or_else(|| find_named_child(node, "class_body"))
        .or_else(|| find_named_child(node, "interface_body"))
        .or_else(|| find_named_child(node, "enum_body"))?;

    let header = &source[node.start_byte()..body.start_byte()];
    let (superclass, interfaces, implements_kw) = parse_supertypes_from_header(header);
    let implements_kw_end = implements_kw.map(|idx| node.start_byte() + idx + "implements".len());

    let mut ty = TypeDecl {
        kind,
        name,
        annotations,
        modifiers,
        superclass,
        interfaces,
        fields: Vec::new(),
        methods: Vec::new(),
        constructors: Vec::new(),
        nested: Vec::new(),
        span: span_of(node),
        name_span: span_of(name_node),
        body_start: body.start_byte(),
        implements_kw_end,
    };

    parse_type_body(body, source, &mut ty);
    Some(ty)
}

fn parse_type_body(body: Node<'_>, source: &str, ty: &mut TypeDecl) {
    for idx in 0..body.named_child_count() {
        let Some(child) = body.named_child(idx) else {
            continue;
        };
        match child.kind() {
            "field_declaration" => ty.fields.extend(parse_field_declaration(child, source)),
            "method_declaration" => {
                if let Some(method) = parse_method_declaration(child, source) {
                    ty.methods.push(method);
                }
            }
            "constructor_declaration" => {
                if let Some(ctor) = parse_constructor_declaration(child, source) {
                    ty.constructors.push(ctor);
                }
            }
            "class_declaration" | "interface_declaration" | "enum_declaration" => {
                if let Some(nested) = parse_type_declaration(child, source) {
                    ty.nested.push(nested);
                }
            }
            // Enum member declarations live one level down.
            "enum_body_declarations" => parse_type_body(child, source, ty),
            _ => {}
        }
    }
}

fn parse_field_declaration(node: Node<'_>, source: &str) -> Vec<FieldDecl> {
    let (annotations, modifiers) = parse_modifiers(node, source);

    let ty_node = node
        .child_by_field_name("type")
        .or_else(|| infer_field_type_node(node));
    let ty = ty_node
        .map(|n| clean_type(node_text(source, n)))
        .unwrap_or_default();

    let mut fields = Vec::new();
    for idx in 0..node.named_child_count() {
        let Some(declarator) = node.named_child(idx) else {
            continue;
        };
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let name_node = declarator
            .child_by_field_name("name")
            .or_else(|| find_named_child(declarator, "identifier"));
        let Some(name_node) = name_node else {
            continue;
        };
        fields.push(FieldDecl {
            name: node_text(source, name_node).to_string(),
            ty: ty.clone(),
            annotations: annotations.clone(),
            modifiers: modifiers.clone(),
            span: span_of(node),
            name_span: span_of(name_node),
        });
    }
    fields
}

fn parse_method_declaration(node: Node<'_>, source: &str) -> Option<MethodDecl> {
    let (annotations, modifiers) = parse_modifiers(node, source);

    let name_node = node
        .child_by_field_name("name")
        .or_else(|| find_named_child(node, "identifier"))?;

    let ty_node = node
        .child_by_field_name("type")
        .or_else(|| infer_method_return_type_node(node));
    let return_type = ty_node
        .map(|n| clean_type(node_text(source, n)))
        .unwrap_or_default();

    let params = node
        .child_by_field_name("parameters")
        .or_else(|| find_named_child(node, "formal_parameters"))
        .map(|p| parse_parameters(p, source))
        .unwrap_or_default();

    let is_generic = find_named_child(node, "type_parameters").is_some();

    Some(MethodDecl {
        name: node_text(source, name_node).to_string(),
        return_type,
        params,
        annotations,
        modifiers,
        is_generic,
        span: span_of(node),
        name_span: span_of(name_node),
    })
}

fn parse_constructor_declaration(node: Node<'_>, source: &str) -> Option<ConstructorDecl> {
    let (annotations, modifiers) = parse_modifiers(node, source);

    let name_node = node
        .child_by_field_name("name")
        .or_else(|| find_named_child(node, "identifier"))?;

    let params = node
        .child_by_field_name("parameters")
        .or_else(|| find_named_child(node, "formal_parameters"))
        .map(|p| parse_parameters(p, source))
        .unwrap_or_default();

    Some(ConstructorDecl {
        params,
        annotations,
        modifiers,
        span: span_of(node),
        name_span: span_of(name_node),
    })
}

fn parse_parameters(params: Node<'_>, source: &str) -> Vec<ParamDecl> {
    let mut out = Vec::new();
    for idx in 0..params.named_child_count() {
        let Some(child) = params.named_child(idx) else {
            continue;
        };
        if !matches!(child.kind(), "formal_parameter" | "spread_parameter") {
            continue;
        }
        if let Some(param) = parse_parameter(child, source) {
            out.push(param);
        }
    }
    out
}

fn parse_parameter(node: Node<'_>, source: &str) -> Option<ParamDecl> {
    let (annotations, _modifiers) = parse_modifiers(node, source);

    let name_node = node
        .child_by_field_name("name")
        .or_else(|| find_named_child(node, "identifier"))?;

    let ty_node = node
        .child_by_field_name("type")
        .or_else(|| infer_param_type_node(node));
    let ty = ty_node
        .map(|n| clean_type(node_text(source, n)))
        .unwrap_or_default();

    Some(ParamDecl {
        name: node_text(source, name_node).to_string(),
        ty,
        annotations,
        span: span_of(node),
        name_span: span_of(name_node),
    })
}

const MODIFIER_KEYWORDS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "final",
    "abstract",
    "default",
    "synchronized",
    "native",
    "transient",
    "volatile",
    "strictfp",
    "sealed",
    "non-sealed",
];

/// Extract the annotations and modifier keywords attached to a declaration.
fn parse_modifiers(node: Node<'_>, source: &str) -> (Vec<Annotation>, Modifiers) {
    let Some(modifiers_node) = node
        .child_by_field_name("modifiers")
        .or_else(|| find_named_child(node, "modifiers"))
    else {
        return (Vec::new(), Modifiers::default());
    };

    let mut annotations = Vec::new();
    let mut keywords = Vec::new();

    let mut cursor = modifiers_node.walk();
    for child in modifiers_node.children(&mut cursor) {
        let kind = child.kind();
        if kind.ends_with("annotation") {
            if let Some(ann) = parse_annotation(child, source) {
                annotations.push(ann);
            }
        } else if MODIFIER_KEYWORDS.contains(&kind) {
            keywords.push((kind.to_string(), span_of(child)));
        }
    }

    (
        annotations,
        Modifiers {
            keywords,
            span: Some(span_of(modifiers_node)),
        },
    )
}

/// Parse a `marker_annotation` or `annotation` node.
fn parse_annotation(node: Node<'_>, source: &str) -> Option<Annotation> {
    let name_node = node
        .child_by_field_name("name")
        .or_else(|| find_named_child(node, "identifier"))
        .or_else(|| find_named_child(node, "scoped_identifier"))?;
    let written_name = node_text(source, name_node).to_string();
    let simple_name = written_name
        .rsplit('.')
        .next()
        .unwrap_or(&written_name)
        .to_string();

    let args_node = node
        .child_by_field_name("arguments")
        .or_else(|| find_named_child(node, "annotation_argument_list"));
    let args = args_node
        .map(|a| parse_annotation_args(a, source))
        .unwrap_or_default();

    Some(Annotation {
        written_name,
        simple_name,
        args,
        span: span_of(node),
        name_span: span_of(name_node),
        args_span: args_node.map(span_of),
    })
}

fn parse_annotation_args(args_node: Node<'_>, source: &str) -> Vec<AnnotationArg> {
    let mut out = Vec::new();
    for idx in 0..args_node.named_child_count() {
        let Some(child) = args_node.named_child(idx) else {
            continue;
        };
        if child.kind() == "element_value_pair" {
            let key = child
                .child_by_field_name("key")
                .or_else(|| find_named_child(child, "identifier"));
            let value = child.child_by_field_name("value");
            let (Some(key), Some(value)) = (key, value) else {
                continue;
            };
            out.push(AnnotationArg {
                name: node_text(source, key).to_string(),
                value: literal_text(source, value),
                span: span_of(child),
            });
        } else {
            // A single positional argument is recorded as `value`.
            out.push(AnnotationArg {
                name: "value".to_string(),
                value: literal_text(source, child),
                span: span_of(child),
            });
        }
    }
    out
}

fn literal_text(source: &str, node: Node<'_>) -> String {
    let text = node_text(source, node).trim();
    if (text.starts_with('"') && text.ends_with('"') && text.len() >= 2)
        || (text.starts_with('\'') && text.ends_with('\'') && text.len() >= 2)
    {
        return text[1..text.len() - 1].to_string();
    }
    text.to_string()
}

// -----------------------------------------------------------------------------
// Header `extends`/`implements` parsing (generics-aware text scan)
// -----------------------------------------------------------------------------

/// Returns `(superclass, interfaces, byte offset of the `implements` keyword
/// within the header)`.
fn parse_supertypes_from_header(header: &str) -> (Option<String>, Vec<String>, Option<usize>) {
    let mut superclass = None;
    let mut interfaces = Vec::new();
    let mut implements_idx = None;

    if let Some(idx) = find_keyword_top_level(header, "extends") {
        let after = header[idx + "extends".len()..].trim();
        let after = match find_keyword_top_level(after, "implements") {
            Some(impl_idx) => &after[..impl_idx],
            None => after,
        };
        // Interfaces use `extends A, B`; classes have a single supertype.
        let mut tys: Vec<String> = split_type_list(after)
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect();
        if tys.len() == 1 {
            superclass = tys.pop();
        } else {
            interfaces.extend(tys);
        }
    }

    if let Some(idx) = find_keyword_top_level(header, "implements") {
        implements_idx = Some(idx);
        let after = header[idx + "implements".len()..].trim();
        interfaces.extend(
            split_type_list(after)
                .into_iter()
                .filter(|t| !t.is_empty()),
        );
    }

    (superclass, interfaces, implements_idx)
}

fn split_type_list(list: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0u32;
    let mut current = String::new();
    for ch in list.chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                out.push(std::mem::take(&mut current));
                continue;
            }
            _ if depth == 0 => current.push(ch),
            _ => {}
        }
    }
    out.push(current);
    out.into_iter()
        .map(|t| t.split_whitespace().next().unwrap_or("").to_string())
        .collect()
}

fn find_keyword_top_level(haystack: &str, keyword: &str) -> Option<usize> {
    let mut depth: u32 = 0;
    let bytes = haystack.as_bytes();
    let kw = keyword.as_bytes();

    let mut i = 0usize;
    while i + kw.len() <= bytes.len() {
        match bytes[i] {
            b'<' => {
                depth += 1;
                i += 1;
                continue;
            }
            b'>' => {
                depth = depth.saturating_sub(1);
                i += 1;
                continue;
            }
            _ => {}
        }

        if depth == 0 && haystack[i..].starts_with(keyword) {
            let before_ok = i == 0 || !is_ident_continue(bytes[i - 1] as char);
            let after_ok =
                i + kw.len() >= bytes.len() || !is_ident_continue(bytes[i + kw.len()] as char);
            if before_ok && after_ok {
                return Some(i);
            }
        }

        i += 1;
    }
    None
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

// -----------------------------------------------------------------------------
// Node helpers
// -----------------------------------------------------------------------------

pub fn node_text<'a>(source: &'a str, node: Node<'_>) -> &'a str {
    &source[node.byte_range()]
}

pub fn span_of(node: Node<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

pub fn visit_nodes<'a, F: FnMut(Node<'a>)>(node: Node<'a>, f: &mut F) {
    f(node);
    if node.child_count() == 0 {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit_nodes(child, f);
    }
}

fn find_named_child<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    // Indexed access instead of the `named_children` iterator: in tree-sitter
    // 0.20 the iterator's cursor borrow must outlive `'a`.
    for idx in 0..node.named_child_count() {
        let child = node.named_child(idx)?;
        if child.kind() == kind {
            return Some(child);
        }
    }
    None
}

fn infer_field_type_node(node: Node<'_>) -> Option<Node<'_>> {
    // Field declarations are roughly: [modifiers] <type> <declarator> ...
    for idx in 0..node.named_child_count() {
        let child = node.named_child(idx)?;
        match child.kind() {
            k if k == "modifiers" || k.ends_with("annotation") => continue,
            "variable_declarator" => break,
            _ => return Some(child),
        }
    }
    None
}

fn infer_method_return_type_node(node: Node<'_>) -> Option<Node<'_>> {
    for idx in 0..node.named_child_count() {
        let child = node.named_child(idx)?;
        match child.kind() {
            k if k == "modifiers" || k == "type_parameters" || k.ends_with("annotation") => {
                continue
            }
            "identifier" => break,
            _ => return Some(child),
        }
    }
    None
}

fn infer_param_type_node(node: Node<'_>) -> Option<Node<'_>> {
    for idx in 0..node.named_child_count() {
        let child = node.named_child(idx)?;
        match child.kind() {
            k if k == "modifiers" || k.ends_with("annotation") => continue,
            "identifier" => break,
            _ => return Some(child),
        }
    }
    None
}

fn clean_type(raw: &str) -> String {
    raw.split_whitespace().collect::<String>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompilationUnit, TypeKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_imports_and_package() {
        let src = r#"
            package demo.app;

            import jakarta.validation.constraints.Email;
            import static java.util.Objects.requireNonNull;
            import jakarta.servlet.*;

            public class A {}
        "#;
        let unit = CompilationUnit::parse(src).unwrap();
        assert_eq!(unit.package.as_deref(), Some("demo.app"));
        assert_eq!(unit.imports.len(), 3);
        assert_eq!(unit.imports[0].path, "jakarta.validation.constraints.Email");
        assert!(unit.imports[1].is_static);
        assert!(unit.imports[2].is_wildcard());
        assert_eq!(unit.types[0].name, "A");
        assert_eq!(unit.types[0].kind, TypeKind::Class);
    }

    #[test]
    fn parses_members_with_annotations_and_modifiers() {
        let src = r#"
            import jakarta.validation.constraints.Size;

            public class Person {
                @Size(min = 1, max = 10)
                private static String name;

                public Person(String name) {}

                @Size
                public java.util.List<String> tags(int limit) { return null; }
            }
        "#;
        let unit = CompilationUnit::parse(src).unwrap();
        let person = &unit.types[0];

        let name = &person.fields[0];
        assert_eq!(name.name, "name");
        assert_eq!(name.ty, "String");
        assert!(name.modifiers.is_static());
        assert!(name.modifiers.is_private());
        let size = &name.annotations[0];
        assert_eq!(size.simple_name, "Size");
        assert_eq!(size.arg_value("min"), Some("1"));
        assert_eq!(size.arg_value("max"), Some("10"));

        assert_eq!(person.constructors.len(), 1);
        assert_eq!(person.constructors[0].params.len(), 1);

        let tags = &person.methods[0];
        assert_eq!(tags.return_type, "java.util.List<String>");
        assert_eq!(tags.params[0].ty, "int");
        assert_eq!(tags.annotations[0].simple_name, "Size");
    }

    #[test]
    fn parses_supertypes_and_nested_types() {
        let src = r#"
            public class Outer extends Base implements java.io.Serializable, Runnable {
                static class Inner {}
            }
        "#;
        let unit = CompilationUnit::parse(src).unwrap();
        let outer = &unit.types[0];
        assert_eq!(outer.superclass.as_deref(), Some("Base"));
        assert_eq!(
            outer.interfaces,
            vec!["java.io.Serializable".to_string(), "Runnable".to_string()]
        );
        assert!(outer.implements_kw_end.is_some());
        assert_eq!(outer.nested[0].name, "Inner");
        assert_eq!(unit.all_types().len(), 2);
    }

    #[test]
    fn positional_annotation_argument_is_value() {
        let src = r#"
            import jakarta.websocket.server.ServerEndpoint;

            @ServerEndpoint("/chat/{room}")
            public class Chat {}
        "#;
        let unit = CompilationUnit::parse(src).unwrap();
        let ann = &unit.types[0].annotations[0];
        assert_eq!(ann.simple_name, "ServerEndpoint");
        assert_eq!(ann.arg_value("value"), Some("/chat/{room}"));
    }

    #[test]
    fn generic_method_detection() {
        let src = "class A { <T> T id(T x) { return x; } void f() {} }";
        let unit = CompilationUnit::parse(src).unwrap();
        assert!(unit.types[0].methods[0].is_generic);
        assert!(!unit.types[0].methods[1].is_generic);
    }
}

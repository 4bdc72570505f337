//! The compilation-unit view: owned, immutable snapshots of the declarations
//! a rule collector cares about (types, members, parameters, annotations).
//!
//! The snapshot is built once per analysis call and never mutated; collectors
//! only read it. Expression-level rules that need more than declarations can
//! still walk the retained tree-sitter tree via [`CompilationUnit::tree`].

use jade_types::Span;
use tree_sitter::Tree;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
}

/// One annotation use, e.g. `@Size(min = 1, max = 10)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
    /// The name as written in source, possibly qualified
    /// (`jakarta.validation.constraints.Email`).
    pub written_name: String,
    pub simple_name: String,
    pub args: Vec<AnnotationArg>,
    pub span: Span,
    pub name_span: Span,
    /// Span of the argument list including parentheses, when present.
    pub args_span: Option<Span>,
}

impl Annotation {
    pub fn arg(&self, name: &str) -> Option<&AnnotationArg> {
        self.args.iter().find(|a| a.name == name)
    }

    pub fn has_arg(&self, name: &str) -> bool {
        self.arg(name).is_some()
    }

    pub fn arg_value(&self, name: &str) -> Option<&str> {
        self.arg(name).map(|a| a.value.as_str())
    }
}

/// A single `name = value` pair (or the positional `value`) of an annotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationArg {
    pub name: String,
    /// The literal value with string quotes stripped; non-literal expressions
    /// are kept as raw text.
    pub value: String,
    pub span: Span,
}

/// Modifier keywords attached to a declaration, with their individual spans
/// so quick fixes can remove one precisely.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub keywords: Vec<(String, Span)>,
    /// Span of the whole modifier list (annotations included), when present.
    pub span: Option<Span>,
}

impl Modifiers {
    pub fn has(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|(kw, _)| kw == keyword)
    }

    pub fn keyword_span(&self, keyword: &str) -> Option<Span> {
        self.keywords
            .iter()
            .find(|(kw, _)| kw == keyword)
            .map(|(_, span)| *span)
    }

    pub fn is_static(&self) -> bool {
        self.has("static")
    }

    pub fn is_final(&self) -> bool {
        self.has("final")
    }

    pub fn is_abstract(&self) -> bool {
        self.has("abstract")
    }

    pub fn is_public(&self) -> bool {
        self.has("public")
    }

    pub fn is_protected(&self) -> bool {
        self.has("protected")
    }

    pub fn is_private(&self) -> bool {
        self.has("private")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    /// Declared type as written, whitespace-collapsed (`List<Post>`).
    pub ty: String,
    pub annotations: Vec<Annotation>,
    pub modifiers: Modifiers,
    pub span: Span,
    pub name_span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: String,
    pub ty: String,
    pub annotations: Vec<Annotation>,
    pub span: Span,
    pub name_span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub return_type: String,
    pub params: Vec<ParamDecl>,
    pub annotations: Vec<Annotation>,
    pub modifiers: Modifiers,
    /// Whether the method declares its own type parameters.
    pub is_generic: bool,
    pub span: Span,
    pub name_span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstructorDecl {
    pub params: Vec<ParamDecl>,
    pub annotations: Vec<Annotation>,
    pub modifiers: Modifiers,
    pub span: Span,
    pub name_span: Span,
}

impl ConstructorDecl {
    pub fn is_no_arg(&self) -> bool {
        self.params.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub name: String,
    pub annotations: Vec<Annotation>,
    pub modifiers: Modifiers,
    /// `extends` clause type as written, generics stripped.
    pub superclass: Option<String>,
    /// `implements` clause types as written, generics stripped.
    pub interfaces: Vec<String>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub constructors: Vec<ConstructorDecl>,
    pub nested: Vec<TypeDecl>,
    pub span: Span,
    pub name_span: Span,
    /// Byte offset of the `{` opening the type body (insertion point for
    /// `implements`-style edits).
    pub body_start: usize,
    /// Offset just past the `implements` keyword, when the clause exists.
    pub implements_kw_end: Option<usize>,
}

impl TypeDecl {
    pub fn has_explicit_ctor(&self) -> bool {
        !self.constructors.is_empty()
    }

    /// Java supplies an implicit public no-arg constructor when none is
    /// declared.
    pub fn has_accessible_no_arg_ctor(&self) -> bool {
        if self.constructors.is_empty() {
            return true;
        }
        self.constructors
            .iter()
            .any(|c| c.is_no_arg() && !c.modifiers.is_private())
    }

    pub fn has_public_no_arg_ctor(&self) -> bool {
        if self.constructors.is_empty() {
            return true;
        }
        self.constructors
            .iter()
            .any(|c| c.is_no_arg() && c.modifiers.is_public())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub path: String,
    pub is_static: bool,
    pub span: Span,
}

impl Import {
    pub fn is_wildcard(&self) -> bool {
        self.path.ends_with(".*")
    }
}

/// The parsed representation of one Java source file.
pub struct CompilationUnit {
    pub source: String,
    pub package: Option<String>,
    pub imports: Vec<Import>,
    pub types: Vec<TypeDecl>,
    pub(crate) tree: Tree,
}

impl CompilationUnit {
    /// All type declarations in the unit, nested types after their owner,
    /// in declaration order.
    pub fn all_types(&self) -> Vec<&TypeDecl> {
        fn push<'a>(ty: &'a TypeDecl, out: &mut Vec<&'a TypeDecl>) {
            out.push(ty);
            for nested in &ty.nested {
                push(nested, out);
            }
        }
        let mut out = Vec::new();
        for ty in &self.types {
            push(ty, &mut out);
        }
        out
    }

    pub fn find_type(&self, simple_name: &str) -> Option<&TypeDecl> {
        self.all_types().into_iter().find(|t| t.name == simple_name)
    }

    pub fn text(&self, span: Span) -> &str {
        &self.source[span.start.min(self.source.len())..span.end.min(self.source.len())]
    }

    /// The retained tree-sitter tree for expression-level walks.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// True when any import path starts with `prefix` (dotted package prefix).
    pub fn imports_prefix(&self, prefix: &str) -> bool {
        self.imports.iter().any(|imp| imp.path.starts_with(prefix))
    }
}

impl std::fmt::Debug for CompilationUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompilationUnit")
            .field("package", &self.package)
            .field("imports", &self.imports.len())
            .field("types", &self.types.len())
            .finish()
    }
}

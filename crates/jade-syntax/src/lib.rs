//! Java compilation-unit snapshots for Jakarta EE analysis.
//!
//! This crate wraps tree-sitter-java into an immutable, fully-materialized
//! view of one Java source file (types, members, annotations, modifiers) and
//! provides the resolution facade the rule collectors consume. The snapshot
//! is built once per analysis call; nothing in it is shared mutable state.

mod model;
mod parse;
mod resolve;

pub use model::{
    Annotation, AnnotationArg, CompilationUnit, ConstructorDecl, FieldDecl, Import, MethodDecl,
    Modifiers, ParamDecl, TypeDecl, TypeKind,
};
pub use parse::{node_text, span_of, visit_nodes, ParseError};
pub use resolve::{
    is_primitive, javax_twin, simple_name, strip_generic_args, unbox, ClasspathIndex,
    ImportResolver, Resolver,
};

pub use jade_types::Span;

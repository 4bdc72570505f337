//! Jakarta EE annotation rule collectors.
//!
//! Each module validates one Jakarta sub-specification's annotation
//! vocabulary against a parsed [`CompilationUnit`]. Collectors are
//! independent, hold no cross-request state, and emit [`Diagnostic`]s with
//! stable codes; the aggregator runs them in a fixed registration order and
//! isolates per-collector faults.
//!
//! [`CompilationUnit`]: jade_syntax::CompilationUnit
//! [`Diagnostic`]: jade_types::Diagnostic

mod aggregate;
pub mod bean_validation;
pub mod cdi;
pub mod di;
pub mod fault_tolerance;
pub mod jaxrs;
pub mod jsonb;
pub mod jsonp;
pub mod persistence;
pub mod servlet;
pub mod websocket;

pub use aggregate::{analyze_source, collect_diagnostics, collectors, Collector};

pub use jade_syntax::{ClasspathIndex, CompilationUnit, ImportResolver, Resolver};
pub use jade_types::{Diagnostic, Severity, Span};

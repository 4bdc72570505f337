//! The host-facing layer: batch diagnostics and code actions over LSP types.
//!
//! A [`Workspace`] supplies document text and the classpath index; everything
//! else is computed per request from scratch. Analysis-level problems (missing
//! document, unparsable text) degrade to empty results so one bad file never
//! fails a batch; only boundary misuse surfaces as an error.

pub mod text;

use std::collections::HashMap;

use jade_rules::{CompilationUnit, ImportResolver};
use jade_syntax::ClasspathIndex;
use lsp_types::{
    CodeAction, CodeActionKind, CodeActionOrCommand, NumberOrString, Uri, WorkspaceEdit,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdeError {
    #[error("no document in the workspace for '{0}'")]
    UnknownDocument(String),
}

/// Host access to documents and the classpath.
pub trait Workspace: Send + Sync {
    fn file_text(&self, uri: &Uri) -> Option<&str>;
    fn classpath_types(&self) -> &ClasspathIndex;
}

/// In-memory [`Workspace`] used by tests and embedders without a real
/// document store.
#[derive(Default)]
pub struct MemoryWorkspace {
    files: HashMap<Uri, String>,
    classpath: ClasspathIndex,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_file(&mut self, uri: Uri, text: impl Into<String>) {
        self.files.insert(uri, text.into());
    }

    pub fn set_classpath(&mut self, classpath: ClasspathIndex) {
        self.classpath = classpath;
    }
}

impl Workspace for MemoryWorkspace {
    fn file_text(&self, uri: &Uri) -> Option<&str> {
        self.files.get(uri).map(String::as_str)
    }

    fn classpath_types(&self) -> &ClasspathIndex {
        &self.classpath
    }
}

/// How the client renders diagnostic messages. Messages are plain text
/// either way today; the parameter is carried through for hosts that
/// negotiate markdown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DocumentFormat {
    #[default]
    PlainText,
    Markdown,
}

/// Diagnostics for one requested document.
#[derive(Clone, Debug, PartialEq)]
pub struct FileDiagnostics {
    pub uri: Uri,
    pub diagnostics: Vec<lsp_types::Diagnostic>,
}

/// Analyze each document in `uris`, in order. Documents that cannot be
/// resolved or parsed produce an entry with no diagnostics.
pub fn collect_diagnostics(
    workspace: &dyn Workspace,
    uris: &[Uri],
    format: DocumentFormat,
) -> Vec<FileDiagnostics> {
    let _ = format;
    let resolver = ImportResolver::new(workspace.classpath_types().clone());

    uris.iter()
        .map(|uri| {
            let diagnostics = match workspace.file_text(uri) {
                Some(text) => jade_rules::analyze_source(text, &resolver)
                    .into_iter()
                    .map(|d| to_lsp_diagnostic(text, d))
                    .collect(),
                None => {
                    tracing::debug!(uri = uri.as_str(), "document not in workspace");
                    Vec::new()
                }
            };
            FileDiagnostics {
                uri: uri.clone(),
                diagnostics,
            }
        })
        .collect()
}

/// Quick fixes for one published diagnostic. The document is re-analyzed and
/// the diagnostic is matched back by code and range; a stale range that no
/// longer matches simply yields no actions.
pub fn code_actions(
    workspace: &dyn Workspace,
    uri: &Uri,
    diagnostic: &lsp_types::Diagnostic,
) -> Result<Vec<CodeActionOrCommand>, IdeError> {
    let Some(source) = workspace.file_text(uri) else {
        return Err(IdeError::UnknownDocument(uri.as_str().to_owned()));
    };
    let Ok(unit) = CompilationUnit::parse(source) else {
        return Ok(Vec::new());
    };
    let Some(selection) = text::range_to_span(source, diagnostic.range) else {
        return Ok(Vec::new());
    };
    let requested_code = match &diagnostic.code {
        Some(NumberOrString::String(code)) => Some(code.as_str()),
        _ => None,
    };

    let resolver = ImportResolver::new(workspace.classpath_types().clone());
    let mut actions = Vec::new();
    for diag in &jade_rules::collect_diagnostics(Some(&unit), &resolver) {
        if requested_code.is_some_and(|code| code != diag.code) {
            continue;
        }
        let Some(span) = diag.span else {
            continue;
        };
        if !span.intersects(selection) {
            continue;
        }
        for prop in jade_fixes::proposals(&unit, diag) {
            let edits = prop
                .edits
                .iter()
                .map(|e| lsp_types::TextEdit {
                    range: text::span_to_range(source, e.span),
                    new_text: e.new_text.clone(),
                })
                .collect();
            actions.push(CodeActionOrCommand::CodeAction(CodeAction {
                title: prop.title,
                kind: Some(CodeActionKind::QUICKFIX),
                diagnostics: Some(vec![diagnostic.clone()]),
                edit: Some(single_file_workspace_edit(uri, edits)),
                ..CodeAction::default()
            }));
        }
    }
    Ok(actions)
}

fn to_lsp_diagnostic(text: &str, diag: jade_types::Diagnostic) -> lsp_types::Diagnostic {
    lsp_types::Diagnostic {
        range: diag
            .span
            .map(|span| text::span_to_range(text, span))
            .unwrap_or_default(),
        severity: Some(match diag.severity {
            jade_types::Severity::Error => lsp_types::DiagnosticSeverity::ERROR,
            jade_types::Severity::Warning => lsp_types::DiagnosticSeverity::WARNING,
            jade_types::Severity::Info => lsp_types::DiagnosticSeverity::INFORMATION,
            jade_types::Severity::Hint => lsp_types::DiagnosticSeverity::HINT,
        }),
        code: Some(NumberOrString::String(diag.code.to_string())),
        source: Some(diag.source.to_string()),
        message: diag.message,
        data: diag.data.map(serde_json::Value::String),
        ..Default::default()
    }
}

fn single_file_workspace_edit(uri: &Uri, edits: Vec<lsp_types::TextEdit>) -> WorkspaceEdit {
    let mut changes = HashMap::new();
    changes.insert(uri.clone(), edits);
    WorkspaceEdit {
        changes: Some(changes),
        document_changes: None,
        change_annotations: None,
    }
}

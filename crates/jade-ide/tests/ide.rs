use jade_ide::{code_actions, collect_diagnostics, DocumentFormat, IdeError, MemoryWorkspace};
use lsp_types::{CodeActionOrCommand, DiagnosticSeverity, NumberOrString, Uri};
use pretty_assertions::assert_eq;

fn uri(s: &str) -> Uri {
    s.parse().expect("uri")
}

const GREETER: &str = r#"
import jakarta.inject.Inject;

public class Greeter {
    @Inject
    private final String greeting = "hi";
}
"#;

#[test]
fn batch_results_preserve_input_order() {
    let mut workspace = MemoryWorkspace::new();
    let good = uri("file:///src/Greeter.java");
    let missing = uri("file:///src/Missing.java");
    workspace.insert_file(good.clone(), GREETER);

    let results = collect_diagnostics(
        &workspace,
        &[good.clone(), missing.clone()],
        DocumentFormat::PlainText,
    );

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].uri, good);
    assert_eq!(results[0].diagnostics.len(), 1);
    assert_eq!(results[1].uri, missing);
    assert_eq!(results[1].diagnostics, Vec::new());
}

#[test]
fn diagnostics_carry_lsp_metadata() {
    let mut workspace = MemoryWorkspace::new();
    let file = uri("file:///src/Greeter.java");
    workspace.insert_file(file.clone(), GREETER);

    let results = collect_diagnostics(&workspace, &[file], DocumentFormat::Markdown);
    let diag = &results[0].diagnostics[0];

    assert_eq!(
        diag.code,
        Some(NumberOrString::String("DI_INJECT_FINAL_FIELD".into()))
    );
    assert_eq!(diag.source.as_deref(), Some("jakarta-di"));
    assert_eq!(diag.severity, Some(DiagnosticSeverity::ERROR));
    assert_eq!(
        diag.data,
        Some(serde_json::Value::String("jakarta.inject.Inject".into()))
    );
    // The range points at the field name, not the start of the file.
    assert_ne!(diag.range.start, diag.range.end);
}

#[test]
fn code_actions_round_trip_through_the_published_diagnostic() {
    let mut workspace = MemoryWorkspace::new();
    let file = uri("file:///src/Greeter.java");
    workspace.insert_file(file.clone(), GREETER);

    let published = collect_diagnostics(&workspace, &[file.clone()], DocumentFormat::PlainText)
        .remove(0)
        .diagnostics
        .remove(0);

    let actions = code_actions(&workspace, &file, &published).expect("workspace resolves");
    let titles: Vec<&str> = actions
        .iter()
        .map(|a| match a {
            CodeActionOrCommand::CodeAction(action) => action.title.as_str(),
            CodeActionOrCommand::Command(cmd) => cmd.title.as_str(),
        })
        .collect();
    assert_eq!(titles, vec!["Remove the 'final' modifier", "Remove '@Inject'"]);

    // Each action edits exactly the requested document.
    for action in &actions {
        let CodeActionOrCommand::CodeAction(action) = action else {
            panic!("expected a code action");
        };
        let changes = action.edit.as_ref().and_then(|e| e.changes.as_ref()).unwrap();
        assert!(changes.contains_key(&file));
    }
}

#[test]
fn unknown_document_is_a_boundary_error() {
    let workspace = MemoryWorkspace::new();
    let file = uri("file:///src/Nope.java");
    let published = lsp_types::Diagnostic::default();

    match code_actions(&workspace, &file, &published) {
        Err(IdeError::UnknownDocument(s)) => assert!(s.contains("Nope.java")),
        other => panic!("expected UnknownDocument, got {other:?}"),
    }
}

#[test]
fn stale_ranges_yield_no_actions() {
    let mut workspace = MemoryWorkspace::new();
    let file = uri("file:///src/Greeter.java");
    workspace.insert_file(file.clone(), GREETER);

    // Default range (0,0..0,0) matches nothing in the analyzed file.
    let stale = lsp_types::Diagnostic {
        code: Some(NumberOrString::String("DI_INJECT_FINAL_FIELD".into())),
        ..Default::default()
    };
    assert_eq!(code_actions(&workspace, &file, &stale).unwrap(), Vec::new());
}

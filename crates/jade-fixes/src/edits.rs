//! Text-edit builders shared by the quick-fix generators. All spans are byte
//! offsets into the unit's source.

use jade_syntax::{Annotation, CompilationUnit, Modifiers, TypeDecl};
use jade_types::{Span, TextEdit};

/// Delete an annotation. When the annotation sits on its own line the whole
/// line goes, indentation and newline included.
pub fn remove_annotation(unit: &CompilationUnit, ann: &Annotation) -> TextEdit {
    let bytes = unit.source.as_bytes();
    let mut start = ann.span.start;
    let mut end = ann.span.end;
    while end < bytes.len() && (bytes[end] == b' ' || bytes[end] == b'\t') {
        end += 1;
    }
    let line_start = unit.source[..start].rfind('\n').map_or(0, |i| i + 1);
    let own_line = unit.source[line_start..start]
        .chars()
        .all(|c| c == ' ' || c == '\t');
    if own_line && end < bytes.len() && bytes[end] == b'\n' {
        start = line_start;
        end += 1;
    }
    TextEdit::delete(Span::new(start, end))
}

/// Delete one modifier keyword and the spacing that follows it.
pub fn remove_modifier(
    unit: &CompilationUnit,
    modifiers: &Modifiers,
    keyword: &str,
) -> Option<TextEdit> {
    let span = modifiers.keyword_span(keyword)?;
    let bytes = unit.source.as_bytes();
    let mut end = span.end;
    while end < bytes.len() && bytes[end] == b' ' {
        end += 1;
    }
    Some(TextEdit::delete(Span::new(span.start, end)))
}

/// Add a `name = value` attribute, creating the argument list if the
/// annotation is a marker.
pub fn add_annotation_attribute(ann: &Annotation, name: &str, value: &str) -> TextEdit {
    match ann.args_span {
        Some(args) if ann.args.is_empty() => {
            TextEdit::insert(args.start + 1, format!("{name} = {value}"))
        }
        Some(args) => TextEdit::insert(args.start + 1, format!("{name} = {value}, ")),
        None => TextEdit::insert(ann.span.end, format!("({name} = {value})")),
    }
}

/// Remove a named attribute together with one adjoining comma.
pub fn remove_annotation_attribute(
    unit: &CompilationUnit,
    ann: &Annotation,
    name: &str,
) -> Option<TextEdit> {
    let arg = ann.arg(name)?;
    let bytes = unit.source.as_bytes();
    let mut start = arg.span.start;
    let mut end = arg.span.end;

    let mut fwd = end;
    while fwd < bytes.len() && matches!(bytes[fwd], b' ' | b'\t' | b'\n') {
        fwd += 1;
    }
    if fwd < bytes.len() && bytes[fwd] == b',' {
        fwd += 1;
        while fwd < bytes.len() && bytes[fwd] == b' ' {
            fwd += 1;
        }
        end = fwd;
    } else {
        let mut back = start;
        while back > 0 && matches!(bytes[back - 1], b' ' | b'\t' | b'\n') {
            back -= 1;
        }
        if back > 0 && bytes[back - 1] == b',' {
            start = back - 1;
        }
    }
    Some(TextEdit::delete(Span::new(start, end)))
}

/// Add `interface_fqn` to the type's `implements` clause, creating the clause
/// when absent. The fully qualified name keeps the edit independent of the
/// unit's imports.
pub fn implement_interface(unit: &CompilationUnit, ty: &TypeDecl, interface_fqn: &str) -> TextEdit {
    if let Some(kw_end) = ty.implements_kw_end {
        return TextEdit::insert(kw_end, format!(" {interface_fqn},"));
    }
    TextEdit::insert(ty.body_start, clause_text(unit, ty.body_start, "implements", interface_fqn))
}

/// Add an `extends` clause. Returns `None` when the type already extends
/// something; rewriting an existing superclass is not a safe automatic fix.
pub fn extend_class(unit: &CompilationUnit, ty: &TypeDecl, class_fqn: &str) -> Option<TextEdit> {
    if ty.superclass.is_some() {
        return None;
    }
    let pos = ty
        .implements_kw_end
        .map_or(ty.body_start, |end| end - "implements".len());
    Some(TextEdit::insert(pos, clause_text(unit, pos, "extends", class_fqn)))
}

fn clause_text(unit: &CompilationUnit, pos: usize, keyword: &str, fqn: &str) -> String {
    let needs_space = pos > 0 && !unit.source.as_bytes()[pos - 1].is_ascii_whitespace();
    if needs_space {
        format!(" {keyword} {fqn} ")
    } else {
        format!("{keyword} {fqn} ")
    }
}

/// Insert a public no-argument constructor at the top of the type body.
pub fn insert_no_arg_constructor(ty: &TypeDecl) -> TextEdit {
    TextEdit::insert(
        ty.body_start + 1,
        format!("\n    public {}() {{\n    }}\n", ty.name),
    )
}

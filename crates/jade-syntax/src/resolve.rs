//! Annotation and type resolution over a single compilation unit.
//!
//! The analysis treats resolution as an oracle: a name either provably
//! resolves to the Jakarta type a rule cares about, or the rule is not
//! applicable. Nothing here errors; "don't know" is always `false` on the
//! side that avoids fabricating diagnostics.

use std::collections::HashSet;

use crate::model::{Annotation, CompilationUnit, Import, TypeDecl};

/// The set of fully-qualified type names the host says are on the project's
/// classpath. Used to gate rule sets and to extend allow-lists.
#[derive(Clone, Debug, Default)]
pub struct ClasspathIndex {
    types: HashSet<String>,
}

impl ClasspathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, fqn: impl Into<String>) {
        self.types.insert(fqn.into());
    }

    pub fn contains(&self, fqn: &str) -> bool {
        self.types.contains(fqn)
    }

    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.types.iter().any(|name| name.starts_with(prefix))
    }
}

impl<S: Into<String>> FromIterator<S> for ClasspathIndex {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            types: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Resolution facade consumed by the rule collectors.
pub trait Resolver: Send + Sync {
    /// Does this annotation use resolve to `expected_fqn`?
    ///
    /// A simple-name use only matches when the unit's imports prove it; an
    /// unrelated user-defined annotation with the same simple name must not
    /// trigger Jakarta rules.
    fn annotation_matches(
        &self,
        unit: &CompilationUnit,
        ann: &Annotation,
        expected_fqn: &str,
    ) -> bool;

    /// Does the declared type implement (or extend, transitively within the
    /// unit) the candidate interface/class?
    fn type_implements(&self, unit: &CompilationUnit, ty: &TypeDecl, candidate_fqn: &str) -> bool;

    /// Is the type written as `type_text` (a field/parameter/return type)
    /// assignable to the candidate? Combines a fixed JDK table with
    /// unit-local hierarchy walks.
    fn type_reference_is(
        &self,
        unit: &CompilationUnit,
        type_text: &str,
        candidate_fqn: &str,
    ) -> bool;

    fn class_on_classpath(&self, fqn: &str) -> bool;

    fn classpath_has_prefix(&self, prefix: &str) -> bool;
}

/// Default [`Resolver`] backed by the unit's import table and a host-supplied
/// [`ClasspathIndex`].
#[derive(Debug, Default)]
pub struct ImportResolver {
    classpath: ClasspathIndex,
}

impl ImportResolver {
    pub fn new(classpath: ClasspathIndex) -> Self {
        Self { classpath }
    }
}

impl Resolver for ImportResolver {
    fn annotation_matches(
        &self,
        unit: &CompilationUnit,
        ann: &Annotation,
        expected_fqn: &str,
    ) -> bool {
        let twin = javax_twin(expected_fqn);

        if ann.written_name.contains('.') {
            return ann.written_name == expected_fqn || Some(ann.written_name.as_str()) == twin.as_deref();
        }

        let Some(expected_simple) = simple_name(expected_fqn) else {
            return false;
        };
        if ann.simple_name != expected_simple {
            return false;
        }

        unit.imports.iter().any(|imp| {
            import_provides(imp, expected_fqn)
                || twin.as_deref().is_some_and(|t| import_provides(imp, t))
        })
    }

    fn type_implements(&self, unit: &CompilationUnit, ty: &TypeDecl, candidate_fqn: &str) -> bool {
        let mut seen = HashSet::new();
        type_implements_impl(unit, ty, candidate_fqn, &mut seen)
    }

    fn type_reference_is(
        &self,
        unit: &CompilationUnit,
        type_text: &str,
        candidate_fqn: &str,
    ) -> bool {
        let base = strip_generic_args(type_text);
        let base = base.trim();
        if base.is_empty() {
            return false;
        }
        let twin = javax_twin(candidate_fqn);
        if base == candidate_fqn || Some(base) == twin.as_deref() {
            return true;
        }

        let Some(base_simple) = simple_name(base) else {
            return false;
        };
        let Some(candidate_simple) = simple_name(candidate_fqn) else {
            return false;
        };

        if base_simple == candidate_simple && !import_conflicts(unit, base_simple, candidate_fqn) {
            return true;
        }

        if jdk_is_subtype(base_simple, candidate_fqn) {
            return true;
        }

        // Custom subtypes declared in the same unit.
        if let Some(decl) = unit.find_type(base_simple) {
            let mut seen = HashSet::new();
            return type_implements_impl(unit, decl, candidate_fqn, &mut seen);
        }

        false
    }

    fn class_on_classpath(&self, fqn: &str) -> bool {
        self.classpath.contains(fqn)
    }

    fn classpath_has_prefix(&self, prefix: &str) -> bool {
        self.classpath.contains_prefix(prefix)
    }
}

fn type_implements_impl(
    unit: &CompilationUnit,
    ty: &TypeDecl,
    candidate_fqn: &str,
    seen: &mut HashSet<String>,
) -> bool {
    if !seen.insert(ty.name.clone()) {
        return false;
    }

    let twin = javax_twin(candidate_fqn);
    let candidate_simple = match simple_name(candidate_fqn) {
        Some(simple) => simple,
        None => return false,
    };

    let supertypes = ty
        .interfaces
        .iter()
        .map(String::as_str)
        .chain(ty.superclass.as_deref());

    for raw in supertypes {
        let base = strip_generic_args(raw);
        let base = base.trim();
        if base == candidate_fqn || Some(base) == twin.as_deref() {
            return true;
        }
        let Some(base_simple) = simple_name(base) else {
            continue;
        };
        // Simple-name match counts unless an import proves the name resolves
        // elsewhere; "must implement X" rules should not fire on unresolvable
        // hierarchies.
        if base_simple == candidate_simple && !import_conflicts(unit, base_simple, candidate_fqn) {
            return true;
        }
        if let Some(decl) = unit.find_type(base_simple) {
            if type_implements_impl(unit, decl, candidate_fqn, seen) {
                return true;
            }
        }
    }

    false
}

fn import_provides(imp: &Import, fqn: &str) -> bool {
    if imp.is_static {
        return false;
    }
    if imp.path == fqn {
        return true;
    }
    if let Some(pkg) = imp.path.strip_suffix(".*") {
        return fqn
            .rsplit_once('.')
            .is_some_and(|(fqn_pkg, _)| fqn_pkg == pkg);
    }
    false
}

/// True when an explicit import binds `simple` to something other than `fqn`
/// (or its `javax.` twin).
fn import_conflicts(unit: &CompilationUnit, simple: &str, fqn: &str) -> bool {
    let twin = javax_twin(fqn);
    unit.imports.iter().any(|imp| {
        !imp.is_static
            && !imp.is_wildcard()
            && simple_name(&imp.path) == Some(simple)
            && imp.path != fqn
            && Some(imp.path.as_str()) != twin.as_deref()
    })
}

/// The `javax.` spelling of a `jakarta.` name, for sources on the legacy
/// namespace.
pub fn javax_twin(fqn: &str) -> Option<String> {
    fqn.strip_prefix("jakarta.").map(|rest| format!("javax.{rest}"))
}

pub fn simple_name(fqn: &str) -> Option<&str> {
    let name = fqn.rsplit('.').next().unwrap_or(fqn);
    (!name.is_empty()).then_some(name)
}

pub fn strip_generic_args(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut depth = 0u32;
    for ch in raw.chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Unbox a boxed primitive's simple name (`Integer` -> `int`); other names
/// pass through unchanged.
pub fn unbox(simple: &str) -> &str {
    match simple {
        "Boolean" => "boolean",
        "Byte" => "byte",
        "Short" => "short",
        "Integer" => "int",
        "Long" => "long",
        "Float" => "float",
        "Double" => "double",
        "Character" => "char",
        other => other,
    }
}

pub fn is_primitive(simple: &str) -> bool {
    matches!(
        simple,
        "boolean" | "byte" | "short" | "int" | "long" | "float" | "double" | "char"
    )
}

/// Fixed JDK knowledge: does a well-known JDK type implement the candidate?
fn jdk_is_subtype(simple: &str, candidate_fqn: &str) -> bool {
    match candidate_fqn {
        "java.lang.CharSequence" => matches!(
            simple,
            "CharSequence" | "String" | "StringBuilder" | "StringBuffer" | "CharBuffer"
        ),
        "java.util.Collection" => matches!(
            simple,
            "Collection"
                | "List"
                | "Set"
                | "Queue"
                | "Deque"
                | "SortedSet"
                | "NavigableSet"
                | "ArrayList"
                | "LinkedList"
                | "HashSet"
                | "LinkedHashSet"
                | "TreeSet"
                | "Vector"
                | "Stack"
                | "PriorityQueue"
                | "ArrayDeque"
                | "CopyOnWriteArrayList"
        ),
        "java.util.Map" => matches!(
            simple,
            "Map" | "SortedMap"
                | "NavigableMap"
                | "HashMap"
                | "LinkedHashMap"
                | "TreeMap"
                | "Hashtable"
                | "WeakHashMap"
                | "EnumMap"
                | "IdentityHashMap"
                | "ConcurrentMap"
                | "ConcurrentHashMap"
                | "Properties"
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CompilationUnit;

    fn unit(src: &str) -> CompilationUnit {
        CompilationUnit::parse(src).unwrap()
    }

    #[test]
    fn simple_name_annotation_needs_import_proof() {
        let resolver = ImportResolver::default();
        let fqn = "jakarta.validation.constraints.Email";

        let with_import = unit(
            "import jakarta.validation.constraints.Email;\nclass A { @Email String e; }",
        );
        let ann = &with_import.types[0].fields[0].annotations[0];
        assert!(resolver.annotation_matches(&with_import, ann, fqn));

        let foreign = unit("import my.own.Email;\nclass A { @Email String e; }");
        let ann = &foreign.types[0].fields[0].annotations[0];
        assert!(!resolver.annotation_matches(&foreign, ann, fqn));

        let no_import = unit("class A { @Email String e; }");
        let ann = &no_import.types[0].fields[0].annotations[0];
        assert!(!resolver.annotation_matches(&no_import, ann, fqn));
    }

    #[test]
    fn wildcard_and_javax_imports_match() {
        let resolver = ImportResolver::default();
        let fqn = "jakarta.validation.constraints.Email";

        let wildcard = unit(
            "import jakarta.validation.constraints.*;\nclass A { @Email String e; }",
        );
        let ann = &wildcard.types[0].fields[0].annotations[0];
        assert!(resolver.annotation_matches(&wildcard, ann, fqn));

        let javax = unit("import javax.validation.constraints.Email;\nclass A { @Email String e; }");
        let ann = &javax.types[0].fields[0].annotations[0];
        assert!(resolver.annotation_matches(&javax, ann, fqn));
    }

    #[test]
    fn type_implements_walks_unit_hierarchy() {
        let resolver = ImportResolver::default();
        let src = r#"
            import jakarta.servlet.Filter;
            class Base implements Filter {}
            class Derived extends Base {}
        "#;
        let unit = unit(src);
        let derived = unit.find_type("Derived").unwrap();
        assert!(resolver.type_implements(&unit, derived, "jakarta.servlet.Filter"));
    }

    #[test]
    fn type_reference_uses_jdk_table() {
        let resolver = ImportResolver::default();
        let u = unit("class A {}");
        assert!(resolver.type_reference_is(&u, "java.util.ArrayList<String>", "java.util.Collection"));
        assert!(resolver.type_reference_is(&u, "String", "java.lang.CharSequence"));
        assert!(!resolver.type_reference_is(&u, "int", "java.util.Map"));
    }

    #[test]
    fn classpath_index_prefix_lookup() {
        let classpath: ClasspathIndex =
            ["org.eclipse.microprofile.faulttolerance.Retry"].into_iter().collect();
        let resolver = ImportResolver::new(classpath);
        assert!(resolver.classpath_has_prefix("org.eclipse.microprofile.faulttolerance."));
        assert!(!resolver.class_on_classpath("io.smallrye.mutiny.Uni"));
    }
}

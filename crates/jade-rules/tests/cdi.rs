use jade_rules::{analyze_source, ImportResolver};
use pretty_assertions::assert_eq;

fn codes(source: &str) -> Vec<&'static str> {
    let resolver = ImportResolver::default();
    analyze_source(source, &resolver)
        .into_iter()
        .map(|d| d.code)
        .collect()
}

#[test]
fn two_scope_annotations_are_reported() {
    let src = r#"
import jakarta.enterprise.context.ApplicationScoped;
import jakarta.enterprise.context.RequestScoped;

@ApplicationScoped
@RequestScoped
public class Counter {
}
"#;
    assert_eq!(codes(src), vec!["CDI_MULTIPLE_SCOPES"]);
}

#[test]
fn public_field_on_normal_scoped_bean_is_reported() {
    let src = r#"
import jakarta.enterprise.context.ApplicationScoped;

@ApplicationScoped
public class Counter {
    public long count;
}
"#;
    assert_eq!(codes(src), vec!["CDI_PUBLIC_FIELD_SCOPE"]);
}

#[test]
fn public_field_on_dependent_bean_is_clean() {
    let src = r#"
import jakarta.enterprise.context.Dependent;

@Dependent
public class Counter {
    public long count;

    public static final String NAME = "counter";
}
"#;
    assert_eq!(codes(src), Vec::<&str>::new());
}

#[test]
fn produces_and_inject_conflict_on_a_field() {
    let src = r#"
import jakarta.enterprise.inject.Produces;
import jakarta.inject.Inject;

public class Producers {
    @Produces
    @Inject
    private String greeting;
}
"#;
    assert_eq!(codes(src), vec!["CDI_PRODUCES_INJECT_CONFLICT"]);
}

#[test]
fn disposes_parameter_on_a_producer_method_is_reported() {
    let src = r#"
import jakarta.enterprise.inject.Disposes;
import jakarta.enterprise.inject.Produces;

public class Producers {
    @Produces
    public String open(@Disposes String old) {
        return "";
    }
}
"#;
    assert_eq!(codes(src), vec!["CDI_DISPOSES_ON_PRODUCER"]);
}

#[test]
fn two_disposes_parameters_are_reported() {
    let src = r#"
import jakarta.enterprise.inject.Disposes;

public class Producers {
    public void close(@Disposes String a, @Disposes String b) {
    }
}
"#;
    assert_eq!(codes(src), vec!["CDI_DISPOSES_MULTIPLE"]);
}

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
fn map_key_and_map_key_class_are_exclusive() {
    let src = r#"
import java.util.Map;
import jakarta.persistence.MapKey;
import jakarta.persistence.MapKeyClass;

public class Library {
    @MapKey(name = "isbn")
    @MapKeyClass(String.class)
    private Map<String, Object> books;
}
"#;
    assert_eq!(codes(src), vec!["PERSISTENCE_MAPKEY_EXCLUSIVE"]);
}

#[test]
fn repeated_join_columns_need_explicit_attributes() {
    let src = r#"
import java.util.Map;
import jakarta.persistence.MapKeyJoinColumn;

public class Library {
    @MapKeyJoinColumn(name = "a")
    @MapKeyJoinColumn(name = "b")
    public Map<String, Object> getBooks() {
        return null;
    }
}
"#;
    let resolver = ImportResolver::default();
    let diags = analyze_source(src, &resolver);
    assert_eq!(diags.len(), 2);
    for d in &diags {
        assert_eq!(d.code, "PERSISTENCE_MAPKEYJOINCOLUMN_ATTRIBUTES");
        assert!(d.message.starts_with("A method"), "{}", d.message);
    }
}

#[test]
fn fully_specified_join_columns_are_clean() {
    let src = r#"
import java.util.Map;
import jakarta.persistence.MapKeyJoinColumn;

public class Library {
    @MapKeyJoinColumn(name = "a", referencedColumnName = "x")
    @MapKeyJoinColumn(name = "b", referencedColumnName = "y")
    private Map<String, Object> books;
}
"#;
    assert_eq!(codes(src), Vec::<&str>::new());
}

#[test]
fn single_join_column_needs_no_attributes() {
    let src = r#"
import java.util.Map;
import jakarta.persistence.MapKeyJoinColumn;

public class Library {
    @MapKeyJoinColumn
    private Map<String, Object> books;
}
"#;
    assert_eq!(codes(src), Vec::<&str>::new());
}

#[test]
fn final_entity_class_is_reported() {
    let src = r#"
import jakarta.persistence.Entity;

@Entity
public final class Order {
}
"#;
    assert_eq!(codes(src), vec!["PERSISTENCE_ENTITY_FINAL_CLASS"]);
}

#[test]
fn entity_without_usable_constructor_is_reported() {
    let src = r#"
import jakarta.persistence.Entity;

@Entity
public class Order {
    public Order(long id) {
    }
}
"#;
    assert_eq!(codes(src), vec!["PERSISTENCE_ENTITY_MISSING_CTOR"]);
}

#[test]
fn entity_with_implicit_constructor_is_clean() {
    let src = r#"
import jakarta.persistence.Entity;

@Entity
public class Order {
    private long id;
}
"#;
    assert_eq!(codes(src), Vec::<&str>::new());
}

#[test]
fn entity_final_members_are_reported() {
    let src = r#"
import jakarta.persistence.Entity;

@Entity
public class Order {
    private final long id = 0;

    public static final String TABLE = "orders";

    public final long total() {
        return 0;
    }
}
"#;
    assert_eq!(
        codes(src),
        vec!["PERSISTENCE_ENTITY_FINAL_MEMBER", "PERSISTENCE_ENTITY_FINAL_MEMBER"]
    );
}

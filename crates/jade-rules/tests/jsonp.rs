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
fn pointer_without_leading_slash_is_invalid() {
    let src = r#"
import jakarta.json.Json;

public class Pointers {
    void run() {
        Json.createPointer("a/b");
    }
}
"#;
    assert_eq!(codes(src), vec!["JSONP_INVALID_POINTER"]);
}

#[test]
fn valid_and_empty_pointers_are_clean() {
    let src = r#"
import jakarta.json.Json;

public class Pointers {
    void run() {
        Json.createPointer("/a/b");
        Json.createPointer("");
        Json.createPointer("/0");
    }
}
"#;
    assert_eq!(codes(src), Vec::<&str>::new());
}

#[test]
fn trailing_slash_is_invalid() {
    let src = r#"
import javax.json.Json;

public class Pointers {
    void run() {
        Json.createPointer("/a/");
    }
}
"#;
    assert_eq!(codes(src), vec!["JSONP_INVALID_POINTER"]);
}

#[test]
fn non_literal_arguments_are_skipped() {
    let src = r#"
import jakarta.json.Json;

public class Pointers {
    void run(String target) {
        Json.createPointer(target);
    }
}
"#;
    assert_eq!(codes(src), Vec::<&str>::new());
}

#[test]
fn unrelated_receivers_are_ignored() {
    let src = r#"
public class Pointers {
    void run() {
        Json.createPointer("oops");
    }
}
"#;
    assert_eq!(codes(src), Vec::<&str>::new());
}

use jade_rules::{analyze_source, ClasspathIndex, ImportResolver, Severity};
use pretty_assertions::assert_eq;

fn codes(source: &str) -> Vec<&'static str> {
    let resolver = ImportResolver::default();
    analyze_source(source, &resolver)
        .into_iter()
        .map(|d| d.code)
        .collect()
}

#[test]
fn missing_fallback_method_is_reported() {
    let src = r#"
import org.eclipse.microprofile.faulttolerance.Fallback;

public class Client {
    @Fallback(fallbackMethod = "recover")
    public String fetch() {
        return "";
    }
}
"#;
    let resolver = ImportResolver::default();
    let diags = analyze_source(src, &resolver);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, "FT_FALLBACK_METHOD_MISSING");
    assert!(diags[0].message.contains("'recover'"), "{}", diags[0].message);
}

#[test]
fn existing_fallback_method_is_clean() {
    let src = r#"
import org.eclipse.microprofile.faulttolerance.Fallback;

public class Client {
    @Fallback(fallbackMethod = "recover")
    public String fetch() {
        return "";
    }

    public String recover() {
        return "cached";
    }
}
"#;
    assert_eq!(codes(src), Vec::<&str>::new());
}

#[test]
fn collector_is_gated_on_fault_tolerance_being_resolvable() {
    // No import and no classpath marker: the whole rule set stays silent
    // even though an annotation named Fallback is present.
    let src = r#"
import com.example.Fallback;

public class Client {
    @Fallback(fallbackMethod = "recover")
    public String fetch() {
        return "";
    }
}
"#;
    assert_eq!(codes(src), Vec::<&str>::new());
}

#[test]
fn asynchronous_must_return_future_or_completion_stage() {
    let src = r#"
import java.util.concurrent.CompletionStage;
import org.eclipse.microprofile.faulttolerance.Asynchronous;

public class Client {
    @Asynchronous
    public CompletionStage<String> ok() {
        return null;
    }

    @Asynchronous
    public String bad() {
        return "";
    }
}
"#;
    assert_eq!(codes(src), vec!["FT_ASYNC_RETURN_TYPE"]);
}

#[test]
fn reactive_return_types_require_the_library_on_the_classpath() {
    let src = r#"
import io.smallrye.mutiny.Uni;
import org.eclipse.microprofile.faulttolerance.Asynchronous;

public class Client {
    @Asynchronous
    public Uni<String> stream() {
        return null;
    }
}
"#;
    let bare = ImportResolver::default();
    let with_mutiny = ImportResolver::new(ClasspathIndex::from_iter([
        "org.eclipse.microprofile.faulttolerance.Asynchronous",
        "io.smallrye.mutiny.Uni",
    ]));

    let without: Vec<&str> = analyze_source(src, &bare).iter().map(|d| d.code).collect();
    assert_eq!(without, vec!["FT_ASYNC_RETURN_TYPE"]);

    assert_eq!(analyze_source(src, &with_mutiny), Vec::new());
}

#[test]
fn retry_delay_reaching_max_duration_is_a_warning() {
    let src = r#"
import org.eclipse.microprofile.faulttolerance.Retry;

public class Client {
    @Retry(delay = 100, maxDuration = 50)
    public void fetch() {
    }
}
"#;
    let resolver = ImportResolver::default();
    let diags = analyze_source(src, &resolver);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, "FT_RETRY_DELAY_EXCEEDS_MAX");
    assert_eq!(diags[0].severity, Severity::Warning);
}

#[test]
fn retry_with_room_to_spare_is_clean() {
    let src = r#"
import org.eclipse.microprofile.faulttolerance.Retry;

public class Client {
    @Retry(delay = 10, maxDuration = 50)
    public void fetch() {
    }

    @Retry(delay = 100)
    public void poll() {
    }
}
"#;
    assert_eq!(codes(src), Vec::<&str>::new());
}

#[test]
fn retry_units_are_normalized_before_comparison() {
    let src = r#"
import java.time.temporal.ChronoUnit;
import org.eclipse.microprofile.faulttolerance.Retry;

public class Client {
    @Retry(delay = 1, delayUnit = ChronoUnit.SECONDS, maxDuration = 500)
    public void fetch() {
    }
}
"#;
    assert_eq!(codes(src), vec!["FT_RETRY_DELAY_EXCEEDS_MAX"]);
}

#[test]
fn jitter_counts_toward_the_effective_delay() {
    let src = r#"
import org.eclipse.microprofile.faulttolerance.Retry;

public class Client {
    @Retry(delay = 30, jitter = 30, maxDuration = 50)
    public void fetch() {
    }
}
"#;
    assert_eq!(codes(src), vec!["FT_RETRY_DELAY_EXCEEDS_MAX"]);
}

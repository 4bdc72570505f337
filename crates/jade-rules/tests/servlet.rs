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
fn filter_with_interface_and_pattern_is_clean() {
    let src = r#"
import jakarta.servlet.Filter;
import jakarta.servlet.annotation.WebFilter;

@WebFilter(urlPatterns = "/api/*")
public class AuditFilter implements Filter {
}
"#;
    assert_eq!(codes(src), Vec::<&str>::new());
}

#[test]
fn filter_missing_interface_is_reported() {
    let src = r#"
import jakarta.servlet.annotation.WebFilter;

@WebFilter("/api/*")
public class AuditFilter {
}
"#;
    assert_eq!(codes(src), vec!["SERVLET_FILTER_MISSING_IMPLEMENTS"]);
}

#[test]
fn filter_without_url_attribute_is_reported() {
    let src = r#"
import jakarta.servlet.Filter;
import jakarta.servlet.annotation.WebFilter;

@WebFilter
public class AuditFilter implements Filter {
}
"#;
    assert_eq!(codes(src), vec!["SERVLET_FILTER_MISSING_ATTRIBUTE"]);
}

#[test]
fn filter_with_value_and_url_patterns_is_reported() {
    let src = r#"
import jakarta.servlet.Filter;
import jakarta.servlet.annotation.WebFilter;

@WebFilter(value = "/a", urlPatterns = "/b")
public class AuditFilter implements Filter {
}
"#;
    assert_eq!(codes(src), vec!["SERVLET_FILTER_DUPLICATE_ATTRIBUTES"]);
}

#[test]
fn servlet_names_alone_satisfies_the_filter_attribute_rule() {
    let src = r#"
import jakarta.servlet.Filter;
import jakarta.servlet.annotation.WebFilter;

@WebFilter(servletNames = "main")
public class AuditFilter implements Filter {
}
"#;
    assert_eq!(codes(src), Vec::<&str>::new());
}

#[test]
fn listener_must_implement_a_listener_interface() {
    let src = r#"
import jakarta.servlet.annotation.WebListener;

@WebListener
public class Startup {
}
"#;
    assert_eq!(codes(src), vec!["SERVLET_LISTENER_MISSING_IMPLEMENTS"]);
}

#[test]
fn listener_with_session_listener_is_clean() {
    let src = r#"
import jakarta.servlet.annotation.WebListener;
import jakarta.servlet.http.HttpSessionListener;

@WebListener
public class Sessions implements HttpSessionListener {
}
"#;
    assert_eq!(codes(src), Vec::<&str>::new());
}

#[test]
fn servlet_must_extend_http_servlet() {
    let src = r#"
import jakarta.servlet.annotation.WebServlet;

@WebServlet(urlPatterns = "/hello")
public class Hello {
}
"#;
    assert_eq!(codes(src), vec!["SERVLET_SERVLET_MISSING_EXTENDS"]);
}

#[test]
fn servlet_extending_http_servlet_with_pattern_is_clean() {
    let src = r#"
import jakarta.servlet.annotation.WebServlet;
import jakarta.servlet.http.HttpServlet;

@WebServlet("/hello")
public class Hello extends HttpServlet {
}
"#;
    assert_eq!(codes(src), Vec::<&str>::new());
}

#[test]
fn servlet_attribute_rules_mirror_the_filter_ones() {
    let src = r#"
import jakarta.servlet.annotation.WebServlet;
import jakarta.servlet.http.HttpServlet;

@WebServlet(value = "/a", urlPatterns = "/b")
public class Hello extends HttpServlet {
}
"#;
    assert_eq!(codes(src), vec!["SERVLET_SERVLET_DUPLICATE_ATTRIBUTES"]);
}

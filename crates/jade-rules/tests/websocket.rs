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
fn endpoint_path_must_start_with_slash() {
    let src = r#"
import jakarta.websocket.server.ServerEndpoint;

@ServerEndpoint("chat")
public class Chat {
}
"#;
    assert_eq!(codes(src), vec!["WS_ENDPOINT_PATH"]);
}

#[test]
fn endpoint_path_rejects_relative_segments() {
    let src = r#"
import jakarta.websocket.server.ServerEndpoint;

@ServerEndpoint("/chat/../admin")
public class Chat {
}
"#;
    assert_eq!(codes(src), vec!["WS_ENDPOINT_PATH"]);
}

#[test]
fn duplicate_template_variables_are_reported() {
    let src = r#"
import jakarta.websocket.server.ServerEndpoint;

@ServerEndpoint("/chat/{room}/{room}")
public class Chat {
}
"#;
    assert_eq!(codes(src), vec!["WS_ENDPOINT_DUPLICATE_VARIABLE"]);
}

#[test]
fn templated_path_with_distinct_variables_is_clean() {
    let src = r#"
import jakarta.websocket.server.ServerEndpoint;

@ServerEndpoint("/chat/{room}/{user}")
public class Chat {
}
"#;
    assert_eq!(codes(src), Vec::<&str>::new());
}

#[test]
fn mixed_literal_and_brace_segment_is_invalid() {
    let src = r#"
import jakarta.websocket.server.ServerEndpoint;

@ServerEndpoint("/chat/x{room}")
public class Chat {
}
"#;
    assert_eq!(codes(src), vec!["WS_ENDPOINT_PATH"]);
}

#[test]
fn server_endpoint_needs_a_public_noarg_constructor() {
    let src = r#"
import jakarta.websocket.server.ServerEndpoint;

@ServerEndpoint("/chat")
public class Chat {
    public Chat(String name) {
    }
}
"#;
    assert_eq!(codes(src), vec!["WS_MISSING_NOARG_CTOR"]);
}

#[test]
fn on_message_with_payload_session_and_path_param_is_clean() {
    let src = r#"
import jakarta.websocket.OnMessage;
import jakarta.websocket.Session;
import jakarta.websocket.server.PathParam;
import jakarta.websocket.server.ServerEndpoint;

@ServerEndpoint("/chat/{room}")
public class Chat {
    @OnMessage
    public void onMessage(@PathParam("room") String room, String message, Session session) {
    }
}
"#;
    assert_eq!(codes(src), Vec::<&str>::new());
}

#[test]
fn unknown_parameter_type_is_invalid() {
    let src = r#"
import jakarta.websocket.OnOpen;
import jakarta.websocket.server.ServerEndpoint;

@ServerEndpoint("/chat")
public class Chat {
    @OnOpen
    public void onOpen(ChatState state) {
    }
}
"#;
    assert_eq!(codes(src), vec!["WS_INVALID_PARAM"]);
}

#[test]
fn string_parameter_without_path_param_is_reported() {
    let src = r#"
import jakarta.websocket.OnOpen;
import jakarta.websocket.Session;
import jakarta.websocket.server.ServerEndpoint;

@ServerEndpoint("/chat/{room}")
public class Chat {
    @OnOpen
    public void onOpen(Session session, String room) {
    }
}
"#;
    assert_eq!(codes(src), vec!["WS_MISSING_PATHPARAM_ANNOTATION"]);
}

#[test]
fn two_text_handlers_are_reported_once() {
    let src = r#"
import jakarta.websocket.OnMessage;
import jakarta.websocket.server.ServerEndpoint;

@ServerEndpoint("/chat")
public class Chat {
    @OnMessage
    public void first(String message) {
    }

    @OnMessage
    public void second(String message) {
    }
}
"#;
    assert_eq!(codes(src), vec!["WS_DUPLICATE_ONMESSAGE"]);
}

#[test]
fn text_and_binary_handlers_can_coexist() {
    let src = r#"
import java.nio.ByteBuffer;
import jakarta.websocket.OnMessage;
import jakarta.websocket.server.ServerEndpoint;

@ServerEndpoint("/chat")
public class Chat {
    @OnMessage
    public void text(String message) {
    }

    @OnMessage
    public void binary(ByteBuffer message) {
    }
}
"#;
    assert_eq!(codes(src), Vec::<&str>::new());
}

//! [`RequestDescriptor`] -> curl command line

use crate::http::HttpMethod;
use crate::models::RequestDescriptor;
use super::COMMAND;

/// Generate an equivalent curl command from the request.
///
/// Layout is fixed so the output is stable: command, `-X` (omitted for GET),
/// one `-H` per header in map order, `-d` when the body is not blank, and the
/// URL with its query string last. Header and URL arguments are wrapped in
/// double quotes, the body in single quotes with inner `'` written as `\'`.
/// [`parse`](super::parse) has no backslash escaping, so a body containing
/// `'` does not survive a round trip.
pub fn generate(descriptor: &RequestDescriptor) -> String {
    let mut parts: Vec<String> = vec![COMMAND.to_string()];

    if descriptor.method != HttpMethod::Get {
        parts.push("-X".to_string());
        parts.push(descriptor.method.as_str().to_string());
    }

    for (name, value) in &descriptor.headers {
        parts.push("-H".to_string());
        parts.push(format!("\"{}: {}\"", name, value));
    }

    if let Some(body) = descriptor.body.as_deref().filter(|b| !b.trim().is_empty()) {
        parts.push("-d".to_string());
        parts.push(format!("'{}'", body.replace('\'', "\\'")));
    }

    parts.push(format!("\"{}\"", full_url(descriptor)));

    parts.join(" ")
}

/// Base URL with `?name=value&...` appended when there are query params
pub fn full_url(descriptor: &RequestDescriptor) -> String {
    if descriptor.query_params.is_empty() {
        return descriptor.url.clone();
    }

    let query = descriptor
        .query_params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", descriptor.url, query)
}

/// Format a curl command with ANSI colors for terminal display
pub fn format_curl_pretty(cmd: &str) -> String {
    const RESET: &str = "\x1b[0m";
    const COMMAND_STYLE: &str = "\x1b[1;33m";
    const FLAG_STYLE: &str = "\x1b[36m";
    const STRING_STYLE: &str = "\x1b[32m";

    let mut result = String::with_capacity(cmd.len() * 2);
    let mut rest = cmd;

    if let Some(after) = cmd.strip_prefix(COMMAND) {
        result.push_str(COMMAND_STYLE);
        result.push_str(COMMAND);
        result.push_str(RESET);
        rest = after;
    }

    let mut quote: Option<char> = None;
    let mut in_flag = false;

    for c in rest.chars() {
        match quote {
            Some(open) => {
                result.push(c);
                if c == open {
                    result.push_str(RESET);
                    quote = None;
                }
            }
            None if c == '\'' || c == '"' => {
                result.push_str(STRING_STYLE);
                result.push(c);
                quote = Some(c);
            }
            None if c == '-' && !in_flag && result.ends_with(' ') => {
                result.push_str(FLAG_STYLE);
                result.push(c);
                in_flag = true;
            }
            None if c == ' ' && in_flag => {
                result.push_str(RESET);
                result.push(c);
                in_flag = false;
            }
            None => result.push(c),
        }
    }

    if in_flag || quote.is_some() {
        result.push_str(RESET);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RequestDescriptor;

    #[test]
    fn test_simple_get() {
        let req = RequestDescriptor::new("https://api.example.com/users");
        assert_eq!(generate(&req), r#"curl "https://api.example.com/users""#);
    }

    #[test]
    fn test_post_with_data() {
        let req = RequestDescriptor::new("https://api.example.com/users")
            .with_method(HttpMethod::Post)
            .with_header("Content-Type", "application/json")
            .with_body(Some(r#"{"name":"John"}"#.to_string()));
        assert_eq!(
            generate(&req),
            r#"curl -X POST -H "Content-Type: application/json" -d '{"name":"John"}' "https://api.example.com/users""#
        );
    }

    #[test]
    fn test_query_params_in_order() {
        let req = RequestDescriptor::new("https://api.example.com/users")
            .with_query_param("page", "1")
            .with_query_param("limit", "10");
        assert_eq!(generate(&req), r#"curl "https://api.example.com/users?page=1&limit=10""#);
    }

    #[test]
    fn test_complex_request() {
        let req = RequestDescriptor::new("https://api.example.com/users")
            .with_method(HttpMethod::Put)
            .with_header("Content-Type", "application/json")
            .with_header("Authorization", "Bearer token123")
            .with_query_param("source", "mobile")
            .with_body(Some(r#"{"name":"Jane Doe"}"#.to_string()));
        assert_eq!(
            generate(&req),
            "curl -X PUT -H \"Content-Type: application/json\" -H \"Authorization: Bearer token123\" \
             -d '{\"name\":\"Jane Doe\"}' \"https://api.example.com/users?source=mobile\""
        );
    }

    #[test]
    fn test_explicit_get_is_omitted() {
        let req = RequestDescriptor::new("https://x.test").with_method(HttpMethod::Get);
        assert!(!generate(&req).contains("-X"));
    }

    #[test]
    fn test_blank_body_is_omitted() {
        let req = RequestDescriptor::new("https://x.test")
            .with_method(HttpMethod::Post)
            .with_body(Some("   ".to_string()));
        assert_eq!(generate(&req), r#"curl -X POST "https://x.test""#);
    }

    #[test]
    fn test_single_quotes_in_body_are_escaped() {
        let req = RequestDescriptor::new("https://x.test")
            .with_method(HttpMethod::Post)
            .with_body(Some("it's".to_string()));
        assert_eq!(generate(&req), r#"curl -X POST -d 'it\'s' "https://x.test""#);
    }

    #[test]
    fn test_format_curl_pretty_keeps_text() {
        let cmd = r#"curl -X POST -H "A: b" -d 'x y' "https://x.test""#;
        let pretty = format_curl_pretty(cmd);
        assert!(pretty.starts_with("\x1b[1;33mcurl\x1b[0m"));
        assert!(pretty.contains("\x1b[36m-X\x1b[0m"));
        assert!(pretty.contains("\x1b[32m'x y'\x1b[0m"));

        let stripped = regex::Regex::new(r"\x1b\[[\d;]*m").unwrap().replace_all(&pretty, "");
        assert_eq!(stripped, cmd);
    }
}

//! Rendering of a single request or response

use humansize::{format_size, FormatSizeOptions, BINARY};

use super::Painter;
use crate::curl;
use crate::models::{ApiRequest, ResponseRecord};

/// Format byte count as human-readable size
///
/// Uses binary units (KiB, MiB, GiB, etc.)
pub fn format_bytes(bytes: u64, precision: usize) -> String {
    let options = FormatSizeOptions::from(BINARY)
        .decimal_places(precision)
        .decimal_zeroes(precision);
    format_size(bytes, options)
}

/// Status line, optional headers, then the body (pretty-printed when JSON)
pub fn render_response(record: &ResponseRecord, painter: Painter, show_headers: bool) -> String {
    let mut out = String::new();

    let status = format!("{} {}", record.status_code, record.status_message);
    out.push_str(&painter.http_status(record.status_code, status.trim_end()));
    out.push_str(&painter.muted(&format!(
        "  {} ms  {}",
        record.response_time,
        format_bytes(record.response_size, 1)
    )));
    out.push('\n');

    if let Some(error) = &record.error_message {
        out.push_str(&painter.error(error));
        out.push('\n');
    }

    if show_headers && !record.headers.is_empty() {
        for (name, value) in &record.headers {
            out.push_str(&format!("{}: {}\n", painter.key(name), value));
        }
    }

    if let Some(body) = &record.body {
        out.push('\n');
        out.push_str(&pretty_body(body));
        if !body.ends_with('\n') {
            out.push('\n');
        }
    }

    out
}

/// Name, method and URL, headers, body and the equivalent curl command
pub fn render_request(request: &ApiRequest, painter: Painter) -> String {
    let d = &request.descriptor;
    let mut out = format!(
        "{}\n{} {}\n",
        painter.label(&request.name),
        painter.http_method(d.method.as_str()),
        curl::full_url(d)
    );
    out.push_str(&painter.muted(&format!("id: {}\n", request.id)));

    for (name, value) in &d.headers {
        out.push_str(&format!("{}: {}\n", painter.key(name), value));
    }

    if let Some(body) = d.body.as_deref().filter(|b| !b.trim().is_empty()) {
        out.push('\n');
        out.push_str(&pretty_body(body));
        out.push('\n');
    }

    let command = curl::generate(d);
    let command = if painter.enabled() {
        curl::format_curl_pretty(&command)
    } else {
        command
    };
    out.push('\n');
    out.push_str(&command);
    out.push('\n');
    out
}

fn pretty_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .filter(|v| v.is_object() || v.is_array())
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| body.to_string())
}

//! `{{variable}}` substitution and `.env` loading
//!
//! Environments hold plain name/value pairs. Before a request is sent, every
//! `{{name}}` in its URL, header values, query values and body is replaced
//! by the value from the active environment. Names without a value are left
//! exactly as written so the user can see what did not resolve.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::errors::ReqpadError;
use crate::models::RequestDescriptor;

/// `{{name}}`, where the name is anything but braces
static VAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{([^{}]+)\}\}").expect("Invalid variable regex")
});

/// Replace `{{name}}` placeholders in a single pass.
///
/// Substituted values are not scanned again, so a value that itself
/// contains `{{...}}` is inserted literally.
pub fn substitute(text: &str, vars: &IndexMap<String, String>) -> String {
    if vars.is_empty() || !text.contains("{{") {
        return text.to_string();
    }

    VAR_RE
        .replace_all(text, |caps: &Captures| match vars.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Substitute every value of a map; keys are left alone
pub fn substitute_map(map: &IndexMap<String, String>, vars: &IndexMap<String, String>) -> IndexMap<String, String> {
    map.iter()
        .map(|(k, v)| (k.clone(), substitute(v, vars)))
        .collect()
}

/// Substitute the URL, header values, query values and body of a request
pub fn substitute_request(req: &RequestDescriptor, vars: &IndexMap<String, String>) -> RequestDescriptor {
    RequestDescriptor {
        method: req.method,
        url: substitute(&req.url, vars),
        headers: substitute_map(&req.headers, vars),
        query_params: substitute_map(&req.query_params, vars),
        body: req.body.as_deref().map(|b| substitute(b, vars)),
    }
}

/// Check if a string contains `{{variable}}` syntax
pub fn has_variables(s: &str) -> bool {
    VAR_RE.is_match(s)
}

/// Parse `.env` file content into ordered variables
pub fn parse_dotenv(content: &str) -> Result<IndexMap<String, String>, ReqpadError> {
    let mut vars = IndexMap::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);

        match parse_env_line(line) {
            Some((key, value)) => {
                vars.insert(key, value);
            }
            None => {
                return Err(ReqpadError::Config(format!(
                    "Invalid .env syntax at line {}: {}",
                    line_num + 1,
                    line
                )));
            }
        }
    }

    Ok(vars)
}

/// Parse `KEY=value`, `KEY="value"` or `KEY='value'`
fn parse_env_line(line: &str) -> Option<(String, String)> {
    let (key, value_part) = line.split_once('=')?;
    let key = key.trim();

    if key.is_empty() {
        return None;
    }

    let value_part = value_part.trim();

    let value = if value_part.len() >= 2 && value_part.starts_with('"') && value_part.ends_with('"') {
        unescape_double_quoted(&value_part[1..value_part.len() - 1])
    } else if value_part.len() >= 2 && value_part.starts_with('\'') && value_part.ends_with('\'') {
        value_part[1..value_part.len() - 1].to_string()
    } else {
        // unquoted values stop at an inline comment
        match value_part.find('#') {
            Some(pos) => value_part[..pos].trim().to_string(),
            None => value_part.to_string(),
        }
    };

    Some((key.to_string(), value))
}

fn unescape_double_quoted(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

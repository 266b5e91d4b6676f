//! curl command line -> [`RequestDescriptor`]

use thiserror::Error;
use tracing::debug;

use crate::http::HttpMethod;
use crate::models::{HeaderMapDict, QueryParamsDict, RequestDescriptor};
use super::tokenize::tokenize;
use super::COMMAND;

/// Why a command line could not be turned into a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("command does not start with `curl`")]
    NotARecognizedCommand,

    #[error("no http:// or https:// URL found")]
    MissingUrl,
}

/// Flags that take part in building the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Method,
    Header,
    Data,
}

/// Recognized spellings. Everything else starting with `-` is skipped.
const FLAGS: &[(&str, Flag)] = &[
    ("-X", Flag::Method),
    ("--request", Flag::Method),
    ("-H", Flag::Header),
    ("--header", Flag::Header),
    ("-d", Flag::Data),
    ("--data", Flag::Data),
    ("--data-raw", Flag::Data),
    ("--data-urlencode", Flag::Data),
];

impl Flag {
    fn lookup(token: &str) -> Option<Flag> {
        FLAGS.iter().find(|(spelling, _)| *spelling == token).map(|(_, flag)| *flag)
    }
}

fn is_flag(token: &str) -> bool {
    token.starts_with('-')
}

fn is_url(token: &str) -> bool {
    token.starts_with("http://") || token.starts_with("https://")
}

/// Parse a curl command line.
///
/// Parsing is tolerant: unknown flags, malformed headers and flags missing
/// their argument are dropped rather than reported. The only failures are a
/// command that is not curl and a command without an `http(s)://` URL.
///
/// Tie-breaks: the last `-X` and the last header of a given name win, while
/// the first URL wins and later ones are ignored.
pub fn parse(raw: &str) -> Result<RequestDescriptor, ParseFailure> {
    let rest = strip_command(raw.trim()).ok_or(ParseFailure::NotARecognizedCommand)?;
    let tokens = tokenize(rest);

    let mut method = HttpMethod::Get;
    let mut explicit_method = false;
    let mut url: Option<String> = None;
    let mut headers = HeaderMapDict::new();
    let mut query_params = QueryParamsDict::new();
    let mut body: Option<String> = None;

    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();

        if let Some(flag) = Flag::lookup(token) {
            let Some(arg) = tokens.get(i + 1) else {
                debug!(flag = token, "flag without argument at end of command");
                break;
            };
            match flag {
                Flag::Method => {
                    method = HttpMethod::parse_lenient(arg);
                    explicit_method = true;
                }
                Flag::Header => match split_header(arg) {
                    Some((name, value)) => {
                        headers.insert(name, value);
                    }
                    None => debug!(header = %arg, "skipping malformed header"),
                },
                Flag::Data => {
                    body = Some(arg.clone());
                    if !explicit_method {
                        method = HttpMethod::Post;
                    }
                }
            }
            i += 2;
        } else if is_url(token) {
            if url.is_none() {
                let (base, query) = split_url(token);
                url = Some(base.to_string());
                if let Some(query) = query {
                    query_params.extend(parse_query(query));
                }
            } else {
                debug!(url = token, "ignoring additional URL");
            }
            i += 1;
        } else if is_flag(token) {
            debug!(flag = token, "skipping unknown flag");
            let takes_next = tokens
                .get(i + 1)
                .is_some_and(|next| !is_flag(next) && !is_url(next));
            i += if takes_next { 2 } else { 1 };
        } else {
            i += 1;
        }
    }

    let url = url.ok_or(ParseFailure::MissingUrl)?;

    Ok(RequestDescriptor {
        method,
        url,
        headers,
        query_params,
        body,
    })
}

/// Remainder after the command name, which must be followed by whitespace
/// or end of input
fn strip_command(trimmed: &str) -> Option<&str> {
    let rest = trimmed.strip_prefix(COMMAND)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

/// Parse a header string "Name: Value"
fn split_header(header: &str) -> Option<(String, String)> {
    let (name, value) = header.split_once(':')?;
    Some((name.trim().to_string(), value.trim().to_string()))
}

fn split_url(url: &str) -> (&str, Option<&str>) {
    match url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (url, None),
    }
}

/// `a=1&b=2` pairs; fragments without `=` are dropped
fn parse_query(query: &str) -> impl Iterator<Item = (String, String)> + '_ {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
}

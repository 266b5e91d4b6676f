//! Shell-style argument splitting for curl command lines

/// Split a command line into arguments, honouring single and double quotes.
///
/// Whitespace runs are collapsed to one space before scanning, so extra
/// spacing carries no meaning, not even inside quotes. Quote characters
/// delimit spans and are dropped; a quote of the other kind inside a span is
/// literal. An unterminated quote simply runs to the end of input. There is
/// no backslash escaping. Never fails.
pub fn tokenize(raw: &str) -> Vec<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in collapsed.chars() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(open), _) if c == open => quote = None,
            (None, ' ') => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

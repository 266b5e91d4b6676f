//! Table output for store listings

use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use indexmap::IndexMap;

use super::format_bytes;
use crate::models::{ApiRequest, Collection, Environment, ResponseRecord};

fn new_table(columns: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    let header: Vec<Cell> = columns
        .iter()
        .map(|col| Cell::new(col).add_attribute(Attribute::Bold))
        .collect();
    table.set_header(header);
    table
}

/// Unix millis as `YYYY-MM-DD HH:MM:SS` (UTC)
pub fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

pub fn requests_table(requests: &[ApiRequest]) -> String {
    if requests.is_empty() {
        return "(no requests)".to_string();
    }
    let mut table = new_table(&["ID", "Name", "Method", "URL", "Updated"]);
    for r in requests {
        table.add_row(vec![
            Cell::new(&r.id),
            Cell::new(&r.name),
            Cell::new(r.descriptor.method),
            Cell::new(&r.descriptor.url),
            Cell::new(format_timestamp(r.updated_at)),
        ]);
    }
    table.to_string()
}

pub fn collections_table(collections: &[Collection], request_counts: &IndexMap<String, usize>) -> String {
    if collections.is_empty() {
        return "(no collections)".to_string();
    }
    let mut table = new_table(&["ID", "Name", "Requests", "Description"]);
    for c in collections {
        table.add_row(vec![
            Cell::new(&c.id),
            Cell::new(&c.name),
            Cell::new(request_counts.get(&c.id).copied().unwrap_or(0)),
            Cell::new(c.description.as_deref().unwrap_or("")),
        ]);
    }
    table.to_string()
}

pub fn environments_table(environments: &[Environment]) -> String {
    if environments.is_empty() {
        return "(no environments)".to_string();
    }
    let mut table = new_table(&["", "ID", "Name", "Variables"]);
    for e in environments {
        table.add_row(vec![
            Cell::new(if e.is_active { "*" } else { "" }),
            Cell::new(&e.id),
            Cell::new(&e.name),
            Cell::new(e.variables.len()),
        ]);
    }
    table.to_string()
}

pub fn variables_table(variables: &IndexMap<String, String>) -> String {
    if variables.is_empty() {
        return "(no variables)".to_string();
    }
    let mut table = new_table(&["Name", "Value"]);
    for (name, value) in variables {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }
    table.to_string()
}

pub fn history_table(responses: &[ResponseRecord]) -> String {
    if responses.is_empty() {
        return "(no history)".to_string();
    }
    let mut table = new_table(&["ID", "Status", "Time", "Size", "When"]);
    for r in responses {
        let status = if r.is_error {
            format!("{} {}", r.status_code, r.status_message)
        } else {
            r.status_code.to_string()
        };
        table.add_row(vec![
            Cell::new(&r.id),
            Cell::new(status),
            Cell::new(format!("{} ms", r.response_time)),
            Cell::new(format_bytes(r.response_size, 1)),
            Cell::new(format_timestamp(r.timestamp)),
        ]);
    }
    table.to_string()
}

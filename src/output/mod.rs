//! Terminal rendering of requests, responses and store listings

pub mod response;
pub mod table;
pub mod terminal;

pub use response::{format_bytes, render_request, render_response};
pub use terminal::Painter;

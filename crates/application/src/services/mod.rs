pub mod response_formatter;

pub use response_formatter::{format_elapsed, format_ttl, paint, Color, ResponseFormatter};

pub mod record_parser;
pub mod record_serializer;

pub use record_parser::*;
pub use record_serializer::*;

/// Column names, in the order they are written
pub const FIELD_NAMES: [&str; 4] = ["id", "title", "state", "note"];

/// Row terminator used when writing. The reader accepts CRLF, LF and CR.
pub const ROW_TERMINATOR: &str = "\r\n";

/// Error type for decoding a store file
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: unterminated quoted field")]
    UnterminatedQuote { line: usize },
    #[error("header is missing the '{0}' column")]
    MissingColumn(&'static str),
    #[error("line {line}: row has no '{field}' field")]
    MissingField { line: usize, field: &'static str },
    #[error("line {line}: unknown state code '{code}' (expected O or X)")]
    InvalidState { line: usize, code: String },
}

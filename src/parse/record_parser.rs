use std::iter::Peekable;
use std::str::Chars;

use crate::model::task::{Task, TaskState};
use crate::parse::{FIELD_NAMES, ParseError};

/// One decoded row and the 1-based line it started on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Split delimited text into rows of fields.
///
/// Quoted fields may contain commas, doubled quotes and line breaks, which
/// are kept verbatim. Blank lines produce no row.
pub fn parse_rows(text: &str) -> Result<Vec<RawRow>, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut chars = text.chars().peekable();
    let mut line = 1;
    let mut rows = Vec::new();

    while chars.peek().is_some() {
        let start_line = line;
        let (fields, quoted) = parse_row(&mut chars, &mut line, start_line)?;
        let blank = !quoted && fields.len() == 1 && fields[0].is_empty();
        if !blank {
            rows.push(RawRow {
                line: start_line,
                fields,
            });
        }
    }

    Ok(rows)
}

/// Parse a single row, consuming its terminator.
/// Returns the fields and whether any field was quoted.
fn parse_row(
    chars: &mut Peekable<Chars<'_>>,
    line: &mut usize,
    start_line: usize,
) -> Result<(Vec<String>, bool), ParseError> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut field_started = false;
    let mut quoted = false;

    loop {
        match chars.next() {
            None => break,
            Some(',') => {
                fields.push(std::mem::take(&mut field));
                field_started = false;
            }
            Some('\n') => {
                *line += 1;
                break;
            }
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                *line += 1;
                break;
            }
            Some('"') if !field_started => {
                read_quoted(chars, line, &mut field)
                    .ok_or(ParseError::UnterminatedQuote { line: start_line })?;
                field_started = true;
                quoted = true;
            }
            // Anything else, including a stray quote mid-field, is literal
            Some(c) => {
                field.push(c);
                field_started = true;
            }
        }
    }

    fields.push(field);
    Ok((fields, quoted))
}

/// Read the body of a quoted field up to its closing quote.
/// Returns None if the input ends first.
fn read_quoted(chars: &mut Peekable<Chars<'_>>, line: &mut usize, field: &mut String) -> Option<()> {
    loop {
        let c = chars.next()?;
        match c {
            '"' => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    return Some(());
                }
            }
            '\n' => {
                *line += 1;
                field.push(c);
            }
            '\r' => {
                if chars.peek() != Some(&'\n') {
                    *line += 1;
                }
                field.push(c);
            }
            _ => field.push(c),
        }
    }
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    id: usize,
    title: usize,
    state: usize,
    note: usize,
}

impl ColumnMap {
    fn from_header(header: &RawRow) -> Result<Self, ParseError> {
        let find = |name: &'static str| {
            header
                .fields
                .iter()
                .position(|f| f == name)
                .ok_or(ParseError::MissingColumn(name))
        };
        let [id, title, state, note] = FIELD_NAMES;
        Ok(ColumnMap {
            id: find(id)?,
            title: find(title)?,
            state: find(state)?,
            note: find(note)?,
        })
    }

    fn task_from_row(&self, row: &RawRow) -> Result<Task, ParseError> {
        let field = |idx: usize, name: &'static str| {
            row.fields
                .get(idx)
                .map(String::as_str)
                .ok_or(ParseError::MissingField {
                    line: row.line,
                    field: name,
                })
        };

        let code = field(self.state, "state")?;
        let state = TaskState::from_code(code).ok_or_else(|| ParseError::InvalidState {
            line: row.line,
            code: code.to_string(),
        })?;

        Ok(Task {
            id: field(self.id, "id")?.to_string(),
            title: field(self.title, "title")?.to_string(),
            state,
            note: field(self.note, "note")?.to_string(),
        })
    }
}

/// Decode a store file: a header row naming the columns, then one task per row.
/// An empty file decodes to no tasks.
pub fn parse_records(text: &str) -> Result<Vec<Task>, ParseError> {
    let mut rows = parse_rows(text)?.into_iter();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let columns = ColumnMap::from_header(&header)?;
    rows.map(|row| columns.task_from_row(&row)).collect()
}

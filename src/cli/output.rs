use serde::Serialize;

use crate::model::store::StoreKind;
use crate::model::task::Task;
use crate::ops::check::{CheckError, CheckResult, CheckWarning};
use crate::util::unicode::{display_width, pad_to_width, truncate_graphemes};

const TABLE_HEADERS: [&str; 4] = ["ID", "Title", "State", "Note"];

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct StoreListingJson<'a> {
    pub store: StoreKind,
    pub tasks: &'a [Task],
}

#[derive(Serialize)]
pub struct TaskDetailJson<'a> {
    pub store: StoreKind,
    #[serde(flatten)]
    pub task: &'a Task,
}

// ---------------------------------------------------------------------------
// Task listing
// ---------------------------------------------------------------------------

/// Format one store's tasks under an `ACTIVE TASKS:` style heading
pub fn format_task_section(kind: StoreKind, tasks: &[Task], note_width: usize) -> Vec<String> {
    let mut lines = vec![format!("{} TASKS:", kind.heading())];
    lines.extend(format_task_table(tasks, note_width));
    lines
}

/// Format tasks as a grid table. Notes are cut to `note_width` characters
/// here only; the stored note is never shortened.
pub fn format_task_table(tasks: &[Task], note_width: usize) -> Vec<String> {
    if tasks.is_empty() {
        return vec!["No tasks found.".to_string()];
    }

    let headers = TABLE_HEADERS.map(String::from);
    let rows: Vec<[String; 4]> = tasks
        .iter()
        .map(|task| {
            [
                task.id.clone(),
                task.title.clone(),
                task.state.label().to_string(),
                truncate_graphemes(&task.note, note_width),
            ]
        })
        .collect();

    render_grid(&headers, &rows)
}

/// Render a bordered grid. Cells containing line breaks span several
/// physical lines.
fn render_grid<const N: usize>(headers: &[String; N], rows: &[[String; N]]) -> Vec<String> {
    let header_cells = headers.each_ref().map(|h| cell_lines(h));
    let row_cells: Vec<[Vec<String>; N]> = rows
        .iter()
        .map(|row| row.each_ref().map(|c| cell_lines(c)))
        .collect();

    let mut widths = [0usize; N];
    for cells in std::iter::once(&header_cells).chain(row_cells.iter()) {
        for (col, lines) in cells.iter().enumerate() {
            for line in lines {
                widths[col] = widths[col].max(display_width(line));
            }
        }
    }

    let mut out = vec![rule(&widths, '-')];
    push_row(&mut out, &header_cells, &widths);
    out.push(rule(&widths, '='));
    for cells in &row_cells {
        push_row(&mut out, cells, &widths);
        out.push(rule(&widths, '-'));
    }
    out
}

fn cell_lines(cell: &str) -> Vec<String> {
    cell.split('\n')
        .map(|line| {
            line.strip_suffix('\r')
                .unwrap_or(line)
                .replace('\t', "    ")
        })
        .collect()
}

fn rule(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for &w in widths {
        line.extend(std::iter::repeat_n(fill, w + 2));
        line.push('+');
    }
    line
}

fn push_row(out: &mut Vec<String>, cells: &[Vec<String>], widths: &[usize]) {
    let height = cells.iter().map(Vec::len).max().unwrap_or(1);
    for i in 0..height {
        let mut line = String::from("|");
        for (lines, &w) in cells.iter().zip(widths) {
            let text = lines.get(i).map(String::as_str).unwrap_or("");
            line.push(' ');
            line.push_str(&pad_to_width(text, w));
            line.push_str(" |");
        }
        out.push(line);
    }
}

// ---------------------------------------------------------------------------
// Task detail
// ---------------------------------------------------------------------------

/// Format the full, untruncated view of one task
pub fn format_task_detail(task: &Task) -> Vec<String> {
    let mut lines = vec![
        "TASK DETAILS:".to_string(),
        format!("ID: {}", task.id),
        format!("Title: {}", task.title),
        format!("State: {}", task.state.label()),
    ];
    if task.has_note() {
        lines.push("Notes:".to_string());
        // Verbatim, embedded line breaks included
        lines.push(task.note.clone());
    } else {
        lines.push("Notes: None".to_string());
    }
    lines
}

// ---------------------------------------------------------------------------
// Check report
// ---------------------------------------------------------------------------

pub fn format_check_result(result: &CheckResult) -> Vec<String> {
    let mut lines = Vec::new();

    if !result.errors.is_empty() {
        lines.push("Errors:".to_string());
        for err in &result.errors {
            lines.push(match err {
                CheckError::DuplicateId {
                    store,
                    task_id,
                    count,
                } => format!("  [{}] {} appears {} times", store, task_id, count),
                CheckError::InBothStores { task_id } => {
                    format!("  {} is in both the active and completed stores", task_id)
                }
            });
        }
    }

    if !result.warnings.is_empty() {
        if !result.errors.is_empty() {
            lines.push(String::new());
        }
        lines.push("Warnings:".to_string());
        for warn in &result.warnings {
            lines.push(match warn {
                CheckWarning::StateMismatch {
                    store,
                    task_id,
                    state,
                } => format!("  [{}] {} has state {}", store, task_id, state.label()),
                CheckWarning::EmptyTitle { store, task_id } => {
                    format!("  [{}] {} has an empty title", store, task_id)
                }
            });
        }
    }

    if result.valid {
        lines.push("✓ stores are valid".to_string());
    } else {
        lines.push("✗ stores have errors".to_string());
    }
    lines
}

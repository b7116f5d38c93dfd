use serde::Serialize;

use crate::model::task::{Task, TaskStatus};
use crate::model::week::WeekKey;
use crate::parse::markdown_parser::HEADING_DATE_FORMAT;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct WeekJson<'a> {
    pub week: String,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct ShareJson {
    pub week: String,
    pub slug: String,
    pub url: String,
}

#[derive(Serialize)]
pub struct MarkJson {
    pub id: String,
    pub day: String,
    pub status: TaskStatus,
}

#[derive(Serialize)]
pub struct DoneJson {
    pub id: String,
    pub done: bool,
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// Grid cell for a status; default shows as `.` so columns stay visible
fn cell(status: TaskStatus) -> char {
    match status {
        TaskStatus::Default => '.',
        other => other.symbol(),
    }
}

/// Render one week as a grid: seven status columns, then the task.
/// Children are indented under their parent line.
pub fn render_week(week: &WeekKey, tasks: &[&Task]) -> Vec<String> {
    let mut lines = Vec::new();
    match week.monday() {
        Some(monday) => lines.push(format!(
            "{} (week of {})",
            week,
            monday.format(HEADING_DATE_FORMAT)
        )),
        None => lines.push(week.to_string()),
    }

    if tasks.is_empty() {
        lines.push("  no tasks".to_string());
        return lines;
    }

    lines.push("M T W T F S S".to_string());
    for task in tasks {
        let cells: Vec<String> = task
            .statuses
            .days()
            .iter()
            .map(|s| cell(*s).to_string())
            .collect();
        let indent = if task.parent_id.is_some() { "  " } else { "" };
        lines.push(format!(
            "{}  {}{} {}",
            cells.join(" "),
            indent,
            task.title,
            task.id
        ));
    }
    lines
}

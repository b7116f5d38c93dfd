use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::model::task::{Statuses, Task, TaskStatus, repair_dangling_parents};
use crate::model::week::WeekKey;

/// Heading line that opens a week section
pub const WEEK_HEADING_PREFIX: &str = "## Week of ";

/// Date format of week headings, e.g. `January 6, 2025`
pub const HEADING_DATE_FORMAT: &str = "%B %-d, %Y";

/// One task per line:
///
/// ```text
/// [indent]- [D][SSSSSSS] Title text (id:abcd;created:2025-01-06;parentId:wxyz)
/// ```
///
/// - `indent`: empty for a top-level task, exactly two spaces for a child
/// - `D`: done flag, ` ` or `v` (fixed position, independent of the status `v`)
/// - `SSSSSSS`: seven status symbols, Monday→Sunday
/// - `title`: display text (title without its 4-char done prefix)
/// - `meta`: `key:value` pairs separated by `;`
static TASK_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<indent>(?:  )?)- \[(?P<done>[ v])\]\[(?P<statuses>.{7})\] (?P<title>.*) \((?P<meta>[^()]*)\)$",
    )
    .expect("task line pattern")
});

/// Why a task-looking line was left out of the parse result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Starts like a task but does not follow the line grammar
    Malformed,
    MissingId,
    MissingCreated,
    /// Appears before any `## Week of` heading
    NoWeek,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DropReason::Malformed => "malformed task line",
            DropReason::MissingId => "missing id",
            DropReason::MissingCreated => "missing created date",
            DropReason::NoWeek => "no week heading above",
        };
        f.write_str(s)
    }
}

/// A skipped line, 1-based
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedLine {
    pub line: usize,
    pub reason: DropReason,
    pub text: String,
}

/// Parse a markdown document into a flat task list in document order.
/// Bad lines are skipped; see [`parse_markdown_with_report`].
pub fn parse_markdown(source: &str) -> Vec<Task> {
    parse_markdown_with_report(source).0
}

/// Parse a markdown document, also returning the task-looking lines that
/// were dropped. Never fails: a damaged file yields a partial list.
pub fn parse_markdown_with_report(source: &str) -> (Vec<Task>, Vec<DroppedLine>) {
    let mut tasks = Vec::new();
    let mut dropped = Vec::new();
    let mut current_week: Option<WeekKey> = None;

    for (idx, line) in source.lines().enumerate() {
        if let Some(rest) = line.strip_prefix(WEEK_HEADING_PREFIX) {
            // Unparsable dates keep the previous week context
            if let Some(week) = parse_heading_date(rest) {
                current_week = Some(week);
            }
            continue;
        }

        let mut skip = |reason: DropReason| {
            dropped.push(DroppedLine {
                line: idx + 1,
                reason,
                text: line.to_string(),
            })
        };

        let Some(caps) = TASK_LINE_RE.captures(line) else {
            if line.trim_start().starts_with("- [") {
                skip(DropReason::Malformed);
            }
            continue;
        };

        let meta = LineMeta::parse(&caps["meta"]);
        let Some(id) = meta.id else {
            skip(DropReason::MissingId);
            continue;
        };
        let Some(created) = meta.created else {
            skip(DropReason::MissingCreated);
            continue;
        };
        let Some(week) = current_week else {
            skip(DropReason::NoWeek);
            continue;
        };

        let done = &caps["done"] == "v";
        tasks.push(Task {
            id: id.to_string(),
            title: Task::compose_title(done, &caps["title"]),
            created_at: created_at_from_day(created),
            parent_id: meta.parent_id.map(str::to_string),
            week: week.to_string(),
            statuses: parse_status_string(&caps["statuses"]),
            is_collapsed: None,
        });
    }

    repair_dangling_parents(&mut tasks);

    (tasks, dropped)
}

/// Parse the date of a `## Week of <date>` heading into its ISO week
pub fn parse_heading_date(text: &str) -> Option<WeekKey> {
    NaiveDate::parse_from_str(text.trim(), HEADING_DATE_FORMAT)
        .ok()
        .map(WeekKey::from_date)
}

/// Decode a seven-symbol status column. Unknown symbols read as default.
pub fn parse_status_string(s: &str) -> Statuses {
    let symbols: Vec<char> = s.chars().collect();
    Statuses::from_fn(|i| {
        symbols
            .get(i)
            .and_then(|c| TaskStatus::from_symbol(*c))
            .unwrap_or_default()
    })
}

/// The metadata parenthetical: `id:abcd;created:2025-01-06;parentId:wxyz`
#[derive(Debug, Default, PartialEq, Eq)]
struct LineMeta<'a> {
    id: Option<&'a str>,
    created: Option<&'a str>,
    parent_id: Option<&'a str>,
}

impl<'a> LineMeta<'a> {
    fn parse(meta: &'a str) -> Self {
        let mut out = LineMeta::default();
        for pair in meta.split(';') {
            let Some((key, value)) = pair.split_once(':') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.trim() {
                "id" => out.id = Some(value),
                "created" => out.created = Some(value),
                "parentId" => out.parent_id = Some(value),
                _ => {}
            }
        }
        out
    }
}

/// Markdown keeps only the day; restore it as midnight UTC. Anything that is
/// not a plain date is kept as written.
fn created_at_from_day(created: &str) -> String {
    match NaiveDate::parse_from_str(created, "%Y-%m-%d") {
        Ok(date) => format!("{}T00:00:00.000Z", date.format("%Y-%m-%d")),
        Err(_) => created.to_string(),
    }
}

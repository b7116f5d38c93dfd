use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;

use crate::model::task::{Statuses, Task};
use crate::model::week::WeekKey;
use crate::parse::markdown_parser::{HEADING_DATE_FORMAT, WEEK_HEADING_PREFIX};

/// First line of every exported document
pub const DOCUMENT_HEADER: &str = "# WeekList Tasks";

/// Serialize a flat task list into the markdown export format.
///
/// Tasks are grouped into one `## Week of` section per week, sorted by
/// (year, week). Within a week, each top-level task is followed by its
/// children (pre-order), keeping list order among siblings. Tasks whose
/// week key is malformed, or names a week that doesn't exist, are left out.
pub fn format_markdown(tasks: &[Task]) -> String {
    let mut buckets: IndexMap<WeekKey, Vec<&Task>> = IndexMap::new();
    for task in tasks {
        match task.week.parse::<WeekKey>() {
            Ok(week) => buckets.entry(week).or_default().push(task),
            Err(e) => tracing::debug!(task = %task.id, error = %e, "skipping task with bad week"),
        }
    }
    buckets.sort_keys();

    let mut sections = vec![DOCUMENT_HEADER.to_string()];
    for (week, bucket) in &buckets {
        let Some(monday) = week.monday() else {
            tracing::debug!(%week, "skipping week with no Monday");
            continue;
        };
        let mut lines = vec![
            format!("{}{}", WEEK_HEADING_PREFIX, monday.format(HEADING_DATE_FORMAT)),
            String::new(),
        ];
        serialize_week(bucket, &mut lines);
        sections.push(lines.join("\n"));
    }

    format!("{}\n", sections.join("\n\n").trim())
}

/// Emit one week's tasks in pre-order. Tasks whose parent is outside the
/// bucket start their own subtree and keep the parentId metadata.
fn serialize_week(bucket: &[&Task], lines: &mut Vec<String>) {
    let ids: HashSet<&str> = bucket.iter().map(|t| t.id.as_str()).collect();
    let mut children: IndexMap<&str, Vec<usize>> = IndexMap::new();
    for (idx, task) in bucket.iter().enumerate() {
        if let Some(parent) = task.parent_id.as_deref() {
            children.entry(parent).or_default().push(idx);
        }
    }
    let mut emitted = vec![false; bucket.len()];

    for (idx, task) in bucket.iter().enumerate() {
        let is_root = match task.parent_id.as_deref() {
            None => true,
            Some(p) => !ids.contains(p) || p == task.id,
        };
        if is_root {
            emit_subtree(idx, bucket, &children, &mut emitted, lines);
        }
    }

    // Parent cycles have no root; emit whatever is left so nothing is lost
    for idx in 0..bucket.len() {
        if !emitted[idx] {
            emit_subtree(idx, bucket, &children, &mut emitted, lines);
        }
    }
}

/// Depth-first walk from `root` with an explicit stack, so chains of any
/// length are safe. Children are pushed in reverse to pop in list order.
fn emit_subtree(
    root: usize,
    bucket: &[&Task],
    children: &IndexMap<&str, Vec<usize>>,
    emitted: &mut [bool],
    lines: &mut Vec<String>,
) {
    let mut stack = vec![(root, 0usize)];
    while let Some((idx, depth)) = stack.pop() {
        if emitted[idx] {
            continue;
        }
        emitted[idx] = true;
        let task = bucket[idx];
        lines.push(serialize_task_line(task, depth > 0));

        if let Some(kids) = children.get(task.id.as_str()) {
            stack.extend(
                kids.iter()
                    .rev()
                    .filter(|&&kid| !emitted[kid])
                    .map(|&kid| (kid, depth + 1)),
            );
        }
    }
}

/// `- [D][SSSSSSS] Title (id:..;created:..;parentId:..)`. Only one level of
/// indentation exists in the format, so any depth > 0 is a child.
pub fn serialize_task_line(task: &Task, child: bool) -> String {
    let indent = if child { "  " } else { "" };
    let done = if task.is_done() { 'v' } else { ' ' };

    let mut meta = format!("id:{};created:{}", task.id, created_day(&task.created_at));
    if let Some(ref parent) = task.parent_id {
        meta.push_str(&format!(";parentId:{}", parent));
    }

    format!(
        "{}- [{}][{}] {} ({})",
        indent,
        done,
        status_string(&task.statuses),
        task.display_title().replace(['\r', '\n'], " "),
        meta
    )
}

/// Seven status symbols, Monday→Sunday
pub fn status_string(statuses: &Statuses) -> String {
    statuses.days().iter().map(|s| s.symbol()).collect()
}

/// Reduce a creation timestamp to `yyyy-MM-dd`. Values that are neither an
/// RFC 3339 timestamp nor start with a date are written as-is, minus the
/// characters that would break the metadata block.
fn created_day(created_at: &str) -> String {
    if let Ok(ts) = DateTime::parse_from_rfc3339(created_at) {
        return ts.with_timezone(&Utc).format("%Y-%m-%d").to_string();
    }
    if let Some(prefix) = created_at.get(..10)
        && NaiveDate::parse_from_str(prefix, "%Y-%m-%d").is_ok()
    {
        return prefix.to_string();
    }
    created_at.replace([';', '(', ')'], "")
}

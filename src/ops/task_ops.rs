use std::str::FromStr;

use chrono::Weekday;
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::task::{Task, TaskStatus};
use crate::model::week::WeekKey;

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("unknown day '{0}' (expected monday..sunday)")]
    InvalidDay(String),
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

pub fn find_task_mut<'a>(tasks: &'a mut [Task], id: &str) -> Result<&'a mut Task, TaskError> {
    tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| TaskError::NotFound(id.to_string()))
}

/// Tasks belonging to `week`, in list order. Keys are compared parsed, so
/// `2025-02` and `2025-2` are the same week.
pub fn tasks_in_week<'a>(tasks: &'a [Task], week: &WeekKey) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| t.week.parse::<WeekKey>().ok().as_ref() == Some(week))
        .collect()
}

/// Owned copy of one week's tasks, ready for the share encoder
pub fn week_snapshot(tasks: &[Task], week: &WeekKey) -> Vec<Task> {
    tasks_in_week(tasks, week).into_iter().cloned().collect()
}

/// Parse a weekday name (`mon`, `Monday`, ...)
pub fn parse_day(s: &str) -> Result<Weekday, TaskError> {
    Weekday::from_str(s.trim()).map_err(|_| TaskError::InvalidDay(s.to_string()))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Advance one day's status along the cycle; returns the new status
pub fn cycle_status(tasks: &mut [Task], id: &str, day: Weekday) -> Result<TaskStatus, TaskError> {
    let task = find_task_mut(tasks, id)?;
    let next = task.statuses.get(day).next();
    task.statuses.set(day, next);
    Ok(next)
}

/// Flip the done prefix; returns whether the task is now done
pub fn toggle_done(tasks: &mut [Task], id: &str) -> Result<bool, TaskError> {
    let task = find_task_mut(tasks, id)?;
    task.toggle_done();
    Ok(task.is_done())
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekSummary {
    pub week: String,
    pub tasks: usize,
    pub done: usize,
}

/// Per-week task counts, sorted by week. Tasks with malformed keys are
/// counted nowhere.
pub fn week_summaries(tasks: &[Task]) -> Vec<WeekSummary> {
    let mut counts: IndexMap<WeekKey, (usize, usize)> = IndexMap::new();
    for task in tasks {
        let Ok(week) = task.week.parse::<WeekKey>() else {
            continue;
        };
        let (total, done) = counts.entry(week).or_default();
        *total += 1;
        *done += usize::from(task.is_done());
    }
    counts.sort_keys();
    counts
        .into_iter()
        .map(|(week, (tasks, done))| WeekSummary {
            week: week.to_string(),
            tasks,
            done,
        })
        .collect()
}

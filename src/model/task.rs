use std::collections::HashSet;

use chrono::{SecondsFormat, Utc, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Title prefix of an open task
pub const OPEN_PREFIX: &str = "[ ] ";
/// Title prefix of a done task
pub const DONE_PREFIX: &str = "[v] ";

/// Lowercase weekday name, as used for status map keys
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Per-day task status. Variant order is the click-to-advance cycle and the
/// numeric index used by share links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Default,
    Planned,
    Completed,
    Rescheduled,
    Cancelled,
}

impl TaskStatus {
    /// All statuses in cycle order
    pub const CYCLE: [TaskStatus; 5] = [
        TaskStatus::Default,
        TaskStatus::Planned,
        TaskStatus::Completed,
        TaskStatus::Rescheduled,
        TaskStatus::Cancelled,
    ];

    /// Position in the cycle (0 = default … 4 = cancelled)
    pub fn index(self) -> usize {
        match self {
            TaskStatus::Default => 0,
            TaskStatus::Planned => 1,
            TaskStatus::Completed => 2,
            TaskStatus::Rescheduled => 3,
            TaskStatus::Cancelled => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<TaskStatus> {
        Self::CYCLE.get(index).copied()
    }

    /// The next status when clicking through the cycle; wraps to default.
    pub fn next(self) -> TaskStatus {
        Self::CYCLE[(self.index() + 1) % Self::CYCLE.len()]
    }

    /// Lowercase name, as used in JSON
    pub fn name(self) -> &'static str {
        match self {
            TaskStatus::Default => "default",
            TaskStatus::Planned => "planned",
            TaskStatus::Completed => "completed",
            TaskStatus::Rescheduled => "rescheduled",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// The character used in the markdown status column
    pub fn symbol(self) -> char {
        match self {
            TaskStatus::Default => ' ',
            TaskStatus::Planned => 'o',
            TaskStatus::Completed => 'v',
            TaskStatus::Rescheduled => '>',
            TaskStatus::Cancelled => 'x',
        }
    }

    /// Parse a markdown status character. Both ` ` and `-` mean default.
    pub fn from_symbol(c: char) -> Option<TaskStatus> {
        match c {
            ' ' | '-' => Some(TaskStatus::Default),
            'o' => Some(TaskStatus::Planned),
            'v' => Some(TaskStatus::Completed),
            '>' => Some(TaskStatus::Rescheduled),
            'x' => Some(TaskStatus::Cancelled),
            _ => None,
        }
    }
}

/// One status per weekday, Monday first. Always holds all seven days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Statuses([TaskStatus; 7]);

impl Statuses {
    pub fn get(&self, day: Weekday) -> TaskStatus {
        self.0[day.num_days_from_monday() as usize]
    }

    pub fn set(&mut self, day: Weekday, status: TaskStatus) {
        self.0[day.num_days_from_monday() as usize] = status;
    }

    /// Statuses in Monday→Sunday order
    pub fn days(&self) -> &[TaskStatus; 7] {
        &self.0
    }

    /// Build from a per-day lookup, Monday→Sunday
    pub fn from_fn(f: impl FnMut(usize) -> TaskStatus) -> Self {
        Statuses(std::array::from_fn(f))
    }
}

/// Wire shape of the status map: `{ "monday": "default", ... }`.
/// Missing days deserialize as default so the seven-slot invariant holds.
#[derive(Serialize, Deserialize)]
struct StatusMap {
    #[serde(default)]
    monday: TaskStatus,
    #[serde(default)]
    tuesday: TaskStatus,
    #[serde(default)]
    wednesday: TaskStatus,
    #[serde(default)]
    thursday: TaskStatus,
    #[serde(default)]
    friday: TaskStatus,
    #[serde(default)]
    saturday: TaskStatus,
    #[serde(default)]
    sunday: TaskStatus,
}

impl Serialize for Statuses {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] = self.0;
        StatusMap {
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
            sunday,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Statuses {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let m = StatusMap::deserialize(deserializer)?;
        Ok(Statuses([
            m.monday,
            m.tuesday,
            m.wednesday,
            m.thursday,
            m.friday,
            m.saturday,
            m.sunday,
        ]))
    }
}

/// A planned task: one row of the weekly grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Short opaque id, unique within the list
    pub id: String,
    /// Full title including the `[ ] ` / `[v] ` done prefix
    pub title: String,
    /// ISO-8601 creation timestamp
    pub created_at: String,
    /// Id of the parent task (one level of nesting)
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Week key, `<ISO year>-<ISO week>`
    pub week: String,
    pub statuses: Statuses,
    /// Whether children are visually hidden (UI state only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_collapsed: Option<bool>,
}

impl Task {
    /// Create a top-level task created now, with all days at default
    pub fn new(id: impl Into<String>, title: impl Into<String>, week: impl Into<String>) -> Self {
        Task {
            id: id.into(),
            title: title.into(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            parent_id: None,
            week: week.into(),
            statuses: Statuses::default(),
            is_collapsed: None,
        }
    }

    /// Whether the title carries the done prefix
    pub fn is_done(&self) -> bool {
        self.title.starts_with(DONE_PREFIX)
    }

    /// Title text without the done prefix. Titles lacking a recognized
    /// prefix are returned whole.
    pub fn display_title(&self) -> &str {
        self.title
            .strip_prefix(DONE_PREFIX)
            .or_else(|| self.title.strip_prefix(OPEN_PREFIX))
            .unwrap_or(&self.title)
    }

    /// Rebuild the title from a done flag and display text
    pub fn compose_title(done: bool, text: &str) -> String {
        let prefix = if done { DONE_PREFIX } else { OPEN_PREFIX };
        format!("{}{}", prefix, text)
    }

    /// Flip the done prefix, keeping the display text
    pub fn toggle_done(&mut self) {
        self.title = Task::compose_title(!self.is_done(), self.display_title());
    }
}

/// Null out parent references that don't resolve within `tasks`
pub fn repair_dangling_parents(tasks: &mut [Task]) {
    let ids: HashSet<String> = tasks.iter().map(|t| t.id.clone()).collect();
    for task in tasks.iter_mut() {
        if let Some(parent) = task.parent_id.as_deref()
            && !ids.contains(parent)
        {
            tracing::debug!(task = %task.id, parent, "dropping dangling parent reference");
            task.parent_id = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_cycle_wraps() {
        assert_eq!(TaskStatus::Default.next(), TaskStatus::Planned);
        assert_eq!(TaskStatus::Planned.next(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Completed.next(), TaskStatus::Rescheduled);
        assert_eq!(TaskStatus::Rescheduled.next(), TaskStatus::Cancelled);
        assert_eq!(TaskStatus::Cancelled.next(), TaskStatus::Default);
    }

    #[test]
    fn test_status_index_round_trip() {
        for (i, status) in TaskStatus::CYCLE.iter().enumerate() {
            assert_eq!(status.index(), i);
            assert_eq!(TaskStatus::from_index(i), Some(*status));
        }
        assert_eq!(TaskStatus::from_index(5), None);
    }

    #[test]
    fn test_status_symbols() {
        assert_eq!(TaskStatus::from_symbol('-'), Some(TaskStatus::Default));
        assert_eq!(TaskStatus::from_symbol(' '), Some(TaskStatus::Default));
        assert_eq!(TaskStatus::from_symbol('v'), Some(TaskStatus::Completed));
        assert_eq!(TaskStatus::from_symbol('?'), None);
        assert_eq!(TaskStatus::Cancelled.symbol(), 'x');
    }

    #[test]
    fn test_names_match_json() {
        for status in TaskStatus::CYCLE {
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                serde_json::Value::from(status.name())
            );
        }
        assert_eq!(day_name(Weekday::Wed), "wednesday");
    }

    #[test]
    fn test_statuses_json_shape() {
        let mut statuses = Statuses::default();
        statuses.set(Weekday::Wed, TaskStatus::Planned);
        let json = serde_json::to_value(statuses).unwrap();
        assert_eq!(json["wednesday"], "planned");
        assert_eq!(json["monday"], "default");

        let partial: Statuses = serde_json::from_str(r#"{"friday":"cancelled"}"#).unwrap();
        assert_eq!(partial.get(Weekday::Fri), TaskStatus::Cancelled);
        assert_eq!(partial.get(Weekday::Mon), TaskStatus::Default);
    }

    #[test]
    fn test_task_json_is_camel_case() {
        let mut task = Task::new("ab12", "[ ] Write report", "2025-2");
        task.created_at = "2025-01-06T00:00:00.000Z".to_string();
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["createdAt"], "2025-01-06T00:00:00.000Z");
        assert!(json["parentId"].is_null());
        assert!(json.get("isCollapsed").is_none());
    }

    #[test]
    fn test_display_title_and_toggle() {
        let mut task = Task::new("a", "[ ] Call mom", "2025-2");
        assert!(!task.is_done());
        assert_eq!(task.display_title(), "Call mom");
        task.toggle_done();
        assert_eq!(task.title, "[v] Call mom");
        assert!(task.is_done());

        let bare = Task::new("b", "No prefix", "2025-2");
        assert_eq!(bare.display_title(), "No prefix");
    }

    #[test]
    fn test_repair_dangling_parents() {
        let mut child = Task::new("c", "[ ] Child", "2025-2");
        child.parent_id = Some("p".to_string());
        let mut orphan = Task::new("o", "[ ] Orphan", "2025-2");
        orphan.parent_id = Some("gone".to_string());
        let mut tasks = vec![Task::new("p", "[ ] Parent", "2025-2"), child, orphan];

        repair_dangling_parents(&mut tasks);
        assert_eq!(tasks[1].parent_id.as_deref(), Some("p"));
        assert_eq!(tasks[2].parent_id, None);
    }
}

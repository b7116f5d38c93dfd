use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::model::task::{Statuses, Task, TaskStatus, repair_dangling_parents};
use crate::share::ShareError;
use crate::share::short_id::ShortIds;

/// Wire version written by the encoder
pub const LATEST_VERSION: u32 = 3;

/// Decoded snapshot, identical in shape for every wire version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareData {
    pub week: String,
    pub tasks: Vec<Task>,
    #[serde(default = "default_v1")]
    pub version: u32,
}

fn default_v1() -> u32 {
    1
}

/// `[shortId, shortParentId | "", "<7 status digits>", collapsed 1|0, title]`
pub type TaskTupleV3 = (String, String, String, u8, String);

/// `[3, week, [task tuples]]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayloadV3(pub u32, pub String, pub Vec<TaskTupleV3>);

/// `{"v":2,"w":week,"t":[...]}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayloadV2 {
    pub v: u32,
    #[serde(default)]
    pub w: String,
    #[serde(default)]
    pub t: Vec<TaskV2>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskV2 {
    pub i: String,
    pub t: String,
    #[serde(default)]
    pub p: Option<String>,
    /// Status indices, Monday→Sunday. Entries are kept loose so one bad
    /// value only resets its own day.
    #[serde(default)]
    pub s: Vec<Value>,
    #[serde(default)]
    pub c: Option<u8>,
}

/// Every payload shape ever written into a share link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Verbatim `{week, tasks, version}`
    V1(ShareData),
    /// Object-keyed minified tasks
    V2(PayloadV2),
    /// Tuple-minified tasks
    V3(PayloadV3),
}

impl Payload {
    /// Pick the variant from the JSON shape: an array led by `3` is V3, an
    /// object with `v: 2` is V2, anything else is read as V1.
    pub fn detect(value: Value) -> Result<Payload, ShareError> {
        let payload = match wire_version(&value) {
            3 => Payload::V3(serde_json::from_value(value)?),
            2 => Payload::V2(serde_json::from_value(value)?),
            _ => Payload::V1(serde_json::from_value(value)?),
        };
        Ok(payload)
    }

    /// Normalize into the common snapshot. `created_at` stands in for the
    /// creation timestamps that V2 and V3 don't carry. Parent ids that name
    /// no task in the snapshot are cleared.
    pub fn into_share_data(self, created_at: &str) -> ShareData {
        let mut data = match self {
            Payload::V1(data) => data,
            Payload::V2(payload) => decode_v2(payload, created_at),
            Payload::V3(payload) => decode_v3(payload, created_at),
        };
        repair_dangling_parents(&mut data.tasks);
        data
    }
}

fn wire_version(value: &Value) -> u32 {
    match value {
        Value::Array(items) if items.first().and_then(Value::as_u64) == Some(3) => 3,
        Value::Object(map) if map.get("v").and_then(Value::as_u64) == Some(2) => 2,
        _ => 1,
    }
}

fn status_at(index: Option<u64>) -> TaskStatus {
    index
        .and_then(|i| usize::try_from(i).ok())
        .and_then(TaskStatus::from_index)
        .unwrap_or_default()
}

fn decode_v2(payload: PayloadV2, created_at: &str) -> ShareData {
    let tasks = payload
        .t
        .into_iter()
        .map(|t| Task {
            id: t.i,
            title: t.t,
            created_at: created_at.to_string(),
            parent_id: t.p.filter(|p| !p.is_empty()),
            week: payload.w.clone(),
            statuses: Statuses::from_fn(|day| status_at(t.s.get(day).and_then(Value::as_u64))),
            is_collapsed: t.c.map(|c| c == 1),
        })
        .collect();
    ShareData {
        week: payload.w,
        tasks,
        version: 2,
    }
}

fn decode_v3(payload: PayloadV3, created_at: &str) -> ShareData {
    let PayloadV3(_, week, tuples) = payload;
    let tasks = tuples
        .into_iter()
        .map(|(id, parent, statuses, collapsed, title)| {
            let digits: Vec<Option<u64>> = statuses
                .chars()
                .map(|c| c.to_digit(10).map(u64::from))
                .collect();
            Task {
                id,
                title,
                created_at: created_at.to_string(),
                parent_id: Some(parent).filter(|p| !p.is_empty()),
                week: week.clone(),
                statuses: Statuses::from_fn(|day| status_at(digits.get(day).copied().flatten())),
                is_collapsed: Some(collapsed == 1),
            }
        })
        .collect();
    ShareData {
        week,
        tasks,
        version: 3,
    }
}

/// Build the V3 JSON value for `tasks`, with ids replaced by short ids
pub fn encode_v3(tasks: &[Task], week: &str) -> Value {
    let ids = ShortIds::assign(tasks);
    let rows: Vec<Value> = tasks
        .iter()
        .map(|task| {
            let short = |id: &str| ids.get(id).unwrap_or_default().to_string();
            let parent = task.parent_id.as_deref().map(short).unwrap_or_default();
            let statuses: String = task
                .statuses
                .days()
                .iter()
                .map(|s| s.index().to_string())
                .collect();
            let collapsed = u8::from(task.is_collapsed == Some(true));
            json!([short(&task.id), parent, statuses, collapsed, task.title])
        })
        .collect();
    json!([LATEST_VERSION, week, rows])
}

use indexmap::IndexMap;

use crate::model::task::Task;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Compact ids for a share payload: a base-36 counter from 0, handed out in
/// first-encounter order while scanning each task's id, then its parent id.
/// Derived from list order alone, so the same list always gets the same table.
#[derive(Debug, Default, Clone)]
pub struct ShortIds {
    map: IndexMap<String, String>,
}

impl ShortIds {
    pub fn assign(tasks: &[Task]) -> Self {
        let mut ids = ShortIds::default();
        for task in tasks {
            ids.intern(&task.id);
            if let Some(ref parent) = task.parent_id {
                ids.intern(parent);
            }
        }
        ids
    }

    fn intern(&mut self, id: &str) {
        let next = self.map.len();
        self.map
            .entry(id.to_string())
            .or_insert_with(|| to_base36(next));
    }

    /// Short id for a real id seen during [`ShortIds::assign`]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.map.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Lowercase base-36 rendering of `n`
pub fn to_base36(mut n: usize) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36_DIGITS[n % 36]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

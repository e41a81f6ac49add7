use super::task::{DailyTask, Todo};
use super::timer::ActiveTimer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_true() -> bool {
    true
}

/// A goal inside a plan section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_examples: Option<u32>,
}

/// A titled group of goals (e.g. "Q3 Growth")
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub items: Vec<PlanItem>,
}

/// Result of resolving a `goalId`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalRef<'a> {
    pub item: &'a PlanItem,
    pub section_title: &'a str,
}

/// The whole persisted document. Always written back as a full replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDocument {
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub daily_tasks: Vec<DailyTask>,
    #[serde(default)]
    pub todos: Vec<Todo>,
    #[serde(default)]
    pub active_timers: Vec<ActiveTimer>,
    #[serde(default = "default_true")]
    pub frog_enabled: bool,
    /// Single-timer field from older documents; folded into `active_timers` on load
    #[serde(default, skip_serializing)]
    active_timer: Option<ActiveTimer>,
    /// Keys owned by other parts of the app, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for AppDocument {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            daily_tasks: Vec::new(),
            todos: Vec::new(),
            active_timers: Vec::new(),
            frog_enabled: true,
            active_timer: None,
            extra: Map::new(),
        }
    }
}

impl AppDocument {
    /// Parse a document and bring legacy fields up to date
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        let mut doc: AppDocument = serde_json::from_str(content)?;
        doc.migrate_legacy_timer();
        doc.fill_timer_ids();
        Ok(doc)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Move a lone `activeTimer` into `activeTimers` when the list is empty
    fn migrate_legacy_timer(&mut self) {
        if let Some(timer) = self.active_timer.take() {
            if self.active_timers.is_empty() {
                self.active_timers.push(timer);
            }
        }
    }

    /// Give id-less timers an id derived from their contents.
    ///
    /// The same stored timer gets the same id on every load, so an expiry
    /// already alerted for is not raised again after a reload.
    fn fill_timer_ids(&mut self) {
        for index in 0..self.active_timers.len() {
            if !self.active_timers[index].id.is_empty() {
                continue;
            }
            let timer = &self.active_timers[index];
            let base = match &timer.task_id {
                Some(task_id) => format!(
                    "{}-{}-{}",
                    timer.kind.to_tag(),
                    timer.end_time.timestamp_millis(),
                    task_id
                ),
                None => format!("{}-{}", timer.kind.to_tag(), timer.end_time.timestamp_millis()),
            };
            let mut id = base.clone();
            let mut n = 1;
            while self.active_timers.iter().any(|t| t.id == id) {
                n += 1;
                id = format!("{}-{}", base, n);
            }
            self.active_timers[index].id = id;
        }
    }

    pub fn task(&self, task_id: &str) -> Option<&DailyTask> {
        self.daily_tasks.iter().find(|t| t.id == task_id)
    }

    pub fn todo(&self, todo_id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == todo_id)
    }

    pub fn timer(&self, timer_id: &str) -> Option<&ActiveTimer> {
        self.active_timers.iter().find(|t| t.id == timer_id)
    }

    /// Look up a goal by id. Dangling ids resolve to `None`.
    pub fn goal_by_id(&self, goal_id: &str) -> Option<GoalRef<'_>> {
        self.sections.iter().find_map(|section| {
            section
                .items
                .iter()
                .find(|item| item.id == goal_id)
                .map(|item| GoalRef {
                    item,
                    section_title: &section.title,
                })
        })
    }

    /// All goals, flattened with their section titles
    pub fn all_goals(&self) -> Vec<GoalRef<'_>> {
        self.sections
            .iter()
            .flat_map(|section| {
                section.items.iter().map(move |item| GoalRef {
                    item,
                    section_title: &section.title,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimerKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_object_gives_defaults() {
        let doc = AppDocument::from_json("{}").unwrap();
        assert!(doc.daily_tasks.is_empty());
        assert!(doc.frog_enabled);
        assert_eq!(doc, AppDocument::default());
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let json = r#"{
            "sections": [],
            "notifications": {"enabled": true, "daily_time": "09:00"},
            "quickNotes": [{"id": "n1", "text": "hi", "timestamp": "x"}],
            "theme": "editorial"
        }"#;
        let doc = AppDocument::from_json(json).unwrap();
        assert_eq!(doc.extra["theme"], Value::String("editorial".into()));

        let written: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(written["notifications"]["daily_time"], Value::String("09:00".into()));
        assert_eq!(written["quickNotes"][0]["id"], Value::String("n1".into()));
    }

    #[test]
    fn test_legacy_active_timer_is_migrated() {
        let json = r#"{
            "activeTimer": {"type": "focus", "endTime": "2024-03-01T10:25:00Z", "durationMinutes": 25}
        }"#;
        let doc = AppDocument::from_json(json).unwrap();
        assert_eq!(doc.active_timers.len(), 1);
        assert_eq!(doc.active_timers[0].kind, TimerKind::Focus);
        assert_eq!(doc.active_timers[0].id, "focus-1709288700000");

        let written: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert!(written.get("activeTimer").is_none());
        assert_eq!(written["activeTimers"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_timer_without_id_keeps_its_id_across_loads() {
        let json = r#"{
            "activeTimers": [
                {"type": "task", "taskId": "t1", "endTime": "2024-03-01T11:00:00Z", "durationMinutes": 5},
                {"type": "task", "taskId": "t1", "endTime": "2024-03-01T11:00:00Z", "durationMinutes": 5},
                {"id": "kept", "type": "focus", "endTime": "2024-03-01T11:00:00Z", "durationMinutes": 25}
            ]
        }"#;
        let first = AppDocument::from_json(json).unwrap();
        let second = AppDocument::from_json(json).unwrap();

        let ids: Vec<&str> = first.active_timers.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["task-1709290800000-t1", "task-1709290800000-t1-2", "kept"]);
        assert_eq!(first.active_timers, second.active_timers);
    }

    #[test]
    fn test_legacy_timer_ignored_when_list_present() {
        let json = r#"{
            "activeTimer": {"id": "old", "type": "focus", "endTime": "2024-03-01T10:25:00Z", "durationMinutes": 25},
            "activeTimers": [{"id": "new", "type": "task", "endTime": "2024-03-01T11:00:00Z", "durationMinutes": 5}]
        }"#;
        let doc = AppDocument::from_json(json).unwrap();
        assert_eq!(doc.active_timers.len(), 1);
        assert_eq!(doc.active_timers[0].id, "new");
    }

    #[test]
    fn test_goal_lookup_tolerates_dangling_ids() {
        let mut doc = AppDocument::default();
        doc.sections.push(Section {
            id: "s1".into(),
            title: "Health".into(),
            period: "Q1".into(),
            items: vec![PlanItem {
                id: "g1".into(),
                text: "Run a 10k".into(),
                ..PlanItem::default()
            }],
        });

        let goal = doc.goal_by_id("g1").unwrap();
        assert_eq!(goal.item.text, "Run a 10k");
        assert_eq!(goal.section_title, "Health");
        assert!(doc.goal_by_id("gone").is_none());
        assert_eq!(doc.all_goals().len(), 1);
    }
}

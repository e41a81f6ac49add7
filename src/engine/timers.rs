use crate::domain::{ActiveTimer, AppDocument, TimerKind};
use chrono::{DateTime, Utc};

/// Parameters for a new countdown
#[derive(Debug, Clone, PartialEq)]
pub struct TimerRequest {
    pub duration_minutes: u32,
    pub kind: TimerKind,
    pub task_id: Option<String>,
    pub task_name: Option<String>,
}

impl TimerRequest {
    pub fn focus(duration_minutes: u32) -> Self {
        Self {
            duration_minutes,
            kind: TimerKind::Focus,
            task_id: None,
            task_name: None,
        }
    }

    pub fn for_task(duration_minutes: u32, task_id: impl Into<String>, task_name: impl Into<String>) -> Self {
        Self {
            duration_minutes,
            kind: TimerKind::Task,
            task_id: Some(task_id.into()),
            task_name: Some(task_name.into()),
        }
    }
}

/// Append a timer ending `duration_minutes` after `now`.
///
/// Several timers may run at once, including more than one for the same task.
pub fn start_timer(doc: &mut AppDocument, request: &TimerRequest, now: DateTime<Utc>) -> bool {
    if request.duration_minutes == 0 {
        return false;
    }

    doc.active_timers.push(ActiveTimer::new(
        request.kind,
        request.duration_minutes,
        now,
        request.task_id.clone(),
        request.task_name.clone(),
    ));
    true
}

/// Remove one timer, or all of them when `timer_id` is None
pub fn stop_timer(doc: &mut AppDocument, timer_id: Option<&str>) -> bool {
    match timer_id {
        Some(id) => {
            let before = doc.active_timers.len();
            doc.active_timers.retain(|t| t.id != id);
            doc.active_timers.len() != before
        }
        None => {
            if doc.active_timers.is_empty() {
                return false;
            }
            doc.active_timers.clear();
            true
        }
    }
}

/// Free-standing focus sessions
pub fn focus_timers(doc: &AppDocument) -> Vec<&ActiveTimer> {
    doc.active_timers
        .iter()
        .filter(|t| t.kind == TimerKind::Focus)
        .collect()
}

/// The first task timer attached to `task_id`
pub fn task_timer<'a>(doc: &'a AppDocument, task_id: &str) -> Option<&'a ActiveTimer> {
    doc.active_timers
        .iter()
        .find(|t| t.kind == TimerKind::Task && t.task_id.as_deref() == Some(task_id))
}

use super::enums::TimerKind;
use super::task::new_id;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A running countdown, anchored to an absolute end time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTimer {
    /// Filled in by `AppDocument::from_json` when missing
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TimerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    /// Authoritative; remaining time is always derived from this
    pub end_time: DateTime<Utc>,
    /// Only used to draw progress
    pub duration_minutes: u32,
}

impl ActiveTimer {
    pub fn new(
        kind: TimerKind,
        duration_minutes: u32,
        now: DateTime<Utc>,
        task_id: Option<String>,
        task_name: Option<String>,
    ) -> Self {
        Self {
            id: new_id(),
            kind,
            task_id,
            task_name,
            end_time: now + Duration::minutes(i64::from(duration_minutes)),
            duration_minutes,
        }
    }

    /// Whole seconds left, floored, never negative
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> u64 {
        let millis = self.end_time.signed_duration_since(now).num_milliseconds();
        if millis <= 0 {
            0
        } else {
            (millis / 1000) as u64
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining_seconds(now) == 0
    }

    /// Fraction of the duration already used (0.0 to 1.0)
    pub fn progress_ratio(&self, now: DateTime<Utc>) -> f64 {
        let total = f64::from(self.duration_minutes) * 60.0;
        if total == 0.0 {
            return 1.0;
        }
        let used = total - self.remaining_seconds(now) as f64;
        (used / total).clamp(0.0, 1.0)
    }

    /// Label shown next to the countdown
    pub fn label(&self) -> &str {
        match (&self.task_name, self.kind) {
            (Some(name), _) => name,
            (None, TimerKind::Focus) => "Focus",
            (None, TimerKind::Task) => "Timer",
        }
    }
}

/// Snapshot of one timer as of the last poll
#[derive(Debug, Clone, PartialEq)]
pub struct TimerState {
    pub timer: ActiveTimer,
    pub remaining_secs: u64,
    pub expired: bool,
}

/// Format seconds as "m:ss" (minutes are not wrapped into hours)
pub fn format_countdown(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_new_timer_ends_after_duration() {
        let now = at("2024-03-01T10:00:00Z");
        let timer = ActiveTimer::new(TimerKind::Focus, 25, now, None, None);
        assert_eq!(timer.end_time, at("2024-03-01T10:25:00Z"));
        assert_eq!(timer.remaining_seconds(now), 25 * 60);
    }

    #[test]
    fn test_remaining_is_floored_and_clamped() {
        let now = at("2024-03-01T10:00:00Z");
        let mut timer = ActiveTimer::new(TimerKind::Focus, 1, now, None, None);
        timer.end_time = now + Duration::milliseconds(2_999);
        assert_eq!(timer.remaining_seconds(now), 2);

        timer.end_time = now - Duration::seconds(90);
        assert_eq!(timer.remaining_seconds(now), 0);
        assert!(timer.is_expired(now));
    }

    #[test]
    fn test_sub_second_remainder_counts_as_expired() {
        let now = at("2024-03-01T10:00:00Z");
        let mut timer = ActiveTimer::new(TimerKind::Focus, 1, now, None, None);
        timer.end_time = now + Duration::milliseconds(400);
        assert!(timer.is_expired(now));
    }

    #[test]
    fn test_progress_ratio() {
        let now = at("2024-03-01T10:00:00Z");
        let timer = ActiveTimer::new(TimerKind::Task, 10, now, None, None);
        assert_eq!(timer.progress_ratio(now), 0.0);
        assert_eq!(timer.progress_ratio(now + Duration::minutes(5)), 0.5);
        assert_eq!(timer.progress_ratio(now + Duration::minutes(30)), 1.0);
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(0), "0:00");
        assert_eq!(format_countdown(65), "1:05");
        assert_eq!(format_countdown(25 * 60), "25:00");
        assert_eq!(format_countdown(90 * 60 + 9), "90:09");
    }

    #[test]
    fn test_label_prefers_task_name() {
        let now = at("2024-03-01T10:00:00Z");
        let named = ActiveTimer::new(TimerKind::Task, 5, now, Some("t1".into()), Some("Inbox zero".into()));
        assert_eq!(named.label(), "Inbox zero");
        let focus = ActiveTimer::new(TimerKind::Focus, 5, now, None, None);
        assert_eq!(focus.label(), "Focus");
    }

    #[test]
    fn test_timer_json_shape() {
        let json = r#"{
            "id": "x1",
            "type": "task",
            "taskId": "t1",
            "taskName": "Write",
            "endTime": "2024-03-01T10:25:00.000Z",
            "durationMinutes": 25
        }"#;
        let timer: ActiveTimer = serde_json::from_str(json).unwrap();
        assert_eq!(timer.kind, TimerKind::Task);
        assert_eq!(timer.task_id.as_deref(), Some("t1"));
        assert_eq!(timer.end_time, at("2024-03-01T10:25:00Z"));
    }
}

pub mod document;
pub mod enums;
pub mod task;
pub mod timer;
pub mod views;

pub use document::AppDocument;
pub use enums::{Category, Pane, TimerKind, UiMode};
pub use task::{DailyTask, Todo};
pub use timer::{format_countdown, ActiveTimer, TimerState};
pub use views::{
    day_progress, flatten_groups, frog_for_date, future_tasks_by_date, overdue_by_date, tasks_for_date,
    DateGroup,
};

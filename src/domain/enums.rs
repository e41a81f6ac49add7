use serde::{Deserialize, Serialize};

/// Which side of life a task belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Work,
    Personal,
}

impl Category {
    /// Display label used in task rows
    pub fn label(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Personal => "Personal",
        }
    }

    /// Flip between work and personal
    pub fn toggled(&self) -> Self {
        match self {
            Self::Work => Self::Personal,
            Self::Personal => Self::Work,
        }
    }
}

/// Kind of countdown timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerKind {
    /// Free-standing focus session
    Focus,
    /// Timebox bound to a task
    Task,
}

impl TimerKind {
    /// Short tag for listings
    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::Task => "task",
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    /// A task has been picked up; arrows move the drop marker only
    DraggingTask,
    /// The frog badge has been picked up; arrows move the hover target
    DraggingFrog,
    AddingTask,
    EditingTask,
    AddingTodo,
    EditingTodo,
    ConfirmDelete,
    /// A timer ran out and is waiting to be acknowledged
    TimerAlert,
}

/// Pane that currently owns the selection cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Tasks,
    Overdue,
    Backlog,
}

impl Pane {
    /// Next pane in Tab order
    pub fn next(&self) -> Self {
        match self {
            Self::Tasks => Self::Overdue,
            Self::Overdue => Self::Backlog,
            Self::Backlog => Self::Tasks,
        }
    }
}

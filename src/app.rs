use crate::clock::Clock;
use crate::config::{Config, PersistMode};
use crate::domain::{
    flatten_groups, overdue_by_date, tasks_for_date, ActiveTimer, AppDocument, Category, DailyTask,
    DateGroup, Pane, TimerState, Todo, UiMode,
};
use crate::engine::frog::frog_drop_command;
use crate::engine::timers::task_timer;
use crate::engine::{self, Command, NewTask, PollSchedule, TaskEdit, TimerMonitor, TimerRequest, TodoInput};
use crate::notifications;
use crate::persistence::{DocumentStore, StoreEvent, StoreWatcher, WakeDetector};
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;

/// What a form submit will do
#[derive(Debug, Clone, PartialEq)]
pub enum FormTarget {
    NewTask { date: NaiveDate },
    EditTask { task_id: String },
    NewTodo,
    EditTodo { todo_id: String },
}

/// Input form state for tasks and backlog items
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub target: FormTarget,
    pub text: String,
    pub description: String,
    pub goal: String,
    pub timebox: String,
    pub category: Category,
    pub is_frog: bool,
    pub editing_field: usize, // 0 = text, 1 = description, 2 = goal, 3 = timebox
}

impl FormState {
    fn new(target: FormTarget) -> Self {
        Self {
            target,
            text: String::new(),
            description: String::new(),
            goal: String::new(),
            timebox: String::new(),
            category: Category::Work,
            is_frog: false,
            editing_field: 0,
        }
    }

    pub fn is_task_form(&self) -> bool {
        matches!(self.target, FormTarget::NewTask { .. } | FormTarget::EditTask { .. })
    }

    /// Backlog items have no timebox field
    pub fn field_count(&self) -> usize {
        if self.is_task_form() {
            4
        } else {
            3
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.editing_field {
            0 => &mut self.text,
            1 => &mut self.description,
            2 => &mut self.goal,
            _ => &mut self.timebox,
        }
    }
}

/// A task picked up for reordering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskDrag {
    pub from: usize,
    pub over: usize,
}

/// What the delete confirmation is about
#[derive(Debug, Clone, PartialEq)]
pub enum PendingDelete {
    Task { task_id: String, text: String },
    Todo { todo_id: String, text: String },
}

impl PendingDelete {
    pub fn text(&self) -> &str {
        match self {
            PendingDelete::Task { text, .. } | PendingDelete::Todo { text, .. } => text,
        }
    }
}

/// Main application state
pub struct AppState {
    store: Box<dyn DocumentStore>,
    clock: Rc<dyn Clock>,
    pub config: Config,
    pub doc: AppDocument,
    pub monitor: TimerMonitor,
    schedule: PollSchedule,
    wake: WakeDetector,
    watcher: Option<StoreWatcher>,
    last_today: NaiveDate,

    pub selected_date: NaiveDate,
    pub pane: Pane,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub input_form: Option<FormState>,
    pub task_drag: Option<TaskDrag>,
    /// Index of the task the frog badge hovers over
    pub frog_hover: Option<usize>,
    pub pending_delete: Option<PendingDelete>,
    pub alerts: VecDeque<ActiveTimer>,
    pub status: Option<String>,
}

impl AppState {
    pub fn new(store: Box<dyn DocumentStore>, clock: Rc<dyn Clock>, config: Config) -> Result<Self> {
        let doc = store.load().context("Failed to load document")?;
        let today = clock.today();
        let mono = Instant::now();

        let mut app = Self {
            store,
            wake: WakeDetector::new(config.wake_threshold(), clock.now(), mono),
            schedule: PollSchedule::new(config.poll_interval()),
            clock,
            config,
            doc,
            monitor: TimerMonitor::new(),
            watcher: None,
            last_today: today,
            selected_date: today,
            pane: Pane::Tasks,
            selected_index: 0,
            ui_mode: UiMode::Normal,
            input_form: None,
            task_drag: None,
            frog_hover: None,
            pending_delete: None,
            alerts: VecDeque::new(),
            status: None,
        };
        app.sync_timers(mono);
        Ok(app)
    }

    /// Follow changes other processes make to the data file
    pub fn with_watcher(mut self, watcher: StoreWatcher) -> Self {
        self.watcher = Some(watcher);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    // ---- document changes ----

    /// Apply a command and persist the result according to the persist mode.
    /// Returns false when the command changed nothing.
    pub fn dispatch(&mut self, command: Command) -> Result<bool> {
        let Some(next) = engine::apply(&self.doc, &command, self.clock.as_ref()) else {
            return Ok(false);
        };

        match self.config.persist_mode {
            PersistMode::Optimistic => {
                self.doc = next;
                if let Err(e) = self.store.save(&self.doc) {
                    tracing::warn!(error = %e, command = command.name(), "save failed, keeping change in memory");
                    self.status = Some(format!("Save failed: {}", e));
                }
            }
            PersistMode::Confirmed => {
                self.store
                    .save(&next)
                    .with_context(|| format!("Failed to save after {}", command.name()))?;
                self.doc = next;
            }
        }

        tracing::debug!(command = command.name(), "applied");
        self.after_change(Instant::now());
        Ok(true)
    }

    /// UI entry point: failures end up in the status line instead of the caller
    fn perform(&mut self, command: Command) -> bool {
        match self.dispatch(command) {
            Ok(changed) => changed,
            Err(e) => {
                tracing::warn!(error = %e, "command failed");
                self.status = Some(format!("{:#}", e));
                false
            }
        }
    }

    /// Replace the document from the store. Returns true if it differed.
    pub fn reload(&mut self) -> Result<bool> {
        let doc = self.store.load().context("Failed to reload document")?;
        let changed = doc != self.doc;
        if changed {
            self.doc = doc;
        }
        self.after_change(Instant::now());
        Ok(changed)
    }

    fn after_change(&mut self, mono: Instant) {
        self.sync_timers(mono);
        self.alerts
            .retain(|alert| self.doc.active_timers.iter().any(|t| t.id == alert.id));
        if self.ui_mode == UiMode::TimerAlert && self.alerts.is_empty() {
            self.ui_mode = UiMode::Normal;
        }
        self.clamp_selection();
    }

    /// Poll again right away so states reflect the new timer set
    fn sync_timers(&mut self, mono: Instant) {
        if self.doc.active_timers.is_empty() {
            self.schedule.disarm();
            self.monitor.reset();
        } else {
            self.schedule.rearm(mono);
        }
    }

    // ---- ticking ----

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, mono: Instant) {
        let mut events = self.store.drain_events();
        if let Some(event) = self.wake.check(self.clock.now(), mono) {
            events.push(event);
        }
        if let Some(event) = self.watcher.as_ref().and_then(StoreWatcher::poll) {
            events.push(event);
        }
        for event in events {
            self.handle_store_event(event);
        }

        self.roll_day();

        if self.schedule.take_due(mono) {
            self.poll_timers(mono);
        }

        if !self.alerts.is_empty() && self.ui_mode == UiMode::Normal {
            self.ui_mode = UiMode::TimerAlert;
        }
    }

    fn handle_store_event(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::RecoveredFromBackup(path) => {
                self.status = Some(format!("Data file was damaged; restored {}", path.display()));
            }
            event @ (StoreEvent::ExternalChange | StoreEvent::SystemWake) => match self.reload() {
                Ok(true) => {
                    tracing::info!(?event, "reloaded document");
                    self.status = Some("Reloaded from disk".to_string());
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "reload failed");
                    self.status = Some(format!("{:#}", e));
                }
            },
        }
    }

    /// Keep following "today" across midnight
    fn roll_day(&mut self) {
        let today = self.clock.today();
        if today != self.last_today {
            if self.selected_date == self.last_today {
                self.selected_date = today;
                self.clamp_selection();
            }
            self.last_today = today;
        }
    }

    fn poll_timers(&mut self, mono: Instant) {
        let expired = self.monitor.poll(&self.doc.active_timers, self.clock.now());
        for timer in expired {
            tracing::debug!(timer = %timer.id, label = timer.label(), "timer expired");
            if self.config.notifications {
                notifications::notify_timer_expired(timer.label());
            }
            self.alerts.push_back(timer);
        }
        if self.doc.active_timers.is_empty() {
            self.schedule.sync(false, mono);
        }
    }

    // ---- timers ----

    pub fn timer_state(&self, timer_id: &str) -> Option<&TimerState> {
        self.monitor.state(timer_id)
    }

    pub fn current_alert(&self) -> Option<&ActiveTimer> {
        self.alerts.front()
    }

    /// Acknowledge the front alert; its timer is stopped
    pub fn dismiss_alert(&mut self) {
        let Some(timer) = self.alerts.pop_front() else {
            self.ui_mode = UiMode::Normal;
            return;
        };
        self.perform(Command::StopTimer {
            timer_id: Some(timer.id),
        });
        if self.alerts.is_empty() {
            self.ui_mode = UiMode::Normal;
        }
    }

    pub fn start_focus_timer(&mut self) {
        let minutes = self.config.default_focus_minutes;
        if self.perform(Command::StartTimer(TimerRequest::focus(minutes))) {
            self.status = Some(format!("Focus timer started ({} min)", minutes));
        }
    }

    /// Start the selected task's timebox (or the default length)
    pub fn start_task_timer(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        if task.is_moved() {
            return;
        }
        let minutes = task.timebox_minutes.unwrap_or(self.config.default_timebox_minutes);
        let request = TimerRequest::for_task(minutes, task.id.clone(), task.text.clone());
        if self.perform(Command::StartTimer(request)) {
            self.status = Some(format!("Timer started ({} min)", minutes));
        }
    }

    pub fn stop_selected_task_timer(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let Some(timer) = task_timer(&self.doc, &task.id) else {
            return;
        };
        let timer_id = timer.id.clone();
        self.perform(Command::StopTimer {
            timer_id: Some(timer_id),
        });
    }

    pub fn stop_all_timers(&mut self) {
        self.perform(Command::StopTimer { timer_id: None });
    }

    // ---- views ----

    pub fn day_tasks(&self) -> Vec<&DailyTask> {
        tasks_for_date(&self.doc, self.selected_date)
    }

    pub fn overdue_groups(&self) -> Vec<DateGroup<'_>> {
        overdue_by_date(&self.doc, self.today())
    }

    pub fn overdue_rows(&self) -> Vec<&DailyTask> {
        flatten_groups(&self.overdue_groups())
    }

    pub fn backlog(&self) -> &[Todo] {
        &self.doc.todos
    }

    fn pane_len(&self) -> usize {
        match self.pane {
            Pane::Tasks => self.day_tasks().len(),
            Pane::Overdue => self.overdue_rows().len(),
            Pane::Backlog => self.doc.todos.len(),
        }
    }

    pub fn selected_task(&self) -> Option<&DailyTask> {
        match self.pane {
            Pane::Tasks => self.day_tasks().get(self.selected_index).copied(),
            Pane::Overdue => self.overdue_rows().get(self.selected_index).copied(),
            Pane::Backlog => None,
        }
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        match self.pane {
            Pane::Backlog => self.doc.todos.get(self.selected_index),
            _ => None,
        }
    }

    // ---- navigation ----

    fn clamp_selection(&mut self) {
        let len = self.pane_len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    pub fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.pane_len() {
            self.selected_index += 1;
        }
    }

    pub fn next_pane(&mut self) {
        self.pane = self.pane.next();
        self.selected_index = 0;
    }

    pub fn shift_date(&mut self, days: i64) {
        self.selected_date += Duration::days(days);
        self.selected_index = 0;
    }

    pub fn go_to_today(&mut self) {
        self.selected_date = self.today();
        self.selected_index = 0;
    }

    // ---- task actions ----

    pub fn toggle_selected(&mut self) {
        if let Some(task) = self.selected_task() {
            let task_id = task.id.clone();
            self.perform(Command::ToggleComplete { task_id });
        }
    }

    pub fn defer_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let task_id = task.id.clone();
        if self.perform(Command::DeferToBacklog { task_id }) {
            self.status = Some("Moved to backlog".to_string());
        } else {
            self.status = Some("Only future tasks can go back to the backlog".to_string());
        }
    }

    pub fn carry_selected(&mut self) {
        if self.pane != Pane::Overdue {
            return;
        }
        let Some(task) = self.selected_task() else {
            return;
        };
        let task_id = task.id.clone();
        if self.perform(Command::CarryForward { task_id }) {
            self.status = Some("Carried forward to today".to_string());
        }
    }

    /// Put the selected backlog item on the selected date
    pub fn schedule_selected_todo(&mut self) {
        let Some(todo) = self.selected_todo() else {
            return;
        };
        let todo_id = todo.id.clone();
        let date = self.selected_date;
        if self.perform(Command::ScheduleTodo { todo_id, date }) {
            self.status = Some(format!("Scheduled for {}", date));
        }
    }

    pub fn request_delete(&mut self) {
        let pending = match (self.selected_task(), self.selected_todo()) {
            (Some(task), _) => PendingDelete::Task {
                task_id: task.id.clone(),
                text: task.text.clone(),
            },
            (None, Some(todo)) => PendingDelete::Todo {
                todo_id: todo.id.clone(),
                text: todo.text.clone(),
            },
            (None, None) => return,
        };
        self.pending_delete = Some(pending);
        self.ui_mode = UiMode::ConfirmDelete;
    }

    pub fn confirm_delete(&mut self) {
        if let Some(pending) = self.pending_delete.take() {
            let command = match pending {
                PendingDelete::Task { task_id, .. } => Command::DeleteTask { task_id },
                PendingDelete::Todo { todo_id, .. } => Command::DeleteTodo { todo_id },
            };
            self.ui_mode = UiMode::Normal;
            self.perform(command);
        }
        self.ui_mode = UiMode::Normal;
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.ui_mode = UiMode::Normal;
    }

    // ---- reorder gesture ----

    /// Pick up the selected task. Only the drop marker moves until release.
    pub fn begin_task_drag(&mut self) {
        if self.pane != Pane::Tasks || self.day_tasks().is_empty() {
            return;
        }
        self.task_drag = Some(TaskDrag {
            from: self.selected_index,
            over: self.selected_index,
        });
        self.ui_mode = UiMode::DraggingTask;
    }

    pub fn drag_task_by(&mut self, delta: isize) {
        let len = self.day_tasks().len();
        if let Some(drag) = self.task_drag.as_mut() {
            drag.over = drag.over.saturating_add_signed(delta).min(len.saturating_sub(1));
        }
    }

    /// Release: one reorder for the whole gesture
    pub fn drop_task(&mut self) {
        let Some(drag) = self.task_drag.take() else {
            return;
        };
        self.ui_mode = UiMode::Normal;
        let date = self.selected_date;
        self.perform(Command::Reorder {
            date,
            from: drag.from,
            to: drag.over,
        });
        self.selected_index = drag.over;
        self.clamp_selection();
    }

    pub fn cancel_task_drag(&mut self) {
        self.task_drag = None;
        self.ui_mode = UiMode::Normal;
    }

    // ---- frog gesture ----

    pub fn begin_frog_drag(&mut self) {
        if self.pane != Pane::Tasks {
            return;
        }
        if !self.doc.frog_enabled {
            self.status = Some("Frog is turned off".to_string());
            return;
        }
        if self.day_tasks().is_empty() {
            return;
        }
        self.frog_hover = Some(self.selected_index);
        self.ui_mode = UiMode::DraggingFrog;
    }

    pub fn drag_frog_by(&mut self, delta: isize) {
        let len = self.day_tasks().len();
        if let Some(hover) = self.frog_hover.as_mut() {
            *hover = hover.saturating_add_signed(delta).min(len.saturating_sub(1));
        }
    }

    /// Release over the hovered task, or over nothing when `on_task` is false
    pub fn drop_frog(&mut self, on_task: bool) {
        let Some(hover) = self.frog_hover.take() else {
            return;
        };
        self.ui_mode = UiMode::Normal;

        let date = self.selected_date;
        let target = if on_task {
            self.day_tasks().get(hover).map(|t| t.id.clone())
        } else {
            None
        };
        if let Some(command) = frog_drop_command(&self.doc, date, target.as_deref()) {
            self.perform(command);
        }
        if on_task {
            // The frog always sorts first
            self.selected_index = 0;
        }
    }

    pub fn cancel_frog_drag(&mut self) {
        self.frog_hover = None;
        self.ui_mode = UiMode::Normal;
    }

    // ---- forms ----

    pub fn start_add(&mut self) {
        let (target, mode) = match self.pane {
            Pane::Backlog => (FormTarget::NewTodo, UiMode::AddingTodo),
            _ => (
                FormTarget::NewTask {
                    date: self.selected_date,
                },
                UiMode::AddingTask,
            ),
        };
        self.input_form = Some(FormState::new(target));
        self.ui_mode = mode;
    }

    pub fn start_edit(&mut self) {
        if let Some(task) = self.selected_task() {
            let edit = TaskEdit::from_task(task);
            let mut form = FormState::new(FormTarget::EditTask {
                task_id: task.id.clone(),
            });
            form.text = edit.text;
            form.description = edit.description;
            form.goal = edit.goal_id.unwrap_or_default();
            form.timebox = edit.timebox_minutes.map(|m| m.to_string()).unwrap_or_default();
            form.category = edit.category;
            form.is_frog = edit.is_frog;
            self.input_form = Some(form);
            self.ui_mode = UiMode::EditingTask;
        } else if let Some(todo) = self.selected_todo() {
            let input = TodoInput::from_todo(todo);
            let mut form = FormState::new(FormTarget::EditTodo {
                todo_id: todo.id.clone(),
            });
            form.text = input.text;
            form.description = input.description;
            form.goal = input.goal_id.unwrap_or_default();
            self.input_form = Some(form);
            self.ui_mode = UiMode::EditingTodo;
        }
    }

    pub fn input_form_next_field(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.editing_field = (form.editing_field + 1) % form.field_count();
        }
    }

    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            form.field_mut().push(c);
        }
    }

    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.field_mut().pop();
        }
    }

    pub fn input_form_toggle_category(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.category = form.category.toggled();
        }
    }

    pub fn input_form_toggle_frog(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.is_frog = !form.is_frog;
        }
    }

    /// Match a typed goal against goal ids first, then goal titles
    fn resolve_goal(&self, input: &str) -> Option<String> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if self.doc.goal_by_id(input).is_some() {
            return Some(input.to_string());
        }
        self.doc
            .all_goals()
            .iter()
            .find(|g| g.item.text.eq_ignore_ascii_case(input))
            .map(|g| g.item.id.clone())
            .or_else(|| Some(input.to_string()))
    }

    pub fn submit_input_form(&mut self) {
        let Some(form) = self.input_form.take() else {
            return;
        };

        let timebox_minutes = match form.timebox.trim() {
            "" => None,
            raw => match raw.parse::<u32>() {
                Ok(minutes) => Some(minutes),
                Err(_) => {
                    self.status = Some("Timebox must be a number of minutes".to_string());
                    self.input_form = Some(form);
                    return;
                }
            },
        };
        if form.text.trim().is_empty() {
            self.status = Some("Text can't be empty".to_string());
            self.input_form = Some(form);
            return;
        }
        let goal_id = self.resolve_goal(&form.goal);

        let command = match form.target {
            FormTarget::NewTask { date } => Command::AddTask(NewTask {
                text: form.text,
                description: form.description,
                goal_id,
                category: form.category,
                is_frog: form.is_frog,
                date: Some(date),
                timebox_minutes,
            }),
            FormTarget::EditTask { task_id } => Command::UpdateTask {
                task_id,
                edit: TaskEdit {
                    text: form.text,
                    description: form.description,
                    goal_id,
                    category: form.category,
                    is_frog: form.is_frog,
                    timebox_minutes,
                },
            },
            FormTarget::NewTodo => Command::AddTodo(TodoInput {
                text: form.text,
                description: form.description,
                goal_id,
            }),
            FormTarget::EditTodo { todo_id } => Command::UpdateTodo {
                todo_id,
                input: TodoInput {
                    text: form.text,
                    description: form.description,
                    goal_id,
                },
            },
        };

        let is_add = matches!(command, Command::AddTask(_) | Command::AddTodo(_));
        self.ui_mode = UiMode::Normal;
        if self.perform(command) && is_add {
            // New rows land at the top
            self.selected_index = 0;
        }
    }

    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }
}

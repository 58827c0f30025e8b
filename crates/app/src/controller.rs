//! View-state controller
//!
//! Holds the in-memory task list, the active filter, the new-task input and
//! the transient per-row markers, and orchestrates calls to the collection
//! client. Every mutation is "fire request, then reload full list"; the list
//! shown is always a refetched snapshot, never an optimistic merge.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use rt_core::auth::AuthProvider;
use rt_core::task::{Filter, NewTask, Task, TaskApi, TaskPatch};

pub const ERR_LOAD: &str = "Unable to load todos";
pub const ERR_ADD: &str = "Unable to add a todo";
pub const ERR_EMPTY_TITLE: &str = "Title can't be empty";
pub const ERR_DELETE: &str = "Unable to delete a todo";
pub const ERR_UPDATE: &str = "Unable to update a todo";

/// How long the new-task highlight and the per-row loading markers persist
/// after the triggering request settles.
const MARKER_TTL: Duration = Duration::from_millis(300);

/// Controller state, snapshotted by the presenters
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Authoritative task list, as last fetched from the server
    pub tasks: Vec<Task>,
    pub filter: Filter,
    /// Text of the new-task input
    pub input: String,
    /// Current banner error, if any
    pub error: Option<String>,
    /// A create request is in flight; the input is disabled meanwhile
    pub adding: bool,
    /// Ids currently undergoing a delete
    pub loading: HashSet<i64>,
    /// Id currently undergoing an edit
    pub updating: Option<i64>,
    /// Most recently created id, briefly highlighted
    pub highlight: Option<i64>,
    pub bulk_in_progress: bool,
}

impl AppState {
    /// The subset of tasks visible under the active filter
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.filter.apply(&self.tasks)
    }
}

/// One-shot cleanup timers, aborted when superseded or on controller drop
#[derive(Default)]
struct Timers {
    highlight: Option<JoinHandle<()>>,
    rows: HashMap<i64, JoinHandle<()>>,
}

pub struct Controller {
    api: Arc<dyn TaskApi>,
    auth: Arc<dyn AuthProvider>,
    state: Arc<RwLock<AppState>>,
    /// Bumped on every load; a fetch response whose generation is no longer
    /// current is stale and gets discarded.
    load_generation: AtomicU64,
    timers: Mutex<Timers>,
}

impl Controller {
    pub fn new(api: Arc<dyn TaskApi>, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            api,
            auth,
            state: Arc::new(RwLock::new(AppState::default())),
            load_generation: AtomicU64::new(0),
            timers: Mutex::new(Timers::default()),
        }
    }

    /// Snapshot of the current state for rendering
    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }

    pub async fn set_filter(&self, filter: Filter) {
        self.state.write().await.filter = filter;
    }

    pub async fn set_input(&self, text: impl Into<String>) {
        self.state.write().await.input = text.into();
    }

    pub async fn dismiss_error(&self) {
        self.state.write().await.error = None;
    }

    /// Fetch the full list for the current user and replace local state.
    ///
    /// Responses superseded by a newer load are discarded.
    pub async fn load(&self) {
        let user = match self.auth.current_user() {
            Some(user) => user,
            None => return,
        };
        let generation = self.load_generation.fetch_add(1, Ordering::SeqCst) + 1;

        match self.api.fetch_all(user.id).await {
            Ok(tasks) => {
                if self.load_generation.load(Ordering::SeqCst) == generation {
                    self.state.write().await.tasks = tasks;
                } else {
                    debug!("discarding stale task list from load {}", generation);
                }
            }
            Err(e) => {
                warn!("failed to load tasks: {}", e);
                if self.load_generation.load(Ordering::SeqCst) == generation {
                    self.state.write().await.error = Some(ERR_LOAD.to_string());
                }
            }
        }
    }

    /// Create a task from the current input text, then reload.
    ///
    /// No-op when unauthenticated or while another create is in flight.
    pub async fn submit(&self) {
        let user = match self.auth.current_user() {
            Some(user) => user,
            None => return,
        };

        let title = {
            let mut state = self.state.write().await;
            if state.adding {
                return;
            }
            if state.input.trim().is_empty() {
                state.error = Some(ERR_EMPTY_TITLE.to_string());
                return;
            }
            state.adding = true;
            state.input.clone()
        };

        let result = self.api.create(&NewTask::new(user.id, title)).await;

        {
            let mut state = self.state.write().await;
            state.input.clear();
            state.adding = false;
            match &result {
                Ok(created) => {
                    state.error = None;
                    state.highlight = Some(created.id);
                }
                Err(e) => {
                    warn!("failed to create task: {}", e);
                    state.error = Some(ERR_ADD.to_string());
                }
            }
        }

        if let Ok(created) = result {
            self.schedule_highlight_clear(created.id);
            self.load().await;
        }
    }

    /// Delete one task, then reload. The row keeps its loading marker for a
    /// short window after the request settles.
    pub async fn remove(&self, id: i64) {
        self.state.write().await.loading.insert(id);

        match self.api.delete(id).await {
            Ok(()) => {
                self.schedule_row_clear(id);
                self.load().await;
            }
            Err(e) => {
                warn!("failed to delete task {}: {}", id, e);
                self.state.write().await.error = Some(ERR_DELETE.to_string());
                self.schedule_row_clear(id);
            }
        }
    }

    /// Invert one task's completed flag, then reload
    pub async fn toggle(&self, id: i64) {
        let completed = {
            let state = self.state.read().await;
            match state.tasks.iter().find(|t| t.id == id) {
                Some(task) => task.completed,
                None => return,
            }
        };
        self.patch_task(id, TaskPatch::completed(!completed)).await;
    }

    /// Replace one task's title, then reload
    pub async fn rename(&self, id: i64, title: impl Into<String>) {
        self.patch_task(id, TaskPatch::title(title)).await;
    }

    async fn patch_task(&self, id: i64, patch: TaskPatch) {
        self.state.write().await.updating = Some(id);

        match self.api.update(id, &patch).await {
            Ok(_) => {
                self.state.write().await.error = None;
                self.load().await;
            }
            Err(e) => {
                warn!("failed to update task {}: {}", id, e);
                self.state.write().await.error = Some(ERR_UPDATE.to_string());
            }
        }

        self.state.write().await.updating = None;
    }

    /// Toggle every task to one target state: completed if any task is
    /// incomplete, otherwise back to incomplete. One reload after the batch.
    pub async fn toggle_all(&self) {
        let (targets, target_state) = {
            let state = self.state.read().await;
            let incomplete: Vec<i64> = state
                .tasks
                .iter()
                .filter(|t| !t.completed)
                .map(|t| t.id)
                .collect();
            if incomplete.is_empty() {
                (state.tasks.iter().map(|t| t.id).collect(), false)
            } else {
                (incomplete, true)
            }
        };
        if targets.is_empty() {
            return;
        }

        self.state.write().await.bulk_in_progress = true;

        let patch = TaskPatch::completed(target_state);
        let results =
            futures::future::join_all(targets.iter().map(|&id| self.api.update(id, &patch))).await;

        {
            let mut state = self.state.write().await;
            state.bulk_in_progress = false;
            if results.iter().any(|r| r.is_err()) {
                state.error = Some(ERR_UPDATE.to_string());
            }
        }

        self.load().await;
    }

    /// Delete every completed task. One reload after the batch.
    pub async fn clear_completed(&self) {
        let targets: Vec<i64> = {
            let state = self.state.read().await;
            state
                .tasks
                .iter()
                .filter(|t| t.completed)
                .map(|t| t.id)
                .collect()
        };
        if targets.is_empty() {
            return;
        }

        {
            let mut state = self.state.write().await;
            for id in &targets {
                state.loading.insert(*id);
            }
        }

        let results =
            futures::future::join_all(targets.iter().map(|&id| self.api.delete(id))).await;

        if results.iter().any(|r| r.is_err()) {
            self.state.write().await.error = Some(ERR_DELETE.to_string());
        }
        for id in targets {
            self.schedule_row_clear(id);
        }

        self.load().await;
    }

    fn schedule_highlight_clear(&self, id: i64) {
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(MARKER_TTL).await;
            let mut state = state.write().await;
            if state.highlight == Some(id) {
                state.highlight = None;
            }
        });

        let mut timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(old) = timers.highlight.replace(handle) {
            old.abort();
        }
    }

    fn schedule_row_clear(&self, id: i64) {
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(MARKER_TTL).await;
            state.write().await.loading.remove(&id);
        });

        let mut timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(old) = timers.rows.insert(id, handle) {
            old.abort();
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        let timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = &timers.highlight {
            handle.abort();
        }
        for handle in timers.rows.values() {
            handle.abort();
        }
    }
}

// Task collection with write-through persistence into a key-value slot

use crate::config::{Config, ReorderPolicy};
use crate::error::{Result, TaskError};
use crate::filter::FilterMode;
use crate::kv::KeyValueStore;
use crate::models::{IdGenerator, Stats, Task, TaskId};
use crate::notify::{ConfirmationGate, Notification, NotificationSink};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";
const CLEAR_ALL_PROMPT: &str = "Are you sure you want to clear ALL tasks? This action cannot be undone.";

const SAMPLE_TASKS: [(&str, bool); 4] = [
    ("Welcome to your Todo App!", false),
    ("Click the checkbox to mark complete", true),
    ("Double-click a task to edit it", false),
    ("Drag and drop to reorder tasks", false),
];

/// How `TaskStore::load` ended up with its collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Stored collection decoded; holds the number of tasks kept
    Restored(usize),
    /// First-ever run: sample tasks installed and the visited marker set
    Seeded,
    /// Nothing stored and seeding not applicable
    Empty,
    /// Stored data unreadable; started empty
    Recovered,
}

/// Owns the ordered task collection and applies commands to it.
///
/// Newest tasks sit at the front. Every mutating command writes the whole
/// collection back to the slot; a failed write is logged and reported as a
/// warning notification while the in-memory collection stays authoritative.
pub struct TaskStore<K: KeyValueStore> {
    kv: K,
    config: Config,
    tasks: Vec<Task>,
    ids: IdGenerator,
    gate: Box<dyn ConfirmationGate>,
    sink: Box<dyn NotificationSink>,
}

impl<K: KeyValueStore> TaskStore<K> {
    /// Create a store over `kv`. The collection starts empty until `load` runs.
    pub fn new(
        kv: K,
        config: Config,
        gate: impl ConfirmationGate + 'static,
        sink: impl NotificationSink + 'static,
    ) -> Self {
        Self {
            kv,
            config,
            tasks: Vec::new(),
            ids: IdGenerator::default(),
            gate: Box::new(gate),
            sink: Box::new(sink),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Give back the underlying slot, dropping in-memory state
    pub fn into_kv(self) -> K {
        self.kv
    }

    // ========================================================================
    // Loading and persistence
    // ========================================================================

    /// Restore the collection from the slot. Never fails; unreadable data
    /// leaves the store empty.
    pub fn load(&mut self) -> LoadOutcome {
        self.tasks.clear();
        self.ids = IdGenerator::default();

        let stored = match self.kv.get(&self.config.tasks_key) {
            Ok(stored) => stored,
            Err(e) => {
                let reason = format!("{:#}", e);
                warn!(key = %self.config.tasks_key, error = %reason, "Failed to read tasks, starting empty");
                return LoadOutcome::Recovered;
            }
        };

        match stored {
            Some(json) => match decode_tasks(&json) {
                Ok(tasks) => {
                    let count = tasks.len();
                    self.install(tasks);
                    info!(count, "Restored tasks");
                    LoadOutcome::Restored(count)
                }
                Err(e) => {
                    warn!(key = %self.config.tasks_key, error = %e, "Stored tasks are corrupt, starting empty");
                    LoadOutcome::Recovered
                }
            },
            None if self.config.seed_samples && !self.has_visited() => {
                self.seed();
                LoadOutcome::Seeded
            }
            None => {
                debug!("No stored tasks");
                LoadOutcome::Empty
            }
        }
    }

    /// Serialize the whole collection into the slot
    pub fn persist(&mut self) -> Result<()> {
        let json = encode_tasks(&self.tasks).map_err(|e| TaskError::Persistence(e.to_string()))?;

        self.kv
            .set(&self.config.tasks_key, &json)
            .map_err(|e| TaskError::Persistence(format!("{:#}", e)))?;

        debug!(count = self.tasks.len(), "Persisted tasks");
        Ok(())
    }

    /// Persist after a mutation. Returns false, after warning, if the save failed.
    fn write_through(&mut self) -> bool {
        match self.persist() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Keeping in-memory tasks after failed save");
                self.sink.notify(Notification::warning(e.to_string()));
                false
            }
        }
    }

    /// Success notice, only when the change actually reached the slot
    fn commit(&mut self, message: &str) {
        if self.write_through() {
            self.sink.notify(Notification::success(message));
        }
    }

    /// Smallest positive id not used by any task
    fn lowest_unused_id(&self) -> TaskId {
        let used: HashSet<TaskId> = self.tasks.iter().map(|t| t.id).collect();
        (1u64..)
            .map(TaskId)
            .find(|id| !used.contains(id))
            .unwrap_or(TaskId(0))
    }

    fn has_visited(&self) -> bool {
        match self.kv.get(&self.config.visited_key) {
            Ok(marker) => marker.is_some(),
            Err(e) => {
                // Unknown counts as visited so samples never clobber real data
                let reason = format!("{:#}", e);
                warn!(error = %reason, "Failed to read visited marker");
                true
            }
        }
    }

    fn seed(&mut self) {
        let now = Utc::now();
        let samples = (1u64..)
            .zip(SAMPLE_TASKS)
            .map(|(id, (text, completed))| Task {
                id: TaskId(id),
                text: text.to_string(),
                completed,
                created_at: now,
            })
            .collect();
        self.install(samples);
        self.write_through();

        if let Err(e) = self.kv.set(&self.config.visited_key, "true") {
            let reason = format!("{:#}", e);
            warn!(error = %reason, "Failed to set visited marker");
        }
        info!(count = self.tasks.len(), "Seeded sample tasks on first run");
    }

    fn install(&mut self, tasks: Vec<Task>) {
        for task in &tasks {
            self.ids.observe(task.id);
        }
        self.tasks = tasks;
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Insert a new pending task at the front
    pub fn add(&mut self, text: &str) -> Result<TaskId> {
        let text = text.trim();
        if text.is_empty() {
            self.sink.notify(Notification::error("Please enter a task!"));
            return Err(TaskError::EmptyInput);
        }

        let id = match self.ids.next_id() {
            Some(id) => id,
            None => {
                let id = self.lowest_unused_id();
                warn!(%id, "Clock-derived ids exhausted, reusing lowest free id");
                id
            }
        };
        self.tasks.insert(0, Task::new(id, text));
        info!(%id, "Added task");

        self.commit("Task added successfully!");
        Ok(id)
    }

    /// Flip completion. Returns false if no task has this id.
    pub fn toggle(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!(%id, "toggle: no such task");
            return false;
        };

        task.completed = !task.completed;
        debug!(%id, completed = task.completed, "Toggled task");

        self.write_through();
        true
    }

    /// Replace a task's text. Returns `Ok(false)` if no task has this id.
    pub fn edit(&mut self, id: TaskId, text: &str) -> Result<bool> {
        let text = text.trim();
        if text.is_empty() {
            self.sink.notify(Notification::error("Task cannot be empty!"));
            return Err(TaskError::EmptyInput);
        }

        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!(%id, "edit: no such task");
            return Ok(false);
        };

        task.text = text.to_string();
        info!(%id, "Edited task");

        self.commit("Task updated successfully!");
        Ok(true)
    }

    /// Remove one task after confirmation. Unknown ids are ignored without asking.
    pub fn delete(&mut self, id: TaskId) -> bool {
        if self.position(id).is_none() {
            debug!(%id, "delete: no such task");
            return false;
        }

        if !self.gate.confirm(DELETE_PROMPT) {
            debug!(%id, "delete: declined");
            return false;
        }

        self.tasks.retain(|t| t.id != id);
        info!(%id, "Deleted task");

        self.commit("Task deleted!");
        true
    }

    /// Remove every completed task after confirmation. Returns how many went.
    pub fn clear_completed(&mut self) -> usize {
        let count = self.tasks.iter().filter(|t| t.completed).count();
        if count == 0 {
            self.sink.notify(Notification::info("No completed tasks to clear!"));
            return 0;
        }

        let prompt = format!("Are you sure you want to clear {} completed task(s)?", count);
        if !self.gate.confirm(&prompt) {
            debug!(count, "clear_completed: declined");
            return 0;
        }

        self.tasks.retain(|t| !t.completed);
        info!(count, "Cleared completed tasks");

        self.commit("Completed tasks cleared!");
        count
    }

    /// Empty the collection after confirmation. Returns how many went.
    pub fn clear_all(&mut self) -> usize {
        if self.tasks.is_empty() {
            self.sink.notify(Notification::info("No tasks to clear!"));
            return 0;
        }

        if !self.gate.confirm(CLEAR_ALL_PROMPT) {
            debug!("clear_all: declined");
            return 0;
        }

        let count = self.tasks.len();
        self.tasks.clear();
        info!(count, "Cleared all tasks");

        self.commit("All tasks cleared!");
        count
    }

    /// Rebuild the order from `order`.
    ///
    /// Unknown and repeated ids are ignored. Tasks missing from `order` are
    /// appended or dropped according to `ReorderPolicy`; the return value is
    /// how many were missing.
    pub fn reorder(&mut self, order: &[TaskId]) -> usize {
        let before: Vec<TaskId> = self.tasks.iter().map(|t| t.id).collect();
        let slots: HashMap<TaskId, usize> = before.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        let mut previous: Vec<Option<Task>> = std::mem::take(&mut self.tasks).into_iter().map(Some).collect();
        let mut reordered = Vec::with_capacity(previous.len());

        for id in order {
            match slots.get(id).and_then(|&i| previous[i].take()) {
                Some(task) => reordered.push(task),
                None => debug!(%id, "reorder: ignoring unknown or repeated id"),
            }
        }

        let leftovers: Vec<Task> = previous.into_iter().flatten().collect();
        let missing = leftovers.len();
        match self.config.reorder_policy {
            ReorderPolicy::Append => reordered.extend(leftovers),
            ReorderPolicy::Discard if missing > 0 => {
                warn!(count = missing, "reorder: dropping tasks missing from the new order");
            }
            ReorderPolicy::Discard => {}
        }

        let changed = reordered.len() != before.len() || reordered.iter().zip(&before).any(|(t, id)| t.id != *id);
        self.tasks = reordered;

        if changed {
            debug!(count = self.tasks.len(), "Reordered tasks");
            self.write_through();
        }
        missing
    }

    /// Move one task to `index` (clamped to the end), as a drag-and-drop would
    pub fn move_task(&mut self, id: TaskId, index: usize) -> bool {
        let Some(from) = self.position(id) else {
            debug!(%id, "move_task: no such task");
            return false;
        };

        let mut order: Vec<TaskId> = self.tasks.iter().map(|t| t.id).collect();
        let moved = order.remove(from);
        order.insert(index.min(order.len()), moved);

        self.reorder(&order);
        true
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Like `get`, but absence is an error
    pub fn task(&self, id: TaskId) -> Result<&Task> {
        self.get(id).ok_or(TaskError::NotFound(id))
    }

    /// Ordered subsequence of tasks matching `mode`
    pub fn filter(&self, mode: FilterMode) -> Vec<&Task> {
        self.tasks.iter().filter(|t| mode.matches(t)).collect()
    }

    pub fn stats(&self) -> Stats {
        Stats::from_tasks(&self.tasks)
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }
}

/// Serialize a collection to its stored JSON form
pub fn encode_tasks(tasks: &[Task]) -> serde_json::Result<String> {
    serde_json::to_string(tasks)
}

/// Decode a stored collection.
///
/// A document that is not a JSON array (or `null`) is an error. Inside the
/// array, records that fail to decode, have blank text or repeat an earlier
/// id are skipped with a warning.
pub fn decode_tasks(json: &str) -> Result<Vec<Task>> {
    let records: Option<Vec<serde_json::Value>> = serde_json::from_str(json)?;
    let records = records.unwrap_or_default();

    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let task: Task = match serde_json::from_value(record) {
            Ok(t) => t,
            Err(e) => {
                warn!(index, error = %e, "Failed to parse task, skipping");
                continue;
            }
        };

        if task.text.trim().is_empty() {
            warn!(index, id = %task.id, "Task has blank text, skipping");
            continue;
        }

        if !seen.insert(task.id) {
            warn!(index, id = %task.id, "Duplicate task id, skipping");
            continue;
        }

        tasks.push(task);
    }

    Ok(tasks)
}

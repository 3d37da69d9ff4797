//! Tasks table provider.
//!
//! Tasks are soft-deleted. Deleted rows stay in the main partition but drop
//! out of the project index, lists, and live lookups.

use super::tasks_indexes::create_tasks_indexes;
use crate::error::{CoreError, CoreResult, CoreResultExt};
use projeta_commons::models::Task;
use projeta_commons::storage_key::encode_prefix;
use projeta_commons::{
    DomainTable, IndexPartition, ProjectId, StorageBackend, TaskId, TaskPriority, TaskStatus,
};
use projeta_store::entity_store::EntityStore;
use projeta_store::IndexedEntityStore;
use std::sync::Arc;

/// Type alias for the indexed tasks store
pub type TasksStore = IndexedEntityStore<TaskId, Task>;

/// Combinable filters for `list_tasks`.
#[derive(Debug, Default, Clone)]
pub struct TaskFilter {
    pub project_id: Option<ProjectId>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Case-insensitive substring match on title or description.
    pub q: Option<String>,
}

/// Tasks table provider using `IndexedEntityStore` for automatic index
/// management.
pub struct TasksProvider {
    store: TasksStore,
}

impl std::fmt::Debug for TasksProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TasksProvider").finish()
    }
}

impl TasksProvider {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        let store = IndexedEntityStore::new(
            backend,
            DomainTable::Tasks.partition(),
            create_tasks_indexes(),
        );
        Self { store }
    }

    fn project_index_idx(&self) -> CoreResult<usize> {
        self.store
            .find_index_by_partition(IndexPartition::TasksProjectIdx.partition())
            .ok_or_else(|| {
                CoreError::Internal(format!(
                    "Missing expected index partition: {}",
                    IndexPartition::TasksProjectIdx.name()
                ))
            })
    }

    pub fn create_task(&self, task: Task) -> CoreResult<()> {
        self.store
            .insert(&task.id, &task)
            .into_core_error("insert task error")
    }

    /// Get a task row by ID, including soft-deleted rows.
    pub fn get_task_by_id(&self, task_id: &TaskId) -> CoreResult<Option<Task>> {
        Ok(self.store.get(task_id)?)
    }

    /// Get a live task by ID; soft-deleted tasks resolve to `None`.
    pub fn get_active_task(&self, task_id: &TaskId) -> CoreResult<Option<Task>> {
        Ok(self.store.get(task_id)?.filter(|t| !t.is_deleted()))
    }

    /// List live tasks in id order with all filters applied.
    ///
    /// A `project_id` filter runs over the project index; the other filters
    /// narrow the scan in memory.
    pub fn list_tasks(&self, filter: &TaskFilter) -> CoreResult<Vec<Task>> {
        let tasks: Vec<Task> = match filter.project_id {
            Some(project_id) => {
                let project_idx = self.project_index_idx()?;
                let prefix = encode_prefix(&(project_id.as_i64(),));
                self.store
                    .scan_by_index(project_idx, Some(&prefix), None)
                    .into_core_error("scan tasks by project error")?
                    .into_iter()
                    .map(|(_, task)| task)
                    .collect()
            }
            None => self
                .store
                .scan_all_typed(None, None, None)
                .into_core_error("scan tasks error")?
                .into_iter()
                .map(|(_, task)| task)
                .filter(|t| !t.is_deleted())
                .collect(),
        };

        let needle = filter.q.as_ref().map(|q| q.to_lowercase());
        let tasks = tasks
            .into_iter()
            .filter(|t| filter.status.map_or(true, |s| t.status == s))
            .filter(|t| filter.priority.map_or(true, |p| t.priority == p))
            .filter(|t| {
                needle.as_ref().map_or(true, |needle| {
                    t.title.to_lowercase().contains(needle)
                        || t.description
                            .as_ref()
                            .map_or(false, |d| d.to_lowercase().contains(needle))
                })
            })
            .collect();

        Ok(tasks)
    }

    /// Update a live task. Returns `NotFound` for missing or deleted rows.
    pub fn update_task(&self, task: Task) -> CoreResult<()> {
        let existing = self
            .store
            .get(&task.id)?
            .filter(|t| !t.is_deleted())
            .ok_or_else(|| CoreError::NotFound(format!("Task not found: {}", task.id)))?;

        self.store
            .update_with_old(&task.id, Some(&existing), &task)
            .into_core_error("update task error")
    }

    /// Soft delete a task (sets `deleted_at`, drops the index entry).
    pub fn delete_task(&self, task_id: &TaskId) -> CoreResult<()> {
        let mut task = self
            .store
            .get(task_id)?
            .filter(|t| !t.is_deleted())
            .ok_or_else(|| CoreError::NotFound(format!("Task not found: {}", task_id)))?;

        task.mark_deleted();

        self.store
            .update(task_id, &task)
            .into_core_error("delete task error")
    }
}

//! Tasks table index definitions.

use projeta_commons::models::Task;
use projeta_commons::storage::Partition;
use projeta_commons::storage_key::encode_key;
use projeta_commons::{IndexPartition, TaskId};
use projeta_store::IndexDefinition;
use std::sync::Arc;

/// Index for querying tasks by project.
///
/// Key format: `storekey(project_id, task_id)`
///
/// The task id is appended so each live task gets its own entry; prefix
/// scanning on `(project_id,)` yields a project's tasks in id order.
/// Soft-deleted tasks are not indexed.
pub struct TaskProjectIndex;

impl IndexDefinition<TaskId, Task> for TaskProjectIndex {
    fn partition(&self) -> Partition {
        IndexPartition::TasksProjectIdx.partition().clone()
    }

    fn extract_key(&self, primary_key: &TaskId, task: &Task) -> Option<Vec<u8>> {
        if task.is_deleted() {
            return None;
        }
        Some(encode_key(&(task.project_id.as_i64(), primary_key.as_i64())))
    }
}

/// Create the default set of indexes for the tasks table.
pub fn create_tasks_indexes() -> Vec<Arc<dyn IndexDefinition<TaskId, Task>>> {
    vec![Arc::new(TaskProjectIndex)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use projeta_commons::storage_key::encode_prefix;
    use projeta_commons::{ProjectId, TaskPriority, TaskStatus, UserId};

    fn create_test_task(id: i64, project_id: i64) -> Task {
        Task {
            id: TaskId::new(id),
            title: format!("Task {}", id),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date: None,
            project_id: ProjectId::new(project_id),
            assignee_id: UserId::new(1),
            created_at: 1000,
            updated_at: 1000,
            deleted_at: None,
        }
    }

    #[test]
    fn test_project_index_key_prefix_scans_by_project() {
        let task = create_test_task(7, 42);
        let key = TaskProjectIndex.extract_key(&task.id, &task).unwrap();

        let prefix = encode_prefix(&(42_i64,));
        assert!(key.starts_with(&prefix));

        let other_prefix = encode_prefix(&(43_i64,));
        assert!(!key.starts_with(&other_prefix));
    }

    #[test]
    fn test_deleted_task_is_not_indexed() {
        let mut task = create_test_task(7, 42);
        task.deleted_at = Some(2000);

        assert!(TaskProjectIndex.extract_key(&task.id, &task).is_none());
    }

    #[test]
    fn test_create_tasks_indexes() {
        let indexes = create_tasks_indexes();
        assert_eq!(indexes.len(), 1);
        assert_eq!(
            indexes[0].partition().name(),
            IndexPartition::TasksProjectIdx.name()
        );
    }
}

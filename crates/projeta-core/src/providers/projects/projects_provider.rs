//! Projects table provider.
//!
//! Projects are hard-deleted: the row is removed outright and nothing is
//! cascaded. Roster rows for a deleted project become unreachable because
//! every membership operation re-checks project existence first.

use crate::error::{CoreError, CoreResult, CoreResultExt};
use projeta_commons::models::Project;
use projeta_commons::{DomainTable, ProjectId, ProjectStatus, StorageBackend};
use projeta_store::entity_store::EntityStore;
use projeta_store::IndexedEntityStore;
use std::sync::Arc;

/// Type alias for the projects store (no secondary indexes)
pub type ProjectsStore = IndexedEntityStore<ProjectId, Project>;

/// Projects table provider.
pub struct ProjectsProvider {
    store: ProjectsStore,
}

impl std::fmt::Debug for ProjectsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectsProvider").finish()
    }
}

impl ProjectsProvider {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        let store = IndexedEntityStore::new(backend, DomainTable::Projects.partition(), vec![]);
        Self { store }
    }

    pub fn create_project(&self, project: Project) -> CoreResult<()> {
        self.store
            .insert(&project.id, &project)
            .into_core_error("insert project error")
    }

    pub fn get_project(&self, project_id: &ProjectId) -> CoreResult<Option<Project>> {
        Ok(self.store.get(project_id)?)
    }

    /// Fast existence check without deserializing the row.
    pub fn project_exists(&self, project_id: &ProjectId) -> CoreResult<bool> {
        Ok(self.store.exists(project_id)?)
    }

    /// List projects in id order, optionally filtered by status and by a
    /// case-insensitive substring match on name or description.
    pub fn list_projects(
        &self,
        status: Option<ProjectStatus>,
        q: Option<&str>,
    ) -> CoreResult<Vec<Project>> {
        let needle = q.map(|q| q.to_lowercase());

        let projects = self
            .store
            .scan_all_typed(None, None, None)
            .into_core_error("scan projects error")?
            .into_iter()
            .map(|(_, project)| project)
            .filter(|p| status.map_or(true, |s| p.status == s))
            .filter(|p| {
                needle.as_ref().map_or(true, |needle| {
                    p.name.to_lowercase().contains(needle)
                        || p.description.to_lowercase().contains(needle)
                })
            })
            .collect();

        Ok(projects)
    }

    pub fn update_project(&self, project: Project) -> CoreResult<()> {
        let existing = self
            .store
            .get(&project.id)?
            .ok_or_else(|| CoreError::NotFound(format!("Project not found: {}", project.id)))?;

        self.store
            .update_with_old(&project.id, Some(&existing), &project)
            .into_core_error("update project error")
    }

    /// Hard delete a project. Tasks and roster rows are left in place.
    pub fn delete_project(&self, project_id: &ProjectId) -> CoreResult<()> {
        let existing = self
            .store
            .get(project_id)?
            .ok_or_else(|| CoreError::NotFound(format!("Project not found: {}", project_id)))?;

        self.store
            .delete_with_entity(project_id, &existing)
            .into_core_error("delete project error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projeta_commons::UserId;
    use projeta_store::test_utils::InMemoryBackend;

    fn create_test_provider() -> ProjectsProvider {
        let backend: Arc<dyn StorageBackend> = Arc::new(InMemoryBackend::new());
        ProjectsProvider::new(backend)
    }

    fn create_test_project(id: i64, name: &str, status: ProjectStatus) -> Project {
        Project {
            id: ProjectId::new(id),
            name: name.to_string(),
            description: format!("{} description", name),
            status,
            manager_id: UserId::new(1),
            start_date: None,
            end_date: None,
            created_at: 1000,
            updated_at: 1000,
        }
    }

    #[test]
    fn test_create_and_get_project() {
        let provider = create_test_provider();
        provider
            .create_project(create_test_project(10, "Apollo", ProjectStatus::Active))
            .unwrap();

        let project = provider.get_project(&ProjectId::new(10)).unwrap().unwrap();
        assert_eq!(project.name, "Apollo");
        assert!(provider.project_exists(&ProjectId::new(10)).unwrap());
    }

    #[test]
    fn test_list_projects_filters_combine() {
        let provider = create_test_provider();
        provider
            .create_project(create_test_project(1, "Apollo", ProjectStatus::Active))
            .unwrap();
        provider
            .create_project(create_test_project(2, "Gemini", ProjectStatus::Active))
            .unwrap();
        provider
            .create_project(create_test_project(3, "Apollo Legacy", ProjectStatus::Completed))
            .unwrap();

        let active = provider.list_projects(Some(ProjectStatus::Active), None).unwrap();
        assert_eq!(active.len(), 2);

        let apollo = provider.list_projects(None, Some("apollo")).unwrap();
        assert_eq!(apollo.len(), 2);

        let both = provider
            .list_projects(Some(ProjectStatus::Active), Some("APOLLO"))
            .unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].id, ProjectId::new(1));
    }

    #[test]
    fn test_list_projects_matches_description() {
        let provider = create_test_provider();
        provider
            .create_project(create_test_project(1, "Apollo", ProjectStatus::Active))
            .unwrap();

        let by_description = provider.list_projects(None, Some("description")).unwrap();
        assert_eq!(by_description.len(), 1);
    }

    #[test]
    fn test_update_project() {
        let provider = create_test_provider();
        provider
            .create_project(create_test_project(1, "Apollo", ProjectStatus::Planned))
            .unwrap();

        let mut project = provider.get_project(&ProjectId::new(1)).unwrap().unwrap();
        project.status = ProjectStatus::Active;
        provider.update_project(project).unwrap();

        let project = provider.get_project(&ProjectId::new(1)).unwrap().unwrap();
        assert_eq!(project.status, ProjectStatus::Active);
    }

    #[test]
    fn test_update_missing_project_not_found() {
        let provider = create_test_provider();
        let err = provider
            .update_project(create_test_project(404, "Ghost", ProjectStatus::Active))
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn test_delete_project_is_hard() {
        let provider = create_test_provider();
        provider
            .create_project(create_test_project(1, "Apollo", ProjectStatus::Active))
            .unwrap();

        provider.delete_project(&ProjectId::new(1)).unwrap();

        assert!(provider.get_project(&ProjectId::new(1)).unwrap().is_none());
        assert!(!provider.project_exists(&ProjectId::new(1)).unwrap());

        let err = provider.delete_project(&ProjectId::new(1)).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }
}

//! Project members table provider.
//!
//! Roster primitives only. All mutations on this table go through the
//! membership engine, which holds the per-project write lock while it
//! evaluates its guards; calling the write methods here directly bypasses
//! those guarantees.
//!
//! Rows are hard-deleted on removal. Re-adding a user yields a fresh row id.

use super::members_indexes::{create_members_indexes, member_slot_key};
use crate::error::{CoreError, CoreResult, CoreResultExt};
use projeta_commons::models::ProjectMember;
use projeta_commons::storage_key::encode_prefix;
use projeta_commons::{
    DomainTable, IndexPartition, MemberId, MemberRole, ProjectId, StorageBackend, UserId,
};
use projeta_store::entity_store::EntityStore;
use projeta_store::IndexedEntityStore;
use std::sync::Arc;

/// Type alias for the indexed project members store
pub type MembersStore = IndexedEntityStore<MemberId, ProjectMember>;

/// Project members table provider.
pub struct MembersProvider {
    store: MembersStore,
}

impl std::fmt::Debug for MembersProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MembersProvider").finish()
    }
}

impl MembersProvider {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        let store = IndexedEntityStore::new(
            backend,
            DomainTable::ProjectMembers.partition(),
            create_members_indexes(),
        );
        Self { store }
    }

    fn slot_index_idx(&self) -> CoreResult<usize> {
        self.store
            .find_index_by_partition(IndexPartition::MembersProjectUserIdx.partition())
            .ok_or_else(|| {
                CoreError::Internal(format!(
                    "Missing expected index partition: {}",
                    IndexPartition::MembersProjectUserIdx.name()
                ))
            })
    }

    /// Look up the roster row for `(project_id, user_id)`, if any.
    pub fn get_membership(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
    ) -> CoreResult<Option<ProjectMember>> {
        let slot_idx = self.slot_index_idx()?;
        let slot_key = member_slot_key(project_id.as_i64(), user_id.as_i64());

        let member_id = self
            .store
            .get_by_index_exact(slot_idx, &slot_key)
            .into_core_error("membership index lookup error")?;

        match member_id {
            Some(id) => Ok(self.store.get(&id)?),
            None => Ok(None),
        }
    }

    /// All roster rows of one project, in user id order.
    pub fn list_project_members(&self, project_id: &ProjectId) -> CoreResult<Vec<ProjectMember>> {
        let slot_idx = self.slot_index_idx()?;
        let prefix = encode_prefix(&(project_id.as_i64(),));

        let rows = self
            .store
            .scan_by_index(slot_idx, Some(&prefix), None)
            .into_core_error("scan roster error")?
            .into_iter()
            .map(|(_, member)| member)
            .collect();

        Ok(rows)
    }

    /// Number of maintainer rows on one project's roster.
    pub fn count_project_maintainers(&self, project_id: &ProjectId) -> CoreResult<usize> {
        let count = self
            .list_project_members(project_id)?
            .iter()
            .filter(|m| m.role == MemberRole::Maintainer)
            .count();

        Ok(count)
    }

    /// Insert a roster row. Engine-only.
    pub fn insert_member(&self, member: ProjectMember) -> CoreResult<()> {
        self.store
            .insert(&member.id, &member)
            .into_core_error("insert member error")
    }

    /// Persist a role change on an existing roster row. Engine-only.
    pub fn update_member(&self, member: ProjectMember) -> CoreResult<()> {
        self.store
            .update(&member.id, &member)
            .into_core_error("update member error")
    }

    /// Hard delete a roster row. Engine-only.
    pub fn delete_member(&self, member: &ProjectMember) -> CoreResult<()> {
        self.store
            .delete_with_entity(&member.id, member)
            .into_core_error("delete member error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projeta_store::test_utils::InMemoryBackend;

    fn create_test_provider() -> MembersProvider {
        let backend: Arc<dyn StorageBackend> = Arc::new(InMemoryBackend::new());
        MembersProvider::new(backend)
    }

    fn create_test_member(id: i64, project_id: i64, user_id: i64, role: MemberRole) -> ProjectMember {
        ProjectMember {
            id: MemberId::new(id),
            project_id: ProjectId::new(project_id),
            user_id: UserId::new(user_id),
            role,
            created_at: 1000,
            updated_at: 1000,
        }
    }

    #[test]
    fn test_insert_and_get_membership() {
        let provider = create_test_provider();
        provider
            .insert_member(create_test_member(500, 10, 3, MemberRole::Contributor))
            .unwrap();

        let member = provider
            .get_membership(&ProjectId::new(10), &UserId::new(3))
            .unwrap()
            .unwrap();
        assert_eq!(member.id, MemberId::new(500));
        assert_eq!(member.role, MemberRole::Contributor);
    }

    #[test]
    fn test_get_membership_is_exact_on_ids() {
        let provider = create_test_provider();
        provider
            .insert_member(create_test_member(500, 1, 12, MemberRole::Viewer))
            .unwrap();

        // (1, 1) must not resolve via the (1, 12) entry
        let missing = provider
            .get_membership(&ProjectId::new(1), &UserId::new(1))
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_list_project_members_isolated_per_project() {
        let provider = create_test_provider();
        provider
            .insert_member(create_test_member(1, 10, 1, MemberRole::Maintainer))
            .unwrap();
        provider
            .insert_member(create_test_member(2, 10, 2, MemberRole::Viewer))
            .unwrap();
        provider
            .insert_member(create_test_member(3, 20, 1, MemberRole::Maintainer))
            .unwrap();

        let roster = provider.list_project_members(&ProjectId::new(10)).unwrap();
        assert_eq!(roster.len(), 2);
        assert!(roster.iter().all(|m| m.project_id == ProjectId::new(10)));
    }

    #[test]
    fn test_count_project_maintainers() {
        let provider = create_test_provider();
        provider
            .insert_member(create_test_member(1, 10, 1, MemberRole::Maintainer))
            .unwrap();
        provider
            .insert_member(create_test_member(2, 10, 2, MemberRole::Maintainer))
            .unwrap();
        provider
            .insert_member(create_test_member(3, 10, 3, MemberRole::Contributor))
            .unwrap();

        assert_eq!(
            provider.count_project_maintainers(&ProjectId::new(10)).unwrap(),
            2
        );
        assert_eq!(
            provider.count_project_maintainers(&ProjectId::new(99)).unwrap(),
            0
        );
    }

    #[test]
    fn test_update_member_role_persists() {
        let provider = create_test_provider();
        provider
            .insert_member(create_test_member(500, 10, 3, MemberRole::Viewer))
            .unwrap();

        let mut member = provider
            .get_membership(&ProjectId::new(10), &UserId::new(3))
            .unwrap()
            .unwrap();
        member.role = MemberRole::Maintainer;
        provider.update_member(member).unwrap();

        let member = provider
            .get_membership(&ProjectId::new(10), &UserId::new(3))
            .unwrap()
            .unwrap();
        assert_eq!(member.role, MemberRole::Maintainer);
    }

    #[test]
    fn test_delete_member_removes_slot() {
        let provider = create_test_provider();
        let member = create_test_member(500, 10, 3, MemberRole::Contributor);
        provider.insert_member(member.clone()).unwrap();

        provider.delete_member(&member).unwrap();

        assert!(provider
            .get_membership(&ProjectId::new(10), &UserId::new(3))
            .unwrap()
            .is_none());
        assert!(provider
            .list_project_members(&ProjectId::new(10))
            .unwrap()
            .is_empty());
    }
}

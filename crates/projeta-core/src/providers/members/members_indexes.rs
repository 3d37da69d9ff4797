//! Project members table index definitions.

use projeta_commons::models::ProjectMember;
use projeta_commons::storage::Partition;
use projeta_commons::storage_key::encode_key;
use projeta_commons::{IndexPartition, MemberId};
use projeta_store::IndexDefinition;
use std::sync::Arc;

/// Unique composite index over `(project_id, user_id)`.
///
/// Key format: `storekey(project_id, user_id)`
///
/// One entry per roster row. Exact lookups answer "what role does user U
/// hold on project P"; prefix scanning on `(project_id,)` yields a project's
/// full roster. The membership engine relies on the exact lookup for its
/// duplicate check, so the pair stays unique as long as all writes go
/// through the engine.
pub struct MemberProjectUserIndex;

/// Builds the `(project_id, user_id)` lookup key for one roster slot.
pub fn member_slot_key(project_id: i64, user_id: i64) -> Vec<u8> {
    encode_key(&(project_id, user_id))
}

impl IndexDefinition<MemberId, ProjectMember> for MemberProjectUserIndex {
    fn partition(&self) -> Partition {
        IndexPartition::MembersProjectUserIdx.partition().clone()
    }

    fn extract_key(&self, _primary_key: &MemberId, member: &ProjectMember) -> Option<Vec<u8>> {
        Some(member_slot_key(
            member.project_id.as_i64(),
            member.user_id.as_i64(),
        ))
    }
}

/// Create the default set of indexes for the project members table.
pub fn create_members_indexes() -> Vec<Arc<dyn IndexDefinition<MemberId, ProjectMember>>> {
    vec![Arc::new(MemberProjectUserIndex)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use projeta_commons::storage_key::encode_prefix;
    use projeta_commons::{MemberRole, ProjectId, UserId};

    fn create_test_member(id: i64, project_id: i64, user_id: i64) -> ProjectMember {
        ProjectMember {
            id: MemberId::new(id),
            project_id: ProjectId::new(project_id),
            user_id: UserId::new(user_id),
            role: MemberRole::Contributor,
            created_at: 1000,
            updated_at: 1000,
        }
    }

    #[test]
    fn test_slot_key_matches_extracted_key() {
        let member = create_test_member(500, 10, 3);
        let key = MemberProjectUserIndex
            .extract_key(&member.id, &member)
            .unwrap();

        assert_eq!(key, member_slot_key(10, 3));
    }

    #[test]
    fn test_project_prefix_scans_one_roster() {
        let member = create_test_member(500, 10, 3);
        let key = MemberProjectUserIndex
            .extract_key(&member.id, &member)
            .unwrap();

        assert!(key.starts_with(&encode_prefix(&(10_i64,))));
        assert!(!key.starts_with(&encode_prefix(&(11_i64,))));
    }

    #[test]
    fn test_create_members_indexes() {
        let indexes = create_members_indexes();
        assert_eq!(indexes.len(), 1);
        assert_eq!(
            indexes[0].partition().name(),
            IndexPartition::MembersProjectUserIdx.name()
        );
    }
}

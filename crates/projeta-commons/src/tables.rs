//! Domain table enumeration
//!
//! Defines all persistent tables in Projeta. Every table maps to one RocksDB
//! column family, created at startup.

/// Domain table enumeration
///
/// All entity tables in Projeta. This enum ensures type-safe partition
/// registration and prevents typos in column family names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainTable {
    /// users - Account records
    Users,
    /// projects - Project records
    Projects,
    /// tasks - Task records
    Tasks,
    /// project_members - Membership roster rows
    ProjectMembers,
}

impl DomainTable {
    /// Get the table name (e.g., "users", "project_members")
    pub fn table_name(&self) -> &'static str {
        match self {
            DomainTable::Users => "users",
            DomainTable::Projects => "projects",
            DomainTable::Tasks => "tasks",
            DomainTable::ProjectMembers => "project_members",
        }
    }

    /// Get the column family name in RocksDB
    pub fn column_family_name(&self) -> &'static str {
        match self {
            DomainTable::Users => "users",
            DomainTable::Projects => "projects",
            DomainTable::Tasks => "tasks",
            DomainTable::ProjectMembers => "project_members",
        }
    }

    /// Parse from table name
    pub fn from_name(name: &str) -> Result<Self, String> {
        match name {
            "users" => Ok(DomainTable::Users),
            "projects" => Ok(DomainTable::Projects),
            "tasks" => Ok(DomainTable::Tasks),
            "project_members" => Ok(DomainTable::ProjectMembers),
            _ => Err(format!("Unknown domain table: {}", name)),
        }
    }

    /// Get all domain tables
    pub fn all() -> &'static [DomainTable] {
        &[
            DomainTable::Users,
            DomainTable::Projects,
            DomainTable::Tasks,
            DomainTable::ProjectMembers,
        ]
    }

    /// Returns a shared Partition for this table's column family.
    ///
    /// Allocates each Partition once and returns a reference, avoiding
    /// repeated String allocations across the codebase.
    pub fn partition(&self) -> &'static crate::storage::Partition {
        use crate::storage::Partition;
        use once_cell::sync::Lazy;

        static USERS: Lazy<Partition> =
            Lazy::new(|| Partition::new(DomainTable::Users.column_family_name()));
        static PROJECTS: Lazy<Partition> =
            Lazy::new(|| Partition::new(DomainTable::Projects.column_family_name()));
        static TASKS: Lazy<Partition> =
            Lazy::new(|| Partition::new(DomainTable::Tasks.column_family_name()));
        static PROJECT_MEMBERS: Lazy<Partition> =
            Lazy::new(|| Partition::new(DomainTable::ProjectMembers.column_family_name()));

        match self {
            DomainTable::Users => &USERS,
            DomainTable::Projects => &PROJECTS,
            DomainTable::Tasks => &TASKS,
            DomainTable::ProjectMembers => &PROJECT_MEMBERS,
        }
    }
}

impl std::fmt::Display for DomainTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

/// Secondary index partitions, stored as dedicated column families next to
/// their entity tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexPartition {
    /// Email index for users (unique, case-insensitive)
    UsersEmailIdx,
    /// Project index for tasks (non-unique)
    TasksProjectIdx,
    /// Composite (project, user) index for membership rows (unique)
    MembersProjectUserIdx,
}

impl IndexPartition {
    /// Returns the partition (column family) name
    pub fn name(&self) -> &'static str {
        match self {
            IndexPartition::UsersEmailIdx => "users_email_idx",
            IndexPartition::TasksProjectIdx => "tasks_project_idx",
            IndexPartition::MembersProjectUserIdx => "project_members_project_user_idx",
        }
    }

    /// Get all index partitions
    pub fn all() -> &'static [IndexPartition] {
        &[
            IndexPartition::UsersEmailIdx,
            IndexPartition::TasksProjectIdx,
            IndexPartition::MembersProjectUserIdx,
        ]
    }

    /// Returns a shared Partition reference for this index partition.
    pub fn partition(&self) -> &'static crate::storage::Partition {
        use crate::storage::Partition;
        use once_cell::sync::Lazy;

        static USERS_EMAIL: Lazy<Partition> =
            Lazy::new(|| Partition::new(IndexPartition::UsersEmailIdx.name()));
        static TASKS_PROJECT: Lazy<Partition> =
            Lazy::new(|| Partition::new(IndexPartition::TasksProjectIdx.name()));
        static MEMBERS_PROJECT_USER: Lazy<Partition> =
            Lazy::new(|| Partition::new(IndexPartition::MembersProjectUserIdx.name()));

        match self {
            IndexPartition::UsersEmailIdx => &USERS_EMAIL,
            IndexPartition::TasksProjectIdx => &TASKS_PROJECT,
            IndexPartition::MembersProjectUserIdx => &MEMBERS_PROJECT_USER,
        }
    }
}

/// Every column family the storage layer must open at startup.
pub fn all_column_families() -> Vec<&'static str> {
    let mut cfs: Vec<&'static str> = DomainTable::all()
        .iter()
        .map(|t| t.column_family_name())
        .collect();
    cfs.extend(IndexPartition::all().iter().map(|p| p.name()));
    cfs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name() {
        assert_eq!(DomainTable::Users.table_name(), "users");
        assert_eq!(DomainTable::ProjectMembers.table_name(), "project_members");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(DomainTable::from_name("tasks").unwrap(), DomainTable::Tasks);
        assert!(DomainTable::from_name("invalid_table").is_err());
    }

    #[test]
    fn test_all() {
        let all = DomainTable::all();
        assert_eq!(all.len(), 4);
        assert!(all.contains(&DomainTable::Projects));
    }

    #[test]
    fn test_all_column_families_includes_indexes() {
        let cfs = all_column_families();
        assert_eq!(cfs.len(), 7);
        assert!(cfs.contains(&"users"));
        assert!(cfs.contains(&"project_members_project_user_idx"));
    }

    #[test]
    fn test_partition_is_shared() {
        let p1 = DomainTable::Users.partition();
        let p2 = DomainTable::Users.partition();
        assert!(std::ptr::eq(p1, p2));
    }
}

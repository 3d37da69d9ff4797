//! Caller identity passed into authorization-sensitive operations.

use crate::ids::UserId;
use crate::models::roles::GlobalRole;

/// Identity and global role of the user performing an operation.
///
/// `caller_id` is `None` when no authenticated principal could be resolved;
/// membership mutations reject that case before any other check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallerContext {
    pub caller_id: Option<UserId>,
    pub global_role: GlobalRole,
}

impl CallerContext {
    pub fn authenticated(caller_id: UserId, global_role: GlobalRole) -> Self {
        Self {
            caller_id: Some(caller_id),
            global_role,
        }
    }

    /// Context with no resolved principal. Carries the least-privileged
    /// global role so accidental use never widens access.
    pub fn anonymous() -> Self {
        Self {
            caller_id: None,
            global_role: GlobalRole::Developer,
        }
    }

    #[inline]
    pub fn is_authenticated(&self) -> bool {
        self.caller_id.is_some()
    }
}

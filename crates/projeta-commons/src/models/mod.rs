//! Domain model types shared across crates.

pub mod caller;
pub mod member;
pub mod project;
pub mod roles;
pub mod status;
pub mod task;
pub mod user;

pub use caller::CallerContext;
pub use member::ProjectMember;
pub use project::Project;
pub use roles::{GlobalRole, MemberRole};
pub use status::{ProjectStatus, TaskPriority, TaskStatus};
pub use task::Task;
pub use user::User;

//! Typed identifiers for Projeta entities.
//!
//! All identifiers are Snowflake i64 values wrapped in newtypes so a
//! `ProjectId` can never be passed where a `UserId` is expected.

mod member_id;
mod project_id;
mod snowflake;
mod task_id;
mod user_id;

pub use member_id::MemberId;
pub use project_id::ProjectId;
pub use snowflake::SnowflakeGenerator;
pub use task_id::TaskId;
pub use user_id::UserId;

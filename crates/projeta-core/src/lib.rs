//! # projeta-core
//!
//! Domain logic for the Projeta backend: per-table providers, the membership
//! authorization and invariant engine, and the shared application context.
//!
//! ## Architecture
//!
//! ```text
//! projeta-api (HTTP handlers)
//!     ↓
//! projeta-core (providers, membership engine)
//!     ↓
//! projeta-store (K/V operations, indexes, locks)
//! ```
//!
//! Providers stay single-table. Rules that span tables live in the
//! membership engine (roster writes) or in the HTTP handlers that compose
//! providers (everything else).

pub mod app_context;
pub mod directory;
pub mod error;
pub mod membership_engine;
pub mod providers;

pub use app_context::{AppContext, AuthSettings};
pub use directory::ProviderUserDirectory;
pub use error::{CoreError, CoreResult, CoreResultExt};
pub use membership_engine::{MembershipEngine, RosterEntry};
pub use providers::members::MembersProvider;
pub use providers::projects::ProjectsProvider;
pub use providers::tasks::{TaskFilter, TasksProvider};
pub use providers::users::UsersProvider;

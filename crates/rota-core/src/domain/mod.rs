//! Domain model (ids, weekdays, assignments, tasks, board snapshots, ...).
//!
//! Everything here is pure: no clocks, no channels, no logging. Time is
//! passed in by the caller.

pub mod assignment;
pub mod board;
pub mod catalog;
pub mod command;
pub mod errors;
pub mod events;
pub mod ids;
pub mod policy;
pub mod task;
pub mod user;
pub mod weekday;

pub use assignment::{Assignment, AssignmentStatus};
pub use board::{Board, PendingApproval, PointsSummary};
pub use catalog::{Catalog, CatalogError, TaskSpec};
pub use command::{Action, Applied, Command};
pub use errors::CommandError;
pub use events::DomainEvent;
pub use ids::{IdParseError, TaskId, UserId};
pub use policy::Policy;
pub use task::Task;
pub use user::{Role, User};
pub use weekday::{Weekday, WeekdayParseError};

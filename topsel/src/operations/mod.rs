//! Reservation engine operations using the plan-execute pattern.
//!
//! This module provides a plan-execute pattern for reservation operations,
//! separating planning from execution to enable dry-run mode, better testing,
//! and clear error messages.
//!
//! # Architecture
//!
//! Mutating operations are split into two phases:
//! 1. **Planning**: checks the caller's role, validates inputs, reads the
//!    rows involved and builds a plan of guarded actions
//! 2. **Execution**: applies the whole plan in one immediate transaction;
//!    every guarded action re-checks its precondition in its WHERE clause,
//!    so a plan built on state that has since changed affects zero rows
//!    and the transaction rolls back
//!
//! Read-only operations ([`list_topics`], [`search_topics`],
//! [`view_as_student`], [`view_as_teacher`]) skip planning and query
//! directly.
//!
//! # Examples
//!
//! ```no_run
//! use topsel::operations::{PlanExecutor, ReserveOptions, ReservePlan};
//! use topsel::{Database, DatabaseConfig, Identity, Role};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/topsel.db")).unwrap();
//! let caller = Identity::new("s1", Role::Student);
//!
//! // Generate plan
//! let plan = ReservePlan::new(caller, ReserveOptions::new("Graph Compression"))
//!     .build_plan(db.connection())
//!     .unwrap();
//!
//! // Execute plan
//! let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
//! assert!(result.success);
//! ```

pub mod confirm;
pub mod delete;
pub mod executor;
pub mod list;
pub mod plan;
pub mod publish;
pub mod reject;
pub mod reserve;
pub mod view;
pub mod withdraw;

#[cfg(test)]
mod proptests;

pub use confirm::{ConfirmOptions, ConfirmPlan};
pub use delete::{DeleteOptions, DeletePlan};
pub use executor::{ExecutionResult, PlanExecutor};
pub use list::{list_topics, search_topics};
pub use plan::{OperationPlan, PlanAction};
pub use publish::{PublishOptions, PublishPlan};
pub use reject::{RejectOptions, RejectPlan};
pub use reserve::{ReserveOptions, ReservePlan};
pub use view::{view_as_student, view_as_teacher};
pub use withdraw::WithdrawPlan;

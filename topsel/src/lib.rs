#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # topsel
//!
//! A library for publishing, reserving and confirming project topics.
//!
//! Teachers publish topics, students reserve at most one each, and the
//! owning teacher confirms or rejects a pending reservation. Every
//! mutation is one atomic conditional transaction against the SQLite
//! store, so racing requests either take full effect or none.
//!
//! ## Core Types
//!
//! - [`Topic`], [`Availability`], [`ConfirmationState`]: the reservable
//!   unit and its state fields
//! - [`Identity`] and [`Role`]: resolved caller identity
//! - [`Database`] and [`DatabaseConfig`]: the topic store
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```no_run
//! use topsel::operations::{PlanExecutor, ReserveOptions, ReservePlan};
//! use topsel::{Database, DatabaseConfig, Identity, Role};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/topsel.db")).unwrap();
//!
//! // A student reserves an open topic
//! let caller = Identity::new("s1", Role::Student);
//! let plan = ReservePlan::new(caller, ReserveOptions::new("Graph Compression"))
//!     .build_plan(db.connection())
//!     .unwrap();
//! let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
//! assert!(result.success);
//! ```

pub mod database;
pub mod directory;
pub mod error;
pub mod identity;
pub mod notice;
pub mod operations;
pub mod profile;
pub mod topic;

// Re-export key types at crate root for convenience
pub use database::{Database, DatabaseConfig};
pub use error::{Error, Result};
pub use identity::{AccountDirectory, Identity, Role};
pub use notice::{Notice, NoticeDraft};
pub use operations::{
    ConfirmOptions, ConfirmPlan, DeleteOptions, DeletePlan, ExecutionResult, OperationPlan,
    PlanAction, PlanExecutor, PublishOptions, PublishPlan, RejectOptions, RejectPlan,
    ReserveOptions, ReservePlan, WithdrawPlan,
};
pub use profile::{StudentProfile, TeacherProfile};
pub use topic::{
    Availability, ConfirmationState, OwnedTopicStatus, Topic, TopicDraft, TopicSummary,
};

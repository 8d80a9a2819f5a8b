//! Domain Services
//!
//! Stateless decisions that need no process I/O: which strategy a batch
//! takes and in which order remote directories are removed.

mod removal_planner;
mod strategy;

pub use removal_planner::{PendingRemovals, RemovalPlan, RemovalPlanner};
pub use strategy::{select_strategy, SyncStrategy};

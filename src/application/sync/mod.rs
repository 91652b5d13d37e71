mod engine;
pub mod merge;
mod scheduler;

pub use engine::{CycleOutcome, CycleReport, SkipReason, SyncEngine};
pub use scheduler::SyncScheduler;

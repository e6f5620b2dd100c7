//! Study-order pipeline orchestration.
//!
//! ## Submodules
//!
//! - [`runner`]: request/plan types and the stage sequence
//! - [`observer`]: stage reports and observation hooks

pub mod observer;
pub mod runner;

pub use observer::{NoopObserver, PipelineObserver, StageReport, StageTimingObserver};
pub use runner::{StudyPlan, StudyPlanner, StudyRequest};

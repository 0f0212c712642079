//! snp-core: step engine for Spiking Neural P systems.
//!
//! Given a static [`Topology`] and a caller-owned [`SystemState`], the
//! [`SnpRuntime`] advances the state by one step from an externally chosen
//! decision vector, or rewinds it from the decision and delay-indicator snapshot
//! of the previous step. Rule selection happens outside this crate.

pub mod delay;
pub mod error;
pub mod firing;
pub mod indicator;
pub mod matrix;
pub mod notify;
pub mod ranges;
pub mod runtime;
pub mod state;
pub mod topology;

// Re-exports
pub use error::{StepError, StepResult};
pub use firing::ChangeSet;
pub use matrix::TransitionMatrix;
pub use notify::{ChangeLog, ChangeOp};
pub use ranges::RuleRanges;
pub use runtime::{check_decision, PreviousStep, SnpRuntime, StepInput, StepOptions, StepReport};
pub use state::SystemState;
pub use topology::Topology;

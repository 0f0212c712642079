//! snp-core-plus: system model and simulator atop snp-core (keeps snp-core unchanged)
//!
//! Additions:
//! - System model: regular/input/output neurons, guarded rules, weighted synapses,
//!   and assembly of the topology the step engine consumes
//! - Simulator with history (step back through the backward stepper), input and
//!   output spike trains, halting detection and reset
//! - Observer hooks on every committed transition
//!
//! Rule *selection* is left to the caller; the model only reports which rules are
//! applicable.

pub mod error;
pub mod model;
pub mod neuron;
pub mod observer;
pub mod rule;
pub mod simulator;

// Re-exports
pub use error::{ModelError, ModelResult, SimulatorError, SimulatorResult};
pub use model::{Synapse, SystemModel};
pub use neuron::{Neuron, NeuronBuilder, NeuronKind};
pub use observer::{ChangeCounter, StepObserver};
pub use rule::{Rule, SpikeGuard};
pub use simulator::{Simulator, SimulatorConfig};

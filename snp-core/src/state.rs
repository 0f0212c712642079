//! Mutable per-run state. Owned by the caller, mutated in place by the runtime.

use crate::error::{check_len, StepResult};
use crate::topology::Topology;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemState {
    /// Spike count held by each neuron.
    pub configuration: Vec<i32>,
    /// Remaining cool-down per neuron; 0 means the neuron is open.
    pub delay_status: Vec<u32>,
    /// Rules currently waiting out their delay.
    pub delay_indicator: Vec<bool>,
    /// Which neurons fired on the last forward step.
    pub firing: Vec<bool>,
}

impl SystemState {
    /// Fresh state for `topology` with the given initial spikes; nothing delayed or firing.
    pub fn new(topology: &Topology, configuration: Vec<i32>) -> StepResult<Self> {
        check_len("configuration", topology.neuron_count(), configuration.len())?;
        Ok(Self {
            delay_status: vec![0; configuration.len()],
            firing: vec![false; configuration.len()],
            delay_indicator: vec![false; topology.rule_count()],
            configuration,
        })
    }

    /// True if neuron `i` may choose a rule this step: not cooling down and no rule in flight.
    pub fn is_open(&self, topology: &Topology, neuron: usize) -> bool {
        self.delay_status[neuron] == 0
            && !self.delay_indicator[topology.ranges().range(neuron)]
                .iter()
                .any(|&b| b)
    }

    pub fn any_in_flight(&self) -> bool {
        self.delay_indicator.iter().any(|&b| b)
    }

    pub(crate) fn check_against(&self, topology: &Topology) -> StepResult<()> {
        let n = topology.neuron_count();
        check_len("configuration", n, self.configuration.len())?;
        check_len("delay status", n, self.delay_status.len())?;
        check_len("firing", n, self.firing.len())?;
        check_len("delay indicator", topology.rule_count(), self.delay_indicator.len())
    }
}

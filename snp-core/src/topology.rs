//! Static topology of an SN P system: rule ownership, rule delays and the
//! transposed spiking transition matrix. Never changes after construction.

use crate::error::{check_len, StepResult};
use crate::matrix::TransitionMatrix;
use crate::ranges::RuleRanges;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    rule_counts: Vec<u32>,
    delays: Vec<u32>,
    matrix: TransitionMatrix,
    ranges: RuleRanges,
}

impl Topology {
    /// Build a topology from the rule-count vector (per neuron), the delay vector
    /// (per rule, neuron-major) and the transposed transition matrix.
    pub fn new(rule_counts: Vec<u32>, delays: Vec<u32>, matrix: TransitionMatrix) -> StepResult<Self> {
        let ranges = RuleRanges::from_counts(&rule_counts);
        check_len("delay vector", ranges.rule_count(), delays.len())?;
        check_len("transition matrix rows", rule_counts.len(), matrix.neurons())?;
        check_len("transition matrix columns", ranges.rule_count(), matrix.rules())?;
        Ok(Self {
            rule_counts,
            delays,
            matrix,
            ranges,
        })
    }

    #[inline]
    pub fn neuron_count(&self) -> usize {
        self.rule_counts.len()
    }

    #[inline]
    pub fn rule_count(&self) -> usize {
        self.delays.len()
    }

    pub fn rule_counts(&self) -> &[u32] {
        &self.rule_counts
    }

    pub fn delays(&self) -> &[u32] {
        &self.delays
    }

    pub fn matrix(&self) -> &TransitionMatrix {
        &self.matrix
    }

    pub fn ranges(&self) -> &RuleRanges {
        &self.ranges
    }
}

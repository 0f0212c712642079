//! Firing and change detection. Feeds incremental observers only; has no effect
//! on configuration or delays.

use crate::ranges::RuleRanges;

/// Per-neuron change flags produced by a forward step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Neuron fired this step (a rule acted or environment spikes arrived).
    pub fired: Vec<bool>,
    /// `fired` differs from the previous step; outgoing synapses need redrawing.
    pub firing_changed: Vec<bool>,
    pub delay_changed: Vec<bool>,
    /// Spike count or delay status changed.
    pub neuron_updated: Vec<bool>,
}

pub fn firing_vector(indicator: &[bool], spike_train: Option<&[u32]>, ranges: &RuleRanges) -> Vec<bool> {
    ranges
        .iter()
        .map(|(_, mut range)| range.any(|r| indicator[r] || spike_train.map_or(false, |train| train[r] > 0)))
        .collect()
}

pub fn firing_changes(previous: &[bool], fired: &[bool]) -> Vec<bool> {
    previous.iter().zip(fired).map(|(a, b)| a != b).collect()
}

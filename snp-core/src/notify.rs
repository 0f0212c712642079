//! Flat list of change notifications for incremental consumers (renderers, loggers).

use crate::firing::ChangeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOp {
    /// Spike count or delay status of the neuron changed.
    NeuronUpdate { neuron: u32 },
    /// Firing state of the neuron flipped; its outgoing synapses changed appearance.
    SynapseUpdate { neuron: u32 },
    Fired { neuron: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLog {
    pub ops: Vec<ChangeOp>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn push(&mut self, op: ChangeOp) {
        self.ops.push(op);
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChangeOp> {
        self.ops.iter()
    }

    /// Neurons that need a redraw: updated, flipped firing state or fired.
    pub fn touched_neurons(&self) -> impl Iterator<Item = usize> + '_ {
        let mut last = None;
        self.ops.iter().filter_map(move |op| {
            let n = match *op {
                ChangeOp::NeuronUpdate { neuron } | ChangeOp::SynapseUpdate { neuron } | ChangeOp::Fired { neuron } => {
                    neuron as usize
                }
            };
            // ops are grouped per neuron
            if last == Some(n) {
                None
            } else {
                last = Some(n);
                Some(n)
            }
        })
    }
}

impl From<&ChangeSet> for ChangeLog {
    fn from(set: &ChangeSet) -> Self {
        let mut log = ChangeLog::new();
        for i in 0..set.fired.len() {
            let neuron = i as u32;
            if set.neuron_updated[i] {
                log.push(ChangeOp::NeuronUpdate { neuron });
            }
            if set.firing_changed[i] {
                log.push(ChangeOp::SynapseUpdate { neuron });
            }
            if set.fired[i] {
                log.push(ChangeOp::Fired { neuron });
            }
        }
        log
    }
}

//! System model: neurons and weighted synapses, and the assembly of the static
//! vectors the step engine consumes.

use snp_core::{SystemState, Topology, TransitionMatrix};

use crate::error::{ModelError, ModelResult};
use crate::neuron::{Neuron, NeuronKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Synapse {
    pub to: usize,
    pub weight: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SystemModel {
    neurons: Vec<Neuron>,
    // outgoing synapses per source neuron
    synapses: Vec<Vec<Synapse>>,
}

impl SystemModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_neuron(&mut self, neuron: Neuron) -> usize {
        self.neurons.push(neuron);
        self.synapses.push(Vec::new());
        self.neurons.len() - 1
    }

    fn check_neuron(&self, index: usize) -> ModelResult<()> {
        if index < self.neurons.len() {
            Ok(())
        } else {
            Err(ModelError::UnknownNeuron(index))
        }
    }

    pub fn add_synapse(&mut self, from: usize, to: usize, weight: u32) -> ModelResult<()> {
        self.check_neuron(from)?;
        self.check_neuron(to)?;
        if from == to {
            return Err(ModelError::SelfSynapse(from));
        }
        if self.synapses[from].iter().any(|s| s.to == to) {
            return Err(ModelError::DuplicateSynapse { from, to });
        }
        self.synapses[from].push(Synapse { to, weight });
        Ok(())
    }

    /// Remove a neuron with all synapses touching it; later neurons shift down by one.
    pub fn remove_neuron(&mut self, index: usize) -> ModelResult<Neuron> {
        self.check_neuron(index)?;
        let neuron = self.neurons.remove(index);
        self.synapses.remove(index);
        for outgoing in &mut self.synapses {
            outgoing.retain(|s| s.to != index);
            for s in outgoing.iter_mut().filter(|s| s.to > index) {
                s.to -= 1;
            }
        }
        Ok(neuron)
    }

    pub fn remove_synapse(&mut self, from: usize, to: usize) -> ModelResult<()> {
        self.check_neuron(from)?;
        self.check_neuron(to)?;
        let outgoing = &mut self.synapses[from];
        let pos = outgoing
            .iter()
            .position(|s| s.to == to)
            .ok_or(ModelError::UnknownSynapse { from, to })?;
        outgoing.remove(pos);
        Ok(())
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn neuron(&self, index: usize) -> Option<&Neuron> {
        self.neurons.get(index)
    }

    pub fn synapses(&self, from: usize) -> &[Synapse] {
        self.synapses.get(from).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    pub fn rule_count(&self) -> usize {
        self.neurons.iter().map(|n| n.rules().len()).sum()
    }

    pub fn rule_count_vector(&self) -> ModelResult<Vec<u32>> {
        self.neurons
            .iter()
            .map(|n| u32::try_from(n.rules().len()).map_err(|_| ModelError::ValueOutOfRange("rule count")))
            .collect()
    }

    pub fn delay_vector(&self) -> Vec<u32> {
        self.neurons
            .iter()
            .flat_map(|n| n.rules().iter().map(|r| r.delay))
            .collect()
    }

    /// Row per neuron, column per rule. A rule removes `consume` spikes from its
    /// owner and adds `produce * weight` to every synapse target of the owner.
    pub fn transposed_transition_matrix(&self) -> ModelResult<TransitionMatrix> {
        let rules = self.rule_count();
        let mut matrix = TransitionMatrix::zeros(self.neurons.len(), rules);
        let mut column = 0;
        for (owner, neuron) in self.neurons.iter().enumerate() {
            for rule in neuron.rules() {
                let consume = i32::try_from(rule.consume).map_err(|_| ModelError::ValueOutOfRange("consume"))?;
                matrix.set(owner, column, -consume);
                for syn in &self.synapses[owner] {
                    let gain = rule
                        .produce
                        .checked_mul(syn.weight)
                        .and_then(|g| i32::try_from(g).ok())
                        .ok_or(ModelError::ValueOutOfRange("produce * weight"))?;
                    matrix.set(syn.to, column, gain);
                }
                column += 1;
            }
        }
        Ok(matrix)
    }

    pub fn topology(&self) -> ModelResult<Topology> {
        Ok(Topology::new(
            self.rule_count_vector()?,
            self.delay_vector(),
            self.transposed_transition_matrix()?,
        )?)
    }

    pub fn initial_configuration(&self) -> ModelResult<Vec<i32>> {
        self.neurons
            .iter()
            .map(|n| i32::try_from(n.spikes()).map_err(|_| ModelError::ValueOutOfRange("spikes")))
            .collect()
    }

    pub fn initial_state(&self, topology: &Topology) -> ModelResult<SystemState> {
        Ok(SystemState::new(topology, self.initial_configuration()?)?)
    }

    /// One per-rule spike-train vector per time step, as long as the longest input train.
    /// An input neuron's train value is copied to each of its rules.
    pub fn spike_train_vectors(&self) -> Vec<Vec<u32>> {
        let steps = self
            .neurons
            .iter()
            .filter(|n| n.kind() == NeuronKind::Input)
            .map(|n| n.spike_train().len())
            .max()
            .unwrap_or(0);
        (0..steps)
            .map(|t| {
                self.neurons
                    .iter()
                    .flat_map(|n| {
                        let value = n.spike_train().get(t).copied().unwrap_or(0);
                        n.rules().iter().map(move |_| value)
                    })
                    .collect()
            })
            .collect()
    }

    pub fn output_neurons(&self) -> Vec<usize> {
        self.neurons
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind() == NeuronKind::Output)
            .map(|(i, _)| i)
            .collect()
    }

    /// Applicable local rule indices per neuron. Neurons that are cooling down or
    /// have a rule in flight have none.
    pub fn applicable_rules(&self, topology: &Topology, state: &SystemState) -> Vec<Vec<usize>> {
        self.neurons
            .iter()
            .enumerate()
            .map(|(i, n)| {
                if !state.is_open(topology, i) {
                    return Vec::new();
                }
                match u32::try_from(state.configuration[i]) {
                    Ok(spikes) => n.applicable_rules(spikes),
                    Err(_) => Vec::new(),
                }
            })
            .collect()
    }

    /// Global decision vector from one optional local rule index per neuron.
    pub fn decision_vector(&self, choices: &[Option<usize>]) -> ModelResult<Vec<bool>> {
        if choices.len() != self.neurons.len() {
            return Err(snp_core::StepError::DimensionMismatch {
                vector: "choices",
                expected: self.neurons.len(),
                actual: choices.len(),
            }
            .into());
        }
        let mut decision = Vec::with_capacity(self.rule_count());
        for (neuron, (n, choice)) in self.neurons.iter().zip(choices).enumerate() {
            if let Some(rule) = *choice {
                if rule >= n.rules().len() {
                    return Err(ModelError::UnknownRule { neuron, rule });
                }
            }
            decision.extend((0..n.rules().len()).map(|r| *choice == Some(r)));
        }
        Ok(decision)
    }
}

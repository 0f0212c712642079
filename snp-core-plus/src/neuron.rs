//! Neurons of the system model: regular, input and output.

use crate::error::{ModelError, ModelResult};
use crate::rule::Rule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeuronKind {
    /// Holds spikes and owns rules.
    Regular,
    /// Emits spikes from an external spike train.
    Input,
    /// Collects spikes; owns no rules.
    Output,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neuron {
    kind: NeuronKind,
    label: Option<String>,
    spikes: u32,
    rules: Vec<Rule>,
    spike_train: Vec<u32>,
}

impl Neuron {
    pub fn regular(spikes: u32) -> Self {
        Self::with_kind(NeuronKind::Regular, spikes, Vec::new())
    }

    pub fn input(spike_train: Vec<u32>) -> Self {
        let mut n = Self::with_kind(NeuronKind::Input, 0, vec![Rule::input()]);
        n.spike_train = spike_train;
        n
    }

    pub fn output() -> Self {
        Self::with_kind(NeuronKind::Output, 0, Vec::new())
    }

    fn with_kind(kind: NeuronKind, spikes: u32, rules: Vec<Rule>) -> Self {
        Self {
            kind,
            label: None,
            spikes,
            rules,
            spike_train: Vec::new(),
        }
    }

    pub fn kind(&self) -> NeuronKind {
        self.kind
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
    }

    /// Initial spikes.
    pub fn spikes(&self) -> u32 {
        self.spikes
    }

    pub fn set_spikes(&mut self, spikes: u32) -> ModelResult<()> {
        if self.kind != NeuronKind::Regular {
            return Err(ModelError::WrongNeuronKind("set spikes of non-regular neurons"));
        }
        self.spikes = spikes;
        Ok(())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn add_rule(&mut self, rule: Rule) -> ModelResult<()> {
        if self.kind != NeuronKind::Regular {
            return Err(ModelError::WrongNeuronKind("add rules to non-regular neurons"));
        }
        if rule.is_forgetting() && rule.delay > 0 {
            return Err(ModelError::DelayedForgettingRule { rule: self.rules.len() });
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn spike_train(&self) -> &[u32] {
        &self.spike_train
    }

    pub fn set_spike_train(&mut self, spike_train: Vec<u32>) -> ModelResult<()> {
        if self.kind != NeuronKind::Input {
            return Err(ModelError::WrongNeuronKind("set spike train for non-input neurons"));
        }
        self.spike_train = spike_train;
        Ok(())
    }

    /// Local indices of rules applicable to `spikes`. Only regular neurons choose rules.
    pub fn applicable_rules(&self, spikes: u32) -> Vec<usize> {
        if self.kind != NeuronKind::Regular {
            return Vec::new();
        }
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_applicable(spikes))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Fluent construction; the first invalid call is reported by [`NeuronBuilder::build`].
pub struct NeuronBuilder {
    neuron: Neuron,
    error: Option<ModelError>,
}

impl NeuronBuilder {
    pub fn new(kind: NeuronKind) -> Self {
        let neuron = match kind {
            NeuronKind::Regular => Neuron::regular(0),
            NeuronKind::Input => Neuron::input(Vec::new()),
            NeuronKind::Output => Neuron::output(),
        };
        Self { neuron, error: None }
    }

    fn record(mut self, result: ModelResult<()>) -> Self {
        if let (Err(e), None) = (result, &self.error) {
            self.error = Some(e);
        }
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.neuron.set_label(label);
        self
    }

    pub fn spikes(mut self, spikes: u32) -> Self {
        let r = self.neuron.set_spikes(spikes);
        self.record(r)
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        let r = self.neuron.add_rule(rule);
        self.record(r)
    }

    pub fn rules(self, rules: impl IntoIterator<Item = Rule>) -> Self {
        rules.into_iter().fold(self, |b, rule| b.rule(rule))
    }

    pub fn spike_train(mut self, spike_train: Vec<u32>) -> Self {
        let r = self.neuron.set_spike_train(spike_train);
        self.record(r)
    }

    pub fn build(self) -> ModelResult<Neuron> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.neuron),
        }
    }
}

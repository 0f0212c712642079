//! Simulator: drives the snp-core runtime from a [`SystemModel`] and adds
//! - step history, so any number of steps can be undone with the backward stepper
//! - input spike trains fed per time step, output spike trains recorded per step
//! - halting detection and reset
//! - observer hooks (see [`crate::observer`])
//!
//! Semantics:
//! - next() takes the decision chosen by the caller for the current time and
//!   returns the engine's report for that step.
//! - prev() rewinds exactly one step; firing flags come from the history frame.

use std::collections::VecDeque;

use snp_core::{PreviousStep, SnpRuntime, StepInput, StepOptions, StepReport, SystemState, Topology};
use tracing::debug;

use crate::error::{SimulatorError, SimulatorResult};
use crate::model::SystemModel;
use crate::observer::StepObserver;

#[derive(Clone, Copy, Debug)]
pub struct SimulatorConfig {
    /// Ask the runtime for change flags on every step.
    pub track_changes: bool,
    /// Keep at most this many steps for prev(); `None` keeps all.
    pub history_limit: Option<usize>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            track_changes: true,
            history_limit: None,
        }
    }
}

/// What is needed to undo one step.
#[derive(Clone, Debug)]
struct Frame {
    decision: Vec<bool>,
    delay_indicator: Vec<bool>,
    firing: Vec<bool>,
    spike_train: Option<Vec<u32>>,
}

pub struct Simulator {
    model: SystemModel,
    runtime: SnpRuntime,
    initial: SystemState,
    state: SystemState,
    spike_trains: Vec<Vec<u32>>,
    output_neurons: Vec<usize>,
    output_trains: Vec<Vec<bool>>,
    history: VecDeque<Frame>,
    history_limit: Option<usize>,
    time: u64,
    observers: Vec<Box<dyn StepObserver>>,
}

impl Simulator {
    pub fn new(model: SystemModel) -> SimulatorResult<Self> {
        Self::with_config(model, SimulatorConfig::default())
    }

    pub fn with_config(model: SystemModel, config: SimulatorConfig) -> SimulatorResult<Self> {
        let topology = model.topology()?;
        let initial = model.initial_state(&topology)?;
        let runtime = SnpRuntime::with_options(
            topology,
            StepOptions {
                track_changes: config.track_changes,
            },
        );
        let output_neurons = model.output_neurons();
        debug!(
            neurons = model.neuron_count(),
            rules = model.rule_count(),
            outputs = output_neurons.len(),
            "simulator ready"
        );
        Ok(Self {
            spike_trains: model.spike_train_vectors(),
            output_trains: vec![Vec::new(); output_neurons.len()],
            output_neurons,
            state: initial.clone(),
            initial,
            runtime,
            model,
            history: VecDeque::new(),
            history_limit: config.history_limit,
            time: 0,
            observers: Vec::new(),
        })
    }

    pub fn add_observer<O: StepObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    pub fn model(&self) -> &SystemModel {
        &self.model
    }

    pub fn topology(&self) -> &Topology {
        self.runtime.topology()
    }

    pub fn state(&self) -> &SystemState {
        &self.state
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    /// Per output neuron: whether it received spikes at each step so far.
    pub fn output_spike_trains(&self) -> &[Vec<bool>] {
        &self.output_trains
    }

    pub fn output_neurons(&self) -> &[usize] {
        &self.output_neurons
    }

    pub fn applicable_rules(&self) -> Vec<Vec<usize>> {
        self.model.applicable_rules(self.runtime.topology(), &self.state)
    }

    /// Final configuration: no rule applicable anywhere, nothing in flight, no input left.
    pub fn is_halted(&self) -> bool {
        self.time as usize >= self.spike_trains.len()
            && !self.state.any_in_flight()
            && self.state.delay_status.iter().all(|&d| d == 0)
            && self.applicable_rules().iter().all(Vec::is_empty)
    }

    /// Advance one step with `decision`.
    pub fn next(&mut self, decision: &[bool]) -> SimulatorResult<StepReport> {
        if self.is_halted() {
            return Err(SimulatorError::Halted);
        }

        let spike_train = self.spike_trains.get(self.time as usize);
        let frame = Frame {
            decision: decision.to_vec(),
            delay_indicator: self.state.delay_indicator.clone(),
            firing: self.state.firing.clone(),
            spike_train: spike_train.cloned(),
        };
        let before: Vec<i32> = self.output_neurons.iter().map(|&i| self.state.configuration[i]).collect();

        let report = self.runtime.step_forward(
            &mut self.state,
            StepInput {
                decision,
                spike_train: spike_train.map(Vec::as_slice),
            },
        )?;

        self.history.push_back(frame);
        if let Some(limit) = self.history_limit {
            while self.history.len() > limit {
                self.history.pop_front();
            }
        }
        self.time += 1;
        for (k, &i) in self.output_neurons.iter().enumerate() {
            self.output_trains[k].push(self.state.configuration[i] > before[k]);
        }

        debug!(time = self.time, fired = report.fired, "next");
        for o in &mut self.observers {
            o.on_next(&self.state, self.time, &report);
        }
        Ok(report)
    }

    /// Undo the last step.
    pub fn prev(&mut self) -> SimulatorResult<()> {
        if self.time == 0 {
            return Err(SimulatorError::AtStart);
        }
        let frame = self
            .history
            .pop_back()
            .ok_or(SimulatorError::HistoryExhausted { time: self.time })?;

        let undone = self.runtime.step_backward(
            &mut self.state,
            PreviousStep {
                decision: &frame.decision,
                delay_indicator: &frame.delay_indicator,
                spike_train: frame.spike_train.as_deref(),
            },
        );
        if let Err(err) = undone {
            self.history.push_back(frame);
            return Err(err.into());
        }

        self.state.firing = frame.firing;
        self.time -= 1;
        for train in &mut self.output_trains {
            train.pop();
        }

        debug!(time = self.time, "prev");
        for o in &mut self.observers {
            o.on_prev(&self.state, self.time);
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.state = self.initial.clone();
        self.history.clear();
        self.time = 0;
        for train in &mut self.output_trains {
            train.clear();
        }

        debug!("reset");
        for o in &mut self.observers {
            o.on_reset(&self.state);
        }
    }
}

//! SN P runtime: holds the static topology and advances (or rewinds) a caller-owned
//! [`SystemState`] by one step.
//!
//! Stage order per step:
//! 1. delay status, 2. indicator (reads the new delay status and the old delay
//! indicator), 3. firing, 4. gated configuration update, 5. delay indicator.
//!
//! Every stage writes into scratch buffers; the state is only committed once all
//! checks have passed, so an error leaves the state exactly as it was.

use tracing::{debug, trace};

use crate::delay;
use crate::error::{check_len, StepError, StepResult};
use crate::firing::{self, ChangeSet};
use crate::indicator;
use crate::matrix::{self, Direction};
use crate::ranges::RuleRanges;
use crate::state::SystemState;
use crate::topology::Topology;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOptions {
    /// Produce a [`ChangeSet`] with every forward step.
    pub track_changes: bool,
}

/// Input of one forward step.
#[derive(Clone, Copy, Debug)]
pub struct StepInput<'a> {
    /// One flag per rule; at most one set inside each neuron's range.
    pub decision: &'a [bool],
    /// Environment spikes per rule, added on top of the rules that act.
    pub spike_train: Option<&'a [u32]>,
}

impl<'a> StepInput<'a> {
    pub fn new(decision: &'a [bool]) -> Self {
        Self {
            decision,
            spike_train: None,
        }
    }

    pub fn with_spike_train(mut self, spike_train: &'a [u32]) -> Self {
        self.spike_train = Some(spike_train);
        self
    }
}

/// What produced the current state: needed to undo the last step.
#[derive(Clone, Copy, Debug)]
pub struct PreviousStep<'a> {
    pub decision: &'a [bool],
    /// Delay indicator as it was before the step being undone.
    pub delay_indicator: &'a [bool],
    pub spike_train: Option<&'a [u32]>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub fired: usize,
    pub changes: Option<ChangeSet>,
}

#[derive(Debug, Clone)]
pub struct SnpRuntime {
    topology: Topology,
    options: StepOptions,
}

impl SnpRuntime {
    pub fn new(topology: Topology) -> Self {
        Self::with_options(topology, StepOptions::default())
    }

    pub fn with_options(topology: Topology, options: StepOptions) -> Self {
        Self { topology, options }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn set_options(&mut self, options: StepOptions) {
        self.options = options;
    }

    /// Initial state with the given spikes, nothing delayed.
    pub fn initial_state(&self, configuration: Vec<i32>) -> StepResult<SystemState> {
        SystemState::new(&self.topology, configuration)
    }

    /// Advance `state` by one step.
    pub fn step_forward(&self, state: &mut SystemState, input: StepInput<'_>) -> StepResult<StepReport> {
        self.forward(state, input).map_err(|err| {
            debug!(%err, "rejected forward step");
            err
        })
    }

    /// Undo the step described by `prev`, which must be the step that produced `state`.
    ///
    /// Restores configuration, delay status and delay indicator. Firing flags are left
    /// as they are; they cannot be derived from the previous step.
    pub fn step_backward(&self, state: &mut SystemState, prev: PreviousStep<'_>) -> StepResult<()> {
        self.backward(state, prev).map_err(|err| {
            debug!(%err, "rejected backward step");
            err
        })
    }

    fn forward(&self, state: &mut SystemState, input: StepInput<'_>) -> StepResult<StepReport> {
        let t = &self.topology;
        let ranges = t.ranges();
        let StepInput { decision, spike_train } = input;

        self.validate(state, decision, None, spike_train)?;
        check_decision(t, state, decision)?;

        let next_status = delay::next_delay_status(&state.delay_status, decision, t.delays(), ranges)?;
        let indicator =
            indicator::indicator_vector(&next_status, decision, &state.delay_indicator, t.delays(), ranges)?;
        let fired = firing::firing_vector(&indicator, spike_train, ranges);
        let next_config = matrix::next_configuration(
            t.matrix(),
            &state.configuration,
            &next_status,
            &indicator,
            spike_train,
            Direction::Forward,
        )?;

        let changes = self.options.track_changes.then(|| {
            let delay_changed = delay::changed(&state.delay_status, &next_status);
            let neuron_updated = delay_changed
                .iter()
                .zip(state.configuration.iter().zip(&next_config))
                .map(|(&d, (a, b))| d || a != b)
                .collect();
            ChangeSet {
                firing_changed: firing::firing_changes(&state.firing, &fired),
                fired: fired.clone(),
                delay_changed,
                neuron_updated,
            }
        });

        // commit
        indicator::update_delay_indicator(&mut state.delay_indicator, &indicator, decision, t.delays());
        state.delay_status = next_status;
        state.configuration = next_config;
        let fired_count = fired.iter().filter(|&&f| f).count();
        state.firing = fired;

        trace!(
            neurons = t.neuron_count(),
            rules = t.rule_count(),
            fired = fired_count,
            in_flight = state.delay_indicator.iter().filter(|&&b| b).count(),
            "forward step"
        );

        Ok(StepReport {
            fired: fired_count,
            changes,
        })
    }

    fn backward(&self, state: &mut SystemState, prev: PreviousStep<'_>) -> StepResult<()> {
        let t = &self.topology;
        let ranges = t.ranges();

        // The undone decision was made while its neurons were open, so only its shape is checked.
        self.validate(state, prev.decision, Some(prev.delay_indicator), prev.spike_train)?;
        check_choice_count(prev.decision, ranges)?;

        // The current delay status is the one the undone step gated with.
        let indicator =
            indicator::indicator_vector(&state.delay_status, prev.decision, prev.delay_indicator, t.delays(), ranges)?;
        let prev_config = matrix::next_configuration(
            t.matrix(),
            &state.configuration,
            &state.delay_status,
            &indicator,
            prev.spike_train,
            Direction::Backward,
        )?;
        let prev_status = delay::previous_delay_status(&state.delay_status, prev.delay_indicator, ranges)?;

        state.configuration = prev_config;
        state.delay_status = prev_status;
        state.delay_indicator.copy_from_slice(prev.delay_indicator);

        trace!(neurons = t.neuron_count(), rules = t.rule_count(), "backward step");
        Ok(())
    }

    fn validate(
        &self,
        state: &SystemState,
        decision: &[bool],
        delay_indicator: Option<&[bool]>,
        spike_train: Option<&[u32]>,
    ) -> StepResult<()> {
        let rules = self.topology.rule_count();
        state.check_against(&self.topology)?;
        check_len("decision", rules, decision.len())?;
        if let Some(di) = delay_indicator {
            check_len("previous delay indicator", rules, di.len())?;
        }
        if let Some(train) = spike_train {
            check_len("spike train", rules, train.len())?;
        }
        Ok(())
    }
}

fn check_choice_count(decision: &[bool], ranges: &RuleRanges) -> StepResult<()> {
    for (neuron, range) in ranges.iter() {
        let chosen = decision[range].iter().filter(|&&c| c).count();
        if chosen > 1 {
            return Err(StepError::InvalidDecision { neuron, chosen });
        }
    }
    Ok(())
}

/// A forward decision picks at most one rule per neuron, and only in open neurons.
///
/// `decision` must already have one flag per rule.
pub fn check_decision(topology: &Topology, state: &SystemState, decision: &[bool]) -> StepResult<()> {
    let ranges = topology.ranges();
    check_choice_count(decision, ranges)?;
    for (neuron, range) in ranges.iter() {
        if decision[range].iter().any(|&c| c) && !state.is_open(topology, neuron) {
            return Err(StepError::ClosedNeuron { neuron });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::TransitionMatrix;

    /// Neuron 0: one rule, no delay, +1 to itself and -1 to neuron 1.
    /// Neuron 1: one rule, delay 2, no effect.
    fn pair() -> SnpRuntime {
        let m = TransitionMatrix::new(2, 2, vec![1, 0, -1, 0]).unwrap();
        let t = Topology::new(vec![1, 1], vec![0, 2], m).unwrap();
        SnpRuntime::with_options(t, StepOptions { track_changes: true })
    }

    #[test]
    fn immediate_rule_applies_this_step() {
        let rt = pair();
        let mut s = rt.initial_state(vec![3, 3]).unwrap();
        let report = rt.step_forward(&mut s, StepInput::new(&[true, false])).unwrap();
        assert_eq!(s.configuration, vec![4, 2]);
        assert_eq!(s.delay_status, vec![0, 0]);
        assert_eq!(s.delay_indicator, vec![false, false]);
        assert_eq!(report.fired, 1);
    }

    #[test]
    fn delayed_rule_defers_effect() {
        let rt = pair();
        let mut s = rt.initial_state(vec![3, 3]).unwrap();
        rt.step_forward(&mut s, StepInput::new(&[false, true])).unwrap();
        assert_eq!(s.configuration, vec![3, 3]);
        assert_eq!(s.delay_status, vec![0, 2]);
        assert_eq!(s.delay_indicator, vec![false, true]);
        assert_eq!(s.firing, vec![false, false]);
    }

    #[test]
    fn change_set_tracks_delay_and_spikes() {
        let rt = pair();
        let mut s = rt.initial_state(vec![3, 3]).unwrap();
        let changes = rt
            .step_forward(&mut s, StepInput::new(&[true, true]))
            .unwrap()
            .changes
            .unwrap();
        assert_eq!(changes.fired, vec![true, false]);
        assert_eq!(changes.firing_changed, vec![true, false]);
        assert_eq!(changes.delay_changed, vec![false, true]);
        // neuron 1 is gated: its spike count is untouched but its delay changed
        assert_eq!(s.configuration, vec![4, 3]);
        assert_eq!(changes.neuron_updated, vec![true, true]);
    }

    #[test]
    fn changes_are_optional() {
        let mut rt = pair();
        rt.set_options(StepOptions::default());
        let mut s = rt.initial_state(vec![3, 3]).unwrap();
        let report = rt.step_forward(&mut s, StepInput::new(&[true, false])).unwrap();
        assert!(report.changes.is_none());
    }

    #[test]
    fn two_choices_in_one_neuron_are_rejected() {
        let m = TransitionMatrix::zeros(1, 2);
        let rt = SnpRuntime::new(Topology::new(vec![2], vec![0, 0], m).unwrap());
        let mut s = rt.initial_state(vec![5]).unwrap();
        let before = s.clone();
        let err = rt.step_forward(&mut s, StepInput::new(&[true, true])).unwrap_err();
        assert_eq!(err, StepError::InvalidDecision { neuron: 0, chosen: 2 });
        assert_eq!(s, before);
    }

    #[test]
    fn choice_in_closed_neuron_is_rejected() {
        let rt = pair();
        let mut s = rt.initial_state(vec![3, 3]).unwrap();
        rt.step_forward(&mut s, StepInput::new(&[false, true])).unwrap();
        let before = s.clone();
        let err = rt.step_forward(&mut s, StepInput::new(&[true, true])).unwrap_err();
        assert_eq!(err, StepError::ClosedNeuron { neuron: 1 });
        assert_eq!(s, before);
        // the open neuron alone is fine
        rt.step_forward(&mut s, StepInput::new(&[true, false])).unwrap();
        assert_eq!(s.delay_status, vec![0, 1]);
    }

    #[test]
    fn backward_undoes_forward() {
        let rt = pair();
        let mut s = rt.initial_state(vec![3, 3]).unwrap();
        let before = s.clone();
        let decision = [true, false];
        rt.step_forward(&mut s, StepInput::new(&decision)).unwrap();
        rt.step_backward(
            &mut s,
            PreviousStep {
                decision: &decision,
                delay_indicator: &before.delay_indicator,
                spike_train: None,
            },
        )
        .unwrap();
        assert_eq!(s.configuration, before.configuration);
        assert_eq!(s.delay_status, before.delay_status);
        assert_eq!(s.delay_indicator, before.delay_indicator);
        // firing is the caller's to restore
        assert_eq!(s.firing, vec![true, false]);
    }
}

use proptest::prelude::*;
use snp_core::{
    PreviousStep, SnpRuntime, StepError, StepInput, StepOptions, SystemState, Topology, TransitionMatrix,
};

/// Neuron 0 owns one undelayed rule that adds a spike to itself and removes one
/// from neuron 1. Neuron 1 owns one rule with delay 2 and no effect.
fn two_neurons() -> SnpRuntime {
    let matrix = TransitionMatrix::new(2, 2, vec![1, 0, -1, 0]).unwrap();
    SnpRuntime::new(Topology::new(vec![1, 1], vec![0, 2], matrix).unwrap())
}

#[test]
fn undelayed_rule_applies_immediately() {
    let rt = two_neurons();
    let mut state = rt.initial_state(vec![3, 3]).unwrap();
    rt.step_forward(&mut state, StepInput::new(&[true, false])).unwrap();
    assert_eq!(state.configuration, vec![4, 2]);
    assert_eq!(state.delay_status, vec![0, 0]);
    assert_eq!(state.delay_indicator, vec![false, false]);
}

#[test]
fn delayed_rule_only_sets_delay() {
    let rt = two_neurons();
    let mut state = rt.initial_state(vec![3, 3]).unwrap();
    rt.step_forward(&mut state, StepInput::new(&[false, true])).unwrap();
    assert_eq!(state.configuration, vec![3, 3]);
    assert_eq!(state.delay_status, vec![0, 2]);
    assert_eq!(state.delay_indicator, vec![false, true]);
}

#[test]
fn repeated_steps_are_deterministic() {
    let rt = two_neurons();
    let start = rt.initial_state(vec![5, 1]).unwrap();
    let decisions: [[bool; 2]; 4] = [[true, true], [true, false], [false, false], [true, false]];

    let run = || {
        let mut s = start.clone();
        let mut reports = Vec::new();
        for d in &decisions {
            reports.push(rt.step_forward(&mut s, StepInput::new(d)).unwrap());
        }
        (s, reports)
    };
    assert_eq!(run(), run());
}

#[test]
fn cooling_neuron_receives_nothing() {
    // Neuron 0 fires an undelayed rule sending +5 to neuron 1, while neuron 1
    // starts a delay this very step.
    let matrix = TransitionMatrix::new(2, 2, vec![-1, 0, 5, 0]).unwrap();
    let rt = SnpRuntime::new(Topology::new(vec![1, 1], vec![0, 1], matrix).unwrap());
    let mut state = rt.initial_state(vec![1, 1]).unwrap();
    rt.step_forward(&mut state, StepInput::new(&[true, true])).unwrap();
    assert_eq!(state.delay_status, vec![0, 1]);
    assert_eq!(state.configuration, vec![0, 1]);

    // Environment spikes are gated as well.
    let mut state = rt.initial_state(vec![1, 1]).unwrap();
    state.delay_status = vec![0, 2];
    state.delay_indicator = vec![false, true];
    rt.step_forward(&mut state, StepInput::new(&[false, false]).with_spike_train(&[3, 0]))
        .unwrap();
    assert_eq!(state.configuration, vec![-2, 1]);
}

#[test]
fn delay_lifecycle() {
    // Neuron 0: one rule, delay 3, moves a spike to neuron 1. Neuron 1 has no rules.
    let matrix = TransitionMatrix::new(2, 1, vec![-1, 1]).unwrap();
    let rt = SnpRuntime::with_options(
        Topology::new(vec![1, 0], vec![3], matrix).unwrap(),
        StepOptions { track_changes: true },
    );
    let mut state = rt.initial_state(vec![2, 0]).unwrap();

    rt.step_forward(&mut state, StepInput::new(&[true])).unwrap();
    assert_eq!(state.delay_status, vec![3, 0]);
    assert_eq!(state.delay_indicator, vec![true]);

    for expected_status in [2, 1] {
        let report = rt.step_forward(&mut state, StepInput::new(&[false])).unwrap();
        assert_eq!(state.delay_status, vec![expected_status, 0]);
        assert_eq!(state.delay_indicator, vec![true]);
        assert_eq!(state.configuration, vec![2, 0]);
        assert_eq!(report.fired, 0);
    }

    let report = rt.step_forward(&mut state, StepInput::new(&[false])).unwrap();
    assert_eq!(state.delay_status, vec![0, 0]);
    assert_eq!(state.delay_indicator, vec![false]);
    assert_eq!(state.configuration, vec![1, 1]);
    assert_eq!(report.fired, 1);
    let changes = report.changes.unwrap();
    assert_eq!(changes.fired, vec![true, false]);
    assert_eq!(changes.neuron_updated, vec![true, true]);
}

#[test]
fn environment_spikes_mark_neuron_as_fired() {
    // Input neuron 0 has one rule producing into neuron 1.
    let matrix = TransitionMatrix::new(2, 1, vec![0, 1]).unwrap();
    let rt = SnpRuntime::new(Topology::new(vec![1, 0], vec![0], matrix).unwrap());
    let mut state = rt.initial_state(vec![0, 0]).unwrap();
    let report = rt
        .step_forward(&mut state, StepInput::new(&[false]).with_spike_train(&[1]))
        .unwrap();
    assert_eq!(report.fired, 1);
    assert_eq!(state.firing, vec![true, false]);
    assert_eq!(state.configuration, vec![0, 1]);
}

#[test]
fn mismatched_lengths_leave_state_untouched() {
    let rt = two_neurons();
    let mut state = rt.initial_state(vec![3, 3]).unwrap();
    let before = state.clone();

    let err = rt.step_forward(&mut state, StepInput::new(&[true])).unwrap_err();
    assert_eq!(
        err,
        StepError::DimensionMismatch {
            vector: "decision",
            expected: 2,
            actual: 1
        }
    );
    let err = rt
        .step_forward(&mut state, StepInput::new(&[true, false]).with_spike_train(&[0, 0, 0]))
        .unwrap_err();
    assert!(matches!(err, StepError::DimensionMismatch { vector: "spike train", .. }));

    let mut short = state.clone();
    short.delay_status.pop();
    assert!(rt.step_forward(&mut short, StepInput::new(&[true, false])).is_err());

    assert_eq!(state, before);
}

#[test]
fn overflow_leaves_state_untouched() {
    let matrix = TransitionMatrix::new(2, 1, vec![1, 1]).unwrap();
    let rt = SnpRuntime::new(Topology::new(vec![1, 0], vec![0], matrix).unwrap());
    let mut state = rt.initial_state(vec![0, i32::MAX]).unwrap();
    let before = state.clone();
    let err = rt.step_forward(&mut state, StepInput::new(&[true])).unwrap_err();
    assert_eq!(err, StepError::SpikeOverflow { neuron: 1 });
    assert_eq!(state, before);
}

#[test]
fn closed_neuron_cannot_queue_a_second_rule() {
    // Neuron 0 owns rules a (delay 2) and b (delay 1); each moves a spike to neuron 1.
    let matrix = TransitionMatrix::new(2, 2, vec![-1, -1, 1, 1]).unwrap();
    let rt = SnpRuntime::new(Topology::new(vec![2, 0], vec![2, 1], matrix).unwrap());
    let mut state = rt.initial_state(vec![5, 0]).unwrap();

    rt.step_forward(&mut state, StepInput::new(&[true, false])).unwrap();
    let before = state.clone();
    let err = rt.step_forward(&mut state, StepInput::new(&[false, true])).unwrap_err();
    assert_eq!(err, StepError::ClosedNeuron { neuron: 0 });
    assert_eq!(state, before);

    for _ in 0..2 {
        rt.step_forward(&mut state, StepInput::new(&[false, false])).unwrap();
    }
    // only rule a was released
    assert_eq!(state.configuration, vec![4, 1]);
    assert_eq!(state.delay_indicator, vec![false, false]);
}

#[test]
fn rewind_through_a_delay() {
    let matrix = TransitionMatrix::new(2, 1, vec![-1, 1]).unwrap();
    let rt = SnpRuntime::new(Topology::new(vec![1, 0], vec![2], matrix).unwrap());
    let mut state = rt.initial_state(vec![2, 0]).unwrap();

    let decisions = [[true], [false], [false]];
    let mut history = Vec::new();
    for d in &decisions {
        history.push((d, state.clone()));
        rt.step_forward(&mut state, StepInput::new(d)).unwrap();
    }
    assert_eq!(state.configuration, vec![1, 1]);

    for (d, before) in history.into_iter().rev() {
        rt.step_backward(
            &mut state,
            PreviousStep {
                decision: d,
                delay_indicator: &before.delay_indicator,
                spike_train: None,
            },
        )
        .unwrap();
        assert_eq!(state.configuration, before.configuration);
        assert_eq!(state.delay_status, before.delay_status);
        assert_eq!(state.delay_indicator, before.delay_indicator);
    }
}

/// (rule counts, delays, row-major matrix, initial configuration)
fn arb_system() -> impl Strategy<Value = (Vec<u32>, Vec<u32>, Vec<i32>, Vec<i32>)> {
    prop::collection::vec(0u32..3, 1..5).prop_flat_map(|counts| {
        let n = counts.len();
        let r = counts.iter().sum::<u32>() as usize;
        (
            Just(counts),
            prop::collection::vec(0u32..3, r),
            prop::collection::vec(-2i32..3, n * r),
            prop::collection::vec(0i32..10, n),
        )
    })
}

/// Per step: a rule selector per neuron and optional environment spikes per rule.
fn arb_steps() -> impl Strategy<Value = Vec<(Vec<u8>, Option<Vec<u32>>)>> {
    prop::collection::vec(
        (
            prop::collection::vec(any::<u8>(), 4),
            prop::option::of(prop::collection::vec(0u32..2, 8)),
        ),
        1..10,
    )
}

/// Choose at most one rule for every open neuron.
fn decision_for(rt: &SnpRuntime, state: &SystemState, selectors: &[u8]) -> Vec<bool> {
    let topology = rt.topology();
    let mut decision = vec![false; topology.rule_count()];
    for (i, range) in topology.ranges().iter() {
        if range.is_empty() || !state.is_open(topology, i) {
            continue;
        }
        let pick = selectors[i] as usize % (range.len() + 1);
        if pick < range.len() {
            decision[range.start + pick] = true;
        }
    }
    decision
}

proptest! {
    #[test]
    fn backward_inverts_forward((counts, delays, values, config) in arb_system(), steps in arb_steps()) {
        let n = counts.len();
        let r = delays.len();
        let matrix = TransitionMatrix::new(n, r, values).unwrap();
        let rt = SnpRuntime::new(Topology::new(counts, delays, matrix).unwrap());
        let mut state = rt.initial_state(config).unwrap();

        let mut history = Vec::new();
        for (selectors, train) in &steps {
            let decision = decision_for(&rt, &state, selectors);
            let train: Option<Vec<u32>> = train.as_ref().map(|t| t[..r].to_vec());
            let before = state.clone();
            let mut input = StepInput::new(&decision);
            if let Some(t) = train.as_deref() {
                input = input.with_spike_train(t);
            }
            rt.step_forward(&mut state, input).unwrap();
            history.push((decision, train, before));
        }

        for (decision, train, before) in history.into_iter().rev() {
            rt.step_backward(&mut state, PreviousStep {
                decision: &decision,
                delay_indicator: &before.delay_indicator,
                spike_train: train.as_deref(),
            }).unwrap();
            prop_assert_eq!(&state.configuration, &before.configuration);
            prop_assert_eq!(&state.delay_status, &before.delay_status);
            prop_assert_eq!(&state.delay_indicator, &before.delay_indicator);
        }
    }

    #[test]
    fn rule_ranges_partition((counts, delays, values, _config) in arb_system()) {
        let n = counts.len();
        let r = delays.len();
        let total: u32 = counts.iter().sum();
        let t = Topology::new(counts.clone(), delays, TransitionMatrix::new(n, r, values).unwrap()).unwrap();
        prop_assert_eq!(t.ranges().rule_count(), total as usize);
        let mut next = 0;
        for (i, range) in t.ranges().iter() {
            prop_assert_eq!(range.start, next);
            prop_assert_eq!(range.len(), counts[i] as usize);
            next = range.end;
        }
        prop_assert_eq!(next, r);
    }
}

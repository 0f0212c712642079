//! Transposed spiking transition matrix and the gated configuration update.
//!
//! The matrix is stored one row per neuron, one column per rule, so that the
//! per-neuron dot product walks a contiguous row.

use crate::error::{check_len, scratch, StepError, StepResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionMatrix {
    neurons: usize,
    rules: usize,
    values: Vec<i32>,
}

impl TransitionMatrix {
    /// `values` is row-major: `values[neuron * rules + rule]`.
    pub fn new(neurons: usize, rules: usize, values: Vec<i32>) -> StepResult<Self> {
        check_len("transition matrix", neurons * rules, values.len())?;
        Ok(Self {
            neurons,
            rules,
            values,
        })
    }

    pub fn zeros(neurons: usize, rules: usize) -> Self {
        Self {
            neurons,
            rules,
            values: vec![0; neurons * rules],
        }
    }

    #[inline]
    pub fn neurons(&self) -> usize {
        self.neurons
    }

    #[inline]
    pub fn rules(&self) -> usize {
        self.rules
    }

    #[inline]
    pub fn row(&self, neuron: usize) -> &[i32] {
        let start = neuron * self.rules;
        &self.values[start..start + self.rules]
    }

    #[inline]
    pub fn set(&mut self, neuron: usize, rule: usize, value: i32) {
        self.values[neuron * self.rules + rule] = value;
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.values
    }

    /// Net spike gain of one neuron: `Σ_r (indicator[r] + spike_train[r]) * row[r]`.
    ///
    /// Accumulates in i64; `None` if even that overflows.
    pub fn net_gain(&self, neuron: usize, indicator: &[bool], spike_train: Option<&[u32]>) -> Option<i64> {
        let row = self.row(neuron);
        let mut acc: i64 = 0;
        for (r, &w) in row.iter().enumerate() {
            if w == 0 {
                continue;
            }
            let mut times = indicator[r] as i64;
            if let Some(train) = spike_train {
                times += train[r] as i64;
            }
            if times == 0 {
                continue;
            }
            acc = acc.checked_add(times.checked_mul(w as i64)?)?;
        }
        Some(acc)
    }
}

/// Direction in which the net gain is applied to the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Compute the gated configuration for every neuron into a fresh buffer.
///
/// A neuron whose `gate_status` (the delay status after the step) is nonzero keeps
/// its spike count unchanged. Nothing is written to `configuration`.
pub fn next_configuration(
    matrix: &TransitionMatrix,
    configuration: &[i32],
    gate_status: &[u32],
    indicator: &[bool],
    spike_train: Option<&[u32]>,
    direction: Direction,
) -> StepResult<Vec<i32>> {
    let mut out = scratch(configuration.len())?;
    for (i, &spikes) in configuration.iter().enumerate() {
        if gate_status[i] != 0 {
            out.push(spikes);
            continue;
        }
        let gain = matrix
            .net_gain(i, indicator, spike_train)
            .ok_or(StepError::SpikeOverflow { neuron: i })?;
        let next = match direction {
            Direction::Forward => (spikes as i64).checked_add(gain),
            Direction::Backward => (spikes as i64).checked_sub(gain),
        };
        let next = next
            .and_then(|v| i32::try_from(v).ok())
            .ok_or(StepError::SpikeOverflow { neuron: i })?;
        out.push(next);
    }
    Ok(out)
}

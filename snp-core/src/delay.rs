//! Per-neuron delay status: countdown forward, reconstruction backward.

use crate::error::{scratch, StepResult};
use crate::ranges::RuleRanges;

/// Next delay status of every neuron.
///
/// A neuron still cooling down counts down by one and ignores its decision.
/// An open neuron adopts the delay of its chosen rule, or stays at 0.
pub fn next_delay_status(
    status: &[u32],
    decision: &[bool],
    delays: &[u32],
    ranges: &RuleRanges,
) -> StepResult<Vec<u32>> {
    let mut next = scratch(status.len())?;
    for (i, range) in ranges.iter() {
        let value = if status[i] > 0 {
            status[i] - 1
        } else {
            decision[range.clone()]
                .iter()
                .position(|&chosen| chosen)
                .map_or(0, |j| delays[range.start + j])
        };
        next.push(value);
    }
    Ok(next)
}

/// Delay status one step earlier.
///
/// A neuron with any rule in flight before the step was counting down, so it
/// held one more than now; otherwise it was open.
pub fn previous_delay_status(
    status: &[u32],
    previous_delay_indicator: &[bool],
    ranges: &RuleRanges,
) -> StepResult<Vec<u32>> {
    let mut prev = scratch(status.len())?;
    for (i, range) in ranges.iter() {
        let was_delayed = previous_delay_indicator[range].iter().any(|&b| b);
        prev.push(if was_delayed { status[i].saturating_add(1) } else { 0 });
    }
    Ok(prev)
}

/// Neurons whose delay status differs between `before` and `after`.
pub fn changed(before: &[u32], after: &[u32]) -> Vec<bool> {
    before.iter().zip(after).map(|(a, b)| a != b).collect()
}

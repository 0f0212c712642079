//! Per-rule indicator (rule acts this step) and delay indicator (rule in flight).

use crate::error::{scratch, StepResult};
use crate::ranges::RuleRanges;

/// Rules that act this step.
///
/// A rule acts iff its neuron's delay status after the step is 0 and the rule is
/// either freshly chosen with no delay or was in flight and its delay has elapsed.
pub fn indicator_vector(
    next_status: &[u32],
    decision: &[bool],
    delay_indicator: &[bool],
    delays: &[u32],
    ranges: &RuleRanges,
) -> StepResult<Vec<bool>> {
    let mut out = scratch(ranges.rule_count())?;
    for (i, range) in ranges.iter() {
        let open = next_status[i] == 0;
        for r in range {
            out.push(open && ((decision[r] && delays[r] == 0) || delay_indicator[r]));
        }
    }
    Ok(out)
}

/// Advance the delay indicator in place. Must run after [`indicator_vector`]
/// has read the old value.
pub fn update_delay_indicator(delay_indicator: &mut [bool], indicator: &[bool], decision: &[bool], delays: &[u32]) {
    for (r, in_flight) in delay_indicator.iter_mut().enumerate() {
        *in_flight = (*in_flight && !indicator[r]) || (decision[r] && delays[r] > 0);
    }
}

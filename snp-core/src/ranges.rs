//! Rule-range table: maps each neuron to its contiguous slice of the rule index space.

use core::ops::Range;

/// Prefix sums over the rule-count vector.
///
/// `offsets[i]..offsets[i + 1]` is the rule range of neuron `i`; `offsets` has
/// `neuron_count + 1` entries, starts at 0 and ends at the total rule count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRanges {
    offsets: Vec<usize>,
}

impl RuleRanges {
    pub fn from_counts(rule_counts: &[u32]) -> Self {
        let mut offsets = Vec::with_capacity(rule_counts.len() + 1);
        let mut acc = 0usize;
        offsets.push(acc);
        for &count in rule_counts {
            acc += count as usize;
            offsets.push(acc);
        }
        Self { offsets }
    }

    #[inline]
    pub fn neuron_count(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    pub fn rule_count(&self) -> usize {
        self.offsets[self.offsets.len() - 1]
    }

    #[inline]
    pub fn range(&self, neuron: usize) -> Range<usize> {
        self.offsets[neuron]..self.offsets[neuron + 1]
    }

    /// Iterate `(neuron, rule range)` pairs in neuron order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Range<usize>)> + '_ {
        self.offsets
            .windows(2)
            .enumerate()
            .map(|(i, w)| (i, w[0]..w[1]))
    }
}

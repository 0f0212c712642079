//! Spiking and forgetting rules.

/// Regular language over the single letter `a` that a neuron's spike count must
/// belong to for a rule to be applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpikeGuard {
    /// a^n
    Exact(u32),
    /// a^n a*
    AtLeast(u32),
    /// a^offset (a^period)*; a zero period accepts only `offset`.
    Periodic { offset: u32, period: u32 },
}

impl SpikeGuard {
    pub fn accepts(&self, spikes: u32) -> bool {
        match *self {
            SpikeGuard::Exact(n) => spikes == n,
            SpikeGuard::AtLeast(n) => spikes >= n,
            SpikeGuard::Periodic { offset, period } => {
                spikes >= offset && if period == 0 { spikes == offset } else { (spikes - offset) % period == 0 }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub guard: SpikeGuard,
    /// Spikes removed from the owning neuron when the rule acts.
    pub consume: u32,
    /// Spikes sent along each outgoing synapse (multiplied by its weight).
    pub produce: u32,
    pub delay: u32,
}

impl Rule {
    /// `E/a^consume -> a;delay`
    pub fn spiking(guard: SpikeGuard, consume: u32, delay: u32) -> Self {
        Self {
            guard,
            consume,
            produce: 1,
            delay,
        }
    }

    /// `E/a^consume -> λ`
    pub fn forgetting(guard: SpikeGuard, consume: u32) -> Self {
        Self {
            guard,
            consume,
            produce: 0,
            delay: 0,
        }
    }

    /// The implicit rule of an input neuron: emits one spike whenever its train says so.
    pub(crate) fn input() -> Self {
        Self {
            guard: SpikeGuard::AtLeast(0),
            consume: 0,
            produce: 1,
            delay: 0,
        }
    }

    pub fn is_forgetting(&self) -> bool {
        self.produce == 0
    }

    /// Applicable to a neuron holding `spikes` (ignoring delays).
    pub fn is_applicable(&self, spikes: u32) -> bool {
        spikes >= self.consume && self.guard.accepts(spikes)
    }
}

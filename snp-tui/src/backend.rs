// Backend abstraction for the TUI so we can swap different SN P engines.

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use snp_core::{ChangeLog, SystemState};
use snp_core_plus::{
    Neuron, NeuronBuilder, NeuronKind, Rule, Simulator, SimulatorError, SimulatorResult, SpikeGuard, SystemModel,
};

/// Result of one forward step as the UI needs it.
pub struct StepOutcome {
    pub fired: Vec<bool>,
    pub changes: ChangeLog,
}

/// Common interface for any SN P backend that can drive the TUI.
pub trait SnpBackend {
    /// Choose rules for the current configuration and advance one step.
    fn step(&mut self) -> SimulatorResult<StepOutcome>;
    /// Undo the last step.
    fn step_back(&mut self) -> SimulatorResult<()>;
    fn reset(&mut self);
    /// Number of neurons in the model (rows in the raster).
    fn neurons(&self) -> usize;
    fn label(&self, neuron: usize) -> String;
    fn state(&self) -> &SystemState;
    fn time(&self) -> u64;
    fn halted(&self) -> bool;

    /// Output neuron spike trains, if the backend records them.
    fn output_trains(&self) -> Vec<(usize, Vec<bool>)> {
        Vec::new()
    }
}

/// Built-in systems selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DemoSystem {
    /// Three regular neurons with alternative delayed rules and an output neuron.
    Figure,
    /// A chain whose first neuron fires with a delay.
    Delayed,
    /// An input neuron driving a forgetting neuron.
    Input,
}

impl DemoSystem {
    pub fn build(self) -> anyhow::Result<SystemModel> {
        let mut m = SystemModel::new();
        match self {
            DemoSystem::Figure => {
                let n0 = NeuronBuilder::new(NeuronKind::Regular)
                    .label("n0")
                    .spikes(2)
                    .rule(Rule::spiking(SpikeGuard::Exact(2), 1, 0))
                    .rule(Rule::forgetting(SpikeGuard::Exact(1), 1))
                    .build()?;
                let n1 = NeuronBuilder::new(NeuronKind::Regular)
                    .label("n1")
                    .spikes(3)
                    .rule(Rule::spiking(SpikeGuard::Exact(3), 3, 0))
                    .rule(Rule::spiking(SpikeGuard::Exact(1), 1, 1))
                    .rule(Rule::forgetting(SpikeGuard::Exact(2), 2))
                    .build()?;
                let n2 = NeuronBuilder::new(NeuronKind::Regular)
                    .label("n2")
                    .spikes(1)
                    .rule(Rule::spiking(SpikeGuard::Exact(1), 1, 0))
                    .rule(Rule::spiking(SpikeGuard::Exact(1), 1, 1))
                    .build()?;
                let out = NeuronBuilder::new(NeuronKind::Output).label("out").build()?;
                for n in [n0, n1, n2, out] {
                    m.add_neuron(n);
                }
                for (from, to) in [(0, 1), (0, 2), (2, 0), (2, 1), (1, 3)] {
                    m.add_synapse(from, to, 1)?;
                }
            }
            DemoSystem::Delayed => {
                let n0 = NeuronBuilder::new(NeuronKind::Regular)
                    .label("src")
                    .spikes(4)
                    .rule(Rule::spiking(SpikeGuard::AtLeast(1), 1, 2))
                    .build()?;
                let n1 = NeuronBuilder::new(NeuronKind::Regular)
                    .label("relay")
                    .rule(Rule::spiking(SpikeGuard::Periodic { offset: 1, period: 2 }, 1, 0))
                    .rule(Rule::forgetting(SpikeGuard::Exact(2), 2))
                    .build()?;
                let out = NeuronBuilder::new(NeuronKind::Output).label("out").build()?;
                for n in [n0, n1, out] {
                    m.add_neuron(n);
                }
                m.add_synapse(0, 1, 1)?;
                m.add_synapse(1, 2, 1)?;
            }
            DemoSystem::Input => {
                let mut input = Neuron::input(vec![1, 0, 1, 1, 0, 1]);
                input.set_label("in");
                let n1 = NeuronBuilder::new(NeuronKind::Regular)
                    .label("gate")
                    .rule(Rule::spiking(SpikeGuard::Exact(2), 2, 1))
                    .rule(Rule::forgetting(SpikeGuard::AtLeast(3), 3))
                    .build()?;
                let out = NeuronBuilder::new(NeuronKind::Output).label("out").build()?;
                for n in [input, n1, out] {
                    m.add_neuron(n);
                }
                m.add_synapse(0, 1, 1)?;
                m.add_synapse(1, 2, 1)?;
            }
        }
        Ok(m)
    }
}

/// How each open neuron picks among its applicable rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Selection {
    /// Lowest-numbered applicable rule.
    #[default]
    First,
    /// Pseudo-random applicable rule from a seeded generator.
    Random,
}

/// Implementation backed by the snp-core-plus simulator.
///
/// Rule selection lives here, on the host side. Reset reseeds the generator, so a
/// random run replays identically.
pub struct CoreBackend {
    sim: Simulator,
    selection: Selection,
    seed: u64,
    rng: StdRng,
}

impl CoreBackend {
    pub fn new(model: SystemModel) -> SimulatorResult<Self> {
        Self::with_selection(model, Selection::First, 0)
    }

    pub fn with_selection(model: SystemModel, selection: Selection, seed: u64) -> SimulatorResult<Self> {
        Ok(Self {
            sim: Simulator::new(model)?,
            selection,
            seed,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Per neuron, the chosen rule (if any) for the current configuration.
    fn choices(&mut self) -> Vec<Option<usize>> {
        let applicable = self.sim.applicable_rules();
        match self.selection {
            Selection::First => applicable.iter().map(|rules| rules.first().copied()).collect(),
            Selection::Random => applicable
                .iter()
                .map(|rules| rules.choose(&mut self.rng).copied())
                .collect(),
        }
    }

    fn choose(&mut self) -> SimulatorResult<Vec<bool>> {
        let choices = self.choices();
        Ok(self.sim.model().decision_vector(&choices)?)
    }
}

impl SnpBackend for CoreBackend {
    fn step(&mut self) -> SimulatorResult<StepOutcome> {
        let decision = self.choose()?;
        let report = self.sim.next(&decision)?;
        let changes = report.changes.as_ref().map(ChangeLog::from).unwrap_or_default();
        Ok(StepOutcome {
            fired: self.sim.state().firing.clone(),
            changes,
        })
    }

    fn step_back(&mut self) -> SimulatorResult<()> {
        self.sim.prev()
    }

    fn reset(&mut self) {
        self.sim.reset();
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    fn neurons(&self) -> usize {
        self.sim.model().neuron_count()
    }

    fn label(&self, neuron: usize) -> String {
        self.sim
            .model()
            .neuron(neuron)
            .and_then(Neuron::label)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("n{:02}", neuron))
    }

    fn state(&self) -> &SystemState {
        self.sim.state()
    }

    fn time(&self) -> u64 {
        self.sim.time()
    }

    fn halted(&self) -> bool {
        self.sim.is_halted()
    }

    fn output_trains(&self) -> Vec<(usize, Vec<bool>)> {
        self.sim
            .output_neurons()
            .iter()
            .copied()
            .zip(self.sim.output_spike_trains().iter().cloned())
            .collect()
    }
}

impl From<SimulatorError> for StepFailure {
    fn from(err: SimulatorError) -> Self {
        match err {
            SimulatorError::Halted | SimulatorError::AtStart | SimulatorError::HistoryExhausted { .. } => {
                StepFailure::Boundary(err.to_string())
            }
            other => StepFailure::Fault(other.to_string()),
        }
    }
}

/// How the UI reports a failed step: boundaries are normal, faults are logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepFailure {
    Boundary(String),
    Fault(String),
}

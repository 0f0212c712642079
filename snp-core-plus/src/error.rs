use snp_core::StepError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("neuron {0} doesn't exist")]
    UnknownNeuron(usize),

    #[error("synapse {from} -> {to} doesn't exist")]
    UnknownSynapse { from: usize, to: usize },

    #[error("synapse {from} -> {to} already exists")]
    DuplicateSynapse { from: usize, to: usize },

    #[error("neuron {0} cannot have a synapse to itself")]
    SelfSynapse(usize),

    #[error("neuron {neuron} has no rule {rule}")]
    UnknownRule { neuron: usize, rule: usize },

    #[error("forgetting rule {rule} cannot have a delay")]
    DelayedForgettingRule { rule: usize },

    #[error("can't {0}")]
    WrongNeuronKind(&'static str),

    #[error("value out of range: {0}")]
    ValueOutOfRange(&'static str),

    #[error(transparent)]
    Step(#[from] StepError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulatorError {
    #[error("reached final configuration")]
    Halted,

    #[error("reached starting configuration")]
    AtStart,

    /// Older steps were dropped by the history limit.
    #[error("history exhausted at time {time}")]
    HistoryExhausted { time: u64 },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Step(#[from] StepError),
}

pub type ModelResult<T, E = ModelError> = core::result::Result<T, E>;
pub type SimulatorResult<T, E = SimulatorError> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(format!("{}", ModelError::UnknownNeuron(4)), "neuron 4 doesn't exist");
        assert_eq!(
            format!("{}", ModelError::DelayedForgettingRule { rule: 1 }),
            "forgetting rule 1 cannot have a delay"
        );
        assert_eq!(
            format!("{}", ModelError::WrongNeuronKind("add rules to non-regular neurons")),
            "can't add rules to non-regular neurons"
        );
        assert_eq!(format!("{}", SimulatorError::Halted), "reached final configuration");
        assert_eq!(format!("{}", SimulatorError::AtStart), "reached starting configuration");
    }

    #[test]
    fn step_errors_pass_through() {
        let err: SimulatorError = StepError::SpikeOverflow { neuron: 3 }.into();
        assert_eq!(format!("{}", err), "spike count overflow at neuron 3");
        let err: SimulatorError = ModelError::UnknownNeuron(0).into();
        assert!(matches!(err, SimulatorError::Model(ModelError::UnknownNeuron(0))));
    }
}

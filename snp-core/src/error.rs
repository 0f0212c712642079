//! Step errors. Every variant is raised before any state buffer is written.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    /// More than one rule chosen inside a single neuron's rule range.
    #[error("invalid decision: neuron {neuron} has {chosen} rules chosen (at most 1 allowed)")]
    InvalidDecision { neuron: usize, chosen: usize },

    /// A rule chosen in a neuron that is cooling down or has a rule in flight.
    #[error("invalid decision: neuron {neuron} is closed")]
    ClosedNeuron { neuron: usize },

    #[error("dimension mismatch: {vector} has length {actual}, expected {expected}")]
    DimensionMismatch {
        vector: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("allocation error: could not reserve scratch buffer of {len} elements")]
    AllocationFailure { len: usize },

    /// The spike count of a neuron would leave the `i32` range.
    #[error("spike count overflow at neuron {neuron}")]
    SpikeOverflow { neuron: usize },
}

pub type StepResult<T, E = StepError> = core::result::Result<T, E>;

/// Fails with [`StepError::DimensionMismatch`] unless `actual == expected`.
#[inline]
pub(crate) fn check_len(vector: &'static str, expected: usize, actual: usize) -> StepResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(StepError::DimensionMismatch {
            vector,
            expected,
            actual,
        })
    }
}

/// Reserve an empty vector with room for exactly `len` elements.
pub(crate) fn scratch<T>(len: usize) -> StepResult<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| StepError::AllocationFailure { len })?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            format!("{}", StepError::InvalidDecision { neuron: 2, chosen: 3 }),
            "invalid decision: neuron 2 has 3 rules chosen (at most 1 allowed)"
        );
        assert_eq!(
            format!(
                "{}",
                StepError::DimensionMismatch {
                    vector: "decision",
                    expected: 4,
                    actual: 5
                }
            ),
            "dimension mismatch: decision has length 5, expected 4"
        );
        assert_eq!(
            format!("{}", StepError::AllocationFailure { len: 9 }),
            "allocation error: could not reserve scratch buffer of 9 elements"
        );
        assert_eq!(
            format!("{}", StepError::SpikeOverflow { neuron: 1 }),
            "spike count overflow at neuron 1"
        );
    }

    #[test]
    fn check_len_reports_vector_name() {
        assert!(check_len("delays", 3, 3).is_ok());
        assert_eq!(
            check_len("delays", 3, 2),
            Err(StepError::DimensionMismatch {
                vector: "delays",
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn scratch_has_capacity() {
        let buf: Vec<bool> = scratch(16).unwrap();
        assert!(buf.is_empty());
        assert!(buf.capacity() >= 16);
    }
}

//! Transition batches consumed by the target builder.
use crate::error::PalError;
use tch::Tensor;

/// Discount factor source, either shared or per transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Discount {
    /// One discount factor for the whole batch.
    Scalar(f64),

    /// One discount factor per transition.
    PerTransition(Vec<f32>),
}

impl Discount {
    /// Expands the discount into a `[batch_size]` float tensor.
    pub fn to_tensor(&self, batch_size: usize) -> Result<Tensor, PalError> {
        match self {
            Self::Scalar(gamma) => {
                Ok(Tensor::from_slice(&vec![*gamma as f32; batch_size][..]))
            }
            Self::PerTransition(gammas) => {
                if gammas.len() != batch_size {
                    return Err(PalError::DiscountLengthMismatch {
                        len: gammas.len(),
                        expected: batch_size,
                    });
                }
                Ok(Tensor::from_slice(&gammas[..]))
            }
        }
    }
}

/// Structured observation for a single transition.
///
/// The value network consumes the three fields as separate inputs; keeping
/// them named avoids the silent misalignment that positional tuples invite.
#[derive(Debug)]
pub struct MultiAgentObs {
    /// Per-agent observations, stacked along the estimator axis.
    pub agent_obs: Tensor,

    /// State shared by every agent in the transition.
    pub global_state: Tensor,

    /// Identifies each agent within the shared state.
    pub agent_ids: Tensor,
}

/// A batch of transitions, read-only to this crate.
///
/// `I` is the per-transition state representation consumed by the value
/// network; `C` is the recurrent carry state and defaults to `()` for
/// feedforward networks. All parallel sequences share the batch length B;
/// [`check_lengths`](Self::check_lengths) enforces this before any network
/// query.
///
/// `action[i]` holds one `i64` action index per estimator of transition `i`,
/// aligned positionally with the estimator outputs the network produces for
/// `state[i]`.
pub struct TransitionBatch<I, C = ()> {
    /// States `o_t`, length B.
    pub state: Vec<I>,

    /// Successor states `o_t+1`, length B.
    pub next_state: Vec<I>,

    /// Recorded actions `a_t`, length B, each of shape `[n_estimators]`.
    pub action: Vec<Tensor>,

    /// Rewards `r_t`, length B.
    pub reward: Vec<f32>,

    /// Termination flags (0/1), length B.
    pub is_terminal: Vec<i8>,

    /// Discount factor source.
    pub discount: Discount,

    /// Carried state matching `state`, present in recurrent mode only.
    pub recurrent_state: Option<C>,

    /// Carried state matching `next_state`, present in recurrent mode only.
    pub next_recurrent_state: Option<C>,
}

impl<I, C> TransitionBatch<I, C> {
    /// Returns the batch length B.
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Returns `true` if the batch holds no transitions.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Validates that the batch is non-empty and that every parallel
    /// sequence has the batch length.
    pub fn check_lengths(&self) -> Result<(), PalError> {
        if self.is_empty() {
            return Err(PalError::EmptyBatch);
        }

        let expected = self.state.len();
        let mismatch = |field, len| PalError::BatchLengthMismatch {
            field,
            len,
            expected,
        };

        if self.next_state.len() != expected {
            return Err(mismatch("next_state", self.next_state.len()));
        }
        if self.action.len() != expected {
            return Err(mismatch("action", self.action.len()));
        }
        if self.reward.len() != expected {
            return Err(mismatch("reward", self.reward.len()));
        }
        if self.is_terminal.len() != expected {
            return Err(mismatch("is_terminal", self.is_terminal.len()));
        }
        if let Discount::PerTransition(gammas) = &self.discount {
            if gammas.len() != expected {
                return Err(PalError::DiscountLengthMismatch {
                    len: gammas.len(),
                    expected,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;
    use std::convert::TryFrom;

    fn batch(reward_len: usize) -> TransitionBatch<i32> {
        TransitionBatch {
            state: vec![0, 1],
            next_state: vec![2, 3],
            action: vec![
                Tensor::from_slice(&[0i64]),
                Tensor::from_slice(&[1i64]),
            ],
            reward: vec![0.0; reward_len],
            is_terminal: vec![0, 0],
            discount: Discount::Scalar(0.99),
            recurrent_state: None,
            next_recurrent_state: None,
        }
    }

    #[test]
    fn test_check_lengths() {
        assert!(batch(2).check_lengths().is_ok());
        assert!(batch(3).check_lengths().is_err());
    }

    #[test]
    fn test_rejects_empty_batch() {
        let b = TransitionBatch::<i32> {
            state: vec![],
            next_state: vec![],
            action: vec![],
            reward: vec![],
            is_terminal: vec![],
            discount: Discount::Scalar(0.99),
            recurrent_state: None,
            next_recurrent_state: None,
        };
        assert!(b.is_empty());
        assert!(b.check_lengths().is_err());
    }

    #[test]
    fn test_check_discount_length() {
        let mut b = batch(2);
        b.discount = Discount::PerTransition(vec![0.9]);
        assert!(b.check_lengths().is_err());
        b.discount = Discount::PerTransition(vec![0.9, 0.99]);
        assert!(b.check_lengths().is_ok());
    }

    #[test]
    fn test_discount_to_tensor() -> Result<()> {
        let gamma = Discount::Scalar(0.5).to_tensor(3)?;
        assert_eq!(Vec::<f32>::try_from(&gamma)?, vec![0.5, 0.5, 0.5]);

        let gamma = Discount::PerTransition(vec![0.1, 0.2]).to_tensor(2)?;
        assert_eq!(Vec::<f32>::try_from(&gamma)?, vec![0.1, 0.2]);

        assert!(Discount::PerTransition(vec![0.1]).to_tensor(2).is_err());
        Ok(())
    }
}

//! Action value produced by a dueling architecture.
use super::{ActionValue, DiscreteActionValue};
use anyhow::Result;
use tch::Tensor;

/// Q-values combined from a state-value head and an advantage head.
///
/// Built from a `[n_estimators, 1]` state value and a
/// `[n_estimators, n_actions]` advantage head with the usual mean-advantage
/// correction, then behaves like [`DiscreteActionValue`].
#[derive(Debug)]
pub struct DuelingActionValue {
    inner: DiscreteActionValue,
}

impl DuelingActionValue {
    /// Combines the two heads into Q-values.
    pub fn new(value: Tensor, advantage: Tensor) -> Self {
        debug_assert_eq!(value.size()[0], advantage.size()[0]);
        let q = value + &advantage - advantage.mean_dim(&[-1i64][..], true, tch::Kind::Float);
        Self {
            inner: DiscreteActionValue::new(q),
        }
    }
}

impl ActionValue for DuelingActionValue {
    fn greedy_actions(&self) -> Tensor {
        self.inner.greedy_actions()
    }

    fn evaluate_actions(&self, actions: &Tensor) -> Result<Tensor> {
        self.inner.evaluate_actions(actions)
    }

    fn compute_advantage(&self, actions: &Tensor) -> Result<Tensor> {
        self.inner.compute_advantage(actions)
    }

    fn n_estimators(&self) -> i64 {
        self.inner.n_estimators()
    }
}

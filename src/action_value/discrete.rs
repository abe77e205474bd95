//! Action value backed by a plain Q-matrix.
use super::ActionValue;
use crate::error::PalError;
use anyhow::Result;
use std::convert::TryFrom;
use tch::Tensor;

/// Q-values of discrete actions for one transition.
///
/// Wraps a `[n_estimators, n_actions]` float tensor, one row per estimator.
#[derive(Debug)]
pub struct DiscreteActionValue {
    q: Tensor,
}

impl DiscreteActionValue {
    /// Wraps a `[n_estimators, n_actions]` Q-matrix.
    ///
    /// Panics if `q` is not two-dimensional.
    pub fn new(q: Tensor) -> Self {
        assert_eq!(
            q.dim(),
            2,
            "expected a [n_estimators, n_actions] Q-matrix, got shape {:?}",
            q.size()
        );
        Self { q }
    }

    /// Returns the wrapped Q-matrix.
    pub fn q(&self) -> &Tensor {
        &self.q
    }

    fn check_actions(&self, actions: &Tensor) -> Result<()> {
        let n_estimators = self.n_estimators();
        if actions.size() != [n_estimators] {
            return Err(PalError::EstimatorCountMismatch {
                expected: n_estimators,
                got: actions.numel() as i64,
            }
            .into());
        }

        if n_estimators > 0 {
            let n_actions = self.q.size()[1];
            let min = i64::try_from(actions.min())?;
            let max = i64::try_from(actions.max())?;
            if min < 0 || max >= n_actions {
                let action = if min < 0 { min } else { max };
                return Err(PalError::ActionOutOfRange { action, n_actions }.into());
            }
        }

        Ok(())
    }
}

impl ActionValue for DiscreteActionValue {
    fn greedy_actions(&self) -> Tensor {
        self.q.argmax(-1, false)
    }

    fn evaluate_actions(&self, actions: &Tensor) -> Result<Tensor> {
        self.check_actions(actions)?;
        Ok(self
            .q
            .gather(-1, &actions.unsqueeze(-1), false)
            .squeeze_dim(-1))
    }

    fn compute_advantage(&self, actions: &Tensor) -> Result<Tensor> {
        let q = self.evaluate_actions(actions)?;
        let (v, _) = self.q.max_dim(-1, false);
        Ok(q - v)
    }

    fn n_estimators(&self) -> i64 {
        self.q.size()[0]
    }
}

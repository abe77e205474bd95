//! Interface of action values.
use anyhow::Result;
use tch::Tensor;

/// Action values of a single transition, covering every estimator attached
/// to that transition.
///
/// A transition may carry several independent sub-estimates (one per agent
/// or value head). An implementor holds one row per estimator; the methods
/// below act on all rows at once and return one value per estimator.
///
/// These are exactly the three capabilities [`DoublePal`] consumes:
/// evaluating a recorded action, reporting the greedy action, and computing
/// an advantage gap.
///
/// [`DoublePal`]: crate::DoublePal
pub trait ActionValue {
    /// Greedy action per estimator, shape `[n_estimators]`, `i64`.
    fn greedy_actions(&self) -> Tensor;

    /// Q-value of the given action per estimator, shape `[n_estimators]`.
    ///
    /// `actions` must hold one `i64` action index per estimator, aligned
    /// positionally. Fails if the counts differ or an index falls outside
    /// the action space.
    fn evaluate_actions(&self, actions: &Tensor) -> Result<Tensor>;

    /// Advantage `Q(s, a) - max_a' Q(s, a')` of the given action per
    /// estimator, shape `[n_estimators]`.
    ///
    /// Non-positive for exact estimates. Same failure modes as
    /// [`evaluate_actions`](Self::evaluate_actions).
    fn compute_advantage(&self, actions: &Tensor) -> Result<Tensor>;

    /// Size of the estimator dimension.
    fn n_estimators(&self) -> i64;
}

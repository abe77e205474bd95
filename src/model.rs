//! Seam between the target builder and the value network.
use crate::action_value::ActionValue;

/// An action-value network.
///
/// The online and target networks are two values of the same implementing
/// type, owned by the caller. This crate only ever calls
/// [`forward`](Self::forward); parameter updates and target synchronization
/// happen outside.
pub trait QFunction {
    /// Structured state of a single transition.
    type Input;

    /// Action value covering the transition's estimator dimension.
    type Output: ActionValue;

    /// Evaluates the network on one transition's state.
    fn forward(&self, input: &Self::Input) -> Self::Output;
}

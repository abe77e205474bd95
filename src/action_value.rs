//! Action values with an estimator dimension.
mod base;
mod discrete;
mod dueling;
pub use base::ActionValue;
pub use discrete::DiscreteActionValue;
pub use dueling::DuelingActionValue;

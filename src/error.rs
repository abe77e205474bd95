//! Errors in target computation.
use thiserror::Error;

/// Errors raised while building Double PAL targets.
///
/// All of these are precondition or integration errors to be fixed upstream;
/// nothing in this crate is retried.
#[derive(Error, Debug)]
pub enum PalError {
    /// The batch holds no transitions, so there is nothing to compute.
    #[error("batch is empty")]
    EmptyBatch,

    /// A parallel batch sequence does not have the batch length.
    #[error("batch field `{field}` has length {len}, expected {expected}")]
    BatchLengthMismatch {
        /// Name of the offending field.
        field: &'static str,
        /// Observed length.
        len: usize,
        /// Expected length, taken from `state`.
        expected: usize,
    },

    /// A transition carries no estimator outputs, so the mean is undefined.
    #[error("transition {transition} has an empty estimator dimension")]
    EmptyEstimatorDim {
        /// Index of the offending transition.
        transition: usize,
    },

    /// The number of recorded actions differs from the estimator count.
    #[error("got {got} actions for {expected} estimators")]
    EstimatorCountMismatch {
        /// Estimator count reported by the action value.
        expected: i64,
        /// Number of actions supplied.
        got: i64,
    },

    /// An action index does not exist in the estimator's action space.
    #[error("action index {action} out of range for {n_actions} actions")]
    ActionOutOfRange {
        /// The offending action index.
        action: i64,
        /// Size of the action space.
        n_actions: i64,
    },

    /// The per-transition discount sequence does not have the batch length.
    #[error("discount sequence has length {len}, expected {expected}")]
    DiscountLengthMismatch {
        /// Observed length.
        len: usize,
        /// Expected length.
        expected: usize,
    },

    /// The persistent-advantage mixing weight must be non-negative.
    #[error("alpha must be non-negative, got {0}")]
    NegativeAlpha(f64),

    /// A recurrent batch is missing its carried state.
    #[error("recurrent mode requires `recurrent_state` and `next_recurrent_state`")]
    MissingRecurrentState,

    /// Recurrent mode was requested without a sequence packer.
    #[error("recurrent mode requires a sequence packer")]
    MissingSequencePacker,

    /// A sequence packer returned a different number of outputs than states.
    #[error("sequence packer returned {got} outputs for {expected} states")]
    PackerOutputMismatch {
        /// Number of states passed to the packer.
        expected: usize,
        /// Number of outputs returned.
        got: usize,
    },
}

//! Seam for stateful value networks.
use crate::{error::PalError, model::QFunction};
use anyhow::Result;

/// Evaluates a stateful network over an ordered sequence of states.
///
/// The packer owns the details of packing the sequence for the network; this
/// crate treats it as an opaque batched sequence evaluator. The carried
/// state belongs to the caller and is threaded through unmodified: it is
/// consumed for the duration of one call and the updated carry is handed
/// back.
pub trait SequencePacker<Q: QFunction> {
    /// Recurrent state carried across the sequence, owned by the caller.
    type Carry;

    /// Runs `model` over `states`, threading `carry` through, and returns
    /// the per-timestep outputs together with the updated carry.
    fn pack_and_forward(
        &self,
        model: &Q,
        states: &[Q::Input],
        carry: &Self::Carry,
    ) -> Result<(Vec<Q::Output>, Self::Carry)>;
}

/// Placeholder packer for the non-recurrent mode.
///
/// [`DoublePal::new`](crate::DoublePal::new) uses this type so that callers
/// of feedforward networks never name a packer. It is never invoked when
/// `recurrent` is off; invoking it is a configuration error.
pub struct NullPacker;

impl<Q: QFunction> SequencePacker<Q> for NullPacker {
    type Carry = ();

    fn pack_and_forward(
        &self,
        _model: &Q,
        _states: &[Q::Input],
        _carry: &(),
    ) -> Result<(Vec<Q::Output>, ())> {
        Err(PalError::MissingSequencePacker.into())
    }
}

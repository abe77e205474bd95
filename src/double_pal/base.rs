//! Double PAL target builder.
use super::DoublePalConfig;
use crate::{
    action_value::ActionValue,
    batch::TransitionBatch,
    error::PalError,
    model::QFunction,
    recurrent::{NullPacker, SequencePacker},
};
use anyhow::Result;
use log::trace;
use std::marker::PhantomData;
use tch::{no_grad, Kind, Tensor};

/// Builds Double PAL training targets for a transition batch.
///
/// One call per training step: [`compute`](Self::compute) returns the
/// gradient-carrying current value estimate and the detached Double-PAL
/// target, both `[batch_size]` float tensors. The online network selects the
/// greedy bootstrap action, the target network evaluates it, and the Bellman
/// backup is corrected with `alpha * max(cur_advantage, next_advantage)`.
///
/// The builder keeps no state across calls; the networks and, in recurrent
/// mode, the carried state belong to the caller.
pub struct DoublePal<Q, P = NullPacker> {
    alpha: f64,
    recurrent: bool,
    device: tch::Device,
    packer: Option<P>,
    phantom: PhantomData<Q>,
}

/// Reduces per-estimator values to one scalar per transition.
///
/// Each element of `values` holds one value per estimator of that
/// transition; transitions may differ in estimator count. An empty estimator
/// dimension has no mean and is rejected.
fn average_estimates(values: &[Tensor]) -> Result<Tensor> {
    let mut averaged = Vec::with_capacity(values.len());
    for (transition, v) in values.iter().enumerate() {
        if v.numel() == 0 {
            return Err(PalError::EmptyEstimatorDim { transition }.into());
        }
        averaged.push(v.mean(Kind::Float));
    }
    Ok(Tensor::stack(&averaged, 0))
}

impl<Q> DoublePal<Q, NullPacker>
where
    Q: QFunction,
{
    /// Constructs the builder for a feedforward value network.
    pub fn new(config: DoublePalConfig) -> Result<Self> {
        if config.recurrent {
            return Err(PalError::MissingSequencePacker.into());
        }
        Self::build(config, None)
    }
}

impl<Q, P> DoublePal<Q, P>
where
    Q: QFunction,
    P: SequencePacker<Q>,
{
    /// Constructs the builder for a stateful value network.
    ///
    /// Batches must then carry `recurrent_state` and `next_recurrent_state`.
    pub fn with_packer(config: DoublePalConfig, packer: P) -> Result<Self> {
        Self::build(config, Some(packer))
    }

    fn build(config: DoublePalConfig, packer: Option<P>) -> Result<Self> {
        if config.alpha < 0.0 {
            return Err(PalError::NegativeAlpha(config.alpha).into());
        }

        Ok(Self {
            alpha: config.alpha,
            recurrent: config.recurrent,
            device: config.device.unwrap_or(crate::Device::Cpu).into(),
            packer,
            phantom: PhantomData,
        })
    }

    /// Evaluates `model` on every state of the batch.
    ///
    /// Feedforward mode queries each transition independently; recurrent
    /// mode delegates the whole sequence to the packer, dropping the updated
    /// carry since its lifetime ends with this call.
    fn forward_batch(
        &self,
        model: &Q,
        states: &[Q::Input],
        carry: &Option<P::Carry>,
    ) -> Result<Vec<Q::Output>> {
        if self.recurrent {
            let packer = self
                .packer
                .as_ref()
                .ok_or(PalError::MissingSequencePacker)?;
            let carry = carry.as_ref().ok_or(PalError::MissingRecurrentState)?;
            let (out, _) = packer.pack_and_forward(model, states, carry)?;
            if out.len() != states.len() {
                return Err(PalError::PackerOutputMismatch {
                    expected: states.len(),
                    got: out.len(),
                }
                .into());
            }
            Ok(out)
        } else {
            Ok(states.iter().map(|s| model.forward(s)).collect())
        }
    }

    /// Computes the current value estimate and the Double-PAL target.
    ///
    /// Returns `(current_value, target_value)`, both `[batch_size]` float
    /// tensors. `current_value` carries gradients through `qnet`; the target
    /// is computed without gradient tracking.
    pub fn compute(
        &self,
        qnet: &Q,
        qnet_tgt: &Q,
        batch: &TransitionBatch<Q::Input, P::Carry>,
    ) -> Result<(Tensor, Tensor)> {
        trace!("DoublePal::compute()");
        batch.check_lengths()?;
        let batch_size = batch.len();

        // Q(s, a) with a from the minibatch, averaged over estimators.
        let qout = self.forward_batch(qnet, &batch.state, &batch.recurrent_state)?;
        let mut batch_q = Vec::with_capacity(batch_size);
        for (q, actions) in qout.iter().zip(&batch.action) {
            batch_q.push(q.evaluate_actions(actions)?);
        }
        let batch_q = average_estimates(&batch_q)?;

        // Compute target values
        let tpal_q = no_grad(|| -> Result<Tensor> {
            let next_qout =
                self.forward_batch(qnet, &batch.next_state, &batch.next_recurrent_state)?;
            let target_qout =
                self.forward_batch(qnet_tgt, &batch.state, &batch.recurrent_state)?;
            let target_next_qout =
                self.forward_batch(qnet_tgt, &batch.next_state, &batch.next_recurrent_state)?;

            // Double estimator: the online network selects the greedy
            // action, the target network evaluates it.
            let mut next_q = Vec::with_capacity(batch_size);
            for (tgt, online) in target_next_qout.iter().zip(&next_qout) {
                next_q.push(tgt.evaluate_actions(&online.greedy_actions())?);
            }
            let next_q_max = average_estimates(&next_q)?.to(self.device);
            trace!("next_q_max: {:?}", next_q_max.size());

            let reward = Tensor::from_slice(&batch.reward[..]).to(self.device);
            let is_terminal = Tensor::from_slice(&batch.is_terminal[..]).to(self.device);
            let discount = batch.discount.to_tensor(batch_size)?.to(self.device);

            // T Q: Bellman operator
            let t_q = reward + discount * (1 - is_terminal) * next_q_max;

            // T_PAL Q: persistent advantage learning operator. Both
            // advantage gaps use the recorded action and the target network.
            let mut cur_advantage = Vec::with_capacity(batch_size);
            let mut next_advantage = Vec::with_capacity(batch_size);
            for ((qt_cur, qt_next), actions) in
                target_qout.iter().zip(&target_next_qout).zip(&batch.action)
            {
                cur_advantage.push(qt_cur.compute_advantage(actions)?);
                next_advantage.push(qt_next.compute_advantage(actions)?);
            }
            let cur_advantage = average_estimates(&cur_advantage)?.to(self.device);
            let next_advantage = average_estimates(&next_advantage)?.to(self.device);

            Ok(t_q + self.alpha * cur_advantage.maximum(&next_advantage))
        })?;

        Ok((batch_q, tpal_q))
    }
}

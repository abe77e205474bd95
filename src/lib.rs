#![warn(missing_docs)]
//! Batched target computation for Double Persistent Advantage Learning
//! (Double PAL), implemented with [tch](https://crates.io/crates/tch).
//!
//! For each sampled transition the [`DoublePal`] builder produces the
//! gradient-carrying current action-value estimate and the detached
//! Double-PAL target consumed by an external optimizer. Action selection for
//! the bootstrap term comes from the online network while evaluation comes
//! from the frozen target network, and the Bellman backup is corrected with
//! the larger of the current- and next-state advantage gaps.
//!
//! Each transition may carry several independent sub-estimates (multiple
//! agents or value heads sharing the transition). Per-estimator values are
//! averaged into one scalar per transition before the Bellman formula is
//! applied.
//!
//! The action-value network itself, the target-network update schedule, the
//! replay buffer and the optimizer are external collaborators. They connect
//! through the [`QFunction`], [`ActionValue`] and [`SequencePacker`] seams.
pub mod action_value;
pub mod batch;
pub mod double_pal;
pub mod error;
pub mod model;
pub mod recurrent;

use serde::{Deserialize, Serialize};

pub use action_value::{ActionValue, DiscreteActionValue, DuelingActionValue};
pub use batch::{Discount, MultiAgentObs, TransitionBatch};
pub use double_pal::{DoublePal, DoublePalConfig};
pub use error::PalError;
pub use model::QFunction;
pub use recurrent::{NullPacker, SequencePacker};

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
/// Device on which batch-level tensors are created.
///
/// This enum is added because [`tch::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// The main GPU device.
    Cuda(usize),
}

impl From<tch::Device> for Device {
    fn from(device: tch::Device) -> Self {
        match device {
            tch::Device::Cpu => Self::Cpu,
            tch::Device::Cuda(n) => Self::Cuda(n),
            _ => unimplemented!(),
        }
    }
}

impl From<Device> for tch::Device {
    fn from(device: Device) -> Self {
        match device {
            Device::Cpu => tch::Device::Cpu,
            Device::Cuda(n) => tch::Device::Cuda(n),
        }
    }
}

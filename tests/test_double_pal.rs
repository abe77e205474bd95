use anyhow::Result;
use double_pal::{
    DiscreteActionValue, Discount, DoublePal, DoublePalConfig, MultiAgentObs, QFunction,
    TransitionBatch,
};
use std::convert::TryFrom;
use tch::{nn, nn::Module, Device, Kind, Tensor};

const N_AGENTS: i64 = 2;
const OBS_DIM: i64 = 4;
const GLOBAL_DIM: i64 = 3;
const N_ACTIONS: i64 = 3;

/// Q-network over [`MultiAgentObs`]: each agent sees its own observation,
/// the global state and its id.
struct MlpQ {
    seq: nn::Sequential,
}

impl MlpQ {
    fn new(vs: &nn::VarStore) -> Self {
        let p = &vs.root();
        let in_dim = OBS_DIM + GLOBAL_DIM + 1;
        let seq = nn::seq()
            .add(nn::linear(p / "l1", in_dim, 16, Default::default()))
            .add_fn(|x| x.relu())
            .add(nn::linear(p / "l2", 16, N_ACTIONS, Default::default()));
        Self { seq }
    }
}

impl QFunction for MlpQ {
    type Input = MultiAgentObs;
    type Output = DiscreteActionValue;

    fn forward(&self, input: &MultiAgentObs) -> DiscreteActionValue {
        let n_agents = input.agent_obs.size()[0];
        let global = input
            .global_state
            .unsqueeze(0)
            .expand(&[n_agents, -1], true);
        let ids = input.agent_ids.unsqueeze(-1).to_kind(Kind::Float);
        let x = Tensor::cat(&[&input.agent_obs, &global, &ids], -1);
        DiscreteActionValue::new(self.seq.forward(&x))
    }
}

fn obs() -> MultiAgentObs {
    MultiAgentObs {
        agent_obs: Tensor::randn(&[N_AGENTS, OBS_DIM], tch::kind::FLOAT_CPU),
        global_state: Tensor::randn(&[GLOBAL_DIM], tch::kind::FLOAT_CPU),
        agent_ids: Tensor::from_slice(&[0i64, 1]),
    }
}

fn batch(batch_size: usize) -> TransitionBatch<MultiAgentObs> {
    TransitionBatch {
        state: (0..batch_size).map(|_| obs()).collect(),
        next_state: (0..batch_size).map(|_| obs()).collect(),
        action: (0..batch_size)
            .map(|_| Tensor::from_slice(&[0i64, 2]))
            .collect(),
        reward: (0..batch_size).map(|i| i as f32).collect(),
        is_terminal: (0..batch_size).map(|i| (i % 2) as i8).collect(),
        discount: Discount::Scalar(0.99),
        recurrent_state: None,
        next_recurrent_state: None,
    }
}

#[test]
fn test_gradient_flows_through_current_value_only() -> Result<()> {
    let _ = env_logger::try_init();
    tch::manual_seed(42);

    let vs = nn::VarStore::new(Device::Cpu);
    let qnet = MlpQ::new(&vs);
    let vs_tgt = nn::VarStore::new(Device::Cpu);
    let qnet_tgt = MlpQ::new(&vs_tgt);

    let pal = DoublePal::new(DoublePalConfig::default().alpha(0.9))?;
    let (q, tpal_q) = pal.compute(&qnet, &qnet_tgt, &batch(4))?;

    assert_eq!(q.size(), [4]);
    assert_eq!(tpal_q.size(), [4]);
    assert!(q.requires_grad());
    assert!(!tpal_q.requires_grad());

    // The usual consumer: a TD loss between the two outputs.
    let loss = (&q - &tpal_q).square().mean(Kind::Float);
    loss.backward();
    assert!(vs.trainable_variables().iter().any(|v| v.grad().defined()));

    Ok(())
}

#[test]
fn test_repeated_calls_are_identical() -> Result<()> {
    tch::manual_seed(7);

    let vs = nn::VarStore::new(Device::Cpu);
    let qnet = MlpQ::new(&vs);
    let vs_tgt = nn::VarStore::new(Device::Cpu);
    let qnet_tgt = MlpQ::new(&vs_tgt);

    let pal = DoublePal::new(DoublePalConfig::default())?;
    let batch = batch(3);
    let (q0, t0) = pal.compute(&qnet, &qnet_tgt, &batch)?;
    let (q1, t1) = pal.compute(&qnet, &qnet_tgt, &batch)?;

    assert_eq!(Vec::<f32>::try_from(&q0)?, Vec::<f32>::try_from(&q1)?);
    assert_eq!(Vec::<f32>::try_from(&t0)?, Vec::<f32>::try_from(&t1)?);
    Ok(())
}

//! libtorch-backed action-value network for the DQN trainer.

use std::path::Path;

use blackjack_dqn::{DqnError, ModelConfig, QValueModel, Result};
use tch::nn::{self, Module, OptimizerConfig};
use tch::{Device, Kind, TchError, Tensor};

fn model_err(e: TchError) -> DqnError {
    DqnError::Model(e.to_string())
}

/// Multi-layer perceptron `state -> hidden (ReLU) ... -> one value per action`.
///
/// Each network owns its own `VarStore` and Adam optimiser, so two instances
/// never share parameters.
pub struct QNetwork {
    vs: nn::VarStore,
    net: nn::Sequential,
    opt: nn::Optimizer,
    state_size: usize,
    num_actions: usize,
}

impl QNetwork {
    pub fn new(
        state_size: usize,
        num_actions: usize,
        model: &ModelConfig,
        learning_rate: f64,
        device: Device,
    ) -> Result<Self> {
        let vs = nn::VarStore::new(device);
        let net = build_mlp(&vs.root(), state_size as i64, &model.hidden_units, num_actions as i64);
        let opt = nn::Adam::default().build(&vs, learning_rate).map_err(model_err)?;

        Ok(Self {
            vs,
            net,
            opt,
            state_size,
            num_actions,
        })
    }

    /// Overwrite the parameters with a snapshot written by [`QValueModel::save`].
    /// The snapshot must come from a network of the same shape.
    pub fn load_weights<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.vs.load(path).map_err(model_err)
    }

    pub fn device(&self) -> Device {
        self.vs.device()
    }

    fn batch_tensor(&self, states: &[&[f32]]) -> Result<Tensor> {
        let mut flat = Vec::with_capacity(states.len() * self.state_size);
        for state in states {
            if state.len() != self.state_size {
                return Err(DqnError::Model(format!(
                    "state width {} does not match network input {}",
                    state.len(),
                    self.state_size
                )));
            }
            flat.extend_from_slice(state);
        }
        Ok(Tensor::from_slice(&flat)
            .view([states.len() as i64, self.state_size as i64])
            .to_device(self.vs.device()))
    }
}

fn build_mlp(root: &nn::Path, input: i64, hidden: &[i64], output: i64) -> nn::Sequential {
    let mut seq = nn::seq();
    let mut width = input;
    for (i, &units) in hidden.iter().enumerate() {
        seq = seq
            .add(nn::linear(root / format!("hidden{i}"), width, units, Default::default()))
            .add_fn(|xs| xs.relu());
        width = units;
    }
    seq.add(nn::linear(root / "output", width, output, Default::default()))
}

impl QValueModel for QNetwork {
    fn state_size(&self) -> usize {
        self.state_size
    }

    fn num_actions(&self) -> usize {
        self.num_actions
    }

    fn predict(&self, states: &[&[f32]]) -> Result<Vec<Vec<f32>>> {
        if states.is_empty() {
            return Ok(Vec::new());
        }
        let input = self.batch_tensor(states)?;
        let output = tch::no_grad(|| self.net.forward(&input))
            .to_kind(Kind::Float)
            .to_device(Device::Cpu)
            .flatten(0, -1);
        let values = Vec::<f32>::try_from(&output).map_err(model_err)?;

        Ok(values
            .chunks(self.num_actions)
            .map(|row| row.to_vec())
            .collect())
    }

    fn train_step(&mut self, states: &[&[f32]], actions: &[usize], targets: &[f32]) -> Result<f32> {
        if states.len() != actions.len() || states.len() != targets.len() {
            return Err(DqnError::Model(format!(
                "batch mismatch: {} states, {} actions, {} targets",
                states.len(),
                actions.len(),
                targets.len()
            )));
        }
        if let Some(&bad) = actions.iter().find(|&&a| a >= self.num_actions) {
            return Err(DqnError::OutputWidth {
                expected: self.num_actions,
                actual: bad + 1,
            });
        }

        let device = self.vs.device();
        let input = self.batch_tensor(states)?;
        let actions: Vec<i64> = actions.iter().map(|&a| a as i64).collect();
        let actions = Tensor::from_slice(&actions).to_device(device);
        let targets = Tensor::from_slice(targets).to_device(device);

        let selected = (self.net.forward(&input)
            * actions.one_hot(self.num_actions as i64).to_kind(Kind::Float))
        .sum_dim_intlist([1i64].as_slice(), false, Kind::Float);
        let loss = (targets - selected).square().sum(Kind::Float);
        let loss_value = loss.f_double_value(&[]).map_err(model_err)?;

        self.opt.backward_step(&loss);
        Ok(loss_value as f32)
    }

    fn copy_parameters_from(&mut self, other: &Self) -> Result<()> {
        self.vs.copy(&other.vs).map_err(model_err)
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.vs.save(path).map_err(model_err)
    }
}

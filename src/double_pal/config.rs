//! Configuration of the Double PAL target builder.
use crate::Device;
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Constructs [`DoublePal`](super::DoublePal).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DoublePalConfig {
    pub(super) alpha: f64,
    #[serde(default)]
    pub(super) recurrent: bool,
    /// Device on which batch-level tensors (reward, termination flags,
    /// discount) are created. Must match the device of the value networks.
    pub device: Option<Device>,
}

impl Default for DoublePalConfig {
    /// Constructs the configuration with default parameters.
    fn default() -> Self {
        Self {
            alpha: 0.9,
            recurrent: false,
            device: None,
        }
    }
}

impl DoublePalConfig {
    /// Sets the persistent-advantage mixing weight.
    pub fn alpha(mut self, v: f64) -> Self {
        self.alpha = v;
        self
    }

    /// Sets whether the value network is stateful.
    pub fn recurrent(mut self, v: bool) -> Self {
        self.recurrent = v;
        self
    }

    /// Sets the device.
    pub fn device(mut self, device: tch::Device) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Loads [`DoublePalConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of Double PAL from {}", path_.to_str().unwrap());
        Ok(b)
    }

    /// Saves [`DoublePalConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of Double PAL into {}", path_.to_str().unwrap());
        Ok(())
    }
}

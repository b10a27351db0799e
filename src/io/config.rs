//! YAML run configuration.
//!
//! ```yaml
//! system:
//!   atoms: [[0.0, 0.0, 0.7], [0.0, 0.0, -0.7]]
//!   charges: [1.0, 1.0]
//! spins: [1, 1]
//! wavefunction:
//!   zeta: 1.0
//!   cusp: 1.0
//! kinetic:
//!   algorithm: stochastic
//!   n_sdgd_dim: 4
//!   method: sdgd
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::hamiltonian::KineticConfig;
use crate::systems::{AtomicSystem, SpinPartition};
use crate::wavefunction::SlaterJastrowParams;

/// Everything needed to build a [`crate::hamiltonian::LocalEnergy`] for the
/// reference wavefunction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub system: AtomicSystem,
    pub spins: SpinPartition,
    #[serde(default)]
    pub wavefunction: SlaterJastrowParams,
    #[serde(default)]
    pub kinetic: KineticConfig,
}

/// Read a [`RunConfig`] from a YAML file.
pub fn read_config<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let config: RunConfig = serde_yaml::from_reader(reader)?;
    debug!("read config {}: {:?}", path.as_ref().display(), config);
    Ok(config)
}

pub fn parse_config(text: &str) -> Result<RunConfig> {
    Ok(serde_yaml::from_str(text)?)
}

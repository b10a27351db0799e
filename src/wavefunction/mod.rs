//! Wavefunction module - the model contract and a reference Slater-Jastrow model.

mod traits;
mod slater_jastrow;

pub use traits::{WaveFunction, SignedLog, Capabilities};
pub use slater_jastrow::{SlaterJastrow, SlaterJastrowParams};

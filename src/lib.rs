//! Local energy evaluation for variational Monte Carlo.
//!
//! The local energy `E_L(x) = V(x) - ½ ∇²ψ(x)/ψ(x)` of a many-electron
//! wavefunction around fixed nuclei, with three interchangeable kinetic
//! energy algorithms: an exact Hessian-diagonal loop, a stochastic
//! Taylor-jet trace estimator, and a single-pass forward Laplacian.

pub mod autodiff;
pub mod error;
pub mod systems;
pub mod wavefunction;
pub mod hamiltonian;
pub mod io;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use systems::{AtomicSystem, SpinPartition, InputFeatures, construct_input_features, potential_energy};
pub use wavefunction::{WaveFunction, SignedLog, Capabilities, SlaterJastrow, SlaterJastrowParams};
pub use hamiltonian::{
    RngKey, DimensionSampler, ProbeMethod, KineticConfig, KineticEstimator, LaplacianTerms, LoopStrategy,
    LocalEnergy, LocalEnergyTerms, make_local_energy,
};
pub use io::{read_config, RunConfig};

#[cfg(test)]
mod tests;

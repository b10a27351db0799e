//! Hamiltonian terms: kinetic energy estimators and the local energy.

pub mod rng;
pub mod sampler;
pub mod kinetic;
pub mod local_energy;

pub use rng::RngKey;
pub use sampler::{DimensionSampler, ProbeMethod, ProbeSet, sample_dimensions, probe_vectors, DEFAULT_SAMPLE_DIMS, DEFAULT_PROBE_VECTORS};
pub use kinetic::{KineticConfig, KineticEstimator, LaplacianTerms, LoopStrategy, exact_loop_laplacian, stochastic_laplacian, forward_laplacian_terms};
pub use local_energy::{LocalEnergy, LocalEnergyTerms, make_local_energy};

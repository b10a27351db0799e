//! Systems module - nuclei, spin partition, pair geometry and Coulomb energy.

mod atomic;
mod features;
mod potential;

pub use atomic::{AtomicSystem, SpinPartition};
pub use features::{InputFeatures, construct_input_features, electron_positions};
pub use potential::{
    potential_electron_electron, potential_electron_nuclear, potential_nuclear_nuclear,
    potential_energy, potential_from_features,
};

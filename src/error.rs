//! Error type shared by the whole crate.

use thiserror::Error;

/// Errors raised while building or running a local energy evaluator.
///
/// Numerical singularities (coincident particles) are not errors: they
/// propagate as IEEE infinities or NaN in the returned energies.
#[derive(Error, Debug)]
pub enum Error {
    /// Atom positions and nuclear charges have different lengths.
    #[error("atomic system has {atoms} positions but {charges} charges")]
    AtomChargeMismatch { atoms: usize, charges: usize },

    /// A nuclear charge is zero or not finite.
    #[error("nuclear charge {charge} of atom {index} must be finite and nonzero")]
    InvalidCharge { index: usize, charge: f64 },

    #[error("unknown kinetic energy algorithm `{0}` (expected exact_loop, stochastic or forward_laplacian)")]
    UnknownAlgorithm(String),

    #[error("unknown probe vector method `{0}` (expected sdgd, normal or unit)")]
    UnknownProbeMethod(String),

    #[error("unknown exact loop strategy `{0}` (expected fold or scan)")]
    UnknownLoopStrategy(String),

    /// More dimensions requested than the configuration has.
    #[error("cannot sample {requested} distinct dimensions out of {dim}")]
    SampleSizeExceedsDimension { requested: usize, dim: usize },

    #[error("probe method `{0}` needs at least one probe vector (n_hte_vec > 0)")]
    NoProbeVectors(String),

    /// The wavefunction cannot be evaluated with the requested algorithm.
    #[error("wavefunction does not support the {0} algorithm")]
    UnsupportedAlgorithm(&'static str),

    /// Configuration length does not match the particle count.
    #[error("configuration has {got} coordinates, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("configuration length {0} is not a multiple of 3")]
    RaggedConfiguration(usize),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

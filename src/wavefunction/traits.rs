//! The wavefunction contract consumed by the local energy.
//!
//! A model is a single function `(params, x) ↦ (sign ψ, ln|ψ|)` written
//! against [`Scalar`]. Evaluating it on a derivative carrier instead of `f64`
//! is how the kinetic energy estimators differentiate it.

use crate::autodiff::Scalar;

/// Sign and log-magnitude of the wavefunction.
#[derive(Clone, Debug)]
pub struct SignedLog<S> {
    pub sign: f64,
    pub log_abs: S,
}

/// What kinds of evaluation a model supports, checked once when a local
/// energy evaluator is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// The model is safe to run on the joint (value, gradient, Laplacian)
    /// carrier.
    pub forward_laplacian: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self { forward_laplacian: true }
    }
}

/// Many-particle wavefunction with externally owned parameters.
pub trait WaveFunction: Sync {
    /// Variational parameters, owned and updated by the caller.
    type Params: Sync;

    /// Evaluate `(sign, ln|ψ|)` at flattened coordinates `x` (length `3N`).
    fn evaluate<S: Scalar>(&self, params: &Self::Params, x: &[S]) -> SignedLog<S>;

    /// `ln|ψ|` alone.
    fn log_abs<S: Scalar>(&self, params: &Self::Params, x: &[S]) -> S {
        self.evaluate(params, x).log_abs
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }
}

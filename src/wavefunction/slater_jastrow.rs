//! Slater-Jastrow reference wavefunction.
//!
//! ψ(r) = Π_i φ(r_i) · exp(Σ_{i<j} u(r_ij)) with
//!
//! - φ(r) = Σ_a exp(-ζ |r - R_a|), a sum of 1s Slater orbitals on all nuclei
//! - u(r) = -F / (2 (1 + r/F)), the Padé-Jastrow pair factor
//!
//! With one nucleus, one electron and ζ = 1 this is the exact hydrogen
//! ground state, whose local energy is -0.5 Ha everywhere.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use crate::autodiff::{distance, sum, Scalar};
use crate::systems::AtomicSystem;
use super::traits::{SignedLog, WaveFunction};

/// Variational parameters of [`SlaterJastrow`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SlaterJastrowParams {
    /// Orbital exponent ζ
    pub zeta: f64,
    /// Jastrow correlation parameter F
    pub cusp: f64,
}

impl Default for SlaterJastrowParams {
    fn default() -> Self {
        Self { zeta: 1.0, cusp: 1.0 }
    }
}

/// Nodeless Slater-Jastrow wavefunction centred on a set of nuclei.
#[derive(Debug, Clone)]
pub struct SlaterJastrow {
    centers: Vec<[f64; 3]>,
}

impl SlaterJastrow {
    pub fn new(system: &AtomicSystem) -> Self {
        Self::from_centers(system.atoms())
    }

    pub fn from_centers(centers: &[Vector3<f64>]) -> Self {
        Self {
            centers: centers.iter().map(|c| [c.x, c.y, c.z]).collect(),
        }
    }

    /// ln φ(r) with the largest orbital factored out of the sum.
    fn log_orbital<S: Scalar>(&self, zeta: f64, r: &[S]) -> S {
        let dists: Vec<S> = self.centers.iter().map(|c| distance(r, c)).collect();
        let shift = dists
            .iter()
            .map(|d| zeta * d.primal())
            .fold(f64::INFINITY, f64::min);
        let orbital = sum(dists.into_iter().map(|d| (-(d * zeta) + shift).exp()));
        orbital.ln() - shift
    }

    fn jastrow<S: Scalar>(&self, cusp: f64, electrons: &[&[S]]) -> S {
        let n = electrons.len();
        sum((0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .map(|(i, j)| {
                let r_ij = pair_distance(electrons[i], electrons[j]);
                -((r_ij / cusp + 1.0) * 2.0).recip() * cusp
            }))
    }
}

fn pair_distance<S: Scalar>(a: &[S], b: &[S]) -> S {
    sum(a.iter().zip(b).map(|(ai, bi)| {
        let d = ai.clone() - bi.clone();
        d.clone() * d
    }))
    .sqrt()
}

impl WaveFunction for SlaterJastrow {
    type Params = SlaterJastrowParams;

    fn evaluate<S: Scalar>(&self, params: &Self::Params, x: &[S]) -> SignedLog<S> {
        let electrons: Vec<&[S]> = x.chunks(3).collect();
        let orbitals = sum(electrons.iter().map(|r| self.log_orbital(params.zeta, r)));
        let log_abs = orbitals + self.jastrow(params.cusp, &electrons);
        SignedLog { sign: 1.0, log_abs }
    }
}

//! Dimension sampling and probe vectors for the stochastic trace estimator.
//!
//! Two families of probes are supported:
//!
//! - `sdgd`: coordinate sampling. `k` distinct coordinates are drawn without
//!   replacement and each contributes the basis vector `e_i` with weight
//!   `D`, so the mean of `D · H_ii` over the sample is an unbiased estimate
//!   of `tr H`. With `k = D` the estimate is exact.
//! - `normal` / `unit`: Hutchinson probes with i.i.d. standard normal or
//!   Rademacher entries, unbiased because `E[v vᵀ] = I`. When only `d < D`
//!   coordinates are sampled the probes live on those coordinates and carry
//!   weight `D / d`.

use std::fmt;
use std::str::FromStr;

use log::trace;
use nalgebra::DVector;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use super::rng::RngKey;

/// Default number of sampled coordinates.
pub const DEFAULT_SAMPLE_DIMS: usize = 16;
/// Default number of Hutchinson probe vectors.
pub const DEFAULT_PROBE_VECTORS: usize = 16;

/// How probe vectors are built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMethod {
    /// Scaled coordinate basis vectors on the sampled dimensions
    #[default]
    Sdgd,
    /// Standard normal Hutchinson vectors
    Normal,
    /// Rademacher (±1) Hutchinson vectors
    Unit,
}

impl ProbeMethod {
    pub fn name(self) -> &'static str {
        match self {
            ProbeMethod::Sdgd => "sdgd",
            ProbeMethod::Normal => "normal",
            ProbeMethod::Unit => "unit",
        }
    }
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProbeMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sdgd" => Ok(ProbeMethod::Sdgd),
            "normal" => Ok(ProbeMethod::Normal),
            "unit" => Ok(ProbeMethod::Unit),
            other => Err(Error::UnknownProbeMethod(other.to_string())),
        }
    }
}

/// Probe directions plus the weight that turns the mean of `vᵀHv` over the
/// directions into an estimate of `tr H`.
#[derive(Clone, Debug)]
pub struct ProbeSet {
    pub directions: Vec<DVector<f64>>,
    pub weight: f64,
}

impl ProbeSet {
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

/// Draw `n_sdgd_dim` distinct coordinates out of `dim`; `0` selects all of
/// them in order.
pub fn sample_dimensions(key: RngKey, dim: usize, n_sdgd_dim: usize) -> Result<Vec<usize>> {
    if n_sdgd_dim == 0 {
        return Ok((0..dim).collect());
    }
    if n_sdgd_dim > dim {
        return Err(Error::SampleSizeExceedsDimension { requested: n_sdgd_dim, dim });
    }
    let mut rng = key.rng();
    Ok(rand::seq::index::sample(&mut rng, dim, n_sdgd_dim).into_vec())
}

/// Build the probe vectors over the coordinates in `idx_set`.
pub fn probe_vectors(
    key: RngKey,
    idx_set: &[usize],
    dim: usize,
    method: ProbeMethod,
    n_hte_vec: usize,
) -> Result<ProbeSet> {
    match method {
        ProbeMethod::Sdgd => {
            let directions = idx_set
                .iter()
                .map(|&i| DVector::from_fn(dim, |j, _| if i == j { 1.0 } else { 0.0 }))
                .collect();
            Ok(ProbeSet { directions, weight: dim as f64 })
        }
        ProbeMethod::Normal | ProbeMethod::Unit => {
            if n_hte_vec == 0 {
                return Err(Error::NoProbeVectors(method.to_string()));
            }
            let d = idx_set.len();
            let weight = if d == 0 { 0.0 } else { dim as f64 / d as f64 };
            let mut rng = key.rng();
            let directions = (0..n_hte_vec)
                .map(|_| {
                    let mut v = DVector::<f64>::zeros(dim);
                    for &i in idx_set {
                        v[i] = match method {
                            ProbeMethod::Normal => rng.sample(StandardNormal),
                            _ => if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
                        };
                    }
                    v
                })
                .collect();
            Ok(ProbeSet { directions, weight })
        }
    }
}

/// Chooses the coordinates and probes of one stochastic Laplacian estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DimensionSampler {
    /// Number of sampled coordinates, `0` for all of them
    pub n_sdgd_dim: usize,
    /// Probe construction
    pub method: ProbeMethod,
    /// Number of Hutchinson vectors (ignored by `sdgd`)
    pub n_hte_vec: usize,
}

impl Default for DimensionSampler {
    fn default() -> Self {
        Self {
            n_sdgd_dim: DEFAULT_SAMPLE_DIMS,
            method: ProbeMethod::Sdgd,
            n_hte_vec: DEFAULT_PROBE_VECTORS,
        }
    }
}

impl DimensionSampler {
    /// Check the settings against a configuration dimension.
    pub fn validate(&self, dim: usize) -> Result<()> {
        if self.n_sdgd_dim > dim {
            return Err(Error::SampleSizeExceedsDimension { requested: self.n_sdgd_dim, dim });
        }
        if self.method != ProbeMethod::Sdgd && self.n_hte_vec == 0 {
            return Err(Error::NoProbeVectors(self.method.to_string()));
        }
        Ok(())
    }

    /// Size of the population probes are drawn from without replacement:
    /// the `dim` coordinates for `sdgd`, none for Hutchinson probes.
    pub fn finite_population(&self, dim: usize) -> Option<usize> {
        match self.method {
            ProbeMethod::Sdgd => Some(dim),
            ProbeMethod::Normal | ProbeMethod::Unit => None,
        }
    }

    /// Index set and probes for one estimate. The key is split so the two
    /// draws never share randomness.
    pub fn sample(&self, key: RngKey, dim: usize) -> Result<ProbeSet> {
        let (idx_key, vec_key) = key.split();
        let idx_set = sample_dimensions(idx_key, dim, self.n_sdgd_dim)?;
        trace!("sampled dimensions {:?}", idx_set);
        probe_vectors(vec_key, &idx_set, dim, self.method, self.n_hte_vec)
    }
}

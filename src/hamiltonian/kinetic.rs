//! Local kinetic energy `-½ ∇²ψ / ψ = -½ (Δ ln|ψ| + |∇ ln|ψ||²)`.
//!
//! Three interchangeable ways to get the Laplacian of `g = ln|ψ|`:
//!
//! - **exact loop**: linearize `∇g` at `x` and read the Hessian diagonal
//!   one basis vector at a time, `O(D)` Hessian-vector products;
//! - **stochastic**: average weighted second-order Taylor coefficients along
//!   randomly chosen probes, `O(k)` jets independent of `D`;
//! - **forward Laplacian**: one pass on the joint (value, gradient,
//!   Laplacian) carrier.
//!
//! The exact methods agree to rounding; the stochastic one agrees in
//! expectation.

use std::fmt;
use std::str::FromStr;

use log::trace;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::autodiff::{forward_laplacian, linearize_grad, taylor2, value_and_grad};
use crate::error::{Error, Result};
use crate::wavefunction::{Capabilities, WaveFunction};
use super::rng::RngKey;
use super::sampler::DimensionSampler;

/// How the exact loop accumulates the Hessian diagonal.
///
/// Both strategies add the same terms in the same order and return
/// bit-identical sums; they only differ in what they keep in memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopStrategy {
    /// Running sum over `0..n`
    #[default]
    Fold,
    /// Emit every term, then reduce
    Scan,
}

impl LoopStrategy {
    /// `Σ_{i<n} term(i)`
    pub fn reduce<F>(self, n: usize, term: F) -> f64
    where
        F: Fn(usize) -> f64,
    {
        match self {
            LoopStrategy::Fold => (0..n).fold(0.0, |acc, i| acc + term(i)),
            LoopStrategy::Scan => {
                let terms: Vec<f64> = (0..n).map(term).collect();
                terms.iter().fold(0.0, |acc, t| acc + t)
            }
        }
    }
}

impl FromStr for LoopStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fold" => Ok(LoopStrategy::Fold),
            "scan" => Ok(LoopStrategy::Scan),
            other => Err(Error::UnknownLoopStrategy(other.to_string())),
        }
    }
}

/// Kinetic energy algorithm, fixed when the evaluator is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case", deny_unknown_fields)]
pub enum KineticConfig {
    ExactLoop {
        #[serde(default)]
        strategy: LoopStrategy,
    },
    Stochastic(DimensionSampler),
    ForwardLaplacian,
}

impl Default for KineticConfig {
    fn default() -> Self {
        KineticConfig::ForwardLaplacian
    }
}

impl KineticConfig {
    pub fn name(&self) -> &'static str {
        match self {
            KineticConfig::ExactLoop { .. } => "exact_loop",
            KineticConfig::Stochastic(_) => "stochastic",
            KineticConfig::ForwardLaplacian => "forward_laplacian",
        }
    }
}

impl fmt::Display for KineticConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses an algorithm name into its default settings.
impl FromStr for KineticConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "exact_loop" => Ok(KineticConfig::ExactLoop { strategy: LoopStrategy::Fold }),
            "stochastic" => Ok(KineticConfig::Stochastic(DimensionSampler::default())),
            "forward_laplacian" => Ok(KineticConfig::ForwardLaplacian),
            other => Err(Error::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Laplacian and squared gradient norm of `ln|ψ|` at one configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaplacianTerms {
    /// `Δ ln|ψ|`, exact or estimated
    pub laplacian: f64,
    /// `|∇ ln|ψ||²`
    pub grad_norm_sq: f64,
    /// Standard error of a stochastic Laplacian, zero for exact methods
    pub standard_error: f64,
}

impl LaplacianTerms {
    pub fn kinetic(&self) -> f64 {
        -0.5 * (self.laplacian + self.grad_norm_sq)
    }
}

/// Exact Laplacian by a loop over Hessian-vector products with basis vectors.
pub fn exact_loop_laplacian<W: WaveFunction>(
    wf: &W,
    params: &W::Params,
    x: &[f64],
    strategy: LoopStrategy,
) -> LaplacianTerms {
    let n = x.len();
    let grad_f = linearize_grad(|y| wf.log_abs(params, y), x);
    let laplacian = strategy.reduce(n, |i| {
        let mut e = vec![0.0; n];
        e[i] = 1.0;
        grad_f.jvp(&e)[i]
    });
    let grad_norm_sq = grad_f.primal().iter().map(|g| g * g).sum();
    trace!("exact loop ({:?}) laplacian {}", strategy, laplacian);
    LaplacianTerms { laplacian, grad_norm_sq, standard_error: 0.0 }
}

/// Unbiased stochastic Laplacian from Taylor jets along sampled probes.
///
/// The same `key` always selects the same probes, so the estimate is
/// reproducible; different keys give independent estimates.
pub fn stochastic_laplacian<W: WaveFunction>(
    wf: &W,
    params: &W::Params,
    x: &[f64],
    key: RngKey,
    sampler: &DimensionSampler,
) -> Result<LaplacianTerms> {
    let probes = sampler.sample(key, x.len())?;
    let samples: Vec<f64> = probes
        .directions
        .par_iter()
        .map(|v| {
            let jet = taylor2(|y| wf.log_abs(params, y), x, v.as_slice());
            probes.weight * 2.0 * jet.c2
        })
        .collect();

    let (laplacian, standard_error) = mean_and_standard_error(&samples, sampler.finite_population(x.len()));
    let (_, grad) = value_and_grad(|y| wf.log_abs(params, y), x);
    let grad_norm_sq = grad.iter().map(|g| g * g).sum();
    trace!(
        "stochastic ({} probes) laplacian {} ± {}",
        samples.len(),
        laplacian,
        standard_error
    );
    Ok(LaplacianTerms { laplacian, grad_norm_sq, standard_error })
}

/// Exact Laplacian from a single augmented forward pass.
pub fn forward_laplacian_terms<W: WaveFunction>(
    wf: &W,
    params: &W::Params,
    x: &[f64],
) -> LaplacianTerms {
    let out = forward_laplacian(|y| wf.log_abs(params, y), x);
    trace!("forward laplacian {}", out.lap);
    LaplacianTerms {
        laplacian: out.lap,
        grad_norm_sq: out.grad_norm_sq(),
        standard_error: 0.0,
    }
}

/// Sample mean and its standard error. Draws without replacement from a
/// population of `population` items get the finite population correction.
fn mean_and_standard_error(samples: &[f64], population: Option<usize>) -> (f64, f64) {
    if samples.is_empty() {
        return (0.0, 0.0);
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    if samples.len() < 2 {
        return (mean, 0.0);
    }
    let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let correction = match population {
        Some(total) => (1.0 - n / total as f64).max(0.0),
        None => 1.0,
    };
    (mean, (correction * var / n).sqrt())
}

/// A validated kinetic energy algorithm for configurations of one dimension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KineticEstimator {
    config: KineticConfig,
    dim: usize,
}

impl KineticEstimator {
    /// Check `config` against the model's capabilities and the configuration
    /// dimension.
    pub fn new(config: KineticConfig, capabilities: Capabilities, dim: usize) -> Result<Self> {
        match &config {
            KineticConfig::ForwardLaplacian if !capabilities.forward_laplacian => {
                return Err(Error::UnsupportedAlgorithm("forward_laplacian"));
            }
            KineticConfig::Stochastic(sampler) => sampler.validate(dim)?,
            _ => {}
        }
        Ok(Self { config, dim })
    }

    pub fn config(&self) -> &KineticConfig {
        &self.config
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Laplacian terms at `x`; `key` is only consumed by the stochastic path.
    pub fn laplacian_terms<W: WaveFunction>(
        &self,
        wf: &W,
        params: &W::Params,
        x: &[f64],
        key: RngKey,
    ) -> Result<LaplacianTerms> {
        if x.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, got: x.len() });
        }
        match &self.config {
            KineticConfig::ExactLoop { strategy } => Ok(exact_loop_laplacian(wf, params, x, *strategy)),
            KineticConfig::Stochastic(sampler) => stochastic_laplacian(wf, params, x, key, sampler),
            KineticConfig::ForwardLaplacian => Ok(forward_laplacian_terms(wf, params, x)),
        }
    }

    pub fn kinetic_energy<W: WaveFunction>(
        &self,
        wf: &W,
        params: &W::Params,
        x: &[f64],
        key: RngKey,
    ) -> Result<f64> {
        Ok(self.laplacian_terms(wf, params, x, key)?.kinetic())
    }
}

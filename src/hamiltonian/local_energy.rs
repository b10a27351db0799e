//! Local energy `E_L(x) = V(x) - ½ ∇²ψ(x) / ψ(x)`.

use log::debug;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::systems::{construct_input_features, potential_from_features, AtomicSystem, SpinPartition};
use crate::wavefunction::WaveFunction;
use super::kinetic::{KineticConfig, KineticEstimator};
use super::rng::RngKey;

/// Potential and kinetic contributions at one configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalEnergyTerms {
    pub potential: f64,
    pub kinetic: f64,
}

impl LocalEnergyTerms {
    pub fn total(&self) -> f64 {
        self.potential + self.kinetic
    }
}

/// Local energy evaluator bound to a wavefunction, a system and an algorithm.
///
/// All checks happen in [`LocalEnergy::new`]; evaluation is pure and can be
/// shared across threads.
pub struct LocalEnergy<W: WaveFunction> {
    wavefunction: W,
    system: AtomicSystem,
    spins: SpinPartition,
    estimator: KineticEstimator,
}

impl<W: WaveFunction> LocalEnergy<W> {
    pub fn new(
        wavefunction: W,
        system: AtomicSystem,
        spins: SpinPartition,
        config: KineticConfig,
    ) -> Result<Self> {
        let estimator = KineticEstimator::new(config, wavefunction.capabilities(), spins.dim())?;
        debug!(
            "local energy: {} atoms, spins {:?}, algorithm {}",
            system.num_atoms(),
            spins.counts(),
            config
        );
        Ok(Self { wavefunction, system, spins, estimator })
    }

    pub fn wavefunction(&self) -> &W {
        &self.wavefunction
    }

    pub fn system(&self) -> &AtomicSystem {
        &self.system
    }

    pub fn spins(&self) -> &SpinPartition {
        &self.spins
    }

    pub fn config(&self) -> &KineticConfig {
        self.estimator.config()
    }

    /// Potential and kinetic energy at `x`. `key` is ignored unless the
    /// algorithm is stochastic.
    pub fn evaluate_terms(&self, params: &W::Params, key: RngKey, x: &[f64]) -> Result<LocalEnergyTerms> {
        if x.len() != self.spins.dim() {
            return Err(Error::DimensionMismatch { expected: self.spins.dim(), got: x.len() });
        }
        let features = construct_input_features(x, self.system.atoms())?;
        let potential = potential_from_features(&features, &self.system);
        let kinetic = self.estimator.kinetic_energy(&self.wavefunction, params, x, key)?;
        Ok(LocalEnergyTerms { potential, kinetic })
    }

    pub fn evaluate(&self, params: &W::Params, key: RngKey, x: &[f64]) -> Result<f64> {
        Ok(self.evaluate_terms(params, key, x)?.total())
    }

    /// Evaluate many configurations in parallel. Configuration `i` receives
    /// the `i`-th child of `key`, so the result does not depend on scheduling.
    pub fn evaluate_batch(
        &self,
        params: &W::Params,
        key: RngKey,
        configurations: &[Vec<f64>],
    ) -> Result<Vec<LocalEnergyTerms>> {
        let keys = key.split_n(configurations.len());
        configurations
            .par_iter()
            .zip(keys)
            .map(|(x, k)| self.evaluate_terms(params, k, x))
            .collect()
    }
}

/// Build the local energy as a plain function of `(params, key, x)`.
pub fn make_local_energy<W: WaveFunction>(
    wavefunction: W,
    system: AtomicSystem,
    spins: SpinPartition,
    config: KineticConfig,
) -> Result<impl Fn(&W::Params, RngKey, &[f64]) -> Result<f64>> {
    let local_energy = LocalEnergy::new(wavefunction, system, spins, config)?;
    Ok(move |params: &W::Params, key: RngKey, x: &[f64]| local_energy.evaluate(params, key, x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hamiltonian::kinetic::LoopStrategy;
    use crate::wavefunction::{SlaterJastrow, SlaterJastrowParams};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn helium_like() -> (SlaterJastrow, AtomicSystem, SpinPartition) {
        let system = AtomicSystem::single_atom(2.0).unwrap();
        (SlaterJastrow::new(&system), system, SpinPartition::new(vec![1, 1]))
    }

    const X: [f64; 6] = [0.4, -0.2, 0.3, -0.5, 0.1, 0.6];

    #[test]
    fn test_terms_add_up() {
        let (wf, system, spins) = helium_like();
        let le = LocalEnergy::new(wf, system, spins, KineticConfig::ForwardLaplacian).unwrap();
        let params = SlaterJastrowParams { zeta: 1.7, cusp: 1.0 };
        let terms = le.evaluate_terms(&params, RngKey::new(0), &X).unwrap();
        let total = le.evaluate(&params, RngKey::new(0), &X).unwrap();
        assert_eq!(terms.total(), total);
        assert!(terms.potential < 0.0);
    }

    #[test]
    fn test_potential_independent_of_algorithm() {
        let params = SlaterJastrowParams::default();
        let mut potentials = Vec::new();
        for config in [
            KineticConfig::ForwardLaplacian,
            KineticConfig::ExactLoop { strategy: LoopStrategy::Scan },
        ] {
            let (wf, system, spins) = helium_like();
            let le = LocalEnergy::new(wf, system, spins, config).unwrap();
            potentials.push(le.evaluate_terms(&params, RngKey::new(1), &X).unwrap());
        }
        assert_eq!(potentials[0].potential, potentials[1].potential);
        assert_relative_eq!(potentials[0].kinetic, potentials[1].kinetic, epsilon = 1e-10);
    }

    #[test]
    fn test_dimension_checked_per_call() {
        let (wf, system, spins) = helium_like();
        let le = LocalEnergy::new(wf, system, spins, KineticConfig::default()).unwrap();
        let params = SlaterJastrowParams::default();
        assert!(matches!(
            le.evaluate(&params, RngKey::new(0), &X[..3]),
            Err(Error::DimensionMismatch { expected: 6, got: 3 })
        ));
    }

    #[test]
    fn test_factory_matches_evaluator() {
        let system = AtomicSystem::new(
            vec![Vector3::new(0.0, 0.0, 0.7), Vector3::new(0.0, 0.0, -0.7)],
            vec![1.0, 1.0],
        )
        .unwrap();
        let spins = SpinPartition::new(vec![1, 1]);
        let wf = SlaterJastrow::new(&system);
        let params = SlaterJastrowParams::default();

        let f = make_local_energy(wf.clone(), system.clone(), spins.clone(), KineticConfig::default()).unwrap();
        let le = LocalEnergy::new(wf, system, spins, KineticConfig::default()).unwrap();
        assert_eq!(f(&params, RngKey::new(5), &X).unwrap(), le.evaluate(&params, RngKey::new(5), &X).unwrap());
    }
}

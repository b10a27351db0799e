#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use rand_distr::{Distribution, Normal};

    use crate::autodiff::{sum, Scalar};
    use crate::error::Error;
    use crate::hamiltonian::{DimensionSampler, KineticConfig, LocalEnergy, LoopStrategy, ProbeMethod, RngKey};
    use crate::systems::{AtomicSystem, SpinPartition};
    use crate::wavefunction::{Capabilities, SignedLog, SlaterJastrow, SlaterJastrowParams, WaveFunction};

    fn all_algorithms(dim: usize) -> Vec<KineticConfig> {
        vec![
            KineticConfig::ForwardLaplacian,
            KineticConfig::ExactLoop { strategy: LoopStrategy::Fold },
            KineticConfig::ExactLoop { strategy: LoopStrategy::Scan },
            KineticConfig::Stochastic(DimensionSampler { n_sdgd_dim: dim, method: ProbeMethod::Sdgd, n_hte_vec: 0 }),
            KineticConfig::Stochastic(DimensionSampler { n_sdgd_dim: 0, method: ProbeMethod::Sdgd, n_hte_vec: 0 }),
        ]
    }

    fn hydrogen(config: KineticConfig) -> LocalEnergy<SlaterJastrow> {
        let system = AtomicSystem::single_atom(1.0).unwrap();
        let wf = SlaterJastrow::new(&system);
        LocalEnergy::new(wf, system, SpinPartition::new(vec![1, 0]), config).unwrap()
    }

    fn h2_molecule(config: KineticConfig) -> LocalEnergy<SlaterJastrow> {
        let system = AtomicSystem::new(
            vec![Vector3::new(0.0, 0.0, 0.7), Vector3::new(0.0, 0.0, -0.7)],
            vec![1.0, 1.0],
        )
        .unwrap();
        let wf = SlaterJastrow::new(&system);
        LocalEnergy::new(wf, system, SpinPartition::new(vec![1, 1]), config).unwrap()
    }

    #[test]
    fn test_hydrogen_local_energy_at_unit_distance() {
        let params = SlaterJastrowParams::default();
        for config in all_algorithms(3) {
            let le = hydrogen(config);
            let terms = le.evaluate_terms(&params, RngKey::new(0), &[1.0, 0.0, 0.0]).unwrap();
            assert_relative_eq!(terms.potential, -1.0, epsilon = 1e-14);
            assert_relative_eq!(terms.kinetic, 0.5, epsilon = 1e-12);
            assert_relative_eq!(terms.total(), -0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_hydrogen_ground_state_is_an_eigenstate() {
        let params = SlaterJastrowParams::default();
        let le = hydrogen(KineticConfig::ForwardLaplacian);
        let mut rng = RngKey::new(11).rng();
        let dist = Normal::new(0.0, 1.5).unwrap();
        for _ in 0..20 {
            let x: Vec<f64> = (0..3).map(|_| dist.sample(&mut rng)).collect();
            assert_relative_eq!(le.evaluate(&params, RngKey::new(0), &x).unwrap(), -0.5, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_hydrogen_wrong_exponent_is_not_constant() {
        let params = SlaterJastrowParams { zeta: 0.8, cusp: 1.0 };
        let le = hydrogen(KineticConfig::ForwardLaplacian);
        // E_L = -ζ²/2 + (ζ - 1)/r
        for r in [0.5, 1.0, 2.0] {
            let e = le.evaluate(&params, RngKey::new(0), &[0.0, r, 0.0]).unwrap();
            assert_relative_eq!(e, -0.32 - 0.2 / r, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_h2_exact_algorithms_agree() {
        let params = SlaterJastrowParams { zeta: 1.1, cusp: 0.9 };
        let x = [0.2, -0.3, 0.5, -0.4, 0.1, -0.6];
        let reference = h2_molecule(KineticConfig::ForwardLaplacian)
            .evaluate_terms(&params, RngKey::new(0), &x)
            .unwrap();
        for config in all_algorithms(6) {
            let terms = h2_molecule(config).evaluate_terms(&params, RngKey::new(9), &x).unwrap();
            assert_eq!(terms.potential, reference.potential);
            assert_relative_eq!(terms.kinetic, reference.kinetic, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_h2_stochastic_estimate_is_unbiased() {
        let params = SlaterJastrowParams::default();
        let x = [0.2, -0.3, 0.5, -0.4, 0.1, -0.6];
        let exact = h2_molecule(KineticConfig::ForwardLaplacian)
            .evaluate(&params, RngKey::new(0), &x)
            .unwrap();
        let le = h2_molecule(KineticConfig::Stochastic(DimensionSampler {
            n_sdgd_dim: 3,
            method: ProbeMethod::Sdgd,
            n_hte_vec: 0,
        }));
        let n = 4000;
        let batch = vec![x.to_vec(); n];
        let terms = le.evaluate_batch(&params, RngKey::new(21), &batch).unwrap();
        let energies: Vec<f64> = terms.iter().map(|t| t.total()).collect();
        let mean = energies.iter().sum::<f64>() / n as f64;
        let var = energies.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let stderr = (var / n as f64).sqrt();
        assert!(var > 0.0);
        assert!((mean - exact).abs() < 5.0 * stderr + 1e-12);
    }

    #[test]
    fn test_batch_is_reproducible_and_keyed_per_configuration() {
        let params = SlaterJastrowParams::default();
        let le = h2_molecule(KineticConfig::Stochastic(DimensionSampler {
            n_sdgd_dim: 2,
            method: ProbeMethod::Unit,
            n_hte_vec: 3,
        }));
        let configurations: Vec<Vec<f64>> = (0..16)
            .map(|i| {
                let s = i as f64 * 0.1;
                vec![0.1 + s, -0.2, 0.3, -0.4 + s, 0.5, -0.1]
            })
            .collect();
        let key = RngKey::new(2024);
        let a = le.evaluate_batch(&params, key, &configurations).unwrap();
        let b = le.evaluate_batch(&params, key, &configurations).unwrap();
        assert_eq!(a, b);

        let keys = key.split_n(configurations.len());
        for ((x, k), terms) in configurations.iter().zip(keys).zip(&a) {
            assert_eq!(le.evaluate_terms(&params, k, x).unwrap(), *terms);
        }

        // identical configurations with different child keys see different probes
        let same = vec![configurations[0].clone(); 8];
        let c = le.evaluate_batch(&params, key, &same).unwrap();
        assert!(c.iter().any(|t| t.kinetic != c[0].kinetic));
    }

    #[test]
    fn test_batch_propagates_errors() {
        let params = SlaterJastrowParams::default();
        let le = h2_molecule(KineticConfig::ForwardLaplacian);
        let configurations = vec![vec![0.0; 6], vec![0.0; 5]];
        assert!(matches!(
            le.evaluate_batch(&params, RngKey::new(0), &configurations),
            Err(Error::DimensionMismatch { expected: 6, got: 5 })
        ));
    }

    /// ln|ψ| = -Σ x_i², without forward Laplacian support
    struct Gaussian;

    impl WaveFunction for Gaussian {
        type Params = ();

        fn evaluate<S: Scalar>(&self, _: &(), x: &[S]) -> SignedLog<S> {
            SignedLog { sign: 1.0, log_abs: -sum(x.iter().map(|xi| xi.clone() * xi.clone())) }
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities { forward_laplacian: false }
        }
    }

    #[test]
    fn test_capabilities_checked_at_construction() {
        let system = AtomicSystem::single_atom(1.0).unwrap();
        let spins = SpinPartition::new(vec![1]);
        assert!(matches!(
            LocalEnergy::new(Gaussian, system.clone(), spins.clone(), KineticConfig::ForwardLaplacian),
            Err(Error::UnsupportedAlgorithm(_))
        ));
        let le = LocalEnergy::new(Gaussian, system, spins, KineticConfig::ExactLoop { strategy: LoopStrategy::Fold })
            .unwrap();
        // Δg = -6, |∇g|² = 4|x|² = 4
        let terms = le.evaluate_terms(&(), RngKey::new(0), &[1.0, 0.0, 0.0]).unwrap();
        assert_relative_eq!(terms.kinetic, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_stochastic_settings_checked_at_construction() {
        let system = AtomicSystem::single_atom(1.0).unwrap();
        let wf = SlaterJastrow::new(&system);
        let spins = SpinPartition::new(vec![1, 0]);
        assert!(matches!(
            LocalEnergy::new(wf.clone(), system.clone(), spins.clone(), KineticConfig::Stochastic(DimensionSampler::default())),
            Err(Error::SampleSizeExceedsDimension { requested: 16, dim: 3 })
        ));
        assert!(matches!(
            LocalEnergy::new(
                wf,
                system,
                spins,
                KineticConfig::Stochastic(DimensionSampler { n_sdgd_dim: 0, method: ProbeMethod::Normal, n_hte_vec: 0 })
            ),
            Err(Error::NoProbeVectors(_))
        ));
    }

    #[test]
    fn test_coincident_particles_give_non_finite_energy() {
        let params = SlaterJastrowParams::default();
        let le = h2_molecule(KineticConfig::ForwardLaplacian);
        let e = le.evaluate(&params, RngKey::new(0), &[0.0, 0.0, 0.7, 1.0, 1.0, 1.0]).unwrap();
        assert!(!e.is_finite());
    }
}

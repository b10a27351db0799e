//! Coulomb potential energy of a configuration (Hartree atomic units).
//!
//! Pair sums run over the strict upper triangle, so there is no
//! self-interaction and no pair is counted twice. Coincident particles give
//! an infinite energy; keeping configurations away from them is the
//! sampler's job.

use nalgebra::{DMatrix, Vector3};
use super::features::InputFeatures;
use super::atomic::AtomicSystem;

/// Electron-electron repulsion `Σ_{i<j} 1 / r_ij`.
pub fn potential_electron_electron(r_ee: &DMatrix<f64>) -> f64 {
    let n = r_ee.nrows();
    (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .map(|(i, j)| 1.0 / r_ee[(i, j)])
        .sum()
}

/// Electron-nuclear attraction `-Σ_{i,j} Z_j / r_ij`.
pub fn potential_electron_nuclear(charges: &[f64], r_ae: &DMatrix<f64>) -> f64 {
    debug_assert_eq!(charges.len(), r_ae.ncols(), "one charge per atom column");
    -r_ae
        .row_iter()
        .map(|row| {
            row.iter()
                .zip(charges)
                .map(|(r, z)| z / r)
                .sum::<f64>()
        })
        .sum::<f64>()
}

/// Nuclear-nuclear repulsion `Σ_{i<j} Z_i Z_j / |R_i - R_j|`.
pub fn potential_nuclear_nuclear(charges: &[f64], atoms: &[Vector3<f64>]) -> f64 {
    let m = atoms.len();
    (0..m)
        .flat_map(|i| ((i + 1)..m).map(move |j| (i, j)))
        .map(|(i, j)| charges[i] * charges[j] / (atoms[i] - atoms[j]).norm())
        .sum()
}

/// Total potential energy from precomputed distances.
pub fn potential_energy(
    r_ae: &DMatrix<f64>,
    r_ee: &DMatrix<f64>,
    atoms: &[Vector3<f64>],
    charges: &[f64],
) -> f64 {
    potential_electron_electron(r_ee)
        + potential_electron_nuclear(charges, r_ae)
        + potential_nuclear_nuclear(charges, atoms)
}

/// Convenience wrapper taking the features and the system.
pub fn potential_from_features(features: &InputFeatures, system: &AtomicSystem) -> f64 {
    potential_energy(&features.r_ae, &features.r_ee, system.atoms(), system.charges())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::features::construct_input_features;
    use approx::assert_relative_eq;

    fn two_by_two() -> (AtomicSystem, Vec<f64>) {
        // nuclei Z=1 at origin and Z=2 at (0,0,2); electrons at (1,0,0) and (0,0,3)
        let system = AtomicSystem::new(
            vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 2.0)],
            vec![1.0, 2.0],
        )
        .unwrap();
        (system, vec![1.0, 0.0, 0.0, 0.0, 0.0, 3.0])
    }

    #[test]
    fn test_hand_computed_two_electrons_two_atoms() {
        let (system, x) = two_by_two();
        let f = construct_input_features(&x, system.atoms()).unwrap();

        let v_ee = 1.0 / 10.0_f64.sqrt();
        let v_en = -(1.0 / 1.0 + 2.0 / 5.0_f64.sqrt() + 1.0 / 3.0 + 2.0 / 1.0);
        let v_nn = 1.0 * 2.0 / 2.0;

        assert_relative_eq!(potential_electron_electron(&f.r_ee), v_ee, epsilon = 1e-14);
        assert_relative_eq!(potential_electron_nuclear(system.charges(), &f.r_ae), v_en, epsilon = 1e-14);
        assert_relative_eq!(potential_nuclear_nuclear(system.charges(), system.atoms()), v_nn, epsilon = 1e-14);
        assert_relative_eq!(potential_from_features(&f, &system), v_ee + v_en + v_nn, epsilon = 1e-14);
    }

    #[test]
    fn test_full_matrix_sum_would_double_count() {
        let (system, x) = two_by_two();
        let f = construct_input_features(&x, system.atoms()).unwrap();
        let full: f64 = f.r_ee.iter().filter(|r| **r > 0.0).map(|r| 1.0 / r).sum();
        assert_relative_eq!(full, 2.0 * potential_electron_electron(&f.r_ee), epsilon = 1e-14);
    }

    #[test]
    fn test_permuting_electrons_leaves_potential_unchanged() {
        let system = AtomicSystem::new(
            vec![Vector3::new(0.0, 0.0, -0.7), Vector3::new(0.0, 0.0, 0.7)],
            vec![1.0, 1.0],
        )
        .unwrap();
        let electrons = [[0.1, 0.2, -0.5], [-0.4, 0.3, 0.9], [0.8, -0.6, 0.1]];
        let flat = |order: &[usize]| -> Vec<f64> {
            order.iter().flat_map(|&i| electrons[i]).collect()
        };
        let a = construct_input_features(&flat(&[0, 1, 2]), system.atoms()).unwrap();
        let b = construct_input_features(&flat(&[2, 0, 1]), system.atoms()).unwrap();
        assert_relative_eq!(
            potential_electron_electron(&a.r_ee),
            potential_electron_electron(&b.r_ee),
            epsilon = 1e-13
        );
        assert_relative_eq!(
            potential_electron_nuclear(system.charges(), &a.r_ae),
            potential_electron_nuclear(system.charges(), &b.r_ae),
            epsilon = 1e-13
        );
    }

    #[test]
    fn test_single_electron_has_no_pair_terms() {
        let system = AtomicSystem::single_atom(1.0).unwrap();
        let f = construct_input_features(&[1.0, 0.0, 0.0], system.atoms()).unwrap();
        assert_eq!(potential_electron_electron(&f.r_ee), 0.0);
        assert_eq!(potential_nuclear_nuclear(system.charges(), system.atoms()), 0.0);
        assert_relative_eq!(potential_from_features(&f, &system), -1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_coincident_particles_are_not_guarded() {
        let system = AtomicSystem::single_atom(1.0).unwrap();
        let f = construct_input_features(&[0.0, 0.0, 0.0], system.atoms()).unwrap();
        assert!(potential_from_features(&f, &system).is_infinite());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "one charge per atom column")]
    fn test_charge_count_must_match_atom_columns() {
        let r_ae = DMatrix::from_element(2, 3, 1.0);
        potential_electron_nuclear(&[1.0, 2.0], &r_ae);
    }
}

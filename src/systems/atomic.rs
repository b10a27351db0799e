//! Static description of the nuclei and of the electron spin partition.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};

/// Fixed nuclei: positions and charges.
///
/// Charges are general nonzero reals; their sign is the species charge.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "RawAtomicSystem")]
pub struct AtomicSystem {
    atoms: Vec<Vector3<f64>>,
    charges: Vec<f64>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAtomicSystem {
    atoms: Vec<Vector3<f64>>,
    charges: Vec<f64>,
}

impl TryFrom<RawAtomicSystem> for AtomicSystem {
    type Error = Error;

    fn try_from(raw: RawAtomicSystem) -> Result<Self> {
        AtomicSystem::new(raw.atoms, raw.charges)
    }
}

impl AtomicSystem {
    pub fn new(atoms: Vec<Vector3<f64>>, charges: Vec<f64>) -> Result<Self> {
        if atoms.len() != charges.len() {
            return Err(Error::AtomChargeMismatch {
                atoms: atoms.len(),
                charges: charges.len(),
            });
        }
        if let Some((index, &charge)) = charges
            .iter()
            .enumerate()
            .find(|(_, z)| **z == 0.0 || !z.is_finite())
        {
            return Err(Error::InvalidCharge { index, charge });
        }
        Ok(Self { atoms, charges })
    }

    /// A single nucleus of charge `charge` at the origin.
    pub fn single_atom(charge: f64) -> Result<Self> {
        Self::new(vec![Vector3::zeros()], vec![charge])
    }

    pub fn atoms(&self) -> &[Vector3<f64>] {
        &self.atoms
    }

    pub fn charges(&self) -> &[f64] {
        &self.charges
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Sum of nuclear charges, the electron count of the neutral system.
    pub fn total_charge(&self) -> f64 {
        self.charges.iter().sum()
    }
}

/// Number of particles in each spin species.
///
/// Only the total count matters for the energy: it fixes the configuration
/// dimension `D = 3N`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct SpinPartition(pub Vec<usize>);

impl SpinPartition {
    pub fn new(counts: Vec<usize>) -> Self {
        Self(counts)
    }

    pub fn num_particles(&self) -> usize {
        self.0.iter().sum()
    }

    /// Length of a flattened configuration.
    pub fn dim(&self) -> usize {
        3 * self.num_particles()
    }

    pub fn counts(&self) -> &[usize] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatched_lengths_rejected() {
        let err = AtomicSystem::new(vec![Vector3::zeros(); 2], vec![1.0]).unwrap_err();
        assert!(matches!(err, Error::AtomChargeMismatch { atoms: 2, charges: 1 }));
    }

    #[test]
    fn test_zero_charge_rejected() {
        let err = AtomicSystem::new(vec![Vector3::zeros(); 2], vec![1.0, 0.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidCharge { index: 1, .. }));
    }

    #[test]
    fn test_yaml_goes_through_validation() {
        let ok: AtomicSystem = serde_yaml::from_str("atoms: [[0.0, 0.0, 0.7], [0.0, 0.0, -0.7]]\ncharges: [1.0, 1.0]\n").unwrap();
        assert_eq!(ok.num_atoms(), 2);
        assert_eq!(ok.total_charge(), 2.0);
        let bad = serde_yaml::from_str::<AtomicSystem>("atoms: [[0.0, 0.0, 0.0]]\ncharges: [1.0, 2.0]\n");
        assert!(bad.is_err());
    }

    #[test]
    fn test_spin_partition_dim() {
        let spins = SpinPartition::new(vec![3, 2]);
        assert_eq!(spins.num_particles(), 5);
        assert_eq!(spins.dim(), 15);
        let parsed: SpinPartition = serde_yaml::from_str("[1, 0]").unwrap();
        assert_eq!(parsed.dim(), 3);
    }
}

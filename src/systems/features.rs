//! Pairwise geometry of a configuration: electron-atom and
//! electron-electron displacements and distances.

use nalgebra::{DMatrix, Vector3};
use crate::error::{Error, Result};

/// Distance features of one configuration of `n` electrons and `m` atoms.
#[derive(Debug, Clone)]
pub struct InputFeatures {
    /// `ae[i * m + j] = r_i - R_j`
    pub ae: Vec<Vector3<f64>>,
    /// `ee[i * n + j] = r_i - r_j`
    pub ee: Vec<Vector3<f64>>,
    /// `r_ae[(i, j)] = |r_i - R_j|`, shape `n × m`
    pub r_ae: DMatrix<f64>,
    /// `r_ee[(i, j)] = |r_i - r_j|`, shape `n × n`, zero diagonal
    pub r_ee: DMatrix<f64>,
}

impl InputFeatures {
    pub fn num_electrons(&self) -> usize {
        self.r_ee.nrows()
    }
}

/// Split a flattened configuration into electron positions.
pub fn electron_positions(x: &[f64]) -> Result<Vec<Vector3<f64>>> {
    if x.len() % 3 != 0 {
        return Err(Error::RaggedConfiguration(x.len()));
    }
    Ok(x.chunks_exact(3)
        .map(|c| Vector3::new(c[0], c[1], c[2]))
        .collect())
}

/// Build displacement vectors and distance matrices for configuration `x`.
pub fn construct_input_features(x: &[f64], atoms: &[Vector3<f64>]) -> Result<InputFeatures> {
    let electrons = electron_positions(x)?;
    let n = electrons.len();
    let m = atoms.len();

    let ae: Vec<Vector3<f64>> = electrons
        .iter()
        .flat_map(|r| atoms.iter().map(move |a| r - a))
        .collect();
    let ee: Vec<Vector3<f64>> = electrons
        .iter()
        .flat_map(|ri| electrons.iter().map(move |rj| ri - rj))
        .collect();

    let r_ae = DMatrix::from_fn(n, m, |i, j| ae[i * m + j].norm());
    let r_ee = DMatrix::from_fn(n, n, |i, j| ee[i * n + j].norm());

    Ok(InputFeatures { ae, ee, r_ae, r_ee })
}

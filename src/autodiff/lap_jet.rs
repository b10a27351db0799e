//! Forward Laplacian propagation.
//!
//! Every intermediate quantity `u` carries `(u, ∇u, Δu)` with respect to the
//! original input coordinates. The rules are
//!
//! - unary `f(u)`:  `∇f = f'(u) ∇u`,  `Δf = f'(u) Δu + f''(u) |∇u|²`
//! - product `u v`: `∇(uv) = u ∇v + v ∇u`,  `Δ(uv) = u Δv + v Δu + 2 ∇u·∇v`
//!
//! so one evaluation of the model yields value, gradient and Laplacian.

use std::ops::{Add, Div, Mul, Neg, Sub};
use super::scalar::{Elementary, Scalar};

/// Value, gradient and Laplacian carried together.
///
/// An empty `grad` is the zero gradient (constants).
#[derive(Clone, Debug)]
pub struct LapJet {
    pub value: f64,
    pub grad: Vec<f64>,
    pub lap: f64,
}

impl LapJet {
    /// Input coordinates: unit gradients and zero Laplacian.
    pub fn inputs(x: &[f64]) -> Vec<Self> {
        let n = x.len();
        x.iter()
            .enumerate()
            .map(|(i, &xi)| {
                let mut grad = vec![0.0; n];
                grad[i] = 1.0;
                LapJet { value: xi, grad, lap: 0.0 }
            })
            .collect()
    }

    /// Gradient padded to `dim` entries.
    pub fn gradient(&self, dim: usize) -> Vec<f64> {
        if self.grad.is_empty() {
            vec![0.0; dim]
        } else {
            self.grad.clone()
        }
    }

    pub fn grad_norm_sq(&self) -> f64 {
        self.grad.iter().map(|g| g * g).sum()
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn axpy(a: f64, x: Vec<f64>, b: f64, y: Vec<f64>) -> Vec<f64> {
    match (x.is_empty(), y.is_empty()) {
        (true, true) => Vec::new(),
        (false, true) => x.into_iter().map(|xi| a * xi).collect(),
        (true, false) => y.into_iter().map(|yi| b * yi).collect(),
        (false, false) => x.into_iter().zip(y).map(|(xi, yi)| a * xi + b * yi).collect(),
    }
}

impl Add for LapJet {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        LapJet {
            value: self.value + rhs.value,
            grad: axpy(1.0, self.grad, 1.0, rhs.grad),
            lap: self.lap + rhs.lap,
        }
    }
}

impl Sub for LapJet {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        LapJet {
            value: self.value - rhs.value,
            grad: axpy(1.0, self.grad, -1.0, rhs.grad),
            lap: self.lap - rhs.lap,
        }
    }
}

impl Mul for LapJet {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let cross = dot(&self.grad, &rhs.grad);
        LapJet {
            value: self.value * rhs.value,
            lap: self.value * rhs.lap + rhs.value * self.lap + 2.0 * cross,
            grad: axpy(rhs.value, self.grad, self.value, rhs.grad),
        }
    }
}

impl Div for LapJet {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        self * rhs.recip()
    }
}

impl Neg for LapJet {
    type Output = Self;
    fn neg(self) -> Self {
        LapJet {
            value: -self.value,
            grad: self.grad.into_iter().map(|g| -g).collect(),
            lap: -self.lap,
        }
    }
}

impl Add<f64> for LapJet {
    type Output = Self;
    fn add(self, rhs: f64) -> Self {
        LapJet { value: self.value + rhs, ..self }
    }
}

impl Sub<f64> for LapJet {
    type Output = Self;
    fn sub(self, rhs: f64) -> Self {
        LapJet { value: self.value - rhs, ..self }
    }
}

impl Mul<f64> for LapJet {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        LapJet {
            value: self.value * rhs,
            grad: self.grad.into_iter().map(|g| g * rhs).collect(),
            lap: self.lap * rhs,
        }
    }
}

impl Div<f64> for LapJet {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        self * rhs.recip()
    }
}

impl Scalar for LapJet {
    fn from_f64(value: f64) -> Self {
        LapJet { value, grad: Vec::new(), lap: 0.0 }
    }

    fn primal(&self) -> f64 {
        self.value
    }

    fn elementary(self, op: Elementary) -> Self {
        let (f, f1, f2) = op.derivatives(self.value);
        let grad_sq = self.grad_norm_sq();
        LapJet {
            value: f,
            grad: self.grad.into_iter().map(|g| f1 * g).collect(),
            lap: f1 * self.lap + f2 * grad_sq,
        }
    }
}

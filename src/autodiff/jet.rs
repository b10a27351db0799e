//! Second-order Taylor jets.
//!
//! A jet holds the normalized Taylor coefficients of `t ↦ f(x + t v)` at
//! `t = 0`:
//!
//! - `c0 = f(x)`
//! - `c1 = ∇f(x)·v`
//! - `c2 = vᵀ H_f(x) v / 2`

use std::ops::{Add, Div, Mul, Neg, Sub};
use super::scalar::{Elementary, Scalar};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Jet2 {
    pub c0: f64,
    pub c1: f64,
    pub c2: f64,
}

impl Jet2 {
    pub fn new(c0: f64, c1: f64, c2: f64) -> Self {
        Self { c0, c1, c2 }
    }

    /// Input jet for coordinate `x` moving along `v` with no higher-order terms.
    pub fn along(x: f64, v: f64) -> Self {
        Self::new(x, v, 0.0)
    }
}

impl Add for Jet2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Jet2::new(self.c0 + rhs.c0, self.c1 + rhs.c1, self.c2 + rhs.c2)
    }
}

impl Sub for Jet2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Jet2::new(self.c0 - rhs.c0, self.c1 - rhs.c1, self.c2 - rhs.c2)
    }
}

impl Mul for Jet2 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Jet2::new(
            self.c0 * rhs.c0,
            self.c0 * rhs.c1 + self.c1 * rhs.c0,
            self.c0 * rhs.c2 + self.c1 * rhs.c1 + self.c2 * rhs.c0,
        )
    }
}

impl Div for Jet2 {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        let q0 = self.c0 / rhs.c0;
        let q1 = (self.c1 - q0 * rhs.c1) / rhs.c0;
        let q2 = (self.c2 - q0 * rhs.c2 - q1 * rhs.c1) / rhs.c0;
        Jet2::new(q0, q1, q2)
    }
}

impl Neg for Jet2 {
    type Output = Self;
    fn neg(self) -> Self {
        Jet2::new(-self.c0, -self.c1, -self.c2)
    }
}

impl Add<f64> for Jet2 {
    type Output = Self;
    fn add(self, rhs: f64) -> Self {
        Jet2::new(self.c0 + rhs, self.c1, self.c2)
    }
}

impl Sub<f64> for Jet2 {
    type Output = Self;
    fn sub(self, rhs: f64) -> Self {
        Jet2::new(self.c0 - rhs, self.c1, self.c2)
    }
}

impl Mul<f64> for Jet2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Jet2::new(self.c0 * rhs, self.c1 * rhs, self.c2 * rhs)
    }
}

impl Div<f64> for Jet2 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Jet2::new(self.c0 / rhs, self.c1 / rhs, self.c2 / rhs)
    }
}

impl Scalar for Jet2 {
    fn from_f64(value: f64) -> Self {
        Jet2::new(value, 0.0, 0.0)
    }

    fn primal(&self) -> f64 {
        self.c0
    }

    // Faà di Bruno truncated at second order.
    fn elementary(self, op: Elementary) -> Self {
        let (f, f1, f2) = op.derivatives(self.c0);
        Jet2::new(f, f1 * self.c1, f1 * self.c2 + 0.5 * f2 * self.c1 * self.c1)
    }
}

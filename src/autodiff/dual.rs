//! Forward-mode tangent: `re + eps·ε` with `ε² = 0`.

use std::ops::{Add, Div, Mul, Neg, Sub};
use super::scalar::{Elementary, Scalar};

/// A value together with its directional derivative along one tangent.
///
/// Generic over the inner scalar so it can be nested inside (or around)
/// other derivative carriers.
#[derive(Clone, Debug)]
pub struct Dual<T> {
    pub re: T,
    pub eps: T,
}

impl<T: Scalar> Dual<T> {
    pub fn new(re: T, eps: T) -> Self {
        Self { re, eps }
    }
}

impl<T: Scalar> Add for Dual<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Dual::new(self.re + rhs.re, self.eps + rhs.eps)
    }
}

impl<T: Scalar> Sub for Dual<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Dual::new(self.re - rhs.re, self.eps - rhs.eps)
    }
}

impl<T: Scalar> Mul for Dual<T> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let eps = self.re.clone() * rhs.eps + self.eps * rhs.re.clone();
        Dual::new(self.re * rhs.re, eps)
    }
}

impl<T: Scalar> Div for Dual<T> {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        let re = self.re / rhs.re.clone();
        let eps = (self.eps - re.clone() * rhs.eps) / rhs.re;
        Dual::new(re, eps)
    }
}

impl<T: Scalar> Neg for Dual<T> {
    type Output = Self;
    fn neg(self) -> Self {
        Dual::new(-self.re, -self.eps)
    }
}

impl<T: Scalar> Add<f64> for Dual<T> {
    type Output = Self;
    fn add(self, rhs: f64) -> Self {
        Dual::new(self.re + rhs, self.eps)
    }
}

impl<T: Scalar> Sub<f64> for Dual<T> {
    type Output = Self;
    fn sub(self, rhs: f64) -> Self {
        Dual::new(self.re - rhs, self.eps)
    }
}

impl<T: Scalar> Mul<f64> for Dual<T> {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Dual::new(self.re * rhs, self.eps * rhs)
    }
}

impl<T: Scalar> Div<f64> for Dual<T> {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Dual::new(self.re / rhs, self.eps / rhs)
    }
}

impl<T: Scalar> Scalar for Dual<T> {
    fn from_f64(value: f64) -> Self {
        Dual::new(T::from_f64(value), T::from_f64(0.0))
    }

    fn primal(&self) -> f64 {
        self.re.primal()
    }

    fn elementary(self, op: Elementary) -> Self {
        let slope = op.derivative(self.re.clone());
        Dual::new(self.re.elementary(op), self.eps * slope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quotient_rule() {
        // d/dx (x^2 / (1 + x)) = (x^2 + 2x) / (1 + x)^2
        let x = Dual::new(2.0, 1.0);
        let y = x.clone() * x.clone() / (x + 1.0);
        assert_relative_eq!(y.re, 4.0 / 3.0, epsilon = 1e-14);
        assert_relative_eq!(y.eps, 8.0 / 9.0, epsilon = 1e-14);
    }

    #[test]
    fn test_nested_dual_gives_second_derivative() {
        // f(x) = exp(sin x): f'' = exp(sin x) (cos^2 x - sin x)
        let x0 = 0.4_f64;
        let x = Dual::new(Dual::new(x0, 1.0), Dual::new(1.0, 0.0));
        let y = x.sin().exp();
        let expected = x0.sin().exp() * (x0.cos().powi(2) - x0.sin());
        assert_relative_eq!(y.eps.eps, expected, epsilon = 1e-12);
        assert_relative_eq!(y.re.eps, y.eps.re, epsilon = 1e-14);
    }
}

//! The `Scalar` trait: the number type a wavefunction is evaluated with.
//!
//! A model written once against `Scalar` can be run on plain `f64`, on
//! forward-mode tangents, on dense gradients, on second-order Taylor jets,
//! or on the joint (value, gradient, Laplacian) representation. Every
//! derivative the local energy needs comes from picking one of those types.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Elementary unary functions understood by every scalar type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Elementary {
    Exp,
    Ln,
    Sqrt,
    Sin,
    Cos,
    Tanh,
    Recip,
    Powi(i32),
}

impl Elementary {
    /// Value, first and second derivative of the function at `x`.
    pub fn derivatives(self, x: f64) -> (f64, f64, f64) {
        match self {
            Elementary::Exp => {
                let e = x.exp();
                (e, e, e)
            }
            Elementary::Ln => (x.ln(), 1.0 / x, -1.0 / (x * x)),
            Elementary::Sqrt => {
                let s = x.sqrt();
                (s, 0.5 / s, -0.25 / (s * x))
            }
            Elementary::Sin => {
                let (s, c) = x.sin_cos();
                (s, c, -s)
            }
            Elementary::Cos => {
                let (s, c) = x.sin_cos();
                (c, -s, -c)
            }
            Elementary::Tanh => {
                let t = x.tanh();
                let d = 1.0 - t * t;
                (t, d, -2.0 * t * d)
            }
            Elementary::Recip => {
                let r = 1.0 / x;
                (r, -r * r, 2.0 * r * r * r)
            }
            Elementary::Powi(0) => (1.0, 0.0, 0.0),
            Elementary::Powi(1) => (x, 1.0, 0.0),
            Elementary::Powi(n) => {
                let nf = n as f64;
                (x.powi(n), nf * x.powi(n - 1), nf * (nf - 1.0) * x.powi(n - 2))
            }
        }
    }

    /// First derivative evaluated in an arbitrary scalar type.
    ///
    /// Nested types (a tangent of a gradient, say) need the derivative as a
    /// differentiable quantity itself, not just its `f64` value.
    pub fn derivative<S: Scalar>(self, x: S) -> S {
        match self {
            Elementary::Exp => x.exp(),
            Elementary::Ln => x.recip(),
            Elementary::Sqrt => (x.sqrt() * 2.0).recip(),
            Elementary::Sin => x.cos(),
            Elementary::Cos => -x.sin(),
            Elementary::Tanh => {
                let t = x.tanh();
                -(t.clone() * t) + 1.0
            }
            Elementary::Recip => {
                let r = x.recip();
                -(r.clone() * r)
            }
            Elementary::Powi(0) => S::from_f64(0.0),
            Elementary::Powi(1) => S::from_f64(1.0),
            Elementary::Powi(n) => x.powi(n - 1) * n as f64,
        }
    }
}

/// Real number type a wavefunction can be evaluated with.
pub trait Scalar:
    Clone
    + Debug
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Add<f64, Output = Self>
    + Sub<f64, Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
{
    /// Lift a constant; all derivative parts are zero.
    fn from_f64(value: f64) -> Self;

    /// The plain value with every derivative part dropped.
    fn primal(&self) -> f64;

    /// Apply an elementary function with its chain rule.
    fn elementary(self, op: Elementary) -> Self;

    fn exp(self) -> Self {
        self.elementary(Elementary::Exp)
    }

    fn ln(self) -> Self {
        self.elementary(Elementary::Ln)
    }

    fn sqrt(self) -> Self {
        self.elementary(Elementary::Sqrt)
    }

    fn sin(self) -> Self {
        self.elementary(Elementary::Sin)
    }

    fn cos(self) -> Self {
        self.elementary(Elementary::Cos)
    }

    fn tanh(self) -> Self {
        self.elementary(Elementary::Tanh)
    }

    fn recip(self) -> Self {
        self.elementary(Elementary::Recip)
    }

    fn powi(self, n: i32) -> Self {
        self.elementary(Elementary::Powi(n))
    }

    /// `|x|`, differentiated away from zero.
    fn abs(self) -> Self {
        if self.primal() < 0.0 {
            -self
        } else {
            self
        }
    }
}

impl Scalar for f64 {
    fn from_f64(value: f64) -> Self {
        value
    }

    fn primal(&self) -> f64 {
        *self
    }

    fn elementary(self, op: Elementary) -> Self {
        match op {
            Elementary::Exp => f64::exp(self),
            Elementary::Ln => f64::ln(self),
            Elementary::Sqrt => f64::sqrt(self),
            Elementary::Sin => f64::sin(self),
            Elementary::Cos => f64::cos(self),
            Elementary::Tanh => f64::tanh(self),
            Elementary::Recip => f64::recip(self),
            Elementary::Powi(n) => f64::powi(self, n),
        }
    }
}

/// Sum of scalars, `0` for an empty iterator.
pub fn sum<S: Scalar>(terms: impl IntoIterator<Item = S>) -> S {
    terms.into_iter().fold(S::from_f64(0.0), |acc, t| acc + t)
}

/// Euclidean distance between two points given as coordinate triples.
pub fn distance<S: Scalar>(a: &[S], b: &[f64; 3]) -> S {
    sum(a.iter().zip(b.iter()).map(|(ai, &bi)| {
        let d = ai.clone() - bi;
        d.clone() * d
    }))
    .sqrt()
}

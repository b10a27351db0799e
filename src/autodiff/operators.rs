//! Differentiation operators over functions written against `Scalar`.
//!
//! Each operator takes the function as a closure fixed to one scalar type;
//! callers typically pass `|y| wavefunction.evaluate(params, y).log_abs`
//! and let inference pick the carrier.

use super::dual::Dual;
use super::jet::Jet2;
use super::lap_jet::LapJet;
use super::tape::{Tape, Var};

/// Value and gradient of `f` at `x` from one recorded pass and one
/// backward sweep.
pub fn value_and_grad<F>(f: F, x: &[f64]) -> (f64, Vec<f64>)
where
    F: Fn(&[Var<f64>]) -> Var<f64>,
{
    let tape = Tape::new();
    let out = f(&tape.inputs(x));
    let grad = tape.gradient(&out, x.len());
    (out.value, grad)
}

/// The gradient field of `f` linearized at a fixed point.
///
/// `primal()` is `∇f(x)`; `jvp(v)` is the directional derivative of `∇f`
/// at `x` along `v`, i.e. the Hessian-vector product `H v`, computed
/// without forming `H` at the cost of one forward-over-reverse pass.
pub struct LinearizedGrad<F> {
    f: F,
    x: Vec<f64>,
    primal: Vec<f64>,
}

/// Linearize the gradient of `f` at `x`.
pub fn linearize_grad<F>(f: F, x: &[f64]) -> LinearizedGrad<F>
where
    F: Fn(&[Var<Dual<f64>>]) -> Var<Dual<f64>>,
{
    let primal = tangent_gradient(&f, x, &vec![0.0; x.len()])
        .into_iter()
        .map(|g| g.re)
        .collect();
    LinearizedGrad { f, x: x.to_vec(), primal }
}

fn tangent_gradient<F>(f: &F, x: &[f64], v: &[f64]) -> Vec<Dual<f64>>
where
    F: Fn(&[Var<Dual<f64>>]) -> Var<Dual<f64>>,
{
    let duals: Vec<Dual<f64>> = x
        .iter()
        .zip(v)
        .map(|(&xi, &vi)| Dual::new(xi, vi))
        .collect();
    let tape = Tape::new();
    let out = f(&tape.inputs(&duals));
    tape.gradient(&out, x.len())
}

impl<F> LinearizedGrad<F>
where
    F: Fn(&[Var<Dual<f64>>]) -> Var<Dual<f64>>,
{
    pub fn dim(&self) -> usize {
        self.x.len()
    }

    pub fn primal(&self) -> &[f64] {
        &self.primal
    }

    /// Hessian-vector product `H v`.
    pub fn jvp(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(v.len(), self.dim(), "tangent must match the input dimension");
        tangent_gradient(&self.f, &self.x, v)
            .into_iter()
            .map(|g| g.eps)
            .collect()
    }
}

/// Second-order Taylor expansion of `f` at `x` along `v`.
///
/// The returned jet has `c0 = f(x)`, `c1 = ∇f·v`, `c2 = vᵀHv / 2`.
pub fn taylor2<F>(f: F, x: &[f64], v: &[f64]) -> Jet2
where
    F: Fn(&[Jet2]) -> Jet2,
{
    assert_eq!(x.len(), v.len(), "direction must match the input dimension");
    let inputs: Vec<Jet2> = x
        .iter()
        .zip(v)
        .map(|(&xi, &vi)| Jet2::along(xi, vi))
        .collect();
    f(&inputs)
}

/// One augmented pass giving value, gradient and Laplacian of `f` at `x`.
pub fn forward_laplacian<F>(f: F, x: &[f64]) -> LapJet
where
    F: Fn(&[LapJet]) -> LapJet,
{
    f(&LapJet::inputs(x))
}

/// Reference Laplacian by central differences, for checking the operators.
pub fn numerical_laplacian<F>(f: F, x: &[f64], h: f64) -> f64
where
    F: Fn(&[f64]) -> f64,
{
    let f0 = f(x);
    let mut y = x.to_vec();
    (0..x.len())
        .map(|i| {
            y[i] = x[i] + h;
            let fwd = f(&y);
            y[i] = x[i] - h;
            let bwd = f(&y);
            y[i] = x[i];
            (fwd - 2.0 * f0 + bwd) / (h * h)
        })
        .sum()
}

//! Reverse-mode differentiation on a recorded tape.
//!
//! Every operation on a [`Var`] appends one node holding at most two
//! `(parent, local partial)` pairs, so recording costs `O(1)` per operation
//! and one backward sweep yields the whole gradient. With `T = Dual<f64>`
//! inputs carrying a tangent `v`, the adjoints come out as
//! `∇g(x) + ε H v` (forward-over-reverse).

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::{Arc, Mutex, MutexGuard};

use super::scalar::{Elementary, Scalar};

#[derive(Clone, Debug)]
struct Node<T> {
    parents: [Option<(usize, T)>; 2],
}

/// Shared operation record of one differentiated evaluation.
pub struct Tape<T> {
    nodes: Mutex<Vec<Node<T>>>,
}

impl<T> fmt::Debug for Tape<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tape({} nodes)", self.len())
    }
}

impl<T> Tape<T> {
    pub fn new() -> Arc<Self> {
        Arc::new(Tape { nodes: Mutex::new(Vec::new()) })
    }

    fn nodes(&self) -> MutexGuard<'_, Vec<Node<T>>> {
        self.nodes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of recorded nodes, inputs included.
    pub fn len(&self) -> usize {
        self.nodes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, parents: [Option<(usize, T)>; 2]) -> usize {
        let mut nodes = self.nodes();
        nodes.push(Node { parents });
        nodes.len() - 1
    }
}

impl<T: Scalar> Tape<T> {
    /// Register `x` as the independent variables, in order.
    pub fn inputs(self: &Arc<Self>, x: &[T]) -> Vec<Var<T>> {
        x.iter()
            .map(|xi| Var {
                value: xi.clone(),
                slot: Some((Arc::clone(self), self.push([None, None]))),
            })
            .collect()
    }

    /// Adjoints of the first `num_inputs` nodes for `output`.
    pub fn gradient(&self, output: &Var<T>, num_inputs: usize) -> Vec<T> {
        let zero = T::from_f64(0.0);
        let Some((_, out)) = &output.slot else {
            return vec![zero; num_inputs];
        };
        let nodes = self.nodes();
        let mut adjoint = vec![zero; nodes.len()];
        adjoint[*out] = T::from_f64(1.0);
        for i in (0..=*out).rev() {
            for (parent, partial) in nodes[i].parents.iter().flatten() {
                let contribution = adjoint[i].clone() * partial.clone();
                adjoint[*parent] = adjoint[*parent].clone() + contribution;
            }
        }
        adjoint.truncate(num_inputs);
        adjoint
    }
}

/// A value recorded on a [`Tape`]; constants carry no slot.
#[derive(Clone)]
pub struct Var<T> {
    pub value: T,
    slot: Option<(Arc<Tape<T>>, usize)>,
}

impl<T: fmt::Debug> fmt::Debug for Var<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Var")
            .field("value", &self.value)
            .field("index", &self.slot.as_ref().map(|(_, i)| *i))
            .finish()
    }
}

impl<T: Scalar> Var<T> {
    fn unary(&self, value: T, partial: T) -> Self {
        let slot = self
            .slot
            .as_ref()
            .map(|(tape, i)| (Arc::clone(tape), tape.push([Some((*i, partial)), None])));
        Var { value, slot }
    }

    fn binary(lhs: &Self, rhs: &Self, value: T, d_lhs: T, d_rhs: T) -> Self {
        match (&lhs.slot, &rhs.slot) {
            (Some((tape, i)), Some((_, j))) => {
                let index = tape.push([Some((*i, d_lhs)), Some((*j, d_rhs))]);
                Var { value, slot: Some((Arc::clone(tape), index)) }
            }
            (Some(_), None) => lhs.unary(value, d_lhs),
            (None, Some(_)) => rhs.unary(value, d_rhs),
            (None, None) => Var { value, slot: None },
        }
    }
}

impl<T: Scalar> Add for Var<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let value = self.value.clone() + rhs.value.clone();
        Var::binary(&self, &rhs, value, T::from_f64(1.0), T::from_f64(1.0))
    }
}

impl<T: Scalar> Sub for Var<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        let value = self.value.clone() - rhs.value.clone();
        Var::binary(&self, &rhs, value, T::from_f64(1.0), T::from_f64(-1.0))
    }
}

impl<T: Scalar> Mul for Var<T> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let value = self.value.clone() * rhs.value.clone();
        Var::binary(&self, &rhs, value, rhs.value.clone(), self.value.clone())
    }
}

impl<T: Scalar> Div for Var<T> {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        self * rhs.recip()
    }
}

impl<T: Scalar> Neg for Var<T> {
    type Output = Self;
    fn neg(self) -> Self {
        self.unary(-self.value.clone(), T::from_f64(-1.0))
    }
}

// Shifting by a constant leaves the derivative untouched, so the node is reused.
impl<T: Scalar> Add<f64> for Var<T> {
    type Output = Self;
    fn add(self, rhs: f64) -> Self {
        Var { value: self.value + rhs, slot: self.slot }
    }
}

impl<T: Scalar> Sub<f64> for Var<T> {
    type Output = Self;
    fn sub(self, rhs: f64) -> Self {
        Var { value: self.value - rhs, slot: self.slot }
    }
}

impl<T: Scalar> Mul<f64> for Var<T> {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        self.unary(self.value.clone() * rhs, T::from_f64(rhs))
    }
}

impl<T: Scalar> Div<f64> for Var<T> {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        self.unary(self.value.clone() / rhs, T::from_f64(rhs.recip()))
    }
}

impl<T: Scalar> Scalar for Var<T> {
    fn from_f64(value: f64) -> Self {
        Var { value: T::from_f64(value), slot: None }
    }

    fn primal(&self) -> f64 {
        self.value.primal()
    }

    fn elementary(self, op: Elementary) -> Self {
        let slope = op.derivative(self.value.clone());
        self.unary(self.value.clone().elementary(op), slope)
    }
}

//! Automatic differentiation carriers and operators.
//!
//! The wavefunction contract is "a function generic over [`Scalar`]"; the
//! kinetic energy estimators get every derivative they need by evaluating
//! that function on one of the carriers below.

mod scalar;
mod dual;
mod jet;
mod lap_jet;
mod tape;
mod operators;

pub use scalar::{Scalar, Elementary, sum, distance};
pub use dual::Dual;
pub use jet::Jet2;
pub use lap_jet::LapJet;
pub use tape::{Tape, Var};
pub use operators::{value_and_grad, linearize_grad, LinearizedGrad, taylor2, forward_laplacian, numerical_laplacian};

//! # Algebra Engine
//!
//! A narrow exact computer algebra layer: just enough to build, solve and
//! typeset the fourteen equation shapes. It is not a general solver.
//!
//! ## Modules
//!
//! - [`rational`] - normalized `i64` fractions
//! - [`number`] - exact elements of Q(√2, √3) and one-radical extensions
//! - [`angle`] - rational multiples of π with exact values on the π/12 grid
//! - [`functions`] - the `{sin, cos, tan, cot}` tag set and its inverses
//! - [`expr`] - expression trees, linear arguments, equations
//! - [`polynomial`] - Vieta construction, synthetic division, quadratic roots
//! - [`solution`] - integer-indexed families, unions, witnesses
//! - [`solve`] - the basic equation `f(kx + b) = v`
//!
//! All markup is Typst math.

pub mod angle;
pub mod expr;
pub mod functions;
pub mod number;
pub mod polynomial;
pub mod rational;
pub mod solution;
pub mod solve;

pub use angle::Angle;
pub use expr::{Arg, Equation, Expr};
pub use functions::{InverseFn, TrigFn};
pub use number::{Real, Surd};
pub use polynomial::{clearing_factor, Polynomial};
pub use rational::Rational;
pub use solution::{Family, Phase, SolutionSet, Witness};
pub use solve::{basic_families, classify, solve_basic, BasicCase};

//! # Equation Categories
//!
//! Fourteen generators, one per textbook technique. Each module defines a
//! parameter struct implementing [`crate::instance::Problem`]: it samples a
//! "nice" instance, derives the exact solution set through the category's
//! fixed chain of identities and narrates that chain step by step.
//!
//! ## Modules
//!
//! - [`registry`] - stable keys `"1"`..`"14"`, metadata and dispatch
//! - [`identities`] - sum-to-product and power-reduction templates
//! - [`formulas`] - basic-equation narration and zero-factor helpers
//! - one module per category, from [`simplest`] to [`inverse_trig`]
//!
//! ## Conventions
//!
//! - The free variable is always `x`; substitutions use `t` (and `y` for the
//!   secondary tangent equation of [`tan_cot_sum`]).
//! - Integer family parameters are always `n ∈ ℤ`.
//! - Narration text is English; every formula is Typst math.

use rand::Rng;

pub mod formulas;
pub mod identities;
pub mod registry;

pub mod bounded_sum;
pub mod double_angle;
pub mod grouping;
pub mod homogeneous;
pub mod inverse_trig;
pub mod linear_combination;
pub mod power_reduction;
pub mod quadratic;
pub mod reducible_homogeneous;
pub mod simplest;
pub mod sum_to_product;
pub mod symmetric;
pub mod tan_cot_sum;
pub mod tan_substitution;

pub use registry::{generate_categories_markdown, Category, CategoryMetadata, ALL_CATEGORIES};

/// Uniform choice from a non-empty table
pub(crate) fn pick<T: Clone, R: Rng + ?Sized>(rng: &mut R, table: &[T]) -> T {
    table[rng.gen_range(0..table.len())].clone()
}

/// `$...$` inline math in narration text
pub(crate) fn inline(markup: impl AsRef<str>) -> String {
    format!("${}$", markup.as_ref())
}

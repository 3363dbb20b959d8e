//! # Category Registry
//!
//! Maps the stable category keys `"1"`..`"14"` to their generators, and
//! carries the metadata used for the CLI listing, worksheet headings and the
//! generated `CATEGORIES.md` reference.
//!
//! ## Usage
//!
//! ```rust
//! use trig_core::config::GeneratorConfig;
//! use trig_core::equations::registry::Category;
//!
//! let category = Category::from_key("8").unwrap();
//! assert_eq!(category, Category::LinearCombination);
//!
//! let meta = category.metadata();
//! println!("{}: {}", meta.name, meta.formula_typst);
//!
//! let config = GeneratorConfig::seeded(1);
//! let instance = category.generate(&mut config.rng_for(0), &config).unwrap();
//! assert_eq!(instance.category(), Category::LinearCombination);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::errors::{TrigError, TrigResult};
use crate::instance::EquationInstance;

use super::{
    bounded_sum, double_angle, grouping, homogeneous, inverse_trig, linear_combination, power_reduction,
    quadratic, reducible_homogeneous, simplest, sum_to_product, symmetric, tan_cot_sum, tan_substitution,
};

// ============================================================================
// Category Metadata
// ============================================================================

/// Descriptive metadata for one category.
#[derive(Debug, Clone)]
pub struct CategoryMetadata {
    /// Human-readable name (e.g., "Homogeneous Equation")
    pub name: &'static str,
    /// What the generated equations look like and how they are solved
    pub description: &'static str,
    /// Canonical equation shape in Typst math notation
    pub formula_typst: &'static str,
    /// Canonical equation shape in plain text for markdown
    pub formula_plain: &'static str,
    /// Identities the derivation relies on (plain text)
    pub identities: Vec<&'static str>,
    /// Source module implementing the generator
    pub source_module: &'static str,
}

// ============================================================================
// Category Enum
// ============================================================================

/// All equation categories, in key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Category {
    /// `A f(kx + b) = A v`
    Simplest,
    /// `sin^2 x + B sin x cos x + C cos^2 x = 0`
    Homogeneous,
    /// `f(αx) ± f(βx) = 0`
    SumToProduct,
    /// Four terms, two sum-to-product pairs with a common factor
    Grouping,
    /// Sums of squared sines or cosines
    PowerReduction,
    /// Quadratic in one function, possibly after `sin^2 + cos^2 = 1`
    Quadratic,
    /// `A cos 2x + B f(x) + C = 0`
    DoubleAngle,
    /// `a sin x + b cos x = c`
    LinearCombination,
    /// Homogeneous after `D = D (sin^2 x + cos^2 x)`
    ReducibleHomogeneous,
    /// Symmetric in `sin x ± cos x`
    Symmetric,
    /// `A f(2x) + B tan x = C`
    TanSubstitution,
    /// `A (tan^2 x + cot^2 x) + B (tan x + cot x) + C = 0`
    TanCotSum,
    /// `Σ ±f(kx) = N`
    BoundedSum,
    /// `k arcf(P(x)) = k arcf(V)`
    InverseTrig,
}

/// Every category, in key order
pub static ALL_CATEGORIES: &[Category] = &[
    Category::Simplest,
    Category::Homogeneous,
    Category::SumToProduct,
    Category::Grouping,
    Category::PowerReduction,
    Category::Quadratic,
    Category::DoubleAngle,
    Category::LinearCombination,
    Category::ReducibleHomogeneous,
    Category::Symmetric,
    Category::TanSubstitution,
    Category::TanCotSum,
    Category::BoundedSum,
    Category::InverseTrig,
];

impl Category {
    /// Stable registry key
    pub fn key(&self) -> &'static str {
        match self {
            Category::Simplest => "1",
            Category::Homogeneous => "2",
            Category::SumToProduct => "3",
            Category::Grouping => "4",
            Category::PowerReduction => "5",
            Category::Quadratic => "6",
            Category::DoubleAngle => "7",
            Category::LinearCombination => "8",
            Category::ReducibleHomogeneous => "9",
            Category::Symmetric => "10",
            Category::TanSubstitution => "11",
            Category::TanCotSum => "12",
            Category::BoundedSum => "13",
            Category::InverseTrig => "14",
        }
    }

    /// Module-style alias accepted wherever a key is
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Simplest => "simplest",
            Category::Homogeneous => "homogeneous",
            Category::SumToProduct => "sum_to_product",
            Category::Grouping => "grouping",
            Category::PowerReduction => "power_reduction",
            Category::Quadratic => "quadratic",
            Category::DoubleAngle => "double_angle",
            Category::LinearCombination => "linear_combination",
            Category::ReducibleHomogeneous => "reducible_homogeneous",
            Category::Symmetric => "symmetric",
            Category::TanSubstitution => "tan_substitution",
            Category::TanCotSum => "tan_cot_sum",
            Category::BoundedSum => "bounded_sum",
            Category::InverseTrig => "inverse_trig",
        }
    }

    /// Look up a category by key (`"1"`..`"14"`) or slug
    pub fn from_key(key: &str) -> TrigResult<Category> {
        let key = key.trim();
        ALL_CATEGORIES
            .iter()
            .copied()
            .find(|c| c.key() == key || c.slug() == key)
            .ok_or_else(|| TrigError::unknown_category(key))
    }

    pub fn name(&self) -> &'static str {
        self.metadata().name
    }

    /// Generate one instance of this category
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, config: &GeneratorConfig) -> TrigResult<EquationInstance> {
        match self {
            Category::Simplest => EquationInstance::generate::<simplest::Simplest, R>(rng, config),
            Category::Homogeneous => EquationInstance::generate::<homogeneous::Homogeneous, R>(rng, config),
            Category::SumToProduct => EquationInstance::generate::<sum_to_product::SumToProduct, R>(rng, config),
            Category::Grouping => EquationInstance::generate::<grouping::Grouping, R>(rng, config),
            Category::PowerReduction => {
                EquationInstance::generate::<power_reduction::PowerReduction, R>(rng, config)
            }
            Category::Quadratic => EquationInstance::generate::<quadratic::Quadratic, R>(rng, config),
            Category::DoubleAngle => EquationInstance::generate::<double_angle::DoubleAngle, R>(rng, config),
            Category::LinearCombination => {
                EquationInstance::generate::<linear_combination::LinearCombination, R>(rng, config)
            }
            Category::ReducibleHomogeneous => {
                EquationInstance::generate::<reducible_homogeneous::ReducibleHomogeneous, R>(rng, config)
            }
            Category::Symmetric => EquationInstance::generate::<symmetric::Symmetric, R>(rng, config),
            Category::TanSubstitution => {
                EquationInstance::generate::<tan_substitution::TanSubstitution, R>(rng, config)
            }
            Category::TanCotSum => EquationInstance::generate::<tan_cot_sum::TanCotSum, R>(rng, config),
            Category::BoundedSum => EquationInstance::generate::<bounded_sum::BoundedSum, R>(rng, config),
            Category::InverseTrig => EquationInstance::generate::<inverse_trig::InverseTrig, R>(rng, config),
        }
    }

    /// Get the full metadata for this category.
    pub fn metadata(&self) -> CategoryMetadata {
        match self {
            Category::Simplest => CategoryMetadata {
                name: "Simplest Equation",
                description: "A single trigonometric function of a linear argument equals a tabulated value. \
                    Solved by the general inverse-function formula, or by the simplified formula at 0 and ±1.",
                formula_typst: "A f(k x + b) = A v",
                formula_plain: "A·f(kx + b) = A·v",
                identities: vec![
                    "sin t = v  =>  t = (-1)^n arcsin v + πn",
                    "cos t = v  =>  t = ±arccos v + 2πn",
                    "tan t = v  =>  t = arctan v + πn",
                    "cot t = v  =>  t = arccot v + πn",
                ],
                source_module: "trig_core/src/equations/simplest.rs",
            },
            Category::Homogeneous => CategoryMetadata {
                name: "Homogeneous Equation",
                description: "A second-degree homogeneous equation in sin x and cos x. Dividing by cos²x gives a \
                    quadratic in tan x whose roots were chosen via Vieta's formulas.",
                formula_typst: "sin^2 (x) + B sin(x) cos(x) + C cos^2 (x) = 0",
                formula_plain: "sin²x + B·sin x·cos x + C·cos²x = 0",
                identities: vec!["cos x = 0 is not a solution, so divide by cos²x", "tan x = sin x / cos x"],
                source_module: "trig_core/src/equations/homogeneous.rs",
            },
            Category::SumToProduct => CategoryMetadata {
                name: "Sum-to-Product Equation",
                description: "A sum or difference of two sines or two cosines equals zero. The sum-to-product \
                    identity turns it into a product of two factors, each solved separately.",
                formula_typst: "f(alpha x) plus.minus f(beta x) = 0",
                formula_plain: "f(αx) ± f(βx) = 0",
                identities: vec![
                    "sin a + sin b = 2 sin((a+b)/2) cos((a-b)/2)",
                    "sin a - sin b = 2 sin((a-b)/2) cos((a+b)/2)",
                    "cos a + cos b = 2 cos((a+b)/2) cos((a-b)/2)",
                    "cos a - cos b = -2 sin((a+b)/2) sin((a-b)/2)",
                ],
                source_module: "trig_core/src/equations/sum_to_product.rs",
            },
            Category::Grouping => CategoryMetadata {
                name: "Grouping Equation",
                description: "Four terms of one function. Pairing them so both pairs share a half-difference \
                    produces a common factor; the remaining group is transformed once more.",
                formula_typst: "f(a_1 x) plus.minus f(b_1 x) plus.minus f(a_2 x) plus.minus f(b_2 x) = 0",
                formula_plain: "f(a1·x) ± f(b1·x) ± f(a2·x) ± f(b2·x) = 0",
                identities: vec!["sum-to-product identities", "common factor extraction"],
                source_module: "trig_core/src/equations/grouping.rs",
            },
            Category::PowerReduction => CategoryMetadata {
                name: "Power Reduction Equation",
                description: "Squares of sines or cosines are linearized by the power-reduction formulas, \
                    then grouped and factored with sum-to-product identities.",
                formula_typst: "f^2 (a x) + f^2 (b x) + f^2 (c x) = 3/2",
                formula_plain: "f²(ax) + f²(bx) + f²(cx) = 3/2, or f²(ax) + f²(bx) - f²(cx) - f²(dx) = 0",
                identities: vec!["sin²a = (1 - cos 2a)/2", "cos²a = (1 + cos 2a)/2", "sum-to-product identities"],
                source_module: "trig_core/src/equations/power_reduction.rs",
            },
            Category::Quadratic => CategoryMetadata {
                name: "Quadratic Equation in a Trigonometric Function",
                description: "A quadratic in f(kx + b), either given directly or after replacing a squared \
                    cofunction with the Pythagorean identity. Roots outside [-1, 1] are discarded for sine and cosine.",
                formula_typst: "A f^2 (k x + b) + B f(k x + b) + C = 0",
                formula_plain: "A·f²(kx + b) + B·f(kx + b) + C = 0",
                identities: vec!["sin²a = 1 - cos²a", "cos²a = 1 - sin²a"],
                source_module: "trig_core/src/equations/quadratic.rs",
            },
            Category::DoubleAngle => CategoryMetadata {
                name: "Double Angle to Quadratic",
                description: "The double-angle cosine formula turns a mix of cos 2x and f(x) into a quadratic in f(x).",
                formula_typst: "A cos(2 x) + B f(x) + C = 0",
                formula_plain: "A·cos 2x + B·f(x) + C = 0",
                identities: vec!["cos 2x = 1 - 2 sin²x", "cos 2x = 2 cos²x - 1"],
                source_module: "trig_core/src/equations/double_angle.rs",
            },
            Category::LinearCombination => CategoryMetadata {
                name: "Linear Combination (Auxiliary Angle)",
                description: "A linear combination of sin x and cos x. Dividing by the amplitude D = √(a² + b²) \
                    introduces an auxiliary angle and leaves a simplest equation.",
                formula_typst: "a sin(x) + b cos(x) = c",
                formula_plain: "a·sin x + b·cos x = c",
                identities: vec!["sin(x + φ) = sin x cos φ + cos x sin φ", "cos(x - φ) = cos x cos φ + sin x sin φ"],
                source_module: "trig_core/src/equations/linear_combination.rs",
            },
            Category::ReducibleHomogeneous => CategoryMetadata {
                name: "Reducible to Homogeneous",
                description: "A quadratic form in sin x and cos x with a constant right-hand side. Writing the \
                    constant as D(sin²x + cos²x) makes the equation homogeneous.",
                formula_typst: "A sin^2 (x) + B sin(x) cos(x) + C cos^2 (x) = D",
                formula_plain: "A·sin²x + B·sin x·cos x + C·cos²x = D",
                identities: vec!["sin²x + cos²x = 1", "tan x = sin x / cos x"],
                source_module: "trig_core/src/equations/reducible_homogeneous.rs",
            },
            Category::Symmetric => CategoryMetadata {
                name: "Symmetric Equation",
                description: "An equation in sin 2x and sin x ± cos x. The substitution t = sin x ± cos x with \
                    t² = 1 ± sin 2x gives a quadratic; roots with |t| > √2 are discarded.",
                formula_typst: "A sin(2 x) + B (sin(x) plus.minus cos(x)) + C = 0",
                formula_plain: "A·sin 2x + B·(sin x ± cos x) + C = 0",
                identities: vec![
                    "(sin x ± cos x)² = 1 ± sin 2x",
                    "sin x + cos x = √2 sin(x + π/4)",
                    "sin x - cos x = √2 sin(x - π/4)",
                ],
                source_module: "trig_core/src/equations/symmetric.rs",
            },
            Category::TanSubstitution => CategoryMetadata {
                name: "Tangent Half-Angle Substitution",
                description: "sin 2x or cos 2x is written as a rational function of t = tan x; clearing \
                    denominators leaves a cubic with a known root.",
                formula_typst: "A f(2 x) + B tan(x) = C",
                formula_plain: "A·f(2x) + B·tan x = C",
                identities: vec!["sin 2x = 2t/(1 + t²)", "cos 2x = (1 - t²)/(1 + t²)"],
                source_module: "trig_core/src/equations/tan_substitution.rs",
            },
            Category::TanCotSum => CategoryMetadata {
                name: "Tangent plus Cotangent",
                description: "The substitution t = tan x + cot x with t² = tan²x + cot²x + 2 gives a quadratic in t. \
                    Roots with |t| < 2 are impossible; the rest lead to y² - ty + 1 = 0 for y = tan x.",
                formula_typst: "A (tan^2 (x) + cot^2 (x)) + B (tan(x) + cot(x)) + C = 0",
                formula_plain: "A·(tan²x + cot²x) + B·(tan x + cot x) + C = 0",
                identities: vec!["tan x · cot x = 1", "|tan x + cot x| ≥ 2"],
                source_module: "trig_core/src/equations/tan_cot_sum.rs",
            },
            Category::BoundedSum => CategoryMetadata {
                name: "Bounded Sum",
                description: "A sum of N terms ±f(kx) equal to N. Each term is at most 1, so every term must reach 1 \
                    at the same point.",
                formula_typst: "sum_(i=1)^N plus.minus f_i (k_i x) = N",
                formula_plain: "Σ ±f_i(k_i·x) = N",
                identities: vec!["|sin t| ≤ 1", "|cos t| ≤ 1"],
                source_module: "trig_core/src/equations/bounded_sum.rs",
            },
            Category::InverseTrig => CategoryMetadata {
                name: "Inverse Trigonometric Equation",
                description: "Equal multiples of an inverse function of a polynomial and of a constant. The \
                    inverse function is injective, so the arguments must agree.",
                formula_typst: "k op(\"arcf\")(P(x)) = k op(\"arcf\")(V)",
                formula_plain: "k·arcf(P(x)) = k·arcf(V)",
                identities: vec!["arcf is injective on its domain", "f(arcf(v)) = v"],
                source_module: "trig_core/src/equations/inverse_trig.rs",
            },
        }
    }
}

// ============================================================================
// Markdown Generation
// ============================================================================

/// Generate the CATEGORIES.md reference from the registry.
pub fn generate_categories_markdown() -> String {
    let mut output = String::with_capacity(8_000);

    output.push_str(
        r#"# Trigsheet Equation Categories

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-categories`

Every category samples "nice" parameters, solves the equation exactly and
narrates the derivation. Request a category by its key or its slug:
`trigsheet generate -c 2:5 -c tan_cot_sum:3`.

| Key | Slug | Name |
|-----|------|------|
"#,
    );

    for category in ALL_CATEGORIES {
        output.push_str(&format!(
            "| {} | `{}` | {} |\n",
            category.key(),
            category.slug(),
            category.name()
        ));
    }
    output.push_str("\n---\n\n");

    for category in ALL_CATEGORIES {
        let meta = category.metadata();
        output.push_str(&format!("## {}. {}\n\n", category.key(), meta.name));
        output.push_str(&format!("{}\n\n", meta.description));
        output.push_str(&format!("**Form:** `{}`\n\n", meta.formula_plain));
        if !meta.identities.is_empty() {
            output.push_str("**Identities:**\n");
            for identity in &meta.identities {
                output.push_str(&format!("- `{}`\n", identity));
            }
            output.push('\n');
        }
        output.push_str(&format!("**Source:** [`{}`]({})\n\n", category.slug(), meta.source_module));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique_and_ordered() {
        assert_eq!(ALL_CATEGORIES.len(), 14);
        for (i, category) in ALL_CATEGORIES.iter().enumerate() {
            assert_eq!(category.key(), (i + 1).to_string());
        }
    }

    #[test]
    fn test_from_key() {
        assert_eq!(Category::from_key("12").unwrap(), Category::TanCotSum);
        assert_eq!(Category::from_key(" symmetric ").unwrap(), Category::Symmetric);
        let err = Category::from_key("15").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_CATEGORY");
    }

    #[test]
    fn test_metadata_complete() {
        for category in ALL_CATEGORIES {
            let meta = category.metadata();
            assert!(!meta.name.is_empty());
            assert!(!meta.formula_typst.is_empty());
            assert!(meta.source_module.ends_with(&format!("{}.rs", category.slug())));
        }
    }

    #[test]
    fn test_markdown_lists_every_category() {
        let md = generate_categories_markdown();
        for category in ALL_CATEGORIES {
            assert!(md.contains(category.metadata().name));
        }
        assert!(md.contains("Auto-generated"));
    }
}

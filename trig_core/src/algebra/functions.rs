//! Trigonometric function tags.
//!
//! Every symbolic trigonometric term carries one of these tags; transforms
//! dispatch on them with exhaustive `match`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::angle::Angle;
use super::number::Surd;

/// Direct trigonometric function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrigFn {
    Sin,
    Cos,
    Tan,
    Cot,
}

impl TrigFn {
    pub const ALL: [TrigFn; 4] = [TrigFn::Sin, TrigFn::Cos, TrigFn::Tan, TrigFn::Cot];

    /// Typst math operator name
    pub fn markup(&self) -> &'static str {
        match self {
            TrigFn::Sin => "sin",
            TrigFn::Cos => "cos",
            TrigFn::Tan => "tan",
            TrigFn::Cot => "cot",
        }
    }

    pub fn eval(&self, x: f64) -> f64 {
        match self {
            TrigFn::Sin => x.sin(),
            TrigFn::Cos => x.cos(),
            TrigFn::Tan => x.tan(),
            TrigFn::Cot => x.cos() / x.sin(),
        }
    }

    /// Exact value on the π/12 grid; `None` at poles
    pub fn exact(&self, angle: &Angle) -> Option<Surd> {
        match self {
            TrigFn::Sin => angle.sin_exact(),
            TrigFn::Cos => angle.cos_exact(),
            TrigFn::Tan => angle.tan_exact(),
            TrigFn::Cot => angle.cot_exact(),
        }
    }

    /// Fundamental period
    pub fn period(&self) -> Angle {
        match self {
            TrigFn::Sin | TrigFn::Cos => Angle::pi_frac(2, 1),
            TrigFn::Tan | TrigFn::Cot => Angle::PI,
        }
    }

    /// Whether the range is `[-1, 1]`
    pub fn is_bounded(&self) -> bool {
        matches!(self, TrigFn::Sin | TrigFn::Cos)
    }

    pub fn inverse(&self) -> InverseFn {
        match self {
            TrigFn::Sin => InverseFn::Arcsin,
            TrigFn::Cos => InverseFn::Arccos,
            TrigFn::Tan => InverseFn::Arctan,
            TrigFn::Cot => InverseFn::Arccot,
        }
    }

    /// sin ↔ cos, tan ↔ cot
    pub fn cofunction(&self) -> TrigFn {
        match self {
            TrigFn::Sin => TrigFn::Cos,
            TrigFn::Cos => TrigFn::Sin,
            TrigFn::Tan => TrigFn::Cot,
            TrigFn::Cot => TrigFn::Tan,
        }
    }
}

impl fmt::Display for TrigFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.markup())
    }
}

/// Inverse trigonometric function with its principal branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InverseFn {
    Arcsin,
    Arccos,
    Arctan,
    Arccot,
}

impl InverseFn {
    pub const ALL: [InverseFn; 4] = [
        InverseFn::Arcsin,
        InverseFn::Arccos,
        InverseFn::Arctan,
        InverseFn::Arccot,
    ];

    /// Typst math markup (arccot has no built-in operator)
    pub fn markup(&self) -> &'static str {
        match self {
            InverseFn::Arcsin => "arcsin",
            InverseFn::Arccos => "arccos",
            InverseFn::Arctan => "arctan",
            InverseFn::Arccot => "op(\"arccot\")",
        }
    }

    /// Plain name for prose and logs
    pub fn name(&self) -> &'static str {
        match self {
            InverseFn::Arcsin => "arcsin",
            InverseFn::Arccos => "arccos",
            InverseFn::Arctan => "arctan",
            InverseFn::Arccot => "arccot",
        }
    }

    pub fn direct(&self) -> TrigFn {
        match self {
            InverseFn::Arcsin => TrigFn::Sin,
            InverseFn::Arccos => TrigFn::Cos,
            InverseFn::Arctan => TrigFn::Tan,
            InverseFn::Arccot => TrigFn::Cot,
        }
    }

    pub fn eval(&self, v: f64) -> f64 {
        match self {
            InverseFn::Arcsin => v.asin(),
            InverseFn::Arccos => v.acos(),
            InverseFn::Arctan => v.atan(),
            InverseFn::Arccot => std::f64::consts::FRAC_PI_2 - v.atan(),
        }
    }

    /// Whether `v` lies in the domain
    pub fn domain_contains(&self, v: &Surd) -> bool {
        match self {
            InverseFn::Arcsin | InverseFn::Arccos => {
                v.abs().cmp_value(&Surd::ONE) != std::cmp::Ordering::Greater
            }
            InverseFn::Arctan | InverseFn::Arccot => true,
        }
    }

    /// Principal range as Typst markup
    pub fn range_markup(&self) -> &'static str {
        match self {
            InverseFn::Arcsin => "[-frac(pi, 2), frac(pi, 2)]",
            InverseFn::Arccos => "[0, pi]",
            InverseFn::Arctan => "(-frac(pi, 2), frac(pi, 2))",
            InverseFn::Arccot => "(0, pi)",
        }
    }

    /// Whether an angle lies in the principal range
    pub fn range_contains(&self, angle: &Angle) -> bool {
        let half = Angle::pi_frac(1, 2);
        let a = angle.pi_coeff();
        match self {
            InverseFn::Arcsin => a >= (-half).pi_coeff() && a <= half.pi_coeff(),
            InverseFn::Arccos => a >= Angle::ZERO.pi_coeff() && a <= Angle::PI.pi_coeff(),
            InverseFn::Arctan => a > (-half).pi_coeff() && a < half.pi_coeff(),
            InverseFn::Arccot => a > Angle::ZERO.pi_coeff() && a < Angle::PI.pi_coeff(),
        }
    }

    /// Principal value for tabulated arguments (multiples of π/12)
    pub fn exact(&self, v: &Surd) -> Option<Angle> {
        let candidates = match self {
            InverseFn::Arcsin => -6..=6,
            InverseFn::Arccos => 0..=12,
            InverseFn::Arctan => -5..=5,
            InverseFn::Arccot => 1..=11,
        };
        let f = self.direct();
        candidates
            .map(|m| Angle::pi_frac(m, 12))
            .find(|a| f.exact(a).as_ref() == Some(v))
    }
}

impl fmt::Display for InverseFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_lookup() {
        assert_eq!(InverseFn::Arcsin.exact(&Surd::frac(-1, 2)), Some(Angle::pi_frac(-1, 6)));
        assert_eq!(InverseFn::Arccos.exact(&Surd::frac(-1, 2)), Some(Angle::pi_frac(2, 3)));
        assert_eq!(InverseFn::Arctan.exact(&Surd::int(-1)), Some(Angle::pi_frac(-1, 4)));
        assert_eq!(InverseFn::Arccot.exact(&Surd::int(-1)), Some(Angle::pi_frac(3, 4)));
        assert_eq!(InverseFn::Arccot.exact(&Surd::ZERO), Some(Angle::pi_frac(1, 2)));
        assert_eq!(InverseFn::Arctan.exact(&Surd::int(2)), None);
    }

    #[test]
    fn test_domain_and_range() {
        assert!(!InverseFn::Arccos.domain_contains(&Surd::int(2)));
        assert!(InverseFn::Arcsin.domain_contains(&Surd::int(-1)));
        assert!(InverseFn::Arccot.domain_contains(&Surd::int(7)));
        assert!(InverseFn::Arccos.range_contains(&Angle::PI));
        assert!(!InverseFn::Arctan.range_contains(&Angle::pi_frac(1, 2)));
        assert!(!InverseFn::Arccot.range_contains(&Angle::ZERO));
    }

    #[test]
    fn test_arccot_eval() {
        assert!((InverseFn::Arccot.eval(-1.0) - 3.0 * std::f64::consts::FRAC_PI_4).abs() < 1e-12);
        assert_eq!(TrigFn::Sin.cofunction(), TrigFn::Cos);
        assert_eq!(TrigFn::Cot.inverse(), InverseFn::Arccot);
    }
}

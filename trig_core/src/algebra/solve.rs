//! Solving the basic equation `f(k·x + b) = v` over the reals.
//!
//! Every category eventually reduces to one or more of these. Tabulated
//! endpoint values use the simplified single-family forms; everything else
//! uses the general inverse-function families.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::angle::Angle;
use super::expr::Arg;
use super::functions::TrigFn;
use super::number::{Real, Surd};
use super::solution::{Family, Phase, SolutionSet};

/// Simplified forms `t = base + period·n` at `v ∈ {0, 1, -1}`
static SPECIAL_CASES: Lazy<HashMap<(TrigFn, i64), (Angle, Angle)>> = Lazy::new(|| {
    let two_pi = Angle::pi_frac(2, 1);
    let half_pi = Angle::pi_frac(1, 2);
    HashMap::from([
        ((TrigFn::Sin, 0), (Angle::ZERO, Angle::PI)),
        ((TrigFn::Sin, 1), (half_pi, two_pi)),
        ((TrigFn::Sin, -1), (-half_pi, two_pi)),
        ((TrigFn::Cos, 0), (half_pi, Angle::PI)),
        ((TrigFn::Cos, 1), (Angle::ZERO, two_pi)),
        ((TrigFn::Cos, -1), (Angle::PI, two_pi)),
        ((TrigFn::Tan, 0), (Angle::ZERO, Angle::PI)),
        ((TrigFn::Cot, 0), (half_pi, Angle::PI)),
    ])
});

/// Which closed form solves `f(t) = v`
#[derive(Debug, Clone, PartialEq)]
pub enum BasicCase {
    /// `|v| > 1` for sine or cosine
    OutOfRange,
    /// Single simplified family
    Special(Family),
    /// General inverse-function families
    General(Vec<Family>),
}

pub fn classify(f: TrigFn, value: &Real) -> BasicCase {
    if f.is_bounded() && value.exceeds(&Surd::ONE) {
        return BasicCase::OutOfRange;
    }
    if let Some(n) = value.exact().and_then(Surd::as_integer) {
        if let Some((base, period)) = SPECIAL_CASES.get(&(f, n)) {
            return BasicCase::Special(Family::new(Phase::angle(*base), *period));
        }
    }
    let theta = Phase::principal(f.inverse(), value);
    let families = match f {
        TrigFn::Sin => vec![
            Family::new(theta.clone(), f.period()),
            Family::new(theta.neg().shift(Angle::PI), f.period()),
        ],
        TrigFn::Cos => vec![
            Family::new(theta.clone(), f.period()),
            Family::new(theta.neg(), f.period()),
        ],
        TrigFn::Tan | TrigFn::Cot => vec![Family::new(theta, f.period())],
    };
    BasicCase::General(families)
}

/// Families of `t` solving `f(t) = v`
pub fn basic_families(f: TrigFn, value: &Real) -> Vec<Family> {
    match classify(f, value) {
        BasicCase::OutOfRange => vec![],
        BasicCase::Special(family) => vec![family],
        BasicCase::General(families) => families,
    }
}

/// All real `x` with `f(k·x + b) = v`
pub fn solve_basic(f: TrigFn, arg: &Arg, value: &Real) -> SolutionSet {
    let families = basic_families(f, value)
        .iter()
        .filter_map(|family| family.through_arg(arg))
        .collect();
    SolutionSet::from_families(families)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::rational::Rational;

    #[test]
    fn test_special_cases() {
        let set = solve_basic(TrigFn::Sin, &Arg::x(), &Real::int(0));
        assert_eq!(set.markup(), "{pi n | n in ZZ}");
        let set = solve_basic(TrigFn::Cos, &Arg::times(2), &Real::int(-1));
        assert_eq!(set.markup(), "{frac(pi, 2) + pi n | n in ZZ}");
        let set = solve_basic(TrigFn::Cot, &Arg::x(), &Real::int(0));
        assert_eq!(set.markup(), "{frac(pi, 2) + pi n | n in ZZ}");
    }

    #[test]
    fn test_general_sine() {
        let set = solve_basic(TrigFn::Sin, &Arg::x(), &Real::Exact(Surd::frac(1, 2)));
        assert_eq!(
            set.markup(),
            "{frac(pi, 6) + 2 pi n | n in ZZ} union {frac(5 pi, 6) + 2 pi n | n in ZZ}"
        );
    }

    #[test]
    fn test_general_cosine_with_shift() {
        // cos(3x + π/4) = √2/2
        let arg = Arg::new(Rational::int(3), Angle::pi_frac(1, 4));
        let v = Real::Exact(Surd::sqrt(2) * Surd::frac(1, 2));
        let set = solve_basic(TrigFn::Cos, &arg, &v);
        for x in set.witnesses() {
            assert!(((3.0 * x + std::f64::consts::FRAC_PI_4).cos() - v.to_f64()).abs() < 1e-12);
        }
        assert_eq!(set.families().len(), 2);
    }

    #[test]
    fn test_out_of_range_and_non_tabulated() {
        assert!(solve_basic(TrigFn::Sin, &Arg::x(), &Real::int(2)).is_empty());
        let set = solve_basic(TrigFn::Tan, &Arg::x(), &Real::int(2));
        assert_eq!(set.markup(), "{arctan(2) + pi n | n in ZZ}");
    }
}

//! Narration building blocks shared by the categories.
//!
//! Almost every derivation ends in one or more basic equations
//! `f(kx + b) = v`, and many pass through a quadratic in a substituted
//! variable. The helpers here narrate those two stages so each category only
//! has to explain its own reduction.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::algebra::{basic_families, classify, solve_basic, Arg, BasicCase, Family, Polynomial, Real, SolutionSet, Surd, TrigFn};
use crate::instance::Narration;

use super::inline;

/// General solution templates; `{{T}}` is the variable, `{{V}}` the value
static GENERAL_FORMULAS: Lazy<HashMap<TrigFn, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (TrigFn::Sin, "{{T}} = (-1)^n arcsin({{V}}) + pi n, quad n in ZZ"),
        (TrigFn::Cos, "{{T}} = plus.minus arccos({{V}}) + 2 pi n, quad n in ZZ"),
        (TrigFn::Tan, "{{T}} = arctan({{V}}) + pi n, quad n in ZZ"),
        (TrigFn::Cot, "{{T}} = op(\"arccot\")({{V}}) + pi n, quad n in ZZ"),
    ])
});

/// General formula for `f(var) = value` with the placeholders filled in
pub fn general_formula(f: TrigFn, var: &str, value: &Real) -> String {
    GENERAL_FORMULAS
        .get(&f)
        .copied()
        .unwrap_or_default()
        .replace("{{T}}", var)
        .replace("{{V}}", &value.markup())
}

/// `var = fam_1, quad var = fam_2, ...`
pub fn families_markup(var: &str, families: &[Family]) -> String {
    families
        .iter()
        .map(|f| format!("{} = {}", var, f.markup()))
        .collect::<Vec<_>>()
        .join(", quad ")
}

/// `f(var) = value` as Typst math
pub fn basic_markup(f: TrigFn, var: &str, value: &Real) -> String {
    format!("{}({}) = {}", f.markup(), var, value.markup())
}

/// Narrate the solution of `f(var) = value` in the variable `var`.
pub fn narrate_basic(out: &mut Narration, f: TrigFn, var: &str, value: &Real) {
    let equation = basic_markup(f, var, value);
    match classify(f, value) {
        BasicCase::OutOfRange => {
            out.text(format!(
                "The equation {} has no solutions, since {} for every real argument.",
                inline(&equation),
                inline(format!("-1 <= {}({}) <= 1", f.markup(), var))
            ));
        }
        BasicCase::Special(family) => {
            out.text(format!("{} is a special case with a simplified formula:", inline(&equation)));
            out.math(format!("{} = {}, quad n in ZZ", var, family.markup()));
        }
        BasicCase::General(families) => {
            out.text(format!("By the general formula for {}:", inline(&equation)));
            out.math(general_formula(f, var, value));
            let inverse = f.inverse();
            if let Some(angle) = value.exact().and_then(|v| inverse.exact(v)) {
                out.text(format!(
                    "Here {}, so",
                    inline(format!("{}({}) = {}", inverse.markup(), value.markup(), angle.markup()))
                ));
            } else {
                out.text("The value is not tabulated, so the answer keeps the inverse function:");
            }
            out.math(families_markup(var, &families));
        }
    }
}

/// A basic equation `f(arg) = value` in `x`
#[derive(Debug, Clone, PartialEq)]
pub struct BasicEquation {
    pub func: TrigFn,
    pub arg: Arg,
    pub value: Real,
}

impl BasicEquation {
    pub fn new(func: TrigFn, arg: Arg, value: Real) -> Self {
        BasicEquation { func, arg, value }
    }

    /// `f(arg) = 0`
    pub fn zero(func: TrigFn, arg: Arg) -> Self {
        BasicEquation::new(func, arg, Real::int(0))
    }

    pub fn markup(&self) -> String {
        basic_markup(self.func, &self.arg.markup(), &self.value)
    }

    pub fn solve(&self) -> SolutionSet {
        solve_basic(self.func, &self.arg, &self.value)
    }

    /// Narrate through a substitution `t = arg` when the argument is not `x`
    pub fn narrate(&self, out: &mut Narration) {
        if self.arg.is_bare() {
            narrate_basic(out, self.func, "x", &self.value);
            return;
        }
        out.text(format!(
            "Let {}. Then {}.",
            inline(format!("t = {}", self.arg.markup())),
            inline(basic_markup(self.func, "t", &self.value))
        ));
        narrate_basic(out, self.func, "t", &self.value);
        let families = basic_families(self.func, &self.value);
        if families.is_empty() {
            return;
        }
        out.text("Returning to $x$:");
        out.math(families_markup(&self.arg.markup(), &families));
        let solved = self.solve();
        out.math(families_markup("x", solved.families()));
    }
}

/// Union of the solutions of several basic equations
pub fn solve_all(equations: &[BasicEquation]) -> SolutionSet {
    SolutionSet::union_all(equations.iter().map(BasicEquation::solve))
}

/// Narrate each equation of a disjunction, then the combined set
pub fn narrate_all(out: &mut Narration, equations: &[BasicEquation]) {
    for (i, equation) in equations.iter().enumerate() {
        out.text(format!("Equation {}: {}", i + 1, inline(equation.markup())));
        equation.narrate(out);
    }
    if equations.len() > 1 {
        let combined = solve_all(equations);
        if combined.is_empty() {
            out.text("None of the equations has a real solution.");
        } else {
            out.text("Combining the solutions of all equations:");
            out.math(combined.markup());
        }
    }
}

/// Narrate a product set to zero: every factor gets its own equation
pub fn narrate_zero_product(out: &mut Narration, product: &str, equations: &[BasicEquation]) {
    out.math(format!("{} = 0", product));
    let cases: Vec<String> = equations.iter().map(BasicEquation::markup).collect();
    narrate_cases(out, &cases, equations);
}

/// Narrate the split of a zero product into `cases` (one per factor, as
/// written) and the basic equations they reduce to
pub fn narrate_cases(out: &mut Narration, cases: &[String], equations: &[BasicEquation]) {
    out.text("A product is zero when at least one factor is zero:");
    out.math(cases.join(" quad \"or\" quad "));
    narrate_all(out, equations);
}

/// Narrate the roots of a quadratic `poly(var) = 0` whose roots are known
pub fn narrate_quadratic(out: &mut Narration, poly: &Polynomial, var: &str, roots: &[Real]) {
    out.math(format!("{} = 0", poly.markup(var)));
    let d = poly.discriminant();
    out.text(format!(
        "The discriminant is {}.",
        inline(format!("D = b^2 - 4 a c = {}", d.markup()))
    ));
    match roots {
        [] => {
            out.text("It is negative, so there are no real roots.");
        }
        [root] => {
            out.text("It is zero, so there is a single root:");
            out.math(format!("{} = {}", var, root.markup()));
        }
        _ => {
            out.math(format!("{var}_(1,2) = frac(-b plus.minus sqrt(D), 2 a)"));
            let listed: Vec<String> = roots
                .iter()
                .enumerate()
                .map(|(i, r)| format!("{}_{} = {}", var, i + 1, r.markup()))
                .collect();
            out.math(listed.join(", quad "));
        }
    }
}

/// `coef (bracket) + tail` where `tail` is a polynomial in `var`, as in
/// `2 (t^2 - 1) - 3 t + 1`
pub fn bracket_plus_markup(coef: Surd, bracket: &str, tail: &Polynomial, var: &str) -> String {
    let head = if coef.is_one() {
        format!("({})", bracket)
    } else if coef == -Surd::ONE {
        format!("-({})", bracket)
    } else if coef.is_compound() {
        format!("({}) ({})", coef.markup(), bracket)
    } else {
        format!("{} ({})", coef.markup(), bracket)
    };
    if tail.is_zero() {
        return head;
    }
    let tail = tail.markup(var);
    match tail.strip_prefix('-') {
        Some(rest) => format!("{} - {}", head, rest),
        None => format!("{} + {}", head, tail),
    }
}

/// Sorted, deduplicated real roots
pub fn sorted_roots(mut roots: Vec<Real>) -> Vec<Real> {
    roots.sort_by(|a, b| a.to_f64().total_cmp(&b.to_f64()));
    roots.dedup();
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{Angle, Rational};
    use crate::instance::StepKind;

    #[test]
    fn test_general_formula_placeholders() {
        let text = general_formula(TrigFn::Cos, "t", &Real::Exact(Surd::frac(1, 3)));
        assert_eq!(text, "t = plus.minus arccos(frac(1, 3)) + 2 pi n, quad n in ZZ");
    }

    #[test]
    fn test_narrate_out_of_range() {
        let mut out = Narration::new();
        narrate_basic(&mut out, TrigFn::Sin, "x", &Real::int(2));
        let steps = out.finish(&SolutionSet::empty());
        assert!(steps[0].markup.contains("no solutions"));
    }

    #[test]
    fn test_basic_equation_with_substitution() {
        let eq = BasicEquation::new(
            TrigFn::Sin,
            Arg::new(Rational::int(2), Angle::pi_frac(1, 6)),
            Real::int(1),
        );
        assert_eq!(eq.markup(), "sin(2 x + frac(pi, 6)) = 1");
        let mut out = Narration::new();
        eq.narrate(&mut out);
        let steps = out.finish(&eq.solve());
        assert!(steps[0].markup.contains("t = 2 x + frac(pi, 6)"));
        assert!(steps.iter().any(|s| s.kind == StepKind::Math && s.markup == "x = frac(pi, 6) + pi n"));
    }

    #[test]
    fn test_solve_all_unions() {
        let set = solve_all(&[
            BasicEquation::zero(TrigFn::Sin, Arg::x()),
            BasicEquation::new(TrigFn::Cos, Arg::x(), Real::int(1)),
        ]);
        assert_eq!(set.markup(), "{pi n | n in ZZ}");
    }

    #[test]
    fn test_bracket_plus_markup() {
        let tail = Polynomial::from_descending(&[Surd::int(-3), Surd::ONE]);
        assert_eq!(bracket_plus_markup(Surd::int(2), "t^2 - 1", &tail, "t"), "2 (t^2 - 1) - 3 t + 1");
        let empty = Polynomial::new(vec![]);
        assert_eq!(bracket_plus_markup(-Surd::ONE, "1 - t^2", &empty, "t"), "-(1 - t^2)");
    }

    #[test]
    fn test_sorted_roots() {
        let roots = sorted_roots(vec![Real::int(3), Real::int(-1), Real::int(3)]);
        assert_eq!(roots, vec![Real::int(-1), Real::int(3)]);
    }
}

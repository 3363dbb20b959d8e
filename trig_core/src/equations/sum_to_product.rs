//! Category 3: `f(αx) ± f(βx) = 0` for sine or cosine.
//!
//! `α` and `β` share their parity, so both the half-sum and the
//! half-difference are integers and the product form has integer arguments.

use rand::Rng;

use crate::algebra::{Arg, Equation, Expr, Rational, SolutionSet, TrigFn};
use crate::instance::{ensure, Narration, Parameters, Problem, Rejection};

use super::formulas::{narrate_zero_product, solve_all, BasicEquation};
use super::identities::{sum_to_product, sum_to_product_template, ProductForm, Sign};
use super::registry::Category;
use super::{inline, pick};

/// `f(a·x) ± f(b·x)`
pub(crate) fn signed_pair(f: TrigFn, sign: Sign, a: Rational, b: Rational) -> Expr {
    Expr::sum(vec![
        Expr::func(f, Arg::scaled(a)),
        Expr::scaled(sign.factor().into(), Expr::func(f, Arg::scaled(b))),
    ])
}

/// `g(arg) = 0` for every factor of a product form
pub(crate) fn factor_equations(product: &ProductForm) -> Vec<BasicEquation> {
    product
        .factors
        .iter()
        .map(|(g, arg)| BasicEquation::zero(*g, *arg))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SumToProduct {
    pub func: TrigFn,
    pub sign: Sign,
    pub alpha: i64,
    pub beta: i64,
}

impl SumToProduct {
    pub fn new(func: TrigFn, sign: Sign, alpha: i64, beta: i64) -> Self {
        SumToProduct {
            func,
            sign,
            alpha,
            beta,
        }
    }

    fn product(&self) -> Option<ProductForm> {
        sum_to_product(self.func, self.sign, Rational::int(self.alpha), Rational::int(self.beta))
    }

    fn factor_equations(&self) -> Vec<BasicEquation> {
        self.product().map(|p| factor_equations(&p)).unwrap_or_default()
    }
}

impl Problem for SumToProduct {
    const CATEGORY: Category = Category::SumToProduct;

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, Rejection> {
        let func = pick(rng, &[TrigFn::Sin, TrigFn::Cos]);
        let a = rng.gen_range(2..=7);
        let b = rng.gen_range(1..=5);
        ensure(a != b, "equal arguments")?;
        let (alpha, beta) = if b > a { (b, a) } else { (a, b) };
        ensure(alpha % 2 == beta % 2, "half-angles would not be integers")?;
        let sign = pick(rng, &[Sign::Plus, Sign::Minus]);
        Ok(SumToProduct::new(func, sign, alpha, beta))
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .with("f", self.func)
            .with("op", self.sign.markup())
            .with("alpha", self.alpha)
            .with("beta", self.beta)
    }

    fn equation(&self) -> Equation {
        Equation::new(
            signed_pair(self.func, self.sign, Rational::int(self.alpha), Rational::int(self.beta)),
            Expr::zero(),
        )
    }

    fn solve(&self) -> SolutionSet {
        solve_all(&self.factor_equations())
    }

    fn narrate(&self, _solution: &SolutionSet, out: &mut Narration) {
        out.text(format!("Solve {}.", inline(self.equation().markup())));
        out.text("Turn the sum (or difference) into a product with the identity");
        out.math(sum_to_product_template(self.func, self.sign));
        out.text(format!(
            "with {} and {}:",
            inline(format!("alpha = {}", Arg::times(self.alpha).markup())),
            inline(format!("beta = {}", Arg::times(self.beta).markup()))
        ));
        if let Some(product) = self.product() {
            narrate_zero_product(out, &product.markup(), &factor_equations(&product));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::EquationInstance;

    #[test]
    fn test_sine_sum() {
        let p = SumToProduct::new(TrigFn::Sin, Sign::Plus, 5, 3);
        assert_eq!(p.equation().markup(), "sin(5 x) + sin(3 x) = 0");
        // 2 sin 4x cos x = 0: x = πn/4 covers cos x = 0 as well
        assert_eq!(p.solve().markup(), "{frac(pi n, 4) | n in ZZ}");
    }

    #[test]
    fn test_cosine_difference() {
        let p = SumToProduct::new(TrigFn::Cos, Sign::Minus, 6, 2);
        assert_eq!(p.equation().markup(), "cos(6 x) - cos(2 x) = 0");
        // -2 sin 4x sin 2x = 0  =>  x = πn/4
        assert_eq!(p.solve().markup(), "{frac(pi n, 4) | n in ZZ}");
    }

    #[test]
    fn test_narration_shows_product() {
        let p = SumToProduct::new(TrigFn::Cos, Sign::Plus, 7, 3);
        let instance = EquationInstance::from_problem(&p, 1).unwrap();
        assert!(instance.steps().iter().any(|s| s.markup == "2 cos(5 x) cos(2 x) = 0"));
    }
}

//! # Equation Instances
//!
//! Every category implements [`Problem`]: a sampled parameter set that knows
//! its equation, its exact solution set and how to explain the derivation.
//! [`EquationInstance::generate`] drives the shared lifecycle:
//!
//! ```text
//! sample (bounded retries) → equation → solve → witness check → narrate → final answer
//! ```
//!
//! The resulting instance is immutable. Its markup accessors never fail: a
//! missing equation or solution (for example in a hand-edited worksheet
//! file) renders as [`NOT_AVAILABLE`].
//!
//! ## Example
//!
//! ```rust
//! use trig_core::config::GeneratorConfig;
//! use trig_core::equations::Category;
//!
//! let config = GeneratorConfig::seeded(7);
//! let instance = Category::Homogeneous.generate(&mut config.rng_for(0), &config).unwrap();
//!
//! assert!(instance.equation_markup().ends_with("= 0"));
//! assert_eq!(instance.steps().last().unwrap().markup, instance.solution_markup());
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::algebra::{Angle, Equation, InverseFn, Real, SolutionSet, Surd, TrigFn, Witness};
use crate::config::GeneratorConfig;
use crate::equations::Category;
use crate::errors::{TrigError, TrigResult};

/// Marker returned by markup accessors when the value is absent
pub const NOT_AVAILABLE: &str = "not available";

/// Relative tolerance of the witness check
pub const WITNESS_TOLERANCE: f64 = 1e-7;

/// Evaluations above this magnitude are treated as poles and skipped
const POLE_THRESHOLD: f64 = 1e6;

// =============================================================================
// Narration
// =============================================================================

/// How a step is typeset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Prose with inline `$...$` math
    Text,
    /// A displayed Typst math body
    Math,
}

/// One entry of a derivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub kind: StepKind,
    pub markup: String,
}

impl Step {
    pub fn text(markup: impl Into<String>) -> Self {
        Step {
            kind: StepKind::Text,
            markup: markup.into(),
        }
    }

    pub fn math(markup: impl Into<String>) -> Self {
        Step {
            kind: StepKind::Math,
            markup: markup.into(),
        }
    }
}

/// Append-only step buffer handed to [`Problem::narrate`]
#[derive(Debug, Default)]
pub struct Narration {
    steps: Vec<Step>,
}

impl Narration {
    pub fn new() -> Self {
        Narration::default()
    }

    pub fn text(&mut self, markup: impl Into<String>) -> &mut Self {
        self.steps.push(Step::text(markup));
        self
    }

    pub fn math(&mut self, markup: impl Into<String>) -> &mut Self {
        self.steps.push(Step::math(markup));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Close with the final-answer entry and hand back the steps
    pub fn finish(mut self, solution: &SolutionSet) -> Vec<Step> {
        let lead = if solution.is_empty() {
            "Answer: the equation has no real solutions."
        } else {
            "Answer:"
        };
        self.text(lead);
        self.math(solution.markup());
        self.steps
    }
}

// =============================================================================
// Parameters
// =============================================================================

/// Value of one sampled parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    Integer(i64),
    Number(Real),
    Angle(Angle),
    Function(TrigFn),
    Inverse(InverseFn),
    Label(String),
}

impl ParamValue {
    pub fn markup(&self) -> String {
        match self {
            ParamValue::Integer(n) => n.to_string(),
            ParamValue::Number(r) => r.markup(),
            ParamValue::Angle(a) => a.markup(),
            ParamValue::Function(f) => f.markup().to_string(),
            ParamValue::Inverse(f) => f.markup().to_string(),
            ParamValue::Label(s) => format!("\"{}\"", s),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Integer(n)
    }
}

impl From<Surd> for ParamValue {
    fn from(s: Surd) -> Self {
        match s.as_integer() {
            Some(n) => ParamValue::Integer(n),
            None => ParamValue::Number(Real::Exact(s)),
        }
    }
}

impl From<Real> for ParamValue {
    fn from(r: Real) -> Self {
        ParamValue::Number(r)
    }
}

impl From<Angle> for ParamValue {
    fn from(a: Angle) -> Self {
        ParamValue::Angle(a)
    }
}

impl From<TrigFn> for ParamValue {
    fn from(f: TrigFn) -> Self {
        ParamValue::Function(f)
    }
}

impl From<InverseFn> for ParamValue {
    fn from(f: InverseFn) -> Self {
        ParamValue::Inverse(f)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Label(s.to_string())
    }
}

/// Named parameter (e.g. `"t1"`, `"A"`, `"phi"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: ParamValue,
}

/// Ordered parameter list of one instance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(Vec<Parameter>);

impl Parameters {
    pub fn new() -> Self {
        Parameters::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.0.push(Parameter {
            name: name.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// Problem protocol
// =============================================================================

/// Why a sampled parameter combination was discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection(pub &'static str);

/// `Err(Rejection(reason))` unless `cond` holds
pub fn ensure(cond: bool, reason: &'static str) -> Result<(), Rejection> {
    if cond {
        Ok(())
    } else {
        Err(Rejection(reason))
    }
}

/// One equation category.
///
/// `sample` performs a single attempt; the retry loop lives in
/// [`EquationInstance::generate`]. `solve` and `narrate` must agree: the
/// narration ends on the same set `solve` returned, which the caller then
/// appends as the final answer.
pub trait Problem: Sized {
    const CATEGORY: Category;

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, Rejection>;

    fn parameters(&self) -> Parameters;

    fn equation(&self) -> Equation;

    fn solve(&self) -> SolutionSet;

    fn narrate(&self, solution: &SolutionSet, out: &mut Narration);
}

// =============================================================================
// EquationInstance
// =============================================================================

/// A generated equation with its solution set and derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationInstance {
    id: Uuid,
    category: Category,
    attempts: usize,
    parameters: Parameters,
    #[serde(default)]
    equation: Option<Equation>,
    #[serde(default)]
    solution: Option<SolutionSet>,
    #[serde(default)]
    steps: Vec<Step>,
}

impl EquationInstance {
    /// Sample a `P` with at most `config.max_attempts` attempts, then solve
    /// and narrate it.
    pub fn generate<P: Problem, R: Rng + ?Sized>(rng: &mut R, config: &GeneratorConfig) -> TrigResult<Self> {
        let category = P::CATEGORY;
        for attempt in 1..=config.max_attempts {
            match P::sample(rng) {
                Ok(problem) => {
                    debug!(category = category.key(), attempts = attempt, "sample accepted");
                    return Self::from_problem(&problem, attempt);
                }
                Err(Rejection(reason)) => {
                    trace!(category = category.key(), attempt, reason, "sample rejected");
                }
            }
        }
        Err(TrigError::generation_exhausted(category.name(), config.max_attempts))
    }

    /// Solve, check and narrate an already accepted problem
    pub fn from_problem<P: Problem>(problem: &P, attempts: usize) -> TrigResult<Self> {
        let equation = problem.equation();
        let solution = problem.solve();
        check_witnesses(P::CATEGORY, &equation, &solution)?;

        let mut narration = Narration::new();
        problem.narrate(&solution, &mut narration);
        let steps = narration.finish(&solution);

        Ok(EquationInstance {
            id: Uuid::new_v4(),
            category: P::CATEGORY,
            attempts,
            parameters: problem.parameters(),
            equation: Some(equation),
            solution: Some(solution),
            steps,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Sampling attempts used, including the accepted one
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn equation(&self) -> Option<&Equation> {
        self.equation.as_ref()
    }

    pub fn solution(&self) -> Option<&SolutionSet> {
        self.solution.as_ref()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn equation_markup(&self) -> String {
        self.equation
            .as_ref()
            .map(Equation::markup)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn solution_markup(&self) -> String {
        self.solution
            .as_ref()
            .map(SolutionSet::markup)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

/// Substitute members of every family (and every isolated point) into the
/// equation. Members of pure-angle families on the π/12 grid are compared
/// exactly; the rest fall back to floating point within
/// [`WITNESS_TOLERANCE`].
pub fn check_witnesses(category: Category, equation: &Equation, solution: &SolutionSet) -> TrigResult<()> {
    let mismatch = |detail: String| {
        TrigError::inconsistent_solution(
            category.name(),
            format!("{} gives {} = {}", detail, equation.markup(), solution.markup()),
        )
    };
    for witness in solution.tagged_witnesses() {
        if let Witness::Exact(angle) = witness {
            if let (Some(lhs), Some(rhs)) = (equation.lhs.eval_exact(angle), equation.rhs.eval_exact(angle)) {
                if lhs != rhs {
                    return Err(mismatch(format!(
                        "x = {} (lhs {}, rhs {})",
                        angle.markup(),
                        lhs.markup(),
                        rhs.markup()
                    )));
                }
                continue;
            }
        }
        let x = witness.to_f64();
        let lhs = equation.lhs.eval(x);
        let rhs = equation.rhs.eval(x);
        let finite = lhs.is_finite() && rhs.is_finite();
        if !finite || lhs.abs() > POLE_THRESHOLD || rhs.abs() > POLE_THRESHOLD {
            trace!(category = category.key(), x, "witness at a pole, skipped");
            continue;
        }
        let scale = lhs.abs().max(rhs.abs()).max(1.0);
        if (lhs - rhs).abs() > WITNESS_TOLERANCE * scale {
            return Err(mismatch(format!("x = {} (lhs {}, rhs {})", x, lhs, rhs)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{solve_basic, Arg, Expr};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// sin(x) = 1/2, always accepted
    struct HalfSine;

    impl Problem for HalfSine {
        const CATEGORY: Category = Category::Simplest;

        fn sample<R: Rng + ?Sized>(_rng: &mut R) -> Result<Self, Rejection> {
            Ok(HalfSine)
        }

        fn parameters(&self) -> Parameters {
            Parameters::new().with("f", TrigFn::Sin).with("v", Surd::frac(1, 2))
        }

        fn equation(&self) -> Equation {
            Equation::new(Expr::func(TrigFn::Sin, Arg::x()), Expr::num(Surd::frac(1, 2)))
        }

        fn solve(&self) -> SolutionSet {
            solve_basic(TrigFn::Sin, &Arg::x(), &Real::Exact(Surd::frac(1, 2)))
        }

        fn narrate(&self, _solution: &SolutionSet, out: &mut Narration) {
            out.text("Apply the general formula.");
        }
    }

    /// Claims sin(x) = 1/2 has the solutions of sin(x) = 1
    struct WrongSine;

    impl Problem for WrongSine {
        const CATEGORY: Category = Category::Simplest;

        fn sample<R: Rng + ?Sized>(_rng: &mut R) -> Result<Self, Rejection> {
            Ok(WrongSine)
        }

        fn parameters(&self) -> Parameters {
            Parameters::new()
        }

        fn equation(&self) -> Equation {
            HalfSine.equation()
        }

        fn solve(&self) -> SolutionSet {
            solve_basic(TrigFn::Sin, &Arg::x(), &Real::int(1))
        }

        fn narrate(&self, _solution: &SolutionSet, _out: &mut Narration) {}
    }

    struct NeverAccepted;

    impl Problem for NeverAccepted {
        const CATEGORY: Category = Category::Grouping;

        fn sample<R: Rng + ?Sized>(_rng: &mut R) -> Result<Self, Rejection> {
            Err(Rejection("always degenerate"))
        }

        fn parameters(&self) -> Parameters {
            Parameters::new()
        }

        fn equation(&self) -> Equation {
            Equation::new(Expr::zero(), Expr::zero())
        }

        fn solve(&self) -> SolutionSet {
            SolutionSet::empty()
        }

        fn narrate(&self, _solution: &SolutionSet, _out: &mut Narration) {}
    }

    #[test]
    fn test_generate_runs_full_lifecycle() {
        let mut rng = StdRng::seed_from_u64(1);
        let instance = EquationInstance::generate::<HalfSine, _>(&mut rng, &GeneratorConfig::default()).unwrap();
        assert_eq!(instance.attempts(), 1);
        assert_eq!(instance.equation_markup(), "sin(x) = frac(1, 2)");
        let last = instance.steps().last().unwrap();
        assert_eq!(last.kind, StepKind::Math);
        assert_eq!(last.markup, instance.solution_markup());
        assert_eq!(instance.parameters().get("f"), Some(&ParamValue::Function(TrigFn::Sin)));
    }

    #[test]
    fn test_witness_check_rejects_wrong_solution() {
        let err = EquationInstance::from_problem(&WrongSine, 1).unwrap_err();
        assert_eq!(err.error_code(), "INCONSISTENT_SOLUTION");
    }

    #[test]
    fn test_generation_exhausted() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = GeneratorConfig::default().with_max_attempts(25);
        let err = EquationInstance::generate::<NeverAccepted, _>(&mut rng, &config).unwrap_err();
        assert_eq!(
            err,
            TrigError::GenerationExhausted {
                category: Category::Grouping.name().to_string(),
                attempts: 25
            }
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_missing_fields_render_marker() {
        let json = r#"{
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "category": "Simplest",
            "attempts": 3,
            "parameters": []
        }"#;
        let instance: EquationInstance = serde_json::from_str(json).unwrap();
        assert_eq!(instance.equation_markup(), NOT_AVAILABLE);
        assert_eq!(instance.solution_markup(), NOT_AVAILABLE);
        assert!(instance.steps().is_empty());
    }

    #[test]
    fn test_empty_solution_final_answer() {
        let steps = Narration::new().finish(&SolutionSet::empty());
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1], Step::math("emptyset"));
        assert!(steps[0].markup.contains("no real solutions"));
    }

    #[test]
    fn test_exact_witness_catches_tiny_offset() {
        // sin(x) = 1/2 + 1/(2·10^9): floating point would accept the 1/2 solutions
        let offset = Surd::frac(1, 2) + Surd::frac(1, 2_000_000_000);
        let equation = Equation::new(Expr::func(TrigFn::Sin, Arg::x()), Expr::num(offset));
        let solution = HalfSine.solve();
        let x = std::f64::consts::PI / 6.0;
        assert!(equation.residual(x).abs() < WITNESS_TOLERANCE);
        let err = check_witnesses(Category::Simplest, &equation, &solution).unwrap_err();
        assert_eq!(err.error_code(), "INCONSISTENT_SOLUTION");
        assert!(check_witnesses(Category::Simplest, &HalfSine.equation(), &solution).is_ok());
    }

    #[test]
    fn test_points_use_float_witnesses() {
        // arctan(x) = π/4 at x = 1 has no exact angle witness
        let equation = Equation::new(
            Expr::arc(InverseFn::Arctan, Expr::Var),
            Expr::Angle(Angle::pi_frac(1, 4)),
        );
        let solution = SolutionSet::from_points(vec![Real::int(1)]);
        assert!(check_witnesses(Category::InverseTrig, &equation, &solution).is_ok());
        let wrong = SolutionSet::from_points(vec![Real::int(2)]);
        assert!(check_witnesses(Category::InverseTrig, &equation, &wrong).is_err());
    }
}

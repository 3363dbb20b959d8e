//! # Solution Sets
//!
//! A solution set is a union of integer-indexed families
//! `{base + period·n : n ∈ ℤ}` plus finitely many isolated points. Unions
//! drop duplicate families and families contained in another one, and merge
//! pairs of pure-angle families that interleave at half their period.
//!
//! ## Example
//!
//! ```rust
//! use trig_core::algebra::angle::Angle;
//! use trig_core::algebra::solution::{Family, Phase, SolutionSet};
//!
//! let zeros = SolutionSet::from_families(vec![
//!     Family::new(Phase::angle(Angle::ZERO), Angle::PI),
//!     Family::new(Phase::angle(Angle::PI), Angle::pi_frac(2, 1)),
//! ]);
//! // {2πn + π} ⊂ {πn}
//! assert_eq!(zeros.families().len(), 1);
//! assert_eq!(zeros.markup(), "{pi n | n in ZZ}");
//! ```

use serde::{Deserialize, Serialize};

use super::angle::Angle;
use super::expr::Arg;
use super::functions::InverseFn;
use super::number::Real;
use super::rational::Rational;

/// Integer parameter values used for witness checks
pub const WITNESS_INDICES: [i64; 4] = [-1, 0, 1, 2];

// =============================================================================
// Phase: the base point of a family
// =============================================================================

/// `coef · func(value)` for a non-tabulated inverse value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcTerm {
    pub coef: Rational,
    pub func: InverseFn,
    pub value: Real,
}

impl ArcTerm {
    fn markup(&self) -> String {
        let call = format!("{}({})", self.func.markup(), self.value.markup());
        let sign = if self.coef.is_negative() { "-" } else { "" };
        let (num, den) = (self.coef.numer().abs(), self.coef.denom());
        match (num, den) {
            (1, 1) => format!("{}{}", sign, call),
            (n, 1) => format!("{}{} {}", sign, n, call),
            (1, d) => format!("{}frac({}, {})", sign, call, d),
            (n, d) => format!("{}frac({} {}, {})", sign, n, call, d),
        }
    }
}

/// Base point `angle + coef·func(value)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub angle: Angle,
    pub arc: Option<ArcTerm>,
}

impl Phase {
    pub fn angle(angle: Angle) -> Self {
        Phase { angle, arc: None }
    }

    /// Principal value of `func(value)`: a tabulated angle when one exists,
    /// otherwise a symbolic term with a non-negative argument.
    pub fn principal(func: InverseFn, value: &Real) -> Self {
        if let Some(angle) = value.exact().and_then(|v| func.exact(v)) {
            return Phase::angle(angle);
        }
        let arc = |coef: i64, value: Real| {
            Some(ArcTerm {
                coef: Rational::int(coef),
                func,
                value,
            })
        };
        if !value.is_negative() {
            return Phase {
                angle: Angle::ZERO,
                arc: arc(1, value.clone()),
            };
        }
        match func {
            // odd functions: f(-v) = -f(v)
            InverseFn::Arcsin | InverseFn::Arctan => Phase {
                angle: Angle::ZERO,
                arc: arc(-1, value.neg()),
            },
            // f(-v) = π - f(v)
            InverseFn::Arccos | InverseFn::Arccot => Phase {
                angle: Angle::PI,
                arc: arc(-1, value.neg()),
            },
        }
    }

    pub fn is_pure(&self) -> bool {
        self.arc.is_none()
    }

    pub fn neg(&self) -> Self {
        Phase {
            angle: -self.angle,
            arc: self.arc.as_ref().map(|a| ArcTerm {
                coef: -a.coef,
                ..a.clone()
            }),
        }
    }

    pub fn shift(&self, by: Angle) -> Self {
        Phase {
            angle: self.angle + by,
            arc: self.arc.clone(),
        }
    }

    /// Divide by a nonzero rational
    pub fn div(&self, k: Rational) -> Option<Self> {
        let inv = k.recip()?;
        Some(Phase {
            angle: self.angle.scale(inv),
            arc: self.arc.as_ref().map(|a| ArcTerm {
                coef: a.coef * inv,
                ..a.clone()
            }),
        })
    }

    pub fn to_f64(&self) -> f64 {
        let arc = self
            .arc
            .as_ref()
            .map(|a| a.coef.to_f64() * a.func.eval(a.value.to_f64()))
            .unwrap_or(0.0);
        self.angle.to_f64() + arc
    }

    pub fn is_zero(&self) -> bool {
        self.arc.is_none() && self.angle.is_zero()
    }

    pub fn markup(&self) -> String {
        match &self.arc {
            None => self.angle.markup(),
            Some(arc) => {
                let arc_markup = arc.markup();
                if self.angle.is_zero() {
                    arc_markup
                } else if let Some(rest) = arc_markup.strip_prefix('-') {
                    format!("{} - {}", self.angle.markup(), rest)
                } else {
                    format!("{} + {}", self.angle.markup(), arc_markup)
                }
            }
        }
    }
}

// =============================================================================
// Family
// =============================================================================

/// `{base + period·n : n ∈ ℤ}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub base: Phase,
    pub period: Angle,
}

impl Family {
    /// Normalizes the period to be positive and, for pure angles, centers
    /// the base in `(-period/2, period/2]`.
    pub fn new(base: Phase, period: Angle) -> Self {
        let period = if period.is_negative() { -period } else { period };
        let base = if base.is_pure() {
            Phase::angle(base.angle.centered(&period))
        } else {
            base
        };
        Family { base, period }
    }

    /// Map a family of `t = k·x + b` solutions to the `x` solutions
    pub fn through_arg(&self, arg: &Arg) -> Option<Family> {
        let base = self.base.shift(-arg.b).div(arg.k)?;
        let period = self.period.div(arg.k)?;
        Some(Family::new(base, period))
    }

    /// Value at integer parameter `n`
    pub fn at(&self, n: i64) -> f64 {
        self.base.to_f64() + self.period.to_f64() * n as f64
    }

    /// Exact member at `n` for a pure-angle base
    pub fn exact_at(&self, n: i64) -> Option<Angle> {
        self.base
            .is_pure()
            .then(|| self.base.angle + self.period.scale(Rational::int(n)))
    }

    /// Whether every member of `other` belongs to this family
    pub fn contains(&self, other: &Family) -> bool {
        if self.base.arc != other.base.arc {
            return false;
        }
        let period_ok = other.period.multiple_of(&self.period).is_some_and(|m| m >= 1);
        let offset_ok = (other.base.angle - self.base.angle)
            .multiple_of(&self.period)
            .is_some();
        period_ok && offset_ok
    }

    /// `base + period n` in the integer variable `var`
    pub fn markup_in(&self, var: &str) -> String {
        let step = self.period.markup_times(var);
        if self.base.is_zero() {
            step
        } else {
            format!("{} + {}", self.base.markup(), step)
        }
    }

    pub fn markup(&self) -> String {
        self.markup_in("n")
    }
}

/// Merge two pure families of equal period whose bases differ by half of it
fn merge_pair(a: &Family, b: &Family) -> Option<Family> {
    if !a.base.is_pure() || !b.base.is_pure() || a.period != b.period {
        return None;
    }
    let half = a.period.scale(Rational::new(1, 2));
    let diff = b.base.angle - a.base.angle;
    let odd_halves = diff
        .multiple_of(&half)
        .is_some_and(|m| m.rem_euclid(2) == 1);
    odd_halves.then(|| Family::new(a.base.clone(), half))
}

// =============================================================================
// SolutionSet
// =============================================================================

/// A member of a solution set to substitute back into its equation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Witness {
    /// Member of a pure-angle family
    Exact(Angle),
    Approx(f64),
}

impl Witness {
    pub fn to_f64(&self) -> f64 {
        match self {
            Witness::Exact(angle) => angle.to_f64(),
            Witness::Approx(x) => *x,
        }
    }
}

/// All real solutions of an equation in `x`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SolutionSet {
    families: Vec<Family>,
    points: Vec<Real>,
}

impl SolutionSet {
    pub fn empty() -> Self {
        SolutionSet::default()
    }

    pub fn from_families(families: Vec<Family>) -> Self {
        let mut set = SolutionSet::empty();
        for family in families {
            set.insert_family(family);
        }
        set
    }

    pub fn from_points(points: Vec<Real>) -> Self {
        let mut set = SolutionSet::empty();
        for p in points {
            set.insert_point(p);
        }
        set
    }

    pub fn families(&self) -> &[Family] {
        &self.families
    }

    pub fn points(&self) -> &[Real] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty() && self.points.is_empty()
    }

    pub fn union(mut self, other: SolutionSet) -> SolutionSet {
        for family in other.families {
            self.insert_family(family);
        }
        for point in other.points {
            self.insert_point(point);
        }
        self
    }

    pub fn union_all(sets: impl IntoIterator<Item = SolutionSet>) -> SolutionSet {
        sets.into_iter().fold(SolutionSet::empty(), SolutionSet::union)
    }

    fn insert_family(&mut self, family: Family) {
        if self.families.iter().any(|f| f.contains(&family)) {
            return;
        }
        self.families.retain(|f| !family.contains(f));
        if let Some(pos) = self.families.iter().position(|f| merge_pair(f, &family).is_some()) {
            let existing = self.families.remove(pos);
            if let Some(merged) = merge_pair(&existing, &family) {
                self.insert_family(merged);
            }
            return;
        }
        self.families.push(family);
    }

    fn insert_point(&mut self, point: Real) {
        if !self.points.contains(&point) {
            self.points.push(point);
            self.points.sort_by(|a, b| a.to_f64().total_cmp(&b.to_f64()));
        }
    }

    /// Concrete members for substitution checks
    pub fn witnesses(&self) -> Vec<f64> {
        let mut out: Vec<f64> = self
            .families
            .iter()
            .flat_map(|f| WITNESS_INDICES.iter().map(move |&n| f.at(n)))
            .collect();
        out.extend(self.points.iter().map(Real::to_f64));
        out
    }

    /// Like [`SolutionSet::witnesses`], keeping the exact angle of members
    /// of pure-angle families
    pub fn tagged_witnesses(&self) -> Vec<Witness> {
        let mut out: Vec<Witness> = self
            .families
            .iter()
            .flat_map(|f| {
                WITNESS_INDICES
                    .iter()
                    .map(move |&n| f.exact_at(n).map_or(Witness::Approx(f.at(n)), Witness::Exact))
            })
            .collect();
        out.extend(self.points.iter().map(|p| Witness::Approx(p.to_f64())));
        out
    }

    /// Typst math markup; `emptyset` when there are no solutions
    pub fn markup(&self) -> String {
        if self.is_empty() {
            return "emptyset".to_string();
        }
        let mut parts: Vec<String> = self
            .families
            .iter()
            .map(|f| format!("{{{} | n in ZZ}}", f.markup()))
            .collect();
        if !self.points.is_empty() {
            let points: Vec<String> = self.points.iter().map(Real::markup).collect();
            parts.push(format!("{{{}}}", points.join(", ")));
        }
        parts.join(" union ")
    }
}

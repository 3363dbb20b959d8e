//! End-to-end checks over every registered category: bulk generation
//! properties, replay determinism and the worked scenarios.

use std::collections::HashSet;

use trig_core::algebra::{Angle, InverseFn, Surd};
use trig_core::config::GeneratorConfig;
use trig_core::equations::homogeneous::Homogeneous;
use trig_core::equations::inverse_trig::{Inner, InverseTrig};
use trig_core::equations::linear_combination::{Form, LinearCombination};
use trig_core::equations::tan_cot_sum::TanCotSum;
use trig_core::instance::{check_witnesses, EquationInstance, Problem};
use trig_core::{Category, StepKind, ALL_CATEGORIES};

const INSTANCES_PER_CATEGORY: u64 = 1000;

// ---------------------------------------------------------------------------
// Bulk properties
// ---------------------------------------------------------------------------

fn generate(category: Category, config: &GeneratorConfig, index: u64) -> EquationInstance {
    let mut rng = config.rng_for(index);
    category
        .generate(&mut rng, config)
        .unwrap_or_else(|e| panic!("category {} instance {}: {}", category.key(), index, e))
}

#[test]
fn every_category_generates_consistent_instances() {
    let config = GeneratorConfig::seeded(20240601);
    for &category in ALL_CATEGORIES {
        let mut distinct = HashSet::new();
        for index in 0..INSTANCES_PER_CATEGORY {
            let instance = generate(category, &config, index);
            assert_eq!(instance.category(), category);
            assert!(instance.attempts() >= 1 && instance.attempts() <= config.max_attempts);

            let equation = instance.equation().expect("equation set");
            let solution = instance.solution().expect("solution set");
            assert_ne!(equation.lhs.markup(), equation.rhs.markup());
            assert!(equation.markup().contains('x'), "{}", equation.markup());

            // substitute n = -1, 0, 1, 2 of every family once more
            check_witnesses(category, equation, solution).unwrap();

            let steps = instance.steps();
            assert!(!steps.is_empty());
            let last = steps.last().unwrap();
            assert_eq!(last.kind, StepKind::Math);
            assert_eq!(last.markup, instance.solution_markup());

            distinct.insert(instance.equation_markup());
        }
        assert!(
            distinct.len() > 1,
            "category {} never varied its equation",
            category.key()
        );
    }
}

#[test]
fn markup_accessors_are_idempotent() {
    let config = GeneratorConfig::seeded(5);
    for &category in ALL_CATEGORIES {
        let instance = generate(category, &config, 0);
        assert_eq!(instance.equation_markup(), instance.equation_markup());
        assert_eq!(instance.solution_markup(), instance.solution_markup());
        let before: Vec<_> = instance.steps().to_vec();
        let _ = instance.solution_markup();
        assert_eq!(instance.steps(), before.as_slice());
    }
}

#[test]
fn replay_regenerates_a_single_instance() {
    let config = GeneratorConfig::seeded(77);
    for &category in ALL_CATEGORIES {
        let original = generate(category, &config, 41);
        let replayed = generate(category, &config, 41);
        assert_eq!(original.equation_markup(), replayed.equation_markup());
        assert_eq!(original.steps(), replayed.steps());
        assert_eq!(original.parameters(), replayed.parameters());
        assert_ne!(original.id(), replayed.id());
    }
}

#[test]
fn instances_survive_json() {
    let config = GeneratorConfig::seeded(3);
    for &category in ALL_CATEGORIES {
        let instance = generate(category, &config, 7);
        let json = serde_json::to_string(&instance).unwrap();
        let back: EquationInstance = serde_json::from_str(&json).unwrap();
        assert_eq!(back, instance);
        assert_eq!(back.solution_markup(), instance.solution_markup());
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn homogeneous_roots_two_and_half() {
    let p = Homogeneous::new(Surd::int(2), Surd::frac(1, 2));
    assert_eq!(
        p.equation().markup(),
        "sin^2 (x) - frac(5, 2) sin(x) cos(x) + cos^2 (x) = 0"
    );
    let instance = EquationInstance::from_problem(&p, 1).unwrap();
    let families = instance.solution().unwrap().families();
    assert_eq!(families.len(), 2);
    assert!(instance.solution_markup().contains("arctan(2) + pi n"));
    assert!(instance.solution_markup().contains("arctan(frac(1, 2)) + pi n"));
}

#[test]
fn linear_combination_sqrt3_one_one() {
    let p = LinearCombination::new(Form::SinSum, Angle::pi_frac(1, 6), Surd::int(2), Surd::frac(1, 2));
    assert_eq!(p.equation().markup(), "sqrt(3) sin(x) + cos(x) = 1");
    let instance = EquationInstance::from_problem(&p, 1).unwrap();
    let steps = instance.steps();
    assert!(steps.iter().any(|s| s.markup == "D = sqrt(3 + 1) = 2"));
    assert!(steps.iter().any(|s| s.markup.contains("sin(x + frac(pi, 6)) = frac(1, 2)")));
    assert_eq!(instance.solution().unwrap().families().len(), 2);
}

#[test]
fn inverse_trig_rejects_out_of_domain_value() {
    for inner in [Inner::Linear { a: 1, x1: 0 }, Inner::Quadratic { a: 1, x1: 1, x2: 2 }] {
        assert!(InverseTrig::try_new(InverseFn::Arccos, Surd::int(2), 1, inner).is_err());
        assert!(InverseTrig::try_new(InverseFn::Arcsin, Surd::int(-2), 2, inner).is_err());
    }
}

#[test]
fn tan_cot_sum_discards_small_root() {
    let p = TanCotSum::new(Surd::int(2), Surd::ONE);
    let instance = EquationInstance::from_problem(&p, 1).unwrap();
    assert!(instance.steps().iter().any(|s| s.markup.contains("abs(1) < 2")));
    assert_eq!(instance.solution_markup(), "{frac(pi, 4) + pi n | n in ZZ}");
}

//! Invariants of the projector over random model-satisfied cubes.
//!
//! Every generated literal is built to hold in the generated model, so a
//! successful projection must satisfy:
//! - no residual literal mentions an eliminated variable,
//! - every residual literal holds in the model,
//! - identical inputs give identical outputs,
//! - re-projecting the output with no variables is the identity.

use num_bigint::BigInt;
use proptest::prelude::*;

use mbproj::ast::{Term, TermManager};
use mbproj::model::{Model, Value};
use mbproj::project::project_literals;

const NUM_INT_VARS: usize = 6;

/// Shape of one generated literal.
#[derive(Debug, Clone)]
struct LitSpec {
    /// Coefficients over the integer variable pool.
    coeffs: Vec<i8>,
    /// Relation selector.
    rel: u8,
    /// Slack away from the model value, keeps the literal true.
    slack: u8,
}

fn lit_spec() -> impl Strategy<Value = LitSpec> {
    (
        proptest::collection::vec(-3i8..=3, NUM_INT_VARS),
        0u8..7,
        0u8..4,
    )
        .prop_map(|(coeffs, rel, slack)| LitSpec { coeffs, rel, slack })
}

struct Setup {
    tm: TermManager,
    mdl: Model,
    elim: Vec<Term>,
    literals: Vec<Term>,
}

/// Build the cube described by `specs` over a model assigning `values`
/// to the integer pool and `bools` to two Boolean variables. The first
/// three integer variables and the first Boolean are eliminated.
fn build(specs: &[LitSpec], values: &[i64; NUM_INT_VARS], bools: &[bool; 2]) -> Setup {
    let mut tm = TermManager::new();
    let int = tm.sorts.int_sort;
    let vars: Vec<Term> = (0..NUM_INT_VARS)
        .map(|i| tm.mk_var(format!("v{i}"), int))
        .collect();
    let bvars: Vec<Term> = (0..2)
        .map(|i| tm.mk_var(format!("p{i}"), tm.sorts.bool_sort))
        .collect();

    let mut mdl = Model::new();
    for (v, val) in vars.iter().zip(values) {
        mdl.assign(*v, Value::int(*val));
    }
    for (p, val) in bvars.iter().zip(bools) {
        mdl.assign(*p, Value::Bool(*val));
    }

    let mut literals = Vec::new();
    for spec in specs {
        let s = i64::from(spec.slack);
        match spec.rel {
            // Boolean literal with the polarity that holds
            5 => {
                let p = bvars[spec.slack as usize % 2];
                let truth = bools[spec.slack as usize % 2];
                literals.push(if truth { p } else { p.negate() });
            }
            // disjunction whose first disjunct holds
            6 => {
                let p = bvars[0];
                let first = if bools[0] { p } else { p.negate() };
                let second = if spec.slack % 2 == 0 {
                    bvars[1]
                } else {
                    bvars[1].negate()
                };
                literals.push(tm.mk_or(vec![first, second]));
            }
            // linear relation between a combination and a constant
            rel => {
                let mut parts = Vec::new();
                for (i, &c) in spec.coeffs.iter().enumerate() {
                    if c != 0 {
                        let k = tm.mk_int(BigInt::from(c));
                        parts.push(tm.mk_mul(k, vars[i]));
                    }
                }
                if parts.is_empty() {
                    continue;
                }
                let pt = tm.mk_add(parts);
                let v: i64 = spec
                    .coeffs
                    .iter()
                    .zip(values)
                    .map(|(&c, &val)| i64::from(c) * val)
                    .sum();
                let lit = match rel {
                    0 => {
                        let c = tm.mk_int((v - s).into());
                        tm.mk_ge(pt, c)
                    }
                    1 => {
                        let c = tm.mk_int((v + s).into());
                        tm.mk_le(pt, c)
                    }
                    2 => {
                        let c = tm.mk_int(v.into());
                        tm.mk_eq(pt, c)
                    }
                    3 => {
                        let c = tm.mk_int((v - s - 1).into());
                        tm.mk_gt(pt, c)
                    }
                    _ => {
                        let c = tm.mk_int((v + s + 1).into());
                        tm.mk_eq(pt, c).negate()
                    }
                };
                literals.push(lit);
            }
        }
    }

    let mut elim = vars[..3].to_vec();
    elim.push(bvars[0]);
    Setup {
        tm,
        mdl,
        elim,
        literals,
    }
}

fn specs_strategy() -> impl Strategy<Value = Vec<LitSpec>> {
    proptest::collection::vec(lit_spec(), 0..8)
}

fn values_strategy() -> impl Strategy<Value = [i64; NUM_INT_VARS]> {
    proptest::array::uniform6(-10i64..=10)
}

proptest! {
    /// No residual literal mentions an eliminated variable, and every
    /// residual literal still holds in the model.
    #[test]
    fn projection_is_sound(
        specs in specs_strategy(),
        values in values_strategy(),
        bools in proptest::array::uniform2(proptest::bool::ANY),
    ) {
        let Setup { mut tm, mdl, elim, literals } = build(&specs, &values, &bools);
        let mut out = Vec::new();
        project_literals(&mdl, &mut tm, &literals, &elim, &mut out).unwrap();
        for &lit in &out {
            prop_assert!(mdl.holds(&tm, lit).unwrap(), "residual {lit} is false in the model");
            for &x in &elim {
                prop_assert!(!tm.mentions_var(lit, x), "residual {lit} mentions {x}");
            }
        }
    }

    /// Identical inputs produce identical outputs, down to raw term ids.
    #[test]
    fn projection_is_deterministic(
        specs in specs_strategy(),
        values in values_strategy(),
        bools in proptest::array::uniform2(proptest::bool::ANY),
    ) {
        let Setup { mut tm, mdl, elim, literals } = build(&specs, &values, &bools);
        let mut out1 = Vec::new();
        project_literals(&mdl, &mut tm, &literals, &elim, &mut out1).unwrap();

        let Setup { tm: mut tm2, mdl: mdl2, elim: elim2, literals: literals2 } =
            build(&specs, &values, &bools);
        let mut out2 = Vec::new();
        project_literals(&mdl2, &mut tm2, &literals2, &elim2, &mut out2).unwrap();

        let raw1: Vec<u32> = out1.iter().map(|t| t.raw()).collect();
        let raw2: Vec<u32> = out2.iter().map(|t| t.raw()).collect();
        prop_assert_eq!(raw1, raw2);
    }

    /// Projecting the output with an empty variable set is the identity.
    #[test]
    fn projection_is_idempotent(
        specs in specs_strategy(),
        values in values_strategy(),
        bools in proptest::array::uniform2(proptest::bool::ANY),
    ) {
        let Setup { mut tm, mdl, elim, literals } = build(&specs, &values, &bools);
        let mut out = Vec::new();
        project_literals(&mdl, &mut tm, &literals, &elim, &mut out).unwrap();

        let mut again = Vec::new();
        project_literals(&mdl, &mut tm, &out, &[], &mut again).unwrap();
        prop_assert_eq!(again, out);
    }
}

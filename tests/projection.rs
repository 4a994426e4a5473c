//! End-to-end projection scenarios.
//!
//! Each test sets up a cube, a model satisfying it, and a variable set,
//! then checks the residual cube and the error status of the projector.

use mbproj::ast::{SortKind, Term, TermManager, TermTag};
use mbproj::model::{Model, Value};
use mbproj::project::{Projector, project_literals};
use mbproj::ProjError;

fn assert_no_vars(tm: &TermManager, out: &[Term], vars: &[Term]) {
    for &lit in out {
        for &x in vars {
            assert!(
                !tm.mentions_var(lit, x),
                "output literal {lit} mentions eliminated variable {x}"
            );
        }
    }
}

fn assert_holds(tm: &TermManager, mdl: &Model, out: &[Term]) {
    for &lit in out {
        assert!(mdl.holds(tm, lit).unwrap(), "output literal {lit} is false");
    }
}

/// Pure substitution: `x = y + 1` and `P(x)` project to `P(y + 1)`.
#[test]
fn pure_substitution() {
    let mut tm = TermManager::new();
    let int = tm.sorts.int_sort;
    let bool_sort = tm.sorts.bool_sort;
    let x = tm.mk_var("x", int);
    let y = tm.mk_var("y", int);
    let p_sort = tm.sorts.intern(SortKind::Function(vec![int], bool_sort));
    let p = tm.mk_var("P", p_sort);

    let one = tm.mk_int(1.into());
    let yp1 = tm.mk_add(vec![y, one]);
    let lit1 = tm.mk_eq(x, yp1);
    let lit2 = tm.mk_app(p, vec![x]);

    let mut mdl = Model::new();
    mdl.assign(x, Value::int(5));
    mdl.assign(y, Value::int(4));
    mdl.assign(
        p,
        Value::Function {
            mappings: vec![(vec![Value::int(5)], Value::Bool(true))],
            default: Some(Box::new(Value::Bool(false))),
        },
    );

    let mut out = Vec::new();
    project_literals(&mdl, &mut tm, &[lit1, lit2], &[x], &mut out).unwrap();

    let expected = tm.mk_app(p, vec![yp1]);
    assert_eq!(out, vec![expected]);
    assert_no_vars(&tm, &out, &[x]);
    assert_holds(&tm, &mdl, &out);
}

/// Linear arithmetic: bounds on `x` combine into `a <= b`.
#[test]
fn linear_arithmetic_projection() {
    let mut tm = TermManager::new();
    let x = tm.mk_var("x", tm.sorts.int_sort);
    let a = tm.mk_var("a", tm.sorts.int_sort);
    let b = tm.mk_var("b", tm.sorts.int_sort);
    let literals = vec![tm.mk_ge(x, a), tm.mk_le(x, b), tm.mk_le(a, b)];

    let mut mdl = Model::new();
    mdl.assign(a, Value::int(1));
    mdl.assign(b, Value::int(3));
    mdl.assign(x, Value::int(2));

    let mut out = Vec::new();
    project_literals(&mdl, &mut tm, &literals, &[x], &mut out).unwrap();

    assert_eq!(out, vec![tm.mk_le(a, b)]);
    assert_no_vars(&tm, &out, &[x]);
    assert_holds(&tm, &mdl, &out);
}

/// Value closure: a Boolean survivor is replaced by its model value and
/// the literal collapses to `true`.
#[test]
fn value_closure_boolean() {
    let mut tm = TermManager::new();
    let p = tm.mk_var("p", tm.sorts.bool_sort);
    let q = tm.mk_var("q", tm.sorts.bool_sort);
    let lit = tm.mk_or(vec![p, q]);

    let mut mdl = Model::new();
    mdl.assign(p, Value::Bool(true));
    mdl.assign(q, Value::Bool(false));

    let mut out = Vec::new();
    project_literals(&mdl, &mut tm, &[lit], &[p], &mut out).unwrap();
    assert!(out.is_empty());
}

/// Non-linear input is rejected when the literal is added.
#[test]
fn non_linear_rejection() {
    let mut tm = TermManager::new();
    let x = tm.mk_var("x", tm.sorts.int_sort);
    let xx = tm.mk_mul(x, x);
    let zero = tm.mk_int(0.into());
    let lit = tm.mk_ge(xx, zero);

    let mut mdl = Model::new();
    mdl.assign(x, Value::int(3));

    let mut out = Vec::new();
    let err = project_literals(&mdl, &mut tm, &[lit], &[x], &mut out).unwrap_err();
    assert_eq!(err, ProjError::NonLinear(TermTag::PowerProduct));
    assert!(out.is_empty(), "output must stay untouched on error");
}

/// Mixed cube: a generic equality eliminates `x`, arithmetic projection
/// eliminates `y`.
#[test]
fn mixed_generic_and_arithmetic() {
    let mut tm = TermManager::new();
    let int = tm.sorts.int_sort;
    let s = tm.sorts.intern(SortKind::Uninterpreted("S".into()));
    let x = tm.mk_var("x", s);
    let y = tm.mk_var("y", int);
    let z = tm.mk_var("z", int);
    let w = tm.mk_var("w", int);
    let f_sort = tm.sorts.intern(SortKind::Function(vec![int], s));
    let f = tm.mk_var("f", f_sort);
    let fz = tm.mk_app(f, vec![z]);

    let zero = tm.mk_int(0.into());
    let literals = vec![tm.mk_eq(x, fz), tm.mk_ge(y, zero), tm.mk_le(y, w)];

    let fz_val = Value::Uninterpreted { sort: s, id: 0 };
    let mut mdl = Model::new();
    mdl.assign(x, fz_val.clone());
    mdl.assign(y, Value::int(2));
    mdl.assign(z, Value::int(7));
    mdl.assign(w, Value::int(5));
    mdl.assign(
        f,
        Value::Function {
            mappings: vec![(vec![Value::int(7)], fz_val)],
            default: None,
        },
    );

    let mut out = Vec::new();
    project_literals(&mdl, &mut tm, &literals, &[x, y], &mut out).unwrap();

    assert_eq!(out, vec![tm.mk_ge(w, zero)]);
    assert_no_vars(&tm, &out, &[x, y]);
    assert_holds(&tm, &mdl, &out);
}

/// Cycle breaking: `x = y` and `2y = x + y` each propose a mapping and
/// together form a cycle. The first mapping survives and the other
/// variable reaches the later phases.
#[test]
fn cycle_breaking() {
    let mut tm = TermManager::new();
    let x = tm.mk_var("x", tm.sorts.int_sort);
    let y = tm.mk_var("y", tm.sorts.int_sort);
    let two = tm.mk_int(2.into());
    let two_y = tm.mk_mul(two, y);
    let x_plus_y = tm.mk_add(vec![x, y]);
    let lit1 = tm.mk_eq(x, y);
    let lit2 = tm.mk_eq(two_y, x_plus_y);
    // two distinct atoms: a binary equality and a solved p = 0 atom
    assert_ne!(lit1, lit2);

    let mut mdl = Model::new();
    mdl.assign(x, Value::int(6));
    mdl.assign(y, Value::int(6));

    let mut proj = Projector::new(&mdl, &mut tm, &[x, y]).unwrap();
    proj.add_literal(lit1);
    proj.add_literal(lit2);
    let mut out = Vec::new();
    proj.run(&mut out).unwrap();

    // x was substituted away, y went through value closure
    assert_eq!(proj.surviving_vars(), &[y]);
    assert!(out.is_empty());
}

/// An arithmetic variable under an uninterpreted predicate is closed by
/// its model value even though the arithmetic phase eliminated it from
/// the arithmetic literals.
#[test]
fn arith_variable_under_predicate() {
    let mut tm = TermManager::new();
    let int = tm.sorts.int_sort;
    let bool_sort = tm.sorts.bool_sort;
    let x = tm.mk_var("x", int);
    let a = tm.mk_var("a", int);
    let p_sort = tm.sorts.intern(SortKind::Function(vec![int], bool_sort));
    let p = tm.mk_var("P", p_sort);
    let px = tm.mk_app(p, vec![x]);
    let lit2 = tm.mk_ge(x, a);

    let mut mdl = Model::new();
    mdl.assign(x, Value::int(5));
    mdl.assign(a, Value::int(1));
    mdl.assign(
        p,
        Value::Function {
            mappings: vec![],
            default: Some(Box::new(Value::Bool(true))),
        },
    );

    let mut out = Vec::new();
    project_literals(&mdl, &mut tm, &[px, lit2], &[x], &mut out).unwrap();

    let five = tm.mk_int(5.into());
    assert_eq!(out, vec![tm.mk_app(p, vec![five])]);
    assert_no_vars(&tm, &out, &[x]);
    assert_holds(&tm, &mdl, &out);
}

/// Bitvector values survive value closure as bitvector constants.
#[test]
fn value_closure_bitvector() {
    let mut tm = TermManager::new();
    let bv8 = tm.sorts.intern(SortKind::BitVec(8));
    let u = tm.mk_var("u", bv8);
    let w = tm.mk_var("w", bv8);
    let v = tm.mk_var("v", bv8);
    let lit = tm.mk_distinct(vec![u, w, v]);

    let mut mdl = Model::new();
    mdl.assign(u, Value::BitVector { width: 8, bits: 5.into() });
    mdl.assign(w, Value::BitVector { width: 8, bits: 6.into() });
    mdl.assign(v, Value::BitVector { width: 8, bits: 7.into() });

    let mut out = Vec::new();
    project_literals(&mdl, &mut tm, &[lit], &[u], &mut out).unwrap();

    let five = tm.mk_bv_const(8, 5.into());
    assert_eq!(out, vec![tm.mk_distinct(vec![five, w, v])]);
    assert_no_vars(&tm, &out, &[u]);
    assert_holds(&tm, &mdl, &out);
}

// ---------------------------------------------------------------------
// Boundary behaviors
// ---------------------------------------------------------------------

/// With nothing to eliminate, the cube passes through: generic literals
/// first, then arithmetic ones, each in insertion order.
#[test]
fn empty_variable_set_is_identity() {
    let mut tm = TermManager::new();
    let a = tm.mk_var("a", tm.sorts.int_sort);
    let b = tm.mk_var("b", tm.sorts.int_sort);
    let c = tm.mk_var("c", tm.sorts.int_sort);
    let le = tm.mk_le(a, b);
    let ne = tm.mk_eq(b, c).negate();
    let d = tm.mk_distinct(vec![a, b, c]);

    let mut mdl = Model::new();
    mdl.assign(a, Value::int(1));
    mdl.assign(b, Value::int(2));
    mdl.assign(c, Value::int(3));

    let mut out = Vec::new();
    project_literals(&mdl, &mut tm, &[le, ne, d], &[], &mut out).unwrap();
    // `distinct` is generic even over arithmetic arguments, so it sorts
    // before the arithmetic atoms
    assert_eq!(out, vec![d, le, ne]);
}

/// No literals: nothing to produce, no error.
#[test]
fn empty_literal_list() {
    let mut tm = TermManager::new();
    let x = tm.mk_var("x", tm.sorts.int_sort);
    let mut mdl = Model::new();
    mdl.assign(x, Value::int(0));

    let mut out = Vec::new();
    project_literals(&mdl, &mut tm, &[], &[x], &mut out).unwrap();
    assert!(out.is_empty());
}

/// Every literal reduces to `true` under the substitution.
#[test]
fn all_literals_eliminated() {
    let mut tm = TermManager::new();
    let x = tm.mk_var("x", tm.sorts.int_sort);
    let five = tm.mk_int(5.into());
    let lit = tm.mk_eq(x, five);

    let mut mdl = Model::new();
    mdl.assign(x, Value::int(5));

    let mut out = Vec::new();
    project_literals(&mdl, &mut tm, &[lit], &[x], &mut out).unwrap();
    assert!(out.is_empty());
}

/// A surviving variable without a model value is an evaluation error.
#[test]
fn unassigned_survivor_reports_eval_error() {
    let mut tm = TermManager::new();
    let p = tm.mk_var("p", tm.sorts.bool_sort);
    let q = tm.mk_var("q", tm.sorts.bool_sort);
    let r = tm.mk_var("r", tm.sorts.bool_sort);
    let lit = tm.mk_or(vec![q, r]);

    let mut mdl = Model::new();
    mdl.assign(q, Value::Bool(true));
    mdl.assign(r, Value::Bool(false));
    // p has no value

    let mut out = Vec::new();
    let err = project_literals(&mdl, &mut tm, &[lit], &[p], &mut out).unwrap_err();
    assert!(matches!(err, ProjError::EvalFailed(_)));
    assert!(out.is_empty());
}

/// A survivor whose model value is an abstract element cannot be turned
/// into a constant term.
#[test]
fn abstract_survivor_reports_convert_error() {
    let mut tm = TermManager::new();
    let s = tm.sorts.intern(SortKind::Uninterpreted("S".into()));
    let u = tm.mk_var("u", s);
    let v = tm.mk_var("v", s);
    let w = tm.mk_var("w", s);
    let lit = tm.mk_distinct(vec![u, v, w]);

    let mut mdl = Model::new();
    mdl.assign(u, Value::Uninterpreted { sort: s, id: 0 });
    mdl.assign(v, Value::Uninterpreted { sort: s, id: 1 });
    mdl.assign(w, Value::Uninterpreted { sort: s, id: 2 });

    let mut out = Vec::new();
    let err = project_literals(&mdl, &mut tm, &[lit], &[u], &mut out).unwrap_err();
    assert_eq!(err, ProjError::ConvertFailed);
    assert!(out.is_empty());
}

/// The output vector is appended to, never reset.
#[test]
fn output_vector_is_appended() {
    let mut tm = TermManager::new();
    let a = tm.mk_var("a", tm.sorts.int_sort);
    let zero = tm.mk_int(0.into());
    let lit = tm.mk_ge(a, zero);

    let mut mdl = Model::new();
    mdl.assign(a, Value::int(2));

    let sentinel = tm.mk_true();
    let mut out = vec![sentinel];
    project_literals(&mdl, &mut tm, &[lit], &[], &mut out).unwrap();
    assert_eq!(out, vec![sentinel, lit]);
}

/// Strict bounds survive as strict residuals.
#[test]
fn strict_bounds_project_strictly() {
    let mut tm = TermManager::new();
    let x = tm.mk_var("x", tm.sorts.real_sort);
    let a = tm.mk_var("a", tm.sorts.real_sort);
    let b = tm.mk_var("b", tm.sorts.real_sort);
    let literals = vec![tm.mk_lt(a, x), tm.mk_lt(x, b)];

    let mut mdl = Model::new();
    mdl.assign(a, Value::int(0));
    mdl.assign(x, Value::int(1));
    mdl.assign(b, Value::int(2));

    let mut out = Vec::new();
    project_literals(&mdl, &mut tm, &literals, &[x], &mut out).unwrap();
    assert_eq!(out, vec![tm.mk_lt(a, b)]);
    assert_holds(&tm, &mdl, &out);
}

/// Projecting the output again with no variables returns it unchanged.
#[test]
fn projection_is_idempotent() {
    let mut tm = TermManager::new();
    let x = tm.mk_var("x", tm.sorts.int_sort);
    let a = tm.mk_var("a", tm.sorts.int_sort);
    let b = tm.mk_var("b", tm.sorts.int_sort);
    let literals = vec![tm.mk_ge(x, a), tm.mk_le(x, b), tm.mk_le(a, b)];

    let mut mdl = Model::new();
    mdl.assign(a, Value::int(1));
    mdl.assign(b, Value::int(3));
    mdl.assign(x, Value::int(2));

    let mut out = Vec::new();
    project_literals(&mdl, &mut tm, &literals, &[x], &mut out).unwrap();

    let mut out2 = Vec::new();
    project_literals(&mdl, &mut tm, &out, &[], &mut out2).unwrap();
    assert_eq!(out2, out);
}

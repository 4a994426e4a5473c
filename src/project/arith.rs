//! Model-Guided Virtual Substitution for Linear Arithmetic.
//!
//! Loos–Weispfenning elimination specialized to a single satisfying
//! assignment: instead of the full case split over candidate bounds, each
//! variable is substituted by the one candidate the model selects. The
//! result is a conjunction of residual atoms that avoid the eliminated
//! variables and still hold in the model.
//!
//! Constraints are kept as canonical polynomials with one of three senses:
//! `p = 0`, `p >= 0`, `p > 0`. Strict constraints arise from negated
//! atoms and survive as negated `>=` occurrences in the output.

use num_rational::BigRational;
use num_traits::{Signed, Zero};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use thiserror::Error;
use tracing::trace;

use crate::ast::{Polynomial, Term, TermKind, TermManager, TermTag};

/// Rejection of an input literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    /// A constraint mentions a variable that was never registered.
    #[error("constraint mentions unregistered variable {0}")]
    UnknownVar(Term),
    /// A constraint contains a term outside the linear fragment.
    #[error("non-linear term of kind {0:?} in constraint")]
    NonLinear(TermTag),
    /// The offered literal is not an arithmetic atom.
    #[error("term of kind {0:?} is not an arithmetic literal")]
    NotArithLiteral(TermTag),
}

/// Sense of an internal constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Sense {
    /// `p = 0`
    Eq,
    /// `p >= 0`
    Ge,
    /// `p > 0`
    Gt,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Constraint {
    poly: Polynomial,
    sense: Sense,
}

#[derive(Debug)]
struct VarInfo {
    to_elim: bool,
    value: BigRational,
}

/// A candidate bound on the variable being eliminated.
struct Bound {
    beta: Polynomial,
    value: BigRational,
    strict: bool,
}

/// Virtual-substitution projector for linear rational arithmetic.
#[derive(Debug, Default)]
pub struct ArithProjector {
    vars: FxHashMap<Term, VarInfo>,
    elim_order: Vec<Term>,
    constraints: Vec<Constraint>,
    seen: FxHashSet<Constraint>,
    closed: bool,
}

impl ArithProjector {
    /// Create an empty projector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable with its value in the model. Variables marked
    /// `to_elim` are projected out by [`eliminate`](Self::eliminate), in
    /// registration order; the rest may appear in residual atoms.
    pub fn add_var(&mut self, x: Term, to_elim: bool, value: BigRational) {
        debug_assert!(!self.closed);
        debug_assert!(!self.vars.contains_key(&x));
        self.vars.insert(x, VarInfo { to_elim, value });
        if to_elim {
            self.elim_order.push(x);
        }
    }

    /// Close the variable set. Constraints may only be added afterwards.
    pub fn close_var_set(&mut self) {
        self.closed = true;
    }

    /// Offer a literal as a constraint. Negated equalities are split into
    /// the strict inequality that holds in the model.
    pub fn add_constraint(&mut self, tm: &TermManager, lit: Term) -> Result<(), ConstraintError> {
        debug_assert!(self.closed);
        match tm.kind(lit) {
            TermKind::ArithEq(arg) => {
                let p = self.lower(tm, *arg)?;
                if lit.is_positive() {
                    self.push(Constraint { poly: p, sense: Sense::Eq });
                } else {
                    self.push_disequality(p);
                }
            }
            TermKind::ArithGe(arg) => {
                let p = self.lower(tm, *arg)?;
                if lit.is_positive() {
                    self.push(Constraint { poly: p, sense: Sense::Ge });
                } else {
                    // not (p >= 0) is -p > 0
                    self.push(Constraint { poly: p.neg(), sense: Sense::Gt });
                }
            }
            TermKind::ArithBinEq(a, b) => {
                let pa = self.lower(tm, *a)?;
                let pb = self.lower(tm, *b)?;
                let p = pa.sub(&pb);
                if lit.is_positive() {
                    self.push(Constraint { poly: p, sense: Sense::Eq });
                } else {
                    self.push_disequality(p);
                }
            }
            k => return Err(ConstraintError::NotArithLiteral(k.tag())),
        }
        Ok(())
    }

    /// View an arithmetic term as a polynomial over registered variables.
    fn lower(&self, tm: &TermManager, t: Term) -> Result<Polynomial, ConstraintError> {
        match tm.kind(t) {
            TermKind::ArithConstant(c) => Ok(Polynomial::constant(c.clone())),
            TermKind::ArithPoly(p) => {
                for x in p.vars() {
                    self.check_var(tm, x)?;
                }
                Ok(p.clone())
            }
            TermKind::Uninterpreted { .. } => {
                self.check_var(tm, t)?;
                Ok(Polynomial::from_var(t))
            }
            k => Err(ConstraintError::NonLinear(k.tag())),
        }
    }

    fn check_var(&self, tm: &TermManager, x: Term) -> Result<(), ConstraintError> {
        if self.vars.contains_key(&x) {
            Ok(())
        } else if tm.is_uninterpreted(x) {
            Err(ConstraintError::UnknownVar(x))
        } else {
            Err(ConstraintError::NonLinear(tm.tag(x)))
        }
    }

    /// The model value of a polynomial. All variables are registered once
    /// [`lower`](Self::lower) has accepted the constraint.
    fn eval(&self, p: &Polynomial) -> BigRational {
        let mut acc = p.constant_part();
        for m in p.monomials() {
            if let Some(x) = m.var {
                acc += &m.coeff * &self.vars[&x].value;
            }
        }
        acc
    }

    /// Split `p != 0` into the strict inequality true in the model.
    fn push_disequality(&mut self, p: Polynomial) {
        let v = self.eval(&p);
        debug_assert!(!v.is_zero(), "disequality is false in the model");
        if v.is_positive() {
            self.push(Constraint { poly: p, sense: Sense::Gt });
        } else {
            self.push(Constraint { poly: p.neg(), sense: Sense::Gt });
        }
    }

    fn push(&mut self, mut c: Constraint) {
        if c.poly.is_constant() {
            debug_assert!(self.constraint_holds(&c));
            return;
        }
        // normalize the leading coefficient so scaled variants coincide
        let lead = c
            .poly
            .monomials()
            .iter()
            .find_map(|m| m.var.map(|_| m.coeff.clone()))
            .unwrap_or_else(|| BigRational::from_integer(1.into()));
        let factor = match c.sense {
            Sense::Eq => lead.recip(),
            Sense::Ge | Sense::Gt => lead.abs().recip(),
        };
        c.poly = c.poly.scale(&factor);
        debug_assert!(self.constraint_holds(&c), "constraint is false in the model");
        if self.seen.insert(c.clone()) {
            self.constraints.push(c);
        }
    }

    fn constraint_holds(&self, c: &Constraint) -> bool {
        let v = self.eval(&c.poly);
        match c.sense {
            Sense::Eq => v.is_zero(),
            Sense::Ge => !v.is_negative(),
            Sense::Gt => v.is_positive(),
        }
    }

    /// Project out every to-eliminate variable, in registration order.
    pub fn eliminate(&mut self) {
        debug_assert!(self.closed);
        let order = self.elim_order.clone();
        for x in order {
            self.eliminate_var(x);
        }
    }

    fn eliminate_var(&mut self, x: Term) {
        let mut touching = Vec::new();
        let mut rest = Vec::new();
        for c in self.constraints.drain(..) {
            if c.poly.mentions(x) {
                touching.push(c);
            } else {
                rest.push(c);
            }
        }
        self.constraints = rest;
        self.seen = self.constraints.iter().cloned().collect();
        if touching.is_empty() {
            return;
        }
        trace!(var = %x, constraints = touching.len(), "eliminating arithmetic variable");

        // an equality pins the variable exactly; take the earliest one
        if let Some(i) = touching.iter().position(|c| c.sense == Sense::Eq) {
            let eq = touching.remove(i);
            let (c, rest) = eq.poly.split_var(x);
            let image = rest.scale(&-c.recip());
            for t in touching {
                let poly = t.poly.subst_var(x, &image);
                self.push(Constraint { poly, sense: t.sense });
            }
            return;
        }

        // otherwise split into bounds on x
        let mut lowers: Vec<Bound> = Vec::new();
        let mut uppers: Vec<Bound> = Vec::new();
        for t in &touching {
            let (c, rest) = t.poly.split_var(x);
            let beta = rest.scale(&-c.recip());
            let value = self.eval(&beta);
            let strict = t.sense == Sense::Gt;
            let bound = Bound { beta, value, strict };
            if c.is_positive() {
                lowers.push(bound);
            } else {
                uppers.push(bound);
            }
        }
        // a side without bounds lets x escape to infinity: everything
        // touching x is satisfiable there and drops
        if lowers.is_empty() || uppers.is_empty() {
            return;
        }

        // substitute from the smaller side
        if lowers.len() <= uppers.len() {
            let chosen = Self::pick(&lowers, Ordering::Greater);
            self.combine(&lowers, &uppers, chosen, true);
        } else {
            let chosen = Self::pick(&uppers, Ordering::Less);
            self.combine(&uppers, &lowers, chosen, false);
        }
    }

    /// Index of the model-tightest bound: extremal value in the given
    /// direction, strict bounds before weak ones at equal value, earliest
    /// insertion on remaining ties.
    fn pick(bounds: &[Bound], direction: Ordering) -> usize {
        let mut best = 0;
        for (i, b) in bounds.iter().enumerate().skip(1) {
            let better = match b.value.cmp(&bounds[best].value) {
                o if o == direction => true,
                Ordering::Equal => b.strict && !bounds[best].strict,
                _ => false,
            };
            if better {
                best = i;
            }
        }
        best
    }

    /// Emit the residuals of substituting the chosen bound for the
    /// variable. `same` holds the bounds on the chosen side, `opposite`
    /// the bounds facing it; `lower_side` tells which is which.
    fn combine(&mut self, same: &[Bound], opposite: &[Bound], chosen: usize, lower_side: bool) {
        let ch = &same[chosen];
        for (i, b) in same.iter().enumerate() {
            if i == chosen {
                continue;
            }
            // chosen dominates its own side; strict peers of a weak
            // choice must stay strictly apart
            let sense = if b.strict && !ch.strict { Sense::Gt } else { Sense::Ge };
            let poly = if lower_side {
                ch.beta.sub(&b.beta)
            } else {
                b.beta.sub(&ch.beta)
            };
            self.push(Constraint { poly, sense });
        }
        for b in opposite {
            let sense = if b.strict || ch.strict { Sense::Gt } else { Sense::Ge };
            let poly = if lower_side {
                b.beta.sub(&ch.beta)
            } else {
                ch.beta.sub(&b.beta)
            };
            self.push(Constraint { poly, sense });
        }
    }

    /// Append the residual constraints as literals, in constraint order.
    /// Atoms that fold to `true` are dropped.
    pub fn get_formula_vector(&mut self, tm: &mut TermManager, out: &mut Vec<Term>) {
        let mut emitted = FxHashSet::default();
        for c in &self.constraints {
            let lit = match c.sense {
                Sense::Eq => tm.mk_arith_eq_atom(c.poly.clone()),
                Sense::Ge => tm.mk_arith_ge_atom(c.poly.clone()),
                // p > 0 is the negation of -p >= 0
                Sense::Gt => tm.mk_arith_ge_atom(c.poly.neg()).negate(),
            };
            if lit == tm.mk_true() {
                continue;
            }
            debug_assert!(lit != tm.mk_false(), "residual atom is false");
            if emitted.insert(lit) {
                out.push(lit);
            }
        }
    }
}

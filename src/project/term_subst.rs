//! Total-Map Term Substitution.
//!
//! Applies a finite map from uninterpreted constants to replacement terms,
//! rebuilding composites through the term manager so that the usual
//! simplifications fire (literals that become `true` fold away at the
//! call site). The substitution is simultaneous: replacements are not
//! rewritten again.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::ast::{Polynomial, Term, TermKind, TermManager};

/// Recursion guard for pathological term nesting.
const MAX_DEPTH: usize = 512;

/// Substitution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubstError {
    /// The rewrite recursed past [`MAX_DEPTH`] nested terms.
    #[error("substitution exceeded the nesting limit of {MAX_DEPTH}")]
    DepthExceeded,
}

/// A substitution from uninterpreted constants to terms.
#[derive(Debug)]
pub struct TermSubst {
    map: FxHashMap<Term, Term>,
    cache: FxHashMap<Term, Term>,
}

impl TermSubst {
    /// Build the map `vars[i] -> replacements[i]`.
    ///
    /// # Panics
    /// Panics if the slices have different lengths.
    #[must_use]
    pub fn new(vars: &[Term], replacements: &[Term]) -> Self {
        assert_eq!(vars.len(), replacements.len());
        let map = vars.iter().copied().zip(replacements.iter().copied()).collect();
        Self {
            map,
            cache: FxHashMap::default(),
        }
    }

    /// Apply the substitution to a term.
    pub fn apply(&mut self, tm: &mut TermManager, t: Term) -> Result<Term, SubstError> {
        self.apply_rec(tm, t, 0)
    }

    fn apply_rec(&mut self, tm: &mut TermManager, t: Term, depth: usize) -> Result<Term, SubstError> {
        if depth > MAX_DEPTH {
            return Err(SubstError::DepthExceeded);
        }
        let pos = t.unsigned();
        let result = if let Some(&r) = self.cache.get(&pos) {
            r
        } else {
            let r = self.rewrite_node(tm, pos, depth)?;
            self.cache.insert(pos, r);
            r
        };
        Ok(if t.is_negative() { result.negate() } else { result })
    }

    fn rewrite_node(
        &mut self,
        tm: &mut TermManager,
        t: Term,
        depth: usize,
    ) -> Result<Term, SubstError> {
        debug_assert!(t.is_positive());
        if let Some(&r) = self.map.get(&t) {
            return Ok(r);
        }
        let kind = tm.kind(t).clone();
        let d = depth + 1;
        let result = match kind {
            TermKind::BoolConst
            | TermKind::Uninterpreted { .. }
            | TermKind::ArithConstant(_)
            | TermKind::BvConst { .. } => t,
            TermKind::ArithPoly(p) => {
                let mut acc = Polynomial::constant(p.constant_part());
                for m in p.monomials() {
                    if let Some(x) = m.var {
                        let nx = self.apply_rec(tm, x, d)?;
                        acc = acc.add(&tm.term_to_poly(nx).scale(&m.coeff));
                    }
                }
                tm.poly_term(acc)
            }
            TermKind::PowerProduct(ps) => {
                let mut acc = tm.mk_int(1.into());
                for (base, exp) in ps {
                    let nb = self.apply_rec(tm, base, d)?;
                    for _ in 0..exp {
                        acc = tm.mk_mul(acc, nb);
                    }
                }
                acc
            }
            TermKind::ArithEq(arg) => {
                let na = self.apply_rec(tm, arg, d)?;
                let p = tm.term_to_poly(na);
                tm.mk_arith_eq_atom(p)
            }
            TermKind::ArithGe(arg) => {
                let na = self.apply_rec(tm, arg, d)?;
                let p = tm.term_to_poly(na);
                tm.mk_arith_ge_atom(p)
            }
            TermKind::ArithBinEq(a, b) => {
                let na = self.apply_rec(tm, a, d)?;
                let nb = self.apply_rec(tm, b, d)?;
                tm.mk_eq(na, nb)
            }
            TermKind::Ite(c, a, b) => {
                let nc = self.apply_rec(tm, c, d)?;
                let na = self.apply_rec(tm, a, d)?;
                let nb = self.apply_rec(tm, b, d)?;
                tm.mk_ite(nc, na, nb)
            }
            TermKind::Eq(a, b) => {
                let na = self.apply_rec(tm, a, d)?;
                let nb = self.apply_rec(tm, b, d)?;
                tm.mk_eq(na, nb)
            }
            TermKind::Distinct(args) => {
                let nargs = self.apply_all(tm, args, d)?;
                tm.mk_distinct(nargs)
            }
            TermKind::Or(args) => {
                let nargs = self.apply_all(tm, args, d)?;
                tm.mk_or(nargs)
            }
            TermKind::Xor(args) => {
                let nargs = self.apply_all(tm, args, d)?;
                tm.mk_xor(nargs)
            }
            TermKind::App { fun, args } => {
                let nfun = self.apply_rec(tm, fun, d)?;
                let nargs = self.apply_all(tm, args, d)?;
                tm.mk_app(nfun, nargs)
            }
        };
        Ok(result)
    }

    fn apply_all(
        &mut self,
        tm: &mut TermManager,
        args: Vec<Term>,
        depth: usize,
    ) -> Result<Vec<Term>, SubstError> {
        args.into_iter()
            .map(|a| self.apply_rec(tm, a, depth))
            .collect()
    }
}

//! Equality-Driven Variable Elimination.
//!
//! Scans literals for cheap equality substitutions `x -> u` where `x` is a
//! variable to eliminate. Images may mention other eliminable variables;
//! [`ElimSubst::remove_cycles`] then restricts the map to an acyclic
//! sub-map, keeping earlier-inserted mappings in preference to later ones.
//! Application resolves mapped variables inside images, which terminates
//! because the map is acyclic.

use num_traits::Zero;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::ast::{FALSE_TERM, TRUE_TERM, Term, TermKind, TermManager};

use super::term_subst::{SubstError, TermSubst};

/// A candidate substitution over the variables to eliminate.
#[derive(Debug)]
pub struct ElimSubst {
    vars_to_elim: FxHashSet<Term>,
    map: FxHashMap<Term, Term>,
    order: Vec<Term>,
    composed: Option<TermSubst>,
}

impl ElimSubst {
    /// Create an empty substitution over the given variable set.
    #[must_use]
    pub fn new(vars_to_elim: FxHashSet<Term>) -> Self {
        Self {
            vars_to_elim,
            map: FxHashMap::default(),
            order: Vec::new(),
            composed: None,
        }
    }

    /// Number of mapped variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check whether no variable is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The image of a variable, if mapped.
    #[must_use]
    pub fn get_map(&self, x: Term) -> Option<Term> {
        self.map.get(&x).copied()
    }

    /// Inspect a literal for an equality that eliminates a variable, and
    /// record the first admissible mapping found. With `check_cycles`,
    /// mappings that would close a cycle in the current map are refused
    /// instead of being left for [`remove_cycles`](Self::remove_cycles).
    ///
    /// Recognized shapes: generic and arithmetic binary equalities with an
    /// eliminable side, `p = 0` atoms solved for an eliminable variable of
    /// `p`, and bare Boolean variables, which map to their polarity.
    pub fn try_cheap_map(&mut self, tm: &mut TermManager, t: Term, check_cycles: bool) -> bool {
        let kind = tm.kind(t).clone();
        match kind {
            TermKind::Uninterpreted { .. }
                if tm.is_boolean(t) && self.vars_to_elim.contains(&t.unsigned()) =>
            {
                let image = if t.is_positive() { TRUE_TERM } else { FALSE_TERM };
                self.try_map(tm, t.unsigned(), image, check_cycles)
            }
            TermKind::Eq(a, b) if t.is_positive() => {
                self.try_eq_side(tm, a, b, check_cycles) || self.try_eq_side(tm, b, a, check_cycles)
            }
            TermKind::ArithBinEq(a, b) if t.is_positive() => {
                self.try_eq_side(tm, a, b, check_cycles) || self.try_eq_side(tm, b, a, check_cycles)
            }
            TermKind::ArithEq(arg) if t.is_positive() => self.try_solve_poly(tm, arg, check_cycles),
            _ => false,
        }
    }

    /// Treat `x_occ = rhs`: admissible when the (possibly negated) side is
    /// an eliminable uninterpreted constant.
    fn try_eq_side(&mut self, tm: &mut TermManager, x_occ: Term, rhs: Term, check: bool) -> bool {
        let x = x_occ.unsigned();
        if !tm.is_uninterpreted(x) || !self.vars_to_elim.contains(&x) {
            return false;
        }
        // (not x) = rhs stands for x = (not rhs)
        let image = if x_occ.is_negative() { rhs.negate() } else { rhs };
        self.try_map(tm, x, image, check)
    }

    /// Solve `p = 0` for the first eliminable variable of `p`.
    fn try_solve_poly(&mut self, tm: &mut TermManager, arg: Term, check: bool) -> bool {
        let p = tm.term_to_poly(arg);
        for m in p.monomials() {
            let Some(x) = m.var else { continue };
            if !tm.is_uninterpreted(x)
                || !self.vars_to_elim.contains(&x)
                || self.map.contains_key(&x)
            {
                continue;
            }
            let (c, rest) = p.split_var(x);
            debug_assert!(!c.is_zero());
            let image_poly = rest.scale(&-c.recip());
            let image = tm.poly_term(image_poly);
            if self.try_map(tm, x, image, check) {
                return true;
            }
        }
        false
    }

    fn try_map(&mut self, tm: &TermManager, x: Term, image: Term, check_cycles: bool) -> bool {
        debug_assert!(self.composed.is_none());
        debug_assert!(self.vars_to_elim.contains(&x));
        if self.map.contains_key(&x) || image == x {
            return false;
        }
        if check_cycles && self.reaches(tm, image, x, &self.map) {
            return false;
        }
        self.map.insert(x, image);
        self.order.push(x);
        true
    }

    /// Follow mapped variables from `start` and report whether `target`
    /// is reachable.
    fn reaches(
        &self,
        tm: &TermManager,
        start: Term,
        target: Term,
        map: &FxHashMap<Term, Term>,
    ) -> bool {
        let mut visited = FxHashSet::default();
        let mut stack: Vec<Term> = tm.collect_vars(start).into_iter().collect();
        while let Some(v) = stack.pop() {
            if v == target {
                return true;
            }
            if !visited.insert(v) {
                continue;
            }
            if let Some(&img) = map.get(&v) {
                stack.extend(tm.collect_vars(img));
            }
        }
        false
    }

    /// Restrict the map to an acyclic sub-map. Mappings are reconsidered
    /// in insertion order and kept whenever they close no cycle among the
    /// mappings already kept, so earlier mappings win ties.
    pub fn remove_cycles(&mut self, tm: &TermManager) {
        let order = std::mem::take(&mut self.order);
        let candidates = std::mem::take(&mut self.map);
        let mut kept: FxHashMap<Term, Term> = FxHashMap::default();
        let mut kept_order = Vec::with_capacity(order.len());
        for x in order {
            let image = candidates[&x];
            // keeping x -> image must not let image reach x
            kept.insert(x, image);
            if self.reaches(tm, image, x, &kept) {
                kept.remove(&x);
            } else {
                kept_order.push(x);
            }
        }
        self.map = kept;
        self.order = kept_order;
    }

    /// Apply the substitution to a term, rewriting mapped variables inside
    /// images as well. Requires an acyclic map, i.e. a prior
    /// [`remove_cycles`](Self::remove_cycles) (or cycle-checked inserts).
    pub fn apply(&mut self, tm: &mut TermManager, t: Term) -> Result<Term, SubstError> {
        if self.composed.is_none() {
            self.composed = Some(self.compose(tm)?);
        }
        self.composed
            .as_mut()
            .map(|s| s.apply(tm, t))
            .unwrap_or(Ok(t))
    }

    /// Resolve every image through the map, producing the simultaneous
    /// substitution equivalent to the recursive one.
    fn compose(&self, tm: &mut TermManager) -> Result<TermSubst, SubstError> {
        let mut resolved: FxHashMap<Term, Term> = FxHashMap::default();
        for &x in &self.order {
            self.resolve(tm, x, &mut resolved)?;
        }
        let vars: Vec<Term> = self.order.clone();
        let images: Vec<Term> = vars.iter().map(|x| resolved[x]).collect();
        Ok(TermSubst::new(&vars, &images))
    }

    fn resolve(
        &self,
        tm: &mut TermManager,
        x: Term,
        resolved: &mut FxHashMap<Term, Term>,
    ) -> Result<Term, SubstError> {
        if let Some(&r) = resolved.get(&x) {
            return Ok(r);
        }
        let img = self.map[&x];
        let mut inner: Vec<Term> = tm
            .collect_vars(img)
            .into_iter()
            .filter(|v| self.map.contains_key(v))
            .collect();
        inner.sort_unstable();
        let r = if inner.is_empty() {
            img
        } else {
            let mut images = Vec::with_capacity(inner.len());
            for &v in &inner {
                images.push(self.resolve(tm, v, resolved)?);
            }
            TermSubst::new(&inner, &images).apply(tm, img)?
        };
        resolved.insert(x, r);
        Ok(r)
    }
}

//! Model-Based Projection of Literal Cubes.
//!
//! Given a model that satisfies a conjunction of literals and a set of
//! uninterpreted constants to eliminate, the [`Projector`] produces an
//! equisatisfiable cube that avoids the eliminated variables and still
//! holds in the model. Three phases run in order:
//!
//! 1. **Generic elimination** removes variables pinned by equalities in
//!    the cube ([`elim_subst`]).
//! 2. **Arithmetic projection** eliminates the remaining arithmetic
//!    variables by model-guided virtual substitution ([`arith`]).
//! 3. **Value closure** replaces any survivors by their model values and
//!    rewrites the residual literals ([`term_subst`]).
//!
//! The first error is sticky: later phases are skipped, the output vector
//! is left untouched, and the error is returned from [`Projector::run`].

pub mod arith;
pub mod elim_subst;
pub mod term_subst;

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::ast::{TRUE_TERM, Term, TermKind, TermManager, TermTag};
use crate::error::ProjError;
use crate::model::val_to_term::value_to_term;
use crate::model::Model;

use arith::ArithProjector;
use elim_subst::ElimSubst;
use term_subst::{SubstError, TermSubst};

/// Upper limit on the number of variables to eliminate.
pub const MAX_EVARS: usize = (u32::MAX >> 2) as usize;

/// Projects a cube of literals away from a set of variables, guided by a
/// satisfying model.
///
/// Literals are added one at a time and partitioned into arithmetic atoms
/// and generic literals; [`run`](Self::run) then executes the three
/// phases and appends the residual cube to the caller's vector.
#[derive(Debug)]
pub struct Projector<'a> {
    mdl: &'a Model,
    terms: &'a mut TermManager,
    vars_to_elim: FxHashSet<Term>,
    /// Surviving eliminable variables; shrinks monotonically.
    evars: Vec<Term>,
    gen_literals: Vec<Term>,
    arith_literals: Vec<Term>,
    avars_to_keep: FxHashSet<Term>,
    /// Insertion-ordered view of `avars_to_keep`.
    arith_vars: Vec<Term>,
    flag: Option<ProjError>,
}

impl<'a> Projector<'a> {
    /// Create a projector for the given model, term manager, and
    /// variables to eliminate. Every variable must be a positive
    /// uninterpreted constant.
    pub fn new(
        mdl: &'a Model,
        terms: &'a mut TermManager,
        vars: &[Term],
    ) -> Result<Self, ProjError> {
        if vars.len() > MAX_EVARS {
            return Err(ProjError::TooManyVars { count: vars.len() });
        }
        debug_assert!(
            vars.iter().all(|&v| terms.is_uninterpreted(v)),
            "variables to eliminate must be uninterpreted constants"
        );
        Ok(Self {
            mdl,
            terms,
            vars_to_elim: vars.iter().copied().collect(),
            evars: vars.to_vec(),
            gen_literals: Vec::new(),
            arith_literals: Vec::new(),
            avars_to_keep: FxHashSet::default(),
            arith_vars: Vec::new(),
            flag: None,
        })
    }

    /// The sticky status: `None` while no error has been recorded.
    #[must_use]
    pub fn status(&self) -> Option<&ProjError> {
        self.flag.as_ref()
    }

    /// The eliminable variables no phase has removed yet.
    #[must_use]
    pub fn surviving_vars(&self) -> &[Term] {
        &self.evars
    }

    fn set_error(&mut self, e: ProjError) {
        if self.flag.is_none() {
            self.flag = Some(e);
        }
    }

    /// Add a literal of the cube. The literal must be Boolean and hold in
    /// the model (checked in debug builds). Arithmetic atoms have their
    /// variables collected for the arithmetic phase; everything else,
    /// including `distinct` over arithmetic terms, is kept generic.
    pub fn add_literal(&mut self, t: Term) {
        debug_assert!(self.terms.is_boolean(t));
        debug_assert!(
            self.mdl.holds(self.terms, t).unwrap_or(false),
            "literal must hold in the model"
        );
        if self.terms.is_arithmetic_literal(t) {
            self.add_arith_literal(t);
        } else {
            self.gen_literals.push(t);
        }
    }

    fn add_arith_literal(&mut self, t: Term) {
        match self.terms.tag(t) {
            TermTag::ArithEq | TermTag::ArithGe => {
                let arg = self.terms.arith_atom_arg(t);
                self.add_arith_term(arg);
            }
            TermTag::ArithBinEq => {
                let (a, b) = self.terms.arith_bineq_args(t);
                self.add_arith_term(a);
                self.add_arith_term(b);
            }
            _ => debug_assert!(false, "not an arithmetic literal"),
        }
        self.arith_literals.push(t);
    }

    /// Collect the variables of an argument of an arithmetic atom. The
    /// constant monomial of a polynomial carries no variable and is
    /// skipped.
    fn add_arith_term(&mut self, t: Term) {
        let vars: Vec<Term> = match self.terms.kind(t) {
            TermKind::ArithConstant(_) => Vec::new(),
            TermKind::ArithPoly(p) => p.vars().collect(),
            _ => vec![t],
        };
        for x in vars {
            self.add_arith_var(x);
        }
    }

    /// Process `x` as an arithmetic variable: eliminable variables wait
    /// for the arithmetic phase, other uninterpreted constants are
    /// recorded as variables to keep, and anything else is outside the
    /// linear fragment.
    fn add_arith_var(&mut self, x: Term) {
        debug_assert!(x.is_positive() && self.terms.is_arithmetic(x));
        if matches!(self.terms.kind(x), TermKind::Uninterpreted { .. }) {
            if !self.vars_to_elim.contains(&x) && self.avars_to_keep.insert(x) {
                self.arith_vars.push(x);
            }
        } else {
            let tag = self.terms.tag(x);
            self.set_error(ProjError::NonLinear(tag));
        }
    }

    /// Execute the three phases and, on success, append the residual
    /// literals to `out` (which is never reset).
    pub fn run(&mut self, out: &mut Vec<Term>) -> Result<(), ProjError> {
        if self.flag.is_none()
            && !(self.gen_literals.is_empty() && self.arith_literals.is_empty())
        {
            debug!("projection phase: generic elimination");
            self.elim_by_substitution();
        }
        let have_arith_evars = self.evars.iter().any(|&x| self.terms.is_arithmetic(x));
        if self.flag.is_none() && !self.arith_literals.is_empty() && have_arith_evars {
            debug!("projection phase: arithmetic projection");
            self.process_arith_literals();
        }
        if self.flag.is_none() && !self.evars.is_empty() {
            debug!("projection phase: value closure");
            self.elim_by_model_value();
        }
        match &self.flag {
            None => {
                out.extend_from_slice(&self.gen_literals);
                out.extend_from_slice(&self.arith_literals);
                Ok(())
            }
            Some(e) => Err(e.clone()),
        }
    }

    /// First phase: build a substitution from the equalities of the cube
    /// (generic literals first, then arithmetic ones), break its cycles,
    /// and rewrite both literal vectors when at least one variable was
    /// eliminated.
    fn elim_by_substitution(&mut self) {
        let mut subst = ElimSubst::new(self.vars_to_elim.clone());
        for i in 0..self.gen_literals.len() {
            let t = self.gen_literals[i];
            let _ = subst.try_cheap_map(self.terms, t, false);
        }
        for i in 0..self.arith_literals.len() {
            let t = self.arith_literals[i];
            let _ = subst.try_cheap_map(self.terms, t, false);
        }
        subst.remove_cycles(self.terms);

        let before = self.evars.len();
        self.evars.retain(|&x| subst.get_map(x).is_none());
        if self.evars.len() == before {
            return;
        }
        trace!(
            eliminated = before - self.evars.len(),
            "generic phase eliminated variables"
        );

        let mut gen_lits = std::mem::take(&mut self.gen_literals);
        let mut arith_lits = std::mem::take(&mut self.arith_literals);
        let mut result =
            Self::rewrite_vector(self.terms, &mut gen_lits, |tm, t| subst.apply(tm, t));
        if result.is_ok() {
            result = Self::rewrite_vector(self.terms, &mut arith_lits, |tm, t| subst.apply(tm, t));
        }
        self.gen_literals = gen_lits;
        self.arith_literals = arith_lits;
        if let Err(e) = result {
            self.set_error(ProjError::SubstFailed(e));
        }
    }

    /// Second phase: hand the arithmetic eliminable variables, the
    /// variables to keep, and the arithmetic literals to the virtual
    /// substitution engine, and take back the residual atoms.
    fn process_arith_literals(&mut self) {
        let mut aproj = ArithProjector::new();

        // arithmetic evars move into the projector; non-arithmetic ones
        // stay for value closure, as does any arithmetic evar that still
        // occurs in a generic literal (e.g. under an uninterpreted
        // predicate), since the arithmetic phase cannot reach it there
        let evars = std::mem::take(&mut self.evars);
        let mut arith_evars = Vec::new();
        for x in evars {
            if self.terms.is_arithmetic(x) {
                arith_evars.push(x);
                if self
                    .gen_literals
                    .iter()
                    .any(|&l| self.terms.mentions_var(l, x))
                {
                    self.evars.push(x);
                }
            } else {
                self.evars.push(x);
            }
        }
        for &x in &arith_evars {
            match self.mdl.rational_value(self.terms, x) {
                Ok(q) => aproj.add_var(x, true, q),
                Err(e) => {
                    self.set_error(ProjError::EvalFailed(e));
                    return;
                }
            }
        }
        for i in 0..self.arith_vars.len() {
            let x = self.arith_vars[i];
            match self.mdl.rational_value(self.terms, x) {
                Ok(q) => aproj.add_var(x, false, q),
                Err(e) => {
                    self.set_error(ProjError::EvalFailed(e));
                    return;
                }
            }
        }
        aproj.close_var_set();

        for i in 0..self.arith_literals.len() {
            let lit = self.arith_literals[i];
            trace!(literal = %lit, "arithmetic constraint");
            if let Err(e) = aproj.add_constraint(self.terms, lit) {
                self.set_error(ProjError::BadArithLiteral(e));
                return;
            }
        }
        aproj.eliminate();

        self.arith_literals.clear();
        aproj.get_formula_vector(self.terms, &mut self.arith_literals);
    }

    /// Third phase: map every surviving variable to the constant term of
    /// its model value and rewrite both literal vectors.
    fn elim_by_model_value(&mut self) {
        let mut values = Vec::with_capacity(self.evars.len());
        for i in 0..self.evars.len() {
            let x = self.evars[i];
            match self.mdl.evaluate(self.terms, x) {
                Ok(v) => values.push(v),
                Err(e) => {
                    self.set_error(ProjError::EvalFailed(e));
                    return;
                }
            }
        }
        let mut consts = Vec::with_capacity(values.len());
        for v in &values {
            match value_to_term(self.terms, v) {
                Some(t) => consts.push(t),
                None => {
                    self.set_error(ProjError::ConvertFailed);
                    return;
                }
            }
        }
        let mut subst = TermSubst::new(&self.evars, &consts);
        let mut gen_lits = std::mem::take(&mut self.gen_literals);
        let mut arith_lits = std::mem::take(&mut self.arith_literals);
        let mut result =
            Self::rewrite_vector(self.terms, &mut gen_lits, |tm, t| subst.apply(tm, t));
        if result.is_ok() {
            result = Self::rewrite_vector(self.terms, &mut arith_lits, |tm, t| subst.apply(tm, t));
        }
        self.gen_literals = gen_lits;
        self.arith_literals = arith_lits;
        if let Err(e) = result {
            self.set_error(ProjError::SubstFailed(e));
        }
    }

    /// Rewrite a literal vector in place, dropping literals that became
    /// `true`.
    fn rewrite_vector<F>(
        tm: &mut TermManager,
        lits: &mut Vec<Term>,
        mut rewrite: F,
    ) -> Result<(), SubstError>
    where
        F: FnMut(&mut TermManager, Term) -> Result<Term, SubstError>,
    {
        let mut j = 0;
        for i in 0..lits.len() {
            let t = rewrite(tm, lits[i])?;
            if t != TRUE_TERM {
                lits[j] = t;
                j += 1;
            }
        }
        lits.truncate(j);
        Ok(())
    }
}

/// One-shot projection: eliminate `vars` from the cube `literals`, which
/// the model satisfies, appending the result to `out` (not reset).
pub fn project_literals(
    mdl: &Model,
    terms: &mut TermManager,
    literals: &[Term],
    vars: &[Term],
    out: &mut Vec<Term>,
) -> Result<(), ProjError> {
    let mut proj = Projector::new(mdl, terms, vars)?;
    for &t in literals {
        proj.add_literal(t);
    }
    proj.run(out)
}

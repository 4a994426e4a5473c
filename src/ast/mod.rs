//! Term Graph with Hash-Consing.
//!
//! Arena-allocated terms addressed by [`Term`] occurrences. Each arena node
//! carries a [`TermKind`] and a sort; equal kinds intern to the same node,
//! so structural equality is index equality. The polarity bit of an
//! occurrence encodes negation, which is therefore never a node.
//!
//! The constructors perform the local simplifications the projector
//! depends on: `or` flattens and absorbs `true`, `ite` folds constant
//! conditions, equalities of identical terms fold to `true`, and arithmetic
//! atoms over constant polynomials fold to Boolean constants.

pub mod polynomial;
pub mod term;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use rustc_hash::{FxHashMap, FxHashSet};

pub use polynomial::{Monomial, Polynomial};
pub use term::{FALSE_TERM, TRUE_TERM, Term, TermIdx};

/// Index of an interned sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortId(u32);

/// The shape of a sort.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortKind {
    /// The Booleans.
    Bool,
    /// The integers.
    Int,
    /// The reals.
    Real,
    /// Fixed-width bitvectors.
    BitVec(u32),
    /// A named uninterpreted sort.
    Uninterpreted(String),
    /// A function sort (domain, range).
    Function(Vec<SortId>, SortId),
}

/// Interned sort table.
#[derive(Debug)]
pub struct SortTable {
    kinds: Vec<SortKind>,
    index: FxHashMap<SortKind, SortId>,
    /// The Boolean sort.
    pub bool_sort: SortId,
    /// The integer sort.
    pub int_sort: SortId,
    /// The real sort.
    pub real_sort: SortId,
}

impl SortTable {
    fn new() -> Self {
        let mut table = Self {
            kinds: Vec::new(),
            index: FxHashMap::default(),
            bool_sort: SortId(0),
            int_sort: SortId(0),
            real_sort: SortId(0),
        };
        table.bool_sort = table.intern(SortKind::Bool);
        table.int_sort = table.intern(SortKind::Int);
        table.real_sort = table.intern(SortKind::Real);
        table
    }

    /// Intern a sort.
    pub fn intern(&mut self, kind: SortKind) -> SortId {
        if let Some(&id) = self.index.get(&kind) {
            return id;
        }
        let id = SortId(self.kinds.len() as u32);
        self.kinds.push(kind.clone());
        self.index.insert(kind, id);
        id
    }

    /// The kind of a sort.
    #[must_use]
    pub fn kind(&self, id: SortId) -> &SortKind {
        &self.kinds[id.0 as usize]
    }

    /// Check for `Int` or `Real`.
    #[must_use]
    pub fn is_arithmetic(&self, id: SortId) -> bool {
        matches!(self.kind(id), SortKind::Int | SortKind::Real)
    }
}

/// Node payloads of the term arena.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// The reserved Boolean constant node; its positive occurrence is
    /// `true`, its negated occurrence `false`.
    BoolConst,
    /// A named uninterpreted constant.
    Uninterpreted {
        /// Declared name.
        name: String,
        /// Declared sort.
        sort: SortId,
    },
    /// A rational constant.
    ArithConstant(BigRational),
    /// A canonical linear polynomial.
    ArithPoly(Polynomial),
    /// A product of powers, total degree at least two. Representable and
    /// evaluable, but outside the linear fragment the projector accepts.
    PowerProduct(Vec<(Term, u32)>),
    /// Arithmetic atom `p = 0`.
    ArithEq(Term),
    /// Arithmetic atom `p >= 0`.
    ArithGe(Term),
    /// Arithmetic atom `t1 = t2` between non-polynomial terms.
    ArithBinEq(Term, Term),
    /// If-then-else.
    Ite(Term, Term, Term),
    /// Generic (non-arithmetic) equality.
    Eq(Term, Term),
    /// Pairwise disequality, three or more arguments.
    Distinct(Vec<Term>),
    /// N-ary disjunction.
    Or(Vec<Term>),
    /// N-ary exclusive or, over positive occurrences.
    Xor(Vec<Term>),
    /// Uninterpreted function application.
    App {
        /// The function symbol.
        fun: Term,
        /// The arguments.
        args: Vec<Term>,
    },
    /// A bitvector constant.
    BvConst {
        /// Bit width.
        width: u32,
        /// Value, reduced modulo `2^width`.
        bits: BigInt,
    },
}

/// Discriminant of a [`TermKind`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum TermTag {
    BoolConst,
    Uninterpreted,
    ArithConstant,
    ArithPoly,
    PowerProduct,
    ArithEq,
    ArithGe,
    ArithBinEq,
    Ite,
    Eq,
    Distinct,
    Or,
    Xor,
    App,
    BvConst,
}

impl TermKind {
    /// The discriminant of this kind.
    #[must_use]
    pub fn tag(&self) -> TermTag {
        match self {
            TermKind::BoolConst => TermTag::BoolConst,
            TermKind::Uninterpreted { .. } => TermTag::Uninterpreted,
            TermKind::ArithConstant(_) => TermTag::ArithConstant,
            TermKind::ArithPoly(_) => TermTag::ArithPoly,
            TermKind::PowerProduct(_) => TermTag::PowerProduct,
            TermKind::ArithEq(_) => TermTag::ArithEq,
            TermKind::ArithGe(_) => TermTag::ArithGe,
            TermKind::ArithBinEq(..) => TermTag::ArithBinEq,
            TermKind::Ite(..) => TermTag::Ite,
            TermKind::Eq(..) => TermTag::Eq,
            TermKind::Distinct(_) => TermTag::Distinct,
            TermKind::Or(_) => TermTag::Or,
            TermKind::Xor(_) => TermTag::Xor,
            TermKind::App { .. } => TermTag::App,
            TermKind::BvConst { .. } => TermTag::BvConst,
        }
    }
}

#[derive(Debug)]
struct Node {
    kind: TermKind,
    sort: SortId,
}

/// Hash-consed term arena with interned sorts.
#[derive(Debug)]
pub struct TermManager {
    nodes: Vec<Node>,
    index: FxHashMap<TermKind, TermIdx>,
    /// The sort table.
    pub sorts: SortTable,
}

impl TermManager {
    /// Create a manager holding only the reserved Boolean constant.
    #[must_use]
    pub fn new() -> Self {
        let mut tm = Self {
            nodes: Vec::new(),
            index: FxHashMap::default(),
            sorts: SortTable::new(),
        };
        let bool_sort = tm.sorts.bool_sort;
        let idx = tm.intern(TermKind::BoolConst, bool_sort);
        debug_assert_eq!(idx, 0);
        tm
    }

    fn intern(&mut self, kind: TermKind, sort: SortId) -> TermIdx {
        if let Some(&idx) = self.index.get(&kind) {
            return idx;
        }
        let idx = self.nodes.len() as TermIdx;
        self.nodes.push(Node {
            kind: kind.clone(),
            sort,
        });
        self.index.insert(kind, idx);
        idx
    }

    fn intern_term(&mut self, kind: TermKind, sort: SortId) -> Term {
        Term::positive(self.intern(kind, sort))
    }

    /// Number of arena nodes.
    #[must_use]
    pub fn num_terms(&self) -> usize {
        self.nodes.len()
    }

    /// The Boolean constant `true`.
    #[must_use]
    pub fn mk_true(&self) -> Term {
        TRUE_TERM
    }

    /// The Boolean constant `false`.
    #[must_use]
    pub fn mk_false(&self) -> Term {
        FALSE_TERM
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The kind of the node behind an occurrence (polarity stripped).
    #[must_use]
    pub fn kind(&self, t: Term) -> &TermKind {
        &self.nodes[t.index() as usize].kind
    }

    /// The discriminant of the node behind an occurrence.
    #[must_use]
    pub fn tag(&self, t: Term) -> TermTag {
        self.kind(t).tag()
    }

    /// The sort of the node behind an occurrence.
    #[must_use]
    pub fn sort_of(&self, t: Term) -> SortId {
        self.nodes[t.index() as usize].sort
    }

    /// Check whether the term is Boolean.
    #[must_use]
    pub fn is_boolean(&self, t: Term) -> bool {
        self.sort_of(t) == self.sorts.bool_sort
    }

    /// Check whether the term is arithmetic (`Int` or `Real`).
    #[must_use]
    pub fn is_arithmetic(&self, t: Term) -> bool {
        self.sorts.is_arithmetic(self.sort_of(t))
    }

    /// Check whether the occurrence is a positive uninterpreted constant.
    #[must_use]
    pub fn is_uninterpreted(&self, t: Term) -> bool {
        t.is_positive() && matches!(self.kind(t), TermKind::Uninterpreted { .. })
    }

    /// Check whether the underlying atom is one of the three arithmetic
    /// atom kinds. `distinct` is never an arithmetic literal, even over
    /// arithmetic arguments; it is classified as generic.
    #[must_use]
    pub fn is_arithmetic_literal(&self, t: Term) -> bool {
        matches!(
            self.kind(t),
            TermKind::ArithEq(_) | TermKind::ArithGe(_) | TermKind::ArithBinEq(..)
        )
    }

    /// The argument of an `ArithEq`/`ArithGe` atom.
    ///
    /// # Panics
    /// Panics if the occurrence is not one of those atoms.
    #[must_use]
    pub fn arith_atom_arg(&self, t: Term) -> Term {
        match self.kind(t) {
            TermKind::ArithEq(arg) | TermKind::ArithGe(arg) => *arg,
            k => panic!("arith_atom_arg: not an arithmetic atom: {:?}", k.tag()),
        }
    }

    /// The two sides of an `ArithBinEq` atom.
    ///
    /// # Panics
    /// Panics if the occurrence is not an `ArithBinEq`.
    #[must_use]
    pub fn arith_bineq_args(&self, t: Term) -> (Term, Term) {
        match self.kind(t) {
            TermKind::ArithBinEq(a, b) => (*a, *b),
            k => panic!("arith_bineq_args: not a binary equality: {:?}", k.tag()),
        }
    }

    /// View an arithmetic term as a polynomial. Constants and polynomial
    /// nodes convert directly; any other arithmetic term becomes a single
    /// variable monomial.
    #[must_use]
    pub fn term_to_poly(&self, t: Term) -> Polynomial {
        debug_assert!(self.is_arithmetic(t));
        match self.kind(t) {
            TermKind::ArithConstant(c) => Polynomial::constant(c.clone()),
            TermKind::ArithPoly(p) => p.clone(),
            _ => Polynomial::from_var(t),
        }
    }

    // ------------------------------------------------------------------
    // Leaf constructors
    // ------------------------------------------------------------------

    /// An uninterpreted constant with the given name and sort. Identical
    /// declarations intern to the same term.
    pub fn mk_var(&mut self, name: impl Into<String>, sort: SortId) -> Term {
        let kind = TermKind::Uninterpreted {
            name: name.into(),
            sort,
        };
        self.intern_term(kind, sort)
    }

    /// An integer constant.
    pub fn mk_int(&mut self, value: BigInt) -> Term {
        self.mk_rational(BigRational::from_integer(value))
    }

    /// A rational constant. Integral values get the `Int` sort.
    pub fn mk_rational(&mut self, value: BigRational) -> Term {
        let sort = if value.is_integer() {
            self.sorts.int_sort
        } else {
            self.sorts.real_sort
        };
        self.intern_term(TermKind::ArithConstant(value), sort)
    }

    /// A bitvector constant, reduced modulo `2^width`.
    pub fn mk_bv_const(&mut self, width: u32, bits: BigInt) -> Term {
        let modulus = BigInt::one() << width;
        let bits = ((bits % &modulus) + &modulus) % &modulus;
        let sort = self.sorts.intern(SortKind::BitVec(width));
        self.intern_term(TermKind::BvConst { width, bits }, sort)
    }

    // ------------------------------------------------------------------
    // Arithmetic constructors
    // ------------------------------------------------------------------

    fn poly_sort(&mut self, p: &Polynomial) -> SortId {
        let integral = p.monomials().iter().all(|m| m.coeff.is_integer())
            && p.vars().all(|x| self.sort_of(x) == self.sorts.int_sort);
        if integral {
            self.sorts.int_sort
        } else {
            self.sorts.real_sort
        }
    }

    /// The term form of a polynomial: a constant for constant polynomials,
    /// the variable itself for unit monomials, an `ArithPoly` node
    /// otherwise.
    pub fn poly_term(&mut self, p: Polynomial) -> Term {
        if p.is_constant() {
            return self.mk_rational(p.constant_part());
        }
        if let [m] = p.monomials()
            && m.coeff.is_one()
            && let Some(x) = m.var
        {
            return x;
        }
        let sort = self.poly_sort(&p);
        self.intern_term(TermKind::ArithPoly(p), sort)
    }

    /// The sum of arithmetic terms.
    pub fn mk_add(&mut self, ts: Vec<Term>) -> Term {
        let mut acc = Polynomial::zero();
        for t in ts {
            acc = acc.add(&self.term_to_poly(t));
        }
        self.poly_term(acc)
    }

    /// The difference `a - b`.
    pub fn mk_sub(&mut self, a: Term, b: Term) -> Term {
        let p = self.term_to_poly(a).sub(&self.term_to_poly(b));
        self.poly_term(p)
    }

    /// The negation `-a`.
    pub fn mk_neg(&mut self, a: Term) -> Term {
        let p = self.term_to_poly(a).neg();
        self.poly_term(p)
    }

    /// The product of two arithmetic terms. Variable-variable products
    /// intern power-product nodes, which the projector later rejects as
    /// non-linear.
    pub fn mk_mul(&mut self, a: Term, b: Term) -> Term {
        let pa = self.term_to_poly(a);
        let pb = self.term_to_poly(b);
        let mut monos = Vec::new();
        for ma in pa.monomials() {
            for mb in pb.monomials() {
                let coeff = &ma.coeff * &mb.coeff;
                let var = match (ma.var, mb.var) {
                    (None, None) => None,
                    (Some(x), None) | (None, Some(x)) => Some(x),
                    (Some(x), Some(y)) => Some(self.mk_power_product(x, y)),
                };
                monos.push(Monomial::new(coeff, var));
            }
        }
        let p = Polynomial::from_monomials(monos);
        self.poly_term(p)
    }

    fn mk_power_product(&mut self, x: Term, y: Term) -> Term {
        let mut powers: Vec<(Term, u32)> = Vec::new();
        for t in [x, y] {
            match self.kind(t) {
                TermKind::PowerProduct(ps) => powers.extend(ps.iter().cloned()),
                _ => powers.push((t, 1)),
            }
        }
        powers.sort_by_key(|&(t, _)| t);
        let mut merged: Vec<(Term, u32)> = Vec::new();
        for (t, d) in powers {
            match merged.last_mut() {
                Some((u, e)) if *u == t => *e += d,
                _ => merged.push((t, d)),
            }
        }
        let real = merged
            .iter()
            .any(|&(t, _)| self.sort_of(t) == self.sorts.real_sort);
        let sort = if real {
            self.sorts.real_sort
        } else {
            self.sorts.int_sort
        };
        self.intern_term(TermKind::PowerProduct(merged), sort)
    }

    /// The atom `p = 0`, folded to a Boolean constant when `p` is
    /// constant. The polynomial is normalized to a unit leading
    /// coefficient so that scaled variants intern to the same atom.
    pub fn mk_arith_eq_atom(&mut self, p: Polynomial) -> Term {
        if p.is_constant() {
            return if p.constant_part().is_zero() {
                TRUE_TERM
            } else {
                FALSE_TERM
            };
        }
        let lead = p
            .monomials()
            .iter()
            .find_map(|m| m.var.map(|_| m.coeff.clone()))
            .unwrap_or_else(BigRational::one);
        let p = p.scale(&lead.recip());
        let arg = self.poly_term(p);
        self.intern_term(TermKind::ArithEq(arg), self.sorts.bool_sort)
    }

    /// The atom `p >= 0`, folded to a Boolean constant when `p` is
    /// constant. The polynomial is normalized by a positive factor only.
    pub fn mk_arith_ge_atom(&mut self, p: Polynomial) -> Term {
        if p.is_constant() {
            return if p.constant_part() >= BigRational::zero() {
                TRUE_TERM
            } else {
                FALSE_TERM
            };
        }
        let lead = p
            .monomials()
            .iter()
            .find_map(|m| m.var.map(|_| m.coeff.abs()))
            .unwrap_or_else(BigRational::one);
        let p = p.scale(&lead.recip());
        let arg = self.poly_term(p);
        self.intern_term(TermKind::ArithGe(arg), self.sorts.bool_sort)
    }

    /// The atom `a >= b`.
    pub fn mk_ge(&mut self, a: Term, b: Term) -> Term {
        let p = self.term_to_poly(a).sub(&self.term_to_poly(b));
        self.mk_arith_ge_atom(p)
    }

    /// The atom `a <= b`.
    pub fn mk_le(&mut self, a: Term, b: Term) -> Term {
        self.mk_ge(b, a)
    }

    /// The literal `a > b`, i.e. the negation of `b >= a`.
    pub fn mk_gt(&mut self, a: Term, b: Term) -> Term {
        self.mk_ge(b, a).negate()
    }

    /// The literal `a < b`, i.e. the negation of `a >= b`.
    pub fn mk_lt(&mut self, a: Term, b: Term) -> Term {
        self.mk_ge(a, b).negate()
    }

    fn mk_arith_bineq(&mut self, a: Term, b: Term) -> Term {
        if a == b {
            return TRUE_TERM;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.intern_term(TermKind::ArithBinEq(lo, hi), self.sorts.bool_sort)
    }

    // ------------------------------------------------------------------
    // Generic constructors
    // ------------------------------------------------------------------

    /// Equality. Arithmetic sides with polynomial structure lower to a
    /// `p = 0` atom, plain arithmetic sides to a binary equality atom,
    /// everything else to a generic equality with ordered arguments.
    pub fn mk_eq(&mut self, a: Term, b: Term) -> Term {
        if a == b {
            return TRUE_TERM;
        }
        if self.is_arithmetic(a) {
            debug_assert!(self.is_arithmetic(b));
            let polyish = |k: &TermKind| {
                matches!(k, TermKind::ArithConstant(_) | TermKind::ArithPoly(_))
            };
            if polyish(self.kind(a)) || polyish(self.kind(b)) {
                let p = self.term_to_poly(a).sub(&self.term_to_poly(b));
                return self.mk_arith_eq_atom(p);
            }
            return self.mk_arith_bineq(a, b);
        }
        if self.is_boolean(a) {
            if a == b.negate() {
                return FALSE_TERM;
            }
            if b == TRUE_TERM {
                return a;
            }
            if b == FALSE_TERM {
                return a.negate();
            }
            if a == TRUE_TERM {
                return b;
            }
            if a == FALSE_TERM {
                return b.negate();
            }
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.intern_term(TermKind::Eq(lo, hi), self.sorts.bool_sort)
    }

    /// Pairwise disequality. Two arguments lower to a negated equality;
    /// repeated arguments fold to `false`.
    pub fn mk_distinct(&mut self, mut args: Vec<Term>) -> Term {
        args.sort_unstable();
        let n = args.len();
        args.dedup();
        if args.len() < n {
            return FALSE_TERM;
        }
        match args.len() {
            0 | 1 => TRUE_TERM,
            2 => self.mk_eq(args[0], args[1]).negate(),
            _ => self.intern_term(TermKind::Distinct(args), self.sorts.bool_sort),
        }
    }

    /// N-ary disjunction with flattening, deduplication, and absorption.
    pub fn mk_or(&mut self, args: Vec<Term>) -> Term {
        let mut flat = Vec::with_capacity(args.len());
        for t in args {
            match self.kind(t) {
                TermKind::Or(inner) if t.is_positive() => flat.extend(inner.iter().copied()),
                _ => flat.push(t),
            }
        }
        flat.sort_unstable();
        flat.dedup();
        flat.retain(|&t| t != FALSE_TERM);
        if flat.contains(&TRUE_TERM) {
            return TRUE_TERM;
        }
        // adjacent after sorting: t+ and t- differ in the low bit only
        if flat.windows(2).any(|w| w[0] == w[1].negate()) {
            return TRUE_TERM;
        }
        match flat.len() {
            0 => FALSE_TERM,
            1 => flat[0],
            _ => self.intern_term(TermKind::Or(flat), self.sorts.bool_sort),
        }
    }

    /// N-ary conjunction, by De Morgan over [`mk_or`](Self::mk_or).
    pub fn mk_and(&mut self, args: Vec<Term>) -> Term {
        let negated = args.into_iter().map(Term::negate).collect();
        self.mk_or(negated).negate()
    }

    /// N-ary exclusive or. Polarities are stripped into a parity, pairs
    /// cancel, and the result is over positive occurrences.
    pub fn mk_xor(&mut self, args: Vec<Term>) -> Term {
        let mut parity = false;
        let mut pos: Vec<Term> = Vec::with_capacity(args.len());
        for t in args {
            let u = if t.is_negative() {
                parity = !parity;
                t.negate()
            } else {
                t
            };
            if u == TRUE_TERM {
                parity = !parity;
            } else {
                pos.push(u);
            }
        }
        pos.sort_unstable();
        // cancel equal pairs
        let mut kept: Vec<Term> = Vec::with_capacity(pos.len());
        for t in pos {
            if kept.last() == Some(&t) {
                kept.pop();
            } else {
                kept.push(t);
            }
        }
        let base = match kept.len() {
            0 => FALSE_TERM,
            1 => kept[0],
            _ => self.intern_term(TermKind::Xor(kept), self.sorts.bool_sort),
        };
        if parity { base.negate() } else { base }
    }

    /// If-then-else with a positive condition, constant folding, and
    /// branch merging.
    pub fn mk_ite(&mut self, c: Term, a: Term, b: Term) -> Term {
        if c == TRUE_TERM {
            return a;
        }
        if c == FALSE_TERM {
            return b;
        }
        if a == b {
            return a;
        }
        if c.is_negative() {
            return self.mk_ite(c.negate(), b, a);
        }
        if self.is_boolean(a) {
            if a == TRUE_TERM && b == FALSE_TERM {
                return c;
            }
            if a == FALSE_TERM && b == TRUE_TERM {
                return c.negate();
            }
        }
        let sort = self.sort_of(a);
        self.intern_term(TermKind::Ite(c, a, b), sort)
    }

    /// Boolean negation: a polarity flip.
    ///
    /// # Panics
    /// Debug-panics when the argument is not Boolean.
    #[must_use]
    pub fn mk_not(&self, t: Term) -> Term {
        debug_assert!(self.is_boolean(t));
        t.negate()
    }

    /// Uninterpreted function application. The symbol must carry a
    /// function sort; the application takes its range sort.
    pub fn mk_app(&mut self, fun: Term, args: Vec<Term>) -> Term {
        let range = match self.sorts.kind(self.sort_of(fun)) {
            SortKind::Function(_, range) => *range,
            k => panic!("mk_app: not a function symbol: {k:?}"),
        };
        self.intern_term(TermKind::App { fun, args }, range)
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Collect every uninterpreted constant occurring in a term, as
    /// positive occurrences.
    #[must_use]
    pub fn collect_vars(&self, t: Term) -> FxHashSet<Term> {
        let mut vars = FxHashSet::default();
        let mut visited = FxHashSet::default();
        let mut stack = vec![t.unsigned()];
        while let Some(u) = stack.pop() {
            if !visited.insert(u.index()) {
                continue;
            }
            match self.kind(u) {
                TermKind::Uninterpreted { .. } => {
                    vars.insert(u);
                }
                TermKind::BoolConst
                | TermKind::ArithConstant(_)
                | TermKind::BvConst { .. } => {}
                TermKind::ArithPoly(p) => stack.extend(p.vars().map(Term::unsigned)),
                TermKind::PowerProduct(ps) => {
                    stack.extend(ps.iter().map(|&(b, _)| b.unsigned()));
                }
                TermKind::ArithEq(a) | TermKind::ArithGe(a) => stack.push(a.unsigned()),
                TermKind::ArithBinEq(a, b) | TermKind::Eq(a, b) => {
                    stack.push(a.unsigned());
                    stack.push(b.unsigned());
                }
                TermKind::Ite(c, a, b) => {
                    stack.push(c.unsigned());
                    stack.push(a.unsigned());
                    stack.push(b.unsigned());
                }
                TermKind::Distinct(args) | TermKind::Or(args) | TermKind::Xor(args) => {
                    stack.extend(args.iter().map(|a| a.unsigned()));
                }
                TermKind::App { fun, args } => {
                    stack.push(fun.unsigned());
                    stack.extend(args.iter().map(|a| a.unsigned()));
                }
            }
        }
        vars
    }

    /// Check whether a term mentions an uninterpreted constant.
    #[must_use]
    pub fn mentions_var(&self, t: Term, x: Term) -> bool {
        debug_assert!(self.is_uninterpreted(x));
        self.collect_vars(t).contains(&x)
    }
}

impl Default for TermManager {
    fn default() -> Self {
        Self::new()
    }
}

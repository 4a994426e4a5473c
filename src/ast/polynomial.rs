//! Linear Polynomials over Term Variables.
//!
//! A polynomial is a canonical sum of rational-weighted monomials. Each
//! monomial is either the constant marker (`var == None`) or a reference to
//! an arithmetic term acting as a variable. Canonical form: the constant
//! monomial first, the rest sorted by variable index, no zero coefficients,
//! no duplicate variables. Structural equality and hashing on the canonical
//! form make polynomial atoms hash-consable.

use num_rational::BigRational;
use num_traits::Zero;
use smallvec::SmallVec;
use std::fmt;

use super::term::Term;

/// A rational-weighted monomial: `coeff * var`, or `coeff` alone when
/// `var` is `None` (the constant marker).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Monomial {
    /// The rational coefficient; never zero in a canonical polynomial.
    pub coeff: BigRational,
    /// The variable, or `None` for the constant monomial.
    pub var: Option<Term>,
}

impl Monomial {
    /// Build a monomial.
    #[must_use]
    pub fn new(coeff: BigRational, var: Option<Term>) -> Self {
        Self { coeff, var }
    }
}

/// A canonical linear polynomial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Polynomial {
    monos: SmallVec<[Monomial; 4]>,
}

impl Polynomial {
    /// The zero polynomial.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// A constant polynomial.
    #[must_use]
    pub fn constant(c: BigRational) -> Self {
        let mut p = Self::default();
        if !c.is_zero() {
            p.monos.push(Monomial::new(c, None));
        }
        p
    }

    /// The polynomial `1 * x`.
    #[must_use]
    pub fn from_var(x: Term) -> Self {
        let mut p = Self::default();
        p.monos.push(Monomial::new(BigRational::from_integer(1.into()), Some(x)));
        p
    }

    /// Build from an arbitrary monomial list; merges duplicates, drops
    /// zeros, and sorts into canonical order.
    #[must_use]
    pub fn from_monomials(monos: impl IntoIterator<Item = Monomial>) -> Self {
        let mut all: SmallVec<[Monomial; 4]> = monos.into_iter().collect();
        all.sort_by_key(|m| m.var);
        let mut out: SmallVec<[Monomial; 4]> = SmallVec::new();
        for m in all {
            match out.last_mut() {
                Some(last) if last.var == m.var => last.coeff += m.coeff,
                _ => out.push(m),
            }
        }
        out.retain(|m| !m.coeff.is_zero());
        Self { monos: out }
    }

    /// The monomials in canonical order.
    #[must_use]
    pub fn monomials(&self) -> &[Monomial] {
        &self.monos
    }

    /// Number of monomials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.monos.len()
    }

    /// Check for the zero polynomial.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.monos.is_empty()
    }

    /// Check whether the polynomial has no variable monomials.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        match self.monos.as_slice() {
            [] => true,
            [m] => m.var.is_none(),
            _ => false,
        }
    }

    /// The constant part (zero when absent).
    #[must_use]
    pub fn constant_part(&self) -> BigRational {
        match self.monos.first() {
            Some(m) if m.var.is_none() => m.coeff.clone(),
            _ => BigRational::zero(),
        }
    }

    /// The coefficient of a variable, if present.
    #[must_use]
    pub fn coeff_of(&self, x: Term) -> Option<&BigRational> {
        self.monos
            .iter()
            .find(|m| m.var == Some(x))
            .map(|m| &m.coeff)
    }

    /// Iterate over the variables (constant monomial excluded).
    pub fn vars(&self) -> impl Iterator<Item = Term> + '_ {
        self.monos.iter().filter_map(|m| m.var)
    }

    /// Check whether `x` occurs in the polynomial.
    #[must_use]
    pub fn mentions(&self, x: Term) -> bool {
        self.coeff_of(x).is_some()
    }

    /// Pointwise sum.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self::from_monomials(self.monos.iter().chain(other.monos.iter()).cloned())
    }

    /// Pointwise difference `self - other`.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Negation.
    #[must_use]
    pub fn neg(&self) -> Self {
        let monos = self
            .monos
            .iter()
            .map(|m| Monomial::new(-m.coeff.clone(), m.var))
            .collect();
        Self { monos }
    }

    /// Multiply every coefficient by `c`.
    #[must_use]
    pub fn scale(&self, c: &BigRational) -> Self {
        if c.is_zero() {
            return Self::zero();
        }
        let monos = self
            .monos
            .iter()
            .map(|m| Monomial::new(&m.coeff * c, m.var))
            .collect();
        Self { monos }
    }

    /// Split off the monomial of `x`: returns its coefficient and the
    /// remaining polynomial. The coefficient is zero when `x` is absent.
    #[must_use]
    pub fn split_var(&self, x: Term) -> (BigRational, Self) {
        let mut coeff = BigRational::zero();
        let mut rest: SmallVec<[Monomial; 4]> = SmallVec::new();
        for m in &self.monos {
            if m.var == Some(x) {
                coeff = m.coeff.clone();
            } else {
                rest.push(m.clone());
            }
        }
        (coeff, Self { monos: rest })
    }

    /// Substitute `x := q`, renormalizing.
    #[must_use]
    pub fn subst_var(&self, x: Term, q: &Self) -> Self {
        let (c, rest) = self.split_var(x);
        if c.is_zero() {
            return self.clone();
        }
        rest.add(&q.scale(&c))
    }

    /// Evaluate under a variable assignment. Returns `None` if the
    /// assignment is partial on the polynomial's variables.
    pub fn eval_with<F>(&self, mut value_of: F) -> Option<BigRational>
    where
        F: FnMut(Term) -> Option<BigRational>,
    {
        let mut acc = BigRational::zero();
        for m in &self.monos {
            match m.var {
                None => acc += &m.coeff,
                Some(x) => acc += &m.coeff * value_of(x)?,
            }
        }
        Some(acc)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.monos.is_empty() {
            return write!(f, "0");
        }
        for (i, m) in self.monos.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            match m.var {
                None => write!(f, "{}", m.coeff)?,
                Some(x) => write!(f, "{}*{}", m.coeff, x)?,
            }
        }
        Ok(())
    }
}
